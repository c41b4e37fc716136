//! Property value types for vertices, edges and operator arguments
//!
//! Values serialize as plain JSON (untagged) so the wire format stays a
//! natural JSON document. The superset filter used by `vertex`, `out`/`in`
//! and `filter` lives here as well.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property value type supporting multiple data types
///
/// Variant order matters for untagged deserialization: booleans and
/// integers are tried before floats and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Map(IndexMap<String, PropertyValue>),
    Null,
}

impl PropertyValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get array value if this is an array
    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get map value if this is a map
    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Map(_) => "Map",
            PropertyValue::Null => "Null",
        }
    }

    /// Equality used by the superset filter.
    ///
    /// Integers and floats compare numerically; everything else compares
    /// structurally.
    pub fn filter_eq(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::Integer(a), PropertyValue::Float(b))
            | (PropertyValue::Float(b), PropertyValue::Integer(a)) => (*a as f64) == *b,
            _ => self == other,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<usize> for PropertyValue {
    fn from(i: usize) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(arr: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(arr)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(map: PropertyMap) -> Self {
        PropertyValue::Map(map)
    }
}

/// Ordered property bag for vertices, edges and filter objects
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Superset match: every key of `filter` must be present in the candidate
/// with an equal value. Extra candidate keys are ignored.
///
/// `lookup` resolves a key on the candidate, which lets vertices and edges
/// expose virtual keys (`_id`, `_label`) next to their stored properties.
pub fn matches_filter<F>(filter: &PropertyMap, lookup: F) -> bool
where
    F: Fn(&str) -> Option<PropertyValue>,
{
    filter.iter().all(|(key, expected)| match lookup(key) {
        Some(actual) => actual.filter_eq(expected),
        None => false,
    })
}

/// Build a [`PropertyMap`] from key/value pairs.
///
/// ```
/// use pullgraph::props;
/// let p = props! { "name" => "a", "age" => 3 };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    () => { $crate::graph::PropertyMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::graph::PropertyMap::new();
        $( map.insert(($key).to_string(), $crate::graph::PropertyValue::from($value)); )+
        map
    }};
}
