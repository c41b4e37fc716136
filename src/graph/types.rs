//! Core identifier types for the graph store
//!
//! Vertices carry a caller-visible [`VertexId`] (integer or string, as it
//! appears in the serialized form) and live in an arena addressed by
//! [`VertexIdx`]. Edges only have an arena position, [`EdgeIdx`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::property::PropertyValue;

/// Caller-visible vertex identifier
///
/// Ids are either integers (the shape the store generates) or strings.
/// The two never alias: `Integer(1)` and `String("1")` are separate keys,
/// so `v("1")` does not find the vertex with id `1`. Keeping them apart is
/// what lets a string id such as `"1"` survive a JSON round trip as a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(untagged)]
pub enum VertexId {
    Integer(i64),
    String(String),
}

impl VertexId {
    /// Convert a property value into an id, if it has an id shape
    pub fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Integer(i) => Some(VertexId::Integer(*i)),
            PropertyValue::String(s) => Some(VertexId::String(s.clone())),
            PropertyValue::Float(f) if f.fract() == 0.0 => Some(VertexId::Integer(*f as i64)),
            _ => None,
        }
    }

    /// The id as a property value (used for the virtual `_id` property)
    pub fn to_value(&self) -> PropertyValue {
        match self {
            VertexId::Integer(i) => PropertyValue::Integer(*i),
            VertexId::String(s) => PropertyValue::String(s.clone()),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            VertexId::Integer(i) => Some(*i),
            VertexId::String(_) => None,
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexId::Integer(i) => write!(f, "{}", i),
            VertexId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for VertexId {
    fn from(id: i64) -> Self {
        VertexId::Integer(id)
    }
}

impl From<i32> for VertexId {
    fn from(id: i32) -> Self {
        VertexId::Integer(id as i64)
    }
}

impl From<&str> for VertexId {
    fn from(id: &str) -> Self {
        VertexId::String(id.to_string())
    }
}

impl From<String> for VertexId {
    fn from(id: String) -> Self {
        VertexId::String(id)
    }
}

/// Position of a vertex in the store's vertex arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIdx(pub usize);

impl VertexIdx {
    pub fn new(idx: usize) -> Self {
        VertexIdx(idx)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexIdx({})", self.0)
    }
}

/// Position of an edge in the store's edge arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIdx(pub usize);

impl EdgeIdx {
    pub fn new(idx: usize) -> Self {
        EdgeIdx(idx)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeIdx({})", self.0)
    }
}
