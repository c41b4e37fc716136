//! Operator arguments
//!
//! Arguments are a sparse positional list: every operator reads the
//! positions it cares about and ignores the rest. A `Null` value marks a
//! position the caller left out, which is what alias defaults fill in.

use crate::graph::{PropertyMap, PropertyValue, Vertex, VertexId, VertexSelector};
use crate::query::gremlin::Gremlin;
use std::fmt;
use std::sync::Arc;

/// Shared predicate over the vertex a gremlin sits on
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Vertex, &Gremlin) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Vertex, &Gremlin) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(f))
    }

    pub fn test(&self, vertex: &Vertex, gremlin: &Gremlin) -> bool {
        (self.0)(vertex, gremlin)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single operator argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Scalar or composite value: ids, labels, counts, property keys
    Value(PropertyValue),
    /// A set of edge labels
    Labels(Vec<String>),
    /// A property filter object (superset match)
    Filter(PropertyMap),
    /// A caller-supplied test
    Predicate(Predicate),
}

impl Arg {
    /// Label set argument
    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arg::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Predicate argument
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Vertex, &Gremlin) -> bool + Send + Sync + 'static,
    {
        Arg::Predicate(Predicate::new(f))
    }

    /// Absent position
    pub fn absent() -> Self {
        Arg::Value(PropertyValue::Null)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Arg::Value(PropertyValue::Null))
    }

    pub fn as_value(&self) -> Option<&PropertyValue> {
        match self {
            Arg::Value(v) => Some(v),
            _ => None,
        }
    }

    /// String view of a value argument (labels, property keys, bookmarks)
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(PropertyValue::as_string)
    }

    /// Classify a loosely-typed value.
    ///
    /// An object becomes a property filter and a list of strings becomes a
    /// label set. Everything else, mixed lists included, stays a value.
    pub fn from_value(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Map(filter) => Arg::Filter(filter),
            PropertyValue::Array(items) if items.iter().all(|i| matches!(i, PropertyValue::String(_))) => {
                Arg::Labels(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            PropertyValue::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Arg::Value(other),
        }
    }
}

macro_rules! impl_arg_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(PropertyValue::from(value))
                }
            }

            impl From<$ty> for Args {
                fn from(value: $ty) -> Self {
                    Args(vec![Arg::from(value)])
                }
            }
        )*
    };
}

impl_arg_from_value!(i64, i32, usize, f64, bool, &str, String);

impl From<PropertyValue> for Arg {
    fn from(value: PropertyValue) -> Self {
        Arg::from_value(value)
    }
}

impl From<PropertyValue> for Args {
    fn from(value: PropertyValue) -> Self {
        Args(vec![Arg::from_value(value)])
    }
}

/// An array literal is a label set: `out(["knows", "likes"])`
impl<S: Into<String>, const N: usize> From<[S; N]> for Arg {
    fn from(labels: [S; N]) -> Self {
        Arg::labels(labels)
    }
}

impl From<VertexId> for Arg {
    fn from(id: VertexId) -> Self {
        Arg::Value(id.to_value())
    }
}

impl From<PropertyMap> for Arg {
    fn from(filter: PropertyMap) -> Self {
        Arg::Filter(filter)
    }
}

impl From<Predicate> for Arg {
    fn from(predicate: Predicate) -> Self {
        Arg::Predicate(predicate)
    }
}

/// Positional argument list of one program step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args(Vec<Arg>);

impl Args {
    pub fn new() -> Self {
        Args(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `position`, treating `Null` as absent
    pub fn get(&self, position: usize) -> Option<&Arg> {
        self.0.get(position).filter(|arg| !arg.is_absent())
    }

    pub fn first(&self) -> Option<&Arg> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.0.iter()
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.0.push(arg.into());
    }

    /// Fill every position the caller left out with the matching default.
    ///
    /// Supplied positions are never overridden.
    pub fn with_defaults(mut self, defaults: &Args) -> Self {
        for (position, default) in defaults.0.iter().enumerate() {
            if self.get(position).is_some() || default.is_absent() {
                continue;
            }
            while self.0.len() <= position {
                self.0.push(Arg::absent());
            }
            self.0[position] = default.clone();
        }
        self
    }

    /// Interpret the arguments of a `vertex` step.
    ///
    /// A leading filter object selects by properties; no arguments select
    /// everything; otherwise every id-shaped value is an id. Lists are
    /// flattened, so `v([1, 2])` and `v(1, 2)` agree.
    pub fn vertex_selector(&self) -> VertexSelector {
        match self.first() {
            Some(Arg::Filter(filter)) => VertexSelector::Filter(filter.clone()),
            _ if self.0.is_empty() => VertexSelector::All,
            _ => {
                let mut ids = Vec::new();
                for arg in &self.0 {
                    match arg {
                        Arg::Labels(names) => ids.extend(names.iter().map(|n| VertexId::from(n.as_str()))),
                        Arg::Value(value) => match value.as_array() {
                            Some(items) => ids.extend(items.iter().filter_map(VertexId::from_value)),
                            None => ids.extend(VertexId::from_value(value)),
                        },
                        _ => {}
                    }
                }
                VertexSelector::Ids(ids)
            }
        }
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args::new()
    }
}

impl From<Arg> for Args {
    fn from(arg: Arg) -> Self {
        Args(vec![arg])
    }
}

impl From<VertexId> for Args {
    fn from(id: VertexId) -> Self {
        Args(vec![Arg::from(id)])
    }
}

impl From<PropertyMap> for Args {
    fn from(filter: PropertyMap) -> Self {
        Args(vec![Arg::Filter(filter)])
    }
}

impl From<Predicate> for Args {
    fn from(predicate: Predicate) -> Self {
        Args(vec![Arg::Predicate(predicate)])
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Args {
    fn from(items: Vec<T>) -> Self {
        Args(items.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Args {
    fn from(labels: [S; N]) -> Self {
        Args(vec![Arg::labels(labels)])
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Args(iter.into_iter().collect())
    }
}

/// Build an [`Args`] list from heterogeneous values.
///
/// ```
/// use pullgraph::args;
/// let a = args![1, "x"];
/// assert_eq!(a.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { $crate::query::Args::new() };
    ($($arg:expr),+ $(,)?) => {
        <$crate::query::Args as ::std::iter::FromIterator<$crate::query::Arg>>::from_iter(
            vec![$($crate::query::Arg::from($arg)),+]
        )
    };
}
