//! Materialized query results

use crate::graph::{PropertyValue, Vertex, VertexData};
use serde::{Serialize, Serializer};
use std::fmt;

/// What a query reports for each gremlin reaching the end of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Snapshot of the vertex the gremlin stopped on
    Vertex(Vertex),
    /// Value attached by `property`
    Property(PropertyValue),
}

impl Value {
    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            Value::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyValue> {
        match self {
            Value::Property(p) => Some(p),
            _ => None,
        }
    }

    /// `"Vertex"`, or the type of the reported property
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Vertex(_) => "Vertex",
            Value::Property(p) => p.type_name(),
        }
    }

    /// Vertex snapshot without adjacency, or the property as-is
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Vertex(v) => VertexData::serialize(&v.to_data(), serializer),
            Value::Property(p) => p.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Vertex(v) => write!(f, "v[{}]", v.id),
            Value::Property(p) => write!(f, "{}", p),
        }
    }
}

impl From<PropertyValue> for Value {
    fn from(value: PropertyValue) -> Self {
        Value::Property(value)
    }
}

impl From<Vertex> for Value {
    fn from(vertex: Vertex) -> Self {
        Value::Vertex(vertex)
    }
}
