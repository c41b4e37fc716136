//! Edge implementation for the graph store
//!
//! Edges reference their endpoints by vertex arena position, so the
//! vertex -> edge -> vertex cycle never turns into an ownership cycle.

use super::property::{matches_filter, PropertyMap, PropertyValue};
use super::types::{VertexId, VertexIdx};
use serde::{Deserialize, Serialize};

/// Key under which the edge label is exposed to filters
pub const LABEL_KEY: &str = "_label";

/// A directed, labelled edge stored in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Relationship label (e.g. "knows")
    pub label: String,

    /// Extra properties carried by the edge
    pub properties: PropertyMap,

    /// Source vertex (edge goes FROM this vertex)
    pub source: VertexIdx,

    /// Destination vertex (edge goes TO this vertex)
    pub target: VertexIdx,
}

impl Edge {
    pub(crate) fn new(
        label: impl Into<String>,
        properties: PropertyMap,
        source: VertexIdx,
        target: VertexIdx,
    ) -> Self {
        Edge {
            label: label.into(),
            properties,
            source,
            target,
        }
    }

    /// Resolve a key as edge filters see it: `_label` or a stored property
    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        if key == LABEL_KEY {
            return Some(PropertyValue::String(self.label.clone()));
        }
        self.properties.get(key).cloned()
    }

    /// Superset match of this edge against a filter object
    pub fn matches(&self, filter: &PropertyMap) -> bool {
        matches_filter(filter, |key| self.property(key))
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }
}

/// Input shape for edge insertion and the `E` entries of the wire format
///
/// Endpoints are given as vertex ids: `_out` is the source, `_in` the
/// destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(rename = "_label", default)]
    pub label: String,

    #[serde(rename = "_out")]
    pub source: VertexId,

    #[serde(rename = "_in")]
    pub target: VertexId,

    #[serde(flatten)]
    pub properties: PropertyMap,
}

impl EdgeData {
    /// Edge from `source` to `target` with the given label
    pub fn new(source: impl Into<VertexId>, label: impl Into<String>, target: impl Into<VertexId>) -> Self {
        EdgeData {
            label: label.into(),
            source: source.into(),
            target: target.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
