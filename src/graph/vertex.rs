//! Vertex implementation for the graph store
//!
//! A vertex owns its property bag and two adjacency lists of edge arena
//! positions. Adjacency is only ever appended to by the store.

use super::property::{matches_filter, PropertyMap, PropertyValue};
use super::types::{EdgeIdx, VertexId};
use serde::{Deserialize, Serialize};

/// Key under which the vertex id is exposed to filters and `property`
pub const ID_KEY: &str = "_id";

/// A vertex stored in the graph
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub id: VertexId,

    /// Properties associated with this vertex
    pub properties: PropertyMap,

    /// Outgoing edges, in insertion order
    pub(crate) out_edges: Vec<EdgeIdx>,

    /// Incoming edges, in insertion order
    pub(crate) in_edges: Vec<EdgeIdx>,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, properties: PropertyMap) -> Self {
        Vertex {
            id,
            properties,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }

    /// Get a stored property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Resolve a key the way filters and the `property` operator see it:
    /// `_id` yields the vertex id, anything else a stored property.
    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        if key == ID_KEY {
            return Some(self.id.to_value());
        }
        self.properties.get(key).cloned()
    }

    /// Superset match of this vertex against a filter object
    pub fn matches(&self, filter: &PropertyMap) -> bool {
        matches_filter(filter, |key| self.property(key))
    }

    /// Outgoing edge positions
    pub fn out_edges(&self) -> &[EdgeIdx] {
        &self.out_edges
    }

    /// Incoming edge positions
    pub fn in_edges(&self) -> &[EdgeIdx] {
        &self.in_edges
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Detached copy without adjacency, as handed to the codec
    pub fn to_data(&self) -> VertexData {
        VertexData {
            id: Some(self.id.clone()),
            properties: self.properties.clone(),
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

/// Input shape for vertex insertion and the `V` entries of the wire format
///
/// A missing `id` is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexData {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VertexId>,

    #[serde(flatten)]
    pub properties: PropertyMap,
}

impl VertexData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex data with a caller-chosen id
    pub fn with_id(id: impl Into<VertexId>) -> Self {
        VertexData {
            id: Some(id.into()),
            properties: PropertyMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties.extend(properties);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    #[test]
    fn test_virtual_id_property() {
        let vertex = Vertex::new(VertexId::from(4), props! { "name" => "d" });
        assert_eq!(vertex.property("_id"), Some(PropertyValue::Integer(4)));
        assert_eq!(vertex.property("name"), Some(PropertyValue::from("d")));
        assert_eq!(vertex.property("missing"), None);
        // `_id` is virtual
        assert_eq!(vertex.property_count(), 1);
    }

    #[test]
    fn test_vertex_matches_filter() {
        let vertex = Vertex::new(VertexId::from("x"), props! { "kind" => "person", "age" => 40 });
        assert!(vertex.matches(&props! { "kind" => "person" }));
        assert!(vertex.matches(&props! { "_id" => "x", "age" => 40 }));
        assert!(!vertex.matches(&props! { "kind" => "robot" }));
    }

    #[test]
    fn test_vertex_data_wire_shape() {
        let data = VertexData::with_id(1).property("name", "a");
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"_id":1,"name":"a"}"#);

        let back: VertexData = serde_json::from_str(r#"{"name":"b"}"#).unwrap();
        assert_eq!(back.id, None);
        assert_eq!(back.properties.get("name"), Some(&PropertyValue::from("b")));
    }

    #[test]
    fn test_vertex_equality_by_id() {
        let a = Vertex::new(VertexId::from(1), props! { "v" => 1 });
        let b = Vertex::new(VertexId::from(1), props! { "v" => 2 });
        let c = Vertex::new(VertexId::from(2), props! { "v" => 1 });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
