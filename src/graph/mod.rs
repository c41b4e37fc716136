//! Core graph store
//!
//! This module implements the directed property graph the traversal
//! interpreter runs against:
//! - Vertices with caller-visible ids and open-ended property bags
//! - Labelled, directed edges with extra properties
//! - Arena storage with index-based cross references

pub mod edge;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::{Edge, EdgeData, LABEL_KEY};
pub use property::{matches_filter, PropertyMap, PropertyValue};
pub use store::{Graph, GraphError, GraphResult, VertexSelector};
pub use types::{EdgeIdx, VertexId, VertexIdx};
pub use vertex::{Vertex, VertexData, ID_KEY};
