//! In-memory graph storage implementation
//!
//! Vertices and edges live in two arenas (`Vec`s) and refer to each other
//! by arena position. The id -> vertex map gives O(1) lookup by caller id.
//! Nothing is ever removed, so arena positions are stable for the lifetime
//! of the store.
//!
//! Traversals borrow the store immutably; mutating it while a query over it
//! is running is prevented by the borrow checker for in-process callers and
//! is otherwise the caller's responsibility.

use super::edge::{Edge, EdgeData};
use super::property::PropertyMap;
use super::types::{EdgeIdx, VertexId, VertexIdx};
use super::vertex::{Vertex, VertexData};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during graph construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} already exists")]
    DuplicateId(VertexId),

    #[error("Invalid edge: vertex {0} does not exist")]
    MissingEndpoint(VertexId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Which vertices a `vertex` step (or a caller) asks for
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VertexSelector {
    /// Every vertex, in insertion order
    #[default]
    All,
    /// Vertices by id, in the requested order, absent ids skipped
    Ids(Vec<VertexId>),
    /// Vertices whose properties are a superset of the filter
    Filter(PropertyMap),
}

/// In-memory graph storage
///
/// - vertices: arena of vertices, insertion order
/// - edges: arena of edges, insertion order
/// - index: VertexId -> arena position
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    index: FxHashMap<VertexId, VertexIdx>,
    /// Next candidate for a generated id
    next_id: i64,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Graph {
            vertices: Vec::new(),
            edges: Vec::new(),
            index: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Create a graph from vertex and edge lists.
    ///
    /// Rejected items are logged and skipped, exactly as the bulk insert
    /// methods do.
    pub fn from_parts(
        vertices: impl IntoIterator<Item = VertexData>,
        edges: impl IntoIterator<Item = EdgeData>,
    ) -> Self {
        let mut graph = Graph::new();
        graph.add_vertices(vertices);
        graph.add_edges(edges);
        graph
    }

    /// Insert a vertex, assigning a fresh id when none is supplied
    pub fn add_vertex(&mut self, data: VertexData) -> GraphResult<VertexId> {
        let id = match data.id {
            Some(id) => {
                if self.index.contains_key(&id) {
                    warn!("Rejected vertex: id {} already exists", id);
                    return Err(GraphError::DuplicateId(id));
                }
                id
            }
            None => self.fresh_id(),
        };

        let idx = VertexIdx::new(self.vertices.len());
        self.vertices.push(Vertex::new(id.clone(), data.properties));
        self.index.insert(id.clone(), idx);
        Ok(id)
    }

    /// Insert many vertices; one result per input, in order
    pub fn add_vertices(
        &mut self,
        vertices: impl IntoIterator<Item = VertexData>,
    ) -> Vec<GraphResult<VertexId>> {
        vertices.into_iter().map(|v| self.add_vertex(v)).collect()
    }

    /// Insert an edge between two existing vertices.
    ///
    /// Both endpoints are resolved before anything is touched, so a
    /// rejected edge leaves no partial adjacency behind.
    pub fn add_edge(&mut self, data: EdgeData) -> GraphResult<EdgeIdx> {
        let source = self.resolve_endpoint(&data.source)?;
        let target = self.resolve_endpoint(&data.target)?;

        let idx = EdgeIdx::new(self.edges.len());
        self.edges.push(Edge::new(data.label, data.properties, source, target));
        self.vertices[source.as_usize()].out_edges.push(idx);
        self.vertices[target.as_usize()].in_edges.push(idx);
        Ok(idx)
    }

    /// Insert many edges; one result per input, in order
    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = EdgeData>) -> Vec<GraphResult<EdgeIdx>> {
        edges.into_iter().map(|e| self.add_edge(e)).collect()
    }

    fn resolve_endpoint(&self, id: &VertexId) -> GraphResult<VertexIdx> {
        match self.index.get(id) {
            Some(idx) => Ok(*idx),
            None => {
                warn!("Rejected edge: vertex {} does not exist", id);
                Err(GraphError::MissingEndpoint(id.clone()))
            }
        }
    }

    /// Next generated id that no vertex uses yet
    fn fresh_id(&mut self) -> VertexId {
        loop {
            let candidate = VertexId::Integer(self.next_id);
            self.next_id += 1;
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Get a vertex by caller id
    pub fn find_vertex_by_id(&self, id: &VertexId) -> Option<&Vertex> {
        self.index.get(id).map(|idx| &self.vertices[idx.as_usize()])
    }

    /// Arena position of a vertex by caller id
    pub fn vertex_index(&self, id: &VertexId) -> Option<VertexIdx> {
        self.index.get(id).copied()
    }

    /// Resolve a selector to vertex positions (snapshot, caller owns it)
    pub fn find_vertices(&self, selector: &VertexSelector) -> Vec<VertexIdx> {
        match selector {
            VertexSelector::All => (0..self.vertices.len()).map(VertexIdx::new).collect(),
            VertexSelector::Ids(ids) if ids.len() == 1 => {
                self.vertex_index(&ids[0]).into_iter().collect()
            }
            VertexSelector::Ids(ids) => ids.iter().filter_map(|id| self.vertex_index(id)).collect(),
            VertexSelector::Filter(filter) => self
                .vertices
                .iter()
                .enumerate()
                .filter(|(_, v)| v.matches(filter))
                .map(|(i, _)| VertexIdx::new(i))
                .collect(),
        }
    }

    /// Get a vertex by arena position
    pub fn vertex(&self, idx: VertexIdx) -> &Vertex {
        &self.vertices[idx.as_usize()]
    }

    /// Get an edge by arena position
    pub fn edge(&self, idx: EdgeIdx) -> &Edge {
        &self.edges[idx.as_usize()]
    }

    /// Outgoing adjacency of a vertex (borrowed; do not mutate during a traversal)
    pub fn find_out_edges(&self, idx: VertexIdx) -> &[EdgeIdx] {
        self.vertex(idx).out_edges()
    }

    /// Incoming adjacency of a vertex
    pub fn find_in_edges(&self, idx: VertexIdx) -> &[EdgeIdx] {
        self.vertex(idx).in_edges()
    }

    /// All vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Wire-shaped copy of an edge (endpoints replaced by vertex ids)
    pub fn edge_data(&self, idx: EdgeIdx) -> EdgeData {
        let edge = self.edge(idx);
        EdgeData {
            label: edge.label.clone(),
            source: self.vertex(edge.source).id.clone(),
            target: self.vertex(edge.target).id.clone(),
            properties: edge.properties.clone(),
        }
    }

    /// Get total number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyValue;
    use crate::props;

    fn abc_graph() -> Graph {
        Graph::from_parts(
            vec![
                VertexData::with_id(1).property("name", "a"),
                VertexData::with_id(2).property("name", "b"),
                VertexData::with_id(3).property("name", "c"),
            ],
            vec![EdgeData::new(2, "knows", 1), EdgeData::new(3, "knows", 1)],
        )
    }

    #[test]
    fn test_add_vertex_assigns_fresh_id() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(VertexData::new()).unwrap();
        let b = graph.add_vertex(VertexData::new()).unwrap();
        assert_eq!(a, VertexId::Integer(1));
        assert_eq!(b, VertexId::Integer(2));
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn test_generated_id_skips_taken_ids() {
        let mut graph = Graph::new();
        graph.add_vertex(VertexData::with_id(1)).unwrap();
        graph.add_vertex(VertexData::with_id(2)).unwrap();
        let generated = graph.add_vertex(VertexData::new()).unwrap();
        assert_eq!(generated, VertexId::Integer(3));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut graph = Graph::new();
        graph.add_vertex(VertexData::with_id("x")).unwrap();
        let result = graph.add_vertex(VertexData::with_id("x").property("k", 1));
        assert_eq!(result, Err(GraphError::DuplicateId(VertexId::from("x"))));
        assert_eq!(graph.vertex_count(), 1);
        assert!(graph.find_vertex_by_id(&"x".into()).unwrap().properties.is_empty());
    }

    #[test]
    fn test_integer_and_string_ids_are_distinct() {
        let mut graph = Graph::new();
        graph.add_vertex(VertexData::with_id(1)).unwrap();
        graph.add_vertex(VertexData::with_id("1")).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.find_vertex_by_id(&"1".into()).map(|v| v.id.clone()), Some(VertexId::from("1")));
        assert_eq!(graph.find_vertex_by_id(&1.into()).map(|v| v.id.clone()), Some(VertexId::from(1)));
    }

    #[test]
    fn test_add_edge_populates_adjacency() {
        let graph = abc_graph();
        assert_eq!(graph.edge_count(), 2);

        let a = graph.vertex_index(&1.into()).unwrap();
        let b = graph.vertex_index(&2.into()).unwrap();
        assert_eq!(graph.find_in_edges(a).len(), 2);
        assert_eq!(graph.find_out_edges(a).len(), 0);
        assert_eq!(graph.find_out_edges(b).len(), 1);

        let edge = graph.edge(graph.find_out_edges(b)[0]);
        assert_eq!(edge.source, b);
        assert_eq!(edge.target, a);
    }

    #[test]
    fn test_missing_endpoint_rejected_without_partial_update() {
        let mut graph = abc_graph();
        let result = graph.add_edge(EdgeData::new(1, "knows", 99));
        assert_eq!(result, Err(GraphError::MissingEndpoint(VertexId::Integer(99))));
        assert_eq!(graph.edge_count(), 2);

        let a = graph.vertex_index(&1.into()).unwrap();
        assert!(graph.find_out_edges(a).is_empty());
    }

    #[test]
    fn test_bulk_insert_reports_each_outcome() {
        let mut graph = Graph::new();
        let results = graph.add_vertices(vec![
            VertexData::with_id(1),
            VertexData::with_id(1),
            VertexData::new(),
        ]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(VertexId::Integer(2)));
    }

    #[test]
    fn test_find_vertices_selectors() {
        let graph = abc_graph();

        let all = graph.find_vertices(&VertexSelector::All);
        assert_eq!(all.len(), 3);

        let one = graph.find_vertices(&VertexSelector::Ids(vec![2.into()]));
        assert_eq!(graph.vertex(one[0]).id, VertexId::Integer(2));

        let many = graph.find_vertices(&VertexSelector::Ids(vec![3.into(), 42.into(), 1.into()]));
        let ids: Vec<_> = many.iter().map(|i| graph.vertex(*i).id.clone()).collect();
        assert_eq!(ids, vec![VertexId::Integer(3), VertexId::Integer(1)]);

        let filtered = graph.find_vertices(&VertexSelector::Filter(props! { "name" => "c" }));
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            graph.vertex(filtered[0]).get_property("name"),
            Some(&PropertyValue::from("c"))
        );

        let none = graph.find_vertices(&VertexSelector::Ids(vec![7.into()]));
        assert!(none.is_empty());
    }

    #[test]
    fn test_edge_data_uses_vertex_ids() {
        let graph = abc_graph();
        let data = graph.edge_data(EdgeIdx::new(1));
        assert_eq!(data, EdgeData::new(3, "knows", 1));
    }
}
