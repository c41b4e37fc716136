//! Traversal tokens
//!
//! A gremlin sits on one vertex and carries a state map shared with every
//! gremlin descended from the same `vertex` seed. Bookmarks written by
//! `as` live in that shared state; the reportable result written by
//! `property` belongs to the individual gremlin.

use crate::graph::{PropertyValue, VertexIdx};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// State shared by a family of gremlins within one execution
#[derive(Debug, Default, Clone)]
pub struct GremlinState {
    /// Vertices recorded by `as`, keyed by bookmark label
    pub bookmarks: FxHashMap<String, VertexIdx>,
}

pub type SharedState = Rc<RefCell<GremlinState>>;

/// An ephemeral traversal token
#[derive(Debug, Clone)]
pub struct Gremlin {
    /// Vertex the gremlin currently occupies
    pub vertex: VertexIdx,
    /// Shared state (copy of the reference, not of the map)
    pub state: SharedState,
    /// Value a terminal step reports instead of the vertex
    pub result: Option<PropertyValue>,
}

impl Gremlin {
    /// Fresh gremlin with its own, empty state
    pub fn new(vertex: VertexIdx) -> Self {
        Gremlin {
            vertex,
            state: SharedState::default(),
            result: None,
        }
    }

    /// Gremlin on `vertex` sharing the given state
    pub fn with_state(vertex: VertexIdx, state: SharedState) -> Self {
        Gremlin {
            vertex,
            state,
            result: None,
        }
    }

    /// New gremlin on `vertex` that inherits this one's shared state
    pub fn goto(&self, vertex: VertexIdx) -> Self {
        Gremlin::with_state(vertex, Rc::clone(&self.state))
    }

    /// Record the current vertex under `label`
    pub fn bookmark(&self, label: impl Into<String>) {
        self.state.borrow_mut().bookmarks.insert(label.into(), self.vertex);
    }

    /// Vertex recorded under `label`, if any
    pub fn bookmarked(&self, label: &str) -> Option<VertexIdx> {
        self.state.borrow().bookmarks.get(label).copied()
    }
}
