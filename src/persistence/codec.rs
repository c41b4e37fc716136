//! JSON wire format
//!
//! A graph is encoded as `{"V": [...], "E": [...]}`. Vertices carry `_id`
//! next to their properties; edges carry `_label`, `_out` (source id) and
//! `_in` (destination id). Adjacency is rebuilt on decode.

use crate::graph::{EdgeData, EdgeIdx, Graph, VertexData};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    /// Invalid JSON or a list entry of the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that is not a serialized graph
    #[error("Malformed graph: {0}")]
    Structure(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Serialize, Deserialize)]
struct WireGraph {
    #[serde(rename = "V")]
    vertices: Vec<VertexData>,
    #[serde(rename = "E")]
    edges: Vec<EdgeData>,
}

fn to_wire(graph: &Graph) -> WireGraph {
    WireGraph {
        vertices: graph.vertices().map(|v| v.to_data()).collect(),
        edges: (0..graph.edge_count())
            .map(|i| graph.edge_data(EdgeIdx::new(i)))
            .collect(),
    }
}

/// Encode a graph
pub fn to_json(graph: &Graph) -> CodecResult<String> {
    Ok(serde_json::to_string(&to_wire(graph))?)
}

/// Encode a graph with indentation
pub fn to_json_pretty(graph: &Graph) -> CodecResult<String> {
    Ok(serde_json::to_string_pretty(&to_wire(graph))?)
}

/// Decode a graph.
///
/// Text that is not JSON, lacks the `V`/`E` lists or has entries of the
/// wrong shape is an error. Well-formed entries the store rejects
/// (duplicate ids, edges to unknown vertices) are skipped with a warning.
pub fn from_json(text: &str) -> CodecResult<Graph> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        return Err(CodecError::Structure("expected an object with V and E lists".into()));
    };
    for key in ["V", "E"] {
        match object.get(key) {
            Some(serde_json::Value::Array(_)) => {}
            Some(_) => return Err(CodecError::Structure(format!("{} is not a list", key))),
            None => return Err(CodecError::Structure(format!("missing {} list", key))),
        }
    }
    let wire: WireGraph = serde_json::from_value(value)?;

    let mut graph = Graph::new();
    let rejected_vertices = graph
        .add_vertices(wire.vertices)
        .into_iter()
        .filter(Result::is_err)
        .count();
    let rejected_edges = graph
        .add_edges(wire.edges)
        .into_iter()
        .filter(Result::is_err)
        .count();
    if rejected_vertices + rejected_edges > 0 {
        warn!(
            vertices = rejected_vertices,
            edges = rejected_edges,
            "Skipped entries while decoding graph"
        );
    }
    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Decoded graph"
    );
    Ok(graph)
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = to_json(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
