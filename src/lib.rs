//! Pullgraph
//!
//! An embeddable in-memory graph database with a lazy, pull-based
//! traversal language in the Gremlin style.
//!
//! # Architecture
//!
//! - `graph`: vertex and edge arenas, id lookup, adjacency
//! - `query`: operator registry, program rewriting (transformers and
//!   aliases), the pipeline interpreter and the fluent query builder
//! - `persistence`: JSON wire format and named key-value stores
//! - `config`: YAML configuration and logging bootstrap
//!
//! A query is a list of `(operator, args)` steps. When it runs, the
//! interpreter starts at the last step and asks upstream for input only
//! when a step needs more, so no step ever materializes its whole output.
//!
//! ## Example Usage
//!
//! ```rust
//! use pullgraph::graph::{EdgeData, Graph, VertexData};
//! use pullgraph::query::{Registry, Value};
//! use pullgraph::PropertyValue;
//!
//! let graph = Graph::from_parts(
//!     vec![
//!         VertexData::with_id(1).property("name", "a"),
//!         VertexData::with_id(2).property("name", "b"),
//!         VertexData::with_id(3).property("name", "c"),
//!     ],
//!     vec![EdgeData::new(2, "knows", 1), EdgeData::new(3, "knows", 1)],
//! );
//!
//! let mut registry = Registry::builtin();
//! registry.register_alias("knowers", "in", "knows");
//!
//! let names = graph.v(&registry, 1).add("knowers", ()).property("name").run();
//! assert_eq!(
//!     names,
//!     vec![
//!         Value::Property(PropertyValue::from("c")),
//!         Value::Property(PropertyValue::from("b")),
//!     ]
//! );
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod persistence;
pub mod query;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeData, Graph, GraphError, GraphResult, PropertyMap, PropertyValue, Vertex,
    VertexData, VertexId,
};

pub use query::{
    parse_traversal, run_traversal, Arg, Args, Execution, ParseError, Query, QueryError,
    Registry, Value,
};

pub use persistence::{
    CodecError, FileStore, KeyValueStore, MemoryStore, PersistenceError, PersistenceManager,
    PersistenceResult, StorageError, StorageResult,
};

pub use config::{init_tracing, Config, ConfigError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
