//! Persistence layer
//!
//! Graphs are saved as their JSON wire form under a namespaced key in a
//! [`KeyValueStore`]. The codec and the stores know nothing about each
//! other; [`PersistenceManager`] ties them together.

pub mod codec;
pub mod storage;

pub use codec::{from_json, to_json, to_json_pretty, CodecError, CodecResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};

use crate::config::PersistenceConfig;
use crate::graph::Graph;
use thiserror::Error;
use tracing::{debug, info};

/// Saves and loads whole graphs by name
pub struct PersistenceManager<S: KeyValueStore> {
    store: S,
    namespace: String,
    default_name: String,
}

impl<S: KeyValueStore> PersistenceManager<S> {
    /// Manager with the default namespace and graph name
    pub fn new(store: S) -> Self {
        Self::with_config(store, &PersistenceConfig::default())
    }

    pub fn with_config(store: S, config: &PersistenceConfig) -> Self {
        info!(namespace = %config.namespace, "Initializing persistence manager");
        PersistenceManager {
            store,
            namespace: config.namespace.clone(),
            default_name: config.default_name.clone(),
        }
    }

    /// Storage key for `name`, or for the default name
    pub fn key(&self, name: Option<&str>) -> String {
        format!("{}::{}", self.namespace, name.unwrap_or(&self.default_name))
    }

    /// Serialize `graph` and store it
    pub fn persist(&mut self, graph: &Graph, name: Option<&str>) -> PersistenceResult<()> {
        let key = self.key(name);
        let text = codec::to_json(graph)?;
        self.store.store(&key, &text)?;
        debug!(key = %key, vertices = graph.vertex_count(), edges = graph.edge_count(), "Persisted graph");
        Ok(())
    }

    /// Load and decode a stored graph
    pub fn depersist(&self, name: Option<&str>) -> PersistenceResult<Graph> {
        let key = self.key(name);
        let text = self.store.retrieve(&key)?;
        let graph = codec::from_json(&text)?;
        debug!(key = %key, vertices = graph.vertex_count(), "Loaded graph");
        Ok(graph)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
