//! Configuration
//!
//! Loaded from YAML; every field has a default, so an empty file (or no
//! file) is a valid configuration.
//!
//! ```yaml
//! logging:
//!   filter: "pullgraph=debug"
//!   ansi: false
//!
//! persistence:
//!   namespace: PULLGRAPH
//!   default_name: graph
//!   data_dir: ./data
//!
//! aliases:
//!   - name: friends
//!     target: out
//!     defaults: ["knows"]
//! ```

use crate::graph::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub persistence: PersistenceConfig,
    /// Aliases registered on top of the built-in operators
    pub aliases: Vec<AliasConfig>,
}

impl Config {
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Colored output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: true,
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Prefix of every storage key
    pub namespace: String,
    /// Graph name used when none is given
    pub default_name: String,
    /// Directory for the file-backed store
    pub data_dir: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            namespace: "PULLGRAPH".to_string(),
            default_name: "graph".to_string(),
            data_dir: None,
        }
    }
}

/// One alias: `name` rewrites to `target` with `defaults` filling missing
/// argument positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub defaults: Vec<PropertyValue>,
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter. Installing twice is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(false)
        .try_init();
}
