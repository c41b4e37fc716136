//! Operator registry
//!
//! Holds the operator table and the transformer chain. A registry is built
//! once, extended by callers before any query runs, and then passed by
//! reference to every query.

use crate::config::AliasConfig;
use crate::query::args::Args;
use crate::query::operators;
use crate::query::pipetype::{pipetype, Pipetype};
use crate::query::program::Program;
use crate::query::rewrite::{self, Transformer, TransformerChain, ALIAS_PRIORITY};
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Query errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A step names an operator that was never registered
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Operator and transformer registry
#[derive(Clone)]
pub struct Registry {
    pipetypes: FxHashMap<String, Pipetype>,
    transformers: TransformerChain,
}

impl Registry {
    /// Empty registry with no operators at all
    pub fn new() -> Self {
        Registry {
            pipetypes: FxHashMap::default(),
            transformers: TransformerChain::new(),
        }
    }

    /// Registry seeded with the built-in operators
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, op) in operators::builtins() {
            registry.register_pipetype(name, op);
        }
        registry
    }

    /// Register (or replace) an operator under `name`
    pub fn register_pipetype(&mut self, name: impl Into<String>, op: Pipetype) {
        let name = name.into();
        debug!(operator = %name, "Registering operator");
        self.pipetypes.insert(name, op);
    }

    /// Strict lookup
    pub fn pipetype(&self, name: &str) -> QueryResult<Pipetype> {
        self.pipetypes
            .get(name)
            .cloned()
            .ok_or_else(|| QueryError::UnknownOperator(name.to_string()))
    }

    /// Lenient lookup: unknown names get an operator that never produces
    /// anything.
    pub fn lookup(&self, name: &str) -> Pipetype {
        self.pipetype(name).unwrap_or_else(|err| {
            warn!(operator = %name, "{}, substituting a no-op", err);
            pipetype(operators::faux)
        })
    }

    pub fn has_pipetype(&self, name: &str) -> bool {
        self.pipetypes.contains_key(name)
    }

    /// Registered operator names, sorted
    pub fn pipetype_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pipetypes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn register_transformer(&mut self, priority: i32, transformer: Transformer) {
        debug!(priority, "Registering transformer");
        self.transformers.register(priority, transformer);
    }

    /// Make `name` a shorthand for `target` with default arguments.
    pub fn register_alias(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        defaults: impl Into<Args>,
    ) {
        let name = name.into();
        let target = target.into();
        debug!(alias = %name, target = %target, "Registering alias");
        self.register_transformer(
            ALIAS_PRIORITY,
            rewrite::alias(name.clone(), target, defaults.into()),
        );
        self.register_pipetype(name, pipetype(operators::alias_placeholder));
    }

    /// `parents` and `children` over `parent` edges
    pub fn register_family_aliases(&mut self) {
        self.register_alias("parents", "out", "parent");
        self.register_alias("children", "in", "parent");
    }

    /// Register every alias listed in configuration
    pub fn register_configured_aliases(&mut self, aliases: &[AliasConfig]) {
        for alias in aliases {
            self.register_alias(
                alias.name.clone(),
                alias.target.clone(),
                Args::from(alias.defaults.clone()),
            );
        }
    }

    /// Apply the transformer chain
    pub fn transform(&self, program: Program) -> Program {
        self.transformers.rewrite(program)
    }

    pub fn transformers(&self) -> &TransformerChain {
        &self.transformers
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("pipetypes", &self.pipetype_names())
            .field("transformers", &self.transformers)
            .finish()
    }
}
