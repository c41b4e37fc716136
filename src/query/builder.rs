//! Fluent query builder
//!
//! A [`Query`] only collects steps; nothing touches the graph until
//! [`Query::run`], [`Query::execute`] or [`Query::stream`].
//!
//! ```
//! use pullgraph::graph::{EdgeData, Graph, VertexData};
//! use pullgraph::query::Registry;
//!
//! let graph = Graph::from_parts(
//!     vec![VertexData::with_id(1).property("name", "a"), VertexData::with_id(2).property("name", "b")],
//!     vec![EdgeData::new(2, "knows", 1)],
//! );
//! let registry = Registry::builtin();
//! let names = graph.v(&registry, 1).in_("knows").property("name").run();
//! assert_eq!(names.len(), 1);
//! ```

use crate::graph::{Graph, Vertex};
use crate::query::args::{Arg, Args};
use crate::query::gremlin::Gremlin;
use crate::query::interpreter::{Execution, Pipeline};
use crate::query::program::{Program, Step};
use crate::query::registry::Registry;
use crate::query::value::Value;

/// A program under construction, bound to a graph and a registry
#[derive(Debug, Clone)]
pub struct Query<'g> {
    graph: &'g Graph,
    registry: &'g Registry,
    program: Program,
}

impl<'g> Query<'g> {
    /// Query with an empty program
    pub fn new(graph: &'g Graph, registry: &'g Registry) -> Self {
        Self::from_program(graph, registry, Program::new())
    }

    /// Query over an already built (e.g. parsed) program
    pub fn from_program(graph: &'g Graph, registry: &'g Registry, program: Program) -> Self {
        Query {
            graph,
            registry,
            program,
        }
    }

    /// Append any registered operator, including aliases and extensions
    pub fn add(mut self, name: impl Into<String>, args: impl Into<Args>) -> Self {
        self.program.push(Step::new(name, args));
        self
    }

    pub fn vertex(self, args: impl Into<Args>) -> Self {
        self.add("vertex", args)
    }

    pub fn out(self, labels: impl Into<Args>) -> Self {
        self.add("out", labels)
    }

    pub fn in_(self, labels: impl Into<Args>) -> Self {
        self.add("in", labels)
    }

    pub fn property(self, key: impl Into<Args>) -> Self {
        self.add("property", key)
    }

    pub fn filter(self, predicate: impl Into<Args>) -> Self {
        self.add("filter", predicate)
    }

    /// `filter` with a closure
    pub fn filter_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Vertex, &Gremlin) -> bool + Send + Sync + 'static,
    {
        self.add("filter", Arg::predicate(f))
    }

    pub fn unique(self) -> Self {
        self.add("unique", ())
    }

    pub fn take(self, n: usize) -> Self {
        self.add("take", n)
    }

    pub fn as_(self, label: impl Into<Args>) -> Self {
        self.add("as", label)
    }

    pub fn merge(self, labels: impl Into<Args>) -> Self {
        self.add("merge", labels)
    }

    pub fn except(self, label: impl Into<Args>) -> Self {
        self.add("except", label)
    }

    pub fn back(self, label: impl Into<Args>) -> Self {
        self.add("back", label)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn into_program(self) -> Program {
        self.program
    }

    /// Rewrite and start the program; results are produced on demand
    pub fn stream(self) -> Pipeline<'g> {
        Pipeline::new(self.graph, self.registry, self.program)
    }

    /// Run to completion, reporting compile warnings alongside the values
    pub fn execute(self) -> Execution {
        self.stream().into_execution()
    }

    /// Run to completion
    pub fn run(self) -> Vec<Value> {
        self.stream().collect()
    }
}

impl Graph {
    /// Start a query at the vertices selected by `args`: nothing for all
    /// vertices, one or more ids, or a property filter.
    pub fn v<'g>(&'g self, registry: &'g Registry, args: impl Into<Args>) -> Query<'g> {
        Query::new(self, registry).vertex(args)
    }
}
