//! Query processing module
//!
//! A query is a program of `(operator, args)` steps. Running it rewrites
//! the program through the registry's transformer chain and then drives the
//! pull-based pipeline interpreter over the graph:
//!
//! - `registry`: operator table, transformers and aliases
//! - `operators`: the built-in operator library
//! - `interpreter`: the pull/done/backtrack machine
//! - `builder`: fluent front end (`graph.v(..).out(..).run()`)
//! - `parser`: textual traversal syntax

pub mod args;
pub mod builder;
pub mod gremlin;
pub mod interpreter;
pub mod operators;
pub mod parser;
pub mod pipetype;
pub mod program;
pub mod registry;
pub mod rewrite;
pub mod value;

// Re-export main types
pub use args::{Arg, Args, Predicate};
pub use builder::Query;
pub use gremlin::{Gremlin, GremlinState, SharedState};
pub use interpreter::{Execution, Pipeline};
pub use parser::{parse_traversal, ParseError, ParseResult};
pub use pipetype::{pipetype, Pipetype, Signal, StepState};
pub use program::{Program, Step};
pub use registry::{QueryError, QueryResult, Registry};
pub use rewrite::{Transformer, TransformerChain, ALIAS_PRIORITY};
pub use value::Value;

use crate::graph::Graph;

/// Parse `text` and run it against `graph`
pub fn run_traversal(graph: &Graph, registry: &Registry, text: &str) -> ParseResult<Execution> {
    let program = parse_traversal(text)?;
    Ok(Query::from_program(graph, registry, program).execute())
}
