//! Pipeline interpreter
//!
//! Runs a rewritten program as a demand-driven state machine. The program
//! counter starts on the last step; a step answering `Pull` sends it one
//! step left to ask for more input, a produced gremlin moves it right, and
//! gremlins falling off the right end are results. Execution ends once
//! every step up to the last is known to be exhausted.
//!
//! [`Pipeline`] is an iterator, so the machine stops between results and
//! resumes exactly where it left off.

use crate::graph::Graph;
use crate::query::args::Args;
use crate::query::gremlin::Gremlin;
use crate::query::pipetype::{Pipetype, Signal, StepState};
use crate::query::program::Program;
use crate::query::registry::{QueryError, Registry};
use crate::query::value::Value;
use tracing::debug;

/// Results of a complete run together with the non-fatal problems met
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
    pub values: Vec<Value>,
    pub warnings: Vec<QueryError>,
}

struct CompiledStep {
    name: String,
    op: Pipetype,
    args: Args,
}

/// A running program
pub struct Pipeline<'g> {
    graph: &'g Graph,
    steps: Vec<CompiledStep>,
    states: Vec<StepState>,
    pc: usize,
    /// Highest step index known to be exhausted, -1 for none
    done: isize,
    signal: Option<Gremlin>,
    warnings: Vec<QueryError>,
    invocations: usize,
    emitted: usize,
    finished: bool,
}

impl<'g> Pipeline<'g> {
    /// Rewrite `program` and resolve every step against `registry`.
    ///
    /// Unknown operator names are recorded as warnings and replaced by an
    /// operator that never produces anything.
    pub fn new(graph: &'g Graph, registry: &Registry, program: Program) -> Self {
        let program = registry.transform(program);
        let mut warnings = Vec::new();
        let steps: Vec<CompiledStep> = program
            .into_iter()
            .map(|step| {
                let op = match registry.pipetype(&step.name) {
                    Ok(op) => op,
                    Err(err) => {
                        warnings.push(err);
                        registry.lookup(&step.name)
                    }
                };
                CompiledStep {
                    name: step.name,
                    op,
                    args: step.args,
                }
            })
            .collect();

        let states = steps.iter().map(|_| StepState::default()).collect();
        Pipeline {
            graph,
            pc: steps.len().saturating_sub(1),
            steps,
            states,
            done: -1,
            signal: None,
            warnings,
            invocations: 0,
            emitted: 0,
            finished: false,
        }
    }

    /// Problems found while compiling the program
    pub fn warnings(&self) -> &[QueryError] {
        &self.warnings
    }

    /// Names of the steps after rewriting
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }

    /// Run to completion
    pub fn into_execution(mut self) -> Execution {
        let values = self.by_ref().collect();
        Execution {
            values,
            warnings: self.warnings,
        }
    }

    /// Drive the machine until the next gremlin leaves the last step
    fn advance(&mut self) -> Option<Gremlin> {
        let max = self.steps.len() as isize - 1;
        while self.done < max {
            let pc = self.pc;
            let step = &self.steps[pc];
            let signal = (step.op)(self.graph, &step.args, self.signal.take(), &mut self.states[pc]);
            self.invocations += 1;

            let mut carried = None;
            match signal {
                Signal::Pull => {
                    if pc as isize - 1 > self.done {
                        self.pc -= 1;
                        continue;
                    }
                    self.done = pc as isize;
                }
                Signal::Done => self.done = pc as isize,
                Signal::Gremlin(gremlin) => carried = Some(gremlin),
                Signal::Nothing => {}
            }

            if pc as isize == max {
                if carried.is_some() {
                    self.emitted += 1;
                    return carried;
                }
            } else {
                self.pc += 1;
                self.signal = carried;
            }
        }

        if !self.finished {
            self.finished = true;
            debug!(
                steps = self.steps.len(),
                invocations = self.invocations,
                results = self.emitted,
                "Pipeline exhausted"
            );
        }
        None
    }

    fn materialize(&self, gremlin: Gremlin) -> Value {
        match gremlin.result {
            Some(result) => Value::Property(result),
            None => Value::Vertex(self.graph.vertex(gremlin.vertex).clone()),
        }
    }
}

impl Iterator for Pipeline<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let gremlin = self.advance()?;
        Some(self.materialize(gremlin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::graph::{EdgeData, PropertyValue, VertexData};
    use crate::query::pipetype::pipetype;
    use crate::query::program::Step;

    fn graph() -> Graph {
        Graph::from_parts(
            vec![
                VertexData::with_id(1).property("name", "a"),
                VertexData::with_id(2).property("name", "b"),
                VertexData::with_id(3).property("name", "c"),
            ],
            vec![EdgeData::new(2, "knows", 1), EdgeData::new(3, "knows", 1)],
        )
    }

    fn names(values: &[Value]) -> Vec<String> {
        values
            .iter()
            .filter_map(|v| v.as_property().and_then(PropertyValue::as_string).map(String::from))
            .collect()
    }

    #[test]
    fn test_empty_program_yields_nothing() {
        let graph = graph();
        let registry = Registry::builtin();
        let execution = Pipeline::new(&graph, &registry, Program::new()).into_execution();
        assert!(execution.values.is_empty());
        assert!(execution.warnings.is_empty());
    }

    #[test]
    fn test_single_source_step_emits_last_first() {
        let graph = graph();
        let registry = Registry::builtin();
        let program: Program = vec![Step::new("vertex", ())].into();
        let ids: Vec<String> = Pipeline::new(&graph, &registry, program)
            .filter_map(|v| v.as_vertex().map(|v| v.id.to_string()))
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_in_then_property() {
        let graph = graph();
        let registry = Registry::builtin();
        let program: Program = vec![
            Step::new("vertex", args![1]),
            Step::new("in", args!["knows"]),
            Step::new("property", args!["name"]),
        ]
        .into();
        let values: Vec<Value> = Pipeline::new(&graph, &registry, program).collect();
        assert_eq!(names(&values), vec!["c", "b"]);
    }

    #[test]
    fn test_pipeline_is_lazy() {
        let graph = graph();
        let mut registry = Registry::builtin();
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        registry.register_pipetype(
            "count",
            pipetype(move |_, _, input, _| match input {
                Some(g) => {
                    counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Signal::Gremlin(g)
                }
                None => Signal::Pull,
            }),
        );
        let program: Program = vec![Step::new("vertex", ()), Step::new("count", ())].into();
        let mut pipeline = Pipeline::new(&graph, &registry, program);

        assert!(pipeline.next().is_some());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(pipeline.by_ref().count(), 2);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unknown_operator_is_reported_not_fatal() {
        let graph = graph();
        let registry = Registry::builtin();
        let program: Program = vec![Step::new("vertex", ()), Step::new("bogus", ())].into();
        let execution = Pipeline::new(&graph, &registry, program).into_execution();
        assert!(execution.values.is_empty());
        assert_eq!(execution.warnings, vec![QueryError::UnknownOperator("bogus".into())]);
    }

    #[test]
    fn test_step_names_after_rewrite() {
        let graph = graph();
        let mut registry = Registry::builtin();
        registry.register_family_aliases();
        let program: Program = vec![Step::new("vertex", ()), Step::new("children", ())].into();
        let pipeline = Pipeline::new(&graph, &registry, program);
        assert_eq!(pipeline.step_names().collect::<Vec<_>>(), vec!["vertex", "in"]);
    }
}
