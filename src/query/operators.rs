//! Built-in operator library
//!
//! Operators are plain functions with the [`Pipetype`] signature. Filters
//! drop a gremlin by answering `Pull`, which sends the interpreter back
//! upstream for the next one.
//!
//! [`Pipetype`]: crate::query::pipetype::Pipetype

use crate::graph::{Edge, Graph, PropertyMap, PropertyValue, VertexIdx};
use crate::query::args::{Arg, Args};
use crate::query::gremlin::Gremlin;
use crate::query::pipetype::{pipetype, Pipetype, Signal, StepState};
use std::rc::Rc;

/// Traversal direction for `out` / `in`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Out,
    In,
}

/// `vertex(ids... | filter)`: source step.
///
/// Resolves its arguments once per execution, then emits one fresh gremlin
/// per call, popping from the end of the cached list.
pub fn vertex(graph: &Graph, args: &Args, _input: Option<Gremlin>, state: &mut StepState) -> Signal {
    if state.is_fresh() {
        *state = StepState::Vertices {
            pending: graph.find_vertices(&args.vertex_selector()),
            origin: None,
        };
    }
    let StepState::Vertices { pending, .. } = state else {
        return Signal::Done;
    };
    match pending.pop() {
        Some(v) => Signal::Gremlin(Gremlin::new(v)),
        None => Signal::Done,
    }
}

/// Edge label filter of `out` / `in`
#[derive(Debug, Clone, Copy)]
enum EdgeFilter<'a> {
    Any,
    Label(&'a str),
    Labels(&'a [String]),
    Properties(&'a PropertyMap),
}

impl<'a> EdgeFilter<'a> {
    fn from_args(args: &'a Args) -> Self {
        match args.first() {
            Some(Arg::Value(PropertyValue::String(label))) => EdgeFilter::Label(label),
            Some(Arg::Labels(labels)) => EdgeFilter::Labels(labels),
            Some(Arg::Filter(filter)) => EdgeFilter::Properties(filter),
            _ => EdgeFilter::Any,
        }
    }

    fn accepts(&self, edge: &Edge) -> bool {
        match self {
            EdgeFilter::Any => true,
            EdgeFilter::Label(label) => edge.has_label(label),
            EdgeFilter::Labels(labels) => labels.iter().any(|l| edge.has_label(l)),
            EdgeFilter::Properties(filter) => edge.matches(filter),
        }
    }
}

/// `out(filter)` / `in(filter)`: follow adjacency in one direction.
///
/// One input gremlin fills the edge buffer; every following call pops one
/// edge (last first) and emits a gremlin on its far end sharing the
/// originating gremlin's state.
pub fn traversal(direction: Direction) -> Pipetype {
    pipetype(move |graph, args, input, state| {
        let buffered = matches!(state, StepState::Edges { pending, .. } if !pending.is_empty());
        if !buffered {
            let Some(gremlin) = input else {
                return Signal::Pull;
            };
            let filter = EdgeFilter::from_args(args);
            let adjacency = match direction {
                Direction::Out => graph.find_out_edges(gremlin.vertex),
                Direction::In => graph.find_in_edges(gremlin.vertex),
            };
            let pending = adjacency
                .iter()
                .copied()
                .filter(|e| filter.accepts(graph.edge(*e)))
                .collect();
            *state = StepState::Edges {
                pending,
                origin: Some(gremlin),
            };
        }

        let StepState::Edges {
            pending,
            origin: Some(origin),
        } = state
        else {
            return Signal::Pull;
        };
        match pending.pop() {
            Some(e) => {
                let edge = graph.edge(e);
                let far = match direction {
                    Direction::Out => edge.target,
                    Direction::In => edge.source,
                };
                Signal::Gremlin(origin.goto(far))
            }
            None => Signal::Pull,
        }
    })
}

/// `property(key)`: report a property instead of the vertex; drops
/// gremlins whose vertex lacks it.
pub fn property(graph: &Graph, args: &Args, input: Option<Gremlin>, _state: &mut StepState) -> Signal {
    let Some(mut gremlin) = input else {
        return Signal::Pull;
    };
    let Some(key) = args.first().and_then(bookmark_label) else {
        return Signal::Nothing;
    };
    match graph.vertex(gremlin.vertex).property(&key) {
        Some(value) if !value.is_null() => {
            gremlin.result = Some(value);
            Signal::Gremlin(gremlin)
        }
        _ => Signal::Nothing,
    }
}

/// `filter(object | predicate)`: anything else lets every gremlin through
pub fn filter(graph: &Graph, args: &Args, input: Option<Gremlin>, _state: &mut StepState) -> Signal {
    let Some(gremlin) = input else {
        return Signal::Pull;
    };
    let keep = match args.first() {
        Some(Arg::Filter(filter)) => graph.vertex(gremlin.vertex).matches(filter),
        Some(Arg::Predicate(predicate)) => predicate.test(graph.vertex(gremlin.vertex), &gremlin),
        _ => true,
    };
    if keep {
        Signal::Gremlin(gremlin)
    } else {
        Signal::Pull
    }
}

/// `unique()`: first visit of each vertex passes
pub fn unique(_graph: &Graph, _args: &Args, input: Option<Gremlin>, state: &mut StepState) -> Signal {
    let Some(gremlin) = input else {
        return Signal::Pull;
    };
    if !matches!(state, StepState::Seen(_)) {
        *state = StepState::Seen(Default::default());
    }
    let StepState::Seen(seen) = state else {
        return Signal::Pull;
    };
    if seen.insert(gremlin.vertex) {
        Signal::Gremlin(gremlin)
    } else {
        Signal::Pull
    }
}

/// `take(n)`: pass at most `n` gremlins, then report `Done` on the next call
pub fn take(_graph: &Graph, args: &Args, input: Option<Gremlin>, state: &mut StepState) -> Signal {
    let limit = args.first().and_then(Arg::as_value).and_then(count_of);
    if !matches!(state, StepState::Count(_)) {
        *state = StepState::Count(0);
    }
    let StepState::Count(taken) = state else {
        return Signal::Done;
    };
    if Some(*taken) == limit {
        *taken = 0;
        return Signal::Done;
    }
    let Some(gremlin) = input else {
        return Signal::Pull;
    };
    *taken += 1;
    Signal::Gremlin(gremlin)
}

/// `as(label)`: bookmark the current vertex in the shared state
pub fn as_(_graph: &Graph, args: &Args, input: Option<Gremlin>, _state: &mut StepState) -> Signal {
    let Some(gremlin) = input else {
        return Signal::Pull;
    };
    if let Some(label) = args.first().and_then(bookmark_label) {
        gremlin.bookmark(label);
    }
    Signal::Gremlin(gremlin)
}

/// `merge(labels...)`: emit the bookmarked vertices of the incoming gremlin
pub fn merge(_graph: &Graph, args: &Args, input: Option<Gremlin>, state: &mut StepState) -> Signal {
    let buffered = matches!(state, StepState::Vertices { pending, .. } if !pending.is_empty());
    if !buffered {
        let Some(gremlin) = input else {
            return Signal::Pull;
        };
        let pending = args
            .iter()
            .filter_map(bookmark_label)
            .filter_map(|label| gremlin.bookmarked(&label))
            .collect();
        *state = StepState::Vertices {
            pending,
            origin: Some(Rc::clone(&gremlin.state)),
        };
    }

    let StepState::Vertices { pending, origin } = state else {
        return Signal::Pull;
    };
    match pending.pop() {
        Some(v) => Signal::Gremlin(Gremlin::with_state(v, origin.clone().unwrap_or_default())),
        None => Signal::Pull,
    }
}

/// `except(label)`: drop the gremlin if it sits on the bookmarked vertex
pub fn except(_graph: &Graph, args: &Args, input: Option<Gremlin>, _state: &mut StepState) -> Signal {
    let Some(gremlin) = input else {
        return Signal::Pull;
    };
    let excluded: Option<VertexIdx> = args
        .first()
        .and_then(bookmark_label)
        .and_then(|label| gremlin.bookmarked(&label));
    if excluded == Some(gremlin.vertex) {
        Signal::Pull
    } else {
        Signal::Gremlin(gremlin)
    }
}

/// `back(label)`: jump to the bookmarked vertex, keeping the shared state
pub fn back(_graph: &Graph, args: &Args, input: Option<Gremlin>, _state: &mut StepState) -> Signal {
    let Some(gremlin) = input else {
        return Signal::Pull;
    };
    match args
        .first()
        .and_then(bookmark_label)
        .and_then(|label| gremlin.bookmarked(&label))
    {
        Some(target) => Signal::Gremlin(gremlin.goto(target)),
        // nothing recorded under that label
        None => Signal::Pull,
    }
}

/// Stand-in for names missing from the registry: never produces anything
pub fn faux(_graph: &Graph, _args: &Args, _input: Option<Gremlin>, _state: &mut StepState) -> Signal {
    Signal::Pull
}

/// Registered under alias names; rewriting replaces it before execution
pub fn alias_placeholder(
    _graph: &Graph,
    _args: &Args,
    input: Option<Gremlin>,
    _state: &mut StepState,
) -> Signal {
    match input {
        Some(gremlin) => Signal::Gremlin(gremlin),
        None => Signal::Pull,
    }
}

/// The built-in operator set, by name
pub fn builtins() -> Vec<(&'static str, Pipetype)> {
    vec![
        ("vertex", pipetype(vertex)),
        ("out", traversal(Direction::Out)),
        ("in", traversal(Direction::In)),
        ("property", pipetype(property)),
        ("filter", pipetype(filter)),
        ("unique", pipetype(unique)),
        ("take", pipetype(take)),
        ("as", pipetype(as_)),
        ("merge", pipetype(merge)),
        ("except", pipetype(except)),
        ("back", pipetype(back)),
    ]
}

/// Labels and keys may be given as strings or integers
fn bookmark_label(arg: &Arg) -> Option<String> {
    match arg.as_value()? {
        PropertyValue::String(s) => Some(s.clone()),
        PropertyValue::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

fn count_of(value: &PropertyValue) -> Option<usize> {
    match value.as_integer() {
        Some(n) => usize::try_from(n).ok(),
        None => value
            .as_float()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as usize),
    }
}
