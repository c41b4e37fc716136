//! Operator (pipetype) contract
//!
//! Every operator has the same shape: it receives the graph, its step's
//! arguments, the gremlin flowing in from upstream (if any) and its own
//! step-scoped state, and answers with a [`Signal`].

use crate::graph::{EdgeIdx, Graph, PropertyMap, VertexIdx};
use crate::query::args::Args;
use crate::query::gremlin::{Gremlin, SharedState};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// What an operator hands back to the interpreter
#[derive(Debug, Clone)]
pub enum Signal {
    /// A gremlin to pass downstream
    Gremlin(Gremlin),
    /// Nothing right now; more upstream input could produce something
    Pull,
    /// Permanently exhausted for this execution
    Done,
    /// Input consumed, nothing produced
    Nothing,
}

impl Signal {
    pub fn is_pull(&self) -> bool {
        matches!(self, Signal::Pull)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Signal::Done)
    }

    pub fn into_gremlin(self) -> Option<Gremlin> {
        match self {
            Signal::Gremlin(g) => Some(g),
            _ => None,
        }
    }
}

impl From<Option<Gremlin>> for Signal {
    fn from(gremlin: Option<Gremlin>) -> Self {
        match gremlin {
            Some(g) => Signal::Gremlin(g),
            None => Signal::Nothing,
        }
    }
}

/// Private, step-scoped state that lives for one execution
///
/// Each built-in operator uses one variant; the interpreter hands every
/// step a `Fresh` slot and never looks inside.
#[derive(Debug, Default)]
pub enum StepState {
    #[default]
    Fresh,
    /// Cached vertices still to emit (`vertex`, `merge`), popped from the end
    Vertices {
        pending: Vec<VertexIdx>,
        origin: Option<SharedState>,
    },
    /// Buffered edges still to follow and the gremlin that produced them
    Edges {
        pending: Vec<EdgeIdx>,
        origin: Option<Gremlin>,
    },
    /// Vertices already seen (`unique`)
    Seen(FxHashSet<VertexIdx>),
    /// Running count (`take`)
    Count(usize),
    /// Free-form scratch space for operators registered by callers
    Custom(PropertyMap),
}

impl StepState {
    pub fn is_fresh(&self) -> bool {
        matches!(self, StepState::Fresh)
    }

    /// Scratch map for extension operators, created on first use
    pub fn custom(&mut self) -> &mut PropertyMap {
        if !matches!(self, StepState::Custom(_)) {
            *self = StepState::Custom(PropertyMap::new());
        }
        match self {
            StepState::Custom(map) => map,
            _ => unreachable!("state was just set to Custom"),
        }
    }
}

/// Uniform operator function type
pub type PipetypeFn = dyn Fn(&Graph, &Args, Option<Gremlin>, &mut StepState) -> Signal + Send + Sync;

/// Shared handle to a registered operator
pub type Pipetype = Arc<PipetypeFn>;

/// Wrap a closure as a [`Pipetype`]
pub fn pipetype<F>(f: F) -> Pipetype
where
    F: Fn(&Graph, &Args, Option<Gremlin>, &mut StepState) -> Signal + Send + Sync + 'static,
{
    Arc::new(f)
}
