//! Program rewriting
//!
//! Transformers are program-to-program functions applied once, before a
//! program runs, in descending priority order.

use crate::query::args::Args;
use crate::query::program::{Program, Step};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Priority every alias transformer is registered at
pub const ALIAS_PRIORITY: i32 = 100;

pub type TransformerFn = dyn Fn(Program) -> Program + Send + Sync;

/// Shared handle to a registered transformer
pub type Transformer = Arc<TransformerFn>;

#[derive(Clone)]
struct Entry {
    priority: i32,
    transform: Transformer,
}

/// Transformers ordered by descending priority
#[derive(Clone, Default)]
pub struct TransformerChain {
    entries: Vec<Entry>,
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert ahead of the first entry with a strictly lower priority, so
    /// equal priorities apply in registration order.
    pub fn register(&mut self, priority: i32, transform: Transformer) {
        let position = self
            .entries
            .iter()
            .position(|entry| priority > entry.priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, Entry { priority, transform });
    }

    /// Fold every transformer over the program, in order
    pub fn rewrite(&self, program: Program) -> Program {
        if !self.entries.is_empty() {
            debug!(transformers = self.entries.len(), steps = program.len(), "Rewriting program");
        }
        self.entries
            .iter()
            .fold(program, |acc, entry| (entry.transform)(acc))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Priorities in application order
    pub fn priorities(&self) -> Vec<i32> {
        self.entries.iter().map(|e| e.priority).collect()
    }
}

impl fmt::Debug for TransformerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerChain")
            .field("priorities", &self.priorities())
            .finish()
    }
}

/// Transformer turning every `name` step into `target`, with `defaults`
/// filling the argument positions the caller left out.
pub fn alias(name: impl Into<String>, target: impl Into<String>, defaults: Args) -> Transformer {
    let name = name.into();
    let target = target.into();
    Arc::new(move |program: Program| {
        program.map_steps(|step| {
            if step.name != name {
                return step;
            }
            Step {
                name: target.clone(),
                args: step.args.with_defaults(&defaults),
            }
        })
    })
}
