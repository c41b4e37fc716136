//! Programs: ordered lists of operator invocations

use crate::query::args::Args;
use std::fmt;

/// One operator invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub args: Args,
}

impl Step {
    pub fn new(name: impl Into<String>, args: impl Into<Args>) -> Self {
        Step {
            name: name.into(),
            args: args.into(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} args)", self.name, self.args.len())
    }
}

/// Ordered sequence of steps, built up by a query and consumed once
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    steps: Vec<Step>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the steps, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }

    /// Rebuild the program step by step
    pub fn map_steps<F>(self, f: F) -> Self
    where
        F: FnMut(Step) -> Step,
    {
        Program {
            steps: self.steps.into_iter().map(f).collect(),
        }
    }
}

impl From<Vec<Step>> for Program {
    fn from(steps: Vec<Step>) -> Self {
        Program { steps }
    }
}

impl FromIterator<Step> for Program {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Program {
            steps: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}
