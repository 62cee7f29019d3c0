use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cube, CubeCommand, Die, DieCommand, Grid, GridCommand};

/// A configuration that commands can be folded over.
///
/// `apply` must be pure: the receiver is left unmodified and the returned
/// state is structurally independent, so recorded snapshots never alias.
pub trait Transformable: Clone {
    type Command: fmt::Display + fmt::Debug + Clone;

    #[must_use]
    fn apply(&self, command: &Self::Command) -> Self;
}

impl Transformable for Grid {
    type Command = GridCommand;

    fn apply(&self, command: &Self::Command) -> Self {
        Grid::apply(self, command)
    }
}

impl Transformable for Die {
    type Command = DieCommand;

    fn apply(&self, command: &Self::Command) -> Self {
        Die::apply(self, command)
    }
}

impl Transformable for Cube {
    type Command = CubeCommand;

    fn apply(&self, command: &Self::Command) -> Self {
        Cube::apply(self, command)
    }
}

/// One entry of the audit trail: the snapshot after applying the command
/// whose description is recorded alongside it.
///
/// Step 0 carries the sentinel description `"start"` and the initial
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep<S> {
    index: usize,
    description: String,
    snapshot: S,
}

impl<S> ReplayStep<S> {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }
}

/// The recorded run of one command sequence.
///
/// Built once by [`Replay::run`], read-only afterward. Always holds
/// `commands.len() + 1` steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay<S> {
    steps: Vec<ReplayStep<S>>,
}

impl<S: Transformable> Replay<S> {
    /// Folds the commands left-to-right over the initial configuration,
    /// recording a snapshot after every step.
    ///
    /// Never fails for well-formed commands and draws no randomness; all
    /// randomness was resolved when the commands were generated.
    pub fn run(initial: S, commands: &[S::Command]) -> Self {
        let mut steps = Vec::with_capacity(commands.len() + 1);
        let mut current = initial.clone();
        steps.push(ReplayStep {
            index: 0,
            description: "start".to_owned(),
            snapshot: initial,
        });
        for (i, command) in commands.iter().enumerate() {
            current = current.apply(command);
            steps.push(ReplayStep {
                index: i + 1,
                description: command.to_string(),
                snapshot: current.clone(),
            });
        }
        Self { steps }
    }
}

impl<S> Replay<S> {
    #[must_use]
    pub fn steps(&self) -> &[ReplayStep<S>] {
        &self.steps
    }

    /// Number of recorded steps, including the start sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A replay always holds at least the start step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn initial(&self) -> &S {
        &self.steps[0].snapshot
    }

    #[must_use]
    pub fn final_state(&self) -> &S {
        &self.steps[self.steps.len() - 1].snapshot
    }
}
