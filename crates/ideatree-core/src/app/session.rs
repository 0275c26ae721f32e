//! DecisionSession - caller-driven owner of one decision.
//!
//! The session replaces implicit timer state with an explicit state machine:
//! the host reports elapsed time through `tick`, or forces a resolution with
//! `resolve_now`. The session never reads the wall clock for scheduling.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::domain::{BranchId, DecisionTree, EngineError};
use crate::engine::DecisionEngine;

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running.
    Pending { time_left: Duration },

    /// `round` resolved and the next round started.
    Advanced { round: u32 },

    /// `round` was the final round; the decision is completed.
    Completed { round: u32 },

    /// Nothing to do: completed, cancelled or halted after an error.
    Idle,
}

/// Session state.
///
/// - `Counting`: countdown running, ticks may resolve.
/// - `Halted`: the last resolution failed; ticks are ignored until the caller
///   retries with `resolve_now` or gives up with `cancel`.
/// - `Cancelled`: terminal, the tree is never touched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Counting,
    Halted,
    Cancelled,
}

/// Owns one `DecisionTree` and its round countdown.
pub struct DecisionSession<R> {
    engine: DecisionEngine<R>,
    tree: DecisionTree,
    time_left: Duration,
    state: SessionState,
}

impl<R: Rng> DecisionSession<R> {
    /// Create a new decision for `main_topic` and start its first countdown.
    pub fn start(mut engine: DecisionEngine<R>, main_topic: impl Into<String>) -> Self {
        let tree = engine.create(main_topic);
        Self::from_tree(engine, tree)
    }

    /// Resume an existing snapshot with a full countdown.
    pub fn from_tree(engine: DecisionEngine<R>, tree: DecisionTree) -> Self {
        let time_left = Duration::from_millis(tree.round_duration);
        Self {
            engine,
            tree,
            time_left,
            state: SessionState::Counting,
        }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn into_tree(self) -> DecisionTree {
        self.tree
    }

    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == SessionState::Cancelled
    }

    pub fn rewards(&self) -> BTreeMap<BranchId, u64> {
        self.engine.rewards(&self.tree)
    }

    /// Advance the countdown by `elapsed`.
    ///
    /// When the countdown reaches zero the current round is resolved and the
    /// countdown restarts at the full round duration. At most one round
    /// resolves per tick; time past zero is not carried over.
    ///
    /// # Errors
    /// The resolution error, if any. The tree keeps its last-good snapshot
    /// and the session halts.
    pub fn tick(&mut self, elapsed: Duration) -> Result<TickOutcome, EngineError> {
        if self.state != SessionState::Counting || self.tree.is_completed() {
            return Ok(TickOutcome::Idle);
        }

        self.time_left = self.time_left.saturating_sub(elapsed);
        if !self.time_left.is_zero() {
            return Ok(TickOutcome::Pending {
                time_left: self.time_left,
            });
        }

        self.resolve()
    }

    /// Resolve the current round immediately, whatever the countdown says.
    ///
    /// This is also the explicit retry after a failed resolution. A completed
    /// or cancelled session returns `Idle` and keeps its state.
    pub fn resolve_now(&mut self) -> Result<TickOutcome, EngineError> {
        if self.state == SessionState::Cancelled || self.tree.is_completed() {
            return Ok(TickOutcome::Idle);
        }
        self.resolve()
    }

    /// Stop the session for good. Later ticks are no-ops.
    pub fn cancel(&mut self) {
        if self.state != SessionState::Cancelled {
            debug!(decision = %self.tree.id, round = self.tree.current_round, "session cancelled");
        }
        self.state = SessionState::Cancelled;
    }

    fn resolve(&mut self) -> Result<TickOutcome, EngineError> {
        let round = self.tree.current_round;
        match self.engine.resolve(&self.tree) {
            Ok(next) => {
                self.tree = next;
                self.state = SessionState::Counting;
                self.time_left = Duration::from_millis(self.tree.round_duration);
                if self.tree.is_completed() {
                    Ok(TickOutcome::Completed { round })
                } else {
                    Ok(TickOutcome::Advanced { round })
                }
            }
            Err(err) => {
                warn!(decision = %self.tree.id, round, error = %err, "round resolution failed");
                self.state = SessionState::Halted;
                Err(err)
            }
        }
    }
}
