//! Decision status state machine.

use serde::{Deserialize, Serialize};

/// Status of a decision tree.
///
/// State transitions:
/// - Running -> Running (round resolved, not the final one)
/// - Running -> Completed (final round resolved)
///
/// Completed is terminal. Paused is declared for the presentation layer but
/// nothing in the engine sets or checks it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    #[default]
    Running,
    Completed,
    Paused,
}

impl DecisionStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, DecisionStatus::Completed)
    }

    /// Can a round be resolved in this state?
    pub fn is_resolvable(self) -> bool {
        matches!(self, DecisionStatus::Running)
    }
}
