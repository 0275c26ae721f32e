//! Status - serializable summary of a decision.

use serde::{Deserialize, Serialize};

use crate::domain::{Branch, BranchId, DecisionId, DecisionStatus, DecisionTree};

/// Decision status for listings and API responses.
///
/// A flat view of a `DecisionTree` without branch or history payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStatusView {
    pub id: DecisionId,
    pub main_content: String,
    pub status: DecisionStatus,
    pub current_round: u32,
    pub total_rounds: u32,
    pub total_tokens: u64,
    pub live_branches: usize,
    pub resolved_rounds: usize,

    /// Final winner once completed, otherwise the branch that would win if
    /// the round resolved now.
    pub leader: Option<BranchId>,

    pub round_started_at_ms: i64,
}

impl From<&DecisionTree> for DecisionStatusView {
    fn from(tree: &DecisionTree) -> Self {
        let leader = if tree.is_completed() {
            tree.last_winner().map(|w| w.id.clone())
        } else {
            current_leader(&tree.branches).map(|b| b.id.clone())
        };

        Self {
            id: tree.id,
            main_content: tree.main_content.clone(),
            status: tree.status,
            current_round: tree.current_round,
            total_rounds: tree.total_rounds,
            total_tokens: tree.total_tokens,
            live_branches: tree.branches.len(),
            resolved_rounds: tree.history.len(),
            leader,
            round_started_at_ms: tree.round_start_time.timestamp_millis(),
        }
    }
}

/// First branch holding the maximum stake, the same rule winner selection uses.
fn current_leader(branches: &[Branch]) -> Option<&Branch> {
    branches.iter().fold(None, |best: Option<&Branch>, b| match best {
        Some(current) if current.tokens >= b.tokens => Some(current),
        _ => Some(b),
    })
}
