//! Round history: frozen record of one resolved round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::branch::Branch;
use super::ids::BranchId;

/// Direction of a token movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenChangeKind {
    Gained,
    Lost,
}

/// One token movement produced by winner selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenChange {
    pub branch_id: BranchId,
    #[serde(rename = "type")]
    pub kind: TokenChangeKind,
    pub amount: u64,
}

impl TokenChange {
    pub fn gained(branch_id: BranchId, amount: u64) -> Self {
        Self {
            branch_id,
            kind: TokenChangeKind::Gained,
            amount,
        }
    }

    pub fn lost(branch_id: BranchId, amount: u64) -> Self {
        Self {
            branch_id,
            kind: TokenChangeKind::Lost,
            amount,
        }
    }

    pub fn is_gain(&self) -> bool {
        self.kind == TokenChangeKind::Gained
    }
}

/// Frozen record of one resolved round.
///
/// Appended to `DecisionTree::history` once and never mutated afterwards.
/// `token_changes` holds one `Lost` entry per loser (input order) followed by
/// exactly one aggregated `Gained` entry for the winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundHistory {
    pub round: u32,

    /// Full branch set at resolution time, eliminated ones included.
    pub branches: Vec<Branch>,

    pub winner: Branch,
    pub timestamp: DateTime<Utc>,
    pub token_changes: Vec<TokenChange>,
}

impl RoundHistory {
    /// Total amount forfeited by the losers of this round.
    pub fn eliminated_total(&self) -> u64 {
        self.token_changes
            .iter()
            .filter(|c| !c.is_gain())
            .map(|c| c.amount)
            .sum()
    }
}
