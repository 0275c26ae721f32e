//! Decision tree: one decision instance under resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::branch::Branch;
use super::history::RoundHistory;
use super::ids::{BranchId, DecisionId};
use super::state::DecisionStatus;

/// One decision instance under resolution.
///
/// Design:
/// - Snapshots are values. Resolution reads a `&DecisionTree` and returns a
///   new one; earlier snapshots stay reachable through `history`.
/// - `branches` only holds the branches contesting `current_round`.
/// - `1 <= current_round <= total_rounds` and `total_tokens` never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTree {
    pub id: DecisionId,
    pub main_content: String,
    pub current_round: u32,
    pub total_rounds: u32,

    /// Fixed length of every round, in milliseconds.
    pub round_duration: u64,

    pub total_tokens: u64,
    pub branches: Vec<Branch>,
    pub round_start_time: DateTime<Utc>,
    pub status: DecisionStatus,
    pub history: Vec<RoundHistory>,
}

impl DecisionTree {
    pub fn is_completed(&self) -> bool {
        self.status == DecisionStatus::Completed
    }

    pub fn is_final_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    /// Number of resolved rounds. Used as the optimistic-lock version.
    pub fn version(&self) -> usize {
        self.history.len()
    }

    /// Winner of the most recently resolved round.
    pub fn last_winner(&self) -> Option<&Branch> {
        self.history.last().map(|h| &h.winner)
    }

    /// Winners of every resolved round, in round order.
    pub fn winner_path(&self) -> Vec<&BranchId> {
        self.history.iter().map(|h| &h.winner.id).collect()
    }

    /// Sum of the stakes currently held by the live branches.
    pub fn branch_tokens(&self) -> u64 {
        self.branches.iter().map(|b| b.tokens).sum()
    }
}
