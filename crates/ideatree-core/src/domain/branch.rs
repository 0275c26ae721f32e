//! Branch: one competing option within a round.

use serde::{Deserialize, Serialize};

use super::ids::BranchId;

/// Per-round result of a branch.
///
/// A single enum instead of two flags: a branch can never be winner and
/// eliminated at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchOutcome {
    /// Round not resolved yet.
    #[default]
    Contending,

    /// Held the most tokens when the round resolved.
    Winner,

    /// Lost the round and forfeited part of its stake.
    Eliminated,
}

/// One competing option within a round.
///
/// `tokens` is only changed by round resolution. `votes` is a display-only
/// tally derived from `tokens` and never decides the winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub content: String,
    pub tokens: u64,
    pub votes: u64,
    #[serde(default)]
    pub outcome: BranchOutcome,
    pub round: u32,

    /// Rendering only; the engine never reads it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Branch>,
}

impl Branch {
    pub fn new(id: BranchId, content: impl Into<String>, tokens: u64, round: u32) -> Self {
        Self {
            id,
            content: content.into(),
            tokens,
            votes: 0,
            outcome: BranchOutcome::Contending,
            round,
            children: Vec::new(),
        }
    }

    pub fn is_winner(&self) -> bool {
        self.outcome == BranchOutcome::Winner
    }

    pub fn is_eliminated(&self) -> bool {
        self.outcome == BranchOutcome::Eliminated
    }
}
