//! Multi-round reward distribution.
//!
//! # Design
//! - Round `i` of `n` weighs `(i + 1) / n`, so the last round pays the full
//!   share of the final pool.
//! - Gains recorded in history are paid on top.
//! - Keys are round winners only; a tree with no history pays nothing.

use std::collections::BTreeMap;

use crate::domain::{BranchId, DecisionTree};

/// Share of the final pool paid per round (scaled by round weight).
pub const DEFAULT_REWARD_SHARE: f64 = 0.15;

/// Reward per round winner, using the standard 15% share.
pub fn calculate_rewards(tree: &DecisionTree) -> BTreeMap<BranchId, u64> {
    calculate_rewards_with_share(tree, DEFAULT_REWARD_SHARE)
}

/// Reward per round winner.
///
/// For history entry `i` of `n`, the round winner receives
/// `floor(total_tokens * ((i + 1) / n) * reward_share)`, so later rounds weigh
/// more and the last round weighs 1. Every `Gained` token change recorded in
/// history is added on top. Only branches that won a round appear as keys.
///
/// Meant for completed decisions; on a running one it pays out over the
/// partial history, and an unresolved decision yields an empty map.
pub fn calculate_rewards_with_share(
    tree: &DecisionTree,
    reward_share: f64,
) -> BTreeMap<BranchId, u64> {
    let mut rewards = BTreeMap::new();
    let rounds = tree.history.len();
    let pool = tree.total_tokens as f64;

    for (index, round) in tree.history.iter().enumerate() {
        let weight = (index + 1) as f64 / rounds as f64;
        let reward = (pool * weight * reward_share).floor() as u64;
        *rewards.entry(round.winner.id.clone()).or_insert(0) += reward;

        for change in round.token_changes.iter().filter(|c| c.is_gain()) {
            *rewards.entry(change.branch_id.clone()).or_insert(0) += change.amount;
        }
    }

    rewards
}
