//! Winner selection and token redistribution.
//!
//! # Errors
//! - `EliminationRateOutOfBounds` for a rate outside `[0, 1]`
//! - `EmptyBranchSet` for an empty round

use crate::domain::{Branch, BranchOutcome, EngineError, TokenChange};

/// Result of one winner selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Input branches with outcomes set and tokens redistributed.
    pub branches: Vec<Branch>,

    /// Index of the winner in `branches`.
    pub winner_index: usize,

    /// One `Lost` per loser in input order, then one `Gained` for the winner.
    pub token_changes: Vec<TokenChange>,
}

impl Selection {
    pub fn winner(&self) -> &Branch {
        &self.branches[self.winner_index]
    }

    pub fn eliminated_total(&self) -> u64 {
        self.token_changes
            .iter()
            .filter(|c| !c.is_gain())
            .map(|c| c.amount)
            .sum()
    }
}

/// Amount a loser forfeits: `floor(tokens * rate)`, never more than `tokens`.
pub fn forfeit(tokens: u64, elimination_rate: f64) -> u64 {
    ((tokens as f64 * elimination_rate).floor() as u64).min(tokens)
}

/// Pick the round winner and move forfeited tokens to it.
///
/// The winner is the first branch, in input order, holding the maximum token
/// count (later branches only take over on a strictly greater count). Every
/// other branch is eliminated and loses `forfeit(tokens, elimination_rate)`;
/// the winner gains the sum on top of its own stake, so total token mass is
/// unchanged.
///
/// # Errors
/// - `EngineError::EliminationRateOutOfBounds` unless the rate is a finite
///   value in `[0, 1]`.
/// - `EngineError::EmptyBranchSet` when `branches` is empty.
pub fn select_winner(
    branches: &[Branch],
    elimination_rate: f64,
) -> Result<Selection, EngineError> {
    if !(0.0..=1.0).contains(&elimination_rate) {
        return Err(EngineError::EliminationRateOutOfBounds(elimination_rate));
    }
    if branches.is_empty() {
        return Err(EngineError::EmptyBranchSet);
    }

    let mut winner_index = 0;
    for (i, branch) in branches.iter().enumerate() {
        if branch.tokens > branches[winner_index].tokens {
            winner_index = i;
        }
    }

    let mut token_changes = Vec::with_capacity(branches.len());
    let mut eliminated_total = 0;
    let mut updated: Vec<Branch> = branches
        .iter()
        .enumerate()
        .map(|(i, branch)| {
            if i == winner_index {
                return Branch {
                    outcome: BranchOutcome::Winner,
                    ..branch.clone()
                };
            }
            let lost = forfeit(branch.tokens, elimination_rate);
            eliminated_total += lost;
            token_changes.push(TokenChange::lost(branch.id.clone(), lost));
            Branch {
                tokens: branch.tokens - lost,
                outcome: BranchOutcome::Eliminated,
                ..branch.clone()
            }
        })
        .collect();

    let winner = &mut updated[winner_index];
    winner.tokens += eliminated_total;
    token_changes.push(TokenChange::gained(winner.id.clone(), eliminated_total));

    Ok(Selection {
        branches: updated,
        winner_index,
        token_changes,
    })
}
