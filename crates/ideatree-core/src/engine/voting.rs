//! Cosmetic vote simulation.

use rand::Rng;

use crate::domain::Branch;

/// Assign each branch a display-only vote tally.
///
/// `votes = floor(tokens / 10) + uniform(0, 2 * floor(tokens / 10))`.
/// Only `votes` changes; the winner is decided on tokens alone, so the
/// tallies can be regenerated at will without touching the outcome.
pub fn simulate_vote<R: Rng + ?Sized>(branches: &[Branch], rng: &mut R) -> Vec<Branch> {
    branches
        .iter()
        .map(|branch| {
            let base = branch.tokens / 10;
            let extra = if base == 0 {
                0
            } else {
                rng.gen_range(0..base * 2)
            };
            Branch {
                votes: base + extra,
                ..branch.clone()
            }
        })
        .collect()
}
