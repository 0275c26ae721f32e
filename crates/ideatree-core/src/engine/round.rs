//! Decision creation and round resolution.
//!
//! # Design
//! - `create` opens round 1 with a pool equal to the sum of opening stakes.
//! - `resolve_round` takes a snapshot and returns the next one. The input is
//!   never mutated, so history stays append-only.
//! - Non-final rounds grow the pool and spread the increment over the new
//!   branches. The final round only freezes the result.
//!
//! # Errors
//! - `DecisionNotRunning` for completed or paused trees
//! - `EmptyBranchSet` and `EliminationRateOutOfBounds` from `select_winner`

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use super::content::generate_label;
use super::policy::RoundPolicy;
use super::voting::simulate_vote;
use super::winner::select_winner;
use crate::domain::{
    Branch, BranchId, BranchOutcome, DecisionId, DecisionStatus, DecisionTree, EngineError,
    RoundHistory,
};

/// Opening branches of a new decision.
pub fn initial_branches<R: Rng + ?Sized>(policy: &RoundPolicy, rng: &mut R) -> Vec<Branch> {
    let count = policy.initial_branches.sample(rng) as usize;
    (0..count)
        .map(|i| {
            let content = generate_label(rng, None);
            let tokens = policy.initial_stake.sample(rng);
            Branch::new(BranchId::initial(i), content, tokens, 1)
        })
        .collect()
}

/// Branches generated under `parent` for `round`, with their seed stakes.
pub fn next_round_branches<R: Rng + ?Sized>(
    parent: &Branch,
    round: u32,
    policy: &RoundPolicy,
    rng: &mut R,
) -> Vec<Branch> {
    let count = policy.next_branches.sample(rng) as usize;
    (0..count)
        .map(|i| {
            let content = generate_label(rng, Some(&parent.content));
            let tokens = policy.next_stake.sample(rng);
            Branch::new(BranchId::child(round, &parent.id, i), content, tokens, round)
        })
        .collect()
}

/// Pool after one round of growth: `floor(total * (1 + rate))`.
pub fn grow_pool(total: u64, growth_rate: f64) -> u64 {
    (total as f64 * (1.0 + growth_rate)).floor() as u64
}

/// Create a running decision at round 1.
///
/// The pool starts as the sum of the opening stakes.
pub fn create<R: Rng + ?Sized>(
    id: DecisionId,
    main_content: impl Into<String>,
    policy: &RoundPolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> DecisionTree {
    let branches = initial_branches(policy, rng);
    let total_tokens = branches.iter().map(|b| b.tokens).sum();

    DecisionTree {
        id,
        main_content: main_content.into(),
        current_round: 1,
        total_rounds: policy.total_rounds,
        round_duration: policy.round_duration_ms,
        total_tokens,
        branches,
        round_start_time: now,
        status: DecisionStatus::Running,
        history: Vec::new(),
    }
}

/// Resolve the current round and return the next snapshot.
///
/// Steps: cosmetic votes, winner selection, history entry. On a non-final
/// round a new branch set is generated under the winner, the pool grows by
/// `growth_rate` and the increment is split evenly (floor division) over the
/// new branches. On the final round the decision completes and keeps the
/// resolved branches.
///
/// # Errors
/// - `DecisionNotRunning` unless the tree is running.
/// - `EmptyBranchSet` when the round has no branches.
///
/// `tree` is never modified, so on error the caller still holds the last-good
/// snapshot.
pub fn resolve_round<R: Rng + ?Sized>(
    tree: &DecisionTree,
    policy: &RoundPolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<DecisionTree, EngineError> {
    if !tree.status.is_resolvable() {
        return Err(EngineError::DecisionNotRunning(tree.status));
    }

    let voted = simulate_vote(&tree.branches, rng);
    let selection = select_winner(&voted, policy.elimination_rate)?;
    let mut winner = selection.winner().clone();

    debug!(
        decision = %tree.id,
        round = tree.current_round,
        winner = %winner.id,
        eliminated = selection.eliminated_total(),
        "round resolved"
    );

    if tree.current_round < tree.total_rounds {
        let entry = RoundHistory {
            round: tree.current_round,
            branches: selection.branches,
            winner: winner.clone(),
            timestamp: now,
            token_changes: selection.token_changes,
        };

        let next_round = tree.current_round + 1;
        let mut branches = next_round_branches(&winner, next_round, policy, rng);
        let total_tokens = grow_pool(tree.total_tokens, policy.growth_rate);
        let share = (total_tokens - tree.total_tokens) / branches.len().max(1) as u64;
        for branch in &mut branches {
            branch.tokens += share;
        }

        let mut history = tree.history.clone();
        history.push(entry);

        return Ok(DecisionTree {
            current_round: next_round,
            branches,
            total_tokens,
            round_start_time: now,
            history,
            ..tree.clone()
        });
    }

    winner.outcome = BranchOutcome::Winner;
    let branches = selection.branches.clone();
    let entry = RoundHistory {
        round: tree.current_round,
        branches: selection.branches,
        winner,
        timestamp: now,
        token_changes: selection.token_changes,
    };
    let mut history = tree.history.clone();
    history.push(entry);

    info!(
        decision = %tree.id,
        rounds = history.len(),
        total_tokens = tree.total_tokens,
        "decision completed"
    );

    Ok(DecisionTree {
        status: DecisionStatus::Completed,
        branches,
        history,
        ..tree.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenChangeKind;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ulid::Ulid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn new_tree(policy: &RoundPolicy, rng: &mut StdRng) -> DecisionTree {
        create(
            DecisionId::from_ulid(Ulid::nil()),
            "Best Web3 incentive",
            policy,
            now(),
            rng,
        )
    }

    #[test]
    fn create_starts_running_at_round_one() {
        let policy = RoundPolicy::default();
        let mut rng = StdRng::seed_from_u64(11);
        let tree = new_tree(&policy, &mut rng);

        assert_eq!(tree.status, DecisionStatus::Running);
        assert_eq!(tree.current_round, 1);
        assert_eq!(tree.total_rounds, 6);
        assert_eq!(tree.round_duration, 10_000);
        assert!(tree.history.is_empty());
        assert!((4..=6).contains(&tree.branches.len()));
        assert_eq!(tree.total_tokens, tree.branch_tokens());
        for (i, b) in tree.branches.iter().enumerate() {
            assert_eq!(b.id, BranchId::initial(i));
            assert!((50..=99).contains(&b.tokens));
            assert_eq!(b.round, 1);
        }
    }

    #[test]
    fn non_final_resolution_advances_round() {
        let policy = RoundPolicy::default();
        let mut rng = StdRng::seed_from_u64(12);
        let tree = new_tree(&policy, &mut rng);

        let next = resolve_round(&tree, &policy, now(), &mut rng).unwrap();

        assert_eq!(next.status, DecisionStatus::Running);
        assert_eq!(next.current_round, 2);
        assert_eq!(next.total_tokens, grow_pool(tree.total_tokens, 0.2));
        assert_eq!(next.history.len(), 1);
        assert!((3..=4).contains(&next.branches.len()));

        let winner = &next.history[0].winner;
        let share = (next.total_tokens - tree.total_tokens) / next.branches.len() as u64;
        for b in &next.branches {
            assert_eq!(b.round, 2);
            assert!(b.id.as_str().starts_with(&format!("branch-2-{}-", winner.id)));
            assert!((30 + share..=59 + share).contains(&b.tokens));
            assert_eq!(b.outcome, BranchOutcome::Contending);
        }
    }

    #[test]
    fn final_resolution_completes_and_keeps_branches() {
        let policy = RoundPolicy {
            total_rounds: 1,
            ..RoundPolicy::default()
        };
        let mut rng = StdRng::seed_from_u64(13);
        let tree = new_tree(&policy, &mut rng);

        let done = resolve_round(&tree, &policy, now(), &mut rng).unwrap();

        assert_eq!(done.status, DecisionStatus::Completed);
        assert_eq!(done.current_round, 1);
        assert_eq!(done.history.len(), 1);
        assert_eq!(done.total_tokens, tree.total_tokens);
        assert_eq!(done.branches, done.history[0].branches);
        assert!(done.history[0].winner.is_winner());
        assert_eq!(done.branches.iter().filter(|b| b.is_winner()).count(), 1);
    }

    #[test]
    fn two_round_decision_example() {
        let policy = RoundPolicy {
            total_rounds: 2,
            ..RoundPolicy::default()
        };
        let mut rng = StdRng::seed_from_u64(14);
        let tree = new_tree(&policy, &mut rng);

        let round2 = resolve_round(&tree, &policy, now(), &mut rng).unwrap();
        assert_eq!(round2.current_round, 2);
        assert_eq!(round2.status, DecisionStatus::Running);

        let done = resolve_round(&round2, &policy, now(), &mut rng).unwrap();
        assert_eq!(done.status, DecisionStatus::Completed);
        assert_eq!(done.history.len(), 2);
        assert_eq!(done.history[0].round, 1);
        assert_eq!(done.history[1].round, 2);
    }

    #[test]
    fn history_records_one_gain_per_round() {
        let policy = RoundPolicy::default();
        let mut rng = StdRng::seed_from_u64(15);
        let mut tree = new_tree(&policy, &mut rng);
        while !tree.is_completed() {
            tree = resolve_round(&tree, &policy, now(), &mut rng).unwrap();
        }

        assert_eq!(tree.history.len(), 6);
        for entry in &tree.history {
            let gains: Vec<_> = entry
                .token_changes
                .iter()
                .filter(|c| c.kind == TokenChangeKind::Gained)
                .collect();
            assert_eq!(gains.len(), 1);
            assert_eq!(gains[0].branch_id, entry.winner.id);
            assert_eq!(gains[0].amount, entry.eliminated_total());
            assert_eq!(entry.token_changes.len(), entry.branches.len());
        }
    }

    #[test]
    fn pool_never_shrinks() {
        let policy = RoundPolicy::default();
        let mut rng = StdRng::seed_from_u64(16);
        let mut tree = new_tree(&policy, &mut rng);
        while !tree.is_completed() {
            let next = resolve_round(&tree, &policy, now(), &mut rng).unwrap();
            assert!(next.total_tokens >= tree.total_tokens);
            tree = next;
        }
    }

    #[test]
    fn empty_round_fails_without_touching_input() {
        let policy = RoundPolicy::default();
        let mut rng = StdRng::seed_from_u64(17);
        let mut tree = new_tree(&policy, &mut rng);
        tree.branches.clear();
        let snapshot = tree.clone();

        let err = resolve_round(&tree, &policy, now(), &mut rng).unwrap_err();

        assert_eq!(err, EngineError::EmptyBranchSet);
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn completed_decision_cannot_resolve_again() {
        let policy = RoundPolicy {
            total_rounds: 1,
            ..RoundPolicy::default()
        };
        let mut rng = StdRng::seed_from_u64(18);
        let tree = new_tree(&policy, &mut rng);
        let done = resolve_round(&tree, &policy, now(), &mut rng).unwrap();

        assert_eq!(
            resolve_round(&done, &policy, now(), &mut rng),
            Err(EngineError::DecisionNotRunning(DecisionStatus::Completed))
        );
    }

    #[test]
    fn grow_pool_applies_twenty_percent() {
        assert_eq!(grow_pool(100, 0.2), 120);
        assert_eq!(grow_pool(500, 0.2), 600);
        assert_eq!(grow_pool(373, 0.2), 447);
        assert_eq!(grow_pool(0, 0.2), 0);
    }
}
