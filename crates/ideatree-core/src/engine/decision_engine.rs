//! DecisionEngine: the engine operations bound to a policy, a clock, an id
//! generator and a random source.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;

use super::policy::RoundPolicy;
use super::rewards::calculate_rewards_with_share;
use super::round::{create, resolve_round};
use crate::domain::{BranchId, DecisionTree, EngineError, PolicyError};
use crate::ports::{Clock, IdGenerator};

/// Engine facade.
///
/// The free functions in `engine` stay usable on their own; this type only
/// wires in where time, ids and randomness come from. Build one with
/// `EngineBuilder`, or `with_parts` when every port is already at hand.
pub struct DecisionEngine<R> {
    policy: RoundPolicy,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    rng: R,
}

impl<R: Rng> DecisionEngine<R> {
    pub fn with_parts(
        policy: RoundPolicy,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        rng: R,
    ) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            policy,
            clock,
            ids,
            rng,
        })
    }

    pub fn policy(&self) -> &RoundPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Create a running decision for `main_topic`.
    pub fn create(&mut self, main_topic: impl Into<String>) -> DecisionTree {
        let id = self.ids.generate_decision_id();
        create(
            id,
            main_topic,
            &self.policy,
            self.clock.now(),
            &mut self.rng,
        )
    }

    /// Resolve the current round of `tree`; see `engine::resolve_round`.
    pub fn resolve(&mut self, tree: &DecisionTree) -> Result<DecisionTree, EngineError> {
        resolve_round(tree, &self.policy, self.clock.now(), &mut self.rng)
    }

    /// Reward per round winner with the policy's reward share.
    pub fn rewards(&self, tree: &DecisionTree) -> BTreeMap<BranchId, u64> {
        calculate_rewards_with_share(tree, self.policy.reward_share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, UlidGenerator};
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine(policy: RoundPolicy) -> Result<DecisionEngine<StdRng>, PolicyError> {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        ));
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));
        DecisionEngine::with_parts(policy, clock, ids, StdRng::seed_from_u64(5))
    }

    #[test]
    fn runs_a_decision_to_completion() {
        let mut engine = engine(RoundPolicy::default()).unwrap();
        let mut tree = engine.create("Pick a governance model");
        assert_eq!(tree.round_start_time, engine.clock().now());

        while !tree.is_completed() {
            tree = engine.resolve(&tree).unwrap();
        }

        assert_eq!(tree.history.len(), 6);
        let rewards = engine.rewards(&tree);
        assert!(!rewards.is_empty());
        assert!(rewards.len() <= 6);
    }

    #[test]
    fn invalid_policy_is_rejected_up_front() {
        let policy = RoundPolicy {
            total_rounds: 0,
            ..RoundPolicy::default()
        };
        assert!(matches!(engine(policy), Err(PolicyError::NoRounds)));
    }
}
