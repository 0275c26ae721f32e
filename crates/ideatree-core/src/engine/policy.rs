//! Round policy: the constants that drive a decision.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::PolicyError;

/// Inclusive integer range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u64,
    pub max: u64,
}

impl Span {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Uniform sample in `min..=max`. Callers validate the span first.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min..=self.max)
    }

    fn check(&self, name: &'static str) -> Result<(), PolicyError> {
        if self.is_empty() {
            return Err(PolicyError::EmptyRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Round policy for a decision.
///
/// `Default` is the standard game: 6 rounds of 10 seconds, 4-6 opening
/// branches staked 50-99, 3-4 follow-up branches seeded 30-59, 20% of each
/// loser's stake forfeited, 20% pool growth per round, 15% reward share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundPolicy {
    pub total_rounds: u32,
    pub round_duration_ms: u64,

    /// Branch count of the first round.
    pub initial_branches: Span,
    /// Opening stake of each first-round branch.
    pub initial_stake: Span,

    /// Branch count of every later round.
    pub next_branches: Span,
    /// Seed stake of each later-round branch, before the growth share is added.
    pub next_stake: Span,

    /// Share of a loser's stake forfeited to the round winner.
    pub elimination_rate: f64,
    /// Pool growth applied on every non-final resolution.
    pub growth_rate: f64,
    /// Share of the final pool paid out per round, scaled by round weight.
    pub reward_share: f64,
}

impl Default for RoundPolicy {
    fn default() -> Self {
        Self {
            total_rounds: 6,
            round_duration_ms: 10_000,
            initial_branches: Span::new(4, 6),
            initial_stake: Span::new(50, 99),
            next_branches: Span::new(3, 4),
            next_stake: Span::new(30, 59),
            elimination_rate: 0.2,
            growth_rate: 0.2,
            reward_share: 0.15,
        }
    }
}

impl RoundPolicy {
    /// Check the policy can drive a decision from creation to completion.
    ///
    /// A next-round branch count of at least one keeps the growth split in
    /// `resolve_round` free of division by zero.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.total_rounds == 0 {
            return Err(PolicyError::NoRounds);
        }
        if self.round_duration_ms == 0 {
            return Err(PolicyError::ZeroRoundDuration);
        }
        self.initial_branches.check("initial_branches")?;
        self.initial_stake.check("initial_stake")?;
        self.next_branches.check("next_branches")?;
        self.next_stake.check("next_stake")?;
        if self.next_branches.min == 0 {
            return Err(PolicyError::NoNextBranches(self.next_branches.min));
        }
        for (name, value) in [
            ("elimination_rate", self.elimination_rate),
            ("growth_rate", self.growth_rate),
            ("reward_share", self.reward_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::RateOutOfBounds { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[test]
    fn default_policy_matches_standard_game() {
        let policy = RoundPolicy::default();
        assert_eq!(policy.total_rounds, 6);
        assert_eq!(policy.round_duration_ms, 10_000);
        assert_eq!(policy.initial_branches, Span::new(4, 6));
        assert_eq!(policy.next_branches, Span::new(3, 4));
        assert_eq!(policy.elimination_rate, 0.2);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn span_samples_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let span = Span::new(3, 4);
        for _ in 0..200 {
            let n = span.sample(&mut rng);
            assert!((3..=4).contains(&n));
        }
    }

    #[rstest]
    #[case::no_rounds(RoundPolicy { total_rounds: 0, ..RoundPolicy::default() }, PolicyError::NoRounds)]
    #[case::zero_duration(RoundPolicy { round_duration_ms: 0, ..RoundPolicy::default() }, PolicyError::ZeroRoundDuration)]
    #[case::empty_stake(
        RoundPolicy { initial_stake: Span::new(10, 5), ..RoundPolicy::default() },
        PolicyError::EmptyRange { name: "initial_stake", min: 10, max: 5 }
    )]
    #[case::no_next_branches(
        RoundPolicy { next_branches: Span::new(0, 2), ..RoundPolicy::default() },
        PolicyError::NoNextBranches(0)
    )]
    #[case::rate_too_high(
        RoundPolicy { elimination_rate: 1.5, ..RoundPolicy::default() },
        PolicyError::RateOutOfBounds { name: "elimination_rate", value: 1.5 }
    )]
    fn invalid_policies_are_rejected(#[case] policy: RoundPolicy, #[case] expected: PolicyError) {
        assert_eq!(policy.validate(), Err(expected));
    }

    #[test]
    fn partial_policy_deserializes_over_defaults() {
        let policy: RoundPolicy =
            serde_json::from_str(r#"{"total_rounds": 2, "next_branches": {"min": 1, "max": 1}}"#)
                .unwrap();
        assert_eq!(policy.total_rounds, 2);
        assert_eq!(policy.next_branches, Span::new(1, 1));
        assert_eq!(policy.round_duration_ms, 10_000);
    }
}
