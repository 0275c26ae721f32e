//! EngineBuilder - wiring of the engine ports.
//!
//! Validation happens in `build()`, so a bad policy fails at startup rather
//! than on the first resolution.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::PolicyError;
use crate::engine::{DecisionEngine, RoundPolicy};
use crate::ports::{Clock, IdGenerator, SystemClock, UlidGenerator};

/// EngineBuilder assembles a `DecisionEngine<StdRng>`.
///
/// # Example
/// ```ignore
/// let engine = EngineBuilder::new()
///     .policy(RoundPolicy { total_rounds: 3, ..RoundPolicy::default() })
///     .seed(42)
///     .build()?;
/// ```
///
/// Defaults: standard policy, system clock, ULID ids from that clock, and an
/// entropy-seeded RNG.
pub struct EngineBuilder {
    policy: RoundPolicy,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    seed: Option<u64>,
}

/// BuildError is returned when the engine cannot be assembled.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid round policy: {0}")]
    InvalidPolicy(#[from] PolicyError),
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            policy: RoundPolicy::default(),
            clock: None,
            ids: None,
            seed: None,
        }
    }

    pub fn policy(mut self, policy: RoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Seed the RNG for a reproducible decision.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DecisionEngine<StdRng>, BuildError> {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let ids = self.ids.unwrap_or_else(|| {
            Arc::new(UlidGenerator::new(Arc::clone(&clock))) as Arc<dyn IdGenerator>
        });
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(DecisionEngine::with_parts(self.policy, clock, ids, rng)?)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_build_defaults() {
        let engine = EngineBuilder::new().build();
        assert!(engine.is_ok());
    }

    #[test]
    fn test_build_invalid_policy() {
        let engine = EngineBuilder::new()
            .policy(RoundPolicy {
                elimination_rate: -0.1,
                ..RoundPolicy::default()
            })
            .build();
        assert!(matches!(
            engine,
            Err(BuildError::InvalidPolicy(PolicyError::RateOutOfBounds { name: "elimination_rate", .. }))
        ));
    }

    #[test]
    fn test_same_seed_same_decision() {
        let at = Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap();
        let build = || {
            EngineBuilder::new()
                .clock(Arc::new(FixedClock::new(at)))
                .seed(99)
                .build()
                .unwrap()
        };

        let a = build().create("topic");
        let b = build().create("topic");

        assert_eq!(a.branches, b.branches);
        assert_eq!(a.total_tokens, b.total_tokens);
        assert_eq!(a.round_start_time, at);
        // ids carry a random part
        assert_ne!(a.id, b.id);
    }
}
