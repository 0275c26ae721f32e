//! IdGenerator port - id generation.
//!
//! # Implementations
//! - **UlidGenerator**: ULID with the timestamp part taken from a `Clock`.

use crate::domain::ids::DecisionId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator hands out decision ids.
///
/// `Send + Sync` so one generator can back several sessions.
pub trait IdGenerator: Send + Sync {
    fn generate_decision_id(&self) -> DecisionId;
}

/// ULID-based generator.
///
/// The timestamp part comes from the clock, so a `FixedClock` yields ids with
/// a deterministic time prefix (the random part still differs).
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_decision_id(&self) -> DecisionId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        DecisionId::from(ulid)
    }
}
