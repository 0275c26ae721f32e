//! Errors raised by the decision engine.

use thiserror::Error;

use super::state::DecisionStatus;

/// EngineError is the only failure a resolution attempt can produce.
///
/// A failed resolution never commits anything: the caller still holds the
/// last-good snapshot and decides whether to retry or abandon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("cannot select a winner from an empty branch list")]
    EmptyBranchSet,

    #[error("elimination rate must be within [0, 1], got {0}")]
    EliminationRateOutOfBounds(f64),

    #[error("decision is {0:?}, only running decisions can resolve a round")]
    DecisionNotRunning(DecisionStatus),
}

/// PolicyError is raised when a round policy cannot drive a decision.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("total_rounds must be at least 1")]
    NoRounds,

    #[error("round_duration_ms must be greater than zero")]
    ZeroRoundDuration,

    #[error("{name} range is empty: {min}..={max}")]
    EmptyRange {
        name: &'static str,
        min: u64,
        max: u64,
    },

    #[error("next-round branch count must be at least 1, got {0}")]
    NoNextBranches(u64),

    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfBounds { name: &'static str, value: f64 },
}
