//! Decision engine: round resolution and reward calculation.
//!
//! Every operation is a function over `DecisionTree` values. Randomness and
//! timestamps are passed in, so a seeded `StdRng` plus a `FixedClock`
//! reproduces a whole decision.
//!
//! - `create`: opening branches and pool
//! - `simulate_vote`: display-only tallies
//! - `select_winner`: token-weighted winner and redistribution
//! - `resolve_round`: one full round transition
//! - `calculate_rewards`: final distribution

pub mod content;
pub mod decision_engine;
pub mod policy;
pub mod rewards;
pub mod round;
pub mod voting;
pub mod winner;

pub use self::decision_engine::DecisionEngine;
pub use self::policy::{RoundPolicy, Span};
pub use self::rewards::{DEFAULT_REWARD_SHARE, calculate_rewards, calculate_rewards_with_share};
pub use self::round::{create, grow_pool, initial_branches, next_round_branches, resolve_round};
pub use self::voting::simulate_vote;
pub use self::winner::{Selection, forfeit, select_winner};
