//! Ports - seams to the outside world.
//!
//! The engine itself is pure; time, ids and storage are reached through these
//! traits so tests can pin them and hosts can swap them.

pub mod clock;
pub mod decision_store;
pub mod id_generator;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::decision_store::{DecisionStore, StoreError};
pub use self::id_generator::{IdGenerator, UlidGenerator};
