//! Domain model (ids, branches, decision trees, history, errors).

pub mod branch;
pub mod errors;
pub mod history;
pub mod ids;
pub mod state;
pub mod tree;

pub use branch::{Branch, BranchOutcome};
pub use errors::{EngineError, PolicyError};
pub use history::{RoundHistory, TokenChange, TokenChangeKind};
pub use ids::{BranchId, DecisionId};
pub use state::DecisionStatus;
pub use tree::DecisionTree;
