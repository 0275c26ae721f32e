//! DecisionStore port - keyed storage of decision snapshots.
//!
//! Resolution reads a whole snapshot and writes a whole new one, so two
//! concurrent resolutions of the same decision would lose an update. The
//! store guards every write with the decision's version (its resolved-round
//! count): a commit only lands if the stored version is the one the caller
//! resolved from.

use async_trait::async_trait;
use thiserror::Error;

use crate::app::status::DecisionStatusView;
use crate::domain::{DecisionId, DecisionTree, EngineError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("decision not found: {0}")]
    NotFound(DecisionId),

    #[error("decision already stored: {0}")]
    AlreadyExists(DecisionId),

    #[error("version conflict on {id}: expected {expected}, stored {actual}")]
    VersionConflict {
        id: DecisionId,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// DecisionStore keeps the last committed snapshot of each decision.
///
/// # Design
/// - One snapshot per `DecisionId`; history lives inside the snapshot.
/// - `commit` is compare-and-swap on `DecisionTree::version`.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    async fn insert(&self, tree: DecisionTree) -> Result<(), StoreError>;

    async fn get(&self, id: DecisionId) -> Result<DecisionTree, StoreError>;

    /// Replace the stored snapshot with `next` if the stored version still
    /// equals `expected_version`.
    async fn commit(&self, next: DecisionTree, expected_version: usize) -> Result<(), StoreError>;

    async fn remove(&self, id: DecisionId) -> Result<DecisionTree, StoreError>;

    /// Status of every stored decision, ordered by id.
    async fn list(&self) -> Vec<DecisionStatusView>;
}
