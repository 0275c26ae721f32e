//! InMemoryDecisionStore - in-process `DecisionStore`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::app::status::DecisionStatusView;
use crate::domain::{DecisionId, DecisionTree};
use crate::engine::DecisionEngine;
use crate::ports::{DecisionStore, StoreError};

/// Decisions keyed by id behind one async mutex.
///
/// Cloning shares the same map.
#[derive(Clone, Default)]
pub struct InMemoryDecisionStore {
    trees: Arc<Mutex<HashMap<DecisionId, DecisionTree>>>,
}

impl InMemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve one round of decision `id` under the store lock.
    ///
    /// `expected_version` is the version the caller last saw. Holding the
    /// lock across read, resolve and write keeps at most one resolution in
    /// flight per store; the version check rejects callers acting on a stale
    /// snapshot. On any error the stored snapshot is unchanged.
    pub async fn resolve<R: Rng + Send>(
        &self,
        id: DecisionId,
        expected_version: usize,
        engine: &mut DecisionEngine<R>,
    ) -> Result<DecisionTree, StoreError> {
        let mut trees = self.trees.lock().await;
        let current = trees.get(&id).ok_or(StoreError::NotFound(id))?;
        check_version(current, expected_version)?;

        let next = engine.resolve(current)?;
        debug!(decision = %id, version = next.version(), "stored decision advanced");
        trees.insert(id, next.clone());
        Ok(next)
    }

    pub async fn len(&self) -> usize {
        self.trees.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trees.lock().await.is_empty()
    }
}

fn check_version(current: &DecisionTree, expected: usize) -> Result<(), StoreError> {
    let actual = current.version();
    if actual != expected {
        return Err(StoreError::VersionConflict {
            id: current.id,
            expected,
            actual,
        });
    }
    Ok(())
}

#[async_trait]
impl DecisionStore for InMemoryDecisionStore {
    async fn insert(&self, tree: DecisionTree) -> Result<(), StoreError> {
        let mut trees = self.trees.lock().await;
        if trees.contains_key(&tree.id) {
            return Err(StoreError::AlreadyExists(tree.id));
        }
        trees.insert(tree.id, tree);
        Ok(())
    }

    async fn get(&self, id: DecisionId) -> Result<DecisionTree, StoreError> {
        let trees = self.trees.lock().await;
        trees.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn commit(&self, next: DecisionTree, expected_version: usize) -> Result<(), StoreError> {
        let mut trees = self.trees.lock().await;
        let current = trees.get(&next.id).ok_or(StoreError::NotFound(next.id))?;
        check_version(current, expected_version)?;
        trees.insert(next.id, next);
        Ok(())
    }

    async fn remove(&self, id: DecisionId) -> Result<DecisionTree, StoreError> {
        let mut trees = self.trees.lock().await;
        trees.remove(&id).ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Vec<DecisionStatusView> {
        let trees = self.trees.lock().await;
        let mut views: Vec<DecisionStatusView> =
            trees.values().map(DecisionStatusView::from).collect();
        views.sort_by_key(|v| v.id);
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EngineBuilder;
    use crate::domain::{DecisionStatus, EngineError};
    use crate::engine::RoundPolicy;
    use rand::rngs::StdRng;

    fn engine() -> DecisionEngine<StdRng> {
        EngineBuilder::new()
            .policy(RoundPolicy {
                total_rounds: 2,
                ..RoundPolicy::default()
            })
            .seed(77)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn insert_get_and_duplicate() {
        let store = InMemoryDecisionStore::new();
        let mut engine = engine();
        let tree = engine.create("topic");

        store.insert(tree.clone()).await.unwrap();
        assert_eq!(store.get(tree.id).await.unwrap(), tree);
        assert_eq!(
            store.insert(tree.clone()).await,
            Err(StoreError::AlreadyExists(tree.id))
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn resolve_advances_and_bumps_version() {
        let store = InMemoryDecisionStore::new();
        let mut engine = engine();
        let tree = engine.create("topic");
        let id = tree.id;
        store.insert(tree).await.unwrap();

        let round2 = store.resolve(id, 0, &mut engine).await.unwrap();
        assert_eq!(round2.version(), 1);
        let done = store.resolve(id, 1, &mut engine).await.unwrap();
        assert_eq!(done.status, DecisionStatus::Completed);
        assert_eq!(store.get(id).await.unwrap(), done);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let store = InMemoryDecisionStore::new();
        let mut engine = engine();
        let tree = engine.create("topic");
        let id = tree.id;
        store.insert(tree).await.unwrap();

        store.resolve(id, 0, &mut engine).await.unwrap();
        let stale = store.resolve(id, 0, &mut engine).await;

        assert_eq!(
            stale,
            Err(StoreError::VersionConflict {
                id,
                expected: 0,
                actual: 1
            })
        );
        assert_eq!(store.get(id).await.unwrap().version(), 1);
    }

    #[tokio::test]
    async fn concurrent_commits_from_same_version_keep_one() {
        let store = InMemoryDecisionStore::new();
        let mut engine_a = engine();
        let tree = engine_a.create("topic");
        let id = tree.id;
        store.insert(tree.clone()).await.unwrap();

        let mut engine_b = engine();
        let next_a = engine_a.resolve(&tree).unwrap();
        let next_b = engine_b.resolve(&tree).unwrap();

        store.commit(next_a.clone(), 0).await.unwrap();
        assert!(matches!(
            store.commit(next_b, 0).await,
            Err(StoreError::VersionConflict { .. })
        ));
        assert_eq!(store.get(id).await.unwrap(), next_a);
    }

    #[tokio::test]
    async fn engine_error_leaves_store_untouched() {
        let store = InMemoryDecisionStore::new();
        let mut engine = engine();
        let mut tree = engine.create("topic");
        tree.branches.clear();
        let id = tree.id;
        store.insert(tree.clone()).await.unwrap();

        let err = store.resolve(id, 0, &mut engine).await.unwrap_err();

        assert_eq!(err, StoreError::Engine(EngineError::EmptyBranchSet));
        assert_eq!(store.get(id).await.unwrap(), tree);
    }

    #[tokio::test]
    async fn list_and_remove() {
        let store = InMemoryDecisionStore::new();
        let mut engine = engine();
        let a = engine.create("a");
        let b = engine.create("b");
        store.insert(a.clone()).await.unwrap();
        store.insert(b.clone()).await.unwrap();

        let views = store.list().await;
        assert_eq!(views.len(), 2);
        assert!(views.windows(2).all(|w| w[0].id <= w[1].id));

        assert_eq!(store.remove(a.id).await.unwrap(), a);
        assert_eq!(store.remove(a.id).await, Err(StoreError::NotFound(a.id)));
        assert!(!store.is_empty().await);
    }
}
