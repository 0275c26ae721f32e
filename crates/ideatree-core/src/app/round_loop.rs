//! RoundLoop - timer-driven execution of a `DecisionSession`.
//!
//! A one-second interval feeds `tick`; each resolved snapshot is published on
//! a watch channel after a presentation-only reveal delay. The delay never
//! changes data, only when the new snapshot becomes visible.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, error, info};

use super::session::{DecisionSession, TickOutcome};
use crate::domain::DecisionTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundLoopConfig {
    /// Countdown granularity.
    pub tick_interval: Duration,

    /// Pause between resolving a round and publishing it.
    pub reveal_delay: Duration,
}

impl Default for RoundLoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            reveal_delay: Duration::from_secs(2),
        }
    }
}

/// Handle to a running loop.
/// - dropping it (or `request_shutdown`) stops the loop at the next tick
/// - `join()` / `shutdown_and_join()` hand the session back
pub struct RoundLoopHandle<R> {
    shutdown_tx: watch::Sender<bool>,
    snapshots: watch::Receiver<DecisionTree>,
    join: JoinHandle<DecisionSession<R>>,
}

impl<R> RoundLoopHandle<R> {
    /// Receiver of published snapshots. Starts at the snapshot the loop was
    /// spawned with.
    pub fn subscribe(&self) -> watch::Receiver<DecisionTree> {
        self.snapshots.clone()
    }

    pub fn request_shutdown(&self) {
        // the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the loop to finish on its own (completion or failure).
    pub async fn join(self) -> Result<DecisionSession<R>, JoinError> {
        self.join.await
    }

    /// Cancel and wait. A round resolved before the cancel is always
    /// published and kept in the returned session.
    pub async fn shutdown_and_join(self) -> Result<DecisionSession<R>, JoinError> {
        self.request_shutdown();
        self.join.await
    }
}

pub struct RoundLoop;

impl RoundLoop {
    pub fn spawn<R>(session: DecisionSession<R>, config: RoundLoopConfig) -> RoundLoopHandle<R>
    where
        R: Rng + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (snapshot_tx, snapshots) = watch::channel(session.tree().clone());

        let join = tokio::spawn(run(session, config, shutdown_rx, snapshot_tx));

        RoundLoopHandle {
            shutdown_tx,
            snapshots,
            join,
        }
    }
}

async fn run<R: Rng>(
    mut session: DecisionSession<R>,
    config: RoundLoopConfig,
    mut shutdown_rx: watch::Receiver<bool>,
    snapshot_tx: watch::Sender<DecisionTree>,
) -> DecisionSession<R> {
    let mut ticker = interval(config.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        if *shutdown_rx.borrow() {
            session.cancel();
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped counts as shutdown
                if changed.is_err() {
                    session.cancel();
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let outcome = match session.tick(config.tick_interval) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(decision = %session.tree().id, error = %err, "round loop stopped");
                break;
            }
        };

        let (round, completed) = match outcome {
            TickOutcome::Pending { .. } => continue,
            TickOutcome::Idle => break,
            TickOutcome::Advanced { round } => (round, false),
            TickOutcome::Completed { round } => (round, true),
        };

        let cancelled = reveal(config.reveal_delay, &mut shutdown_rx).await;
        snapshot_tx.send_replace(session.tree().clone());
        debug!(decision = %session.tree().id, round, "round published");

        if completed {
            info!(decision = %session.tree().id, "decision completed, round loop done");
            break;
        }
        if cancelled {
            session.cancel();
            break;
        }
        ticker.reset();
    }

    session
}

/// Wait out the reveal delay. Returns true if shutdown was requested meanwhile.
async fn reveal(delay: Duration, shutdown_rx: &mut watch::Receiver<bool>) -> bool {
    if delay.is_zero() {
        return *shutdown_rx.borrow();
    }
    tokio::select! {
        _ = sleep(delay) => *shutdown_rx.borrow(),
        changed = shutdown_rx.changed() => changed.is_err() || *shutdown_rx.borrow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EngineBuilder;
    use crate::app::session::SessionState;
    use crate::domain::DecisionStatus;
    use crate::engine::RoundPolicy;
    use rand::rngs::StdRng;

    fn session(total_rounds: u32) -> DecisionSession<StdRng> {
        let engine = EngineBuilder::new()
            .policy(RoundPolicy {
                total_rounds,
                ..RoundPolicy::default()
            })
            .seed(8)
            .build()
            .unwrap();
        DecisionSession::start(engine, "Loop topic")
    }

    #[tokio::test(start_paused = true)]
    async fn loop_runs_decision_to_completion() {
        let handle = RoundLoop::spawn(session(6), RoundLoopConfig::default());
        let snapshots = handle.subscribe();

        let session = handle.join().await.unwrap();

        assert_eq!(session.tree().status, DecisionStatus::Completed);
        assert_eq!(session.tree().history.len(), 6);
        assert_eq!(snapshots.borrow().status, DecisionStatus::Completed);
        assert_eq!(*snapshots.borrow(), *session.tree());
    }

    #[tokio::test(start_paused = true)]
    async fn every_round_is_published() {
        let handle = RoundLoop::spawn(session(3), RoundLoopConfig::default());
        let mut snapshots = handle.subscribe();

        let mut seen = Vec::new();
        while snapshots.changed().await.is_ok() {
            let tree = snapshots.borrow_and_update().clone();
            seen.push(tree.history.len());
            if tree.is_completed() {
                break;
            }
        }

        assert_eq!(seen, vec![1, 2, 3]);
        handle.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_mid_decision() {
        let handle = RoundLoop::spawn(session(6), RoundLoopConfig::default());

        sleep(Duration::from_secs(25)).await;
        let session = handle.shutdown_and_join().await.unwrap();

        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.tree().status, DecisionStatus::Running);
        let resolved = session.tree().history.len();
        assert!((1..6).contains(&resolved), "resolved {resolved} rounds");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_loop() {
        let handle = RoundLoop::spawn(session(6), RoundLoopConfig::default());
        let mut snapshots = handle.subscribe();
        drop(handle);

        // sender side goes away once the loop task returns
        while snapshots.changed().await.is_ok() {}
        assert!(snapshots.borrow().history.is_empty());
    }
}
