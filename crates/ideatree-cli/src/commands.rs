//! Command execution

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tracing::{info, warn};

use ideatree_core::app::{
    DecisionSession, EngineBuilder, RoundLoop, RoundLoopConfig, SessionState, build_tree_view,
};
use ideatree_core::catalog::{
    DEFAULT_COMPLETED, DEFAULT_ONGOING, DEFAULT_UPCOMING, MockCatalog,
};
use ideatree_core::domain::DecisionTree;
use ideatree_core::engine::DecisionEngine;
use ideatree_core::ports::SystemClock;

use crate::args::{CatalogFilter, Cli, Commands};
use crate::render;
use crate::settings::load_policy;

const FAST_ROUND_MS: u64 = 1_000;

pub async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run { topic, fast, json } => run(cli, topic, *fast, *json).await,
        Commands::Step { topic, json } => step(cli, topic, *json),
        Commands::Catalog { filter, json } => catalog(cli.seed, *filter, *json),
    }
}

fn engine(cli: &Cli, fast: bool) -> Result<DecisionEngine<StdRng>> {
    let mut policy = load_policy(cli.config.as_deref())?;
    if fast {
        policy.round_duration_ms = FAST_ROUND_MS;
    }

    let mut builder = EngineBuilder::new().policy(policy);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    builder.build().context("build engine")
}

async fn run(cli: &Cli, topic: &str, fast: bool, json: bool) -> Result<()> {
    let session = DecisionSession::start(engine(cli, fast)?, topic);
    info!(decision = %session.tree().id, topic, "decision started");
    if !json {
        print!("{}", render::live_round(session.tree()));
    }

    let config = if fast {
        RoundLoopConfig {
            reveal_delay: Duration::ZERO,
            ..RoundLoopConfig::default()
        }
    } else {
        RoundLoopConfig::default()
    };
    let handle = RoundLoop::spawn(session, config);
    let mut snapshots = handle.subscribe();
    let interrupted = follow_rounds(&mut snapshots, tokio::signal::ctrl_c(), json).await;

    let session = handle
        .shutdown_and_join()
        .await
        .context("round loop task failed")?;
    if interrupted {
        info!(decision = %session.tree().id, "decision cancelled");
    }
    if session.state() == SessionState::Halted {
        bail!(
            "round {} of {} could not be resolved",
            session.tree().current_round,
            session.tree().id
        );
    }

    finish(&session, json)
}

/// Print published rounds until the decision completes, the loop stops or
/// `interrupt` resolves. Returns true when interrupted.
async fn follow_rounds<F: Future>(
    snapshots: &mut watch::Receiver<DecisionTree>,
    interrupt: F,
    json: bool,
) -> bool {
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                // loop task finished
                if changed.is_err() {
                    return false;
                }
                let tree = snapshots.borrow_and_update().clone();
                if !json {
                    if let Some(round) = tree.history.last() {
                        print!("{}", render::resolved_round(round));
                    }
                    if !tree.is_completed() {
                        print!("{}", render::live_round(&tree));
                    }
                }
                if tree.is_completed() {
                    return false;
                }
            }
            _ = &mut interrupt => {
                warn!("interrupted, stopping round loop");
                return true;
            }
        }
    }
}

fn step(cli: &Cli, topic: &str, json: bool) -> Result<()> {
    let mut session = DecisionSession::start(engine(cli, false)?, topic);

    while !session.tree().is_completed() {
        session
            .resolve_now()
            .with_context(|| format!("resolve round {}", session.tree().current_round))?;
        if !json && let Some(round) = session.tree().history.last() {
            print!("{}", render::resolved_round(round));
        }
    }

    finish(&session, json)
}

fn finish(session: &DecisionSession<StdRng>, json: bool) -> Result<()> {
    let tree = session.tree();
    let rewards = session.rewards();

    if json {
        println!("{}", render::json(&render::Report::new(tree, &rewards))?);
        return Ok(());
    }

    if tree.is_completed() {
        println!("{}", render::tree_view(&build_tree_view(tree)));
        print!("{}", render::rewards(&rewards));
    } else {
        println!(
            "stopped after {} of {} rounds",
            tree.history.len(),
            tree.total_rounds
        );
    }
    Ok(())
}

fn catalog(seed: Option<u64>, filter: CatalogFilter, json: bool) -> Result<()> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut catalog = MockCatalog::new(Arc::new(SystemClock), rng);

    let summaries = match filter {
        CatalogFilter::Ongoing => catalog.ongoing(DEFAULT_ONGOING),
        CatalogFilter::Completed => catalog.completed(DEFAULT_COMPLETED),
        CatalogFilter::Upcoming => catalog.upcoming(DEFAULT_UPCOMING),
        CatalogFilter::All => catalog.all(),
    };

    if json {
        println!("{}", render::json(&summaries)?);
    } else {
        print!("{}", render::catalog(&summaries));
    }
    Ok(())
}
