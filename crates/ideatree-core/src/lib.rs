//! ideatree-core
//!
//! Round-based decision engine: a topic spawns competing branches, each round
//! one branch wins, losers forfeit part of their stake to the winner, and the
//! winner seeds the next round's branches.
//!
//! # Modules
//! - **domain**: model types (ids, branch, history, tree, state, errors)
//! - **ports**: seams (Clock, IdGenerator, DecisionStore)
//! - **engine**: create, simulate_vote, select_winner, resolve_round, rewards
//! - **app**: builder, session, round loop, status and tree views
//! - **impls**: InMemoryDecisionStore
//! - **catalog**: canned decision summaries for listings

pub mod app;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod impls;
pub mod ports;
