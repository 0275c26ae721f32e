//! App - application layer around the engine.
//!
//! # Components
//! - **EngineBuilder**: wiring of policy, clock, ids and RNG
//! - **DecisionSession**: caller-driven countdown + resolution state machine
//! - **RoundLoop**: tokio timer driving a session, with deterministic cancel
//! - **TreeView**: winner-path reconstruction for rendering
//! - **DecisionStatusView**: flat serializable status

pub mod builder;
pub mod round_loop;
pub mod session;
pub mod status;
pub mod view;

pub use self::builder::{BuildError, EngineBuilder};
pub use self::round_loop::{RoundLoop, RoundLoopConfig, RoundLoopHandle};
pub use self::session::{DecisionSession, SessionState, TickOutcome};
pub use self::status::DecisionStatusView;
pub use self::view::{ROOT_NODE_ID, TreeNode, build_tree_view};
