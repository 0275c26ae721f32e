//! Impls - port implementations.
//!
//! # Included
//! - **InMemoryDecisionStore**: in-process `DecisionStore` for the CLI and tests

pub mod inmem_store;

pub use self::inmem_store::InMemoryDecisionStore;
