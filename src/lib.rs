//! Contract consistency analysis library — re-exports all modules for the
//! binary and integration tests.
//!
//! The binary (`main.rs`) and integration tests (`tests/`) both import from
//! this crate root.

pub mod config;
pub mod constraints;
pub mod contradictions;
pub mod engine;
pub mod error;
pub mod graph_source;
pub mod normalize;
pub mod rules;
pub mod solver;
pub mod types;
