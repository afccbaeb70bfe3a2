//! Partial Evaluator Source

pub mod interface;

pub use interface::*;
