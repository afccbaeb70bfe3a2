//! Angular TypeScript Compiler (ngtsc)
//!
//! Corresponds to packages/compiler-cli/src/ngtsc
//! This module contains the analysis of constructor dependencies and injection tokens.

pub mod annotations;
pub mod diagnostics;
pub mod imports;
pub mod partial_evaluator;
pub mod reflection;

#[cfg(test)]
pub mod testing;
