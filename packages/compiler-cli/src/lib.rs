#![deny(clippy::all)]

/**
 * Angular Compiler CLI - constructor dependency analysis
 *
 * Turns the constructor parameters of a decorated class into injection descriptors
 */
pub mod config;
pub mod ngtsc;
pub mod output;

pub use ngtsc::annotations::common::{
    get_constructor_dependencies, get_valid_constructor_dependencies, R3DependencyMetadata,
    R3ResolvedDependencyType,
};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
