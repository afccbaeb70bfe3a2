// Imports Source Module

pub mod references;

// Re-exports
pub use references::{relative_module_specifier, OwningModule, Reference, ReferenceEmitError};
