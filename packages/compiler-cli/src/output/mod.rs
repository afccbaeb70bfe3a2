//! Output AST
//!
//! The expression vocabulary handed to code generators.

pub mod output_ast;
