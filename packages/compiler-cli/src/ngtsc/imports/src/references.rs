//! References - Reference type for tracking AST node references
//!
//! A Reference is a pointer to a declaration that was extracted from the program somehow.
//! It contains not only the node itself, but the information regarding how the node was located.
//! In particular, it might track different identifiers by which the node is exposed, as well as
//! potentially a module specifier which might expose the node.

use crate::ngtsc::reflection::{Declaration, DeclarationNode};
use crate::output::output_ast::{self as o, Expression};
use std::path::{Component, Path, PathBuf};

/// Information about the module that owns a particular reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwningModule {
    /// The module specifier (e.g., "@angular/core").
    pub specifier: String,
    /// The resolution context (usually the file path where the import was found).
    pub resolution_context: String,
}

impl OwningModule {
    pub fn new(specifier: impl Into<String>, resolution_context: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            resolution_context: resolution_context.into(),
        }
    }
}

/// A reference to a declaration.
///
/// `Reference`s are context independent: the same reference can be rendered into different
/// files through [`Reference::to_expression`], which picks a local identifier, an absolute
/// import or a relative import depending on where the expression will live.
#[derive(Debug, Clone)]
pub struct Reference<'a> {
    pub node: DeclarationNode<'a>,

    /// The compiler's best guess at an absolute module specifier which owns this `Reference`.
    ///
    /// This is usually determined by tracking the import statements which led the compiler to a
    /// given node. If `None`, the node likely came from the current program.
    pub best_guess_owning_module: Option<OwningModule>,

    /// Name under which the declaring file exports the node, if it does.
    pub exported_name: Option<String>,

    /// Source file path where the node is defined.
    pub source_file: Option<PathBuf>,

    alias: Option<Box<Expression<'a>>>,

    /// Known identifiers that can be used to refer to this node within its own file.
    identifiers: Vec<String>,
}

impl<'a> Reference<'a> {
    pub fn new(node: DeclarationNode<'a>, source_file: Option<PathBuf>) -> Self {
        Self {
            node,
            best_guess_owning_module: None,
            exported_name: None,
            source_file,
            alias: None,
            identifiers: Vec::new(),
        }
    }

    /// Builds a reference to a declaration resolved by the reflection host.
    ///
    /// `source_file` is the file the identifier was resolved in; it only matters for local
    /// declarations.
    pub fn from_declaration(declaration: &Declaration<'a>, source_file: Option<PathBuf>) -> Self {
        let mut reference = Self::new(declaration.node, None);
        match &declaration.via_module {
            Some(module) => {
                let context = source_file
                    .as_ref()
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_default();
                reference.best_guess_owning_module = Some(OwningModule::new(module, context));
                reference.exported_name = Some(declaration.name.clone());
            }
            None => {
                reference.source_file = source_file;
                reference.add_identifier(declaration.name.clone());
                if declaration.is_exported {
                    reference.exported_name = Some(declaration.name.clone());
                }
            }
        }
        reference
    }

    pub fn with_owning_module(mut self, owning_module: OwningModule) -> Self {
        self.best_guess_owning_module = Some(owning_module);
        self
    }

    pub fn with_exported_name(mut self, name: impl Into<String>) -> Self {
        self.exported_name = Some(name.into());
        self
    }

    pub fn owned_by_module_guess(&self) -> Option<&str> {
        self.best_guess_owning_module
            .as_ref()
            .map(|m| m.specifier.as_str())
    }

    pub fn has_owning_module_guess(&self) -> bool {
        self.best_guess_owning_module.is_some()
    }

    /// A name for the node, if one is available. Only suited for debugging.
    pub fn debug_name(&self) -> Option<&str> {
        self.identifiers
            .first()
            .or(self.exported_name.as_ref())
            .map(String::as_str)
    }

    pub fn alias(&self) -> Option<&Expression<'a>> {
        self.alias.as_deref()
    }

    /// Record an identifier by which it's valid to refer to this node within its own file.
    pub fn add_identifier(&mut self, identifier: impl Into<String>) {
        self.identifiers.push(identifier.into());
    }

    pub fn get_identity_in(&self, context: &Path) -> Option<&str> {
        let same_file = self.source_file.as_deref() == Some(context);
        if same_file {
            self.identifiers.first().map(String::as_str)
        } else {
            None
        }
    }

    pub fn clone_with_alias(&self, alias: Expression<'a>) -> Self {
        let mut cloned = self.clone();
        cloned.alias = Some(Box::new(alias));
        cloned
    }

    pub fn clone_with_no_identifiers(&self) -> Self {
        let mut cloned = self.clone();
        cloned.identifiers.clear();
        cloned
    }

    /// Renders this reference as an expression valid inside `context`.
    ///
    /// Returns `None` when the node cannot be reached from that file: it has no identifier in its
    /// own file, no owning module and no export.
    pub fn to_expression(&self, context: &Path) -> Option<Expression<'a>> {
        if let Some(alias) = &self.alias {
            return Some((**alias).clone());
        }

        if let Some(identifier) = self.get_identity_in(context) {
            return Some(o::read_var(identifier));
        }

        if let Some(owning_module) = &self.best_guess_owning_module {
            let name = self.exported_name.as_deref().or(self.debug_name())?;
            return Some(o::import_expr(owning_module.specifier.clone(), name));
        }

        let name = self.exported_name.as_deref()?;
        let source_file = self.source_file.as_deref()?;
        Some(o::import_expr(relative_module_specifier(context, source_file), name))
    }
}

/// Failure to express a reference in a given file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceEmitError {
    #[error("Could not refer to {kind}")]
    CouldNotRefer { kind: &'static str },
}

/// Computes the import specifier `from` should use to reach `to`, e.g. `./foo` or `../lib/bar`.
pub fn relative_module_specifier(from: &Path, to: &Path) -> String {
    let from_dir: Vec<Component<'_>> = from
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();
    let target = to.with_extension("");
    let to_components: Vec<Component<'_>> = target.components().collect();

    let common = from_dir
        .iter()
        .zip(to_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = std::iter::repeat("..".to_string())
        .take(from_dir.len() - common)
        .collect();
    segments.extend(
        to_components[common..]
            .iter()
            .map(|component| component.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = segments.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}
