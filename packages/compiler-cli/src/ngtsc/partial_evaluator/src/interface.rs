// Interface
//
// Public interface for partial evaluator.

use crate::ngtsc::annotations::common::unwrap_expression;
use crate::ngtsc::imports::Reference;
use crate::ngtsc::reflection::{Declaration, DeclarationNode, ReflectionHost};
use oxc_ast::ast;
use std::path::PathBuf;
use tracing::trace;

/// Resolves calls to functions whose result can be known statically.
///
/// Given the callee's declaration and the call's arguments, return the expression the call stands
/// for, or `None` if the call is not one this resolver handles.
pub trait ForeignFunctionResolver<'a> {
    fn resolve(
        &self,
        fn_ref: &Reference<'a>,
        args: &[&'a ast::Expression<'a>],
    ) -> Option<&'a ast::Expression<'a>>;
}

impl<'a, F> ForeignFunctionResolver<'a> for F
where
    F: Fn(&Reference<'a>, &[&'a ast::Expression<'a>]) -> Option<&'a ast::Expression<'a>>,
{
    fn resolve(
        &self,
        fn_ref: &Reference<'a>,
        args: &[&'a ast::Expression<'a>],
    ) -> Option<&'a ast::Expression<'a>> {
        self(fn_ref, args)
    }
}

/// Partial evaluator interface.
///
/// Only foreign function calls are understood: the evaluator locates the callee's declaration and
/// consults its resolvers in registration order.
pub struct PartialEvaluator<'r, 'a> {
    host: &'r dyn ReflectionHost<'a>,
    source_file: Option<PathBuf>,
    resolvers: Vec<Box<dyn ForeignFunctionResolver<'a> + 'r>>,
}

impl<'r, 'a> PartialEvaluator<'r, 'a> {
    pub fn new(host: &'r dyn ReflectionHost<'a>) -> Self {
        Self {
            host,
            source_file: None,
            resolvers: Vec::new(),
        }
    }

    /// Path of the file being evaluated, recorded on references to its local declarations.
    pub fn with_source_file(mut self, source_file: impl Into<PathBuf>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    pub fn with_resolver(mut self, resolver: impl ForeignFunctionResolver<'a> + 'r) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Resolves `expr` when it is a call `f(...)` or `ns.f(...)` that one of the registered
    /// resolvers handles.
    ///
    /// Calls to an undeclared callee, to a member of anything but a namespace import, or with
    /// spread arguments are never resolved.
    pub fn resolve_foreign_call(
        &self,
        expr: &'a ast::Expression<'a>,
    ) -> Option<&'a ast::Expression<'a>> {
        let ast::Expression::CallExpression(call) = unwrap_expression(expr) else {
            return None;
        };

        let (callee, declaration) = self.callee_declaration(&call.callee)?;
        let fn_ref = Reference::from_declaration(&declaration, self.source_file.clone());
        let args = call
            .arguments
            .iter()
            .map(|arg| arg.as_expression())
            .collect::<Option<Vec<_>>>()?;

        let resolved = self
            .resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(&fn_ref, &args));
        if resolved.is_some() {
            trace!(callee = %callee, "resolved foreign function call");
        }
        resolved
    }

    fn callee_declaration(
        &self,
        callee: &'a ast::Expression<'a>,
    ) -> Option<(&'a str, Declaration<'a>)> {
        match unwrap_expression(callee) {
            ast::Expression::Identifier(id) => {
                let declaration = self.host.get_declaration_of_identifier(id)?;
                Some((id.name.as_str(), declaration))
            }
            ast::Expression::StaticMemberExpression(member) => {
                let ast::Expression::Identifier(namespace) = &member.object else {
                    return None;
                };
                let import = self
                    .host
                    .get_import_of_namespaced_identifier(&member.property, namespace)?;
                let declaration = Declaration {
                    via_module: Some(import.from),
                    name: import.name,
                    is_exported: true,
                    node: DeclarationNode::External,
                };
                Some((member.property.name.as_str(), declaration))
            }
            _ => None,
        }
    }
}
