// Common Utilities
//
// Helpers shared by the annotation handlers: decorator provenance, expression unwrapping,
// `forwardRef` expansion and reference materialization.

use crate::ngtsc::imports::{Reference, ReferenceEmitError};
use crate::ngtsc::partial_evaluator::ForeignFunctionResolver;
use crate::ngtsc::reflection::{Decorator, Import, ReflectionHost};
use crate::output::output_ast::Expression as OutputExpression;
use oxc_ast::ast;
use std::path::Path;
use tracing::trace;

/// Module name of the framework core.
pub const CORE_MODULE: &str = "@angular/core";

/// Name of the deferred-value factory exported by the core module.
pub const FORWARD_REF: &str = "forwardRef";

/// Check if a decorator was imported from @angular/core.
pub fn is_angular_core(decorator: &Decorator<'_>) -> bool {
    decorator
        .import
        .as_ref()
        .is_some_and(|import| import.from == CORE_MODULE)
}

/// Strips parentheses and type casts (`x as T`, `x satisfies T`, `<T>x`) until the underlying
/// expression is reached.
pub fn unwrap_expression<'a>(mut node: &'a ast::Expression<'a>) -> &'a ast::Expression<'a> {
    loop {
        node = match node {
            ast::Expression::ParenthesizedExpression(e) => &e.expression,
            ast::Expression::TSAsExpression(e) => &e.expression,
            ast::Expression::TSSatisfiesExpression(e) => &e.expression,
            ast::Expression::TSTypeAssertion(e) => &e.expression,
            _ => return node,
        };
    }
}

/// Extracts the expression a closure evaluates to, if its body is nothing more than that.
///
/// Matches `() => expr`, `() => { return expr; }` and `function() { return expr; }`, also when
/// parenthesized or cast. Any other body, including one with statements before the `return`,
/// does not match.
pub fn expand_forward_ref<'a>(arg: &'a ast::Expression<'a>) -> Option<&'a ast::Expression<'a>> {
    match unwrap_expression(arg) {
        ast::Expression::ArrowFunctionExpression(arrow) if arrow.expression => {
            // A concise body is stored as a single expression statement.
            match &arrow.body.statements[..] {
                [ast::Statement::ExpressionStatement(stmt)] => Some(&stmt.expression),
                _ => None,
            }
        }
        ast::Expression::ArrowFunctionExpression(arrow) => single_returned_expression(&arrow.body),
        ast::Expression::FunctionExpression(function) => function
            .body
            .as_deref()
            .and_then(single_returned_expression),
        _ => None,
    }
}

fn single_returned_expression<'a>(
    body: &'a ast::FunctionBody<'a>,
) -> Option<&'a ast::Expression<'a>> {
    match &body.statements[..] {
        [ast::Statement::ReturnStatement(ret)] => ret.argument.as_ref(),
        _ => None,
    }
}

/// Shape-only unwrapping of a deferred value: `anyCallee(() => expr)` becomes `expr`.
///
/// The callee is not inspected. Anything that is not a one-argument call wrapping a matching
/// closure is returned unchanged.
pub fn unwrap_deferred<'a>(node: &'a ast::Expression<'a>) -> &'a ast::Expression<'a> {
    let ast::Expression::CallExpression(call) = node else {
        return node;
    };
    let [arg] = &call.arguments[..] else {
        return node;
    };

    arg.as_expression()
        .and_then(expand_forward_ref)
        .unwrap_or(node)
}

/// Unwraps `forwardRef(() => expr)` to `expr`, provided `forwardRef` really is the one exported by
/// `@angular/core` (directly or through a namespace import).
pub fn try_unwrap_forward_ref<'a>(
    node: &'a ast::Expression<'a>,
    reflector: &dyn ReflectionHost<'a>,
) -> Option<&'a ast::Expression<'a>> {
    let ast::Expression::CallExpression(call) = unwrap_expression(node) else {
        return None;
    };
    let [arg] = &call.arguments[..] else {
        return None;
    };
    let expanded = expand_forward_ref(arg.as_expression()?)?;

    let import = callee_import(&call.callee, reflector)?;
    if import.from != CORE_MODULE || import.name != FORWARD_REF {
        return None;
    }

    trace!("unwrapped forwardRef call");
    Some(expanded)
}

/// Like [`try_unwrap_forward_ref`], but hands back `node` itself when it isn't a `forwardRef` call.
pub fn unwrap_forward_ref<'a>(
    node: &'a ast::Expression<'a>,
    reflector: &dyn ReflectionHost<'a>,
) -> &'a ast::Expression<'a> {
    try_unwrap_forward_ref(node, reflector).unwrap_or(node)
}

fn callee_import<'a>(
    callee: &'a ast::Expression<'a>,
    reflector: &dyn ReflectionHost<'a>,
) -> Option<Import<'a>> {
    match unwrap_expression(callee) {
        ast::Expression::Identifier(id) => reflector.get_import_of_identifier(id),
        ast::Expression::StaticMemberExpression(member) => match &member.object {
            ast::Expression::Identifier(namespace) => {
                reflector.get_import_of_namespaced_identifier(&member.property, namespace)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Foreign function resolver for `forwardRef` calls met by the partial evaluator.
///
/// Handles only references to the `forwardRef` declared by `@angular/core` called with exactly one
/// argument.
pub fn forward_ref_resolver<'a>(
    fn_ref: &Reference<'a>,
    args: &[&'a ast::Expression<'a>],
) -> Option<&'a ast::Expression<'a>> {
    if fn_ref.owned_by_module_guess() != Some(CORE_MODULE)
        || fn_ref.exported_name.as_deref() != Some(FORWARD_REF)
    {
        return None;
    }
    let [arg] = args else {
        return None;
    };
    expand_forward_ref(*arg)
}

/// [`forward_ref_resolver`] as a registrable resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardRefResolver;

impl<'a> ForeignFunctionResolver<'a> for ForwardRefResolver {
    fn resolve(
        &self,
        fn_ref: &Reference<'a>,
        args: &[&'a ast::Expression<'a>],
    ) -> Option<&'a ast::Expression<'a>> {
        forward_ref_resolver(fn_ref, args)
    }
}

/// Value and type expressions used when emitting a reference to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct R3Reference<'a> {
    pub value: OutputExpression<'a>,
    pub type_: OutputExpression<'a>,
}

/// Materializes `reference` inside `context`, failing when the declaration can't be reached from
/// there.
pub fn reference_to_expression<'a>(
    reference: &Reference<'a>,
    context: &Path,
) -> Result<OutputExpression<'a>, ReferenceEmitError> {
    reference
        .to_expression(context)
        .ok_or(ReferenceEmitError::CouldNotRefer {
            kind: reference.node.kind(),
        })
}

pub fn to_r3_reference<'a>(
    value_ref: &Reference<'a>,
    type_ref: &Reference<'a>,
    value_context: &Path,
    type_context: &Path,
) -> Result<R3Reference<'a>, ReferenceEmitError> {
    match (
        value_ref.to_expression(value_context),
        type_ref.to_expression(type_context),
    ) {
        (Some(value), Some(type_)) => Ok(R3Reference { value, type_ }),
        _ => Err(ReferenceEmitError::CouldNotRefer {
            kind: value_ref.node.kind(),
        }),
    }
}
