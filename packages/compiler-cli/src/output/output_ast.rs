//! Output expressions produced by the analysis passes.
//!
//! Only the handful of expression kinds needed to describe injection tokens and
//! materialized references are modelled here.

use crate::ngtsc::reflection::ValueNode;
use oxc_span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'a> {
    ReadVar(ReadVarExpr),
    External(ExternalExpr),
    WrappedNode(WrappedNodeExpr<'a>),
}

impl<'a> Expression<'a> {
    pub fn as_wrapped_node(&self) -> Option<&WrappedNodeExpr<'a>> {
        match self {
            Expression::WrappedNode(wrapped) => Some(wrapped),
            _ => None,
        }
    }

    pub fn as_external(&self) -> Option<&ExternalExpr> {
        match self {
            Expression::External(external) => Some(external),
            _ => None,
        }
    }

    pub fn as_read_var(&self) -> Option<&ReadVarExpr> {
        match self {
            Expression::ReadVar(read) => Some(read),
            _ => None,
        }
    }

    pub fn is_equivalent(&self, other: &Expression<'_>) -> bool {
        match (self, other) {
            (Expression::ReadVar(a), Expression::ReadVar(b)) => a.name == b.name,
            (Expression::External(a), Expression::External(b)) => a.is_equivalent(b),
            (Expression::WrappedNode(a), Expression::WrappedNode(b)) => {
                a.node.span() == b.node.span()
            }
            _ => false,
        }
    }
}

/// Read of a variable in scope of the emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadVarExpr {
    pub name: String,
}

impl ReadVarExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A symbol that must be imported into the emitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalExpr {
    pub value: ExternalReference,
}

impl ExternalExpr {
    pub fn new(module_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: ExternalReference {
                module_name: Some(module_name.into()),
                name: Some(name.into()),
            },
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.value.module_name == other.value.module_name && self.value.name == other.value.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    pub module_name: Option<String>,
    pub name: Option<String>,
}

/// A node of the source program passed through to the emitter untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrappedNodeExpr<'a> {
    pub node: ValueNode<'a>,
}

impl<'a> WrappedNodeExpr<'a> {
    pub fn new(node: ValueNode<'a>) -> Self {
        Self { node }
    }

    pub fn span(&self) -> Span {
        self.node.span()
    }
}

pub fn read_var(name: impl Into<String>) -> Expression<'static> {
    Expression::ReadVar(ReadVarExpr::new(name))
}

pub fn import_expr(module_name: impl Into<String>, name: impl Into<String>) -> Expression<'static> {
    Expression::External(ExternalExpr::new(module_name, name))
}
