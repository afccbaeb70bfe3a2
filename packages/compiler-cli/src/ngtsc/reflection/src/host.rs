use oxc_ast::ast;
use oxc_span::{GetSpan, Span};

/// Metadata extracted from an instance of a decorator on another declaration.
#[derive(Debug, Clone)]
pub struct Decorator<'a> {
    /// Name by which the decorator was invoked in the user's code.
    ///
    /// For `@core.Inject()` this is `Inject`.
    pub name: String,

    /// Identifier which refers to the decorator in the user's code.
    pub identifier: Option<&'a ast::IdentifierReference<'a>>,

    /// `Import` by which the decorator was brought into the module in which it was invoked.
    pub import: Option<Import<'a>>,

    /// Oxc AST reference to the decorator itself.
    pub node: &'a ast::Decorator<'a>,

    /// Arguments of the invocation of the decorator.
    ///
    /// `None` when the decorator was not called (`@Optional`), as opposed to called with no
    /// arguments (`@Optional()`). Spread elements are kept so the count stays exact.
    pub args: Option<Vec<&'a ast::Argument<'a>>>,
}

impl<'a> Decorator<'a> {
    pub fn span(&self) -> Span {
        self.node.span
    }

    /// The name the decorator is known by in its declaring module.
    ///
    /// Differs from `name` when the import was aliased (`import {Inject as I}`).
    pub fn exported_name(&self) -> &str {
        self.import
            .as_ref()
            .map_or(self.name.as_str(), |import| import.name.as_str())
    }
}

/// The Oxc `Class` node.
pub type ClassDeclaration<'a> = ast::Class<'a>;

/// A node of the program that can stand for a value at runtime.
///
/// Type annotations such as `el: ElementRef` share their identifier node type with value
/// expressions, so both are carried here without allocating a synthetic expression.
#[derive(Debug, Clone, Copy)]
pub enum ValueNode<'a> {
    Expression(&'a ast::Expression<'a>),
    TypeName(&'a ast::TSTypeName<'a>),
}

impl<'a> ValueNode<'a> {
    pub fn span(&self) -> Span {
        match self {
            ValueNode::Expression(expr) => expr.span(),
            ValueNode::TypeName(name) => name.span(),
        }
    }

    /// The bare identifier this node consists of, if it is one.
    pub fn as_identifier(&self) -> Option<&'a ast::IdentifierReference<'a>> {
        match *self {
            ValueNode::Expression(ast::Expression::Identifier(id)) => Some(&**id),
            ValueNode::TypeName(ast::TSTypeName::IdentifierReference(id)) => Some(&**id),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&'a ast::Expression<'a>> {
        match *self {
            ValueNode::Expression(expr) => Some(expr),
            ValueNode::TypeName(_) => None,
        }
    }
}

impl PartialEq for ValueNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueNode::Expression(a), ValueNode::Expression(b)) => std::ptr::eq(*a, *b),
            (ValueNode::TypeName(a), ValueNode::TypeName(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CtorParameter<'a> {
    pub name: Option<String>,
    pub name_node: &'a ast::BindingPattern<'a>,

    /// The value denoted by the parameter's type annotation.
    ///
    /// Only type references (`Foo`, `ns.Foo`) produce a value; keyword and literal types such as
    /// `any` or `string` leave this empty.
    pub type_value: Option<ValueNode<'a>>,
    pub type_node: Option<&'a ast::TSType<'a>>,

    pub decorators: Option<Vec<Decorator<'a>>>,
}

#[derive(Debug, Clone)]
pub struct Import<'a> {
    /// The name of the imported symbol in its declaring module.
    pub name: String,
    /// The module specifier the symbol is imported from.
    pub from: String,
    pub node: &'a ast::ImportDeclaration<'a>,
}

/// The node a declaration resolves to.
#[derive(Debug, Clone, Copy)]
pub enum DeclarationNode<'a> {
    Class(&'a ast::Class<'a>),
    Function(&'a ast::Function<'a>),
    Variable(&'a ast::VariableDeclarator<'a>),
    /// Declared in a module that is not part of the analysed program.
    External,
}

impl DeclarationNode<'_> {
    /// Human-readable syntax kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DeclarationNode::Class(_) => "ClassDeclaration",
            DeclarationNode::Function(_) => "FunctionDeclaration",
            DeclarationNode::Variable(_) => "VariableDeclaration",
            DeclarationNode::External => "ExternalDeclaration",
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            DeclarationNode::Class(class) => Some(class.span),
            DeclarationNode::Function(function) => Some(function.span),
            DeclarationNode::Variable(variable) => Some(variable.span),
            DeclarationNode::External => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    /// Absolute module specifier if the declaration was reached through an import.
    pub via_module: Option<String>,
    /// Name of the declaration in the module that declares it.
    pub name: String,
    /// Whether the declaring file exports it.
    pub is_exported: bool,
    pub node: DeclarationNode<'a>,
}

/// Abstracts reflection operations on the AST.
pub trait ReflectionHost<'a> {
    /// Reflects the parameters of the class's own constructor, or `None` if it declares none.
    fn get_constructor_parameters(
        &self,
        clazz: &'a ClassDeclaration<'a>,
    ) -> Option<Vec<CtorParameter<'a>>>;

    /// Determines where a bare identifier was imported from.
    ///
    /// Returns `None` for locally declared identifiers and identifiers that can't be traced to an
    /// import declaration.
    fn get_import_of_identifier(&self, id: &'a ast::IdentifierReference<'a>) -> Option<Import<'a>>;

    /// Resolves `ns.name` where `ns` is a namespace import (`import * as ns from '...'`).
    fn get_import_of_namespaced_identifier(
        &self,
        id: &'a ast::IdentifierName<'a>,
        namespace: &'a ast::IdentifierReference<'a>,
    ) -> Option<Import<'a>>;

    fn get_declaration_of_identifier(
        &self,
        id: &'a ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>>;
}
