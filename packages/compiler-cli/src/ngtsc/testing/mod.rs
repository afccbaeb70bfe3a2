//! Helpers shared by the unit tests: parse a TypeScript fixture and look nodes up by name.

use oxc_allocator::Allocator;
use oxc_ast::ast;
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};

pub struct TestProgram<'a> {
    pub source: &'a str,
    pub program: ast::Program<'a>,
}

impl<'a> TestProgram<'a> {
    pub fn new(allocator: &'a Allocator, source: &'a str) -> Self {
        let source_type = SourceType::default().with_typescript(true).with_module(true);
        let ret = Parser::new(allocator, source, source_type).parse();

        if !ret.errors.is_empty() {
            panic!("Parse errors: {:?}", ret.errors);
        }

        Self {
            source,
            program: ret.program,
        }
    }

    pub fn text(&self, span: Span) -> &'a str {
        span.source_text(self.source)
    }

    pub fn find_class(&self, name: &str) -> &ast::Class<'a> {
        for stmt in &self.program.body {
            let class = match stmt {
                ast::Statement::ClassDeclaration(class) => Some(class),
                ast::Statement::ExportNamedDeclaration(decl) => match &decl.declaration {
                    Some(ast::Declaration::ClassDeclaration(class)) => Some(class),
                    _ => None,
                },
                _ => None,
            };
            if let Some(class) = class {
                if class.id.as_ref().is_some_and(|id| id.name == name) {
                    return class;
                }
            }
        }
        panic!("Class {} not found", name)
    }

    /// The initializer of the top-level `const`/`let` named `name`.
    pub fn initializer_of(&self, name: &str) -> &ast::Expression<'a> {
        for stmt in &self.program.body {
            let variables = match stmt {
                ast::Statement::VariableDeclaration(variables) => Some(variables),
                ast::Statement::ExportNamedDeclaration(decl) => match &decl.declaration {
                    Some(ast::Declaration::VariableDeclaration(variables)) => Some(variables),
                    _ => None,
                },
                _ => None,
            };
            for declarator in variables.into_iter().flat_map(|v| v.declarations.iter()) {
                if let ast::BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                    if id.name == name {
                        return declarator.init.as_ref().expect("variable has no initializer");
                    }
                }
            }
        }
        panic!("Variable {} not found", name)
    }
}
