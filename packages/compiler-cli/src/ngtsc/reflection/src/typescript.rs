use super::host::*;
use super::type_to_value::type_to_value;
use oxc_ast::ast as oxc;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum ImportedBinding {
    Named(String),
    Default,
    Namespace,
}

#[derive(Debug, Clone)]
struct ImportEntry<'a> {
    binding: ImportedBinding,
    from: String,
    node: &'a oxc::ImportDeclaration<'a>,
}

#[derive(Debug, Clone, Copy)]
struct LocalDeclaration<'a> {
    node: DeclarationNode<'a>,
    is_exported: bool,
}

/// Reflects over a single parsed source file.
///
/// Import bindings and top-level declarations are indexed by local name when the host is built;
/// lookups afterwards never touch the tree again.
pub struct TypeScriptReflectionHost<'a> {
    imports: HashMap<String, ImportEntry<'a>>,
    declarations: HashMap<String, LocalDeclaration<'a>>,
}

impl<'a> TypeScriptReflectionHost<'a> {
    pub fn new(program: &'a oxc::Program<'a>) -> Self {
        let mut host = Self {
            imports: HashMap::new(),
            declarations: HashMap::new(),
        };

        for stmt in &program.body {
            match stmt {
                oxc::Statement::ImportDeclaration(decl) => host.record_import(decl),
                oxc::Statement::ClassDeclaration(class) => host.record_class(class, false),
                oxc::Statement::FunctionDeclaration(function) => {
                    host.record_function(function, false)
                }
                oxc::Statement::VariableDeclaration(variables) => {
                    host.record_variables(variables, false)
                }
                oxc::Statement::ExportNamedDeclaration(export) => {
                    if let Some(declaration) = &export.declaration {
                        host.record_declaration(declaration);
                    }
                }
                _ => {}
            }
        }

        host
    }

    fn record_import(&mut self, decl: &'a oxc::ImportDeclaration<'a>) {
        let Some(specifiers) = &decl.specifiers else {
            return;
        };
        let from = decl.source.value.to_string();

        for spec in specifiers {
            let (local, binding) = match spec {
                oxc::ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    let imported = match &s.imported {
                        oxc::ModuleExportName::IdentifierName(id) => id.name.to_string(),
                        oxc::ModuleExportName::IdentifierReference(id) => id.name.to_string(),
                        oxc::ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
                    };
                    (s.local.name.to_string(), ImportedBinding::Named(imported))
                }
                oxc::ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (s.local.name.to_string(), ImportedBinding::Default)
                }
                oxc::ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    (s.local.name.to_string(), ImportedBinding::Namespace)
                }
            };

            self.imports.insert(
                local,
                ImportEntry {
                    binding,
                    from: from.clone(),
                    node: decl,
                },
            );
        }
    }

    fn record_declaration(&mut self, declaration: &'a oxc::Declaration<'a>) {
        match declaration {
            oxc::Declaration::ClassDeclaration(class) => self.record_class(class, true),
            oxc::Declaration::FunctionDeclaration(function) => self.record_function(function, true),
            oxc::Declaration::VariableDeclaration(variables) => {
                self.record_variables(variables, true)
            }
            _ => {}
        }
    }

    fn record_class(&mut self, class: &'a oxc::Class<'a>, is_exported: bool) {
        if let Some(id) = &class.id {
            self.declarations.insert(
                id.name.to_string(),
                LocalDeclaration {
                    node: DeclarationNode::Class(class),
                    is_exported,
                },
            );
        }
    }

    fn record_function(&mut self, function: &'a oxc::Function<'a>, is_exported: bool) {
        if let Some(id) = &function.id {
            self.declarations.insert(
                id.name.to_string(),
                LocalDeclaration {
                    node: DeclarationNode::Function(function),
                    is_exported,
                },
            );
        }
    }

    fn record_variables(&mut self, variables: &'a oxc::VariableDeclaration<'a>, is_exported: bool) {
        for declarator in &variables.declarations {
            if let oxc::BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                self.declarations.insert(
                    id.name.to_string(),
                    LocalDeclaration {
                        node: DeclarationNode::Variable(declarator),
                        is_exported,
                    },
                );
            }
        }
    }

    fn convert_decorators(&self, oxc_decorators: &'a [oxc::Decorator<'a>]) -> Option<Vec<Decorator<'a>>> {
        let decorators: Vec<_> = oxc_decorators
            .iter()
            .filter_map(|decorator| self.convert_decorator(decorator))
            .collect();

        if decorators.is_empty() {
            None
        } else {
            Some(decorators)
        }
    }

    fn convert_decorator(&self, decorator: &'a oxc::Decorator<'a>) -> Option<Decorator<'a>> {
        let (callee, args) = match &decorator.expression {
            oxc::Expression::CallExpression(call_expr) => {
                let args = call_expr.arguments.iter().collect::<Vec<_>>();
                (&call_expr.callee, Some(args))
            }
            // @Decorator without parens
            expr => (expr, None),
        };

        match callee {
            oxc::Expression::Identifier(ident) => Some(Decorator {
                name: ident.name.to_string(),
                identifier: Some(&**ident),
                import: self.get_import_of_identifier(ident),
                node: decorator,
                args,
            }),
            oxc::Expression::StaticMemberExpression(member) => {
                let oxc::Expression::Identifier(namespace) = &member.object else {
                    return None;
                };
                Some(Decorator {
                    name: member.property.name.to_string(),
                    identifier: None,
                    import: self.get_import_of_namespaced_identifier(&member.property, namespace),
                    node: decorator,
                    args,
                })
            }
            _ => None,
        }
    }
}

impl<'a> ReflectionHost<'a> for TypeScriptReflectionHost<'a> {
    fn get_constructor_parameters(&self, clazz: &'a ClassDeclaration<'a>) -> Option<Vec<CtorParameter<'a>>> {
        let constructor = clazz.body.body.iter().find_map(|element| match element {
            // Overload signatures have no body.
            oxc::ClassElement::MethodDefinition(method)
                if method.kind == oxc::MethodDefinitionKind::Constructor
                    && method.value.body.is_some() =>
            {
                Some(method)
            }
            _ => None,
        })?;

        let params = constructor
            .value
            .params
            .items
            .iter()
            .map(|param| {
                let name = match &param.pattern.kind {
                    oxc::BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
                    _ => None,
                };
                let type_node = param
                    .pattern
                    .type_annotation
                    .as_ref()
                    .map(|t| &t.type_annotation);

                CtorParameter {
                    name,
                    name_node: &param.pattern,
                    type_value: type_to_value(type_node),
                    type_node,
                    decorators: self.convert_decorators(&param.decorators),
                }
            })
            .collect();

        Some(params)
    }

    fn get_import_of_identifier(&self, id: &'a oxc::IdentifierReference<'a>) -> Option<Import<'a>> {
        let entry = self.imports.get(id.name.as_str())?;
        let name = match &entry.binding {
            ImportedBinding::Named(imported) => imported.clone(),
            ImportedBinding::Default => "default".to_string(),
            ImportedBinding::Namespace => return None,
        };

        Some(Import {
            name,
            from: entry.from.clone(),
            node: entry.node,
        })
    }

    fn get_import_of_namespaced_identifier(
        &self,
        id: &'a oxc::IdentifierName<'a>,
        namespace: &'a oxc::IdentifierReference<'a>,
    ) -> Option<Import<'a>> {
        let entry = self.imports.get(namespace.name.as_str())?;
        if !matches!(entry.binding, ImportedBinding::Namespace) {
            return None;
        }

        Some(Import {
            name: id.name.to_string(),
            from: entry.from.clone(),
            node: entry.node,
        })
    }

    fn get_declaration_of_identifier(&self, id: &'a oxc::IdentifierReference<'a>) -> Option<Declaration<'a>> {
        if let Some(import) = self.get_import_of_identifier(id) {
            return Some(Declaration {
                via_module: Some(import.from),
                name: import.name,
                is_exported: true,
                node: DeclarationNode::External,
            });
        }

        let local = self.declarations.get(id.name.as_str())?;
        Some(Declaration {
            via_module: None,
            name: id.name.to_string(),
            is_exported: local.is_exported,
            node: local.node,
        })
    }
}
