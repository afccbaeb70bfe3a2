// Dependency Injection Utilities
//
// Functions for analyzing constructor dependencies and injection tokens.

use super::util::{is_angular_core, CORE_MODULE};
use crate::config::AnalysisConfig;
use crate::ngtsc::diagnostics::{ErrorCode, FatalDiagnosticError};
use crate::ngtsc::reflection::{ClassDeclaration, CtorParameter, Decorator, ReflectionHost, ValueNode};
use crate::output::output_ast::{Expression, WrappedNodeExpr};
use bitflags::bitflags;
use oxc_ast::ast;
use oxc_span::GetSpan;
use tracing::{debug, trace};

/// Represents a constructor dependency metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct R3DependencyMetadata<'a> {
    /// The token expression for the dependency.
    pub token: Expression<'a>,
    /// Whether the dependency is optional (@Optional).
    pub optional: bool,
    /// Whether to resolve from host (@Host).
    pub host: bool,
    /// Whether to use self (@Self).
    pub self_: bool,
    /// Whether to skip self (@SkipSelf).
    pub skip_self: bool,
    /// How to resolve this dependency.
    pub resolved: R3ResolvedDependencyType,
}

impl<'a> R3DependencyMetadata<'a> {
    pub fn new(token: Expression<'a>) -> Self {
        Self {
            token,
            optional: false,
            host: false,
            self_: false,
            skip_self: false,
            resolved: R3ResolvedDependencyType::Token,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_host(mut self) -> Self {
        self.host = true;
        self
    }

    pub fn with_self(mut self) -> Self {
        self.self_ = true;
        self
    }

    pub fn with_skip_self(mut self) -> Self {
        self.skip_self = true;
        self
    }

    /// The source node the token was taken from.
    pub fn token_node(&self) -> Option<ValueNode<'a>> {
        self.token.as_wrapped_node().map(|wrapped| wrapped.node)
    }

    /// The modifier flags packed the way the injection runtime expects them.
    pub fn flags(&self) -> InjectFlags {
        let mut flags = InjectFlags::empty();
        flags.set(InjectFlags::HOST, self.host);
        flags.set(InjectFlags::SELF, self.self_);
        flags.set(InjectFlags::SKIP_SELF, self.skip_self);
        flags.set(InjectFlags::OPTIONAL, self.optional);
        flags
    }
}

bitflags! {
    /// Injection flags understood by the runtime's `inject` instruction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InjectFlags: u8 {
        const HOST = 0b0001;
        const SELF = 0b0010;
        const SKIP_SELF = 0b0100;
        const OPTIONAL = 0b1000;
    }
}

/// How a dependency is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R3ResolvedDependencyType {
    /// A normal token.
    Token,
    /// The dependency is resolved to an attribute of the host element.
    Attribute,
    ChangeDetectorRef,
    ElementRef,
    Injector,
    TemplateRef,
    ViewContainerRef,
    Renderer2,
}

impl R3ResolvedDependencyType {
    /// Maps a symbol exported by the core module to the special handle it injects.
    pub fn from_well_known_name(name: &str) -> Option<Self> {
        match name {
            "ChangeDetectorRef" => Some(Self::ChangeDetectorRef),
            "ElementRef" => Some(Self::ElementRef),
            "Injector" => Some(Self::Injector),
            "TemplateRef" => Some(Self::TemplateRef),
            "ViewContainerRef" => Some(Self::ViewContainerRef),
            "Renderer2" => Some(Self::Renderer2),
            _ => None,
        }
    }
}

/// Decorator names that affect dependency resolution.
const OPTIONAL_DECORATOR: &str = "Optional";
const SELF_DECORATOR: &str = "Self";
const SKIP_SELF_DECORATOR: &str = "SkipSelf";
const HOST_DECORATOR: &str = "Host";
const INJECT_DECORATOR: &str = "Inject";
const ATTRIBUTE_DECORATOR: &str = "Attribute";

/// A recognized decorator on a constructor parameter, with its validated payload.
#[derive(Debug, Clone, Copy)]
pub enum ParameterDecorator<'a> {
    Inject(&'a ast::Expression<'a>),
    Attribute(&'a ast::Expression<'a>),
    Optional,
    Self_,
    SkipSelf,
    Host,
}

impl<'a> ParameterDecorator<'a> {
    /// Validates a framework decorator found on a constructor parameter.
    ///
    /// Any name outside the recognized set is an error, as is `@Inject`/`@Attribute` without
    /// exactly one argument.
    pub fn parse(
        decorator: &Decorator<'a>,
        options: &AnalysisConfig,
    ) -> Result<Self, FatalDiagnosticError> {
        let name = if options.is_core {
            decorator.name.as_str()
        } else {
            decorator.exported_name()
        };

        match name {
            INJECT_DECORATOR => single_argument(decorator, name).map(ParameterDecorator::Inject),
            ATTRIBUTE_DECORATOR => {
                single_argument(decorator, name).map(ParameterDecorator::Attribute)
            }
            OPTIONAL_DECORATOR => {
                no_payload(decorator, name, options).map(|()| ParameterDecorator::Optional)
            }
            SELF_DECORATOR => no_payload(decorator, name, options).map(|()| ParameterDecorator::Self_),
            SKIP_SELF_DECORATOR => {
                no_payload(decorator, name, options).map(|()| ParameterDecorator::SkipSelf)
            }
            HOST_DECORATOR => no_payload(decorator, name, options).map(|()| ParameterDecorator::Host),
            _ => Err(FatalDiagnosticError::new(
                ErrorCode::DecoratorUnexpected,
                decorator.span(),
                format!("Unexpected decorator {} on parameter.", name),
            )),
        }
    }
}

fn single_argument<'a>(
    decorator: &Decorator<'a>,
    name: &str,
) -> Result<&'a ast::Expression<'a>, FatalDiagnosticError> {
    // A lone spread may expand to any number of arguments.
    let arg = match decorator.args.as_deref() {
        Some([arg]) => arg.as_expression(),
        _ => None,
    };
    arg.ok_or_else(|| {
        FatalDiagnosticError::new(
            ErrorCode::DecoratorArityWrong,
            decorator.span(),
            format!("Unexpected number of arguments to @{}().", name),
        )
    })
}

fn no_payload(
    decorator: &Decorator<'_>,
    name: &str,
    options: &AnalysisConfig,
) -> Result<(), FatalDiagnosticError> {
    let has_args = decorator.args.as_ref().is_some_and(|args| !args.is_empty());
    if options.strict_modifier_arguments && has_args {
        return Err(FatalDiagnosticError::new(
            ErrorCode::DecoratorArityWrong,
            decorator.span(),
            format!("Unexpected arguments to @{}().", name),
        ));
    }
    Ok(())
}

/// The injection requirements accumulated from a parameter's decorators.
#[derive(Debug, Clone, Copy)]
pub struct ParameterInjection<'a> {
    pub token: Option<ValueNode<'a>>,
    pub optional: bool,
    pub host: bool,
    pub self_: bool,
    pub skip_self: bool,
    pub resolved: R3ResolvedDependencyType,
}

/// Folds decorators, in source order, over the token taken from the parameter's type.
///
/// Modifier flags only ever get set. The last `@Inject`/`@Attribute` decides the token;
/// `@Attribute` additionally marks the dependency as an attribute.
pub fn fold_parameter_decorators<'a>(
    type_token: Option<ValueNode<'a>>,
    decorators: &[ParameterDecorator<'a>],
) -> ParameterInjection<'a> {
    let mut injection = ParameterInjection {
        token: type_token,
        optional: false,
        host: false,
        self_: false,
        skip_self: false,
        resolved: R3ResolvedDependencyType::Token,
    };

    for decorator in decorators {
        match *decorator {
            ParameterDecorator::Inject(token) => injection.token = Some(ValueNode::Expression(token)),
            ParameterDecorator::Attribute(attribute) => {
                injection.token = Some(ValueNode::Expression(attribute));
                injection.resolved = R3ResolvedDependencyType::Attribute;
            }
            ParameterDecorator::Optional => injection.optional = true,
            ParameterDecorator::Self_ => injection.self_ = true,
            ParameterDecorator::SkipSelf => injection.skip_self = true,
            ParameterDecorator::Host => injection.host = true,
        }
    }

    injection
}

/// Recognizes tokens naming one of the handles the framework itself provides (`ElementRef`,
/// `Injector`, ...).
///
/// Only a bare identifier imported from `@angular/core` under one of those names matches. Local
/// declarations, imports from other modules and non-identifiers are plain tokens.
pub fn classify_well_known_token<'a>(
    token: &ValueNode<'a>,
    reflector: &dyn ReflectionHost<'a>,
) -> Option<R3ResolvedDependencyType> {
    let id = token.as_identifier()?;
    let import = reflector.get_import_of_identifier(id)?;
    if import.from != CORE_MODULE {
        return None;
    }
    R3ResolvedDependencyType::from_well_known_name(&import.name)
}

/// Get constructor dependencies for a class.
///
/// Returns one entry per constructor parameter, in order, or an empty list when the class declares
/// no constructor. `is_core` trusts every decorator without checking where it was imported from.
pub fn get_constructor_dependencies<'a>(
    clazz: &'a ClassDeclaration<'a>,
    reflector: &dyn ReflectionHost<'a>,
    is_core: bool,
) -> Result<Vec<R3DependencyMetadata<'a>>, FatalDiagnosticError> {
    let options = AnalysisConfig {
        is_core,
        ..AnalysisConfig::default()
    };
    get_constructor_dependencies_with_options(clazz, reflector, &options)
}

pub fn get_constructor_dependencies_with_options<'a>(
    clazz: &'a ClassDeclaration<'a>,
    reflector: &dyn ReflectionHost<'a>,
    options: &AnalysisConfig,
) -> Result<Vec<R3DependencyMetadata<'a>>, FatalDiagnosticError> {
    let class_name = clazz
        .id
        .as_ref()
        .map_or_else(|| "<anonymous>".to_string(), |id| id.name.to_string());

    let Some(params) = reflector.get_constructor_parameters(clazz) else {
        debug!(class = %class_name, "no constructor to analyse");
        return Ok(Vec::new());
    };

    debug!(
        class = %class_name,
        params = params.len(),
        is_core = options.is_core,
        "analysing constructor dependencies"
    );

    params
        .iter()
        .enumerate()
        .map(|(index, param)| analyze_ctor_parameter(index, param, &class_name, reflector, options))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|err| debug!(class = %class_name, code = ?err.code, "{}", err.message))
}

/// Get only valid constructor dependencies, discarding the diagnostic when there is one.
pub fn get_valid_constructor_dependencies<'a>(
    clazz: &'a ClassDeclaration<'a>,
    reflector: &dyn ReflectionHost<'a>,
    is_core: bool,
) -> Option<Vec<R3DependencyMetadata<'a>>> {
    get_constructor_dependencies(clazz, reflector, is_core).ok()
}

fn analyze_ctor_parameter<'a>(
    index: usize,
    param: &CtorParameter<'a>,
    class_name: &str,
    reflector: &dyn ReflectionHost<'a>,
    options: &AnalysisConfig,
) -> Result<R3DependencyMetadata<'a>, FatalDiagnosticError> {
    // Decorators from other libraries are none of our business.
    let decorators = param
        .decorators
        .iter()
        .flatten()
        .filter(|decorator| options.is_core || is_angular_core(decorator))
        .map(|decorator| ParameterDecorator::parse(decorator, options))
        .collect::<Result<Vec<_>, _>>()?;

    let injection = fold_parameter_decorators(param.type_value, &decorators);

    let Some(token) = injection.token else {
        let param_label = param.name.clone().unwrap_or_else(|| index.to_string());
        return Err(FatalDiagnosticError::new(
            ErrorCode::ParamMissingToken,
            param.name_node.kind.span(),
            format!(
                "No suitable injection token for parameter '{}' of class '{}'.",
                param_label, class_name
            ),
        ));
    };

    let mut resolved = injection.resolved;
    if resolved == R3ResolvedDependencyType::Token {
        if let Some(kind) = classify_well_known_token(&token, reflector) {
            resolved = kind;
        }
    }

    trace!(
        class = %class_name,
        index,
        optional = injection.optional,
        self_ = injection.self_,
        skip_self = injection.skip_self,
        host = injection.host,
        resolved = ?resolved,
        "resolved constructor parameter"
    );

    Ok(R3DependencyMetadata {
        token: Expression::WrappedNode(WrappedNodeExpr::new(token)),
        optional: injection.optional,
        host: injection.host,
        self_: injection.self_,
        skip_self: injection.skip_self,
        resolved,
    })
}
