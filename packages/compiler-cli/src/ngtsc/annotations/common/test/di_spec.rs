// Dependency Injection Tests

use super::super::src::di::*;
use crate::config::AnalysisConfig;
use crate::ngtsc::diagnostics::{ErrorCode, FatalDiagnosticError};
use crate::ngtsc::reflection::{ReflectionHost, TypeScriptReflectionHost, ValueNode};
use crate::ngtsc::testing::TestProgram;
use crate::output::output_ast as o;
use oxc_allocator::Allocator;
use oxc_ast::ast;

fn dependencies_of<'a>(
    program: &'a TestProgram<'a>,
    options: &AnalysisConfig,
) -> Result<Vec<R3DependencyMetadata<'a>>, FatalDiagnosticError> {
    let host = TypeScriptReflectionHost::new(&program.program);
    get_constructor_dependencies_with_options(program.find_class("Foo"), &host, options)
}

fn token_text<'a>(program: &TestProgram<'a>, dep: &R3DependencyMetadata<'_>) -> &'a str {
    program.text(dep.token.as_wrapped_node().unwrap().span())
}

fn strict() -> AnalysisConfig {
    AnalysisConfig {
        strict_modifier_arguments: true,
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_end_to_end_dependencies() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {ElementRef, Inject, Optional, Self} from '@angular/core';
        import {Service} from './service';
        const TOKEN = 'token';

        class Foo {
            constructor(@Inject(TOKEN) x: any, @Optional() @Self() y: Service, z: ElementRef) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(deps.len(), 3);

    assert_eq!(token_text(&program, &deps[0]), "TOKEN");
    assert_eq!(deps[0].resolved, R3ResolvedDependencyType::Token);
    assert!(deps[0].flags().is_empty());

    assert_eq!(token_text(&program, &deps[1]), "Service");
    assert!(deps[1].optional);
    assert!(deps[1].self_);
    assert!(!deps[1].skip_self);
    assert!(!deps[1].host);
    assert_eq!(deps[1].resolved, R3ResolvedDependencyType::Token);
    assert_eq!(deps[1].flags(), InjectFlags::OPTIONAL | InjectFlags::SELF);

    assert_eq!(token_text(&program, &deps[2]), "ElementRef");
    assert!(deps[2].flags().is_empty());
    assert_eq!(deps[2].resolved, R3ResolvedDependencyType::ElementRef);
}

#[test]
fn test_class_without_constructor_has_no_dependencies() {
    let allocator = Allocator::default();
    let program = TestProgram::new(&allocator, "class Foo { bar(a) {} }");

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert!(deps.is_empty());
}

#[test]
fn test_one_descriptor_per_parameter_in_order() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        "class Foo { constructor(a: A, b: B, c: C, d: D) {} }",
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    let tokens: Vec<_> = deps.iter().map(|dep| token_text(&program, dep)).collect();
    assert_eq!(tokens, ["A", "B", "C", "D"]);
}

#[test]
fn test_inject_token_is_the_argument_verbatim() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Inject, forwardRef} from '@angular/core';
        class Foo {
            constructor(@Inject(forwardRef(() => Service)) a: Other) {}
        }
        class Service {}
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "forwardRef(() => Service)");
    assert!(matches!(
        deps[0].token_node(),
        Some(ValueNode::Expression(ast::Expression::CallExpression(_)))
    ));
    assert_eq!(deps[0].resolved, R3ResolvedDependencyType::Token);
}

#[test]
fn test_inject_with_wrong_arity_fails() {
    for decorator in [
        "@Inject()",
        "@Inject(A, B)",
        "@Inject",
        "@Inject(A, ...rest)",
        "@Inject(...tokens)",
    ] {
        let source = format!(
            "import {{Inject}} from '@angular/core';\nclass Foo {{ constructor({} a: Service) {{}} }}",
            decorator
        );
        let allocator = Allocator::default();
        let program = TestProgram::new(&allocator, &source);

        let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DecoratorArityWrong);
        assert_eq!(err.message, "Unexpected number of arguments to @Inject().");
        assert_eq!(program.text(err.span), decorator);
    }
}

#[test]
fn test_attribute_dependency() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Attribute, ElementRef} from '@angular/core';
        class Foo {
            constructor(@Attribute('title') title: string, @Attribute('host') el: ElementRef) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "'title'");
    assert_eq!(deps[0].resolved, R3ResolvedDependencyType::Attribute);

    // The type annotation never reclassifies an attribute.
    assert_eq!(token_text(&program, &deps[1]), "'host'");
    assert_eq!(deps[1].resolved, R3ResolvedDependencyType::Attribute);
}

#[test]
fn test_attribute_with_wrong_arity_fails() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Attribute} from '@angular/core';
        class Foo {
            constructor(@Attribute('a', 'b') title: string) {}
        }
        "#,
    );

    let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DecoratorArityWrong);
    assert_eq!(err.message, "Unexpected number of arguments to @Attribute().");
}

#[test]
fn test_attribute_with_spread_arguments_fails() {
    for decorator in ["@Attribute('a', ...rest)", "@Attribute(...names)"] {
        let source = format!(
            "import {{Attribute}} from '@angular/core';\nclass Foo {{ constructor({} a: string) {{}} }}",
            decorator
        );
        let allocator = Allocator::default();
        let program = TestProgram::new(&allocator, &source);

        let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DecoratorArityWrong, "{}", decorator);
        assert_eq!(err.message, "Unexpected number of arguments to @Attribute().");
    }
}

#[test]
fn test_last_token_decorator_wins() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Attribute, Inject} from '@angular/core';
        class Foo {
            constructor(@Inject(A) @Inject(B) a: C, @Attribute('x') @Inject(D) b: E) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "B");
    assert_eq!(token_text(&program, &deps[1]), "D");
    assert_eq!(deps[1].resolved, R3ResolvedDependencyType::Attribute);
}

#[test]
fn test_missing_token_fails() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Optional} from '@angular/core';
        class Foo {
            constructor(@Optional() a) {}
        }
        "#,
    );

    let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::ParamMissingToken);
    assert_eq!(
        err.message,
        "No suitable injection token for parameter 'a' of class 'Foo'."
    );
    assert_eq!(program.text(err.span), "a");
}

#[test]
fn test_keyword_type_is_not_a_token() {
    let allocator = Allocator::default();
    let program = TestProgram::new(&allocator, "class Foo { constructor(a: string) {} }");

    let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::ParamMissingToken);
}

#[test]
fn test_missing_token_reports_index_of_unnamed_parameter() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        "class Foo { constructor(a: Bar, {b}: any) {} }",
    );

    let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err.message,
        "No suitable injection token for parameter '1' of class 'Foo'."
    );
}

#[test]
fn test_missing_token_in_anonymous_class() {
    let allocator = Allocator::default();
    let program = TestProgram::new(&allocator, "const Foo = class { constructor(a) {} };");
    let host = TypeScriptReflectionHost::new(&program.program);

    let ast::Expression::ClassExpression(class) = program.initializer_of("Foo") else {
        panic!("not a class expression");
    };
    let err = get_constructor_dependencies(class, &host, false).unwrap_err();
    assert_eq!(
        err.message,
        "No suitable injection token for parameter 'a' of class '<anonymous>'."
    );
}

#[test]
fn test_modifier_flags_are_independent() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Host, Optional, Self, SkipSelf} from '@angular/core';
        class Foo {
            constructor(
                @Optional() a: A,
                @Self() b: B,
                @SkipSelf() c: C,
                @Host() d: D,
                @Host() @SkipSelf() @Self() @Optional() @Optional() e: E,
            ) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(deps[0].flags(), InjectFlags::OPTIONAL);
    assert_eq!(deps[1].flags(), InjectFlags::SELF);
    assert_eq!(deps[2].flags(), InjectFlags::SKIP_SELF);
    assert_eq!(deps[3].flags(), InjectFlags::HOST);
    assert_eq!(deps[4].flags(), InjectFlags::all());
    assert_eq!(deps[4].flags().bits(), 0b1111);
}

#[test]
fn test_unknown_core_decorator_fails() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Component} from '@angular/core';
        class Foo {
            constructor(@Component() a: Service) {}
        }
        "#,
    );

    let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DecoratorUnexpected);
    assert_eq!(err.message, "Unexpected decorator Component on parameter.");
    assert_eq!(program.text(err.span), "@Component()");
}

#[test]
fn test_foreign_decorators_are_ignored() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Inject} from 'other-di';
        class Foo {
            constructor(@Inject(TOKEN) a: Service, @Whatever() b: Other) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "Service");
    assert_eq!(token_text(&program, &deps[1]), "Other");
}

#[test]
fn test_core_trusts_untracked_decorators() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        class Foo {
            constructor(@Inject(TOKEN) a: any, @Optional() b: Service) {}
        }
        "#,
    );
    let host = TypeScriptReflectionHost::new(&program.program);

    let deps = get_constructor_dependencies(program.find_class("Foo"), &host, true).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "TOKEN");
    assert!(deps[1].optional);

    // Outside the core the same decorators are somebody else's.
    let err = get_constructor_dependencies(program.find_class("Foo"), &host, false).unwrap_err();
    assert_eq!(err.code, ErrorCode::ParamMissingToken);
}

#[test]
fn test_core_rejects_unknown_decorators() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        "class Foo { constructor(@Whatever() a: Service) {} }",
    );

    let err = dependencies_of(&program, &AnalysisConfig::core()).unwrap_err();
    assert_eq!(err.message, "Unexpected decorator Whatever on parameter.");
}

#[test]
fn test_aliased_decorators_match_exported_name() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Inject as I, Optional as O} from '@angular/core';
        class Foo {
            constructor(@I(TOKEN) a: any, @O() b: Service) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "TOKEN");
    assert!(deps[1].optional);
}

#[test]
fn test_aliased_unknown_decorator_is_reported_by_exported_name() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Input as Inject} from '@angular/core';
        class Foo {
            constructor(@Inject(TOKEN) a: any) {}
        }
        "#,
    );

    let err = dependencies_of(&program, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err.message, "Unexpected decorator Input on parameter.");
}

#[test]
fn test_namespaced_decorators() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import * as core from '@angular/core';
        class Foo {
            constructor(@core.Inject(TOKEN) @core.Host() a: any, b: core.ElementRef) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(token_text(&program, &deps[0]), "TOKEN");
    assert!(deps[0].host);

    // A qualified type name is a plain token.
    assert_eq!(token_text(&program, &deps[1]), "core.ElementRef");
    assert_eq!(deps[1].resolved, R3ResolvedDependencyType::Token);
}

#[test]
fn test_modifier_arguments_are_tolerated_by_default() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Optional, Self} from '@angular/core';
        class Foo {
            constructor(@Optional(true) @Self a: Service) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert!(deps[0].optional);
    assert!(deps[0].self_);
}

#[test]
fn test_strict_modifier_arguments() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Optional} from '@angular/core';
        class Foo {
            constructor(@Optional(true) a: Service) {}
        }
        "#,
    );

    let err = dependencies_of(&program, &strict()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DecoratorArityWrong);
    assert_eq!(err.message, "Unexpected arguments to @Optional().");
}

#[test]
fn test_strict_mode_accepts_empty_modifiers() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Host, SkipSelf} from '@angular/core';
        class Foo {
            constructor(@Host() @SkipSelf a: Service) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &strict()).unwrap();
    assert_eq!(deps[0].flags(), InjectFlags::HOST | InjectFlags::SKIP_SELF);
}

#[test]
fn test_well_known_tokens() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {
            ChangeDetectorRef, ElementRef, Injector, Renderer2, TemplateRef, ViewContainerRef,
        } from '@angular/core';
        class Foo {
            constructor(
                a: ChangeDetectorRef,
                b: ElementRef,
                c: Injector,
                d: TemplateRef<any>,
                e: ViewContainerRef,
                f: Renderer2 | null,
            ) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    let kinds: Vec<_> = deps.iter().map(|dep| dep.resolved).collect();
    assert_eq!(
        kinds,
        [
            R3ResolvedDependencyType::ChangeDetectorRef,
            R3ResolvedDependencyType::ElementRef,
            R3ResolvedDependencyType::Injector,
            R3ResolvedDependencyType::TemplateRef,
            R3ResolvedDependencyType::ViewContainerRef,
            R3ResolvedDependencyType::Renderer2,
        ]
    );
}

#[test]
fn test_well_known_names_from_other_modules_are_tokens() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {ElementRef} from './my-core';
        class Injector {}
        class Foo {
            constructor(a: ElementRef, b: Injector) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(deps[0].resolved, R3ResolvedDependencyType::Token);
    assert_eq!(deps[1].resolved, R3ResolvedDependencyType::Token);
}

#[test]
fn test_classify_well_known_token() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {ElementRef as Ref, Injector} from '@angular/core';
        const a = Ref, b = Injector, c = Other, d = Ref.prototype;
        "#,
    );
    let host = TypeScriptReflectionHost::new(&program.program);
    let classify =
        |name: &str| classify_well_known_token(&ValueNode::Expression(program.initializer_of(name)), &host);

    assert_eq!(classify("a"), Some(R3ResolvedDependencyType::ElementRef));
    assert_eq!(classify("b"), Some(R3ResolvedDependencyType::Injector));
    assert_eq!(classify("c"), None);
    assert_eq!(classify("d"), None);
}

#[test]
fn test_inject_with_well_known_identifier() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Inject, Injector} from '@angular/core';
        class Foo {
            constructor(@Inject(Injector) a: any) {}
        }
        "#,
    );

    let deps = dependencies_of(&program, &AnalysisConfig::default()).unwrap();
    assert_eq!(deps[0].resolved, R3ResolvedDependencyType::Injector);
}

#[test]
fn test_get_valid_constructor_dependencies() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        class Foo {
            constructor(a) {}
        }
        class Bar {
            constructor(a: Service) {}
        }
        "#,
    );
    let host = TypeScriptReflectionHost::new(&program.program);

    assert!(get_valid_constructor_dependencies(program.find_class("Foo"), &host, false).is_none());
    let deps = get_valid_constructor_dependencies(program.find_class("Bar"), &host, false).unwrap();
    assert_eq!(deps.len(), 1);
}

#[test]
fn test_parse_uses_invoked_name_in_core() {
    let allocator = Allocator::default();
    let program = TestProgram::new(
        &allocator,
        r#"
        import {Inject as I} from '@angular/core';
        class Foo {
            constructor(@I(TOKEN) a) {}
        }
        "#,
    );
    let host = TypeScriptReflectionHost::new(&program.program);
    let params = host
        .get_constructor_parameters(program.find_class("Foo"))
        .unwrap();
    let decorator = &params[0].decorators.as_ref().unwrap()[0];

    assert!(matches!(
        ParameterDecorator::parse(decorator, &AnalysisConfig::default()),
        Ok(ParameterDecorator::Inject(_))
    ));
    let err = ParameterDecorator::parse(decorator, &AnalysisConfig::core()).unwrap_err();
    assert_eq!(err.message, "Unexpected decorator I on parameter.");
}

#[test]
fn test_fold_modifiers_without_token() {
    let injection = fold_parameter_decorators(
        None,
        &[
            ParameterDecorator::Optional,
            ParameterDecorator::Host,
            ParameterDecorator::Optional,
        ],
    );

    assert!(injection.token.is_none());
    assert!(injection.optional);
    assert!(injection.host);
    assert!(!injection.self_);
    assert!(!injection.skip_self);
    assert_eq!(injection.resolved, R3ResolvedDependencyType::Token);
}

#[test]
fn test_dependency_metadata_builders() {
    let dep = R3DependencyMetadata::new(o::read_var("TOKEN"))
        .with_host()
        .with_skip_self();

    assert_eq!(dep.flags(), InjectFlags::HOST | InjectFlags::SKIP_SELF);
    assert_eq!(dep.resolved, R3ResolvedDependencyType::Token);
    assert!(dep.token_node().is_none());

    let dep = dep.with_optional().with_self();
    assert_eq!(dep.flags().bits(), 15);
}

#[test]
fn test_from_well_known_name() {
    assert_eq!(
        R3ResolvedDependencyType::from_well_known_name("TemplateRef"),
        Some(R3ResolvedDependencyType::TemplateRef)
    );
    assert_eq!(R3ResolvedDependencyType::from_well_known_name("Renderer"), None);
}
