// Annotations Common Source Module

pub mod di;
pub mod util;

// Re-exports
pub use di::{
    classify_well_known_token, fold_parameter_decorators, get_constructor_dependencies,
    get_constructor_dependencies_with_options, get_valid_constructor_dependencies, InjectFlags,
    ParameterDecorator, ParameterInjection, R3DependencyMetadata, R3ResolvedDependencyType,
};
pub use util::{
    expand_forward_ref, forward_ref_resolver, is_angular_core, reference_to_expression,
    to_r3_reference, try_unwrap_forward_ref, unwrap_deferred, unwrap_expression,
    unwrap_forward_ref, ForwardRefResolver, R3Reference, CORE_MODULE, FORWARD_REF,
};
