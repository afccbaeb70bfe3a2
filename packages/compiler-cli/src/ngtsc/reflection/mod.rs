pub mod src;

pub use src::host::{
    ClassDeclaration, CtorParameter, Declaration, DeclarationNode, Decorator, Import,
    ReflectionHost, ValueNode,
};
pub use src::type_to_value::type_to_value;
pub use src::typescript::TypeScriptReflectionHost;
