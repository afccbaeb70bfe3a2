use super::host::ValueNode;
use oxc_ast::ast;

/// Finds the value side of a parameter's type annotation.
///
/// `Foo` and `ns.Foo` name a value that can be injected; `Foo | null` is read as `Foo`. Every other
/// type (keywords, literals, unions of several references, function types) yields `None`.
pub fn type_to_value<'a>(type_node: Option<&'a ast::TSType<'a>>) -> Option<ValueNode<'a>> {
    let type_node = strip_null_from_union(type_node?);

    match type_node {
        ast::TSType::TSTypeReference(reference) => Some(ValueNode::TypeName(&reference.type_name)),
        _ => None,
    }
}

fn strip_null_from_union<'a>(type_node: &'a ast::TSType<'a>) -> &'a ast::TSType<'a> {
    let ast::TSType::TSUnionType(union_type) = type_node else {
        return type_node;
    };

    let mut non_null = union_type
        .types
        .iter()
        .filter(|member| !matches!(member, ast::TSType::TSNullKeyword(_)));

    match (non_null.next(), non_null.next()) {
        (Some(only), None) => only,
        _ => type_node,
    }
}
