//! Small helpers over tree-sitter nodes.

use tree_sitter::Node;

pub(crate) fn start(node: Node<'_>) -> i32 {
    node.start_byte() as i32
}

pub(crate) fn end(node: Node<'_>) -> i32 {
    node.end_byte() as i32
}

pub(crate) fn is_comment(node: &Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

/// Named children without comments.
pub(crate) fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_comment(c))
        .collect()
}

pub(crate) fn all<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

pub(crate) fn by_field<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

pub(crate) fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    all(node).into_iter().find(|c| c.kind() == kind)
}

pub(crate) fn has_token(node: Node<'_>, kind: &str) -> bool {
    all(node).iter().any(|c| !c.is_named() && c.kind() == kind)
}

/// Start of the last `token` child that ends at or before `before`.
pub(crate) fn token_before(node: Node<'_>, token: &str, before: i32) -> Option<i32> {
    all(node)
        .into_iter()
        .filter(|c| c.kind() == token && end(*c) <= before)
        .map(start)
        .last()
}

pub(crate) fn token_start(node: Node<'_>, token: &str) -> Option<i32> {
    all(node)
        .into_iter()
        .find(|c| c.kind() == token)
        .map(start)
}

pub(crate) fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

pub(crate) fn is_type(kind: &str) -> bool {
    matches!(
        kind,
        "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "void_type"
            | "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "annotated_type"
            | "wildcard"
    )
}

pub(crate) fn is_statement(kind: &str) -> bool {
    is_type_declaration(kind)
        || matches!(
            kind,
            "block"
                | "local_variable_declaration"
                | "expression_statement"
                | "if_statement"
                | "while_statement"
                | "do_statement"
                | "for_statement"
                | "enhanced_for_statement"
                | "labeled_statement"
                | "break_statement"
                | "continue_statement"
                | "return_statement"
                | "yield_statement"
                | "throw_statement"
                | "switch_expression"
                | "synchronized_statement"
                | "try_statement"
                | "try_with_resources_statement"
                | "assert_statement"
                | "explicit_constructor_invocation"
        )
}

pub(crate) fn is_expression(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "this"
            | "super"
            | "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "true"
            | "false"
            | "character_literal"
            | "string_literal"
            | "text_block"
            | "null_literal"
            | "parenthesized_expression"
            | "binary_expression"
            | "unary_expression"
            | "update_expression"
            | "assignment_expression"
            | "ternary_expression"
            | "cast_expression"
            | "instanceof_expression"
            | "lambda_expression"
            | "method_invocation"
            | "object_creation_expression"
            | "field_access"
            | "array_access"
            | "array_creation_expression"
            | "array_initializer"
            | "class_literal"
            | "method_reference"
            | "switch_expression"
            | "template_expression"
    )
}
