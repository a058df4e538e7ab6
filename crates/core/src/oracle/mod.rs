//! Equivalence checks between two unified trees of the same source.
//!
//! [`compare`] is strict and reports the first divergence; [`AstMatcher`]
//! answers yes or no. Both accept the shapes listed in [`tolerated`], which
//! are different encodings of the same source text.

pub mod comparator;
pub mod invariants;
pub mod matcher;

use jdt_bridge_api::{Ast, InfixOperator, NodeId, NodeKind, PrefixOperator, Prop, render};
use thiserror::Error;

pub use comparator::{Comparator, compare, compare_units};
pub use invariants::{RangeViolation, ViolationKind, check_range_invariants, check_tree};
pub use matcher::AstMatcher;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct OracleDivergence {
    pub path: String,
    pub message: String,
}

impl OracleDivergence {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Whether two nodes of different shape encode the same source text.
pub fn tolerated(left: &Ast, l: NodeId, right: &Ast, r: NodeId) -> bool {
    tolerated_one_way(left, l, right, r) || tolerated_one_way(right, r, left, l)
}

fn tolerated_one_way(a_ast: &Ast, a: NodeId, b_ast: &Ast, b: NodeId) -> bool {
    match (a_ast.kind(a), b_ast.kind(b)) {
        (NodeKind::FieldAccess, NodeKind::QualifiedName) => {
            let (Some(expr), Some(a_name)) = (
                a_ast.child(a, Prop::Expression),
                a_ast.child(a, Prop::Name),
            ) else {
                return false;
            };
            let (Some(qualifier), Some(b_name)) = (
                b_ast.child(b, Prop::Qualifier),
                b_ast.child(b, Prop::Name),
            ) else {
                return false;
            };
            render(a_ast, expr) == render(b_ast, qualifier)
                && render(a_ast, a_name) == render(b_ast, b_name)
        }
        (NodeKind::NumberLiteral { .. }, NodeKind::PrefixExpression { operator })
            if matches!(operator, PrefixOperator::Minus | PrefixOperator::Plus) =>
        {
            b_ast
                .child(b, Prop::Operand)
                .is_some_and(|operand| matches!(b_ast.kind(operand), NodeKind::NumberLiteral { .. }))
                && render(a_ast, a) == render(b_ast, b)
        }
        (NodeKind::SimpleName { .. }, NodeKind::QualifiedName)
        | (NodeKind::SimpleType, NodeKind::QualifiedType) => render(a_ast, a) == render(b_ast, b),
        (NodeKind::StringLiteral { escaped }, NodeKind::InfixExpression { .. }) => {
            is_literal_concatenation(b_ast, b)
                && render(b_ast, b).replace("\" + \"", "") == *escaped
        }
        _ => false,
    }
}

/// `"a" + "b" (+ "c" ...)` with string literal operands only.
fn is_literal_concatenation(ast: &Ast, id: NodeId) -> bool {
    if !matches!(
        ast.kind(id),
        NodeKind::InfixExpression {
            operator: Some(InfixOperator::Plus)
        }
    ) {
        return false;
    }
    let mut operands = ast
        .child(id, Prop::LeftOperand)
        .into_iter()
        .chain(ast.child(id, Prop::RightOperand))
        .chain(ast.list(id, Prop::ExtendedOperands))
        .peekable();
    operands.peek().is_some()
        && operands.all(|operand| matches!(ast.kind(operand), NodeKind::StringLiteral { .. }))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use jdt_bridge_api::{Ast, InfixOperator, NodeId, NodeKind, Prop, SourceRange};

    pub fn name(ast: &mut Ast, text: &str, start: i32) -> NodeId {
        ast.alloc(
            NodeKind::SimpleName {
                identifier: text.into(),
            },
            SourceRange::new(start, text.len() as i32),
        )
    }

    pub fn string(ast: &mut Ast, escaped: &str, start: i32) -> NodeId {
        ast.alloc(
            NodeKind::StringLiteral {
                escaped: escaped.to_string(),
            },
            SourceRange::new(start, escaped.len() as i32),
        )
    }

    /// `"a" + "b"` starting at offset 0.
    pub fn concatenation(ast: &mut Ast) -> NodeId {
        let infix = ast.alloc(
            NodeKind::InfixExpression {
                operator: Some(InfixOperator::Plus),
            },
            SourceRange::new(0, 9),
        );
        let left = string(ast, "\"a\"", 0);
        let right = string(ast, "\"b\"", 6);
        ast.add_child(infix, Prop::LeftOperand, left);
        ast.add_child(infix, Prop::RightOperand, right);
        infix
    }

    /// `a.b` as a qualified name when `field_access` is false.
    pub fn dotted(ast: &mut Ast, field_access: bool) -> NodeId {
        let kind = if field_access {
            NodeKind::FieldAccess
        } else {
            NodeKind::QualifiedName
        };
        let node = ast.alloc(kind, SourceRange::new(0, 3));
        let qualifier = name(ast, "a", 0);
        let member = name(ast, "b", 2);
        let prop = if field_access {
            Prop::Expression
        } else {
            Prop::Qualifier
        };
        ast.add_child(node, prop, qualifier);
        ast.add_child(node, Prop::Name, member);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use jdt_bridge_api::SourceRange;

    #[test]
    fn test_field_access_matches_qualified_name() {
        let mut left = Ast::new();
        let l = dotted(&mut left, true);
        let mut right = Ast::new();
        let r = dotted(&mut right, false);
        assert!(tolerated(&left, l, &right, r));
        assert!(tolerated(&right, r, &left, l));
    }

    #[test]
    fn test_signed_literal_matches_number() {
        let mut left = Ast::new();
        let l = left.alloc(
            NodeKind::NumberLiteral { token: "-1".into() },
            SourceRange::new(0, 2),
        );
        let mut right = Ast::new();
        let r = right.alloc(
            NodeKind::PrefixExpression {
                operator: PrefixOperator::Minus,
            },
            SourceRange::new(0, 2),
        );
        let one = right.alloc(NodeKind::NumberLiteral { token: "1".into() }, SourceRange::new(1, 1));
        right.add_child(r, Prop::Operand, one);
        assert!(tolerated(&left, l, &right, r));
    }

    #[test]
    fn test_folded_string_matches_concatenation() {
        let mut left = Ast::new();
        let l = string(&mut left, "\"ab\"", 0);
        let mut right = Ast::new();
        let r = concatenation(&mut right);
        assert!(tolerated(&left, l, &right, r));

        let mut other = Ast::new();
        let o = string(&mut other, "\"ba\"", 0);
        assert!(!tolerated(&other, o, &right, r));
    }
}
