//! Structural matching that ignores positions and flags.

use super::tolerated;
use jdt_bridge_api::{Ast, InfixOperator, NodeId, NodeKind, Prop};

/// Verdict-only counterpart of the comparator. On top of the comparator's
/// tolerated shapes, constant string expressions match when they fold to the
/// same value, however they are split or parenthesized.
#[derive(Debug, Clone, Copy)]
pub struct AstMatcher {
    fold_strings: bool,
}

impl AstMatcher {
    pub fn new() -> Self {
        Self { fold_strings: true }
    }

    /// Disables constant string folding.
    pub fn strict() -> Self {
        Self { fold_strings: false }
    }

    pub fn matches(&self, a_ast: &Ast, a: NodeId, b_ast: &Ast, b: NodeId) -> bool {
        let (ak, bk) = (a_ast.kind(a), b_ast.kind(b));
        if ak != bk {
            return tolerated(a_ast, a, b_ast, b) || self.same_folded_string(a_ast, a, b_ast, b);
        }
        let mut props = a_ast.props(a);
        for prop in b_ast.props(b) {
            if !props.contains(&prop) {
                props.push(prop);
            }
        }
        props.into_iter().all(|prop| {
            a_ast.list_len(a, prop) == b_ast.list_len(b, prop)
                && a_ast
                    .list(a, prop)
                    .zip(b_ast.list(b, prop))
                    .all(|(x, y)| self.matches(a_ast, x, b_ast, y))
        })
    }

    fn same_folded_string(&self, a_ast: &Ast, a: NodeId, b_ast: &Ast, b: NodeId) -> bool {
        if !self.fold_strings {
            return false;
        }
        match (folded_string(a_ast, a), folded_string(b_ast, b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

impl Default for AstMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Escaped content of a string literal or of a `+` chain of them, quotes removed.
fn folded_string(ast: &Ast, id: NodeId) -> Option<String> {
    match ast.kind(id) {
        NodeKind::StringLiteral { escaped } => escaped
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .map(str::to_string),
        NodeKind::ParenthesizedExpression => folded_string(ast, ast.child(id, Prop::Expression)?),
        NodeKind::InfixExpression {
            operator: Some(InfixOperator::Plus),
        } => {
            let mut out = folded_string(ast, ast.child(id, Prop::LeftOperand)?)?;
            out.push_str(&folded_string(ast, ast.child(id, Prop::RightOperand)?)?);
            for operand in ast.list(id, Prop::ExtendedOperands) {
                out.push_str(&folded_string(ast, operand)?);
            }
            Some(out)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use jdt_bridge_api::SourceRange;

    #[test]
    fn test_positions_are_ignored() {
        let mut left = Ast::new();
        let l = dotted(&mut left, false);
        let mut right = Ast::new();
        let r = dotted(&mut right, false);
        right.set_range(r, SourceRange::new(40, 3));
        assert!(AstMatcher::new().matches(&left, l, &right, r));
    }

    #[test]
    fn test_nested_concatenation_folds() {
        let mut left = Ast::new();
        let inner = concatenation(&mut left);
        let paren = left.alloc(NodeKind::ParenthesizedExpression, SourceRange::new(0, 11));
        left.add_child(paren, Prop::Expression, inner);
        let outer = left.alloc(
            NodeKind::InfixExpression {
                operator: Some(InfixOperator::Plus),
            },
            SourceRange::new(0, 17),
        );
        let c = string(&mut left, "\"c\"", 14);
        left.add_child(outer, Prop::LeftOperand, paren);
        left.add_child(outer, Prop::RightOperand, c);

        let mut right = Ast::new();
        let r = string(&mut right, "\"abc\"", 0);
        assert!(AstMatcher::new().matches(&left, outer, &right, r));
        assert!(AstMatcher::new().matches(&right, r, &left, outer));
        assert!(!AstMatcher::strict().matches(&left, outer, &right, r));
    }

    #[test]
    fn test_different_names_do_not_match() {
        let mut left = Ast::new();
        let l = name(&mut left, "a", 0);
        let mut right = Ast::new();
        let r = name(&mut right, "b", 0);
        assert!(!AstMatcher::new().matches(&left, l, &right, r));
    }
}
