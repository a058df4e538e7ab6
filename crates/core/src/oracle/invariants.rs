//! Range containment and sibling non-overlap.

use jdt_bridge_api::{Ast, CompilationUnit, NodeId, NodeKind, Prop, SourceRange};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Child range reaches outside its parent.
    NotContained,
    /// Two siblings share source.
    Overlap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeViolation {
    pub kind: ViolationKind,
    pub parent: NodeId,
    pub child: NodeId,
    pub other: Option<NodeId>,
    pub child_range: SourceRange,
    pub other_range: SourceRange,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.child_range;
        match (self.kind, self.other) {
            (ViolationKind::Overlap, Some(other)) => write!(
                f,
                "{} [{}, {}) overlaps sibling {} [{}, {}) under {}",
                self.child,
                r.start,
                r.end(),
                other,
                self.other_range.start,
                self.other_range.end(),
                self.parent
            ),
            _ => write!(
                f,
                "{} [{}, {}) is not contained in parent {} [{}, {})",
                self.child,
                r.start,
                r.end(),
                self.parent,
                self.other_range.start,
                self.other_range.end()
            ),
        }
    }
}

pub fn check_range_invariants(unit: &CompilationUnit) -> Vec<RangeViolation> {
    check_tree(&unit.ast, unit.root)
}

/// Every positioned child lies inside its positioned parent and no two
/// positioned siblings overlap. Nodes without a position are skipped.
pub fn check_tree(ast: &Ast, root: NodeId) -> Vec<RangeViolation> {
    let mut violations = Vec::new();
    for parent in ast.preorder(root) {
        let parent_range = ast.range(parent);
        let mut children: Vec<(NodeId, SourceRange)> = ast
            .children(parent)
            .map(|c| (c, ast.range(c)))
            .filter(|(_, range)| range.is_set())
            .collect();

        if parent_range.is_set() {
            for &(child, range) in &children {
                if !parent_range.contains(&range) {
                    violations.push(RangeViolation {
                        kind: ViolationKind::NotContained,
                        parent,
                        child,
                        other: None,
                        child_range: range,
                        other_range: parent_range,
                    });
                }
            }
        }

        // `new int[3][]` types its creation as `int[3][]`, so the array type
        // only has to stay clear of the initializer.
        let spanning_type = match ast.kind(parent) {
            NodeKind::ArrayCreation => ast.child(parent, Prop::Type),
            _ => None,
        };
        if let Some(ty) = spanning_type {
            let ty_range = ast.range(ty);
            children.retain(|&(child, _)| child != ty);
            for &(child, range) in &children {
                let beside = ast.location_in_parent(child) == Some(Prop::Dimensions);
                if ty_range.is_set() && !beside && ty_range.overlaps(&range) {
                    violations.push(overlap(parent, child, range, ty, ty_range));
                }
            }
        }

        children.sort_by_key(|(_, range)| (range.start, range.length));
        let mut furthest: Option<(NodeId, SourceRange)> = None;
        for (child, range) in children {
            if let Some((previous, previous_range)) = furthest {
                if previous_range.overlaps(&range) {
                    violations.push(overlap(parent, child, range, previous, previous_range));
                }
                if range.end() <= previous_range.end() {
                    continue;
                }
            }
            furthest = Some((child, range));
        }
    }
    violations
}

fn overlap(
    parent: NodeId,
    child: NodeId,
    child_range: SourceRange,
    other: NodeId,
    other_range: SourceRange,
) -> RangeViolation {
    RangeViolation {
        kind: ViolationKind::Overlap,
        parent,
        child,
        other: Some(other),
        child_range,
        other_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(ast: &mut Ast, range: SourceRange) -> NodeId {
        ast.alloc(NodeKind::Block, range)
    }

    #[test]
    fn test_escaping_child_is_reported() {
        let mut ast = Ast::new();
        let root = block(&mut ast, SourceRange::new(0, 10));
        let child = block(&mut ast, SourceRange::new(5, 10));
        ast.add_child(root, Prop::Statements, child);
        let violations = check_tree(&ast, root);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NotContained);
        assert_eq!(violations[0].child, child);
    }

    #[test]
    fn test_overlapping_siblings_are_reported() {
        let mut ast = Ast::new();
        let root = block(&mut ast, SourceRange::new(0, 20));
        let first = block(&mut ast, SourceRange::new(1, 8));
        let second = block(&mut ast, SourceRange::new(5, 8));
        let third = block(&mut ast, SourceRange::new(14, 2));
        ast.add_all(root, Prop::Statements, [first, second, third]);
        let violations = check_tree(&ast, root);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Overlap);
        assert_eq!(violations[0].other, Some(first));
    }

    #[test]
    fn test_unset_ranges_are_skipped() {
        let mut ast = Ast::new();
        let root = block(&mut ast, SourceRange::new(0, 4));
        let synthetic = block(&mut ast, SourceRange::UNSET);
        let inner = block(&mut ast, SourceRange::new(30, 2));
        ast.add_child(root, Prop::Statements, synthetic);
        ast.add_child(synthetic, Prop::Statements, inner);
        assert!(check_tree(&ast, root).is_empty());
    }

    #[test]
    fn test_array_type_may_span_dimension_expressions() {
        // new int[3][4]
        let mut ast = Ast::new();
        let creation = ast.alloc(NodeKind::ArrayCreation, SourceRange::new(0, 13));
        let ty = ast.alloc(NodeKind::ArrayType, SourceRange::new(4, 9));
        let three = block(&mut ast, SourceRange::new(8, 1));
        let four = block(&mut ast, SourceRange::new(11, 1));
        ast.add_child(creation, Prop::Type, ty);
        ast.add_all(creation, Prop::Dimensions, [three, four]);
        assert!(check_tree(&ast, creation).is_empty());

        let clash = block(&mut ast, SourceRange::new(11, 2));
        ast.add_child(creation, Prop::Dimensions, clash);
        let violations = check_tree(&ast, creation);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].child, clash);
    }
}
