//! Position reconciliation.
//!
//! After structural conversion some nodes have no range: declaration names,
//! labels and modifier keywords. Each is searched for as a whole word inside
//! its parent's window, skipping positioned siblings, comments and text
//! already claimed by this pass. Composite nodes left without a range are then
//! derived bottom-up from their children.

use crate::scanner::find_word;
use jdt_bridge_api::{Ast, Comment, NodeId, NodeKind, Prop, SourceRange};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub positioned: usize,
    pub derived: usize,
    pub missed: usize,
}

/// Text to search for when `id` has no range, or `None` for nodes whose
/// range is derived from their children instead.
fn search_text(ast: &Ast, id: NodeId) -> Option<(&str, bool)> {
    match ast.kind(id) {
        NodeKind::SimpleName { identifier } => Some((identifier.as_str(), false)),
        NodeKind::Modifier { keyword } => Some((keyword.as_str(), true)),
        _ => None,
    }
}

pub fn reconcile(ast: &mut Ast, root: NodeId, source: &str, comments: &[Comment]) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    let order = ast.preorder(root);
    let comment_ranges: Vec<(i32, i32)> = comments
        .iter()
        .map(|c| (c.range.start, c.range.end()))
        .collect();
    let mut claimed: Vec<(i32, i32)> = Vec::new();

    for &parent in &order {
        let window = ast.range(parent);
        if !window.is_set() {
            continue;
        }
        let children: Vec<NodeId> = ast.children(parent).collect();
        if children.iter().all(|&c| ast.range(c).is_set()) {
            continue;
        }

        let mut excluded: Vec<(i32, i32)> = children
            .iter()
            .map(|&c| ast.range(c))
            .filter(|r| r.is_set())
            .map(|r| (r.start, r.end()))
            .collect();
        excluded.extend_from_slice(&comment_ranges);

        // Names follow the last positioned sibling before them; modifiers may
        // sit anywhere ahead of the declaration's other parts.
        let mut cursor = window.start;
        for child in children {
            let range = ast.range(child);
            if range.is_set() {
                cursor = cursor.max(range.end());
                continue;
            }
            let Some((text, anywhere)) = search_text(ast, child).map(|(t, a)| (t.to_owned(), a))
            else {
                continue;
            };
            let from = if anywhere { window.start } else { cursor };
            let mut blocked = excluded.clone();
            blocked.extend_from_slice(&claimed);
            match find_word(source, &text, from, window.end(), &blocked) {
                Some(at) => {
                    let found = SourceRange::new(at, text.len() as i32);
                    ast.set_range(child, found);
                    claimed.push((found.start, found.end()));
                    excluded.push((found.start, found.end()));
                    if !anywhere {
                        cursor = cursor.max(found.end());
                    }
                    stats.positioned += 1;
                }
                None => {
                    tracing::warn!(
                        "Could not locate `{}` ({}) inside {} at {}..{}",
                        text,
                        ast.kind(child).name(),
                        ast.kind(parent).name(),
                        window.start,
                        window.end()
                    );
                    stats.missed += 1;
                }
            }
        }
    }

    for &id in order.iter().rev() {
        if ast.range(id).is_set() {
            continue;
        }
        let derived = derive_range(ast, id);
        if derived.is_set() {
            ast.set_range(id, derived);
            stats.derived += 1;
        }
    }

    for &id in &order {
        if ast.child(id, Prop::Modifiers).is_some() {
            ast.sort_list_by_start(id, Prop::Modifiers);
        }
    }

    tracing::debug!(
        "Reconciled positions: {} found, {} derived, {} missed",
        stats.positioned,
        stats.derived,
        stats.missed
    );
    stats
}

/// A qualified name spans its qualifier start to its last segment end; any
/// other node covers its positioned children.
fn derive_range(ast: &Ast, id: NodeId) -> SourceRange {
    if matches!(ast.kind(id), NodeKind::QualifiedName) {
        let qualifier = ast.child(id, Prop::Qualifier).map(|q| ast.range(q));
        let name = ast.child(id, Prop::Name).map(|n| ast.range(n));
        if let (Some(qualifier), Some(name)) = (qualifier, name) {
            return SourceRange::from_bounds(qualifier.start, name.end());
        }
    }
    ast.children(id)
        .map(|c| ast.range(c))
        .fold(SourceRange::UNSET, |acc, r| acc.cover(&r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_api::ModifierKeyword;

    #[test]
    fn test_name_search_skips_positioned_siblings() {
        // class A extends A {}
        let source = "class A extends A {}";
        let mut ast = Ast::new();
        let decl = ast.alloc(
            NodeKind::TypeDeclaration {
                is_interface: false,
            },
            SourceRange::new(0, source.len() as i32),
        );
        let name = ast.alloc(
            NodeKind::SimpleName {
                identifier: "A".into(),
            },
            SourceRange::UNSET,
        );
        let superclass = ast.alloc(NodeKind::SimpleType, SourceRange::new(16, 1));
        ast.add_child(decl, Prop::Name, name);
        ast.add_child(decl, Prop::SuperclassType, superclass);

        let stats = reconcile(&mut ast, decl, source, &[]);
        assert_eq!(ast.range(name), SourceRange::new(6, 1));
        assert_eq!(stats.positioned, 1);
    }

    #[test]
    fn test_modifiers_are_found_and_sorted() {
        let source = "public static final int x;";
        let mut ast = Ast::new();
        let decl = ast.alloc(
            NodeKind::FieldDeclaration,
            SourceRange::new(0, source.len() as i32),
        );
        for keyword in [
            ModifierKeyword::Final,
            ModifierKeyword::Public,
            ModifierKeyword::Static,
        ] {
            let modifier = ast.alloc(NodeKind::Modifier { keyword }, SourceRange::UNSET);
            ast.add_child(decl, Prop::Modifiers, modifier);
        }
        reconcile(&mut ast, decl, source, &[]);
        let order: Vec<ModifierKeyword> = ast
            .list(decl, Prop::Modifiers)
            .map(|m| match ast.kind(m) {
                NodeKind::Modifier { keyword } => *keyword,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ModifierKeyword::Public,
                ModifierKeyword::Static,
                ModifierKeyword::Final
            ]
        );
    }

    #[test]
    fn test_miss_leaves_range_unset() {
        let source = "enum E { X }";
        let mut ast = Ast::new();
        let decl = ast.alloc(NodeKind::SimpleType, SourceRange::new(0, source.len() as i32));
        let name = ast.alloc(
            NodeKind::SimpleName {
                identifier: "Missing".into(),
            },
            SourceRange::UNSET,
        );
        ast.add_child(decl, Prop::Name, name);
        let stats = reconcile(&mut ast, decl, source, &[]);
        assert!(!ast.range(name).is_set());
        assert_eq!(stats.missed, 1);
    }

    #[test]
    fn test_qualified_name_derived_from_parts() {
        let mut ast = Ast::new();
        let qualified = ast.alloc(NodeKind::QualifiedName, SourceRange::UNSET);
        let a = ast.alloc(
            NodeKind::SimpleName {
                identifier: "a".into(),
            },
            SourceRange::new(4, 1),
        );
        let b = ast.alloc(
            NodeKind::SimpleName {
                identifier: "b".into(),
            },
            SourceRange::new(6, 1),
        );
        ast.add_child(qualified, Prop::Qualifier, a);
        ast.add_child(qualified, Prop::Name, b);
        reconcile(&mut ast, qualified, "    a.b", &[]);
        assert_eq!(ast.range(qualified), SourceRange::new(4, 3));
    }
}
