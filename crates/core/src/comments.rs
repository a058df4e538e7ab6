//! Doc comment attachment.

use crate::scanner::Scanner;
use jdt_bridge_api::{Ast, Comment, NodeId, NodeKind, Prop, SourceRange};

fn is_documentable(kind: &NodeKind) -> bool {
    kind.is_body_declaration() || matches!(kind, NodeKind::PackageDeclaration)
}

/// Attaches every doc comment to the nearest following declaration that
/// starts after it with only whitespace or comments in between. The
/// declaration gains a `Javadoc` child and its range grows back to the
/// comment start. Returns the number of comments attached.
pub fn attach_doc_comments(ast: &mut Ast, root: NodeId, source: &str, comments: &[Comment]) -> usize {
    let candidates: Vec<NodeId> = ast
        .preorder(root)
        .into_iter()
        .filter(|&id| is_documentable(ast.kind(id)) && ast.range(id).is_set())
        .collect();

    let mut attached = 0;
    for comment in comments.iter().filter(|c| c.is_doc()) {
        let comment_end = comment.range.end();
        // First code token after the comment; a declaration starting there
        // (or with an annotation or modifier there) owns the comment.
        let Some(next_code) = Scanner::new(source).starting_at(comment_end).next() else {
            continue;
        };
        let Some(&target) = candidates
            .iter()
            .find(|&&id| ast.range(id).start == next_code.start)
        else {
            continue;
        };
        if ast.child(target, Prop::Javadoc).is_some() || overlaps_earlier_sibling(ast, target, comment) {
            continue;
        }

        let javadoc = ast.alloc(NodeKind::Javadoc, comment.range);
        ast.add_child_first(target, Prop::Javadoc, javadoc);
        let extended = comment.range.cover(&ast.range(target));
        ast.set_range(target, extended);
        widen_wrappers(ast, target, extended);
        attached += 1;
    }
    tracing::debug!("Attached {} doc comments", attached);
    attached
}

fn overlaps_earlier_sibling(ast: &Ast, target: NodeId, comment: &Comment) -> bool {
    let Some(parent) = ast.parent(target) else {
        return false;
    };
    ast.children(parent)
        .take_while(|&c| c != target)
        .any(|c| ast.range(c).overlaps(&comment.range) || ast.range(c).end() > comment.range.start)
}

/// A local type's statement wrapper shares the declaration's range.
fn widen_wrappers(ast: &mut Ast, target: NodeId, range: SourceRange) {
    if let Some(parent) = ast.parent(target) {
        if matches!(ast.kind(parent), NodeKind::TypeDeclarationStatement) {
            let widened = ast.range(parent).cover(&range);
            ast.set_range(parent, widened);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_api::CommentKind;

    #[test]
    fn test_doc_comment_extends_following_declaration() {
        let source = "/** doc */\nclass A {}";
        let mut ast = Ast::new();
        let unit = ast.alloc(NodeKind::CompilationUnit, SourceRange::new(0, source.len() as i32));
        let decl = ast.alloc(
            NodeKind::TypeDeclaration {
                is_interface: false,
            },
            SourceRange::new(11, 10),
        );
        ast.add_child(unit, Prop::Types, decl);
        let comments = vec![Comment::new(CommentKind::Doc, 0, 10)];

        assert_eq!(attach_doc_comments(&mut ast, unit, source, &comments), 1);
        assert_eq!(ast.range(decl), SourceRange::new(0, 21));
        let javadoc = ast.child(decl, Prop::Javadoc).unwrap();
        assert_eq!(ast.range(javadoc), SourceRange::new(0, 10));
    }

    #[test]
    fn test_block_comment_is_not_attached() {
        let source = "/* plain */ class A {}";
        let mut ast = Ast::new();
        let unit = ast.alloc(NodeKind::CompilationUnit, SourceRange::new(0, source.len() as i32));
        let decl = ast.alloc(
            NodeKind::TypeDeclaration {
                is_interface: false,
            },
            SourceRange::new(12, 10),
        );
        ast.add_child(unit, Prop::Types, decl);
        let comments = vec![Comment::new(CommentKind::Block, 0, 11)];
        assert_eq!(attach_doc_comments(&mut ast, unit, source, &comments), 0);
        assert_eq!(ast.range(decl), SourceRange::new(12, 10));
    }
}
