use super::nodes::{end, start};
use crate::diag::{DiagnosticArg, ForeignDiagnostic};
use tree_sitter::Node;

/// Reports the parser's error and missing nodes the way javac words them.
pub(crate) fn syntax_diagnostics(root: Node<'_>, source: &str) -> Vec<ForeignDiagnostic> {
    let content_end = source.trim_end().len() as i32;
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            let token = node.kind();
            let at = start(node);
            out.push(
                ForeignDiagnostic::error("compiler.err.expected", format!("'{token}' expected"))
                    .at(at, at, at)
                    .with_arg(DiagnosticArg::Text(token.to_string())),
            );
            continue;
        }
        if node.is_error() {
            let diagnostic = if end(node) >= content_end {
                ForeignDiagnostic::error(
                    "compiler.err.premature.eof",
                    "reached end of file while parsing",
                )
            } else {
                ForeignDiagnostic::error(
                    "compiler.err.illegal.start.of.expr",
                    "illegal start of expression",
                )
            };
            out.push(diagnostic.at(start(node), start(node), end(node)));
            continue;
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    out
}
