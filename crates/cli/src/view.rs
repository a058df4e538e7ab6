use jdt_bridge_api::{Ast, CompilationUnit, NodeId, NodeKind, Problem};
use jdt_bridge_core::RangeViolation;
use tabled::Tabled;

#[derive(Tabled)]
pub struct ProblemView {
    pub severity: String,
    pub id: String,
    pub line: i32,
    pub range: String,
    pub message: String,
}

impl ProblemView {
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            severity: problem.severity.as_str().to_string(),
            id: problem.id.to_string(),
            line: problem.line,
            range: format!("{}..={}", problem.source_start, problem.source_end),
            message: problem.message.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct CheckView {
    pub file: String,
    pub nodes: usize,
    pub problems: usize,
    pub violations: String,
}

impl CheckView {
    pub fn new(unit: &CompilationUnit, violations: &[RangeViolation]) -> Self {
        Self {
            file: unit.file.clone(),
            nodes: unit.ast.len(),
            problems: unit.problems().len(),
            violations: if violations.is_empty() {
                "-".to_string()
            } else {
                violations.len().to_string()
            },
        }
    }

    pub fn failed(file: &str, error: &str) -> Self {
        Self {
            file: file.to_string(),
            nodes: 0,
            problems: 0,
            violations: format!("failed: {error}"),
        }
    }
}

/// One line per node: kind, range and the node's own text attribute.
pub fn outline(ast: &Ast, root: NodeId) -> String {
    let mut out = String::new();
    for id in ast.preorder(root) {
        let depth = ast.ancestors(id).count();
        let range = ast.range(id);
        let span = if range.is_set() {
            format!("[{}, {})", range.start, range.end())
        } else {
            "[unset]".to_string()
        };
        let label = match ast.location_in_parent(id) {
            Some(prop) => format!("{prop:?}: "),
            None => String::new(),
        };
        out.push_str(&format!(
            "{}{}{} {}{}\n",
            "  ".repeat(depth),
            label,
            ast.kind(id).name(),
            span,
            attribute(ast.kind(id))
        ));
    }
    out
}

fn attribute(kind: &NodeKind) -> String {
    match kind {
        NodeKind::SimpleName { identifier } => format!(" `{identifier}`"),
        NodeKind::NumberLiteral { token } => format!(" {token}"),
        NodeKind::StringLiteral { escaped } | NodeKind::TextBlock { escaped } => {
            format!(" {escaped}")
        }
        NodeKind::CharacterLiteral { escaped } => format!(" {escaped}"),
        NodeKind::Modifier { keyword } => format!(" {}", keyword.as_str()),
        NodeKind::InfixExpression {
            operator: Some(operator),
        } => format!(" {}", operator.as_str()),
        NodeKind::PrefixExpression { operator } => format!(" {}", operator.as_str()),
        NodeKind::PostfixExpression { operator } => format!(" {}", operator.as_str()),
        NodeKind::Assignment { operator } => format!(" {}", operator.as_str()),
        NodeKind::PrimitiveType { code } => format!(" {}", code.as_str()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_api::{Prop, SourceRange};

    #[test]
    fn test_outline_indents_children() {
        let mut ast = Ast::new();
        let root = ast.alloc(NodeKind::QualifiedName, SourceRange::new(0, 3));
        let a = ast.alloc(NodeKind::SimpleName { identifier: "a".into() }, SourceRange::new(0, 1));
        let b = ast.alloc(NodeKind::SimpleName { identifier: "b".into() }, SourceRange::UNSET);
        ast.add_child(root, Prop::Qualifier, a);
        ast.add_child(root, Prop::Name, b);
        assert_eq!(
            outline(&ast, root),
            "QualifiedName [0, 3)\n  Qualifier: SimpleName [0, 1) `a`\n  Name: SimpleName [unset] `b`\n"
        );
    }
}
