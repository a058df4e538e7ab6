//! Source range a problem is reported at.
//!
//! The foreign compiler and the unified tree disagree about what some
//! diagnostics should point at, so a handful of problem ids re-derive the
//! range from the foreign tree or from a token replay.

use super::DiagnosticContext;
use super::heuristics::MessageHeuristics;
use crate::scanner::{Scanner, Token, TokenKind};
use jdt_bridge_api::{ProblemId, SourceRange};
use jdt_bridge_javac::{
    DiagnosticArg, ForeignDiagnostic, JcKind, JcTree, KindName, NOPOS, SymbolKind, TreePath, flags,
};

const MISSING_RETURN: &str = "compiler.err.missing.ret.stmt";

pub fn problem_range(
    diag: &ForeignDiagnostic,
    id: ProblemId,
    ctx: &DiagnosticContext<'_>,
    heuristics: &dyn MessageHeuristics,
) -> SourceRange {
    if diag.code.contains(".dc") || diag.code == "compiler.warn.proc.messager" {
        return javadoc_range(diag, id, ctx, heuristics).unwrap_or_else(|| default_range(diag));
    }

    if id == ProblemId::INCOMPATIBLE_EXCEPTION_IN_THROWS_CLAUSE {
        if let Some(method) = ctx.tree(diag) {
            if let JcKind::MethodDef { thrown, .. } = &method.kind {
                let end = thrown.iter().map(|t| t.end_pos(ctx.ends)).max().unwrap_or(NOPOS);
                if end >= 0 {
                    return SourceRange::new(method.pos, end - method.pos);
                }
            }
        }
    }

    let mut path = ctx.path(diag);
    match id {
        ProblemId::PARAMETER_MISMATCH => {
            // Reported at the argument; highlight the invoked method name.
            path = path.and_then(|p| p.parent_path());
            while let Some(p) = &path {
                if !p.leaf().is_expression() || matches!(p.leaf().kind, JcKind::Apply { .. }) {
                    break;
                }
                path = p.parent_path();
            }
            if let Some(JcKind::Apply { meth, .. }) = path.as_ref().map(|p| &p.leaf().kind) {
                match &meth.kind {
                    JcKind::Ident { .. } => {
                        return SourceRange::from_bounds(meth.start, meth.end_pos(ctx.ends));
                    }
                    JcKind::Select { .. } => {
                        return SourceRange::from_bounds(meth.pos + 1, meth.end_pos(ctx.ends));
                    }
                    _ => {}
                }
            }
        }
        ProblemId::NOT_VISIBLE_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR
        | ProblemId::UNDEFINED_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR => {
            while let Some(p) = &path {
                if matches!(p.leaf().kind, JcKind::ClassDef { .. }) {
                    break;
                }
                path = p.parent_path();
            }
        }
        ProblemId::SEALED_SUPER_CLASS_DOES_NOT_PERMIT => {
            if let Some(JcKind::ClassDef {
                extending: Some(extending),
                ..
            }) = path.as_ref().map(|p| &p.leaf().kind)
            {
                path = ctx.index.path(extending.id);
            }
        }
        ProblemId::SEALED_SUPER_INTERFACE_DOES_NOT_PERMIT => {
            let sealed = diag.args.iter().find_map(|arg| match arg {
                DiagnosticArg::Symbol(symbol) if matches!(symbol.kind, SymbolKind::Class { .. }) => {
                    Some(symbol.name.as_str())
                }
                _ => None,
            });
            if let (Some(JcKind::ClassDef { implementing, .. }), Some(sealed)) =
                (path.as_ref().map(|p| &p.leaf().kind), sealed)
            {
                let simple = sealed.rsplit('.').next().unwrap_or(sealed);
                if let Some(entry) = implementing
                    .iter()
                    .find(|t| t.ident_name() == Some(simple))
                {
                    path = ctx.index.path(entry.id);
                }
            }
        }
        _ => {}
    }

    let element = path.as_ref().map(TreePath::leaf).or_else(|| ctx.tree(diag));
    let Some(element) = element else {
        return default_range(diag);
    };
    match &element.kind {
        JcKind::ClassDef { name, defs, .. } => {
            let real_members = defs.iter().filter(|member| {
                !matches!(&member.kind, JcKind::MethodDef { mods, .. } if mods.has(flags::GENERATED_CONSTR))
            });
            let first_member_start = defs.first().map(|m| m.start);
            if diag.position != NOPOS
                && (real_members.count() == 0 || first_member_start != Some(element.start))
            {
                return name_range(name, diag.position, diag, ctx);
            }
            default_range(diag)
        }
        JcKind::VarDef { name, .. } | JcKind::Ident { name } => {
            name_range(name, diag.position, diag, ctx)
        }
        JcKind::MethodDef { name, .. } => {
            let through_parameters = id == ProblemId::FINAL_METHOD_CANNOT_BE_OVERRIDDEN
                || id == ProblemId::CANNOT_OVERRIDE_A_STATIC_METHOD_WITH_AN_INSTANCE_METHOD;
            if through_parameters && diag.position != NOPOS {
                let close = ctx
                    .source
                    .get(diag.position as usize..)
                    .and_then(|rest| rest.find(')'))
                    .map(|i| diag.position + i as i32);
                if let Some(close) = close {
                    return SourceRange::new(diag.position, close - diag.position + 1);
                }
            }
            name_range(name, diag.position, diag, ctx)
        }
        JcKind::Select { name, .. } if !names_package(diag) => {
            SourceRange::new(element.pos + 1, name.len() as i32)
        }
        _ => {
            if let Some(range) = missing_return_range(diag, ctx) {
                return range;
            }
            if diag.start == diag.end {
                return scanned_range(element.pos, ctx.source);
            }
            default_range(diag)
        }
    }
}

/// `[min(position, start), max(end, start))`.
pub fn default_range(diag: &ForeignDiagnostic) -> SourceRange {
    let start = diag.position.min(diag.start);
    let end = diag.end.max(start);
    SourceRange::new(start, end - start)
}

fn names_package(diag: &ForeignDiagnostic) -> bool {
    diag.kind_name() == Some(KindName::Package)
        || diag.args.iter().any(|arg| {
            matches!(arg, DiagnosticArg::Symbol(symbol) if symbol.kind == SymbolKind::Package)
        })
}

/// First occurrence of `name` at or after `from`.
fn name_range(
    name: &str,
    from: i32,
    diag: &ForeignDiagnostic,
    ctx: &DiagnosticContext<'_>,
) -> SourceRange {
    if name.is_empty() || from < 0 {
        return default_range(diag);
    }
    ctx.source
        .get(from as usize..)
        .and_then(|rest| rest.find(name))
        .map(|i| SourceRange::new(from + i as i32, name.len() as i32))
        .unwrap_or_else(|| default_range(diag))
}

fn javadoc_range(
    diag: &ForeignDiagnostic,
    id: ProblemId,
    ctx: &DiagnosticContext<'_>,
    heuristics: &dyn MessageHeuristics,
) -> Option<SourceRange> {
    let JcKind::MethodDef {
        params,
        restype,
        thrown,
        ..
    } = &ctx.tree(diag)?.kind
    else {
        return None;
    };
    let spanning = |tree: &JcTree| SourceRange::from_bounds(tree.start, tree.end_pos(ctx.ends));
    match id {
        ProblemId::JAVADOC_MISSING_PARAM_TAG => {
            let param = heuristics.missing_param_name(&diag.message)?;
            params.iter().find_map(|p| match &p.kind {
                JcKind::VarDef { name, .. } if name == param => {
                    Some(SourceRange::new(p.pos, name.len() as i32))
                }
                _ => None,
            })
        }
        ProblemId::JAVADOC_MISSING_RETURN_TAG => restype.as_deref().map(spanning),
        ProblemId::JAVADOC_MISSING_THROWS_TAG => thrown.first().map(spanning),
        _ => None,
    }
}

/// A missing return is reported on the method body; highlight the method's
/// `name(...)` instead, found by replaying the tokens before the body.
fn missing_return_range(diag: &ForeignDiagnostic, ctx: &DiagnosticContext<'_>) -> Option<SourceRange> {
    if diag.code != MISSING_RETURN {
        return None;
    }
    let block = ctx.tree(diag).filter(|t| matches!(t.kind, JcKind::Block { .. }));
    let Some(block) = block else {
        return Some(default_range(diag));
    };

    let mut name: Option<Token> = None;
    let mut lparen: Option<Token> = None;
    let mut rparen: Option<Token> = None;
    for token in Scanner::new(ctx.source).take_while(|t| t.start <= block.start) {
        match token.kind {
            TokenKind::Identifier if lparen.is_none() => name = Some(token),
            TokenKind::LParen => lparen = Some(token),
            TokenKind::RParen if name.is_some() => rparen = Some(token),
            TokenKind::RBrace | TokenKind::Semi => {
                name = None;
                lparen = None;
                rparen = None;
            }
            _ => {}
        }
    }
    match (name, lparen, rparen) {
        (Some(name), Some(_), Some(rparen)) => Some(SourceRange::new(
            name.start.min(ctx.source.len() as i32 - 1),
            (rparen.end - name.start - 1).max(0),
        )),
        _ => Some(default_range(diag)),
    }
}

/// Widens an empty diagnostic to the token at `preferred`, or the token
/// before it when that one is a bracket.
fn scanned_range(preferred: i32, source: &str) -> SourceRange {
    let mut previous: Option<Token> = None;
    let mut highlight: Option<Token> = None;
    for token in Scanner::new(source) {
        if token.end > preferred {
            highlight = Some(token);
            break;
        }
        previous = Some(token);
    }
    let chosen = match (highlight, previous) {
        (Some(at), Some(before)) if at.kind.is_bracket() && !before.kind.is_bracket() => before,
        (Some(at), _) => at,
        (None, Some(before)) => before,
        (None, None) => return SourceRange::new(preferred.max(0), 0),
    };
    SourceRange::new(
        chosen.start.min(source.len() as i32 - 1),
        (chosen.end - chosen.start - 1).max(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::heuristics::EnglishHeuristics;
    use jdt_bridge_javac::{ForeignIndex, JavacFrontend, Tag};

    #[test]
    fn test_default_range_takes_earliest_start() {
        let diag = ForeignDiagnostic::error("compiler.err.x", "x").at(5, 3, 9);
        assert_eq!(default_range(&diag), SourceRange::new(3, 6));
    }

    #[test]
    fn test_scanner_prefers_token_before_bracket() {
        let source = "foo(x);";
        // Preferred position on the '(' falls back to the identifier before it.
        assert_eq!(scanned_range(3, source), SourceRange::new(0, 2));
        assert_eq!(scanned_range(4, source), SourceRange::new(4, 0));
    }

    #[test]
    fn test_class_problem_points_at_name() {
        let source = "public class Foo { int x; }";
        let unit = JavacFrontend::new().parse(source).unwrap();
        let index = ForeignIndex::build(&unit.root);
        let class = unit
            .root
            .children()
            .into_iter()
            .find(|t| t.tag() == Tag::ClassDef)
            .unwrap();
        let ctx = DiagnosticContext::new("Foo.java", source, &index, &unit.end_positions);
        let diag = ForeignDiagnostic::error("compiler.err.class.public.should.be.in.file", "public")
            .at(class.start, class.pos, class.end_pos(&unit.end_positions))
            .with_tree(class.id);
        let range = problem_range(
            &diag,
            ProblemId::PUBLIC_CLASS_MUST_MATCH_FILE_NAME,
            &ctx,
            &EnglishHeuristics,
        );
        assert_eq!(range, SourceRange::new(13, 3));
    }

    fn first(tree: &JcTree, tag: Tag) -> Option<&JcTree> {
        if tree.tag() == tag {
            return Some(tree);
        }
        tree.children().into_iter().find_map(|child| first(child, tag))
    }

    #[test]
    fn test_default_constructor_problem_points_at_type_name() {
        let source = "class B extends A { int x; }";
        let unit = JavacFrontend::new().parse(source).unwrap();
        let index = ForeignIndex::build(&unit.root);
        let class = first(&unit.root, Tag::ClassDef).unwrap();
        let field = first(&unit.root, Tag::VarDef).unwrap();
        let ctx = DiagnosticContext::new("B.java", source, &index, &unit.end_positions);
        let diag = ForeignDiagnostic::error("compiler.err.cant.apply.symbol", "constructor A")
            .at(field.start, class.pos, field.end_pos(&unit.end_positions))
            .with_tree(field.id);
        let range = problem_range(
            &diag,
            ProblemId::UNDEFINED_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR,
            &ctx,
            &EnglishHeuristics,
        );
        assert_eq!(range, SourceRange::new(6, 1));
    }

    #[test]
    fn test_missing_return_points_at_method_signature() {
        let source = "class A { int m(int x) { } }";
        let unit = JavacFrontend::new().parse(source).unwrap();
        let index = ForeignIndex::build(&unit.root);
        let method = first(&unit.root, Tag::MethodDef).unwrap();
        let body = first(method, Tag::Block).unwrap();
        let ctx = DiagnosticContext::new("A.java", source, &index, &unit.end_positions);
        let diag = ForeignDiagnostic::error(MISSING_RETURN, "missing return statement")
            .at(body.start, body.end_pos(&unit.end_positions) - 1, body.end_pos(&unit.end_positions))
            .with_tree(body.id);
        let range = problem_range(&diag, ProblemId::SHOULD_RETURN_VALUE, &ctx, &EnglishHeuristics);
        // From `m` up to, but not including, the closing parenthesis.
        assert_eq!(range, SourceRange::new(14, 7));
        assert_eq!(&source[14..21], "m(int x");
    }

    #[test]
    fn test_missing_return_without_body_tree_keeps_reported_range() {
        let source = "class A { int m() { } }";
        let unit = JavacFrontend::new().parse(source).unwrap();
        let index = ForeignIndex::build(&unit.root);
        let ctx = DiagnosticContext::new("A.java", source, &index, &unit.end_positions);
        let diag = ForeignDiagnostic::error(MISSING_RETURN, "missing return statement").at(18, 20, 21);
        assert_eq!(missing_return_range(&diag, &ctx), Some(SourceRange::new(18, 3)));
    }
}
