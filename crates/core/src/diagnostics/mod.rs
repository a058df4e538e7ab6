//! Foreign diagnostics to problems.

pub mod classify;
pub mod heuristics;
pub mod position;

use crate::options::CompilerOptions;
use heuristics::{EnglishHeuristics, MessageHeuristics};
use jdt_bridge_api::{Problem, ProblemId, Severity};
use jdt_bridge_javac::{
    DiagnosticKind, EndPosTable, ForeignDiagnostic, ForeignIndex, JcTree, TreePath,
};

pub use classify::classify;
pub use position::problem_range;

/// What a diagnostic can be resolved against: the unit's source and its
/// foreign tree.
pub struct DiagnosticContext<'a> {
    pub file: &'a str,
    pub source: &'a str,
    pub index: &'a ForeignIndex<'a>,
    pub ends: &'a EndPosTable,
}

impl<'a> DiagnosticContext<'a> {
    pub fn new(
        file: &'a str,
        source: &'a str,
        index: &'a ForeignIndex<'a>,
        ends: &'a EndPosTable,
    ) -> Self {
        Self {
            file,
            source,
            index,
            ends,
        }
    }

    /// Tree the diagnostic is positioned on.
    pub fn tree(&self, diag: &ForeignDiagnostic) -> Option<&'a JcTree> {
        diag.tree.and_then(|id| self.index.get(id))
    }

    pub fn path(&self, diag: &ForeignDiagnostic) -> Option<TreePath<'a>> {
        diag.tree.and_then(|id| self.index.path(id))
    }
}

pub struct DiagnosticConverter {
    options: CompilerOptions,
    heuristics: Box<dyn MessageHeuristics>,
}

impl DiagnosticConverter {
    pub fn new(options: CompilerOptions) -> Self {
        Self::with_heuristics(options, Box::new(EnglishHeuristics))
    }

    pub fn with_heuristics(options: CompilerOptions, heuristics: Box<dyn MessageHeuristics>) -> Self {
        Self {
            options,
            heuristics,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Converts one diagnostic, or `None` when it maps to an ignored problem
    /// or an ignored severity.
    pub fn convert(&self, diag: &ForeignDiagnostic, ctx: &DiagnosticContext<'_>) -> Option<Problem> {
        let id = classify(diag, ctx, self.heuristics.as_ref());
        if id.is_ignored() {
            return None;
        }
        let severity = self.severity(id, diag.kind);
        if severity == Severity::Ignore {
            tracing::debug!("Dropping {} at {} (ignored severity)", id, diag.position);
            return None;
        }
        let range = problem_range(diag, id, ctx, self.heuristics.as_ref());
        Some(Problem {
            original_file: ctx.file.to_string(),
            message: diag.message.clone(),
            foreign_code: diag.code.clone(),
            id,
            arguments: string_arguments(diag),
            severity,
            source_start: range.start,
            source_end: range.start + range.length - 1,
            line: diag.line,
            column: diag.column,
        })
    }

    /// Converts every diagnostic in arrival order.
    pub fn convert_all(
        &self,
        diagnostics: &[ForeignDiagnostic],
        ctx: &DiagnosticContext<'_>,
    ) -> Vec<Problem> {
        diagnostics
            .iter()
            .filter_map(|diag| self.convert(diag, ctx))
            .collect()
    }

    fn severity(&self, id: ProblemId, kind: DiagnosticKind) -> Severity {
        if let Some(severity) = self.options.irritant_severity(id) {
            return severity;
        }
        match kind {
            DiagnosticKind::Error => Severity::Error,
            DiagnosticKind::Warning | DiagnosticKind::MandatoryWarning => Severity::Warning,
            DiagnosticKind::Note => Severity::Info,
            DiagnosticKind::Other => Severity::Ignore,
        }
    }
}

impl Default for DiagnosticConverter {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

/// Arguments of the first subdiagnostic when there is one; a leading nested
/// diagnostic contributes its own arguments instead.
fn string_arguments(diag: &ForeignDiagnostic) -> Vec<String> {
    let source = diag.subdiagnostics.first().unwrap_or(diag);
    let args = match source.args.first() {
        Some(jdt_bridge_javac::DiagnosticArg::Diagnostic(nested)) => &nested.args,
        _ => &source.args,
    };
    args.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_javac::{DiagnosticArg, JcKind, TreeFactory};

    fn with_empty_context<T>(f: impl FnOnce(&DiagnosticContext<'_>) -> T) -> T {
        let mut factory = TreeFactory::new();
        let unit = factory.at(
            0,
            20,
            JcKind::CompilationUnit {
                package: None,
                imports: Vec::new(),
                defs: Vec::new(),
            },
        );
        let ends = factory.finish();
        let index = ForeignIndex::build(&unit);
        let ctx = DiagnosticContext::new("A.java", "class A { int x = }", &index, &ends);
        f(&ctx)
    }

    #[test]
    fn test_end_offset_is_inclusive() {
        let problem = with_empty_context(|ctx| {
            let diag = ForeignDiagnostic::error("compiler.err.illegal.start.of.expr", "illegal start")
                .at(18, 18, 19)
                .on_line(1, 19);
            DiagnosticConverter::default().convert(&diag, ctx)
        })
        .unwrap();
        assert_eq!(problem.id, ProblemId::SYNTAX);
        assert_eq!(problem.source_start, 18);
        assert_eq!(problem.source_end, 18);
        assert_eq!(problem.severity, Severity::Error);
        assert_eq!(problem.original_file, "A.java");
    }

    #[test]
    fn test_irritant_severity_overrides_kind() {
        let options = CompilerOptions::new().with(
            "org.eclipse.jdt.core.compiler.problem.rawTypeReference",
            "ignore",
        );
        let dropped = with_empty_context(|ctx| {
            let diag = ForeignDiagnostic::warning("compiler.warn.raw.class.use", "raw type")
                .at(10, 10, 13);
            DiagnosticConverter::new(options).convert(&diag, ctx)
        });
        assert!(dropped.is_none());

        let kept = with_empty_context(|ctx| {
            let diag = ForeignDiagnostic::warning("compiler.warn.raw.class.use", "raw type")
                .at(10, 10, 13);
            DiagnosticConverter::default().convert(&diag, ctx)
        })
        .unwrap();
        assert_eq!(kept.severity, Severity::Warning);
    }

    #[test]
    fn test_arguments_come_from_nested_diagnostic() {
        let nested = ForeignDiagnostic::error("compiler.misc.x", "x")
            .with_arg(DiagnosticArg::Text("a".to_string()))
            .with_arg(DiagnosticArg::Text("b".to_string()));
        let diag = ForeignDiagnostic::error("compiler.err.prob.found.req", "incompatible")
            .with_arg(DiagnosticArg::Diagnostic(Box::new(nested)));
        assert_eq!(string_arguments(&diag), vec!["a", "b"]);
    }

    #[test]
    fn test_ignored_codes_produce_nothing() {
        let problem = with_empty_context(|ctx| {
            let diag = ForeignDiagnostic::warning("compiler.warn.dangling.doc.comment", "dangling");
            DiagnosticConverter::default().convert(&diag, ctx)
        });
        assert!(problem.is_none());
    }
}
