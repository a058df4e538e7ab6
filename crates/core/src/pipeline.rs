//! Compilation unit resolution: source text in, unified unit out.
//!
//! Each unit goes through parse, structural conversion, comment harvesting,
//! position reconciliation, doc comment attachment and diagnostic conversion,
//! in that order and on one thread. Independent units run in parallel.

use crate::bindings::DeclarationBindings;
use crate::comments::attach_doc_comments;
use crate::convert::{ConvertedUnit, convert_compilation_unit};
use crate::diagnostics::{DiagnosticContext, DiagnosticConverter};
use crate::error::{ConversionError, Result};
use crate::options::CompilerOptions;
use crate::reconcile::reconcile;
use crate::scanner::CommentScanner;
use jdt_bridge_api::{ApiLevel, CompilationUnit};
use jdt_bridge_javac::{ForeignIndex, JavacFrontend, ParsedForeignUnit};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One unit of input: a file identity and its source text.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub file: String,
    pub source: Arc<str>,
}

impl SourceUnit {
    pub fn new(file: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), text))
    }
}

/// Shared cancellation flag, checked between units.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct CompilationUnitResolver {
    frontend: JavacFrontend,
    api_level: ApiLevel,
    diagnostics: DiagnosticConverter,
    resolve_bindings: bool,
}

impl CompilationUnitResolver {
    pub fn new(api_level: ApiLevel, options: CompilerOptions) -> Self {
        Self {
            frontend: JavacFrontend::new(),
            api_level,
            diagnostics: DiagnosticConverter::new(options),
            resolve_bindings: true,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConverter) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Whether units get a [`DeclarationBindings`] resolver. Off means every
    /// binding request answers `None`.
    pub fn with_bindings(mut self, enabled: bool) -> Self {
        self.resolve_bindings = enabled;
        self
    }

    pub fn api_level(&self) -> ApiLevel {
        self.api_level
    }

    pub fn options(&self) -> &CompilerOptions {
        self.diagnostics.options()
    }

    pub fn resolve(&self, unit: &SourceUnit) -> Result<CompilationUnit> {
        let parsed = self.frontend.parse(&unit.source)?;
        self.resolve_parsed(unit, &parsed)
    }

    /// Converts an already parsed unit. The foreign tree is only read.
    pub fn resolve_parsed(&self, unit: &SourceUnit, parsed: &ParsedForeignUnit) -> Result<CompilationUnit> {
        let source: &str = &unit.source;
        let ConvertedUnit {
            mut ast,
            root,
            foreign_ids,
        } = convert_compilation_unit(&parsed.root, &parsed.end_positions, source, self.api_level)?;

        let comments = CommentScanner::new(source).harvest();
        let stats = reconcile(&mut ast, root, source, &comments);
        if stats.missed > 0 {
            tracing::warn!("{}: {} nodes left without a position", unit.file, stats.missed);
        }
        attach_doc_comments(&mut ast, root, source, &comments);

        let index = ForeignIndex::build(&parsed.root);
        let ctx = DiagnosticContext::new(&unit.file, source, &index, &parsed.end_positions);
        let problems = self.diagnostics.convert_all(&parsed.diagnostics, &ctx);

        let bindings = self
            .resolve_bindings
            .then(|| DeclarationBindings::build(&ast, root));

        let mut converted = CompilationUnit::new(
            unit.file.clone(),
            unit.source.clone(),
            ast,
            root,
            self.api_level,
        );
        converted.comments = comments;
        converted.problems = problems;
        converted.foreign_ids = foreign_ids;
        if let Some(bindings) = bindings {
            converted.set_binding_resolver(Arc::new(bindings));
        }

        tracing::debug!(
            "Resolved {}: {} nodes, {} comments, {} problems",
            unit.file,
            converted.ast.len(),
            converted.comments.len(),
            converted.problems.len()
        );
        Ok(converted)
    }

    /// Resolves independent units in parallel, one result per input in input
    /// order. Units not started before cancellation fail with
    /// [`ConversionError::Cancelled`].
    pub fn resolve_all(
        &self,
        units: &[SourceUnit],
        cancellation: &Cancellation,
    ) -> Vec<Result<CompilationUnit>> {
        units
            .par_iter()
            .map(|unit| {
                if cancellation.is_cancelled() {
                    return Err(ConversionError::Cancelled);
                }
                self.resolve(unit).inspect_err(|e| {
                    tracing::warn!("Failed to resolve {}: {}", unit.file, e);
                })
            })
            .collect()
    }
}

impl Default for CompilationUnitResolver {
    fn default() -> Self {
        Self::new(ApiLevel::latest(), CompilerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_units_are_not_converted() {
        let resolver = CompilationUnitResolver::default();
        let cancellation = Cancellation::new();
        cancellation.cancel();
        let units = vec![SourceUnit::new("A.java", "class A {}")];
        let results = resolver.resolve_all(&units, &cancellation);
        assert!(matches!(results[0], Err(ConversionError::Cancelled)));
    }

    #[test]
    fn test_unit_keeps_comments_and_bindings() {
        let resolver = CompilationUnitResolver::default();
        let unit = resolver
            .resolve(&SourceUnit::new("A.java", "// lead\nclass A { int f; }"))
            .unwrap();
        assert_eq!(unit.comments().len(), 1);
        assert!(unit.problems().is_empty());
        let binding = unit.resolve_binding(unit.root);
        assert!(binding.is_none());
        let class = unit.ast.list(unit.root, jdt_bridge_api::Prop::Types).next().unwrap();
        assert_eq!(unit.binding_key(class).unwrap().0, "LA;");
    }
}
