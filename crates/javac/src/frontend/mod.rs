//! Java front end producing javac-shaped trees from tree-sitter-java.

mod lower;
mod nodes;
mod syntax;

use crate::diag::ForeignDiagnostic;
use crate::error::{FrontendError, Result};
use crate::tree::{EndPosTable, JcTree};
use lower::Lowering;
use tree_sitter::Parser;

/// Output of one front-end run.
#[derive(Debug)]
pub struct ParsedForeignUnit {
    pub root: JcTree,
    pub end_positions: EndPosTable,
    pub diagnostics: Vec<ForeignDiagnostic>,
}

#[derive(Clone)]
pub struct JavacFrontend {
    language: tree_sitter::Language,
}

impl Default for JavacFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl JavacFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    pub fn parse(&self, source: &str) -> Result<ParsedForeignUnit> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| FrontendError::Language(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| FrontendError::Parse("parser produced no tree".to_string()))?;

        let root_node = tree.root_node();
        let mut lowering = Lowering::new(source);
        let root = lowering.compilation_unit(root_node);

        let mut diagnostics = syntax::syntax_diagnostics(root_node, source);
        diagnostics.append(&mut lowering.diagnostics);
        let line_starts = line_starts(source);
        for diagnostic in &mut diagnostics {
            let (line, column) = line_and_column(&line_starts, diagnostic.position.max(0));
            diagnostic.line = line;
            diagnostic.column = column;
        }
        diagnostics.sort_by_key(|d| (d.start, d.end));

        tracing::debug!(
            "Lowered {} bytes, {} diagnostics",
            source.len(),
            diagnostics.len()
        );
        Ok(ParsedForeignUnit {
            root,
            end_positions: lowering.factory.finish(),
            diagnostics,
        })
    }
}

fn line_starts(source: &str) -> Vec<i32> {
    std::iter::once(0)
        .chain(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as i32 + 1),
        )
        .collect()
}

/// 1-based line and column of a byte offset.
fn line_and_column(line_starts: &[i32], offset: i32) -> (i32, i32) {
    let line = match line_starts.binary_search(&offset) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };
    let column = offset - line_starts.get(line).copied().unwrap_or(0);
    (line as i32 + 1, column + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column_are_one_based() {
        let starts = line_starts("ab\ncd\n");
        assert_eq!(line_and_column(&starts, 0), (1, 1));
        assert_eq!(line_and_column(&starts, 2), (1, 3));
        assert_eq!(line_and_column(&starts, 3), (2, 1));
        assert_eq!(line_and_column(&starts, 4), (2, 2));
    }
}
