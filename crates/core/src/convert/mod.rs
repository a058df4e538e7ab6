//! Foreign tree to unified tree conversion.
//!
//! One [`Converter`] walks one foreign compilation unit depth first and
//! allocates the unified nodes in a fresh arena. Positions that the foreign
//! tree does not carry (declaration names, modifier keywords) are left unset
//! here and filled in by [`crate::reconcile`].

mod declarations;
mod expressions;
mod fragments;
mod names;
mod statements;

use crate::error::Result;
use crate::scanner::{Scanner, Token};
use jdt_bridge_api::{ApiLevel, Ast, NodeId, NodeKind, SourceRange, flags};
use jdt_bridge_javac::{EndPosTable, JcTree};
use std::collections::HashMap;

/// Output of a successful conversion.
#[derive(Debug)]
pub struct ConvertedUnit {
    pub ast: Ast,
    pub root: NodeId,
    pub foreign_ids: HashMap<NodeId, u32>,
}

/// Per-unit conversion state. Owned by a single conversion and dropped with it.
pub struct Converter<'a> {
    source: &'a str,
    ends: &'a EndPosTable,
    api_level: ApiLevel,
    ast: Ast,
    foreign_ids: HashMap<NodeId, u32>,
    /// Simple names of the enclosing type declarations, innermost last.
    type_names: Vec<String>,
}

impl<'a> Converter<'a> {
    pub fn new(source: &'a str, ends: &'a EndPosTable, api_level: ApiLevel) -> Self {
        let mut ast = Ast::new();
        ast.set_default_flags(flags::ORIGINAL);
        Self {
            source,
            ends,
            api_level,
            ast,
            foreign_ids: HashMap::new(),
            type_names: Vec::new(),
        }
    }

    pub fn convert(mut self, root: &JcTree) -> Result<ConvertedUnit> {
        let root = self.compilation_unit(root)?;
        tracing::debug!(
            "Converted unit into {} nodes ({} with foreign origin)",
            self.ast.len(),
            self.foreign_ids.len()
        );
        Ok(ConvertedUnit {
            ast: self.ast,
            root,
            foreign_ids: self.foreign_ids,
        })
    }

    fn end_of(&self, tree: &JcTree) -> i32 {
        tree.end_pos(self.ends)
    }

    fn range_of(&self, tree: &JcTree) -> SourceRange {
        SourceRange::from_bounds(tree.start, self.end_of(tree))
    }

    /// Allocates a node converted from `tree`, spanning the tree's own range.
    fn alloc(&mut self, tree: &JcTree, kind: NodeKind) -> NodeId {
        let range = self.range_of(tree);
        self.alloc_at(tree, kind, range)
    }

    fn alloc_at(&mut self, tree: &JcTree, kind: NodeKind, range: SourceRange) -> NodeId {
        let id = self.ast.alloc(kind, range);
        self.foreign_ids.insert(id, tree.id.0);
        id
    }

    /// Allocates a node with no foreign counterpart.
    fn synthetic(&mut self, kind: NodeKind, range: SourceRange) -> NodeId {
        self.ast.alloc(kind, range)
    }

    fn simple_name(&mut self, identifier: &str, range: SourceRange) -> NodeId {
        self.synthetic(
            NodeKind::SimpleName {
                identifier: identifier.into(),
            },
            range,
        )
    }

    /// Name spanning `[at, at + len)`, or unset when `at` is unknown.
    fn name_at(&mut self, identifier: &str, at: i32) -> NodeId {
        let range = SourceRange::from_bounds(at, at + identifier.len() as i32);
        self.simple_name(identifier, range)
    }

    /// Name occupying the last `identifier.len()` bytes before `end`.
    fn name_ending_at(&mut self, identifier: &str, end: i32) -> NodeId {
        let range = if end < 0 {
            SourceRange::UNSET
        } else {
            SourceRange::from_bounds(end - identifier.len() as i32, end)
        };
        self.simple_name(identifier, range)
    }

    /// Placeholder standing in for erroneous input.
    fn placeholder(&mut self, tree: &JcTree, kind: NodeKind) -> NodeId {
        let id = self.alloc(tree, kind);
        self.ast.add_flags(id, flags::MALFORMED | flags::RECOVERED);
        id
    }

    /// Tokens (comments skipped) in `[from, to)`.
    fn tokens(&self, from: i32, to: i32) -> impl Iterator<Item = Token> + use<'a> {
        Scanner::new(self.source)
            .starting_at(from)
            .take_while(move |t| t.start < to)
    }

    /// First token in `[from, to)` spelled `text`.
    fn find_token(&self, text: &str, from: i32, to: i32) -> Option<Token> {
        let source = self.source;
        self.tokens(from, to).find(|t| t.text(source) == text)
    }
}

/// Converts a parsed foreign compilation unit.
pub fn convert_compilation_unit(
    root: &JcTree,
    ends: &EndPosTable,
    source: &str,
    api_level: ApiLevel,
) -> Result<ConvertedUnit> {
    Converter::new(source, ends, api_level).convert(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_api::Prop;
    use jdt_bridge_javac::JavacFrontend;

    fn convert(source: &str) -> ConvertedUnit {
        let parsed = JavacFrontend::new().parse(source).unwrap();
        convert_compilation_unit(&parsed.root, &parsed.end_positions, source, ApiLevel::latest())
            .unwrap()
    }

    #[test]
    fn test_every_node_carries_original_flag() {
        let unit = convert("class A { int f; }");
        assert!(
            unit.ast
                .ids()
                .all(|id| unit.ast.flags(id) & flags::ORIGINAL != 0)
        );
    }

    #[test]
    fn test_root_spans_whole_source() {
        let source = "package p;\nclass A {}\n";
        let unit = convert(source);
        assert_eq!(unit.ast.range(unit.root), SourceRange::new(0, source.len() as i32));
        assert_eq!(unit.ast.list_len(unit.root, Prop::Types), 1);
        assert!(unit.foreign_ids.contains_key(&unit.root));
    }
}
