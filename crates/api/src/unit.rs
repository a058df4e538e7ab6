use crate::level::ApiLevel;
use crate::models::{
    Ast, Binding, BindingKey, BindingResolver, Comment, NoBindings, NodeId, Problem, SourceRange,
    column_number, compute_line_ends, line_number, offset_of,
};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A converted compilation unit: the tree plus its line table, comment table
/// and problem list. Shared read-only once conversion has finished.
pub struct CompilationUnit {
    pub file: String,
    pub source: Arc<str>,
    pub ast: Ast,
    pub root: NodeId,
    pub api_level: ApiLevel,
    pub line_ends: Vec<i32>,
    pub comments: Vec<Comment>,
    pub problems: Vec<Problem>,
    /// Unified node to the id of the foreign node it was converted from.
    pub foreign_ids: HashMap<NodeId, u32>,
    resolver: Arc<dyn BindingResolver>,
    binding_keys: DashMap<NodeId, Option<BindingKey>>,
}

impl CompilationUnit {
    pub fn new(file: impl Into<String>, source: Arc<str>, ast: Ast, root: NodeId, api_level: ApiLevel) -> Self {
        let line_ends = compute_line_ends(&source);
        Self {
            file: file.into(),
            source,
            ast,
            root,
            api_level,
            line_ends,
            comments: Vec::new(),
            problems: Vec::new(),
            foreign_ids: HashMap::new(),
            resolver: Arc::new(NoBindings),
            binding_keys: DashMap::new(),
        }
    }

    pub fn set_binding_resolver(&mut self, resolver: Arc<dyn BindingResolver>) {
        self.resolver = resolver;
        self.binding_keys.clear();
    }

    /// Key of the node's binding, computed on first request and cached.
    pub fn binding_key(&self, node: NodeId) -> Option<BindingKey> {
        if let Some(cached) = self.binding_keys.get(&node) {
            return cached.clone();
        }
        let key = self.resolver.resolve(&self.ast, node);
        self.binding_keys.insert(node, key.clone());
        key
    }

    pub fn resolve_binding(&self, node: NodeId) -> Option<Binding> {
        let key = self.binding_key(node)?;
        self.resolver.binding(&key)
    }

    pub fn line_number(&self, offset: i32) -> Option<usize> {
        line_number(&self.line_ends, offset)
    }

    pub fn column_number(&self, offset: i32) -> Option<usize> {
        column_number(&self.line_ends, offset)
    }

    pub fn position_of(&self, line: usize, column: usize) -> Option<i32> {
        offset_of(&self.line_ends, line, column)
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn text(&self, range: SourceRange) -> Option<&str> {
        if !range.is_set() {
            return None;
        }
        self.source.get(range.start as usize..range.end() as usize)
    }

    pub fn snapshot(&self) -> UnitSnapshot<'_> {
        UnitSnapshot {
            file: &self.file,
            api_level: self.api_level,
            root: self.root,
            ast: &self.ast,
            line_ends: &self.line_ends,
            comments: &self.comments,
            problems: &self.problems,
        }
    }
}

impl std::fmt::Debug for CompilationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationUnit")
            .field("file", &self.file)
            .field("api_level", &self.api_level)
            .field("nodes", &self.ast.len())
            .field("comments", &self.comments.len())
            .field("problems", &self.problems.len())
            .finish()
    }
}

/// Serializable view of a unit, without the resolver.
#[derive(Serialize)]
pub struct UnitSnapshot<'a> {
    pub file: &'a str,
    pub api_level: ApiLevel,
    pub root: NodeId,
    pub ast: &'a Ast,
    pub line_ends: &'a [i32],
    pub comments: &'a [Comment],
    pub problems: &'a [Problem],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BindingKind, NodeKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
    }

    impl BindingResolver for CountingResolver {
        fn resolve(&self, _ast: &Ast, node: NodeId) -> Option<BindingKey> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(BindingKey(format!("k{}", node.0)))
        }

        fn binding(&self, key: &BindingKey) -> Option<Binding> {
            Some(Binding {
                key: key.clone(),
                kind: BindingKind::Variable,
                name: "x".into(),
            })
        }
    }

    #[test]
    fn test_bindings_are_resolved_lazily_once() {
        let mut ast = Ast::new();
        let root = ast.alloc(NodeKind::CompilationUnit, SourceRange::new(0, 0));
        let mut unit = CompilationUnit::new("A.java", Arc::from(""), ast, root, ApiLevel::latest());
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });
        unit.set_binding_resolver(resolver.clone());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

        let first = unit.resolve_binding(root).unwrap();
        let second = unit.resolve_binding(root).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }
}
