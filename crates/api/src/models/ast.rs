use super::kind::{NodeKind, Prop};
use super::range::SourceRange;
use serde::{Deserialize, Serialize};

/// Bookkeeping bits carried in a node's flag word.
pub mod flags {
    pub const MALFORMED: u32 = 1;
    pub const ORIGINAL: u32 = 2;
    pub const PROTECT: u32 = 4;
    pub const RECOVERED: u32 = 8;

    /// Bits that never carry meaning when two trees are compared.
    pub const BOOKKEEPING: u32 = MALFORMED | ORIGINAL | PROTECT | RECOVERED;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Child {
    pub prop: Prop,
    pub node: NodeId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub range: SourceRange,
    pub flags: u32,
    pub parent: Option<NodeId>,
    pub children: Vec<Child>,
}

/// Arena owning every node of one compilation unit. Parent links are indices,
/// so the whole tree is dropped at once with the arena.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<NodeData>,
    #[serde(skip)]
    default_flags: u32,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags stamped on every node allocated from now on.
    pub fn set_default_flags(&mut self, flags: u32) {
        self.default_flags = flags;
    }

    pub fn alloc(&mut self, kind: NodeKind, range: SourceRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            range,
            flags: self.default_flags,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn range(&self, id: NodeId) -> SourceRange {
        self.nodes[id.index()].range
    }

    pub fn set_range(&mut self, id: NodeId, range: SourceRange) {
        self.nodes[id.index()].range = range;
    }

    pub fn flags(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].flags
    }

    pub fn add_flags(&mut self, id: NodeId, flags: u32) {
        self.nodes[id.index()].flags |= flags;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Prop under which `id` hangs from its parent.
    pub fn location_in_parent(&self, id: NodeId) -> Option<Prop> {
        let parent = self.parent(id)?;
        self.nodes[parent.index()]
            .children
            .iter()
            .find(|c| c.node == id)
            .map(|c| c.prop)
    }

    /// Appends `child` under `prop`; a child is owned by exactly one parent.
    pub fn add_child(&mut self, parent: NodeId, prop: Prop, child: NodeId) {
        debug_assert!(self.nodes[child.index()].parent.is_none());
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()]
            .children
            .push(Child { prop, node: child });
    }

    pub fn add_opt(&mut self, parent: NodeId, prop: Prop, child: Option<NodeId>) {
        if let Some(child) = child {
            self.add_child(parent, prop, child);
        }
    }

    pub fn add_all(&mut self, parent: NodeId, prop: Prop, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.add_child(parent, prop, child);
        }
    }

    /// Inserts `child` before every existing child.
    pub fn add_child_first(&mut self, parent: NodeId, prop: Prop, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()]
            .children
            .insert(0, Child { prop, node: child });
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.index()].children.iter().map(|c| c.node)
    }

    pub fn child_entries(&self, id: NodeId) -> &[Child] {
        &self.nodes[id.index()].children
    }

    pub fn child(&self, id: NodeId, prop: Prop) -> Option<NodeId> {
        self.nodes[id.index()]
            .children
            .iter()
            .find(|c| c.prop == prop)
            .map(|c| c.node)
    }

    pub fn list(&self, id: NodeId, prop: Prop) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.index()]
            .children
            .iter()
            .filter(move |c| c.prop == prop)
            .map(|c| c.node)
    }

    pub fn list_len(&self, id: NodeId, prop: Prop) -> usize {
        self.list(id, prop).count()
    }

    /// Stable-sorts the `prop` list of `id` by start offset, keeping unset ranges
    /// last. Entries of other props keep their slots.
    pub fn sort_list_by_start(&mut self, id: NodeId, prop: Prop) {
        let slots: Vec<usize> = self.nodes[id.index()]
            .children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.prop == prop)
            .map(|(i, _)| i)
            .collect();
        let mut entries: Vec<Child> = slots
            .iter()
            .map(|&i| self.nodes[id.index()].children[i])
            .collect();
        entries.sort_by_key(|c| {
            let range = self.nodes[c.node.index()].range;
            (!range.is_set(), range.start)
        });
        let children = &mut self.nodes[id.index()].children;
        for (slot, entry) in slots.into_iter().zip(entries) {
            children[slot] = entry;
        }
    }

    /// Props used by `id`, in first-appearance order.
    pub fn props(&self, id: NodeId) -> Vec<Prop> {
        let mut props: Vec<Prop> = Vec::new();
        for child in &self.nodes[id.index()].children {
            if !props.contains(&child.prop) {
                props.push(child.prop);
            }
        }
        props
    }

    pub fn identifier(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::SimpleName { identifier } => Some(identifier.as_str()),
            _ => None,
        }
    }

    /// Dotted text of a simple or qualified name.
    pub fn name_text(&self, id: NodeId) -> Option<String> {
        match self.kind(id) {
            NodeKind::SimpleName { identifier } => Some(identifier.to_string()),
            NodeKind::QualifiedName => {
                let qualifier = self.name_text(self.child(id, Prop::Qualifier)?)?;
                let name = self.name_text(self.child(id, Prop::Name)?)?;
                Some(format!("{qualifier}.{name}"))
            }
            _ => None,
        }
    }

    /// Nodes of the subtree rooted at `root` in pre-order.
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = &self.nodes[id.index()].children;
            stack.extend(children.iter().rev().map(|c| c.node));
        }
        out
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    fn name(ast: &mut Ast, text: &str) -> NodeId {
        ast.alloc(
            NodeKind::SimpleName {
                identifier: SmolStr::new(text),
            },
            SourceRange::UNSET,
        )
    }

    #[test]
    fn test_children_by_prop() {
        let mut ast = Ast::new();
        let qualified = ast.alloc(NodeKind::QualifiedName, SourceRange::new(0, 5));
        let a = name(&mut ast, "a");
        let b = name(&mut ast, "b");
        ast.add_child(qualified, Prop::Qualifier, a);
        ast.add_child(qualified, Prop::Name, b);

        assert_eq!(ast.child(qualified, Prop::Name), Some(b));
        assert_eq!(ast.parent(a), Some(qualified));
        assert_eq!(ast.location_in_parent(b), Some(Prop::Name));
        assert_eq!(ast.name_text(qualified).as_deref(), Some("a.b"));
        assert_eq!(ast.preorder(qualified), vec![qualified, a, b]);
    }

    #[test]
    fn test_sort_list_keeps_other_props_in_place() {
        let mut ast = Ast::new();
        let decl = ast.alloc(NodeKind::FieldDeclaration, SourceRange::new(0, 20));
        let late = ast.alloc(
            NodeKind::Modifier {
                keyword: super::super::kind::ModifierKeyword::Final,
            },
            SourceRange::new(7, 5),
        );
        let unset = ast.alloc(
            NodeKind::Modifier {
                keyword: super::super::kind::ModifierKeyword::Static,
            },
            SourceRange::UNSET,
        );
        let early = ast.alloc(
            NodeKind::Modifier {
                keyword: super::super::kind::ModifierKeyword::Public,
            },
            SourceRange::new(0, 6),
        );
        let ty = name(&mut ast, "int");
        ast.add_child(decl, Prop::Modifiers, late);
        ast.add_child(decl, Prop::Modifiers, unset);
        ast.add_child(decl, Prop::Type, ty);
        ast.add_child(decl, Prop::Modifiers, early);

        ast.sort_list_by_start(decl, Prop::Modifiers);
        let order: Vec<NodeId> = ast.children(decl).collect();
        assert_eq!(order, vec![early, late, ty, unset]);
    }

    #[test]
    fn test_default_flags_apply_to_new_nodes() {
        let mut ast = Ast::new();
        let before = ast.alloc(NodeKind::NullLiteral, SourceRange::UNSET);
        ast.set_default_flags(flags::ORIGINAL);
        let after = ast.alloc(NodeKind::NullLiteral, SourceRange::UNSET);
        assert_eq!(ast.flags(before), 0);
        assert_eq!(ast.flags(after), flags::ORIGINAL);
    }
}
