use super::{JcTree, Tag, TreeId};
use std::collections::HashMap;

/// Parent links and id lookup over a finished foreign tree.
pub struct ForeignIndex<'a> {
    root: &'a JcTree,
    nodes: HashMap<TreeId, &'a JcTree>,
    parents: HashMap<TreeId, TreeId>,
}

impl<'a> ForeignIndex<'a> {
    pub fn build(root: &'a JcTree) -> Self {
        let mut nodes = HashMap::new();
        let mut parents = HashMap::new();
        let mut stack = vec![root];
        while let Some(tree) = stack.pop() {
            nodes.insert(tree.id, tree);
            for child in tree.children() {
                parents.insert(child.id, tree.id);
                stack.push(child);
            }
        }
        Self {
            root,
            nodes,
            parents,
        }
    }

    pub fn root(&self) -> &'a JcTree {
        self.root
    }

    pub fn get(&self, id: TreeId) -> Option<&'a JcTree> {
        self.nodes.get(&id).copied()
    }

    pub fn parent(&self, id: TreeId) -> Option<&'a JcTree> {
        self.parents.get(&id).and_then(|p| self.get(*p))
    }

    /// Path from the root down to `id`.
    pub fn path(&self, id: TreeId) -> Option<TreePath<'a>> {
        let mut nodes = vec![self.get(id)?];
        let mut current = id;
        while let Some(parent) = self.parents.get(&current) {
            nodes.push(self.get(*parent)?);
            current = *parent;
        }
        nodes.reverse();
        Some(TreePath { nodes })
    }

    /// Innermost tree whose source span contains `offset`.
    pub fn innermost_at(&self, offset: i32, ends: &super::EndPosTable) -> Option<&'a JcTree> {
        let mut current = self.root;
        'descend: loop {
            for child in current.children() {
                let end = child.end_pos(ends);
                if child.start >= 0 && child.start <= offset && offset < end {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }
}

/// Root-to-leaf chain of trees.
#[derive(Debug, Clone)]
pub struct TreePath<'a> {
    nodes: Vec<&'a JcTree>,
}

impl<'a> TreePath<'a> {
    pub fn leaf(&self) -> &'a JcTree {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn parent_path(&self) -> Option<TreePath<'a>> {
        if self.nodes.len() < 2 {
            return None;
        }
        Some(TreePath {
            nodes: self.nodes[..self.nodes.len() - 1].to_vec(),
        })
    }

    pub fn parent(&self) -> Option<&'a JcTree> {
        self.nodes.len().checked_sub(2).map(|i| self.nodes[i])
    }

    /// Ancestors from the leaf's parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a JcTree> + '_ {
        self.nodes.iter().rev().skip(1).copied()
    }

    pub fn nearest(&self, tag: Tag) -> Option<&'a JcTree> {
        self.nodes.iter().rev().copied().find(|t| t.tag() == tag)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{JcKind, TreeFactory};

    #[test]
    fn test_path_walks_to_root() {
        let mut f = TreeFactory::new();
        let lhs = f.ident(0, "a");
        let rhs = f.ident(4, "b");
        let rhs_id = rhs.id;
        let sum = f.make(
            0,
            2,
            5,
            JcKind::Binary {
                op: Tag::Plus,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        );
        let exec = f.at(0, 6, JcKind::Exec { expr: Box::new(sum) });

        let index = ForeignIndex::build(&exec);
        let path = index.path(rhs_id).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.leaf().ident_name(), Some("b"));
        assert_eq!(path.parent().unwrap().tag(), Tag::Plus);
        assert_eq!(path.nearest(Tag::Exec).unwrap().id, exec.id);

        let ends = f.finish();
        let hit = index.innermost_at(4, &ends).unwrap();
        assert_eq!(hit.id, rhs_id);
    }
}
