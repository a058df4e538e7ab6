use super::{EndPosTable, JcKind, JcTree, TreeId};

/// Allocates tree ids and records end positions as trees are built.
#[derive(Debug, Default)]
pub struct TreeFactory {
    next_id: u32,
    ends: EndPosTable,
}

impl TreeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make(&mut self, start: i32, pos: i32, end: i32, kind: JcKind) -> JcTree {
        let id = TreeId(self.next_id);
        self.next_id += 1;
        self.ends.store(id, end);
        JcTree {
            id,
            start,
            pos,
            kind,
        }
    }

    /// Tree whose preferred position is its start.
    pub fn at(&mut self, start: i32, end: i32, kind: JcKind) -> JcTree {
        self.make(start, start, end, kind)
    }

    pub fn ident(&mut self, start: i32, name: &str) -> JcTree {
        let end = if start < 0 {
            start
        } else {
            start + name.len() as i32
        };
        self.at(
            start,
            end,
            JcKind::Ident {
                name: name.to_string(),
            },
        )
    }

    pub fn set_end(&mut self, id: TreeId, end: i32) {
        self.ends.store(id, end);
    }

    pub fn end_positions(&self) -> &EndPosTable {
        &self.ends
    }

    pub fn finish(self) -> EndPosTable {
        self.ends
    }
}
