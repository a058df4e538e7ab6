use super::range::SourceRange;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Line,
    Block,
    Doc,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub range: SourceRange,
}

impl Comment {
    pub fn new(kind: CommentKind, start: i32, end: i32) -> Self {
        Self {
            kind,
            range: SourceRange::from_bounds(start, end),
        }
    }

    pub fn is_doc(&self) -> bool {
        self.kind == CommentKind::Doc
    }

    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        if !self.range.is_set() {
            return None;
        }
        source.get(self.range.start as usize..self.range.end() as usize)
    }
}
