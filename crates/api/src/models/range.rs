use serde::{Deserialize, Serialize};

/// A half-open source span `[start, start + length)` in UTF-8 byte offsets.
///
/// A negative `start` marks a range that was never assigned; such ranges are
/// tolerated on synthetic nodes whose text could not be located.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: i32,
    pub length: i32,
}

impl SourceRange {
    pub const UNSET: SourceRange = SourceRange {
        start: -1,
        length: 0,
    };

    pub fn new(start: i32, length: i32) -> Self {
        Self { start, length }
    }

    /// Builds a range from two offsets; an unknown bound yields [`SourceRange::UNSET`].
    pub fn from_bounds(start: i32, end: i32) -> Self {
        if start < 0 || end < start {
            return Self::UNSET;
        }
        Self {
            start,
            length: end - start,
        }
    }

    pub fn is_set(&self) -> bool {
        self.start >= 0
    }

    pub fn end(&self) -> i32 {
        self.start + self.length
    }

    pub fn contains(&self, other: &SourceRange) -> bool {
        self.is_set() && other.is_set() && self.start <= other.start && other.end() <= self.end()
    }

    pub fn contains_offset(&self, offset: i32) -> bool {
        self.is_set() && self.start <= offset && offset < self.end()
    }

    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.is_set()
            && other.is_set()
            && self.length > 0
            && other.length > 0
            && self.start < other.end()
            && other.start < self.end()
    }

    /// Smallest range covering both; unset operands are ignored.
    pub fn cover(&self, other: &SourceRange) -> SourceRange {
        match (self.is_set(), other.is_set()) {
            (false, _) => *other,
            (_, false) => *self,
            _ => SourceRange::from_bounds(self.start.min(other.start), self.end().max(other.end())),
        }
    }
}

impl Default for SourceRange {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Offsets of the last character of every line, used for line/column lookups.
pub fn compute_line_ends(source: &str) -> Vec<i32> {
    let mut ends = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => ends.push(i as i32),
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                ends.push(i as i32);
            }
            _ => {}
        }
        i += 1;
    }
    ends.push(bytes.len() as i32 - 1);
    ends
}

/// 1-based line containing `offset`, or `None` when the offset is outside the text.
pub fn line_number(line_ends: &[i32], offset: i32) -> Option<usize> {
    let last = *line_ends.last()?;
    if offset < 0 || offset > last + 1 {
        return None;
    }
    Some(line_ends.partition_point(|&end| end < offset) + 1)
}

/// 1-based column of `offset` within its line.
pub fn column_number(line_ends: &[i32], offset: i32) -> Option<usize> {
    let line = line_number(line_ends, offset)?;
    let line_start = if line == 1 {
        0
    } else {
        line_ends[line - 2] + 1
    };
    Some((offset - line_start) as usize + 1)
}

/// Offset of a 1-based `(line, column)` pair.
pub fn offset_of(line_ends: &[i32], line: usize, column: usize) -> Option<i32> {
    if line == 0 || column == 0 || line > line_ends.len() {
        return None;
    }
    let line_start = if line == 1 {
        0
    } else {
        line_ends[line - 2] + 1
    };
    let offset = line_start + column as i32 - 1;
    if offset > line_ends[line - 1] + 1 {
        return None;
    }
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_table_lookups() {
        let ends = compute_line_ends("ab\ncd\r\nef");
        assert_eq!(ends, vec![2, 6, 8]);
        assert_eq!(line_number(&ends, 0), Some(1));
        assert_eq!(line_number(&ends, 2), Some(1));
        assert_eq!(line_number(&ends, 3), Some(2));
        assert_eq!(line_number(&ends, 7), Some(3));
        assert_eq!(column_number(&ends, 4), Some(2));
        assert_eq!(offset_of(&ends, 3, 2), Some(8));
        assert_eq!(line_number(&ends, 42), None);
    }

    #[test]
    fn test_range_relations() {
        let outer = SourceRange::new(0, 10);
        let inner = SourceRange::new(2, 3);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.overlaps(&inner));
        assert!(!SourceRange::new(0, 2).overlaps(&SourceRange::new(2, 2)));
        assert!(!SourceRange::UNSET.contains(&inner));
        assert_eq!(SourceRange::from_bounds(5, 3), SourceRange::UNSET);
        assert_eq!(inner.cover(&SourceRange::new(8, 2)), SourceRange::new(2, 8));
    }
}
