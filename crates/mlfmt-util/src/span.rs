//! Source positions and spans.
//!
//! A [`Pos`] is a single point in a source file: a byte offset plus the
//! 1-based line/column it resolves to. A [`Span`] is a `(start, end)` pair of
//! positions, always within the same [`SourceId`].

use std::sync::Arc;

/// Identifies one source file tracked by a [`SourceMap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

impl SourceId {
    pub const DUMMY: SourceId = SourceId(u32::MAX);
}

/// A single point in a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub source: SourceId,
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub const DUMMY: Pos = Pos { source: SourceId::DUMMY, offset: 0, line: 1, column: 1 };
}

/// A contiguous range `[start, end)` within a single source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const DUMMY: Span = Span { start: Pos::DUMMY, end: Pos::DUMMY };

    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// The smallest span that contains both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span { start: self.start, end: other.end }
    }

    pub fn len(&self) -> u32 {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

/// One source file: its name, content, and precomputed line-start table used
/// to resolve byte offsets to line/column pairs in O(log n).
#[derive(Clone)]
pub struct SourceFile {
    id: SourceId,
    name: String,
    content: Arc<str>,
    line_starts: Arc<[u32]>,
}

impl SourceFile {
    pub fn new(id: SourceId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self { id, name: name.into(), content, line_starts }
    }

    fn compute_line_starts(content: &str) -> Arc<[u32]> {
        let mut starts = vec![0u32];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        starts.into()
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Resolves a byte offset into a [`Pos`]. `offset` is clamped to the
    /// file's length.
    pub fn pos_at(&self, offset: u32) -> Pos {
        let offset = offset.min(self.content.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.content[line_start as usize..offset as usize].chars().count() as u32 + 1;
        Pos { source: self.id, offset, line: line_idx as u32 + 1, column }
    }

    pub fn span_for(&self, start: u32, end: u32) -> Span {
        Span::new(self.pos_at(start), self.pos_at(end))
    }

    /// The raw text covered by `span`, assuming `span` belongs to this file.
    pub fn text(&self, span: Span) -> &str {
        &self.content[span.start.offset as usize..span.end.offset as usize]
    }

    /// The full text of the line containing `pos`, without its trailing newline.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line as usize).saturating_sub(1);
        let start = self.line_starts.get(idx).copied().unwrap_or(0) as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s as usize - 1)
            .unwrap_or(self.content.len());
        self.content[start..end.max(start)].trim_end_matches('\r')
    }
}

/// Owns every [`SourceFile`] opened during a run, indexed by [`SourceId`].
#[derive(Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> SourceId {
        let id = SourceId(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name, content));
        id
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_at_tracks_lines_and_columns() {
        let file = SourceFile::new(SourceId(0), "t.sml", "abc\ndef\nghi");
        assert_eq!(file.pos_at(0), Pos { source: SourceId(0), offset: 0, line: 1, column: 1 });
        assert_eq!(file.pos_at(4), Pos { source: SourceId(0), offset: 4, line: 2, column: 1 });
        assert_eq!(file.pos_at(6), Pos { source: SourceId(0), offset: 6, line: 2, column: 3 });
    }

    #[test]
    fn span_text_round_trips() {
        let file = SourceFile::new(SourceId(0), "t.sml", "val x = 1");
        let span = file.span_for(0, 3);
        assert_eq!(file.text(span), "val");
    }

    #[test]
    fn line_text_strips_newline() {
        let file = SourceFile::new(SourceId(0), "t.sml", "one\ntwo\nthree");
        assert_eq!(file.line_text(2), "two");
        assert_eq!(file.line_text(3), "three");
    }

    #[test]
    fn source_map_assigns_sequential_ids() {
        let mut map = SourceMap::new();
        let a = map.add("a.sml", "val a = 1");
        let b = map.add("b.sml", "val b = 2");
        assert_eq!(a, SourceId(0));
        assert_eq!(b, SourceId(1));
        assert_eq!(map.get(a).unwrap().content(), "val a = 1");
    }
}
