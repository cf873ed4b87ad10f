//! Byte-offset to (line, column) translation for diagnostics.
//!
//! The lexer and parser work purely in [`TextSize`] byte offsets; this crate
//! supplies the [`LineIndex`] that turns those offsets into the
//! one-indexed `(lineno, col_offset)` pairs CPython's `ast` module exposes
//! on every node.

use std::fmt;

use pyast_text_size::{TextRange, TextSize};

/// A 1-based index, used for the `lineno` field CPython exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneIndexed(u32);

impl OneIndexed {
    pub const MIN: OneIndexed = OneIndexed(1);

    /// Creates a `OneIndexed` from a zero-based value, returning `None` on
    /// overflow.
    pub const fn from_zero_indexed(value: u32) -> Self {
        OneIndexed(value + 1)
    }

    pub const fn new(value: usize) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(OneIndexed(value as u32))
        }
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    pub const fn to_zero_indexed(self) -> usize {
        self.0 as usize - 1
    }

    pub fn saturating_add(self, amount: usize) -> Self {
        OneIndexed(self.0.saturating_add(amount as u32))
    }
}

impl Default for OneIndexed {
    fn default() -> Self {
        OneIndexed::MIN
    }
}

impl fmt::Display for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A human-facing `(line, column)` pair, both one-indexed, with column
/// counted in UTF-8 bytes from the start of the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: OneIndexed,
    pub column: OneIndexed,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets into a source string to `(line, column)` pairs.
///
/// Built once per source string; every offset after a line's start byte is
/// translated with a binary search over the recorded line-start table.
#[derive(Clone, Debug)]
struct LineIndexInner {
    line_starts: Vec<TextSize>,
}

impl LineIndexInner {
    fn from_source_text(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 88);
        line_starts.push(TextSize::new(0));

        let bytes = text.as_bytes();
        let mut idx = 0usize;
        while let Some(pos) = memchr::memchr(b'\n', &bytes[idx..]) {
            idx += pos + 1;
            line_starts.push(TextSize::try_from(idx).expect("source too large"));
        }

        LineIndexInner { line_starts }
    }

    fn line_index(&self, offset: TextSize) -> OneIndexed {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => OneIndexed::from_zero_indexed(idx as u32),
            Err(idx) => OneIndexed::from_zero_indexed(idx as u32 - 1),
        }
    }

    fn line_start(&self, line: OneIndexed) -> TextSize {
        self.line_starts[line.to_zero_indexed()]
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Owning, shareable line index for one source file.
#[derive(Clone, Debug)]
pub struct LineIndex {
    inner: std::sync::Arc<LineIndexInner>,
}

impl LineIndex {
    pub fn from_source_text(text: &str) -> Self {
        LineIndex {
            inner: std::sync::Arc::new(LineIndexInner::from_source_text(text)),
        }
    }

    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    /// Byte offset of the first character on `line`.
    pub fn line_start(&self, line: OneIndexed, contents: &str) -> TextSize {
        if line.to_zero_indexed() >= self.inner.line_starts.len() {
            return TextSize::from(contents);
        }
        self.inner.line_start(line)
    }

    /// Byte offset one past the last character on `line`, not including its
    /// terminator.
    pub fn line_end(&self, line: OneIndexed, contents: &str) -> TextSize {
        let next = OneIndexed::from_zero_indexed(line.to_zero_indexed() as u32 + 1);
        let end = if next.to_zero_indexed() >= self.inner.line_starts.len() {
            TextSize::from(contents)
        } else {
            self.inner.line_start(next)
        };
        let bytes = contents.as_bytes();
        let mut end = end.to_usize();
        if end > 0 && bytes.get(end - 1) == Some(&b'\n') {
            end -= 1;
        }
        if end > 0 && bytes.get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        TextSize::try_from(end).unwrap()
    }

    pub fn line_range(&self, line: OneIndexed, contents: &str) -> TextRange {
        TextRange::new(self.line_start(line, contents), self.line_end(line, contents))
    }

    /// Translates a byte offset into a one-indexed `(line, column)` pair.
    /// The column is counted in UTF-8 bytes from the line start, matching
    /// CPython's `col_offset` semantics.
    pub fn line_column(&self, offset: TextSize, contents: &str) -> SourceLocation {
        let line = self.inner.line_index(offset);
        let line_start = self.inner.line_start(line);
        let column = OneIndexed::from_zero_indexed((offset - line_start).to_u32());
        debug_assert!(offset.to_usize() <= contents.len());
        SourceLocation { line, column }
    }
}

/// Extension trait for slicing a source string by whole lines.
pub trait LineRanges {
    fn full_line_str(&self, offset: TextSize) -> &str;
    fn full_lines_str(&self, range: TextRange) -> &str;
}

impl LineRanges for str {
    fn full_line_str(&self, offset: TextSize) -> &str {
        let index = LineIndex::from_source_text(self);
        let loc = index.line_column(offset, self);
        &self[index.line_range(loc.line, self)]
    }

    fn full_lines_str(&self, range: TextRange) -> &str {
        let index = LineIndex::from_source_text(self);
        let start_line = index.line_column(range.start(), self).line;
        let end_line = index.line_column(range.end(), self).line;
        let start = index.line_start(start_line, self);
        let end = index.line_end(end_line, self);
        &self[TextRange::new(start, end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let index = LineIndex::from_source_text("hello world");
        let loc = index.line_column(TextSize::new(6), "hello world");
        assert_eq!(loc.line, OneIndexed::from_zero_indexed(0));
        assert_eq!(loc.column, OneIndexed::from_zero_indexed(6));
    }

    #[test]
    fn multi_line() {
        let text = "one\ntwo\nthree";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_count(), 3);

        let loc = index.line_column(TextSize::new(8), text);
        assert_eq!(loc.line, OneIndexed::from_zero_indexed(2));
        assert_eq!(loc.column, OneIndexed::from_zero_indexed(0));
    }

    #[test]
    fn line_range() {
        let text = "abc\ndef\n";
        let index = LineIndex::from_source_text(text);
        let range = index.line_range(OneIndexed::from_zero_indexed(1), text);
        assert_eq!(&text[range], "def");
    }
}
