use std::fmt;
use std::ops::{Add, Range, Sub};

use crate::TextSize;

/// A half-open `[start, end)` range of [`TextSize`] offsets.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    start: TextSize,
    end: TextSize,
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl TextRange {
    pub const fn new(start: TextSize, end: TextSize) -> TextRange {
        assert!(start.to_u32() <= end.to_u32());
        TextRange { start, end }
    }

    pub fn at(offset: TextSize, len: TextSize) -> TextRange {
        TextRange::new(offset, TextSize::new(offset.to_u32() + len.to_u32()))
    }

    pub fn empty(offset: TextSize) -> TextRange {
        TextRange::new(offset, offset)
    }

    pub const fn start(self) -> TextSize {
        self.start
    }

    pub const fn end(self) -> TextSize {
        self.end
    }

    pub fn len(self) -> TextSize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, offset: TextSize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn contains_range(self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the smallest range that contains both `self` and `other`.
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn intersect(self, other: TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then(|| TextRange::new(start, end))
    }

    /// Shifts both endpoints to the right by `amount`.
    pub fn add(self, amount: TextSize) -> TextRange {
        TextRange::new(self.start + amount, self.end + amount)
    }

    /// Shifts both endpoints to the left by `amount`.
    pub fn sub(self, amount: TextSize) -> TextRange {
        TextRange::new(self.start - amount, self.end - amount)
    }
}

impl Add<TextSize> for TextRange {
    type Output = TextRange;

    fn add(self, rhs: TextSize) -> TextRange {
        TextRange::add(self, rhs)
    }
}

impl Sub<TextSize> for TextRange {
    type Output = TextRange;

    fn sub(self, rhs: TextSize) -> TextRange {
        TextRange::sub(self, rhs)
    }
}

impl From<TextRange> for Range<usize> {
    fn from(range: TextRange) -> Range<usize> {
        range.start().to_usize()..range.end().to_usize()
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.to_u32(), self.end.to_u32())
    }
}

/// A trait for AST and token types that carry a [`TextRange`].
pub trait Ranged {
    fn range(&self) -> TextRange;

    fn start(&self) -> TextSize {
        self.range().start()
    }

    fn end(&self) -> TextSize {
        self.range().end()
    }
}

impl Ranged for TextRange {
    fn range(&self) -> TextRange {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover() {
        let a = TextRange::new(TextSize::new(0), TextSize::new(3));
        let b = TextRange::new(TextSize::new(5), TextSize::new(8));
        assert_eq!(
            a.cover(b),
            TextRange::new(TextSize::new(0), TextSize::new(8))
        );
    }

    #[test]
    fn intersect() {
        let a = TextRange::new(TextSize::new(0), TextSize::new(5));
        let b = TextRange::new(TextSize::new(3), TextSize::new(8));
        assert_eq!(
            a.intersect(b),
            Some(TextRange::new(TextSize::new(3), TextSize::new(5)))
        );
    }
}
