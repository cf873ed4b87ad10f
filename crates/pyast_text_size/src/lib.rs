//! Newtypes for text offsets and ranges.
//!
//! [`TextSize`] is a `u32` byte offset into a source string; [`TextRange`] is
//! a half-open `[start, end)` pair of offsets. These are the position
//! representation shared by every crate in this workspace: the lexer stamps
//! them on tokens, the parser propagates them onto AST nodes, and the
//! unparser ignores them entirely.

use std::fmt;
use std::num::TryFromIntError;
use std::ops::{Add, AddAssign, Index, IndexMut, Range, Sub, SubAssign};

mod range;

pub use range::TextRange;

/// A zero-based UTF-8 byte offset into a source string.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSize {
    raw: u32,
}

impl fmt::Debug for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl TextSize {
    /// The zero offset.
    pub const fn new(raw: u32) -> TextSize {
        TextSize { raw }
    }

    pub const fn to_u32(self) -> u32 {
        self.raw
    }

    pub const fn to_usize(self) -> usize {
        self.raw as usize
    }
}

impl From<u32> for TextSize {
    fn from(raw: u32) -> Self {
        TextSize::new(raw)
    }
}

impl From<TextSize> for u32 {
    fn from(size: TextSize) -> Self {
        size.raw
    }
}

impl TryFrom<usize> for TextSize {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Ok(TextSize::new(u32::try_from(value)?))
    }
}

impl From<TextSize> for usize {
    fn from(size: TextSize) -> Self {
        size.raw as usize
    }
}

macro_rules! impl_from_len {
    ($ty:ty) => {
        impl From<&$ty> for TextSize {
            fn from(text: &$ty) -> Self {
                // SAFETY: string/str lengths must fit in u32 for any source
                // this crate can lex; a larger input is rejected earlier by
                // `ResourceError` bookkeeping in the caller.
                TextSize::try_from(text.len()).expect("text length overflows u32")
            }
        }
    };
}

impl_from_len!(str);
impl_from_len!(String);

impl Add for TextSize {
    type Output = TextSize;

    fn add(self, rhs: TextSize) -> TextSize {
        TextSize::new(self.raw + rhs.raw)
    }
}

impl AddAssign for TextSize {
    fn add_assign(&mut self, rhs: TextSize) {
        self.raw += rhs.raw;
    }
}

impl Sub for TextSize {
    type Output = TextSize;

    fn sub(self, rhs: TextSize) -> TextSize {
        TextSize::new(
            self.raw
                .checked_sub(rhs.raw)
                .expect("attempt to subtract with overflow"),
        )
    }
}

impl SubAssign for TextSize {
    fn sub_assign(&mut self, rhs: TextSize) {
        self.raw -= rhs.raw;
    }
}

impl<T> Index<TextRange> for [T] {
    type Output = [T];

    fn index(&self, index: TextRange) -> &[T] {
        &self[Range::<usize>::from(index)]
    }
}

impl Index<TextRange> for str {
    type Output = str;

    fn index(&self, index: TextRange) -> &str {
        &self[Range::<usize>::from(index)]
    }
}

impl Index<TextRange> for String {
    type Output = str;

    fn index(&self, index: TextRange) -> &str {
        &self.as_str()[index]
    }
}

impl<T> IndexMut<TextRange> for [T] {
    fn index_mut(&mut self, index: TextRange) -> &mut [T] {
        &mut self[Range::<usize>::from(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = TextSize::new(3);
        let b = TextSize::new(5);
        assert_eq!(a + b, TextSize::new(8));
        assert_eq!(b - a, TextSize::new(2));
    }

    #[test]
    fn from_str_len() {
        let size: TextSize = TextSize::from("hello");
        assert_eq!(size, TextSize::new(5));
    }
}
