//! The source reader (§2.1): a cursor over the input string exposing the
//! current code point, one code point of lookahead, and a running byte
//! offset. Everything above this (the lexer's line/column bookkeeping,
//! indentation stack, bracket stack) is built on top of `Cursor::bump`.

use pyast_text_size::TextSize;

/// Sentinel returned by `first`/`second` once the cursor runs past the end
/// of input, following `rustc_lexer`'s convention so `while self.first() !=
/// EOF_CHAR` reads naturally.
pub const EOF_CHAR: char = '\0';

pub struct Cursor<'a> {
    chars: std::str::Chars<'a>,
    source_len: TextSize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor {
            chars: input.chars(),
            source_len: TextSize::from(input),
        }
    }

    /// Bytes consumed so far, measured from the *end* of the original
    /// input; `source_len - remaining` is the forward byte offset.
    fn remaining(&self) -> TextSize {
        TextSize::try_from(self.chars.as_str().len()).expect("source too large")
    }

    pub fn offset(&self) -> TextSize {
        self.source_len - self.remaining()
    }

    pub fn as_str(&self) -> &'a str {
        self.chars.as_str()
    }

    pub fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub fn second(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().unwrap_or(EOF_CHAR)
    }

    pub fn third(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next();
        iter.next().unwrap_or(EOF_CHAR)
    }

    /// Consumes and returns the next character, or `None` at end of input.
    pub fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consumes the next character while `predicate` holds for it.
    pub fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.bump();
        }
    }

    /// Consumes `c` if it is the next character, reporting whether it did.
    pub fn eat_char(&mut self, c: char) -> bool {
        if self.first() == c {
            self.bump();
            true
        } else {
            false
        }
    }
}
