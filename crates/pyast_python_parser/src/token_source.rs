//! Buffers the lexer's token stream so the parser can peek arbitrarily far
//! ahead (needed e.g. to tell a parenthesized tuple from a parenthesized
//! generator expression, or to recognize the `match`/`case` soft keywords)
//! without the lexer itself knowing anything about lookahead.

use std::collections::VecDeque;

use pyast_text_size::TextRange;

use crate::error::{Error, ParseError, ResourceError};
use crate::lexer::{Lexer, Spanned};
use crate::token::Tok;

pub struct TokenSource<'a> {
    lexer: Lexer<'a>,
    buf: VecDeque<Spanned>,
    max_tokens: Option<usize>,
    produced: usize,
    filename: String,
    exhausted: bool,
}

impl<'a> TokenSource<'a> {
    pub fn new(source: &'a str, max_tokens: Option<usize>, filename: String) -> Self {
        TokenSource {
            lexer: Lexer::new(source, false),
            buf: VecDeque::new(),
            max_tokens,
            produced: 0,
            filename,
            exhausted: false,
        }
    }

    fn fill_to(&mut self, n: usize) -> Result<(), Error> {
        while self.buf.len() <= n {
            if self.exhausted {
                break;
            }
            match self.lexer.next() {
                Some(Ok(tok)) => {
                    self.produced += 1;
                    if let Some(limit) = self.max_tokens {
                        if self.produced > limit {
                            return Err(Error::Resource(ResourceError {
                                message: format!("exceeded token limit of {limit}"),
                            }));
                        }
                    }
                    let is_eof = matches!(tok.0, Tok::EndOfFile);
                    self.buf.push_back(tok);
                    if is_eof {
                        self.exhausted = true;
                    }
                }
                Some(Err(err)) => {
                    return Err(Error::Parse(
                        ParseError::from(err).with_filename(&self.filename),
                    ));
                }
                None => {
                    self.exhausted = true;
                }
            }
        }
        Ok(())
    }

    pub fn source(&self) -> &'a str {
        self.lexer.source()
    }

    pub fn peek(&mut self) -> Result<&Tok, Error> {
        self.peek_at(0)
    }

    pub fn peek_at(&mut self, n: usize) -> Result<&Tok, Error> {
        self.fill_to(n)?;
        Ok(self.buf.get(n).map(|(tok, _)| tok).unwrap_or(&Tok::EndOfFile))
    }

    pub fn cur_range(&mut self) -> Result<TextRange, Error> {
        self.fill_to(0)?;
        Ok(self.buf.front().map(|(_, r)| *r).unwrap_or_else(|| TextRange::empty(pyast_text_size::TextSize::from(0u32))))
    }

    pub fn bump(&mut self) -> Result<Spanned, Error> {
        self.fill_to(0)?;
        Ok(self
            .buf
            .pop_front()
            .unwrap_or((Tok::EndOfFile, TextRange::empty(pyast_text_size::TextSize::from(0u32)))))
    }
}
