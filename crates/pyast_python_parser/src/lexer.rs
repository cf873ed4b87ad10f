//! The lexer (§4.1): turns source text into a stream of `Tok`s, maintaining
//! the indent stack, the bracket-depth counter that drives implicit line
//! joining, and the f-string sub-lexer. Modeled on the teacher's
//! `ruff_python_parser` lexer, which in turn follows CPython's `tokenize.py`
//! structurally: the indent stack lives here, not in the parser, and
//! `Lexer` is a plain `Iterator`, so the parser can wrap it in any amount of
//! lookahead buffering it needs.

use std::collections::VecDeque;

use pyast_text_size::{TextRange, TextSize};

use crate::cursor::Cursor;
use crate::error::{LexicalError, LexicalErrorType};
use crate::numeric;
use crate::string;
use crate::token::{StringKind, Tok};

pub type Spanned = (Tok, TextRange);
pub type LexResult = Result<Spanned, LexicalError>;

/// Which part of an f-string the sub-lexer is currently scanning. Entering
/// `{` moves `Literal`/`FormatSpec` to `Expr`; a matching `}` pops back to
/// whichever of the two it came from; a `:` seen at the same bracket depth
/// the field opened at moves `Expr` to `FormatSpec`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FState {
    Literal,
    Expr,
    FormatSpec,
}

struct FStringCtx {
    quote: char,
    triple: bool,
    raw: bool,
    state: FState,
    /// One entry per currently-open `{...}` field: the bracket-stack depth
    /// it was opened at (so nested `(`, `[`, `{` inside the expression don't
    /// get confused with the field's own delimiters) and the state to
    /// return to once the field's `}` is seen.
    fields: Vec<(usize, FState)>,
}

pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor<'a>,
    /// Bracket nesting (`(`, `[`, `{`), shared between plain source and the
    /// expression parts of f-strings: an open bracket inside an f-string
    /// field is indistinguishable from one anywhere else.
    parens: Vec<char>,
    indents: Vec<u32>,
    fstrings: Vec<FStringCtx>,
    pending: VecDeque<Spanned>,
    /// True at the start of a fresh logical line, i.e. right after a
    /// `Newline`/`Indent`/`Dedent` or at the very start of input. Gates the
    /// indentation algorithm and tells EOF handling whether a closing
    /// `Newline` still needs to be synthesized.
    at_line_start: bool,
    comments: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, comments: bool) -> Self {
        let mut cursor = Cursor::new(source);
        if cursor.first() == '\u{feff}' {
            cursor.bump();
        }
        Lexer {
            source,
            cursor,
            parens: Vec::new(),
            indents: vec![0],
            fstrings: Vec::new(),
            pending: VecDeque::new(),
            at_line_start: true,
            comments,
            done: false,
        }
    }

    /// The full source text being lexed, used by the parser to slice out
    /// the raw text of a self-documenting f-string field (`{expr=}`) rather
    /// than reconstructing it from the AST.
    pub fn source(&self) -> &'a str {
        self.source
    }

    fn next_token(&mut self) -> Result<Option<Spanned>, LexicalError> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Ok(Some(tok));
            }
            if self.done {
                return Ok(None);
            }
            if let Some(tok) = self.step()? {
                return Ok(Some(tok));
            }
        }
    }

    /// Does one unit of lexing work: either produces a token, consumes input
    /// silently (whitespace, line continuation, an un-nested newline), or
    /// pushes one or more tokens onto `pending` (indent/dedent bursts, EOF
    /// finalization) and returns `None` so the caller loops back around.
    fn step(&mut self) -> Result<Option<Spanned>, LexicalError> {
        if let Some(ctx) = self.fstrings.last() {
            if !matches!(ctx.state, FState::Expr) {
                return self.lex_fstring_chunk();
            }
        }

        if self.cursor.is_eof() {
            self.handle_eof();
            return Ok(None);
        }

        if self.at_line_start && self.parens.is_empty() && self.fstrings.is_empty() {
            self.handle_indentation()?;
            return Ok(None);
        }

        if let Some(idx) = self.fstrings.len().checked_sub(1) {
            if matches!(self.fstrings[idx].state, FState::Expr) {
                let base = self.fstrings[idx].fields.last().map_or(0, |&(b, _)| b);
                if self.parens.len() == base {
                    let start = self.cursor.offset();
                    match self.cursor.first() {
                        ':' => {
                            self.cursor.bump();
                            self.fstrings[idx].state = FState::FormatSpec;
                            let end = self.cursor.offset();
                            return Ok(Some((Tok::Colon, TextRange::new(start, end))));
                        }
                        '}' => {
                            self.cursor.bump();
                            let (_, return_state) = self.fstrings[idx]
                                .fields
                                .pop()
                                .expect("field stack non-empty while in Expr state");
                            self.fstrings[idx].state = return_state;
                            let end = self.cursor.offset();
                            return Ok(Some((Tok::Rbrace, TextRange::new(start, end))));
                        }
                        _ => {}
                    }
                }
            }
        }

        if matches!(self.cursor.first(), ' ' | '\t' | '\x0c') {
            self.cursor.bump();
            return Ok(None);
        }

        if self.cursor.first() == '\\' {
            return self.handle_line_continuation();
        }

        if matches!(self.cursor.first(), '\n' | '\r') {
            let start = self.cursor.offset();
            if self.cursor.first() == '\r' {
                self.cursor.bump();
                self.cursor.eat_char('\n');
            } else {
                self.cursor.bump();
            }
            let end = self.cursor.offset();
            if self.parens.is_empty() {
                self.at_line_start = true;
                return Ok(Some((Tok::Newline, TextRange::new(start, end))));
            }
            return Ok(None);
        }

        if self.cursor.first() == '#' {
            let (text, range) = self.scan_comment();
            if self.comments {
                return Ok(Some((Tok::Comment(text), range)));
            }
            return Ok(None);
        }

        let start = self.cursor.offset();
        let c = self.cursor.first();

        if c == '_' || unicode_ident::is_xid_start(c) {
            return self.scan_name_or_string(start).map(Some);
        }

        if c.is_ascii_digit() || (c == '.' && self.cursor.second().is_ascii_digit()) {
            return self.scan_number(start).map(Some);
        }

        if matches!(c, '\'' | '"') {
            return self.scan_string(start, "").map(Some);
        }

        self.scan_operator(start).map(Some)
    }

    fn handle_line_continuation(&mut self) -> Result<Option<Spanned>, LexicalError> {
        let start = self.cursor.offset();
        match self.cursor.second() {
            '\n' => {
                self.cursor.bump();
                self.cursor.bump();
                Ok(None)
            }
            '\r' => {
                self.cursor.bump();
                self.cursor.bump();
                self.cursor.eat_char('\n');
                Ok(None)
            }
            _ => Err(LexicalError {
                error: LexicalErrorType::LineContinuationError,
                location: TextRange::empty(start),
            }),
        }
    }

    fn handle_eof(&mut self) {
        while self.indents.len() > 1 {
            self.indents.pop();
            self.pending
                .push_back((Tok::Dedent, TextRange::empty(self.cursor.offset())));
        }
        if !self.at_line_start {
            self.pending
                .push_back((Tok::Newline, TextRange::empty(self.cursor.offset())));
            self.at_line_start = true;
        }
        self.pending
            .push_back((Tok::EndOfFile, TextRange::empty(self.cursor.offset())));
        self.done = true;
    }

    /// Measures and reacts to the indentation of a fresh logical line,
    /// skipping any number of blank or comment-only physical lines first
    /// (§4.1: these never affect the indent stack and never produce a
    /// `Newline`). Pushes `Indent`/`Dedent`/`Comment` tokens to `pending`.
    fn handle_indentation(&mut self) -> Result<(), LexicalError> {
        loop {
            let mut col = 0u32;
            loop {
                match self.cursor.first() {
                    ' ' => {
                        col += 1;
                        self.cursor.bump();
                    }
                    '\t' => {
                        col = (col / 8 + 1) * 8;
                        self.cursor.bump();
                    }
                    '\x0c' => {
                        col = 0;
                        self.cursor.bump();
                    }
                    _ => break,
                }
            }

            if self.cursor.is_eof() {
                return Ok(());
            }

            match self.cursor.first() {
                '\n' => {
                    self.cursor.bump();
                    continue;
                }
                '\r' => {
                    self.cursor.bump();
                    self.cursor.eat_char('\n');
                    continue;
                }
                '#' => {
                    let (text, range) = self.scan_comment();
                    if self.comments {
                        self.pending.push_back((Tok::Comment(text), range));
                    }
                    if self.cursor.first() == '\r' {
                        self.cursor.bump();
                        self.cursor.eat_char('\n');
                    } else if self.cursor.first() == '\n' {
                        self.cursor.bump();
                    }
                    continue;
                }
                _ => {}
            }

            let top = *self.indents.last().expect("indent stack never empty");
            if col > top {
                self.indents.push(col);
                self.pending
                    .push_back((Tok::Indent, TextRange::empty(self.cursor.offset())));
            } else if col < top {
                while *self.indents.last().expect("indent stack never empty") > col {
                    self.indents.pop();
                    self.pending
                        .push_back((Tok::Dedent, TextRange::empty(self.cursor.offset())));
                }
                if *self.indents.last().expect("indent stack never empty") != col {
                    return Err(LexicalError {
                        error: LexicalErrorType::IndentationError,
                        location: TextRange::empty(self.cursor.offset()),
                    });
                }
            }
            self.at_line_start = false;
            return Ok(());
        }
    }

    fn scan_comment(&mut self) -> (String, TextRange) {
        let start = self.cursor.offset();
        let mut text = String::new();
        text.push(self.cursor.bump().expect("caller checked '#' present"));
        while !matches!(self.cursor.first(), '\n' | '\r') && !self.cursor.is_eof() {
            text.push(self.cursor.bump().expect("not eof"));
        }
        (text, TextRange::new(start, self.cursor.offset()))
    }

    fn scan_name_or_string(&mut self, start: TextSize) -> Result<Spanned, LexicalError> {
        let mut text = String::new();
        text.push(self.cursor.bump().expect("caller checked xid_start"));
        while is_ident_continue(self.cursor.first()) {
            text.push(self.cursor.bump().expect("checked by predicate"));
        }

        if matches!(self.cursor.first(), '\'' | '"') && is_valid_string_prefix(&text) {
            return self.scan_string(start, &text);
        }

        let normalized = normalize_identifier(&text);
        if let Some(tok) = Tok::from_keyword(&normalized) {
            return Ok((tok, TextRange::new(start, self.cursor.offset())));
        }
        Ok((
            Tok::Name { name: normalized },
            TextRange::new(start, self.cursor.offset()),
        ))
    }

    fn scan_number(&mut self, start: TextSize) -> Result<Spanned, LexicalError> {
        if self.cursor.first() == '0' && matches!(self.cursor.second(), 'x' | 'X' | 'o' | 'O' | 'b' | 'B') {
            self.cursor.bump();
            let marker = self.cursor.bump().expect("checked by outer condition");
            let radix = match marker.to_ascii_lowercase() {
                'x' => 16,
                'o' => 8,
                'b' => 2,
                _ => unreachable!("matched above"),
            };
            let digits_start = self.cursor.offset();
            self.cursor.eat_while(|c| c.is_digit(radix) || c == '_');
            let digits = self.slice(digits_start, self.cursor.offset());
            validate_underscore_placement(digits).map_err(|error| LexicalError {
                error,
                location: TextRange::new(start, self.cursor.offset()),
            })?;
            let value = numeric::parse_radix_int(digits, radix).map_err(|error| LexicalError {
                error,
                location: TextRange::new(start, self.cursor.offset()),
            })?;
            let end = self.cursor.offset();
            return Ok((Tok::Int { value }, TextRange::new(start, end)));
        }

        let mut is_float = false;
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

        if self.cursor.first() == '.' && self.cursor.second() != '.' {
            is_float = true;
            self.cursor.bump();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }

        if matches!(self.cursor.first(), 'e' | 'E')
            && (self.cursor.second().is_ascii_digit()
                || (matches!(self.cursor.second(), '+' | '-') && self.cursor.third().is_ascii_digit()))
        {
            is_float = true;
            self.cursor.bump();
            if matches!(self.cursor.first(), '+' | '-') {
                self.cursor.bump();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }

        let digits_end = self.cursor.offset();
        validate_underscore_placement(self.slice(start, digits_end)).map_err(|error| LexicalError {
            error,
            location: TextRange::new(start, digits_end),
        })?;

        let is_imaginary = matches!(self.cursor.first(), 'j' | 'J');
        if is_imaginary {
            self.cursor.bump();
        }

        let digits = self.slice(start, digits_end);
        let end = self.cursor.offset();
        let range = TextRange::new(start, end);

        if is_imaginary {
            let imag = numeric::parse_float(digits).map_err(|error| LexicalError { error, location: range })?;
            return Ok((Tok::Complex { real: 0.0, imag }, range));
        }
        if is_float {
            let value = numeric::parse_float(digits).map_err(|error| LexicalError { error, location: range })?;
            return Ok((Tok::Float { value }, range));
        }
        let value = numeric::parse_decimal_int(digits).map_err(|error| LexicalError { error, location: range })?;
        Ok((Tok::Int { value }, range))
    }

    /// Slices the original source text by byte offsets. Kept separate from
    /// `Cursor`, which only exposes the remaining tail, not the consumed
    /// prefix.
    fn slice(&self, start: TextSize, end: TextSize) -> &'a str {
        &self.source[usize::from(start)..usize::from(end)]
    }

    fn scan_string(&mut self, start: TextSize, prefix: &str) -> Result<Spanned, LexicalError> {
        let lower = prefix.to_ascii_lowercase();
        let is_raw = lower.contains('r');
        let is_bytes = lower.contains('b');
        let is_fstring = lower.contains('f');

        let quote = self.cursor.first();
        self.cursor.bump();
        let triple = self.cursor.first() == quote && self.cursor.second() == quote;
        if triple {
            self.cursor.bump();
            self.cursor.bump();
        }

        if is_fstring {
            let kind = if is_raw { StringKind::RawString } else { StringKind::String };
            self.fstrings.push(FStringCtx {
                quote,
                triple,
                raw: is_raw,
                state: FState::Literal,
                fields: Vec::new(),
            });
            let end = self.cursor.offset();
            return Ok((Tok::FStringStart { kind }, TextRange::new(start, end)));
        }

        let mut raw_text = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(LexicalError {
                    error: if triple {
                        LexicalErrorType::UnterminatedTripleQuotedString
                    } else {
                        LexicalErrorType::UnterminatedString
                    },
                    location: TextRange::new(start, self.cursor.offset()),
                });
            }
            let c = self.cursor.first();

            if !triple && matches!(c, '\n' | '\r') {
                return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedString,
                    location: TextRange::new(start, self.cursor.offset()),
                });
            }

            if c == quote {
                if triple {
                    if self.cursor.second() == quote && self.cursor.third() == quote {
                        self.cursor.bump();
                        self.cursor.bump();
                        self.cursor.bump();
                        break;
                    }
                    raw_text.push(self.cursor.bump().expect("checked c == quote"));
                    continue;
                }
                self.cursor.bump();
                break;
            }

            if c == '\\' {
                raw_text.push(self.cursor.bump().expect("checked c == backslash"));
                if let Some(next) = self.cursor.bump() {
                    raw_text.push(next);
                }
                continue;
            }

            raw_text.push(self.cursor.bump().expect("not eof"));
        }

        if is_bytes && !raw_text.is_ascii() {
            return Err(LexicalError {
                error: LexicalErrorType::InvalidByteLiteral,
                location: TextRange::new(start, self.cursor.offset()),
            });
        }

        let value = if is_raw {
            raw_text
        } else {
            string::decode_escapes(&raw_text, is_bytes).map_err(|error| LexicalError {
                error,
                location: TextRange::new(start, self.cursor.offset()),
            })?
        };

        let kind = match (is_bytes, is_raw, lower.contains('u')) {
            (true, true, _) => StringKind::RawBytes,
            (true, false, _) => StringKind::Bytes,
            (false, true, _) => StringKind::RawString,
            (false, false, true) => StringKind::Unicode,
            (false, false, false) => StringKind::String,
        };
        let end = self.cursor.offset();
        Ok((
            Tok::String { value, kind, triple_quoted: triple },
            TextRange::new(start, end),
        ))
    }

    /// Scans one chunk of an f-string's `Literal`/`FormatSpec` text: either a
    /// run of literal characters (returned as `FStringMiddle`), a transition
    /// into a nested field (mutates state, returns `None`), or the closing
    /// quote (`FStringEnd`, popping the f-string context).
    fn lex_fstring_chunk(&mut self) -> Result<Option<Spanned>, LexicalError> {
        let idx = self.fstrings.len() - 1;
        let start = self.cursor.offset();
        let (quote, triple, raw, in_format_spec) = {
            let ctx = &self.fstrings[idx];
            (ctx.quote, ctx.triple, ctx.raw, matches!(ctx.state, FState::FormatSpec))
        };

        let mut raw_text = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedFString,
                    location: TextRange::new(start, self.cursor.offset()),
                });
            }
            let c = self.cursor.first();

            if !in_format_spec && !triple && matches!(c, '\n' | '\r') {
                return Err(LexicalError {
                    error: LexicalErrorType::UnterminatedFString,
                    location: TextRange::new(start, self.cursor.offset()),
                });
            }

            if !in_format_spec && c == quote {
                if triple {
                    if self.cursor.second() == quote && self.cursor.third() == quote {
                        if !raw_text.is_empty() {
                            let value = self.finish_fstring_middle(raw_text, raw)?;
                            return Ok(Some((Tok::FStringMiddle { value }, TextRange::new(start, self.cursor.offset()))));
                        }
                        self.cursor.bump();
                        self.cursor.bump();
                        self.cursor.bump();
                        self.fstrings.pop();
                        return Ok(Some((Tok::FStringEnd, TextRange::new(start, self.cursor.offset()))));
                    }
                    raw_text.push(self.cursor.bump().expect("checked c == quote"));
                    continue;
                }
                if !raw_text.is_empty() {
                    let value = self.finish_fstring_middle(raw_text, raw)?;
                    return Ok(Some((Tok::FStringMiddle { value }, TextRange::new(start, self.cursor.offset()))));
                }
                self.cursor.bump();
                self.fstrings.pop();
                return Ok(Some((Tok::FStringEnd, TextRange::new(start, self.cursor.offset()))));
            }

            if c == '{' && self.cursor.second() == '{' {
                raw_text.push('{');
                self.cursor.bump();
                self.cursor.bump();
                continue;
            }
            if c == '}' && self.cursor.second() == '}' {
                raw_text.push('}');
                self.cursor.bump();
                self.cursor.bump();
                continue;
            }

            if c == '{' {
                if !raw_text.is_empty() {
                    let value = self.finish_fstring_middle(raw_text, raw)?;
                    return Ok(Some((Tok::FStringMiddle { value }, TextRange::new(start, self.cursor.offset()))));
                }
                self.cursor.bump();
                let base = self.parens.len();
                let ctx = &mut self.fstrings[idx];
                let return_state = ctx.state;
                ctx.fields.push((base, return_state));
                ctx.state = FState::Expr;
                return Ok(None);
            }

            // A lone '}' with no matching field is a lexical error; one with
            // a matching field is intercepted before reaching this function
            // (the `Expr`-state handling in `step`), so any '}' seen here is
            // unmatched.
            if c == '}' {
                return Err(LexicalError {
                    error: LexicalErrorType::FStringError(crate::error::FStringErrorType::UnopenedRbrace),
                    location: TextRange::new(start, self.cursor.offset()),
                });
            }

            raw_text.push(self.cursor.bump().expect("not eof"));
        }
    }

    fn finish_fstring_middle(&self, raw_text: String, raw: bool) -> Result<String, LexicalError> {
        if raw {
            Ok(raw_text)
        } else {
            string::decode_escapes(&raw_text, false).map_err(|error| LexicalError {
                error,
                location: TextRange::empty(self.cursor.offset()),
            })
        }
    }

    fn scan_operator(&mut self, start: TextSize) -> Result<Spanned, LexicalError> {
        let c = self.cursor.bump().expect("caller checked not eof");
        let tok = match c {
            '(' => {
                self.parens.push('(');
                Tok::Lpar
            }
            ')' => {
                self.pop_paren('(', ')', start)?;
                Tok::Rpar
            }
            '[' => {
                self.parens.push('[');
                Tok::Lsqb
            }
            ']' => {
                self.pop_paren('[', ']', start)?;
                Tok::Rsqb
            }
            '{' => {
                self.parens.push('{');
                Tok::Lbrace
            }
            '}' => {
                self.pop_paren('{', '}', start)?;
                Tok::Rbrace
            }
            ',' => Tok::Comma,
            ';' => Tok::Semi,
            '~' => Tok::Tilde,
            ':' => {
                if self.cursor.eat_char('=') {
                    Tok::ColonEqual
                } else {
                    Tok::Colon
                }
            }
            '.' => {
                if self.cursor.first() == '.' && self.cursor.second() == '.' {
                    self.cursor.bump();
                    self.cursor.bump();
                    Tok::Ellipsis
                } else {
                    Tok::Dot
                }
            }
            '+' => {
                if self.cursor.eat_char('=') {
                    Tok::PlusEqual
                } else {
                    Tok::Plus
                }
            }
            '-' => {
                if self.cursor.eat_char('>') {
                    Tok::Rarrow
                } else if self.cursor.eat_char('=') {
                    Tok::MinusEqual
                } else {
                    Tok::Minus
                }
            }
            '*' => {
                if self.cursor.eat_char('*') {
                    if self.cursor.eat_char('=') {
                        Tok::DoubleStarEqual
                    } else {
                        Tok::DoubleStar
                    }
                } else if self.cursor.eat_char('=') {
                    Tok::StarEqual
                } else {
                    Tok::Star
                }
            }
            '/' => {
                if self.cursor.eat_char('/') {
                    if self.cursor.eat_char('=') {
                        Tok::DoubleSlashEqual
                    } else {
                        Tok::DoubleSlash
                    }
                } else if self.cursor.eat_char('=') {
                    Tok::SlashEqual
                } else {
                    Tok::Slash
                }
            }
            '%' => {
                if self.cursor.eat_char('=') {
                    Tok::PercentEqual
                } else {
                    Tok::Percent
                }
            }
            '@' => {
                if self.cursor.eat_char('=') {
                    Tok::AtEqual
                } else {
                    Tok::At
                }
            }
            '&' => {
                if self.cursor.eat_char('=') {
                    Tok::AmperEqual
                } else {
                    Tok::Amper
                }
            }
            '|' => {
                if self.cursor.eat_char('=') {
                    Tok::VbarEqual
                } else {
                    Tok::Vbar
                }
            }
            '^' => {
                if self.cursor.eat_char('=') {
                    Tok::CircumflexEqual
                } else {
                    Tok::CircumFlex
                }
            }
            '<' => {
                if self.cursor.eat_char('<') {
                    if self.cursor.eat_char('=') {
                        Tok::LeftShiftEqual
                    } else {
                        Tok::LeftShift
                    }
                } else if self.cursor.eat_char('=') {
                    Tok::LessEqual
                } else {
                    Tok::Less
                }
            }
            '>' => {
                if self.cursor.eat_char('>') {
                    if self.cursor.eat_char('=') {
                        Tok::RightShiftEqual
                    } else {
                        Tok::RightShift
                    }
                } else if self.cursor.eat_char('=') {
                    Tok::GreaterEqual
                } else {
                    Tok::Greater
                }
            }
            '=' => {
                if self.cursor.eat_char('=') {
                    Tok::EqEqual
                } else {
                    Tok::Equal
                }
            }
            '!' => {
                if self.cursor.eat_char('=') {
                    Tok::NotEqual
                } else {
                    Tok::Exclamation
                }
            }
            other => {
                return Err(LexicalError {
                    error: LexicalErrorType::UnrecognizedToken { tok: other },
                    location: TextRange::new(start, self.cursor.offset()),
                })
            }
        };
        Ok((tok, TextRange::new(start, self.cursor.offset())))
    }

    fn pop_paren(&mut self, open: char, close: char, start: TextSize) -> Result<(), LexicalError> {
        match self.parens.pop() {
            Some(o) if o == open => Ok(()),
            _ => Err(LexicalError {
                error: LexicalErrorType::OtherError(format!("unmatched {close:?}")),
                location: TextRange::new(start, self.cursor.offset()),
            }),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult;

    fn next(&mut self) -> Option<LexResult> {
        match self.next_token() {
            Ok(Some(tok)) => Some(Ok(tok)),
            Ok(None) => None,
            Err(err) => {
                self.pending.clear();
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_continue(c)
}

fn is_valid_string_prefix(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "r" | "b" | "u" | "f" | "rb" | "br" | "rf" | "fr"
    )
}

/// NFKC-normalizes an identifier (§4.1: "identifiers are normalized to NFKC
/// the way CPython's tokenizer does"), skipping the allocation when the text
/// is already normalized.
fn normalize_identifier(text: &str) -> String {
    use unicode_normalization::{is_nfkc_quick, IsNormalized, UnicodeNormalization};

    if is_nfkc_quick(text.chars()) == IsNormalized::Yes {
        text.to_string()
    } else {
        text.nfkc().collect()
    }
}

fn validate_underscore_placement(s: &str) -> Result<(), LexicalErrorType> {
    let chars: Vec<char> = s.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch != '_' {
            continue;
        }
        let prev_ok = i > 0 && chars[i - 1].is_ascii_alphanumeric();
        let next_ok = chars.get(i + 1).is_some_and(|c| c.is_ascii_alphanumeric());
        if !prev_ok || !next_ok {
            return Err(LexicalErrorType::OtherError(format!(
                "invalid underscore placement in {s:?}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Tok> {
        Lexer::new(source, false)
            .map(|r| r.unwrap().0)
            .collect()
    }

    #[test]
    fn simple_assignment() {
        assert_eq!(
            tokens("x = 1\n"),
            vec![
                Tok::Name { name: "x".into() },
                Tok::Equal,
                Tok::Int { value: 1.into() },
                Tok::Newline,
                Tok::EndOfFile,
            ]
        );
    }

    #[test]
    fn indent_and_dedent() {
        let toks = tokens("if x:\n    pass\ny = 2\n");
        assert_eq!(
            toks,
            vec![
                Tok::If,
                Tok::Name { name: "x".into() },
                Tok::Colon,
                Tok::Newline,
                Tok::Indent,
                Tok::Pass,
                Tok::Newline,
                Tok::Dedent,
                Tok::Name { name: "y".into() },
                Tok::Equal,
                Tok::Int { value: 2.into() },
                Tok::Newline,
                Tok::EndOfFile,
            ]
        );
    }

    #[test]
    fn implicit_line_joining_inside_brackets() {
        let toks = tokens("x = (\n    1,\n    2,\n)\n");
        assert!(!toks.contains(&Tok::Indent));
        assert_eq!(toks.iter().filter(|t| matches!(t, Tok::Newline)).count(), 1);
    }

    #[test]
    fn backslash_continuation_joins_lines() {
        let toks = tokens("x = 1 + \\\n    2\n");
        assert_eq!(toks.iter().filter(|t| matches!(t, Tok::Newline)).count(), 1);
    }

    #[test]
    fn no_trailing_newline_still_synthesizes_one() {
        let toks = tokens("x = 1");
        assert_eq!(toks.last(), Some(&Tok::EndOfFile));
        assert!(toks.contains(&Tok::Newline));
    }

    #[test]
    fn fstring_splits_into_start_middle_expr_end() {
        let toks = tokens("f'hello {name}'");
        assert_eq!(
            toks,
            vec![
                Tok::FStringStart { kind: StringKind::String },
                Tok::FStringMiddle { value: "hello ".into() },
                Tok::Lbrace,
                Tok::Name { name: "name".into() },
                Tok::Rbrace,
                Tok::FStringEnd,
                Tok::Newline,
                Tok::EndOfFile,
            ]
        );
    }

    #[test]
    fn fstring_format_spec_is_scanned_as_literal_text() {
        let toks = tokens("f'{x:>10}'");
        assert_eq!(
            toks,
            vec![
                Tok::FStringStart { kind: StringKind::String },
                Tok::Lbrace,
                Tok::Name { name: "x".into() },
                Tok::Colon,
                Tok::FStringMiddle { value: ">10".into() },
                Tok::Rbrace,
                Tok::FStringEnd,
                Tok::Newline,
                Tok::EndOfFile,
            ]
        );
    }

    #[test]
    fn fstring_conversion_flag_is_exclamation_token() {
        let toks = tokens("f'{x!r}'");
        assert_eq!(
            toks,
            vec![
                Tok::FStringStart { kind: StringKind::String },
                Tok::Lbrace,
                Tok::Name { name: "x".into() },
                Tok::Exclamation,
                Tok::Name { name: "r".into() },
                Tok::Rbrace,
                Tok::FStringEnd,
                Tok::Newline,
                Tok::EndOfFile,
            ]
        );
    }

    #[test]
    fn nested_brackets_inside_fstring_field_do_not_confuse_field_close() {
        let toks = tokens("f'{ [1, 2][0] }'");
        assert!(toks.contains(&Tok::Lsqb));
        assert_eq!(toks.iter().filter(|t| matches!(t, Tok::Rbrace)).count(), 1);
    }

    #[test]
    fn number_literals() {
        assert_eq!(tokens("0x1F"), vec![Tok::Int { value: 31.into() }, Tok::Newline, Tok::EndOfFile]);
        assert_eq!(
            tokens("1_000.5"),
            vec![Tok::Float { value: 1000.5 }, Tok::Newline, Tok::EndOfFile]
        );
    }

    #[test]
    fn triple_quoted_string_spans_lines() {
        let toks = tokens("x = '''a\nb'''\n");
        assert!(matches!(&toks[2], Tok::String { value, triple_quoted: true, .. } if value == "a\nb"));
    }
}
