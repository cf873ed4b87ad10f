//! The error taxonomy (§7): `LexicalError` (raised by the lexer, folded
//! into `ParseError` by the time it reaches a caller), `ParseError`
//! (`SyntaxError`/`IndentationError`), and `ResourceError` (§5
//! "Cancellation").

use std::fmt;

use pyast_text_size::TextRange;

/// What went wrong while turning source text into tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexicalErrorType {
    StringError,
    UnterminatedString,
    UnterminatedFString,
    UnterminatedTripleQuotedString,
    InvalidByteLiteral,
    FStringError(FStringErrorType),
    UnrecognizedToken { tok: char },
    IndentationError,
    TabError,
    InconsistentUseOfTabsAndSpaces,
    DefaultArgumentError,
    DuplicateArgumentError(String),
    PositionalArgumentError,
    UnexpectedEof,
    NestingTooDeep,
    LineContinuationError,
    OtherError(String),
}

impl fmt::Display for LexicalErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalErrorType::StringError => write!(f, "invalid string literal"),
            LexicalErrorType::UnterminatedString => write!(f, "unterminated string literal"),
            LexicalErrorType::UnterminatedFString => write!(f, "unterminated f-string literal"),
            LexicalErrorType::UnterminatedTripleQuotedString => {
                write!(f, "unterminated triple-quoted string literal")
            }
            LexicalErrorType::InvalidByteLiteral => {
                write!(f, "bytes can only contain ASCII literal characters")
            }
            LexicalErrorType::FStringError(err) => write!(f, "f-string: {err}"),
            LexicalErrorType::UnrecognizedToken { tok } => {
                write!(f, "invalid character {tok:?}")
            }
            LexicalErrorType::IndentationError => {
                write!(f, "unindent does not match any outer indentation level")
            }
            LexicalErrorType::TabError => write!(f, "inconsistent use of tabs and spaces"),
            LexicalErrorType::InconsistentUseOfTabsAndSpaces => {
                write!(f, "inconsistent use of tabs and spaces in indentation")
            }
            LexicalErrorType::DefaultArgumentError => {
                write!(f, "non-default argument follows default argument")
            }
            LexicalErrorType::DuplicateArgumentError(name) => {
                write!(f, "duplicate argument {name:?} in function definition")
            }
            LexicalErrorType::PositionalArgumentError => {
                write!(f, "positional argument follows keyword argument")
            }
            LexicalErrorType::UnexpectedEof => write!(f, "unexpected end of file"),
            LexicalErrorType::NestingTooDeep => write!(f, "brackets nested too deeply"),
            LexicalErrorType::LineContinuationError => {
                write!(f, "unexpected character after line continuation character")
            }
            LexicalErrorType::OtherError(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FStringErrorType {
    UnclosedLbrace,
    UnopenedRbrace,
    ExpressionNestedTooDeeply,
    ExpressionCannotInclude(char),
    EmptyExpression,
    InvalidConversionFlag,
    InvalidExpression,
    MismatchedDelimiter,
}

impl fmt::Display for FStringErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FStringErrorType::UnclosedLbrace => write!(f, "expecting '}}'"),
            FStringErrorType::UnopenedRbrace => write!(f, "single '}}' is not allowed"),
            FStringErrorType::ExpressionNestedTooDeeply => {
                write!(f, "expressions nested too deeply")
            }
            FStringErrorType::ExpressionCannotInclude(c) => {
                write!(f, "f-string expression cannot include {c:?}")
            }
            FStringErrorType::EmptyExpression => write!(f, "empty expression not allowed"),
            FStringErrorType::InvalidConversionFlag => write!(f, "invalid conversion character"),
            FStringErrorType::InvalidExpression => write!(f, "invalid expression"),
            FStringErrorType::MismatchedDelimiter => write!(f, "mismatched '(', '{{', or '['"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: TextRange,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte offset {}", self.error, self.location.start())
    }
}

impl std::error::Error for LexicalError {}

/// What the parser expected but did not find.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorType {
    /// Mirrors `LexicalErrorType`: the lexer fails mid-parse.
    Lexical(LexicalErrorType),
    /// An indentation-stack mismatch, reported as `IndentationError` per §7.
    IndentationError,
    /// Ran out of tokens before a construct was closed.
    Eof,
    /// Saw a token the current production does not accept.
    UnexpectedToken { found: String, expected: String },
    /// A target expression failed the legality check in §4.2 ("Targets").
    InvalidAssignmentTarget(String),
    /// A structural invariant from §3.2 was violated while building a node.
    InvalidSyntax(String),
}

impl fmt::Display for ParseErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorType::Lexical(err) => write!(f, "{err}"),
            ParseErrorType::IndentationError => write!(f, "unindent does not match any outer indentation level"),
            ParseErrorType::Eof => write!(f, "unexpected end of file"),
            ParseErrorType::UnexpectedToken { found, expected } => {
                write!(f, "invalid syntax: found {found}, expected {expected}")
            }
            ParseErrorType::InvalidAssignmentTarget(what) => {
                write!(f, "cannot assign to {what}")
            }
            ParseErrorType::InvalidSyntax(msg) => write!(f, "{msg}"),
        }
    }
}

/// `SyntaxError`/`IndentationError` (§7): carries `{message, filename,
/// lineno, col_offset}` via `location` plus the source `filename` the
/// caller supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub location: TextRange,
    pub filename: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, byte offset {})",
            self.error,
            self.filename,
            self.location.start()
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexicalError> for ParseError {
    fn from(err: LexicalError) -> Self {
        ParseError {
            location: err.location,
            error: if err.error == LexicalErrorType::IndentationError {
                ParseErrorType::IndentationError
            } else {
                ParseErrorType::Lexical(err.error)
            },
            filename: String::new(),
        }
    }
}

impl ParseError {
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }
}

/// Raised by the unparser when a structural invariant (§3.2) is violated on
/// an ill-formed AST handed to it by a caller (not produced by this crate's
/// own parser).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidAstError(pub String);

impl fmt::Display for InvalidAstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid AST: {}", self.0)
    }
}

impl std::error::Error for InvalidAstError {}

/// Parsing exceeded a configured resource limit (§5 "Cancellation").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceError {
    pub message: String,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ResourceError {}

/// The union of failures `parse` can return.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Parse(ParseError),
    Resource(ResourceError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "{err}"),
            Error::Resource(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<ResourceError> for Error {
    fn from(err: ResourceError) -> Self {
        Error::Resource(err)
    }
}
