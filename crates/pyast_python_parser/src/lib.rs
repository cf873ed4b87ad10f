//! Indentation-sensitive lexer and recursive-descent parser (§4.1, §4.2).
//!
//! `tokenize` exposes the lexer on its own for callers that only want the
//! token stream; `parse_module`/`parse_expression`/`parse_interactive` are
//! the three entry points the top-level `pyast` crate builds `parse`,
//! `Expression`-mode parsing, and `Interactive`-mode parsing out of. Every
//! entry point takes an explicit `filename` (diagnostics only, §4.1) and an
//! optional token ceiling that turns into a `ResourceError` (§5
//! "Cancellation") rather than unbounded work.

pub mod cursor;
pub mod error;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod string;
pub mod token;
pub mod token_source;

pub use error::{Error, LexicalError, LexicalErrorType, ParseError, ParseErrorType, ResourceError};
pub use lexer::{LexResult, Lexer, Spanned};
pub use token::{StringKind, Tok};

use pyast_python_ast::{ModExpression, ModInteractive, ModModule};

use parser::Parser;

/// Parses `source` as a complete module with the default filename (`""`)
/// and no token ceiling. The convenience entry point used by this
/// workspace's own tests and by callers that don't need diagnostics or
/// §5's resource limit; `parse_module_with_options` exposes the rest.
pub use parser::parse_module;

/// Runs the lexer alone, discarding (or keeping, per `comments`) `Tok::Comment`.
///
/// Mirrors §4.1's `{ comments: bool }` lexer option directly; the parser
/// itself never asks for comments, since Python's statement grammar has no
/// comment-bearing node to attach them to.
pub fn tokenize(source: &str, comments: bool) -> Vec<LexResult> {
    Lexer::new(source, comments).collect()
}

/// Parses `source` as a complete module (§6 `parse`/`parsePython`), with an
/// explicit `filename` (diagnostics only) and token ceiling (`None` means
/// unlimited, §5 "Cancellation").
pub fn parse_module_with_options(
    source: &str,
    filename: &str,
    max_tokens: Option<usize>,
) -> Result<ModModule, Error> {
    Parser::new(source, filename.to_string(), max_tokens).parse_module()
}

/// Parses `source` as a single expression (CPython's `mode="eval"`).
pub fn parse_expression(
    source: &str,
    filename: &str,
    max_tokens: Option<usize>,
) -> Result<ModExpression, Error> {
    Parser::new(source, filename.to_string(), max_tokens).parse_expression_mode()
}

/// Parses `source` as a single interactive statement (CPython's
/// `mode="single"`); a trivial specialization of the module grammar (§1).
pub fn parse_interactive(
    source: &str,
    filename: &str,
    max_tokens: Option<usize>,
) -> Result<ModInteractive, Error> {
    Parser::new(source, filename.to_string(), max_tokens).parse_interactive()
}
