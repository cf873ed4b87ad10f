//! `InvalidASTError` (§7): raised when the unparser is handed a structurally
//! ill-formed AST (mismatched `Compare` lengths, a `JoinedStr` value that
//! isn't a `Constant`/`FormattedValue`, ...). Unparsing is otherwise total.

use std::fmt;

use pyast_source_file::{LineIndex, SourceLocation};
use pyast_text_size::TextRange;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidAstError {
    pub message: String,
    pub location: Option<TextRange>,
}

impl InvalidAstError {
    pub fn new(message: impl Into<String>, location: TextRange) -> Self {
        InvalidAstError {
            message: message.into(),
            location: Some(location),
        }
    }

    /// Translates the byte-offset location into a (line, column) pair
    /// against the given source, for a host application that wants a
    /// human-readable diagnostic rather than a raw offset.
    pub fn source_location(&self, source: &str) -> Option<SourceLocation> {
        let range = self.location?;
        let index = LineIndex::from_source_text(source);
        Some(index.line_column(range.start(), source))
    }
}

impl fmt::Display for InvalidAstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(range) => write!(f, "invalid AST at byte offset {}: {}", range.start(), self.message),
            None => write!(f, "invalid AST: {}", self.message),
        }
    }
}

impl std::error::Error for InvalidAstError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_without_location() {
        let err = InvalidAstError {
            message: "Compare.ops and Compare.comparators must have equal length".into(),
            location: None,
        };
        assert_eq!(
            err.to_string(),
            "invalid AST: Compare.ops and Compare.comparators must have equal length"
        );
    }
}
