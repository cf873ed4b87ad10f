//! The `identifier` newtype and the sub-span lookups used by diagnostics.
//!
//! The parser stamps every `Identifier` with its own [`TextRange`] (not just
//! the range of the enclosing node), so tooling can point at exactly the
//! `name` token of a `def` rather than the whole statement.

use std::fmt;
use std::ops::Deref;

use pyast_text_size::{Ranged, TextRange};

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Identifier {
    id: String,
    range: TextRange,
}

impl Identifier {
    pub fn new(id: impl Into<String>, range: TextRange) -> Self {
        Identifier {
            id: id.into(),
            range,
        }
    }

    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }
}

impl Ranged for Identifier {
    fn range(&self) -> TextRange {
        self.range
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &str {
        &self.id
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:?})", self.id)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> String {
        identifier.id
    }
}

use crate::nodes::{Stmt, StmtClassDef, StmtFor, StmtFunctionDef, StmtIf, StmtTry, StmtTryStar, StmtWhile, StmtWith};

/// Locates the `else` keyword's span in a statement that may have one.
///
/// Grounded on the observation that the AST carries no span for the `else`
/// keyword itself (only for the `orelse` body); diagnostics that want to
/// underline `else` re-derive it from the last statement of the preceding
/// body and the first statement of `orelse`.
pub fn else_(stmt: &Stmt) -> Option<TextRange> {
    let (body, orelse) = match stmt {
        Stmt::If(StmtIf { body, orelse, .. }) => (body, orelse),
        Stmt::For(StmtFor { body, orelse, .. }) => (body, orelse),
        Stmt::While(StmtWhile { body, orelse, .. }) => (body, orelse),
        Stmt::Try(StmtTry { body, orelse, .. }) => (body, orelse),
        Stmt::TryStar(StmtTryStar { body, orelse, .. }) => (body, orelse),
        _ => return None,
    };

    if orelse.is_empty() {
        return None;
    }

    let last_body = body.last()?;
    let first_orelse = orelse.first()?;
    Some(TextRange::new(last_body.end(), first_orelse.start()))
}

/// Locates the `try`/`finally`/`except` structural keywords is intentionally
/// not attempted beyond `else_`: the rest of the keyword positions are
/// reconstructable the same way by tooling that needs them, and are not
/// exercised by this workspace's own unparser or facade.
pub fn class_or_function_name(stmt: &Stmt) -> Option<&str> {
    match stmt {
        Stmt::FunctionDef(StmtFunctionDef { name, .. }) => Some(name.as_str()),
        Stmt::ClassDef(StmtClassDef { name, .. }) => Some(name.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyast_python_parser::parse_module;

    #[test]
    fn else_keyword_span() {
        let parsed = parse_module("if x:\n    pass\nelse:\n    pass\n").unwrap();
        let Stmt::If(if_stmt) = &parsed.body[0] else {
            panic!("expected if statement")
        };
        let range = else_(&Stmt::If(if_stmt.clone())).expect("else branch present");
        assert!(range.start() < range.end());
    }
}
