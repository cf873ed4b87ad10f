//! The public facade (§6 "External Interfaces"): the surface an external
//! user depends on. Everything else in this workspace is an implementation
//! detail this crate composes — the lexer/parser live in
//! `pyast_python_parser`, the unparser in `pyast_python_codegen`, the node
//! shapes and reflection machinery in `pyast_python_ast`.
//!
//! `parse`/`parse_python`/`parse_module` are three names for the same
//! entry point (§6 lists them as aliases); `unparse`/`to_source` likewise.
//! `walk`, `iter_child_nodes`, `iter_fields`, `get_docstring`,
//! `get_source_segment`, `is_ast_node`, `literal_eval`, and `dump` round
//! out the rest of §6.

pub mod dump;
pub mod literal_eval;
pub mod source_segment;

pub use pyast_python_ast as ast;
pub use pyast_python_ast::{
    child_nodes, fields, AnyNodeRef, Expr, FieldValue, Mod, ModExpression, ModInteractive, ModModule, Ranged, Stmt,
};
pub use pyast_python_codegen::{InvalidAstError, UnparseOptions};
pub use pyast_python_parser::{
    Error, LexicalError, LexicalErrorType, ParseError, ParseErrorType, ResourceError,
};

pub use dump::{dump, DumpOptions, Indent};
pub use literal_eval::{literal_eval, literal_eval_source, LiteralEvalSourceError, LiteralValue, ValueError};
pub use source_segment::get_source_segment;

use pyast_python_ast::Constant;

/// §6 `parse` options: `{ filename, comments, feature_version }` plus the
/// §5 "Cancellation" token ceiling, which the original interface folds
/// into the same options bag rather than a second parameter.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub filename: String,
    /// Whether a raw token stream (not `parse` itself, which has no
    /// comment-bearing node to attach a `COMMENT` token to) should keep
    /// comment tokens. Carried here for parity with §4.1's lexer option,
    /// but `parse`/`parse_module` never return `COMMENT` tokens to a
    /// caller, so this only matters to code calling
    /// `pyast_python_parser::tokenize` directly.
    pub comments: bool,
    /// Accepted and ignored (§9 Open Question): the source material
    /// references a `feature_version` gate without defining its effect.
    pub feature_version: Option<u32>,
    /// §5 "Cancellation": aborts with `ResourceError` once the token count
    /// is exceeded. `None` (the default) is unlimited.
    pub max_tokens: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            filename: "<unknown>".to_string(),
            comments: false,
            feature_version: None,
            max_tokens: None,
        }
    }
}

/// §6 `parse(source, options?) → Module`, the primary entry point.
pub fn parse(source: &str, options: &ParseOptions) -> Result<ModModule, Error> {
    let _ = options.feature_version;
    let _ = options.comments;
    log::debug!(
        "parsing {} byte(s) as a module (filename={:?})",
        source.len(),
        options.filename
    );
    let result =
        pyast_python_parser::parse_module_with_options(source, &options.filename, options.max_tokens);
    if let Err(err) = &result {
        log::debug!("parse failed: {err}");
    }
    result
}

/// §6 `parsePython` — alias of `parse`.
pub fn parse_python(source: &str, options: &ParseOptions) -> Result<ModModule, Error> {
    parse(source, options)
}

/// §6 `parseModule(source, filename?) → Module` — legacy alias taking only
/// a filename, with every other option at its default.
pub fn parse_module(source: &str, filename: Option<&str>) -> Result<ModModule, Error> {
    let options = ParseOptions {
        filename: filename.unwrap_or("<unknown>").to_string(),
        ..ParseOptions::default()
    };
    parse(source, &options)
}

/// Parses `source` as a single expression (CPython's `mode="eval"`).
pub fn parse_expression(source: &str, options: &ParseOptions) -> Result<ModExpression, Error> {
    log::debug!("parsing {} byte(s) as an expression", source.len());
    pyast_python_parser::parse_expression(source, &options.filename, options.max_tokens)
}

/// Parses `source` as a single interactive statement (CPython's
/// `mode="single"`).
pub fn parse_interactive(source: &str, options: &ParseOptions) -> Result<ModInteractive, Error> {
    log::debug!("parsing {} byte(s) as an interactive statement", source.len());
    pyast_python_parser::parse_interactive(source, &options.filename, options.max_tokens)
}

/// §6 `unparse(node, options?) → string`. Rust's static typing means one
/// function per root type rather than a single dynamically-typed entry
/// point; `unparse`/`unparse_stmt`/`unparse_expr` together cover §3.2's
/// three kinds of unparsing target (see `DESIGN.md`).
pub fn unparse(module: &Mod, options: &UnparseOptions) -> Result<String, InvalidAstError> {
    pyast_python_codegen::unparse(module, options)
}

pub fn unparse_stmt(stmt: &Stmt, options: &UnparseOptions) -> Result<String, InvalidAstError> {
    pyast_python_codegen::unparse_stmt(stmt, options)
}

pub fn unparse_expr(expr: &Expr, options: &UnparseOptions) -> Result<String, InvalidAstError> {
    pyast_python_codegen::unparse_expr(expr, options)
}

/// §6 `toSource(node, indent?) → string` — alias of `unparse` with a
/// shorthand for the one knob most callers want to override.
pub fn to_source(module: &Mod, indent: Option<&str>) -> Result<String, InvalidAstError> {
    let mut options = UnparseOptions::default();
    if let Some(indent) = indent {
        options.indent = indent.to_string();
    }
    unparse(module, &options)
}

/// §6 `walk(node) → iterable of nodes` — lazy pre-order traversal.
pub struct Walk<'a> {
    stack: Vec<AnyNodeRef<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = AnyNodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children = child_nodes(node);
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

pub fn walk<'a>(node: impl Into<AnyNodeRef<'a>>) -> Walk<'a> {
    Walk {
        stack: vec![node.into()],
    }
}

/// §6 `iterChildNodes(node) → iterable of nodes` — immediate children only.
pub fn iter_child_nodes<'a>(node: impl Into<AnyNodeRef<'a>>) -> std::vec::IntoIter<AnyNodeRef<'a>> {
    child_nodes(node.into()).into_iter()
}

/// §6 `iterFields(node) → iterable of (name, value) pairs`.
pub fn iter_fields<'a>(
    node: impl Into<AnyNodeRef<'a>>,
) -> std::vec::IntoIter<(&'static str, FieldValue<'a>)> {
    fields(node.into()).into_iter()
}

/// §6 `getDocstring(node) → string | null` for Module/FunctionDef/ClassDef
/// (`AsyncFunctionDef` shares `StmtFunctionDef`'s shape, distinguished only
/// by `is_async`, so matching `StmtFunctionDef` covers both per §3.2).
pub fn get_docstring<'a>(node: impl Into<AnyNodeRef<'a>>) -> Option<&'a str> {
    let body: &'a [Stmt] = match node.into() {
        AnyNodeRef::ModModule(m) => &m.body,
        AnyNodeRef::StmtFunctionDef(f) => &f.body,
        AnyNodeRef::StmtClassDef(c) => &c.body,
        _ => return None,
    };
    match body.first()? {
        Stmt::Expr(expr_stmt) => match expr_stmt.value.as_ref() {
            Expr::Constant(constant) => match &constant.value {
                Constant::Str(s) => Some(s.as_str()),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

/// §6 `isASTNode(value) → bool`: a structural type guard. Rust's type
/// system already tells a node type from a non-node type at compile time
/// everywhere `AnyNodeRef` appears directly, so the only place this
/// predicate does real work is at the reflection boundary `iter_fields`
/// exposes: given one `FieldValue`, is the thing it carries itself a
/// §3.2 node (something worth recursing into with `walk`), or a leaf
/// attribute (an identifier, a constant, an operator tag)?
pub fn is_ast_node(value: &FieldValue<'_>) -> bool {
    matches!(
        value,
        FieldValue::Node(_) | FieldValue::NodeOpt(Some(_)) | FieldValue::Nodes(_) | FieldValue::OptionalNodes(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_module_roundtrips_through_unparse() {
        let module = parse_module("x = 1\ny = x + 1\n", None).expect("parses");
        let rendered = to_source(&Mod::Module(module), None).expect("unparses");
        assert_eq!(rendered, "x = 1\ny = x + 1");
    }

    #[test]
    fn parse_reports_syntax_error_location() {
        let err = parse("def f(:\n    pass\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn walk_visits_every_node_preorder() {
        let module = parse_module("x = 1 + 2\n", None).expect("parses");
        let kinds: Vec<&str> = walk(&Mod::Module(module)).map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec!["ModModule", "StmtAssign", "ExprName", "ExprBinOp", "ExprConstant", "ExprConstant"]
        );
    }

    #[test]
    fn iter_child_nodes_is_shallow() {
        let module = parse_module("x = 1 + 2\n", None).expect("parses");
        let Stmt::Assign(assign) = &module.body[0] else {
            panic!("expected Assign");
        };
        let children: Vec<_> = iter_child_nodes(assign.value.as_ref()).collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn get_docstring_finds_leading_string_expression() {
        let module = parse_module("\"\"\"hello\"\"\"\nx = 1\n", None).expect("parses");
        assert_eq!(get_docstring(&Mod::Module(module)), Some("hello"));
    }

    #[test]
    fn get_docstring_absent_when_first_statement_is_not_a_string() {
        let module = parse_module("x = 1\n", None).expect("parses");
        assert_eq!(get_docstring(&Mod::Module(module)), None);
    }

    #[test]
    fn is_ast_node_distinguishes_children_from_leaves() {
        let module = parse_module("x = 1\n", None).expect("parses");
        for (name, value) in iter_fields(&Mod::Module(module)) {
            if name == "body" {
                assert!(is_ast_node(&value));
            }
        }
    }
}
