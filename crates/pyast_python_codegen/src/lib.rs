//! The unparser (§4.3 "Unparser"): converts a parsed AST back to Python
//! source text. Grounded on `ruff_python_codegen`'s `Generator`/`Stylist`
//! split, simplified down to the single canonical style this crate's
//! `UnparseOptions` describes (no source-derived quote/indent inference;
//! see `DESIGN.md` for why).

pub mod error;
pub mod generator;

pub use error::InvalidAstError;
pub use generator::{Generator, UnparseOptions};

use pyast_python_ast::precedence::Precedence;
use pyast_python_ast::{Expr, Mod, Stmt};

/// Unparses a full module/expression/interactive-statement AST (§6
/// `unparse`/`toSource`).
pub fn unparse(module: &Mod, options: &UnparseOptions) -> Result<String, InvalidAstError> {
    let mut generator = Generator::new(options.clone());
    generator.unparse_mod(module)?;
    Ok(generator.into_string())
}

/// Unparses a single statement, e.g. for pretty-printing one node out of a
/// larger tree rather than a whole module.
pub fn unparse_stmt(stmt: &Stmt, options: &UnparseOptions) -> Result<String, InvalidAstError> {
    let mut generator = Generator::new(options.clone());
    generator.unparse_stmt(stmt)?;
    Ok(generator.into_string())
}

/// Unparses a single expression.
pub fn unparse_expr(expr: &Expr, options: &UnparseOptions) -> Result<String, InvalidAstError> {
    let mut generator = Generator::new(options.clone());
    generator.unparse_expr(expr, Precedence::LAMBDA)?;
    Ok(generator.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyast_python_parser::parse_module;

    fn roundtrip(source: &str) -> String {
        let module = parse_module(source).expect("source parses");
        unparse(&Mod::Module(module), &UnparseOptions::default()).expect("unparses")
    }

    #[test]
    fn unparses_simple_function() {
        let source = "def f(x, y=1):\n    return x + y\n";
        assert_eq!(roundtrip(source), "def f(x, y=1):\n    return x + y");
    }

    #[test]
    fn collapses_elif_chains() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n";
        assert_eq!(roundtrip(source), "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass");
    }

    #[test]
    fn preserves_binop_grouping_with_parens() {
        let source = "(a - b) - c";
        assert_eq!(roundtrip(source), "a - b - c");
        let source = "a - (b - c)";
        assert_eq!(roundtrip(source), "a - (b - c)");
    }

    #[test]
    fn preserves_pow_associativity() {
        assert_eq!(roundtrip("(-2) ** 2"), "(-2) ** 2");
        assert_eq!(roundtrip("-2 ** 2"), "-2 ** 2");
        assert_eq!(roundtrip("2 ** 3 ** 4"), "2 ** 3 ** 4");
        assert_eq!(roundtrip("(2 ** 3) ** 4"), "(2 ** 3) ** 4");
    }

    #[test]
    fn always_parenthesizes_tuples() {
        assert_eq!(roundtrip("x = 1, 2"), "x = (1, 2)");
        assert_eq!(roundtrip("x = (1,)"), "x = (1,)");
        assert_eq!(roundtrip("return a, b"), "return (a, b)");
    }

    #[test]
    fn multi_dim_subscript_has_no_extra_parens() {
        assert_eq!(roundtrip("a[i, j:k]"), "a[i, j:k]");
    }

    #[test]
    fn set_literal_empty_uses_constructor_call() {
        assert_eq!(roundtrip("set()"), "set()");
        assert_eq!(roundtrip("{1, 2}"), "{1, 2}");
    }

    #[test]
    fn fstring_roundtrips_replacement_fields() {
        assert_eq!(roundtrip(r#"f"hello {name!r:>{width}}""#), r#"f"hello {name!r:>{width}}""#);
    }

    #[test]
    fn fstring_self_documenting_field_survives_as_equivalent_form() {
        let source = r#"f"{x=}""#;
        let module = parse_module(source).expect("parses");
        let rendered = unparse(&Mod::Module(module.clone()), &UnparseOptions::default()).expect("unparses");
        let reparsed = parse_module(&rendered).expect("re-parses");
        assert_eq!(module, reparsed);
    }

    #[test]
    fn lambda_in_format_field_gets_parens() {
        assert_eq!(roundtrip(r#"f"{(lambda: 1)()}""#), r#"f"{(lambda: 1)()}""#);
    }

    #[test]
    fn string_with_newline_uses_triple_quotes() {
        assert_eq!(roundtrip("'a\\nb'"), "'''a\nb'''");
    }

    #[test]
    fn match_statement_renders_patterns() {
        let source = "match point:\n    case Point(x=0, y=0):\n        pass\n    case [x, *rest]:\n        pass\n    case _:\n        pass\n";
        let expected = "match point:\n    case Point(x=0, y=0):\n        pass\n    case [x, *rest]:\n        pass\n    case _:\n        pass";
        assert_eq!(roundtrip(source), expected);
    }

    #[test]
    fn empty_module_unparses_to_empty_string() {
        let module = parse_module("").expect("source parses");
        assert_eq!(module.body, Vec::new());
        assert_eq!(
            unparse(&Mod::Module(module), &UnparseOptions::default()).expect("unparses"),
            ""
        );
    }

    #[test]
    fn empty_suite_still_falls_back_to_pass() {
        assert_eq!(roundtrip("if a:\n    pass\n"), "if a:\n    pass");
    }

    #[test]
    fn rejects_malformed_compare() {
        use pyast_python_ast::{Constant, Expr, ExprCompare, ExprConstant, ExprName, ExprContext};
        use pyast_text_size::TextRange;

        let bad = Expr::Compare(ExprCompare {
            range: TextRange::default(),
            left: Box::new(Expr::Name(ExprName {
                range: TextRange::default(),
                id: pyast_python_ast::Identifier::new("a", TextRange::default()),
                ctx: ExprContext::Load,
            })),
            ops: vec![pyast_python_ast::CmpOp::Lt, pyast_python_ast::CmpOp::Lt],
            comparators: vec![Expr::Constant(ExprConstant {
                range: TextRange::default(),
                value: Constant::Int(1.into()),
                kind: None,
            })],
        });
        assert!(unparse_expr(&bad, &UnparseOptions::default()).is_err());
    }
}
