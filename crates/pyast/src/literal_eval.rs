//! §6 `literalEval(source_or_node) → value`: a small recursive evaluator
//! over the restricted literal subset of the AST (§1 "Out of scope" names
//! this as the only contract owed to a future "literal eval" collaborator
//! — Constant, Tuple, List, Dict, Set, `UnaryOp` over a numeric Constant,
//! `BinOp` `+`/`-` forming a complex number, and `Name` restricted to
//! `True`/`False`/`None`).

use std::fmt;

use num_bigint::BigInt;
use pyast_python_ast::{AnyNodeRef, Constant, Expr, ModExpression, Operator, UnaryOp};

/// §7 `ValueError`: raised when `literal_eval` encounters a construct
/// outside the restricted subset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueError(pub String);

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed node or string: {}", self.0)
    }
}

impl std::error::Error for ValueError {}

fn malformed(what: &str) -> ValueError {
    ValueError(what.to_string())
}

/// The evaluated value. Unlike `Constant`, `Tuple`/`List`/`Dict`/`Set`
/// here hold *evaluated* children (themselves `LiteralValue`), not AST
/// nodes, since `literal_eval` is meant to hand a caller plain data.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    None,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Complex { real: f64, imag: f64 },
    Str(String),
    Bytes(Vec<u8>),
    Ellipsis,
    Tuple(Vec<LiteralValue>),
    List(Vec<LiteralValue>),
    Dict(Vec<(LiteralValue, LiteralValue)>),
    Set(Vec<LiteralValue>),
}

impl From<Constant> for LiteralValue {
    fn from(value: Constant) -> Self {
        match value {
            Constant::None => LiteralValue::None,
            Constant::Bool(b) => LiteralValue::Bool(b),
            Constant::Str(s) => LiteralValue::Str(s),
            Constant::Bytes(b) => LiteralValue::Bytes(b),
            Constant::Int(i) => LiteralValue::Int(i),
            Constant::Float(f) => LiteralValue::Float(f),
            Constant::Complex { real, imag } => LiteralValue::Complex { real, imag },
            Constant::Ellipsis => LiteralValue::Ellipsis,
            Constant::Tuple(items) => LiteralValue::Tuple(items.into_iter().map(LiteralValue::from).collect()),
        }
    }
}

/// §6 `literalEval` over an already-parsed expression node.
pub fn literal_eval(expr: &Expr) -> Result<LiteralValue, ValueError> {
    match expr {
        Expr::Constant(c) => Ok(LiteralValue::from(c.value.clone())),
        Expr::Tuple(t) => Ok(LiteralValue::Tuple(
            t.elts.iter().map(literal_eval).collect::<Result<_, _>>()?,
        )),
        Expr::List(l) => Ok(LiteralValue::List(
            l.elts.iter().map(literal_eval).collect::<Result<_, _>>()?,
        )),
        Expr::Set(s) => Ok(LiteralValue::Set(
            s.elts.iter().map(literal_eval).collect::<Result<_, _>>()?,
        )),
        Expr::Dict(d) => {
            let mut pairs = Vec::with_capacity(d.values.len());
            for (key, value) in d.keys.iter().zip(d.values.iter()) {
                let key = match key {
                    Some(key) => literal_eval(key)?,
                    None => return Err(malformed("dict unpacking (**) is not a literal")),
                };
                pairs.push((key, literal_eval(value)?));
            }
            Ok(LiteralValue::Dict(pairs))
        }
        Expr::UnaryOp(u) => eval_unary(u.op, literal_eval(&u.operand)?),
        Expr::BinOp(b) if matches!(b.op, Operator::Add | Operator::Sub) => {
            eval_complex_binop(b.op, literal_eval(&b.left)?, literal_eval(&b.right)?)
        }
        Expr::Name(n) => match n.id.as_str() {
            "True" => Ok(LiteralValue::Bool(true)),
            "False" => Ok(LiteralValue::Bool(false)),
            "None" => Ok(LiteralValue::None),
            other => Err(malformed(&format!("Name({other})"))),
        },
        other => Err(malformed(AnyNodeRef::from(other).kind())),
    }
}

/// §6 `literalEval` from raw source: parses `source` as a single
/// expression, then evaluates it. Exposed as a separate function, rather
/// than overloading `literal_eval`'s argument type the way a dynamically
/// typed host language would, since Rust has no runtime type dispatch on
/// a single parameter.
pub fn literal_eval_source(source: &str) -> Result<LiteralValue, LiteralEvalSourceError> {
    let module: ModExpression =
        pyast_python_parser::parse_expression(source, "<string>", None).map_err(LiteralEvalSourceError::Syntax)?;
    literal_eval(&module.body).map_err(LiteralEvalSourceError::Value)
}

#[derive(Clone, Debug)]
pub enum LiteralEvalSourceError {
    Syntax(pyast_python_parser::Error),
    Value(ValueError),
}

impl fmt::Display for LiteralEvalSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralEvalSourceError::Syntax(err) => write!(f, "{err}"),
            LiteralEvalSourceError::Value(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LiteralEvalSourceError {}

fn eval_unary(op: UnaryOp, operand: LiteralValue) -> Result<LiteralValue, ValueError> {
    match (op, operand) {
        (UnaryOp::USub, LiteralValue::Int(i)) => Ok(LiteralValue::Int(-i)),
        (UnaryOp::USub, LiteralValue::Float(f)) => Ok(LiteralValue::Float(-f)),
        (UnaryOp::USub, LiteralValue::Complex { real, imag }) => {
            Ok(LiteralValue::Complex { real: -real, imag: -imag })
        }
        (UnaryOp::USub, LiteralValue::Bool(b)) => Ok(LiteralValue::Int(BigInt::from(-i64::from(b)))),
        (UnaryOp::UAdd, value @ (LiteralValue::Int(_) | LiteralValue::Float(_) | LiteralValue::Complex { .. })) => {
            Ok(value)
        }
        (UnaryOp::UAdd, LiteralValue::Bool(b)) => Ok(LiteralValue::Int(BigInt::from(i64::from(b)))),
        (op, _) => Err(malformed(&format!("UnaryOp({})", op.as_str()))),
    }
}

/// The only `BinOp` shape `literal_eval` accepts: a real number combined
/// with an imaginary one by `+`/`-`, the two-token form CPython's grammar
/// uses to spell a complex literal (`1+2j`, `3-4j`). Rejects anything else
/// reachable through `+`/`-`, including plain `int + int` arithmetic —
/// `literal_eval` is not a calculator.
fn eval_complex_binop(op: Operator, left: LiteralValue, right: LiteralValue) -> Result<LiteralValue, ValueError> {
    let (lr, li) = as_complex_components(&left).ok_or_else(|| malformed("BinOp(non-numeric operand)"))?;
    let (rr, ri) = as_complex_components(&right).ok_or_else(|| malformed("BinOp(non-numeric operand)"))?;
    if (li != 0.0) == (ri != 0.0) {
        return Err(malformed("BinOp(not a complex-number literal)"));
    }
    let (real, imag) = match op {
        Operator::Add => (lr + rr, li + ri),
        Operator::Sub => (lr - rr, li - ri),
        _ => unreachable!("eval_complex_binop only called for Add/Sub"),
    };
    Ok(LiteralValue::Complex { real, imag })
}

fn as_complex_components(value: &LiteralValue) -> Option<(f64, f64)> {
    match value {
        LiteralValue::Int(i) => Some((bigint_to_f64(i), 0.0)),
        LiteralValue::Float(f) => Some((*f, 0.0)),
        LiteralValue::Complex { real, imag } => Some((*real, *imag)),
        _ => None,
    }
}

fn bigint_to_f64(value: &BigInt) -> f64 {
    value.to_string().parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyast_python_parser::parse_module;

    fn eval_expr_stmt(source: &str) -> LiteralValue {
        let module = parse_module(source).expect("parses");
        let pyast_python_ast::Stmt::Expr(stmt) = &module.body[0] else {
            panic!("expected a bare expression statement");
        };
        literal_eval(&stmt.value).expect("evaluates")
    }

    #[test]
    fn evaluates_nested_containers() {
        let value = eval_expr_stmt("[1, 2, (3, 4), {'a': 1, 'b': [True, None]}]");
        assert_eq!(
            value,
            LiteralValue::List(vec![
                LiteralValue::Int(1.into()),
                LiteralValue::Int(2.into()),
                LiteralValue::Tuple(vec![LiteralValue::Int(3.into()), LiteralValue::Int(4.into())]),
                LiteralValue::Dict(vec![(
                    LiteralValue::Str("a".to_string()),
                    LiteralValue::Int(1.into())
                ), (
                    LiteralValue::Str("b".to_string()),
                    LiteralValue::List(vec![LiteralValue::Bool(true), LiteralValue::None])
                )]),
            ])
        );
    }

    #[test]
    fn evaluates_negative_numbers() {
        assert_eq!(eval_expr_stmt("-5"), LiteralValue::Int((-5).into()));
        assert_eq!(eval_expr_stmt("-5.0"), LiteralValue::Float(-5.0));
    }

    #[test]
    fn evaluates_complex_literal_binop() {
        assert_eq!(
            eval_expr_stmt("1+2j"),
            LiteralValue::Complex { real: 1.0, imag: 2.0 }
        );
        assert_eq!(
            eval_expr_stmt("3-4j"),
            LiteralValue::Complex { real: 3.0, imag: -4.0 }
        );
    }

    #[test]
    fn rejects_function_calls() {
        assert!(eval_expr_stmt_err("print(1)").is_err());
    }

    fn eval_expr_stmt_err(source: &str) -> Result<LiteralValue, ValueError> {
        let module = parse_module(source).expect("parses");
        let pyast_python_ast::Stmt::Expr(stmt) = &module.body[0] else {
            panic!("expected a bare expression statement");
        };
        literal_eval(&stmt.value)
    }

    #[test]
    fn literal_eval_source_matches_literal_eval_on_unparsed_node() {
        let module = parse_module("(1, 2, 3)").expect("parses");
        let pyast_python_ast::Stmt::Expr(stmt) = &module.body[0] else {
            panic!("expected a bare expression statement");
        };
        let from_node = literal_eval(&stmt.value).expect("evaluates");
        let rendered = pyast_python_codegen::unparse_expr(&stmt.value, &pyast_python_codegen::UnparseOptions::default())
            .expect("unparses");
        let from_source = literal_eval_source(&rendered).expect("evaluates");
        assert_eq!(from_node, from_source);
    }
}
