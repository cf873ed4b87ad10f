//! The operator precedence/associativity table.
//!
//! This is the single source of truth for two otherwise-easy-to-desync
//! pieces of code: the parser's precedence-climbing expression grammar
//! (§4.2) and the unparser's parenthesization decisions (§4.3). Keeping
//! them as one table here, rather than duplicating the ladder in both
//! crates, is what prevents the unparser from ever "forgetting" a
//! parenthesis the parser would have required.

use crate::nodes::{BoolOp, Expr, Operator, UnaryOp};

/// Higher binds tighter. Ordering mirrors §4.2's numbered list, lowest to
/// highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence(pub(crate) u8);

impl Precedence {
    pub const LAMBDA: Precedence = Precedence(1);
    pub const TERNARY: Precedence = Precedence(2);
    pub const OR: Precedence = Precedence(3);
    pub const AND: Precedence = Precedence(4);
    pub const NOT: Precedence = Precedence(5);
    pub const COMPARISON: Precedence = Precedence(6);
    pub const BIT_OR: Precedence = Precedence(7);
    pub const BIT_XOR: Precedence = Precedence(8);
    pub const BIT_AND: Precedence = Precedence(9);
    pub const SHIFT: Precedence = Precedence(10);
    pub const ADD_SUB: Precedence = Precedence(11);
    pub const MUL_DIV: Precedence = Precedence(12);
    pub const UNARY: Precedence = Precedence(13);
    pub const POW: Precedence = Precedence(14);
    pub const AWAIT: Precedence = Precedence(15);
    pub const ATOM: Precedence = Precedence(16);

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// One level tighter. Used by callers outside this crate (the
    /// unparser can't name `Precedence(n)` directly, since the field is
    /// `pub(crate)`) to express "this child must bind at least as tightly
    /// as the loose side of a non-associative or right-associative
    /// operator" without duplicating the ladder above.
    pub const fn next(self) -> Precedence {
        Precedence(self.0.saturating_add(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    /// Comparison chains: `a < b < c` is one `Compare` node, not nested
    /// binary operators, so associativity never actually applies to it, but
    /// it still needs a precedence level to compare against its operands.
    NonAssociative,
}

impl Operator {
    pub const fn precedence(self) -> Precedence {
        match self {
            Operator::BitOr => Precedence::BIT_OR,
            Operator::BitXor => Precedence::BIT_XOR,
            Operator::BitAnd => Precedence::BIT_AND,
            Operator::LShift | Operator::RShift => Precedence::SHIFT,
            Operator::Add | Operator::Sub => Precedence::ADD_SUB,
            Operator::Mult | Operator::Div | Operator::FloorDiv | Operator::Mod | Operator::MatMult => {
                Precedence::MUL_DIV
            }
            Operator::Pow => Precedence::POW,
        }
    }

    pub const fn associativity(self) -> Associativity {
        match self {
            Operator::Pow => Associativity::Right,
            _ => Associativity::Left,
        }
    }
}

impl BoolOp {
    pub const fn precedence(self) -> Precedence {
        match self {
            BoolOp::Or => Precedence::OR,
            BoolOp::And => Precedence::AND,
        }
    }
}

impl UnaryOp {
    pub const fn precedence(self) -> Precedence {
        match self {
            UnaryOp::Not => Precedence::NOT,
            UnaryOp::Invert | UnaryOp::UAdd | UnaryOp::USub => Precedence::UNARY,
        }
    }
}

/// The precedence an expression node behaves at when it appears as a
/// sub-expression: the level at which a parent must decide whether to wrap
/// it in parentheses.
pub fn expr_precedence(expr: &Expr) -> Precedence {
    match expr {
        Expr::Lambda(_) => Precedence::LAMBDA,
        Expr::IfExp(_) => Precedence::TERNARY,
        Expr::BoolOp(node) => node.op.precedence(),
        Expr::Compare(_) => Precedence::COMPARISON,
        Expr::BinOp(node) => node.op.precedence(),
        Expr::UnaryOp(node) => node.op.precedence(),
        Expr::Await(_) => Precedence::AWAIT,
        Expr::NamedExpr(_) => Precedence::TERNARY,
        Expr::Starred(_) => Precedence::TERNARY,
        // `yield`/`yield from` aren't part of the `test` grammar at all: bare
        // at statement level (LAMBDA context), but always parenthesized as
        // soon as they sit inside anything tighter (a call argument, a
        // binary operand, ...).
        Expr::Yield(_) | Expr::YieldFrom(_) => Precedence::LAMBDA,
        // Atoms, trailers (call/attribute/subscript), and displays all bind
        // as tightly as possible; they are never parenthesized by a parent
        // unless the parent is itself one of the above.
        _ => Precedence::ATOM,
    }
}
