//! The AST data model: tagged variants mirroring Python's ASDL grammar.
//!
//! Every node is a plain struct carrying its fields plus a [`TextRange`];
//! the `Mod`/`Stmt`/`Expr`/`Pattern` families are sum types dispatched on
//! tag, not class hierarchies, so that adding an operation (a visitor, the
//! unparser, `dump`) is one `match` rather than a new virtual method on
//! every node type.

use num_bigint::BigInt;
use pyast_text_size::{Ranged, TextRange};

pub use crate::identifier::Identifier;

// ---------------------------------------------------------------------
// Module roots
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, is_macro::Is)]
pub enum Mod {
    Module(ModModule),
    Expression(ModExpression),
    Interactive(ModInteractive),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModModule {
    pub range: TextRange,
    pub body: Vec<Stmt>,
    pub type_ignores: Vec<TypeIgnore>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModExpression {
    pub range: TextRange,
    pub body: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModInteractive {
    pub range: TextRange,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeIgnore {
    pub range: TextRange,
    pub lineno: u32,
    pub tag: String,
}

impl From<ModModule> for Mod {
    fn from(payload: ModModule) -> Self {
        Mod::Module(payload)
    }
}

impl From<ModExpression> for Mod {
    fn from(payload: ModExpression) -> Self {
        Mod::Expression(payload)
    }
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, is_macro::Is)]
pub enum Stmt {
    FunctionDef(StmtFunctionDef),
    ClassDef(StmtClassDef),
    Return(StmtReturn),
    Delete(StmtDelete),
    Assign(StmtAssign),
    AugAssign(StmtAugAssign),
    AnnAssign(StmtAnnAssign),
    For(StmtFor),
    While(StmtWhile),
    If(StmtIf),
    With(StmtWith),
    Raise(StmtRaise),
    Try(StmtTry),
    TryStar(StmtTryStar),
    Assert(StmtAssert),
    Import(StmtImport),
    ImportFrom(StmtImportFrom),
    Global(StmtGlobal),
    Nonlocal(StmtNonlocal),
    Expr(StmtExpr),
    Pass(StmtPass),
    Break(StmtBreak),
    Continue(StmtContinue),
    Match(StmtMatch),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtFunctionDef {
    pub range: TextRange,
    pub is_async: bool,
    pub name: Identifier,
    pub args: Box<Arguments>,
    pub body: Vec<Stmt>,
    pub decorator_list: Vec<Expr>,
    pub returns: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtClassDef {
    pub range: TextRange,
    pub name: Identifier,
    pub bases: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub body: Vec<Stmt>,
    pub decorator_list: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtReturn {
    pub range: TextRange,
    pub value: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtDelete {
    pub range: TextRange,
    pub targets: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtAssign {
    pub range: TextRange,
    pub targets: Vec<Expr>,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtAugAssign {
    pub range: TextRange,
    pub target: Box<Expr>,
    pub op: Operator,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtAnnAssign {
    pub range: TextRange,
    pub target: Box<Expr>,
    pub annotation: Box<Expr>,
    pub value: Option<Box<Expr>>,
    pub simple: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtFor {
    pub range: TextRange,
    pub is_async: bool,
    pub target: Box<Expr>,
    pub iter: Box<Expr>,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtWhile {
    pub range: TextRange,
    pub test: Box<Expr>,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtIf {
    pub range: TextRange,
    pub test: Box<Expr>,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtWith {
    pub range: TextRange,
    pub is_async: bool,
    pub items: Vec<WithItem>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtRaise {
    pub range: TextRange,
    pub exc: Option<Box<Expr>>,
    pub cause: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtTry {
    pub range: TextRange,
    pub body: Vec<Stmt>,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Vec<Stmt>,
    pub finalbody: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtTryStar {
    pub range: TextRange,
    pub body: Vec<Stmt>,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Vec<Stmt>,
    pub finalbody: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtAssert {
    pub range: TextRange,
    pub test: Box<Expr>,
    pub msg: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtImport {
    pub range: TextRange,
    pub names: Vec<Alias>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtImportFrom {
    pub range: TextRange,
    pub module: Option<Identifier>,
    pub names: Vec<Alias>,
    pub level: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtGlobal {
    pub range: TextRange,
    pub names: Vec<Identifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtNonlocal {
    pub range: TextRange,
    pub names: Vec<Identifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtExpr {
    pub range: TextRange,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtPass {
    pub range: TextRange,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtBreak {
    pub range: TextRange,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtContinue {
    pub range: TextRange,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtMatch {
    pub range: TextRange,
    pub subject: Box<Expr>,
    pub cases: Vec<MatchCase>,
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, is_macro::Is)]
pub enum Expr {
    BoolOp(ExprBoolOp),
    NamedExpr(ExprNamedExpr),
    BinOp(ExprBinOp),
    UnaryOp(ExprUnaryOp),
    Lambda(ExprLambda),
    IfExp(ExprIfExp),
    Dict(ExprDict),
    Set(ExprSet),
    ListComp(ExprListComp),
    SetComp(ExprSetComp),
    DictComp(ExprDictComp),
    GeneratorExp(ExprGeneratorExp),
    Await(ExprAwait),
    Yield(ExprYield),
    YieldFrom(ExprYieldFrom),
    Compare(ExprCompare),
    Call(ExprCall),
    FormattedValue(ExprFormattedValue),
    JoinedStr(ExprJoinedStr),
    Constant(ExprConstant),
    Attribute(ExprAttribute),
    Subscript(ExprSubscript),
    Starred(ExprStarred),
    Name(ExprName),
    List(ExprList),
    Tuple(ExprTuple),
    Slice(ExprSlice),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprBoolOp {
    pub range: TextRange,
    pub op: BoolOp,
    pub values: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprNamedExpr {
    pub range: TextRange,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprBinOp {
    pub range: TextRange,
    pub left: Box<Expr>,
    pub op: Operator,
    pub right: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprUnaryOp {
    pub range: TextRange,
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprLambda {
    pub range: TextRange,
    pub args: Box<Arguments>,
    pub body: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprIfExp {
    pub range: TextRange,
    pub test: Box<Expr>,
    pub body: Box<Expr>,
    pub orelse: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprDict {
    pub range: TextRange,
    pub keys: Vec<Option<Expr>>,
    pub values: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprSet {
    pub range: TextRange,
    pub elts: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprListComp {
    pub range: TextRange,
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprSetComp {
    pub range: TextRange,
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprDictComp {
    pub range: TextRange,
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprGeneratorExp {
    pub range: TextRange,
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprAwait {
    pub range: TextRange,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprYield {
    pub range: TextRange,
    pub value: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprYieldFrom {
    pub range: TextRange,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprCompare {
    pub range: TextRange,
    pub left: Box<Expr>,
    pub ops: Vec<CmpOp>,
    pub comparators: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprCall {
    pub range: TextRange,
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, is_macro::Is)]
pub enum ConversionFlag {
    /// No conversion, i.e. `{x}`.
    None,
    /// `str()`, i.e. `{x!s}`.
    Str,
    /// `repr()`, i.e. `{x!r}`.
    Repr,
    /// `ascii()`, i.e. `{x!a}`.
    Ascii,
}

impl ConversionFlag {
    pub fn as_char(self) -> Option<char> {
        match self {
            ConversionFlag::None => Option::None,
            ConversionFlag::Str => Some('s'),
            ConversionFlag::Repr => Some('r'),
            ConversionFlag::Ascii => Some('a'),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprFormattedValue {
    pub range: TextRange,
    pub value: Box<Expr>,
    pub conversion: ConversionFlag,
    pub format_spec: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprJoinedStr {
    pub range: TextRange,
    pub values: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprConstant {
    pub range: TextRange,
    pub value: Constant,
    /// `u` prefix flag preserved from `u"..."` literals; CPython keeps this
    /// only for string constants and it has no semantic effect.
    pub kind: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprAttribute {
    pub range: TextRange,
    pub value: Box<Expr>,
    pub attr: Identifier,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprSubscript {
    pub range: TextRange,
    pub value: Box<Expr>,
    pub slice: Box<Expr>,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprStarred {
    pub range: TextRange,
    pub value: Box<Expr>,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprName {
    pub range: TextRange,
    pub id: Identifier,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprList {
    pub range: TextRange,
    pub elts: Vec<Expr>,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprTuple {
    pub range: TextRange,
    pub elts: Vec<Expr>,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprSlice {
    pub range: TextRange,
    pub lower: Option<Box<Expr>>,
    pub upper: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
}

// ---------------------------------------------------------------------
// Operators / contexts
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, is_macro::Is)]
pub enum Operator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mult => "*",
            Operator::MatMult => "@",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "**",
            Operator::LShift => "<<",
            Operator::RShift => ">>",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitAnd => "&",
            Operator::FloorDiv => "//",
        }
    }

    /// The augmented-assign spelling, e.g. `Add` -> `+=`.
    pub fn aug_assign_str(self) -> &'static str {
        match self {
            Operator::Add => "+=",
            Operator::Sub => "-=",
            Operator::Mult => "*=",
            Operator::MatMult => "@=",
            Operator::Div => "/=",
            Operator::Mod => "%=",
            Operator::Pow => "**=",
            Operator::LShift => "<<=",
            Operator::RShift => ">>=",
            Operator::BitOr => "|=",
            Operator::BitXor => "^=",
            Operator::BitAnd => "&=",
            Operator::FloorDiv => "//=",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, is_macro::Is)]
pub enum UnaryOp {
    Invert,
    Not,
    UAdd,
    USub,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Invert => "~",
            UnaryOp::Not => "not",
            UnaryOp::UAdd => "+",
            UnaryOp::USub => "-",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, is_macro::Is)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, is_macro::Is)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, is_macro::Is)]
pub enum ExprContext {
    Load,
    Store,
    Del,
}

// ---------------------------------------------------------------------
// Supporting node types
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Arguments {
    pub range: TextRange,
    pub posonlyargs: Vec<Arg>,
    pub args: Vec<Arg>,
    pub vararg: Option<Box<Arg>>,
    pub kwonlyargs: Vec<Arg>,
    pub kw_defaults: Vec<Option<Expr>>,
    pub kwarg: Option<Box<Arg>>,
    pub defaults: Vec<Expr>,
}

impl Arguments {
    /// Positional-only, then positional-or-keyword parameters, in
    /// declaration order; used by the unparser and by argument binding.
    pub fn positional(&self) -> impl Iterator<Item = &Arg> {
        self.posonlyargs.iter().chain(self.args.iter())
    }

    pub fn len(&self) -> usize {
        self.posonlyargs.len()
            + self.args.len()
            + usize::from(self.vararg.is_some())
            + self.kwonlyargs.len()
            + usize::from(self.kwarg.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub range: TextRange,
    pub arg: Identifier,
    pub annotation: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyword {
    pub range: TextRange,
    pub arg: Option<Identifier>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alias {
    pub range: TextRange,
    pub name: Identifier,
    pub asname: Option<Identifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithItem {
    pub range: TextRange,
    pub context_expr: Expr,
    pub optional_vars: Option<Box<Expr>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comprehension {
    pub range: TextRange,
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
    pub is_async: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExceptHandler {
    pub range: TextRange,
    pub type_: Option<Box<Expr>>,
    pub name: Option<Identifier>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchCase {
    pub range: TextRange,
    pub pattern: Pattern,
    pub guard: Option<Box<Expr>>,
    pub body: Vec<Stmt>,
}

// ---------------------------------------------------------------------
// Match patterns
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, is_macro::Is)]
pub enum Pattern {
    MatchValue(PatternMatchValue),
    MatchSingleton(PatternMatchSingleton),
    MatchSequence(PatternMatchSequence),
    MatchMapping(PatternMatchMapping),
    MatchClass(PatternMatchClass),
    MatchStar(PatternMatchStar),
    MatchAs(PatternMatchAs),
    MatchOr(PatternMatchOr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchValue {
    pub range: TextRange,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchSingleton {
    pub range: TextRange,
    pub value: Constant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchSequence {
    pub range: TextRange,
    pub patterns: Vec<Pattern>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchMapping {
    pub range: TextRange,
    pub keys: Vec<Expr>,
    pub patterns: Vec<Pattern>,
    pub rest: Option<Identifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchClass {
    pub range: TextRange,
    pub cls: Box<Expr>,
    pub patterns: Vec<Pattern>,
    pub kwd_attrs: Vec<Identifier>,
    pub kwd_patterns: Vec<Pattern>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchStar {
    pub range: TextRange,
    pub name: Option<Identifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchAs {
    pub range: TextRange,
    pub pattern: Option<Box<Pattern>>,
    pub name: Option<Identifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatchOr {
    pub range: TextRange,
    pub patterns: Vec<Pattern>,
}

// ---------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    None,
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    Int(BigInt),
    Float(f64),
    Complex { real: f64, imag: f64 },
    Ellipsis,
    Tuple(Vec<Constant>),
}

impl Constant {
    pub fn is_true(&self) -> bool {
        matches!(self, Constant::Bool(true))
    }
}

// ---------------------------------------------------------------------
// range() impls
// ---------------------------------------------------------------------

macro_rules! impl_ranged {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Ranged for $ty {
                fn range(&self) -> TextRange {
                    self.range
                }
            }
        )*
    };
}

impl_ranged!(
    ModModule,
    ModExpression,
    ModInteractive,
    TypeIgnore,
    StmtFunctionDef,
    StmtClassDef,
    StmtReturn,
    StmtDelete,
    StmtAssign,
    StmtAugAssign,
    StmtAnnAssign,
    StmtFor,
    StmtWhile,
    StmtIf,
    StmtWith,
    StmtRaise,
    StmtTry,
    StmtTryStar,
    StmtAssert,
    StmtImport,
    StmtImportFrom,
    StmtGlobal,
    StmtNonlocal,
    StmtExpr,
    StmtPass,
    StmtBreak,
    StmtContinue,
    StmtMatch,
    ExprBoolOp,
    ExprNamedExpr,
    ExprBinOp,
    ExprUnaryOp,
    ExprLambda,
    ExprIfExp,
    ExprDict,
    ExprSet,
    ExprListComp,
    ExprSetComp,
    ExprDictComp,
    ExprGeneratorExp,
    ExprAwait,
    ExprYield,
    ExprYieldFrom,
    ExprCompare,
    ExprCall,
    ExprFormattedValue,
    ExprJoinedStr,
    ExprConstant,
    ExprAttribute,
    ExprSubscript,
    ExprStarred,
    ExprName,
    ExprList,
    ExprTuple,
    ExprSlice,
    Arguments,
    Arg,
    Keyword,
    Alias,
    WithItem,
    Comprehension,
    ExceptHandler,
    MatchCase,
    PatternMatchValue,
    PatternMatchSingleton,
    PatternMatchSequence,
    PatternMatchMapping,
    PatternMatchClass,
    PatternMatchStar,
    PatternMatchAs,
    PatternMatchOr,
);

impl Ranged for Mod {
    fn range(&self) -> TextRange {
        match self {
            Mod::Module(node) => node.range,
            Mod::Expression(node) => node.range,
            Mod::Interactive(node) => node.range,
        }
    }
}

macro_rules! impl_ranged_enum {
    ($enum_ty:ty, [$($variant:ident),* $(,)?]) => {
        impl Ranged for $enum_ty {
            fn range(&self) -> TextRange {
                match self {
                    $(<$enum_ty>::$variant(node) => node.range(),)*
                }
            }
        }
    };
}

impl_ranged_enum!(
    Stmt,
    [
        FunctionDef, ClassDef, Return, Delete, Assign, AugAssign, AnnAssign, For, While, If,
        With, Raise, Try, TryStar, Assert, Import, ImportFrom, Global, Nonlocal, Expr, Pass,
        Break, Continue, Match,
    ]
);

impl_ranged_enum!(
    Expr,
    [
        BoolOp, NamedExpr, BinOp, UnaryOp, Lambda, IfExp, Dict, Set, ListComp, SetComp, DictComp,
        GeneratorExp, Await, Yield, YieldFrom, Compare, Call, FormattedValue, JoinedStr, Constant,
        Attribute, Subscript, Starred, Name, List, Tuple, Slice,
    ]
);

impl_ranged_enum!(
    Pattern,
    [
        MatchValue,
        MatchSingleton,
        MatchSequence,
        MatchMapping,
        MatchClass,
        MatchStar,
        MatchAs,
        MatchOr,
    ]
);

// ---------------------------------------------------------------------
// Conversions from leaf structs into their owning enum
// ---------------------------------------------------------------------

macro_rules! impl_from_variant {
    ($enum_ty:ident, $variant:ident, $payload:ty) => {
        impl From<$payload> for $enum_ty {
            fn from(payload: $payload) -> Self {
                $enum_ty::$variant(payload)
            }
        }
    };
}

impl_from_variant!(Stmt, FunctionDef, StmtFunctionDef);
impl_from_variant!(Stmt, ClassDef, StmtClassDef);
impl_from_variant!(Stmt, Return, StmtReturn);
impl_from_variant!(Stmt, Delete, StmtDelete);
impl_from_variant!(Stmt, Assign, StmtAssign);
impl_from_variant!(Stmt, AugAssign, StmtAugAssign);
impl_from_variant!(Stmt, AnnAssign, StmtAnnAssign);
impl_from_variant!(Stmt, For, StmtFor);
impl_from_variant!(Stmt, While, StmtWhile);
impl_from_variant!(Stmt, If, StmtIf);
impl_from_variant!(Stmt, With, StmtWith);
impl_from_variant!(Stmt, Raise, StmtRaise);
impl_from_variant!(Stmt, Try, StmtTry);
impl_from_variant!(Stmt, TryStar, StmtTryStar);
impl_from_variant!(Stmt, Assert, StmtAssert);
impl_from_variant!(Stmt, Import, StmtImport);
impl_from_variant!(Stmt, ImportFrom, StmtImportFrom);
impl_from_variant!(Stmt, Global, StmtGlobal);
impl_from_variant!(Stmt, Nonlocal, StmtNonlocal);
impl_from_variant!(Stmt, Expr, StmtExpr);
impl_from_variant!(Stmt, Pass, StmtPass);
impl_from_variant!(Stmt, Break, StmtBreak);
impl_from_variant!(Stmt, Continue, StmtContinue);
impl_from_variant!(Stmt, Match, StmtMatch);

impl_from_variant!(Expr, BoolOp, ExprBoolOp);
impl_from_variant!(Expr, NamedExpr, ExprNamedExpr);
impl_from_variant!(Expr, BinOp, ExprBinOp);
impl_from_variant!(Expr, UnaryOp, ExprUnaryOp);
impl_from_variant!(Expr, Lambda, ExprLambda);
impl_from_variant!(Expr, IfExp, ExprIfExp);
impl_from_variant!(Expr, Dict, ExprDict);
impl_from_variant!(Expr, Set, ExprSet);
impl_from_variant!(Expr, ListComp, ExprListComp);
impl_from_variant!(Expr, SetComp, ExprSetComp);
impl_from_variant!(Expr, DictComp, ExprDictComp);
impl_from_variant!(Expr, GeneratorExp, ExprGeneratorExp);
impl_from_variant!(Expr, Await, ExprAwait);
impl_from_variant!(Expr, Yield, ExprYield);
impl_from_variant!(Expr, YieldFrom, ExprYieldFrom);
impl_from_variant!(Expr, Compare, ExprCompare);
impl_from_variant!(Expr, Call, ExprCall);
impl_from_variant!(Expr, FormattedValue, ExprFormattedValue);
impl_from_variant!(Expr, JoinedStr, ExprJoinedStr);
impl_from_variant!(Expr, Constant, ExprConstant);
impl_from_variant!(Expr, Attribute, ExprAttribute);
impl_from_variant!(Expr, Subscript, ExprSubscript);
impl_from_variant!(Expr, Starred, ExprStarred);
impl_from_variant!(Expr, Name, ExprName);
impl_from_variant!(Expr, List, ExprList);
impl_from_variant!(Expr, Tuple, ExprTuple);
impl_from_variant!(Expr, Slice, ExprSlice);

impl_from_variant!(Pattern, MatchValue, PatternMatchValue);
impl_from_variant!(Pattern, MatchSingleton, PatternMatchSingleton);
impl_from_variant!(Pattern, MatchSequence, PatternMatchSequence);
impl_from_variant!(Pattern, MatchMapping, PatternMatchMapping);
impl_from_variant!(Pattern, MatchClass, PatternMatchClass);
impl_from_variant!(Pattern, MatchStar, PatternMatchStar);
impl_from_variant!(Pattern, MatchAs, PatternMatchAs);
impl_from_variant!(Pattern, MatchOr, PatternMatchOr);

impl Expr {
    /// Human-readable node name, used in `SyntaxError` messages when a
    /// target-conversion fails (e.g. "cannot assign to literal").
    pub fn python_name(&self) -> &'static str {
        match self {
            Expr::BoolOp(_) => "boolean operation",
            Expr::NamedExpr(_) => "named expression",
            Expr::BinOp(_) => "binary operation",
            Expr::UnaryOp(_) => "unary operation",
            Expr::Lambda(_) => "lambda",
            Expr::IfExp(_) => "conditional expression",
            Expr::Dict(_) => "dict display",
            Expr::Set(_) => "set display",
            Expr::ListComp(_) => "list comprehension",
            Expr::SetComp(_) => "set comprehension",
            Expr::DictComp(_) => "dict comprehension",
            Expr::GeneratorExp(_) => "generator expression",
            Expr::Await(_) => "await expression",
            Expr::Yield(_) => "yield expression",
            Expr::YieldFrom(_) => "yield expression",
            Expr::Compare(_) => "comparison",
            Expr::Call(_) => "function call",
            Expr::FormattedValue(_) => "f-string expression",
            Expr::JoinedStr(_) => "f-string",
            Expr::Constant(_) => "literal",
            Expr::Attribute(_) => "attribute",
            Expr::Subscript(_) => "subscript",
            Expr::Starred(_) => "starred assignment target",
            Expr::Name(_) => "name",
            Expr::List(_) => "list",
            Expr::Tuple(_) => "tuple",
            Expr::Slice(_) => "slice",
        }
    }
}
