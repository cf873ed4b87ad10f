//! Reflection: a `NAME`/kind tag and an `AnyNodeRef` over every concrete
//! node type, used to implement `walk`, `iterChildNodes`, `iterFields`, and
//! `dump` generically instead of writing four ad hoc tree-walkers.

use pyast_text_size::{Ranged, TextRange};

use crate::nodes::*;

macro_rules! any_node_ref {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A borrowed reference to any concrete AST node, tagged by kind.
        #[derive(Clone, Copy, Debug)]
        pub enum AnyNodeRef<'a> {
            $($variant(&'a $ty),)*
        }

        impl<'a> AnyNodeRef<'a> {
            /// The ASDL constructor name, e.g. `"FunctionDef"`.
            pub const fn kind(self) -> &'static str {
                match self {
                    $(AnyNodeRef::$variant(_) => stringify!($variant),)*
                }
            }
        }

        impl Ranged for AnyNodeRef<'_> {
            fn range(&self) -> TextRange {
                match self {
                    $(AnyNodeRef::$variant(node) => node.range(),)*
                }
            }
        }

        $(
            impl<'a> From<&'a $ty> for AnyNodeRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    AnyNodeRef::$variant(node)
                }
            }
        )*
    };
}

any_node_ref!(
    ModModule(ModModule),
    ModExpression(ModExpression),
    ModInteractive(ModInteractive),
    StmtFunctionDef(StmtFunctionDef),
    StmtClassDef(StmtClassDef),
    StmtReturn(StmtReturn),
    StmtDelete(StmtDelete),
    StmtAssign(StmtAssign),
    StmtAugAssign(StmtAugAssign),
    StmtAnnAssign(StmtAnnAssign),
    StmtFor(StmtFor),
    StmtWhile(StmtWhile),
    StmtIf(StmtIf),
    StmtWith(StmtWith),
    StmtRaise(StmtRaise),
    StmtTry(StmtTry),
    StmtTryStar(StmtTryStar),
    StmtAssert(StmtAssert),
    StmtImport(StmtImport),
    StmtImportFrom(StmtImportFrom),
    StmtGlobal(StmtGlobal),
    StmtNonlocal(StmtNonlocal),
    StmtExpr(StmtExpr),
    StmtPass(StmtPass),
    StmtBreak(StmtBreak),
    StmtContinue(StmtContinue),
    StmtMatch(StmtMatch),
    ExprBoolOp(ExprBoolOp),
    ExprNamedExpr(ExprNamedExpr),
    ExprBinOp(ExprBinOp),
    ExprUnaryOp(ExprUnaryOp),
    ExprLambda(ExprLambda),
    ExprIfExp(ExprIfExp),
    ExprDict(ExprDict),
    ExprSet(ExprSet),
    ExprListComp(ExprListComp),
    ExprSetComp(ExprSetComp),
    ExprDictComp(ExprDictComp),
    ExprGeneratorExp(ExprGeneratorExp),
    ExprAwait(ExprAwait),
    ExprYield(ExprYield),
    ExprYieldFrom(ExprYieldFrom),
    ExprCompare(ExprCompare),
    ExprCall(ExprCall),
    ExprFormattedValue(ExprFormattedValue),
    ExprJoinedStr(ExprJoinedStr),
    ExprConstant(ExprConstant),
    ExprAttribute(ExprAttribute),
    ExprSubscript(ExprSubscript),
    ExprStarred(ExprStarred),
    ExprName(ExprName),
    ExprList(ExprList),
    ExprTuple(ExprTuple),
    ExprSlice(ExprSlice),
    PatternMatchValue(PatternMatchValue),
    PatternMatchSingleton(PatternMatchSingleton),
    PatternMatchSequence(PatternMatchSequence),
    PatternMatchMapping(PatternMatchMapping),
    PatternMatchClass(PatternMatchClass),
    PatternMatchStar(PatternMatchStar),
    PatternMatchAs(PatternMatchAs),
    PatternMatchOr(PatternMatchOr),
    Arguments(Arguments),
    Arg(Arg),
    Keyword(Keyword),
    Alias(Alias),
    WithItem(WithItem),
    Comprehension(Comprehension),
    ExceptHandler(ExceptHandler),
    MatchCase(MatchCase),
    TypeIgnore(TypeIgnore),
);

impl<'a> From<&'a Mod> for AnyNodeRef<'a> {
    fn from(node: &'a Mod) -> Self {
        match node {
            Mod::Module(node) => node.into(),
            Mod::Expression(node) => node.into(),
            Mod::Interactive(node) => node.into(),
        }
    }
}

impl<'a> From<&'a Stmt> for AnyNodeRef<'a> {
    fn from(node: &'a Stmt) -> Self {
        match node {
            Stmt::FunctionDef(node) => node.into(),
            Stmt::ClassDef(node) => node.into(),
            Stmt::Return(node) => node.into(),
            Stmt::Delete(node) => node.into(),
            Stmt::Assign(node) => node.into(),
            Stmt::AugAssign(node) => node.into(),
            Stmt::AnnAssign(node) => node.into(),
            Stmt::For(node) => node.into(),
            Stmt::While(node) => node.into(),
            Stmt::If(node) => node.into(),
            Stmt::With(node) => node.into(),
            Stmt::Raise(node) => node.into(),
            Stmt::Try(node) => node.into(),
            Stmt::TryStar(node) => node.into(),
            Stmt::Assert(node) => node.into(),
            Stmt::Import(node) => node.into(),
            Stmt::ImportFrom(node) => node.into(),
            Stmt::Global(node) => node.into(),
            Stmt::Nonlocal(node) => node.into(),
            Stmt::Expr(node) => node.into(),
            Stmt::Pass(node) => node.into(),
            Stmt::Break(node) => node.into(),
            Stmt::Continue(node) => node.into(),
            Stmt::Match(node) => node.into(),
        }
    }
}

impl<'a> From<&'a Expr> for AnyNodeRef<'a> {
    fn from(node: &'a Expr) -> Self {
        match node {
            Expr::BoolOp(node) => node.into(),
            Expr::NamedExpr(node) => node.into(),
            Expr::BinOp(node) => node.into(),
            Expr::UnaryOp(node) => node.into(),
            Expr::Lambda(node) => node.into(),
            Expr::IfExp(node) => node.into(),
            Expr::Dict(node) => node.into(),
            Expr::Set(node) => node.into(),
            Expr::ListComp(node) => node.into(),
            Expr::SetComp(node) => node.into(),
            Expr::DictComp(node) => node.into(),
            Expr::GeneratorExp(node) => node.into(),
            Expr::Await(node) => node.into(),
            Expr::Yield(node) => node.into(),
            Expr::YieldFrom(node) => node.into(),
            Expr::Compare(node) => node.into(),
            Expr::Call(node) => node.into(),
            Expr::FormattedValue(node) => node.into(),
            Expr::JoinedStr(node) => node.into(),
            Expr::Constant(node) => node.into(),
            Expr::Attribute(node) => node.into(),
            Expr::Subscript(node) => node.into(),
            Expr::Starred(node) => node.into(),
            Expr::Name(node) => node.into(),
            Expr::List(node) => node.into(),
            Expr::Tuple(node) => node.into(),
            Expr::Slice(node) => node.into(),
        }
    }
}

impl<'a> From<&'a Pattern> for AnyNodeRef<'a> {
    fn from(node: &'a Pattern) -> Self {
        match node {
            Pattern::MatchValue(node) => node.into(),
            Pattern::MatchSingleton(node) => node.into(),
            Pattern::MatchSequence(node) => node.into(),
            Pattern::MatchMapping(node) => node.into(),
            Pattern::MatchClass(node) => node.into(),
            Pattern::MatchStar(node) => node.into(),
            Pattern::MatchAs(node) => node.into(),
            Pattern::MatchOr(node) => node.into(),
        }
    }
}

/// One field of a node, as CPython's `ast._fields`/`ast.iter_fields` would
/// report it: either a single child node, a list of child nodes, or a leaf
/// value (identifier, constant, operator tag, ...).
#[derive(Clone, Debug)]
pub enum FieldValue<'a> {
    Node(AnyNodeRef<'a>),
    NodeOpt(Option<AnyNodeRef<'a>>),
    Nodes(Vec<AnyNodeRef<'a>>),
    OptionalNodes(Vec<Option<AnyNodeRef<'a>>>),
    Identifier(&'a str),
    Identifiers(Vec<&'a str>),
    OptIdentifier(Option<&'a str>),
    Constant(&'a Constant),
    Str(&'a str),
    OptStr(Option<&'a str>),
    Int(u32),
    Bool(bool),
    /// A single ASDL-constructor tag, e.g. `op=Add()`/`ctx=Load()` — the
    /// ASDL name, not the operator's source spelling, and rendered as a
    /// zero-argument constructor rather than a quoted string.
    OperatorTag(&'a str),
    /// A list of ASDL-constructor tags, e.g. `Compare.ops=[Lt(), Lt()]`.
    OperatorTags(Vec<&'a str>),
}

/// Maps a node onto its `(name, value)` field list, in declaration order.
///
/// This is the machinery `iterFields`, `iterChildNodes`, and `dump` are
/// built from; adding a node kind means adding one match arm here, not one
/// bespoke method per traversal.
pub fn fields<'a>(node: AnyNodeRef<'a>) -> Vec<(&'static str, FieldValue<'a>)> {
    use FieldValue::*;

    match node {
        AnyNodeRef::ModModule(n) => vec![
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            (
                "type_ignores",
                Nodes(n.type_ignores.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ModExpression(n) => vec![("body", Node((&*n.body).into()))],
        AnyNodeRef::ModInteractive(n) => {
            vec![("body", Nodes(n.body.iter().map(Into::into).collect()))]
        }
        AnyNodeRef::TypeIgnore(n) => vec![("lineno", Int(n.lineno)), ("tag", Str(&n.tag))],

        AnyNodeRef::StmtFunctionDef(n) => vec![
            ("name", Identifier(n.name.as_str())),
            ("args", Node((&*n.args).into())),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            (
                "decorator_list",
                Nodes(n.decorator_list.iter().map(Into::into).collect()),
            ),
            (
                "returns",
                NodeOpt(n.returns.as_deref().map(Into::into)),
            ),
        ],
        AnyNodeRef::StmtClassDef(n) => vec![
            ("name", Identifier(n.name.as_str())),
            ("bases", Nodes(n.bases.iter().map(Into::into).collect())),
            (
                "keywords",
                Nodes(n.keywords.iter().map(Into::into).collect()),
            ),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            (
                "decorator_list",
                Nodes(n.decorator_list.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::StmtReturn(n) => vec![("value", NodeOpt(n.value.as_deref().map(Into::into)))],
        AnyNodeRef::StmtDelete(n) => {
            vec![("targets", Nodes(n.targets.iter().map(Into::into).collect()))]
        }
        AnyNodeRef::StmtAssign(n) => vec![
            ("targets", Nodes(n.targets.iter().map(Into::into).collect())),
            ("value", Node((&*n.value).into())),
        ],
        AnyNodeRef::StmtAugAssign(n) => vec![
            ("target", Node((&*n.target).into())),
            ("op", OperatorTag(operator_tag(n.op))),
            ("value", Node((&*n.value).into())),
        ],
        AnyNodeRef::StmtAnnAssign(n) => vec![
            ("target", Node((&*n.target).into())),
            ("annotation", Node((&*n.annotation).into())),
            ("value", NodeOpt(n.value.as_deref().map(Into::into))),
            ("simple", Bool(n.simple)),
        ],
        AnyNodeRef::StmtFor(n) => vec![
            ("target", Node((&*n.target).into())),
            ("iter", Node((&*n.iter).into())),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            ("orelse", Nodes(n.orelse.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::StmtWhile(n) => vec![
            ("test", Node((&*n.test).into())),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            ("orelse", Nodes(n.orelse.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::StmtIf(n) => vec![
            ("test", Node((&*n.test).into())),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            ("orelse", Nodes(n.orelse.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::StmtWith(n) => vec![
            ("items", Nodes(n.items.iter().map(Into::into).collect())),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::StmtRaise(n) => vec![
            ("exc", NodeOpt(n.exc.as_deref().map(Into::into))),
            ("cause", NodeOpt(n.cause.as_deref().map(Into::into))),
        ],
        AnyNodeRef::StmtTry(n) => vec![
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            (
                "handlers",
                Nodes(n.handlers.iter().map(Into::into).collect()),
            ),
            ("orelse", Nodes(n.orelse.iter().map(Into::into).collect())),
            (
                "finalbody",
                Nodes(n.finalbody.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::StmtTryStar(n) => vec![
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
            (
                "handlers",
                Nodes(n.handlers.iter().map(Into::into).collect()),
            ),
            ("orelse", Nodes(n.orelse.iter().map(Into::into).collect())),
            (
                "finalbody",
                Nodes(n.finalbody.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::StmtAssert(n) => vec![
            ("test", Node((&*n.test).into())),
            ("msg", NodeOpt(n.msg.as_deref().map(Into::into))),
        ],
        AnyNodeRef::StmtImport(n) => {
            vec![("names", Nodes(n.names.iter().map(Into::into).collect()))]
        }
        AnyNodeRef::StmtImportFrom(n) => vec![
            ("module", OptIdentifier(n.module.as_deref())),
            ("names", Nodes(n.names.iter().map(Into::into).collect())),
            ("level", Int(n.level)),
        ],
        AnyNodeRef::StmtGlobal(n) => vec![(
            "names",
            Identifiers(n.names.iter().map(|i| i.as_str()).collect()),
        )],
        AnyNodeRef::StmtNonlocal(n) => vec![(
            "names",
            Identifiers(n.names.iter().map(|i| i.as_str()).collect()),
        )],
        AnyNodeRef::StmtExpr(n) => vec![("value", Node((&*n.value).into()))],
        AnyNodeRef::StmtPass(_) => vec![],
        AnyNodeRef::StmtBreak(_) => vec![],
        AnyNodeRef::StmtContinue(_) => vec![],
        AnyNodeRef::StmtMatch(n) => vec![
            ("subject", Node((&*n.subject).into())),
            ("cases", Nodes(n.cases.iter().map(Into::into).collect())),
        ],

        AnyNodeRef::ExprBoolOp(n) => vec![
            ("op", OperatorTag(bool_op_tag(n.op))),
            ("values", Nodes(n.values.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::ExprNamedExpr(n) => vec![
            ("target", Node((&*n.target).into())),
            ("value", Node((&*n.value).into())),
        ],
        AnyNodeRef::ExprBinOp(n) => vec![
            ("left", Node((&*n.left).into())),
            ("op", OperatorTag(operator_tag(n.op))),
            ("right", Node((&*n.right).into())),
        ],
        AnyNodeRef::ExprUnaryOp(n) => vec![
            ("op", OperatorTag(unary_op_tag(n.op))),
            ("operand", Node((&*n.operand).into())),
        ],
        AnyNodeRef::ExprLambda(n) => vec![
            ("args", Node((&*n.args).into())),
            ("body", Node((&*n.body).into())),
        ],
        AnyNodeRef::ExprIfExp(n) => vec![
            ("test", Node((&*n.test).into())),
            ("body", Node((&*n.body).into())),
            ("orelse", Node((&*n.orelse).into())),
        ],
        AnyNodeRef::ExprDict(n) => vec![
            (
                "keys",
                OptionalNodes(
                    n.keys
                        .iter()
                        .map(|key| key.as_ref().map(Into::into))
                        .collect(),
                ),
            ),
            ("values", Nodes(n.values.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::ExprSet(n) => vec![("elts", Nodes(n.elts.iter().map(Into::into).collect()))],
        AnyNodeRef::ExprListComp(n) => vec![
            ("elt", Node((&*n.elt).into())),
            (
                "generators",
                Nodes(n.generators.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ExprSetComp(n) => vec![
            ("elt", Node((&*n.elt).into())),
            (
                "generators",
                Nodes(n.generators.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ExprDictComp(n) => vec![
            ("key", Node((&*n.key).into())),
            ("value", Node((&*n.value).into())),
            (
                "generators",
                Nodes(n.generators.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ExprGeneratorExp(n) => vec![
            ("elt", Node((&*n.elt).into())),
            (
                "generators",
                Nodes(n.generators.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ExprAwait(n) => vec![("value", Node((&*n.value).into()))],
        AnyNodeRef::ExprYield(n) => vec![("value", NodeOpt(n.value.as_deref().map(Into::into)))],
        AnyNodeRef::ExprYieldFrom(n) => vec![("value", Node((&*n.value).into()))],
        AnyNodeRef::ExprCompare(n) => vec![
            ("left", Node((&*n.left).into())),
            (
                "ops",
                OperatorTags(n.ops.iter().map(|op| cmp_op_tag(*op)).collect()),
            ),
            (
                "comparators",
                Nodes(n.comparators.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ExprCall(n) => vec![
            ("func", Node((&*n.func).into())),
            ("args", Nodes(n.args.iter().map(Into::into).collect())),
            (
                "keywords",
                Nodes(n.keywords.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::ExprFormattedValue(n) => vec![
            ("value", Node((&*n.value).into())),
            ("conversion", Int(n.conversion.as_char().map_or(0, |c| c as u32))),
            (
                "format_spec",
                NodeOpt(n.format_spec.as_deref().map(Into::into)),
            ),
        ],
        AnyNodeRef::ExprJoinedStr(n) => {
            vec![("values", Nodes(n.values.iter().map(Into::into).collect()))]
        }
        AnyNodeRef::ExprConstant(n) => vec![
            ("value", Constant(&n.value)),
            ("kind", OptStr(n.kind.as_deref())),
        ],
        AnyNodeRef::ExprAttribute(n) => vec![
            ("value", Node((&*n.value).into())),
            ("attr", Identifier(n.attr.as_str())),
            ("ctx", OperatorTag(ctx_str(n.ctx))),
        ],
        AnyNodeRef::ExprSubscript(n) => vec![
            ("value", Node((&*n.value).into())),
            ("slice", Node((&*n.slice).into())),
            ("ctx", OperatorTag(ctx_str(n.ctx))),
        ],
        AnyNodeRef::ExprStarred(n) => vec![
            ("value", Node((&*n.value).into())),
            ("ctx", OperatorTag(ctx_str(n.ctx))),
        ],
        AnyNodeRef::ExprName(n) => vec![
            ("id", Identifier(n.id.as_str())),
            ("ctx", OperatorTag(ctx_str(n.ctx))),
        ],
        AnyNodeRef::ExprList(n) => vec![
            ("elts", Nodes(n.elts.iter().map(Into::into).collect())),
            ("ctx", OperatorTag(ctx_str(n.ctx))),
        ],
        AnyNodeRef::ExprTuple(n) => vec![
            ("elts", Nodes(n.elts.iter().map(Into::into).collect())),
            ("ctx", OperatorTag(ctx_str(n.ctx))),
        ],
        AnyNodeRef::ExprSlice(n) => vec![
            ("lower", NodeOpt(n.lower.as_deref().map(Into::into))),
            ("upper", NodeOpt(n.upper.as_deref().map(Into::into))),
            ("step", NodeOpt(n.step.as_deref().map(Into::into))),
        ],

        AnyNodeRef::PatternMatchValue(n) => vec![("value", Node((&*n.value).into()))],
        AnyNodeRef::PatternMatchSingleton(n) => vec![("value", Constant(&n.value))],
        AnyNodeRef::PatternMatchSequence(n) => vec![(
            "patterns",
            Nodes(n.patterns.iter().map(Into::into).collect()),
        )],
        AnyNodeRef::PatternMatchMapping(n) => vec![
            ("keys", Nodes(n.keys.iter().map(Into::into).collect())),
            (
                "patterns",
                Nodes(n.patterns.iter().map(Into::into).collect()),
            ),
            ("rest", OptIdentifier(n.rest.as_deref())),
        ],
        AnyNodeRef::PatternMatchClass(n) => vec![
            ("cls", Node((&*n.cls).into())),
            (
                "patterns",
                Nodes(n.patterns.iter().map(Into::into).collect()),
            ),
            (
                "kwd_attrs",
                Identifiers(n.kwd_attrs.iter().map(|i| i.as_str()).collect()),
            ),
            (
                "kwd_patterns",
                Nodes(n.kwd_patterns.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::PatternMatchStar(n) => vec![("name", OptIdentifier(n.name.as_deref()))],
        AnyNodeRef::PatternMatchAs(n) => vec![
            (
                "pattern",
                NodeOpt(n.pattern.as_deref().map(Into::into)),
            ),
            ("name", OptIdentifier(n.name.as_deref())),
        ],
        AnyNodeRef::PatternMatchOr(n) => vec![(
            "patterns",
            Nodes(n.patterns.iter().map(Into::into).collect()),
        )],

        AnyNodeRef::Arguments(n) => vec![
            (
                "posonlyargs",
                Nodes(n.posonlyargs.iter().map(Into::into).collect()),
            ),
            ("args", Nodes(n.args.iter().map(Into::into).collect())),
            ("vararg", NodeOpt(n.vararg.as_deref().map(Into::into))),
            (
                "kwonlyargs",
                Nodes(n.kwonlyargs.iter().map(Into::into).collect()),
            ),
            (
                "kw_defaults",
                OptionalNodes(
                    n.kw_defaults
                        .iter()
                        .map(|d| d.as_ref().map(Into::into))
                        .collect(),
                ),
            ),
            ("kwarg", NodeOpt(n.kwarg.as_deref().map(Into::into))),
            (
                "defaults",
                Nodes(n.defaults.iter().map(Into::into).collect()),
            ),
        ],
        AnyNodeRef::Arg(n) => vec![
            ("arg", Identifier(n.arg.as_str())),
            (
                "annotation",
                NodeOpt(n.annotation.as_deref().map(Into::into)),
            ),
        ],
        AnyNodeRef::Keyword(n) => vec![
            ("arg", OptIdentifier(n.arg.as_deref())),
            ("value", Node((&n.value).into())),
        ],
        AnyNodeRef::Alias(n) => vec![
            ("name", Identifier(n.name.as_str())),
            ("asname", OptIdentifier(n.asname.as_deref())),
        ],
        AnyNodeRef::WithItem(n) => vec![
            ("context_expr", Node((&n.context_expr).into())),
            (
                "optional_vars",
                NodeOpt(n.optional_vars.as_deref().map(Into::into)),
            ),
        ],
        AnyNodeRef::Comprehension(n) => vec![
            ("target", Node((&n.target).into())),
            ("iter", Node((&n.iter).into())),
            ("ifs", Nodes(n.ifs.iter().map(Into::into).collect())),
            ("is_async", Bool(n.is_async)),
        ],
        AnyNodeRef::ExceptHandler(n) => vec![
            ("type", NodeOpt(n.type_.as_deref().map(Into::into))),
            ("name", OptIdentifier(n.name.as_deref())),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
        ],
        AnyNodeRef::MatchCase(n) => vec![
            ("pattern", Node((&n.pattern).into())),
            ("guard", NodeOpt(n.guard.as_deref().map(Into::into))),
            ("body", Nodes(n.body.iter().map(Into::into).collect())),
        ],
    }
}

pub fn ctx_str(ctx: ExprContext) -> &'static str {
    match ctx {
        ExprContext::Load => "Load",
        ExprContext::Store => "Store",
        ExprContext::Del => "Del",
    }
}

/// The ASDL constructor name for a binary operator, e.g. `Operator::Add`
/// -> `"Add"` — distinct from `Operator::as_str`, which returns the
/// operator's source spelling (`"+"`) for the unparser.
pub fn operator_tag(op: Operator) -> &'static str {
    match op {
        Operator::Add => "Add",
        Operator::Sub => "Sub",
        Operator::Mult => "Mult",
        Operator::MatMult => "MatMult",
        Operator::Div => "Div",
        Operator::Mod => "Mod",
        Operator::Pow => "Pow",
        Operator::LShift => "LShift",
        Operator::RShift => "RShift",
        Operator::BitOr => "BitOr",
        Operator::BitXor => "BitXor",
        Operator::BitAnd => "BitAnd",
        Operator::FloorDiv => "FloorDiv",
    }
}

/// The ASDL constructor name for a unary operator, e.g. `UnaryOp::USub`
/// -> `"USub"`.
pub fn unary_op_tag(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Invert => "Invert",
        UnaryOp::Not => "Not",
        UnaryOp::UAdd => "UAdd",
        UnaryOp::USub => "USub",
    }
}

/// The ASDL constructor name for a boolean operator, e.g. `BoolOp::And`
/// -> `"And"`.
pub fn bool_op_tag(op: BoolOp) -> &'static str {
    match op {
        BoolOp::And => "And",
        BoolOp::Or => "Or",
    }
}

/// The ASDL constructor name for a comparison operator, e.g. `CmpOp::Lt`
/// -> `"Lt"`.
pub fn cmp_op_tag(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "Eq",
        CmpOp::NotEq => "NotEq",
        CmpOp::Lt => "Lt",
        CmpOp::LtE => "LtE",
        CmpOp::Gt => "Gt",
        CmpOp::GtE => "GtE",
        CmpOp::Is => "Is",
        CmpOp::IsNot => "IsNot",
        CmpOp::In => "In",
        CmpOp::NotIn => "NotIn",
    }
}

/// The immediate child nodes of `node`, in field order.
pub fn child_nodes<'a>(node: AnyNodeRef<'a>) -> Vec<AnyNodeRef<'a>> {
    let mut out = Vec::new();
    for (_, value) in fields(node) {
        match value {
            FieldValue::Node(child) => out.push(child),
            FieldValue::NodeOpt(Some(child)) => out.push(child),
            FieldValue::Nodes(children) => out.extend(children),
            FieldValue::OptionalNodes(children) => out.extend(children.into_iter().flatten()),
            _ => {}
        }
    }
    out
}
