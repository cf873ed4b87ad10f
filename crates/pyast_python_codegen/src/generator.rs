//! The unparser (§4.3): walks the AST and prints canonical Python source.
//!
//! `Generator` builds a flat `String` rather than implementing
//! `fmt::Display`/using `fmt::Formatter`, because statement printing needs
//! to track an indentation depth and insert newlines itself (`fill`,
//! mirroring CPython's `ast._Unparser`) rather than relying on a formatter's
//! single write-through stream.
//!
//! Parenthesization is driven by [`pyast_python_ast::precedence`], the same
//! table the parser's precedence climbing is grounded on: every
//! sub-expression is unparsed with a required minimum [`Precedence`], and
//! gets wrapped in `(...)` when its own precedence falls below that floor.
//! Two conventions keep the floor bookkeeping simple instead of needing a
//! dedicated precedence level per call site:
//!
//! - A non-empty `Tuple` always parenthesizes itself (`(a, b)`, `(a,)`),
//!   which is always semantically safe and removes the need to special-case
//!   "a bare tuple is allowed here" at every statement-level target.
//! - Comma-separated lists (call arguments, list/tuple elements, assignment
//!   targets) unparse their elements at [`Precedence::LAMBDA`], the lowest
//!   level, since nothing at that level actually consumes a bare comma.

use pyast_python_ast::precedence::{expr_precedence, Associativity, Precedence};
use pyast_python_ast::{
    Alias, Arg, Arguments, Comprehension, Constant, Expr, ExprFormattedValue, ExprJoinedStr, Keyword, MatchCase,
    Mod, Pattern, Stmt, WithItem,
};
use pyast_python_literal::escape::{self, Quote};
use pyast_python_literal::{float, int};
use pyast_text_size::Ranged;

use crate::error::InvalidAstError;

type Result<T> = std::result::Result<T, InvalidAstError>;

/// Knobs for [`Generator`] (§6 `UnparseOptions`). `indent` is repeated once
/// per nesting level; CPython's `ast.unparse` always uses 4 spaces, but
/// ruff's formatter-facing callers sometimes want 2 or a tab.
#[derive(Clone, Debug)]
pub struct UnparseOptions {
    pub indent: String,
}

impl Default for UnparseOptions {
    fn default() -> Self {
        UnparseOptions {
            indent: "    ".to_string(),
        }
    }
}

pub struct Generator {
    options: UnparseOptions,
    buffer: String,
    depth: usize,
    /// The quote character the enclosing f-string is delimited with, when
    /// this `Generator` is rendering a replacement field's value or format
    /// spec. Nested string literals must avoid it (pre-3.12 f-strings can't
    /// reuse the outer quote inside `{}`).
    fstring_quote: Option<Quote>,
}

impl Generator {
    pub fn new(options: UnparseOptions) -> Self {
        Generator {
            options,
            buffer: String::new(),
            depth: 0,
            fstring_quote: None,
        }
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    fn nested(&self) -> Generator {
        Generator {
            options: self.options.clone(),
            buffer: String::new(),
            depth: 0,
            fstring_quote: self.fstring_quote,
        }
    }

    fn p(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn p_id(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Starts a new line at the current indentation, matching CPython's
    /// `ast._Unparser.fill`. The very first statement doesn't get a leading
    /// newline, since the caller owns whatever comes before the module body.
    fn fill(&mut self) {
        if !self.buffer.is_empty() {
            self.p("\n");
        }
        for _ in 0..self.depth {
            let indent = self.options.indent.clone();
            self.p(&indent);
        }
    }

    pub fn unparse_mod(&mut self, module: &Mod) -> Result<()> {
        match module {
            Mod::Module(m) => self.statements(&m.body),
            Mod::Expression(m) => self.unparse_expr(&m.body, Precedence::LAMBDA),
            Mod::Interactive(m) => self.statements(&m.body),
        }
    }

    /// Unparses a flat statement list as it appears directly in a module or
    /// interactive body. An empty list produces no output here — CPython's
    /// `ast.unparse(Module(body=[]))` is `""`, not `"pass"`; only a suite
    /// (an indented block that must be syntactically non-empty) falls back
    /// to `pass`.
    fn statements(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.fill();
            self.unparse_stmt(stmt)?;
        }
        Ok(())
    }

    fn suite(&mut self, stmts: &[Stmt]) -> Result<()> {
        self.p(":");
        self.depth += 1;
        if stmts.is_empty() {
            self.fill();
            self.p("pass");
        } else {
            self.statements(stmts)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn decorators(&mut self, decorator_list: &[Expr]) -> Result<()> {
        for dec in decorator_list {
            self.fill();
            self.p("@");
            self.unparse_expr(dec, Precedence::TERNARY)?;
        }
        Ok(())
    }

    fn comma_join(&mut self, exprs: &[Expr], level: Precedence) -> Result<()> {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.p(", ");
            }
            self.unparse_expr(e, level)?;
        }
        Ok(())
    }

    fn comma_join_aliases(&mut self, names: &[Alias]) {
        for (i, alias) in names.iter().enumerate() {
            if i > 0 {
                self.p(", ");
            }
            self.p_id(alias.name.as_str());
            if let Some(asname) = &alias.asname {
                self.p(" as ");
                self.p_id(asname.as_str());
            }
        }
    }

    pub fn unparse_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::FunctionDef(node) => {
                self.decorators(&node.decorator_list)?;
                self.fill();
                if node.is_async {
                    self.p("async ");
                }
                self.p("def ");
                self.p_id(node.name.as_str());
                self.p("(");
                self.unparse_arguments(&node.args)?;
                self.p(")");
                if let Some(returns) = &node.returns {
                    self.p(" -> ");
                    self.unparse_expr(returns, Precedence::TERNARY)?;
                }
                self.suite(&node.body)
            }
            Stmt::ClassDef(node) => {
                self.decorators(&node.decorator_list)?;
                self.fill();
                self.p("class ");
                self.p_id(node.name.as_str());
                if !node.bases.is_empty() || !node.keywords.is_empty() {
                    self.p("(");
                    let mut first = true;
                    for base in &node.bases {
                        if !first {
                            self.p(", ");
                        }
                        first = false;
                        self.unparse_expr(base, Precedence::TERNARY)?;
                    }
                    for kw in &node.keywords {
                        if !first {
                            self.p(", ");
                        }
                        first = false;
                        self.unparse_keyword(kw)?;
                    }
                    self.p(")");
                }
                self.suite(&node.body)
            }
            Stmt::Return(node) => {
                self.p("return");
                if let Some(value) = &node.value {
                    self.p(" ");
                    self.unparse_expr(value, Precedence::LAMBDA)?;
                }
                Ok(())
            }
            Stmt::Delete(node) => {
                self.p("del ");
                self.comma_join(&node.targets, Precedence::LAMBDA)
            }
            Stmt::Assign(node) => {
                for target in &node.targets {
                    self.unparse_expr(target, Precedence::LAMBDA)?;
                    self.p(" = ");
                }
                self.unparse_expr(&node.value, Precedence::LAMBDA)
            }
            Stmt::AugAssign(node) => {
                self.unparse_expr(&node.target, Precedence::LAMBDA)?;
                self.p(" ");
                self.p(node.op.aug_assign_str());
                self.p(" ");
                self.unparse_expr(&node.value, Precedence::LAMBDA)
            }
            Stmt::AnnAssign(node) => {
                let needs_parens = !node.simple && node.target.is_name();
                if needs_parens {
                    self.p("(");
                    self.unparse_expr(&node.target, Precedence::LAMBDA)?;
                    self.p(")");
                } else {
                    self.unparse_expr(&node.target, Precedence::LAMBDA)?;
                }
                self.p(": ");
                self.unparse_expr(&node.annotation, Precedence::LAMBDA)?;
                if let Some(value) = &node.value {
                    self.p(" = ");
                    self.unparse_expr(value, Precedence::LAMBDA)?;
                }
                Ok(())
            }
            Stmt::For(node) => {
                if node.is_async {
                    self.p("async ");
                }
                self.p("for ");
                self.unparse_expr(&node.target, Precedence::LAMBDA)?;
                self.p(" in ");
                self.unparse_expr(&node.iter, Precedence::LAMBDA)?;
                self.suite(&node.body)?;
                self.else_clause(&node.orelse)
            }
            Stmt::While(node) => {
                self.p("while ");
                self.unparse_expr(&node.test, Precedence::LAMBDA)?;
                self.suite(&node.body)?;
                self.else_clause(&node.orelse)
            }
            Stmt::If(node) => {
                self.p("if ");
                self.unparse_expr(&node.test, Precedence::LAMBDA)?;
                self.suite(&node.body)?;
                self.if_orelse(&node.orelse)
            }
            Stmt::With(node) => {
                if node.is_async {
                    self.p("async ");
                }
                self.p("with ");
                for (i, item) in node.items.iter().enumerate() {
                    if i > 0 {
                        self.p(", ");
                    }
                    self.unparse_with_item(item)?;
                }
                self.suite(&node.body)
            }
            Stmt::Raise(node) => {
                self.p("raise");
                if let Some(exc) = &node.exc {
                    self.p(" ");
                    self.unparse_expr(exc, Precedence::LAMBDA)?;
                    if let Some(cause) = &node.cause {
                        self.p(" from ");
                        self.unparse_expr(cause, Precedence::LAMBDA)?;
                    }
                }
                Ok(())
            }
            Stmt::Try(node) => self.unparse_try(&node.body, &node.handlers, &node.orelse, &node.finalbody, false),
            Stmt::TryStar(node) => self.unparse_try(&node.body, &node.handlers, &node.orelse, &node.finalbody, true),
            Stmt::Assert(node) => {
                self.p("assert ");
                self.unparse_expr(&node.test, Precedence::LAMBDA)?;
                if let Some(msg) = &node.msg {
                    self.p(", ");
                    self.unparse_expr(msg, Precedence::LAMBDA)?;
                }
                Ok(())
            }
            Stmt::Import(node) => {
                self.p("import ");
                self.comma_join_aliases(&node.names);
                Ok(())
            }
            Stmt::ImportFrom(node) => {
                self.p("from ");
                for _ in 0..node.level {
                    self.p(".");
                }
                if let Some(module) = &node.module {
                    self.p_id(module.as_str());
                }
                self.p(" import ");
                self.comma_join_aliases(&node.names);
                Ok(())
            }
            Stmt::Global(node) => {
                self.p("global ");
                self.comma_join_identifiers(&node.names);
                Ok(())
            }
            Stmt::Nonlocal(node) => {
                self.p("nonlocal ");
                self.comma_join_identifiers(&node.names);
                Ok(())
            }
            Stmt::Expr(node) => self.unparse_expr(&node.value, Precedence::LAMBDA),
            Stmt::Pass(_) => {
                self.p("pass");
                Ok(())
            }
            Stmt::Break(_) => {
                self.p("break");
                Ok(())
            }
            Stmt::Continue(_) => {
                self.p("continue");
                Ok(())
            }
            Stmt::Match(node) => {
                self.p("match ");
                self.unparse_expr(&node.subject, Precedence::LAMBDA)?;
                self.p(":");
                self.depth += 1;
                for case in &node.cases {
                    self.unparse_match_case(case)?;
                }
                self.depth -= 1;
                Ok(())
            }
        }
    }

    fn comma_join_identifiers(&mut self, names: &[pyast_python_ast::Identifier]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.p(", ");
            }
            self.p_id(name.as_str());
        }
    }

    fn else_clause(&mut self, orelse: &[Stmt]) -> Result<()> {
        if orelse.is_empty() {
            return Ok(());
        }
        self.fill();
        self.p("else");
        self.suite(orelse)
    }

    /// Collapses `orelse == [If(...)]` into `elif`, matching CPython's
    /// `ast._Unparser.visit_If` instead of nesting `else:` / `if ...:`.
    fn if_orelse(&mut self, orelse: &[Stmt]) -> Result<()> {
        match orelse {
            [] => Ok(()),
            [Stmt::If(elif)] => {
                self.fill();
                self.p("elif ");
                self.unparse_expr(&elif.test, Precedence::LAMBDA)?;
                self.suite(&elif.body)?;
                self.if_orelse(&elif.orelse)
            }
            _ => {
                self.fill();
                self.p("else");
                self.suite(orelse)
            }
        }
    }

    fn unparse_with_item(&mut self, item: &WithItem) -> Result<()> {
        self.unparse_expr(&item.context_expr, Precedence::LAMBDA)?;
        if let Some(vars) = &item.optional_vars {
            self.p(" as ");
            self.unparse_expr(vars, Precedence::LAMBDA)?;
        }
        Ok(())
    }

    fn unparse_try(
        &mut self,
        body: &[Stmt],
        handlers: &[pyast_python_ast::ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
        star: bool,
    ) -> Result<()> {
        self.p("try");
        self.suite(body)?;
        for handler in handlers {
            self.fill();
            self.p(if star { "except*" } else { "except" });
            if let Some(type_) = &handler.type_ {
                self.p(" ");
                self.unparse_expr(type_, Precedence::LAMBDA)?;
                if let Some(name) = &handler.name {
                    self.p(" as ");
                    self.p_id(name.as_str());
                }
            }
            self.suite(&handler.body)?;
        }
        if !orelse.is_empty() {
            self.fill();
            self.p("else");
            self.suite(orelse)?;
        }
        if !finalbody.is_empty() {
            self.fill();
            self.p("finally");
            self.suite(finalbody)?;
        }
        Ok(())
    }

    fn unparse_match_case(&mut self, case: &MatchCase) -> Result<()> {
        self.fill();
        self.p("case ");
        self.unparse_pattern(&case.pattern)?;
        if let Some(guard) = &case.guard {
            self.p(" if ");
            self.unparse_expr(guard, Precedence::LAMBDA)?;
        }
        self.suite(&case.body)
    }

    fn unparse_keyword(&mut self, kw: &Keyword) -> Result<()> {
        match &kw.arg {
            Some(name) => {
                self.p_id(name.as_str());
                self.p("=");
            }
            None => self.p("**"),
        }
        self.unparse_expr(&kw.value, Precedence::TERNARY)
    }

    fn unparse_arg(&mut self, arg: &Arg, default: Option<&Expr>) -> Result<()> {
        self.p_id(arg.arg.as_str());
        match (&arg.annotation, default) {
            (Some(annotation), Some(default)) => {
                self.p(": ");
                self.unparse_expr(annotation, Precedence::TERNARY)?;
                self.p(" = ");
                self.unparse_expr(default, Precedence::TERNARY)?;
            }
            (Some(annotation), None) => {
                self.p(": ");
                self.unparse_expr(annotation, Precedence::TERNARY)?;
            }
            (None, Some(default)) => {
                self.p("=");
                self.unparse_expr(default, Precedence::TERNARY)?;
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn unparse_arguments(&mut self, args: &Arguments) -> Result<()> {
        let mut first = true;
        let positional: Vec<&Arg> = args.positional().collect();
        let defaults_start = positional.len().saturating_sub(args.defaults.len());
        for (i, arg) in positional.iter().enumerate() {
            if !first {
                self.p(", ");
            }
            first = false;
            let default = i.checked_sub(defaults_start).and_then(|idx| args.defaults.get(idx));
            self.unparse_arg(arg, default)?;
            if !args.posonlyargs.is_empty() && i + 1 == args.posonlyargs.len() {
                self.p(", /");
            }
        }
        if args.vararg.is_some() || !args.kwonlyargs.is_empty() {
            if !first {
                self.p(", ");
            }
            first = false;
            self.p("*");
            if let Some(vararg) = &args.vararg {
                self.unparse_arg(vararg, None)?;
            }
        }
        for (arg, default) in args.kwonlyargs.iter().zip(args.kw_defaults.iter()) {
            if !first {
                self.p(", ");
            }
            first = false;
            self.unparse_arg(arg, default.as_ref())?;
        }
        if let Some(kwarg) = &args.kwarg {
            if !first {
                self.p(", ");
            }
            self.p("**");
            self.unparse_arg(kwarg, None)?;
        }
        Ok(())
    }

    fn unparse_generators(&mut self, generators: &[Comprehension]) -> Result<()> {
        for gen in generators {
            self.p(if gen.is_async { " async for " } else { " for " });
            self.unparse_expr(&gen.target, Precedence::LAMBDA)?;
            self.p(" in ");
            self.unparse_expr(&gen.iter, Precedence::OR)?;
            for if_clause in &gen.ifs {
                self.p(" if ");
                self.unparse_expr(if_clause, Precedence::OR)?;
            }
        }
        Ok(())
    }

    pub fn unparse_expr(&mut self, expr: &Expr, level: Precedence) -> Result<()> {
        let own = expr_precedence(expr);
        let need_parens = own < level;
        if need_parens {
            self.p("(");
        }
        self.unparse_expr_inner(expr)?;
        if need_parens {
            self.p(")");
        }
        Ok(())
    }

    fn unparse_expr_inner(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::BoolOp(node) => self.unparse_bool_op(node),
            Expr::NamedExpr(node) => {
                self.unparse_expr(&node.target, Precedence::ATOM)?;
                self.p(" := ");
                self.unparse_expr(&node.value, Precedence::ATOM)
            }
            Expr::BinOp(node) => self.unparse_bin_op(node),
            Expr::UnaryOp(node) => self.unparse_unary_op(node),
            Expr::Lambda(node) => {
                self.p("lambda");
                if !node.args.is_empty() {
                    self.p(" ");
                    self.unparse_arguments(&node.args)?;
                }
                self.p(": ");
                self.unparse_expr(&node.body, Precedence::TERNARY)
            }
            Expr::IfExp(node) => {
                self.unparse_expr(&node.body, Precedence::TERNARY.next())?;
                self.p(" if ");
                self.unparse_expr(&node.test, Precedence::TERNARY.next())?;
                self.p(" else ");
                self.unparse_expr(&node.orelse, Precedence::TERNARY)
            }
            Expr::Dict(node) => self.unparse_dict(node),
            Expr::Set(node) => self.unparse_set(node),
            Expr::ListComp(node) => {
                self.p("[");
                self.unparse_expr(&node.elt, Precedence::TERNARY)?;
                self.unparse_generators(&node.generators)?;
                self.p("]");
                Ok(())
            }
            Expr::SetComp(node) => {
                self.p("{");
                self.unparse_expr(&node.elt, Precedence::TERNARY)?;
                self.unparse_generators(&node.generators)?;
                self.p("}");
                Ok(())
            }
            Expr::DictComp(node) => {
                self.p("{");
                self.unparse_expr(&node.key, Precedence::TERNARY)?;
                self.p(": ");
                self.unparse_expr(&node.value, Precedence::TERNARY)?;
                self.unparse_generators(&node.generators)?;
                self.p("}");
                Ok(())
            }
            Expr::GeneratorExp(node) => {
                self.p("(");
                self.unparse_expr(&node.elt, Precedence::TERNARY)?;
                self.unparse_generators(&node.generators)?;
                self.p(")");
                Ok(())
            }
            Expr::Await(node) => {
                self.p("await ");
                self.unparse_expr(&node.value, Precedence::ATOM)
            }
            Expr::Yield(node) => {
                self.p("yield");
                if let Some(value) = &node.value {
                    self.p(" ");
                    self.unparse_expr(value, Precedence::TERNARY)?;
                }
                Ok(())
            }
            Expr::YieldFrom(node) => {
                self.p("yield from ");
                self.unparse_expr(&node.value, Precedence::TERNARY)
            }
            Expr::Compare(node) => self.unparse_compare(node),
            Expr::Call(node) => self.unparse_call(node),
            Expr::FormattedValue(node) => Err(InvalidAstError::new(
                "FormattedValue may only appear inside a JoinedStr",
                node.range,
            )),
            Expr::JoinedStr(node) => self.unparse_joined_str_expr(node),
            Expr::Constant(node) => {
                self.unparse_constant(&node.value, &node.kind);
                Ok(())
            }
            Expr::Attribute(node) => self.unparse_attribute(node),
            Expr::Subscript(node) => self.unparse_subscript(node),
            Expr::Starred(node) => {
                self.p("*");
                self.unparse_expr(&node.value, Precedence::TERNARY)
            }
            Expr::Name(node) => {
                self.p_id(node.id.as_str());
                Ok(())
            }
            Expr::List(node) => {
                self.p("[");
                self.comma_join(&node.elts, Precedence::LAMBDA)?;
                self.p("]");
                Ok(())
            }
            Expr::Tuple(node) => self.unparse_tuple(node),
            Expr::Slice(node) => self.unparse_slice(node),
        }
    }

    fn unparse_bool_op(&mut self, node: &pyast_python_ast::ExprBoolOp) -> Result<()> {
        let prec = node.op.precedence();
        for (i, value) in node.values.iter().enumerate() {
            if i > 0 {
                self.p(" ");
                self.p(node.op.as_str());
                self.p(" ");
            }
            self.unparse_expr(value, prec.next())?;
        }
        Ok(())
    }

    fn unparse_bin_op(&mut self, node: &pyast_python_ast::ExprBinOp) -> Result<()> {
        let prec = node.op.precedence();
        let (left_ctx, right_ctx) = match node.op.associativity() {
            Associativity::Right => (prec.next(), prec),
            _ => (prec, prec.next()),
        };
        self.unparse_expr(&node.left, left_ctx)?;
        self.p(" ");
        self.p(node.op.as_str());
        self.p(" ");
        self.unparse_expr(&node.right, right_ctx)
    }

    fn unparse_unary_op(&mut self, node: &pyast_python_ast::ExprUnaryOp) -> Result<()> {
        self.p(node.op.as_str());
        if node.op.is_not() {
            self.p(" ");
        }
        self.unparse_expr(&node.operand, node.op.precedence())
    }

    fn unparse_compare(&mut self, node: &pyast_python_ast::ExprCompare) -> Result<()> {
        if node.ops.len() != node.comparators.len() {
            return Err(InvalidAstError::new(
                "Compare.ops and Compare.comparators must have equal length",
                node.range,
            ));
        }
        if node.ops.is_empty() {
            return Err(InvalidAstError::new("Compare must have at least one comparator", node.range));
        }
        self.unparse_expr(&node.left, Precedence::COMPARISON.next())?;
        for (op, comparator) in node.ops.iter().zip(node.comparators.iter()) {
            self.p(" ");
            self.p(op.as_str());
            self.p(" ");
            self.unparse_expr(comparator, Precedence::COMPARISON.next())?;
        }
        Ok(())
    }

    fn unparse_call(&mut self, node: &pyast_python_ast::ExprCall) -> Result<()> {
        self.unparse_expr(&node.func, Precedence::ATOM)?;
        self.p("(");
        if node.args.len() == 1 && node.keywords.is_empty() {
            if let Expr::GeneratorExp(g) = &node.args[0] {
                self.unparse_expr(&g.elt, Precedence::TERNARY)?;
                self.unparse_generators(&g.generators)?;
                self.p(")");
                return Ok(());
            }
        }
        let mut first = true;
        for arg in &node.args {
            if !first {
                self.p(", ");
            }
            first = false;
            self.unparse_expr(arg, Precedence::TERNARY)?;
        }
        for kw in &node.keywords {
            if !first {
                self.p(", ");
            }
            first = false;
            self.unparse_keyword(kw)?;
        }
        self.p(")");
        Ok(())
    }

    fn unparse_dict(&mut self, node: &pyast_python_ast::ExprDict) -> Result<()> {
        self.p("{");
        for (i, (key, value)) in node.keys.iter().zip(node.values.iter()).enumerate() {
            if i > 0 {
                self.p(", ");
            }
            match key {
                Some(k) => {
                    self.unparse_expr(k, Precedence::TERNARY)?;
                    self.p(": ");
                    self.unparse_expr(value, Precedence::TERNARY)?;
                }
                None => {
                    self.p("**");
                    self.unparse_expr(value, Precedence::ATOM)?;
                }
            }
        }
        self.p("}");
        Ok(())
    }

    fn unparse_set(&mut self, node: &pyast_python_ast::ExprSet) -> Result<()> {
        if node.elts.is_empty() {
            self.p("set()");
        } else {
            self.p("{");
            self.comma_join(&node.elts, Precedence::TERNARY)?;
            self.p("}");
        }
        Ok(())
    }

    fn unparse_tuple(&mut self, node: &pyast_python_ast::ExprTuple) -> Result<()> {
        self.p("(");
        self.comma_join(&node.elts, Precedence::LAMBDA)?;
        if node.elts.len() == 1 {
            self.p(",");
        }
        self.p(")");
        Ok(())
    }

    fn unparse_attribute(&mut self, node: &pyast_python_ast::ExprAttribute) -> Result<()> {
        self.unparse_expr(&node.value, Precedence::ATOM)?;
        // `1 .real` needs the space; `x.real`/`(1.0).real` don't. An int
        // constant is the only atom whose own text can swallow a following
        // `.` as part of a float literal.
        if matches!(node.value.as_ref(), Expr::Constant(c) if matches!(c.value, Constant::Int(_))) {
            self.p(" .");
        } else {
            self.p(".");
        }
        self.p_id(node.attr.as_str());
        Ok(())
    }

    fn unparse_subscript(&mut self, node: &pyast_python_ast::ExprSubscript) -> Result<()> {
        self.unparse_expr(&node.value, Precedence::ATOM)?;
        self.p("[");
        // A multi-dimensional slice (`a[i, j:k]`) is a `Tuple` in `slice`
        // position; print its elements directly rather than through the
        // generic Tuple renderer, which would add a redundant (and here
        // invalid, since a bare `i:j` can't appear inside plain parens)
        // wrapping pair of parentheses.
        match node.slice.as_ref() {
            Expr::Tuple(t) if !t.elts.is_empty() => {
                self.comma_join(&t.elts, Precedence::LAMBDA)?;
                if t.elts.len() == 1 {
                    self.p(",");
                }
            }
            _ => self.unparse_expr(&node.slice, Precedence::LAMBDA)?,
        }
        self.p("]");
        Ok(())
    }

    fn unparse_slice(&mut self, node: &pyast_python_ast::ExprSlice) -> Result<()> {
        if let Some(lower) = &node.lower {
            self.unparse_expr(lower, Precedence::TERNARY)?;
        }
        self.p(":");
        if let Some(upper) = &node.upper {
            self.unparse_expr(upper, Precedence::TERNARY)?;
        }
        if let Some(step) = &node.step {
            self.p(":");
            self.unparse_expr(step, Precedence::TERNARY)?;
        }
        Ok(())
    }

    fn unparse_constant(&mut self, value: &Constant, kind: &Option<String>) {
        match value {
            Constant::None => self.p("None"),
            Constant::Bool(true) => self.p("True"),
            Constant::Bool(false) => self.p("False"),
            Constant::Ellipsis => self.p("..."),
            Constant::Str(s) => {
                if kind.as_deref() == Some("u") {
                    self.p("u");
                }
                self.unparse_str_literal(s);
            }
            Constant::Bytes(b) => {
                self.p("b");
                let quote = escape::preferred_quote_bytes(b, Quote::Single);
                let rendered = escape::ascii_escape(b, quote);
                self.p(&rendered);
            }
            Constant::Int(i) => {
                let rendered = int::repr(i);
                self.p(&rendered);
            }
            Constant::Float(f) => {
                let rendered = float::repr(*f);
                self.p(&rendered);
            }
            Constant::Complex { real, imag } => {
                if *real == 0.0 && real.is_sign_positive() {
                    let rendered = float::repr_imaginary(*imag);
                    self.p(&rendered);
                } else {
                    self.p("(");
                    let real_rendered = float::repr(*real);
                    self.p(&real_rendered);
                    if *imag >= 0.0 || imag.is_nan() {
                        self.p("+");
                    }
                    let imag_rendered = float::repr_imaginary(*imag);
                    self.p(&imag_rendered);
                    self.p(")");
                }
            }
            Constant::Tuple(items) => {
                self.p("(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.p(", ");
                    }
                    self.unparse_constant(item, &None);
                }
                if items.len() == 1 {
                    self.p(",");
                }
                self.p(")");
            }
        }
    }

    fn unparse_str_literal(&mut self, s: &str) {
        if s.contains('\n') {
            let triple_quote = escape::preferred_triple_quote(s);
            let rendered = escape::triple_quote_escape(s, triple_quote);
            self.p(&rendered);
            return;
        }
        let preferred = escape::preferred_quote(s, Quote::Single);
        let quote = match self.fstring_quote {
            Some(banned) if banned == preferred => preferred.opposite(),
            _ => preferred,
        };
        let rendered = escape::unicode_escape(s, quote);
        self.p(&rendered);
    }

    fn unparse_joined_str_expr(&mut self, node: &ExprJoinedStr) -> Result<()> {
        let literal_concat: String = node
            .values
            .iter()
            .filter_map(|v| match v {
                Expr::Constant(c) => match &c.value {
                    Constant::Str(s) => Some(s.as_str()),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        let preferred = escape::preferred_quote(&literal_concat, Quote::Single);
        let quote = match self.fstring_quote {
            Some(banned) if banned == preferred => preferred.opposite(),
            _ => preferred,
        };
        self.p("f");
        self.buffer.push(quote.as_char());
        let body = self.render_joined_str_body(node, quote)?;
        self.p(&body);
        self.buffer.push(quote.as_char());
        Ok(())
    }

    /// Renders the (quote-delimiter-free) text between an f-string's
    /// quotes: literal segments escaped against `quote`, replacement
    /// fields rendered via a nested sub-`Generator`. Shared between the
    /// top-level `JoinedStr` and a `FormattedValue.format_spec`, which is
    /// itself always a `JoinedStr` sharing the enclosing f-string's quote.
    fn render_joined_str_body(&self, node: &ExprJoinedStr, quote: Quote) -> Result<String> {
        let mut out = String::new();
        for value in &node.values {
            match value {
                Expr::Constant(c) => match &c.value {
                    Constant::Str(s) => {
                        let escaped = escape::unicode_escape_body(s, quote);
                        // `{`/`}` are always ASCII and untouched by the escape
                        // loop above, so doubling them afterwards can't
                        // collide with anything it emitted.
                        out.push_str(&escaped.replace('{', "{{").replace('}', "}}"));
                    }
                    _ => return Err(InvalidAstError::new("JoinedStr literal segment must be a string constant", c.range)),
                },
                Expr::FormattedValue(fv) => self.render_formatted_value(fv, quote, &mut out)?,
                other => {
                    return Err(InvalidAstError::new(
                        "JoinedStr value must be Constant or FormattedValue",
                        other.range(),
                    ))
                }
            }
        }
        Ok(out)
    }

    fn render_formatted_value(&self, fv: &ExprFormattedValue, quote: Quote, out: &mut String) -> Result<()> {
        out.push('{');
        let mut sub = self.nested();
        sub.fstring_quote = Some(quote);
        sub.unparse_expr(&fv.value, Precedence::TERNARY)?;
        let text = sub.into_string();
        if text.starts_with('{') {
            out.push(' ');
        }
        out.push_str(&text);
        if let Some(c) = fv.conversion.as_char() {
            out.push('!');
            out.push(c);
        }
        if let Some(spec) = &fv.format_spec {
            out.push(':');
            match spec.as_ref() {
                Expr::JoinedStr(j) => out.push_str(&self.render_joined_str_body(j, quote)?),
                other => return Err(InvalidAstError::new("format_spec must be a JoinedStr", other.range())),
            }
        }
        out.push('}');
        Ok(())
    }

    fn unparse_pattern(&mut self, pattern: &Pattern) -> Result<()> {
        match pattern {
            Pattern::MatchValue(p) => self.unparse_expr(&p.value, Precedence::LAMBDA),
            Pattern::MatchSingleton(p) => {
                self.unparse_constant(&p.value, &None);
                Ok(())
            }
            Pattern::MatchSequence(p) => {
                self.p("[");
                for (i, sub) in p.patterns.iter().enumerate() {
                    if i > 0 {
                        self.p(", ");
                    }
                    self.unparse_pattern(sub)?;
                }
                self.p("]");
                Ok(())
            }
            Pattern::MatchMapping(p) => {
                self.p("{");
                let mut first = true;
                for (key, sub) in p.keys.iter().zip(p.patterns.iter()) {
                    if !first {
                        self.p(", ");
                    }
                    first = false;
                    self.unparse_expr(key, Precedence::LAMBDA)?;
                    self.p(": ");
                    self.unparse_pattern(sub)?;
                }
                if let Some(rest) = &p.rest {
                    if !first {
                        self.p(", ");
                    }
                    self.p("**");
                    self.p_id(rest.as_str());
                }
                self.p("}");
                Ok(())
            }
            Pattern::MatchClass(p) => {
                self.unparse_expr(&p.cls, Precedence::ATOM)?;
                self.p("(");
                let mut first = true;
                for sub in &p.patterns {
                    if !first {
                        self.p(", ");
                    }
                    first = false;
                    self.unparse_pattern(sub)?;
                }
                for (attr, sub) in p.kwd_attrs.iter().zip(p.kwd_patterns.iter()) {
                    if !first {
                        self.p(", ");
                    }
                    first = false;
                    self.p_id(attr.as_str());
                    self.p("=");
                    self.unparse_pattern(sub)?;
                }
                self.p(")");
                Ok(())
            }
            Pattern::MatchStar(p) => {
                self.p("*");
                self.p_id(p.name.as_deref().unwrap_or("_"));
                Ok(())
            }
            Pattern::MatchAs(p) => {
                match (&p.pattern, &p.name) {
                    (Some(sub), Some(name)) => {
                        self.unparse_pattern(sub)?;
                        self.p(" as ");
                        self.p_id(name.as_str());
                    }
                    (Some(sub), None) => self.unparse_pattern(sub)?,
                    (None, Some(name)) => self.p_id(name.as_str()),
                    (None, None) => self.p("_"),
                }
                Ok(())
            }
            Pattern::MatchOr(p) => {
                for (i, sub) in p.patterns.iter().enumerate() {
                    if i > 0 {
                        self.p(" | ");
                    }
                    self.unparse_pattern(sub)?;
                }
                Ok(())
            }
        }
    }
}
