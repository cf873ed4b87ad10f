//! Source-order (post-order-ish, but depth-first left-to-right) visitor.
//!
//! Unlike [`crate::preorder`], this visitor has one method per node
//! *category* (`visit_stmt`, `visit_expr`, ...) rather than one per concrete
//! kind, and the default `walk_*` free functions recurse into children
//! without the caller having to know the field layout of every node.

use crate::nodes::*;

pub trait Visitor<'a> {
    fn visit_mod(&mut self, module: &'a Mod) {
        walk_mod(self, module);
    }
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_expr(self, expr);
    }
    /// Visits an expression in annotation position (e.g. a parameter
    /// annotation or a return type). Distinguished from `visit_expr` so a
    /// visitor can skip type annotations cheaply.
    fn visit_annotation(&mut self, expr: &'a Expr) {
        self.visit_expr(expr);
    }
    fn visit_format_spec(&mut self, expr: &'a Expr) {
        self.visit_expr(expr);
    }
    fn visit_pattern(&mut self, pattern: &'a Pattern) {
        walk_pattern(self, pattern);
    }
    fn visit_body(&mut self, body: &'a [Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }
    fn visit_arguments(&mut self, arguments: &'a Arguments) {
        walk_arguments(self, arguments);
    }
    fn visit_arg(&mut self, arg: &'a Arg) {
        walk_arg(self, arg);
    }
    fn visit_keyword(&mut self, keyword: &'a Keyword) {
        walk_keyword(self, keyword);
    }
    fn visit_alias(&mut self, alias: &'a Alias) {
        walk_alias(self, alias);
    }
    fn visit_with_item(&mut self, with_item: &'a WithItem) {
        walk_with_item(self, with_item);
    }
    fn visit_comprehension(&mut self, comprehension: &'a Comprehension) {
        walk_comprehension(self, comprehension);
    }
    fn visit_except_handler(&mut self, handler: &'a ExceptHandler) {
        walk_except_handler(self, handler);
    }
    fn visit_match_case(&mut self, case: &'a MatchCase) {
        walk_match_case(self, case);
    }
    fn visit_bool_op(&mut self, _bool_op: &'a BoolOp) {}
    fn visit_operator(&mut self, _operator: &'a Operator) {}
    fn visit_unary_op(&mut self, _unary_op: &'a UnaryOp) {}
    fn visit_cmp_op(&mut self, _cmp_op: &'a CmpOp) {}
    fn visit_expr_context(&mut self, _ctx: &'a ExprContext) {}
}

pub fn walk_mod<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, module: &'a Mod) {
    match module {
        Mod::Module(node) => visitor.visit_body(&node.body),
        Mod::Expression(node) => visitor.visit_expr(&node.body),
        Mod::Interactive(node) => visitor.visit_body(&node.body),
    }
}

pub fn walk_stmt<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, stmt: &'a Stmt) {
    match stmt {
        Stmt::FunctionDef(node) => {
            for decorator in &node.decorator_list {
                visitor.visit_expr(decorator);
            }
            visitor.visit_arguments(&node.args);
            if let Some(returns) = &node.returns {
                visitor.visit_annotation(returns);
            }
            visitor.visit_body(&node.body);
        }
        Stmt::ClassDef(node) => {
            for decorator in &node.decorator_list {
                visitor.visit_expr(decorator);
            }
            for base in &node.bases {
                visitor.visit_expr(base);
            }
            for keyword in &node.keywords {
                visitor.visit_keyword(keyword);
            }
            visitor.visit_body(&node.body);
        }
        Stmt::Return(node) => {
            if let Some(value) = &node.value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Delete(node) => {
            for target in &node.targets {
                visitor.visit_expr(target);
            }
        }
        Stmt::Assign(node) => {
            for target in &node.targets {
                visitor.visit_expr(target);
            }
            visitor.visit_expr(&node.value);
        }
        Stmt::AugAssign(node) => {
            visitor.visit_expr(&node.target);
            visitor.visit_operator(&node.op);
            visitor.visit_expr(&node.value);
        }
        Stmt::AnnAssign(node) => {
            visitor.visit_expr(&node.target);
            visitor.visit_annotation(&node.annotation);
            if let Some(value) = &node.value {
                visitor.visit_expr(value);
            }
        }
        Stmt::For(node) => {
            visitor.visit_expr(&node.target);
            visitor.visit_expr(&node.iter);
            visitor.visit_body(&node.body);
            visitor.visit_body(&node.orelse);
        }
        Stmt::While(node) => {
            visitor.visit_expr(&node.test);
            visitor.visit_body(&node.body);
            visitor.visit_body(&node.orelse);
        }
        Stmt::If(node) => {
            visitor.visit_expr(&node.test);
            visitor.visit_body(&node.body);
            visitor.visit_body(&node.orelse);
        }
        Stmt::With(node) => {
            for item in &node.items {
                visitor.visit_with_item(item);
            }
            visitor.visit_body(&node.body);
        }
        Stmt::Raise(node) => {
            if let Some(exc) = &node.exc {
                visitor.visit_expr(exc);
            }
            if let Some(cause) = &node.cause {
                visitor.visit_expr(cause);
            }
        }
        Stmt::Try(node) => {
            visitor.visit_body(&node.body);
            for handler in &node.handlers {
                visitor.visit_except_handler(handler);
            }
            visitor.visit_body(&node.orelse);
            visitor.visit_body(&node.finalbody);
        }
        Stmt::TryStar(node) => {
            visitor.visit_body(&node.body);
            for handler in &node.handlers {
                visitor.visit_except_handler(handler);
            }
            visitor.visit_body(&node.orelse);
            visitor.visit_body(&node.finalbody);
        }
        Stmt::Assert(node) => {
            visitor.visit_expr(&node.test);
            if let Some(msg) = &node.msg {
                visitor.visit_expr(msg);
            }
        }
        Stmt::Import(node) => {
            for alias in &node.names {
                visitor.visit_alias(alias);
            }
        }
        Stmt::ImportFrom(node) => {
            for alias in &node.names {
                visitor.visit_alias(alias);
            }
        }
        Stmt::Global(_) | Stmt::Nonlocal(_) => {}
        Stmt::Expr(node) => visitor.visit_expr(&node.value),
        Stmt::Pass(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::Match(node) => {
            visitor.visit_expr(&node.subject);
            for case in &node.cases {
                visitor.visit_match_case(case);
            }
        }
    }
}

pub fn walk_expr<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, expr: &'a Expr) {
    match expr {
        Expr::BoolOp(node) => {
            visitor.visit_bool_op(&node.op);
            for value in &node.values {
                visitor.visit_expr(value);
            }
        }
        Expr::NamedExpr(node) => {
            visitor.visit_expr(&node.target);
            visitor.visit_expr(&node.value);
        }
        Expr::BinOp(node) => {
            visitor.visit_expr(&node.left);
            visitor.visit_operator(&node.op);
            visitor.visit_expr(&node.right);
        }
        Expr::UnaryOp(node) => {
            visitor.visit_unary_op(&node.op);
            visitor.visit_expr(&node.operand);
        }
        Expr::Lambda(node) => {
            visitor.visit_arguments(&node.args);
            visitor.visit_expr(&node.body);
        }
        Expr::IfExp(node) => {
            visitor.visit_expr(&node.test);
            visitor.visit_expr(&node.body);
            visitor.visit_expr(&node.orelse);
        }
        Expr::Dict(node) => {
            for key in node.keys.iter().flatten() {
                visitor.visit_expr(key);
            }
            for value in &node.values {
                visitor.visit_expr(value);
            }
        }
        Expr::Set(node) => {
            for elt in &node.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::ListComp(node) => {
            visitor.visit_expr(&node.elt);
            for comp in &node.generators {
                visitor.visit_comprehension(comp);
            }
        }
        Expr::SetComp(node) => {
            visitor.visit_expr(&node.elt);
            for comp in &node.generators {
                visitor.visit_comprehension(comp);
            }
        }
        Expr::DictComp(node) => {
            visitor.visit_expr(&node.key);
            visitor.visit_expr(&node.value);
            for comp in &node.generators {
                visitor.visit_comprehension(comp);
            }
        }
        Expr::GeneratorExp(node) => {
            visitor.visit_expr(&node.elt);
            for comp in &node.generators {
                visitor.visit_comprehension(comp);
            }
        }
        Expr::Await(node) => visitor.visit_expr(&node.value),
        Expr::Yield(node) => {
            if let Some(value) = &node.value {
                visitor.visit_expr(value);
            }
        }
        Expr::YieldFrom(node) => visitor.visit_expr(&node.value),
        Expr::Compare(node) => {
            visitor.visit_expr(&node.left);
            for op in &node.ops {
                visitor.visit_cmp_op(op);
            }
            for comparator in &node.comparators {
                visitor.visit_expr(comparator);
            }
        }
        Expr::Call(node) => {
            visitor.visit_expr(&node.func);
            for arg in &node.args {
                visitor.visit_expr(arg);
            }
            for keyword in &node.keywords {
                visitor.visit_keyword(keyword);
            }
        }
        Expr::FormattedValue(node) => {
            visitor.visit_expr(&node.value);
            if let Some(format_spec) = &node.format_spec {
                visitor.visit_format_spec(format_spec);
            }
        }
        Expr::JoinedStr(node) => {
            for value in &node.values {
                visitor.visit_expr(value);
            }
        }
        Expr::Constant(_) => {}
        Expr::Attribute(node) => visitor.visit_expr(&node.value),
        Expr::Subscript(node) => {
            visitor.visit_expr(&node.value);
            visitor.visit_expr(&node.slice);
        }
        Expr::Starred(node) => visitor.visit_expr(&node.value),
        Expr::Name(_) => {}
        Expr::List(node) => {
            for elt in &node.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::Tuple(node) => {
            for elt in &node.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::Slice(node) => {
            if let Some(lower) = &node.lower {
                visitor.visit_expr(lower);
            }
            if let Some(upper) = &node.upper {
                visitor.visit_expr(upper);
            }
            if let Some(step) = &node.step {
                visitor.visit_expr(step);
            }
        }
    }
}

pub fn walk_pattern<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, pattern: &'a Pattern) {
    match pattern {
        Pattern::MatchValue(node) => visitor.visit_expr(&node.value),
        Pattern::MatchSingleton(_) => {}
        Pattern::MatchSequence(node) => {
            for pattern in &node.patterns {
                visitor.visit_pattern(pattern);
            }
        }
        Pattern::MatchMapping(node) => {
            for key in &node.keys {
                visitor.visit_expr(key);
            }
            for pattern in &node.patterns {
                visitor.visit_pattern(pattern);
            }
        }
        Pattern::MatchClass(node) => {
            visitor.visit_expr(&node.cls);
            for pattern in &node.patterns {
                visitor.visit_pattern(pattern);
            }
            for pattern in &node.kwd_patterns {
                visitor.visit_pattern(pattern);
            }
        }
        Pattern::MatchStar(_) => {}
        Pattern::MatchAs(node) => {
            if let Some(pattern) = &node.pattern {
                visitor.visit_pattern(pattern);
            }
        }
        Pattern::MatchOr(node) => {
            for pattern in &node.patterns {
                visitor.visit_pattern(pattern);
            }
        }
    }
}

pub fn walk_arguments<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, arguments: &'a Arguments) {
    for arg in arguments.posonlyargs.iter().chain(arguments.args.iter()) {
        visitor.visit_arg(arg);
    }
    if let Some(vararg) = &arguments.vararg {
        visitor.visit_arg(vararg);
    }
    for arg in &arguments.kwonlyargs {
        visitor.visit_arg(arg);
    }
    if let Some(kwarg) = &arguments.kwarg {
        visitor.visit_arg(kwarg);
    }
    for default in arguments.kw_defaults.iter().flatten() {
        visitor.visit_expr(default);
    }
    for default in &arguments.defaults {
        visitor.visit_expr(default);
    }
}

pub fn walk_arg<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, arg: &'a Arg) {
    if let Some(annotation) = &arg.annotation {
        visitor.visit_annotation(annotation);
    }
}

pub fn walk_keyword<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, keyword: &'a Keyword) {
    visitor.visit_expr(&keyword.value);
}

pub fn walk_alias<'a, V: Visitor<'a> + ?Sized>(_visitor: &mut V, _alias: &'a Alias) {}

pub fn walk_with_item<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, with_item: &'a WithItem) {
    visitor.visit_expr(&with_item.context_expr);
    if let Some(optional_vars) = &with_item.optional_vars {
        visitor.visit_expr(optional_vars);
    }
}

pub fn walk_comprehension<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    comprehension: &'a Comprehension,
) {
    visitor.visit_expr(&comprehension.target);
    visitor.visit_expr(&comprehension.iter);
    for condition in &comprehension.ifs {
        visitor.visit_expr(condition);
    }
}

pub fn walk_except_handler<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    handler: &'a ExceptHandler,
) {
    if let Some(type_) = &handler.type_ {
        visitor.visit_expr(type_);
    }
    visitor.visit_body(&handler.body);
}

pub fn walk_match_case<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, case: &'a MatchCase) {
    visitor.visit_pattern(&case.pattern);
    if let Some(guard) = &case.guard {
        visitor.visit_expr(guard);
    }
    visitor.visit_body(&case.body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AnyNodeRef;
    use pyast_python_parser::parse_module;

    struct Tracer {
        trace: Vec<&'static str>,
    }

    impl<'a> Visitor<'a> for Tracer {
        fn visit_stmt(&mut self, stmt: &'a Stmt) {
            self.trace.push(AnyNodeRef::from(stmt).kind());
            walk_stmt(self, stmt);
        }
        fn visit_expr(&mut self, expr: &'a Expr) {
            self.trace.push(AnyNodeRef::from(expr).kind());
            walk_expr(self, expr);
        }
        fn visit_pattern(&mut self, pattern: &'a Pattern) {
            self.trace.push(AnyNodeRef::from(pattern).kind());
            walk_pattern(self, pattern);
        }
    }

    fn trace_visitation(source: &str) -> Vec<&'static str> {
        let module = parse_module(source).expect("parses");
        let mut tracer = Tracer { trace: Vec::new() };
        for stmt in &module.body {
            tracer.visit_stmt(stmt);
        }
        tracer.trace
    }

    #[test]
    fn compare_visits_left_then_each_comparator() {
        assert_eq!(
            trace_visitation("4 < x < 5"),
            vec!["StmtExpr", "ExprCompare", "ExprConstant", "ExprName", "ExprConstant"]
        );
    }

    #[test]
    fn list_comprehension_visits_element_then_generator() {
        assert_eq!(
            trace_visitation("[x for x in numbers]"),
            vec!["StmtExpr", "ExprListComp", "ExprName", "ExprName", "ExprName"]
        );
    }

    #[test]
    fn if_statement_visits_test_then_body_then_orelse() {
        assert_eq!(
            trace_visitation("if a:\n    b\nelse:\n    c\n"),
            vec![
                "StmtIf", "ExprName", "StmtExpr", "ExprName", "StmtExpr", "ExprName"
            ]
        );
    }

    #[test]
    fn match_case_visits_pattern_then_body() {
        assert_eq!(
            trace_visitation("match p:\n    case [x]:\n        y\n"),
            vec![
                "StmtMatch",
                "ExprName",
                "PatternMatchSequence",
                "PatternMatchAs",
                "StmtExpr",
                "ExprName",
            ]
        );
    }
}
