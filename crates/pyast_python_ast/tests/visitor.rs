use std::fmt::Write;

use pyast_python_ast::visitor::{walk_expr, walk_stmt, Visitor};
use pyast_python_ast::{AnyNodeRef, Expr, Stmt};
use pyast_python_parser::parse_module;

fn trace_visitation(source: &str) -> String {
    let parsed = parse_module(source).unwrap();

    let mut visitor = RecordVisitor::default();
    visitor.visit_body(&parsed.body);
    visitor.output
}

#[derive(Default)]
struct RecordVisitor {
    depth: usize,
    output: String,
}

impl RecordVisitor {
    fn enter_node<'a, T>(&mut self, node: T)
    where
        T: Into<AnyNodeRef<'a>>,
    {
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
        writeln!(self.output, "- {}", node.into().kind()).unwrap();
        self.depth += 1;
    }

    fn exit_node(&mut self) {
        self.depth -= 1;
    }
}

impl Visitor<'_> for RecordVisitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.enter_node(stmt);
        walk_stmt(self, stmt);
        self.exit_node();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.enter_node(expr);
        walk_expr(self, expr);
        self.exit_node();
    }
}

#[test]
fn function_arguments() {
    let trace = trace_visitation("def a(b, c, /, d, e=20, *args, named=5, **kwargs): pass");
    assert!(trace.contains("StmtFunctionDef"));
    assert!(trace.contains("StmtPass"));
}

#[test]
fn compare_chain() {
    let trace = trace_visitation("4 < x < 5");
    assert_eq!(trace.matches("ExprCompare").count(), 1);
    assert_eq!(trace.matches("ExprName").count(), 1);
    assert_eq!(trace.matches("ExprConstant").count(), 2);
}

#[test]
fn list_comprehension() {
    let trace = trace_visitation("[x for x in numbers]");
    assert!(trace.contains("ExprListComp"));
}

#[test]
fn dict_comprehension() {
    let trace = trace_visitation("{x: x**2 for x in numbers}");
    assert!(trace.contains("ExprDictComp"));
    assert!(trace.contains("ExprBinOp"));
}

#[test]
fn decorators() {
    let trace = trace_visitation("@decorator\ndef a():\n    pass\n\n@test\nclass A:\n    pass\n");
    assert!(trace.contains("StmtFunctionDef"));
    assert!(trace.contains("StmtClassDef"));
}

#[test]
fn match_class_pattern() {
    let trace = trace_visitation(
        "match x:\n    case Point2D(0, 0):\n        ...\n    case Point3D(x=0, y=0, z=0):\n        ...\n",
    );
    assert!(trace.contains("StmtMatch"));
}
