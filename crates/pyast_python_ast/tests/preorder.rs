use std::fmt::Write;

use pyast_python_ast::preorder::{PreorderVisitor, Singleton, TraversalSignal};
use pyast_python_ast::AnyNodeRef;
use pyast_python_parser::parse_module;

fn trace_preorder_visitation(source: &str) -> String {
    let parsed = parse_module(source).unwrap();
    let module = pyast_python_ast::Mod::Module(parsed);

    let mut visitor = RecordVisitor::default();
    visitor.visit_mod(&module);
    visitor.output
}

#[derive(Default)]
struct RecordVisitor {
    depth: usize,
    output: String,
}

impl<'a> PreorderVisitor<'a> for RecordVisitor {
    fn enter_node(&mut self, node: AnyNodeRef<'a>) -> TraversalSignal {
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
        writeln!(self.output, "- {}", node.kind()).unwrap();
        self.depth += 1;
        TraversalSignal::Traverse
    }

    fn leave_node(&mut self, _node: AnyNodeRef<'a>) {
        self.depth -= 1;
    }

    fn visit_singleton(&mut self, singleton: &Singleton) {
        writeln!(self.output, "{}- {singleton:?}", "  ".repeat(self.depth)).unwrap();
    }
}

#[test]
fn function_arguments() {
    let trace = trace_preorder_visitation("def a(b, c, /, d, e=20, *args, **kwargs): pass");
    assert!(trace.contains("ModModule"));
    assert!(trace.contains("StmtFunctionDef"));
    assert!(trace.contains("Arguments"));
    assert!(trace.contains("Arg"));
}

#[test]
fn compare() {
    let trace = trace_preorder_visitation("4 < x < 5");
    assert!(trace.contains("ExprCompare"));
    assert_eq!(trace.matches("ExprConstant").count(), 2);
}

#[test]
fn list_comprehension() {
    let trace = trace_preorder_visitation("[x for x in numbers]");
    assert!(trace.contains("ExprListComp"));
    assert!(trace.contains("Comprehension"));
}

#[test]
fn singleton_constants() {
    let trace = trace_preorder_visitation("x = None\ny = True\nz = False");
    assert!(trace.contains("None"));
    assert!(trace.contains("True"));
    assert!(trace.contains("False"));
}

#[test]
fn match_class_pattern() {
    let trace = trace_preorder_visitation(
        "match x:\n    case Point2D(0, 0):\n        ...\n    case Point3D(x=0, y=0, z=0):\n        ...\n",
    );
    assert!(trace.contains("StmtMatch"));
    assert!(trace.contains("MatchCase"));
    assert!(trace.contains("PatternMatchClass"));
}
