//! §6 `dump(node, options?) → string`: the debug pretty-printer, in the
//! canonical `NodeKind(field=value, …)` form CPython's `ast.dump` uses.
//!
//! Built generically off `pyast_python_ast::fields`/`AnyNodeRef` rather
//! than one formatter per node kind (§9 "tagged variants, not class
//! hierarchies" — the same reflection layer `walk`/`iterFields` share).

use pyast_python_ast::{AnyNodeRef, Constant, FieldValue};
use pyast_python_codegen::{unparse_expr, UnparseOptions};
use pyast_python_ast::{Expr, ExprConstant};
use pyast_text_size::{Ranged, TextRange};

/// `indent` (§6): either a column count (spaces) or a literal string, the
/// way CPython's `ast.dump(indent=...)` accepts either an `int` or a `str`.
#[derive(Clone, Debug)]
pub enum Indent {
    Width(usize),
    Str(String),
}

impl Indent {
    fn as_str(&self, buf: &mut String) {
        match self {
            Indent::Width(n) => {
                for _ in 0..*n {
                    buf.push(' ');
                }
            }
            Indent::Str(s) => buf.push_str(s),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DumpOptions {
    pub annotate_fields: bool,
    pub include_attributes: bool,
    pub indent: Option<Indent>,
    pub show_empty: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            annotate_fields: true,
            include_attributes: false,
            indent: None,
            show_empty: false,
        }
    }
}

/// §6 `dump`. The AST here stores byte ranges (`TextRange`), not the
/// materialized `(lineno, col_offset)` pairs CPython's nodes carry
/// directly (translating one into the other needs the source text, which
/// `dump`'s signature does not take — see `DESIGN.md`). When
/// `include_attributes` is set this prints the node's byte range instead
/// of CPython's four `lineno`/`col_offset`/`end_lineno`/`end_col_offset`
/// fields.
pub fn dump<'a>(node: impl Into<AnyNodeRef<'a>>, options: &DumpOptions) -> String {
    let mut out = String::new();
    write_node(&mut out, node.into(), options, 0);
    out
}

fn write_node(out: &mut String, node: AnyNodeRef<'_>, options: &DumpOptions, depth: usize) {
    out.push_str(bare_kind(node.kind()));
    out.push('(');

    let all_fields = pyast_python_ast::fields(node);
    let entries: Vec<(&str, FieldValue<'_>)> = if options.show_empty {
        all_fields
    } else {
        all_fields.into_iter().filter(|(_, v)| !is_empty(v)).collect()
    };

    let had_entries = !entries.is_empty();
    let multiline = options.indent.is_some() && had_entries;
    let child_depth = depth + 1;

    for (i, (name, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
            if !multiline {
                out.push(' ');
            }
        }
        if multiline {
            out.push('\n');
            push_indent(out, options, child_depth);
        }
        if options.annotate_fields {
            out.push_str(name);
            out.push('=');
        }
        write_field_value(out, value, options, child_depth);
    }

    if options.include_attributes {
        write_attributes(out, node.range(), options, child_depth, multiline, had_entries);
    }

    if multiline {
        out.push('\n');
        push_indent(out, options, depth);
    }
    out.push(')');
}

fn write_attributes(
    out: &mut String,
    range: TextRange,
    options: &DumpOptions,
    depth: usize,
    multiline: bool,
    had_preceding_entries: bool,
) {
    let attrs: [(&str, u32); 2] = [
        ("range_start", range.start().to_u32()),
        ("range_end", range.end().to_u32()),
    ];
    for (i, (name, value)) in attrs.into_iter().enumerate() {
        if i > 0 || had_preceding_entries {
            out.push(',');
            if !multiline {
                out.push(' ');
            }
        }
        if multiline {
            out.push('\n');
            push_indent(out, options, depth);
        }
        if options.annotate_fields {
            out.push_str(name);
            out.push('=');
        }
        out.push_str(&value.to_string());
    }
}

fn push_indent(out: &mut String, options: &DumpOptions, depth: usize) {
    if let Some(indent) = &options.indent {
        for _ in 0..depth {
            indent.as_str(out);
        }
    }
}

fn write_field_value(out: &mut String, value: FieldValue<'_>, options: &DumpOptions, depth: usize) {
    match value {
        FieldValue::Node(child) => write_node(out, child, options, depth),
        FieldValue::NodeOpt(Some(child)) => write_node(out, child, options, depth),
        FieldValue::NodeOpt(None) => out.push_str("None"),
        FieldValue::Nodes(children) => {
            write_list(out, children.into_iter(), options, depth, |out, child, options, depth| {
                write_node(out, child, options, depth)
            })
        }
        FieldValue::OptionalNodes(children) => {
            write_list(out, children.into_iter(), options, depth, |out, child, options, depth| {
                match child {
                    Some(child) => write_node(out, child, options, depth),
                    None => out.push_str("None"),
                }
            })
        }
        FieldValue::Identifier(s) => out.push_str(&str_repr(s)),
        FieldValue::Identifiers(items) => {
            write_list(out, items.into_iter(), options, depth, |out, s, _, _| {
                out.push_str(&str_repr(s))
            })
        }
        FieldValue::OptIdentifier(Some(s)) => out.push_str(&str_repr(s)),
        FieldValue::OptIdentifier(None) => out.push_str("None"),
        FieldValue::Constant(c) => out.push_str(&constant_repr(c)),
        FieldValue::Str(s) => out.push_str(&str_repr(s)),
        FieldValue::OptStr(Some(s)) => out.push_str(&str_repr(s)),
        FieldValue::OptStr(None) => out.push_str("None"),
        FieldValue::Int(n) => out.push_str(&n.to_string()),
        FieldValue::Bool(b) => out.push_str(if b { "True" } else { "False" }),
        FieldValue::OperatorTag(tag) => write_operator_tag(out, tag),
        FieldValue::OperatorTags(tags) => {
            write_list(out, tags.into_iter(), options, depth, |out, tag, _, _| {
                write_operator_tag(out, tag)
            })
        }
    }
}

/// `op`/`ctx`/`ops` fields hold an ASDL constructor name (`"Add"`,
/// `"Load"`, `"Lt"`, ...) that CPython represents as a zero-argument
/// constructor instance (`Add()`, `Load()`, `Lt()`) rather than a quoted
/// string.
fn write_operator_tag(out: &mut String, tag: &str) {
    out.push_str(tag);
    out.push_str("()");
}

fn write_list<T>(
    out: &mut String,
    items: impl ExactSizeIterator<Item = T>,
    options: &DumpOptions,
    depth: usize,
    mut write_one: impl FnMut(&mut String, T, &DumpOptions, usize),
) {
    out.push('[');
    let multiline = options.indent.is_some() && items.len() > 0;
    let inner_depth = depth + 1;
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(',');
            if !multiline {
                out.push(' ');
            }
        }
        if multiline {
            out.push('\n');
            push_indent(out, options, inner_depth);
        }
        write_one(out, item, options, inner_depth);
    }
    if multiline {
        out.push('\n');
        push_indent(out, options, depth);
    }
    out.push(']');
}

fn is_empty(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Nodes(v) => v.is_empty(),
        FieldValue::OptionalNodes(v) => v.is_empty(),
        FieldValue::Identifiers(v) => v.is_empty(),
        FieldValue::OperatorTags(v) => v.is_empty(),
        FieldValue::NodeOpt(v) => v.is_none(),
        FieldValue::OptIdentifier(v) => v.is_none(),
        FieldValue::OptStr(v) => v.is_none(),
        _ => false,
    }
}

/// Strips the `Mod`/`Stmt`/`Expr`/`Pattern` category prefix `AnyNodeRef`'s
/// `kind()` carries, recovering the bare ASDL constructor name (e.g.
/// `StmtFunctionDef` -> `FunctionDef`) `ast.dump` uses.
fn bare_kind(kind: &str) -> &str {
    for prefix in ["Mod", "Stmt", "Expr", "Pattern"] {
        if let Some(rest) = kind.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    kind
}

fn str_repr(s: &str) -> String {
    let expr = Expr::Constant(ExprConstant {
        range: TextRange::default(),
        value: Constant::Str(s.to_string()),
        kind: None,
    });
    unparse_expr(&expr, &UnparseOptions::default()).unwrap_or_else(|_| format!("{s:?}"))
}

/// Renders a `Constant` the way `repr()` would, by reusing the unparser's
/// own literal formatting (§4.3) instead of re-implementing quoting here.
fn constant_repr(value: &Constant) -> String {
    let expr = Expr::Constant(ExprConstant {
        range: TextRange::default(),
        value: value.clone(),
        kind: None,
    });
    unparse_expr(&expr, &UnparseOptions::default()).unwrap_or_else(|_| "<?>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyast_python_ast::Mod;
    use pyast_python_parser::parse_module;

    #[test]
    fn dumps_simple_assignment() {
        let module = parse_module("x = 1").expect("parses");
        let dumped = dump(&Mod::Module(module), &DumpOptions::default());
        assert_eq!(
            dumped,
            "Module(body=[Assign(targets=[Name(id='x', ctx=Store())], value=Constant(value=1))])"
        );
    }

    #[test]
    fn dumps_operator_tags_as_constructor_calls() {
        let module = parse_module("1 + 2 < 3 < 4 and 5").expect("parses");
        let dumped = dump(&Mod::Module(module), &DumpOptions::default());
        assert_eq!(
            dumped,
            "Module(body=[Expr(value=BoolOp(op=And(), values=[Compare(left=BinOp(left=Constant(value=1), \
             op=Add(), right=Constant(value=2)), ops=[Lt(), Lt()], comparators=[Constant(value=3), \
             Constant(value=4)]), Constant(value=5)]))])"
        );
    }

    #[test]
    fn show_empty_reveals_vestigial_fields() {
        let module = parse_module("x = 1").expect("parses");
        let compact = dump(&Mod::Module(module.clone()), &DumpOptions::default());
        let verbose = dump(
            &Mod::Module(module),
            &DumpOptions {
                show_empty: true,
                ..DumpOptions::default()
            },
        );
        assert!(!compact.contains("type_ignores"));
        assert!(verbose.contains("type_ignores=[]"));
    }

    #[test]
    fn indent_inserts_newlines() {
        let module = parse_module("x = 1").expect("parses");
        let dumped = dump(
            &Mod::Module(module),
            &DumpOptions {
                indent: Some(Indent::Width(2)),
                ..DumpOptions::default()
            },
        );
        assert!(dumped.contains('\n'));
        assert!(dumped.starts_with("Module(\n  body=["));
    }

    #[test]
    fn dumps_function_with_default_and_varargs() {
        let module = parse_module("def f(a, b=1, *args, **kwargs):\n    return a\n").expect("parses");
        let dumped = dump(&Mod::Module(module), &DumpOptions::default());
        insta::assert_snapshot!(dumped, @r###"Module(body=[FunctionDef(name='f', args=Arguments(args=[Arg(arg='a'), Arg(arg='b')], vararg=Arg(arg='args'), kwarg=Arg(arg='kwargs'), defaults=[Constant(value=1)]), body=[Return(value=Name(id='a', ctx=Load()))])])"###);
    }

    #[test]
    fn unannotated_fields_omit_names() {
        let module = parse_module("x = 1").expect("parses");
        let dumped = dump(
            &Mod::Module(module),
            &DumpOptions {
                annotate_fields: false,
                ..DumpOptions::default()
            },
        );
        assert!(!dumped.contains("body="));
        assert!(dumped.starts_with("Module(["));
    }
}
