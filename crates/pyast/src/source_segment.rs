//! §6 `getSourceSegment(source, node, padded?) → string | null`: slices the
//! original source using a node's location.

use pyast_source_file::LineIndex;
use pyast_text_size::Ranged;

/// Returns the substring of `source` that `node` spans, or `None` if the
/// node's range falls outside `source` (e.g. it was built by hand rather
/// than produced by `parse`).
///
/// When `padded` is set, the result is left-padded with spaces so the
/// start of the (possibly multi-line) segment lines up with the column it
/// originally started at — CPython's `ast.get_source_segment(padded=True)`
/// behavior, useful when re-inserting the segment at column 0 elsewhere.
pub fn get_source_segment(source: &str, node: &impl Ranged, padded: bool) -> Option<String> {
    let range = node.range();
    if range.end().to_usize() > source.len() || range.start() > range.end() {
        return None;
    }
    let segment = &source[range];
    if !padded {
        return Some(segment.to_string());
    }

    let index = LineIndex::from_source_text(source);
    let location = index.line_column(range.start(), source);
    let pad = " ".repeat(location.column.to_zero_indexed());
    Some(format!("{pad}{segment}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyast_python_ast::Stmt;
    use pyast_python_parser::parse_module;

    #[test]
    fn slices_a_single_node() {
        let source = "x = 1\ny = x + 1\n";
        let module = parse_module(source).expect("parses");
        let Stmt::Assign(second) = &module.body[1] else {
            panic!("expected the second statement to be an assignment");
        };
        assert_eq!(get_source_segment(source, second, false).as_deref(), Some("y = x + 1"));
    }

    #[test]
    fn padded_preserves_column_alignment() {
        let source = "if True:\n    x = 1\n";
        let module = parse_module(source).expect("parses");
        let Stmt::If(if_stmt) = &module.body[0] else {
            panic!("expected an if statement");
        };
        let inner = &if_stmt.body[0];
        let padded = get_source_segment(source, inner, true).expect("segment present");
        assert_eq!(padded, "    x = 1");
    }

    #[test]
    fn out_of_range_node_returns_none() {
        use pyast_python_ast::{ExprConstant, Constant};
        use pyast_text_size::{TextRange, TextSize};

        let source = "x = 1\n";
        let bogus = ExprConstant {
            range: TextRange::new(TextSize::new(100), TextSize::new(110)),
            value: Constant::Int(1.into()),
            kind: None,
        };
        assert_eq!(get_source_segment(source, &bogus, false), None);
    }
}
