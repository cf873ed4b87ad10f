use pyast_python_ast::identifier;
use pyast_python_ast::Stmt;
use pyast_python_parser::parse_module;

#[test]
fn extract_else_range() {
    let contents = "for x in y:\n    pass\nelse:\n    pass\n";
    let parsed = parse_module(contents).unwrap();
    let Stmt::For(_) = &parsed.body[0] else {
        panic!("expected a for statement")
    };
    let range = identifier::else_(&parsed.body[0]).unwrap();
    assert_eq!(&contents[range], "else");
}

#[test]
fn no_else_branch() {
    let contents = "for x in y:\n    pass\n";
    let parsed = parse_module(contents).unwrap();
    assert!(identifier::else_(&parsed.body[0]).is_none());
}
