use anyhow::Context;

use pyast::{
    dump, get_docstring, get_source_segment, literal_eval_source, parse_module, to_source, walk,
    DumpOptions, Mod,
};

const SOURCE: &str = "\"\"\"Greets someone.\"\"\"\n\
def greet(name):\n\
\x20   message = f\"hello, {name}!\"\n\
\x20   return message\n";

#[test]
fn parse_walk_and_unparse_round_trip() -> anyhow::Result<()> {
    let module = parse_module(SOURCE, Some("greet.py")).context("parsing greet.py")?;
    let rendered = to_source(&Mod::Module(module.clone()), None).context("unparsing")?;
    assert_eq!(rendered, SOURCE.trim_end());

    let kinds: Vec<&str> = walk(&Mod::Module(module)).map(|n| n.kind()).collect();
    assert!(kinds.contains(&"StmtFunctionDef"));
    assert!(kinds.contains(&"ExprJoinedStr"));
    Ok(())
}

#[test]
fn docstring_and_source_segment_agree_on_the_function_body() -> anyhow::Result<()> {
    let module = parse_module(SOURCE, None).context("parsing")?;
    assert_eq!(get_docstring(&Mod::Module(module.clone())), Some("Greets someone."));

    let pyast::Stmt::FunctionDef(greet) = &module.body[1] else {
        anyhow::bail!("expected the second statement to be the function definition");
    };
    let segment =
        get_source_segment(SOURCE, greet, false).context("function body should be in range")?;
    assert!(segment.starts_with("def greet(name):"));
    Ok(())
}

#[test]
fn dump_reports_the_function_signature() -> anyhow::Result<()> {
    let module = parse_module(SOURCE, None).context("parsing")?;
    let pyast::Stmt::FunctionDef(greet) = &module.body[1] else {
        anyhow::bail!("expected a function definition");
    };
    let dumped = dump(greet, &DumpOptions::default());
    assert!(dumped.starts_with("FunctionDef(name='greet'"));
    Ok(())
}

#[test]
fn literal_eval_source_rejects_the_module_level_f_string() {
    let err = literal_eval_source("f\"{1}\"").unwrap_err();
    assert!(matches!(err, pyast::LiteralEvalSourceError::Value(_)));
}
