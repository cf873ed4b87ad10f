//! The recursive-descent parser (§4.2): one function per grammar
//! production, expression precedence climbing implemented as a cascade of
//! functions ordered the same way as
//! [`pyast_python_ast::precedence`]'s table, so a reviewer can check the two
//! against each other level by level. Targets are parsed as ordinary
//! expressions and then re-tagged/validated (`Store`/`Del` context plus a
//! legality check), matching the teacher's own `ExprContext`-based AST
//! rather than a separate target grammar.

use num_bigint::BigInt;
use pyast_text_size::{Ranged, TextRange, TextSize};

use pyast_python_ast::*;

use crate::error::{Error, ParseError, ParseErrorType};
use crate::lexer::Spanned;
use crate::token::{conversion_flag_from_char, string_constant, StringKind, Tok};
use crate::token_source::TokenSource;

type PResult<T> = Result<T, Error>;

pub struct Parser<'a> {
    tokens: TokenSource<'a>,
    filename: String,
    /// End offset of the most recently consumed token, since the next
    /// token's own range (what `TokenSource::cur_range` reports after a
    /// `bump`) is not the same position whenever whitespace or a comment
    /// separates the two.
    last_end: TextSize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, filename: String, max_tokens: Option<usize>) -> Self {
        Parser {
            tokens: TokenSource::new(source, max_tokens, filename.clone()),
            filename,
            last_end: TextSize::from(0u32),
        }
    }

    // -- token plumbing ---------------------------------------------------

    fn peek(&mut self) -> PResult<Tok> {
        Ok(self.tokens.peek()?.clone())
    }

    fn peek_at(&mut self, n: usize) -> PResult<Tok> {
        Ok(self.tokens.peek_at(n)?.clone())
    }

    fn range(&mut self) -> PResult<TextRange> {
        self.tokens.cur_range()
    }

    fn source(&self) -> &'a str {
        self.tokens.source()
    }

    fn start(&mut self) -> PResult<TextSize> {
        Ok(self.range()?.start())
    }

    fn bump(&mut self) -> PResult<Spanned> {
        let spanned = self.tokens.bump()?;
        self.last_end = spanned.1.end();
        Ok(spanned)
    }

    fn at(&mut self, want: &Tok) -> PResult<bool> {
        Ok(&self.peek()? == want)
    }

    fn eat(&mut self, want: &Tok) -> PResult<bool> {
        if self.at(want)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, want: Tok) -> PResult<TextRange> {
        if self.at(&want)? {
            let (_, range) = self.bump()?;
            Ok(range)
        } else {
            let found = self.peek()?;
            let range = self.range()?;
            Err(self.err_at(
                range,
                ParseErrorType::UnexpectedToken {
                    found: format!("{found:?}"),
                    expected: format!("{want:?}"),
                },
            ))
        }
    }

    fn err_at(&self, range: TextRange, kind: ParseErrorType) -> Error {
        Error::Parse(
            ParseError {
                error: kind,
                location: range,
                filename: self.filename.clone(),
            }
            .with_filename(&self.filename),
        )
    }

    fn error(&mut self, kind: ParseErrorType) -> Error {
        let range = self.range().unwrap_or_else(|_| TextRange::empty(TextSize::from(0u32)));
        self.err_at(range, kind)
    }

    fn name_str(tok: &Tok) -> Option<&str> {
        match tok {
            Tok::Name { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Recognizes a soft keyword: a `Name` token whose text equals `word`,
    /// used for `match`/`case`/`_`/`type`, none of which are reserved (§4.1:
    /// "soft keywords").
    fn at_soft_keyword(&mut self, word: &str) -> PResult<bool> {
        Ok(matches!(self.peek()?, Tok::Name { name } if name == word))
    }

    // -- module entry points ----------------------------------------------

    pub fn parse_module(mut self) -> PResult<ModModule> {
        let start = self.start()?;
        let body = self.parse_statements_until_eof()?;
        let end = self.range()?.end();
        Ok(ModModule {
            range: TextRange::new(start, end),
            body,
            type_ignores: Vec::new(),
        })
    }

    pub fn parse_interactive(mut self) -> PResult<ModInteractive> {
        let start = self.start()?;
        let body = self.parse_statements_until_eof()?;
        let end = self.range()?.end();
        Ok(ModInteractive {
            range: TextRange::new(start, end),
            body,
        })
    }

    pub fn parse_expression_mode(mut self) -> PResult<ModExpression> {
        let start = self.start()?;
        // Leading/trailing NEWLINE tokens are legal around a bare expression
        // in `Mode::Expression` the same way `compile(..., mode="eval")`
        // tolerates surrounding blank lines.
        while self.eat(&Tok::Newline)? || self.eat(&Tok::NonLogicalNewline)? {}
        let body = self.parse_expr_list_or_tuple()?;
        while self.eat(&Tok::Newline)? || self.eat(&Tok::NonLogicalNewline)? {}
        self.expect(Tok::EndOfFile)?;
        let end = self.range()?.end();
        Ok(ModExpression {
            range: TextRange::new(start, end),
            body: Box::new(body),
        })
    }

    fn parse_statements_until_eof(&mut self) -> PResult<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            while self.eat(&Tok::Newline)? || self.eat(&Tok::NonLogicalNewline)? {}
            if self.at(&Tok::EndOfFile)? {
                break;
            }
            body.extend(self.parse_statement()?);
        }
        self.expect(Tok::EndOfFile)?;
        Ok(body)
    }

    // -- statements ---------------------------------------------------------

    /// One "statement" in the grammar sense, which may desugar to several
    /// `Stmt` nodes (a simple-statement line holds `;`-separated statements).
    fn parse_statement(&mut self) -> PResult<Vec<Stmt>> {
        match self.peek()? {
            Tok::If => Ok(vec![self.parse_if()?]),
            Tok::While => Ok(vec![self.parse_while()?]),
            Tok::For => Ok(vec![self.parse_for(false, None)?]),
            Tok::Try => Ok(vec![self.parse_try()?]),
            Tok::With => Ok(vec![self.parse_with(false, None)?]),
            Tok::Def => Ok(vec![self.parse_function_def(false, Vec::new(), None)?]),
            Tok::Class => Ok(vec![self.parse_class_def(Vec::new())?]),
            Tok::At => Ok(vec![self.parse_decorated()?]),
            Tok::Async => self.parse_async_statement(),
            _ if self.at_soft_keyword("match")? && self.looks_like_match_statement()? => {
                Ok(vec![self.parse_match()?])
            }
            _ => self.parse_simple_statement_line(),
        }
    }

    fn parse_async_statement(&mut self) -> PResult<Vec<Stmt>> {
        let start = self.start()?;
        self.bump()?; // 'async'
        match self.peek()? {
            Tok::Def => Ok(vec![self.parse_function_def(true, Vec::new(), Some(start))?]),
            Tok::For => Ok(vec![self.parse_for(true, Some(start))?]),
            Tok::With => Ok(vec![self.parse_with(true, Some(start))?]),
            other => Err(self.error(ParseErrorType::UnexpectedToken {
                found: format!("{other:?}"),
                expected: "'def', 'for', or 'with' after 'async'".into(),
            })),
        }
    }

    /// Whether the upcoming `match` Name token actually begins a match
    /// statement, versus a plain reference to a variable/function named
    /// `match` (§4.1: "soft keywords"). Approximated by checking that a
    /// colon terminates the line before the next `NEWLINE`, which holds for
    /// every real `match <subject>:` header and fails for ordinary
    /// expression statements using `match` as an identifier.
    fn looks_like_match_statement(&mut self) -> PResult<bool> {
        let mut i = 1;
        let mut depth = 0i32;
        loop {
            match self.peek_at(i)? {
                Tok::Newline | Tok::EndOfFile => return Ok(false),
                Tok::Lpar | Tok::Lsqb | Tok::Lbrace => depth += 1,
                Tok::Rpar | Tok::Rsqb | Tok::Rbrace => depth -= 1,
                Tok::Colon if depth == 0 => return Ok(true),
                Tok::Equal if depth == 0 => return Ok(false),
                _ => {}
            }
            i += 1;
            if i > 4096 {
                return Ok(false);
            }
        }
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        self.expect(Tok::If)?;
        let test = self.parse_named_expr()?;
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let orelse = self.parse_elif_or_else()?;
        let end = orelse.last().or(body.last()).map_or(self.range()?.end(), Ranged::end);
        Ok(StmtIf {
            range: TextRange::new(start, end),
            test: Box::new(test),
            body,
            orelse,
        }
        .into())
    }

    fn parse_elif_or_else(&mut self) -> PResult<Vec<Stmt>> {
        if self.at(&Tok::Elif)? {
            let elif_start = self.start()?;
            self.bump()?;
            let test = self.parse_named_expr()?;
            self.expect(Tok::Colon)?;
            let body = self.parse_block()?;
            let orelse = self.parse_elif_or_else()?;
            let end = orelse.last().or(body.last()).map_or(self.range()?.end(), Ranged::end);
            Ok(vec![StmtIf {
                range: TextRange::new(elif_start, end),
                test: Box::new(test),
                body,
                orelse,
            }
            .into()])
        } else if self.eat(&Tok::Else)? {
            self.expect(Tok::Colon)?;
            self.parse_block()
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        self.expect(Tok::While)?;
        let test = self.parse_named_expr()?;
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let orelse = if self.eat(&Tok::Else)? {
            self.expect(Tok::Colon)?;
            self.parse_block()?
        } else {
            Vec::new()
        };
        let end = orelse.last().or(body.last()).map_or(self.range()?.end(), Ranged::end);
        Ok(StmtWhile {
            range: TextRange::new(start, end),
            test: Box::new(test),
            body,
            orelse,
        }
        .into())
    }

    fn parse_for(&mut self, is_async: bool, async_start: Option<TextSize>) -> PResult<Stmt> {
        let start = async_start.unwrap_or(self.start()?);
        self.expect(Tok::For)?;
        let target = self.parse_target_list()?;
        self.expect(Tok::In)?;
        let iter = self.parse_expr_list_or_tuple()?;
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let orelse = if self.eat(&Tok::Else)? {
            self.expect(Tok::Colon)?;
            self.parse_block()?
        } else {
            Vec::new()
        };
        let end = orelse.last().or(body.last()).map_or(self.range()?.end(), Ranged::end);
        Ok(StmtFor {
            range: TextRange::new(start, end),
            is_async,
            target: Box::new(target),
            iter: Box::new(iter),
            body,
            orelse,
        }
        .into())
    }

    fn parse_with(&mut self, is_async: bool, async_start: Option<TextSize>) -> PResult<Stmt> {
        let start = async_start.unwrap_or(self.start()?);
        self.expect(Tok::With)?;
        let parenthesized = self.at(&Tok::Lpar)? && self.with_items_are_parenthesized()?;
        if parenthesized {
            self.bump()?; // '('
        }
        let mut items = vec![self.parse_with_item()?];
        while self.eat(&Tok::Comma)? {
            if parenthesized && self.at(&Tok::Rpar)? {
                break;
            }
            items.push(self.parse_with_item()?);
        }
        if parenthesized {
            self.expect(Tok::Rpar)?;
        }
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let end = body.last().map_or(self.range()?.end(), Ranged::end);
        Ok(StmtWith {
            range: TextRange::new(start, end),
            is_async,
            items,
            body,
        }
        .into())
    }

    /// `with (a, b):` is ambiguous with `with (a_single_parenthesized_ctx):`
    /// until a `,` or `as` is seen before the matching `)`; scans ahead at
    /// depth 1 for one of those, matching CPython 3.10+'s grammar (§4.2
    /// "with statements" supplemented detail).
    fn with_items_are_parenthesized(&mut self) -> PResult<bool> {
        let mut i = 1;
        let mut depth = 1i32;
        loop {
            match self.peek_at(i)? {
                Tok::Lpar | Tok::Lsqb | Tok::Lbrace => depth += 1,
                Tok::Rpar if depth == 1 => return Ok(false),
                Tok::Rpar | Tok::Rsqb | Tok::Rbrace => depth -= 1,
                Tok::Comma if depth == 1 => return Ok(true),
                Tok::As if depth == 1 => return Ok(true),
                Tok::Colon if depth == 0 => return Ok(false),
                Tok::Newline | Tok::EndOfFile => return Ok(false),
                _ => {}
            }
            i += 1;
            if i > 8192 {
                return Ok(false);
            }
        }
    }

    fn parse_with_item(&mut self) -> PResult<WithItem> {
        let start = self.start()?;
        let context_expr = self.parse_expr()?;
        let optional_vars = if self.eat(&Tok::As)? {
            Some(Box::new(self.parse_target()?))
        } else {
            None
        };
        let end = optional_vars.as_ref().map_or(context_expr.end(), |v| v.end());
        Ok(WithItem {
            range: TextRange::new(start, end),
            context_expr,
            optional_vars,
        })
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        self.expect(Tok::Try)?;
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;

        let mut handlers = Vec::new();
        let mut is_star = false;
        while self.at(&Tok::Except)? {
            let (handler, star) = self.parse_except_handler()?;
            is_star = is_star || star;
            handlers.push(handler);
        }

        let orelse = if self.eat(&Tok::Else)? {
            self.expect(Tok::Colon)?;
            self.parse_block()?
        } else {
            Vec::new()
        };
        let finalbody = if self.eat(&Tok::Finally)? {
            self.expect(Tok::Colon)?;
            self.parse_block()?
        } else {
            Vec::new()
        };

        let end = finalbody
            .last()
            .or(orelse.last())
            .or(handlers.last().and_then(|h: &ExceptHandler| h.body.last()))
            .or(body.last())
            .map_or(self.range()?.end(), Ranged::end);

        if is_star {
            Ok(StmtTryStar {
                range: TextRange::new(start, end),
                body,
                handlers,
                orelse,
                finalbody,
            }
            .into())
        } else {
            Ok(StmtTry {
                range: TextRange::new(start, end),
                body,
                handlers,
                orelse,
                finalbody,
            }
            .into())
        }
    }

    fn parse_except_handler(&mut self) -> PResult<(ExceptHandler, bool)> {
        let start = self.start()?;
        self.expect(Tok::Except)?;
        let is_star = self.eat(&Tok::Star)?;
        let type_ = if self.at(&Tok::Colon)? {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let name = if self.eat(&Tok::As)? {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let end = body.last().map_or(self.range()?.end(), Ranged::end);
        Ok((
            ExceptHandler {
                range: TextRange::new(start, end),
                type_,
                name,
                body,
            },
            is_star,
        ))
    }

    fn parse_function_def(
        &mut self,
        is_async: bool,
        decorator_list: Vec<Expr>,
        async_start: Option<TextSize>,
    ) -> PResult<Stmt> {
        let start = decorator_list
            .first()
            .map(Ranged::start)
            .or(async_start)
            .unwrap_or(self.start()?);
        self.expect(Tok::Def)?;
        let name = self.parse_identifier()?;
        if self.at(&Tok::Less)? {
            self.skip_type_params()?;
        }
        self.expect(Tok::Lpar)?;
        let args = self.parse_parameters(Tok::Rpar)?;
        self.expect(Tok::Rpar)?;
        let returns = if self.eat(&Tok::Rarrow)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let end = body.last().map_or(self.range()?.end(), Ranged::end);
        Ok(StmtFunctionDef {
            range: TextRange::new(start, end),
            is_async,
            name,
            args: Box::new(args),
            body,
            decorator_list,
            returns,
        }
        .into())
    }

    /// PEP 695 generic parameter lists (`def f[T](...)`) are out of scope;
    /// the brackets are still skipped over so such a definition reports a
    /// normal function rather than a confusing parse error deep inside the
    /// parameter list.
    fn skip_type_params(&mut self) -> PResult<()> {
        self.expect(Tok::Less)?;
        let mut depth = 1i32;
        while depth > 0 {
            match self.bump()?.0 {
                Tok::Less => depth += 1,
                Tok::Greater => depth -= 1,
                Tok::EndOfFile => {
                    return Err(self.error(ParseErrorType::Eof));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_class_def(&mut self, decorator_list: Vec<Expr>) -> PResult<Stmt> {
        let start = decorator_list.first().map(Ranged::start).unwrap_or(self.start()?);
        self.expect(Tok::Class)?;
        let name = self.parse_identifier()?;
        if self.at(&Tok::Less)? {
            self.skip_type_params()?;
        }
        let (bases, keywords) = if self.eat(&Tok::Lpar)? {
            let (b, k) = self.parse_call_arguments(Tok::Rpar)?;
            self.expect(Tok::Rpar)?;
            (b, k)
        } else {
            (Vec::new(), Vec::new())
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let end = body.last().map_or(self.range()?.end(), Ranged::end);
        Ok(StmtClassDef {
            range: TextRange::new(start, end),
            name,
            bases,
            keywords,
            body,
            decorator_list,
        }
        .into())
    }

    fn parse_decorated(&mut self) -> PResult<Stmt> {
        let mut decorators = Vec::new();
        while self.eat(&Tok::At)? {
            decorators.push(self.parse_named_expr()?);
            while self.eat(&Tok::Newline)? || self.eat(&Tok::NonLogicalNewline)? {}
        }
        match self.peek()? {
            Tok::Def => self.parse_function_def(false, decorators, None),
            Tok::Class => self.parse_class_def(decorators),
            Tok::Async => {
                self.bump()?;
                self.expect(Tok::Def)?;
                // re-dispatch manually since `parse_function_def` expects the
                // `def` keyword still present
                self.parse_function_def_after_def(true, decorators)
            }
            other => Err(self.error(ParseErrorType::UnexpectedToken {
                found: format!("{other:?}"),
                expected: "'def' or 'class' after decorator".into(),
            })),
        }
    }

    /// Shared tail of `parse_function_def` for the one caller
    /// (`parse_decorated`'s `async def`) that has already consumed `def`.
    fn parse_function_def_after_def(&mut self, is_async: bool, decorator_list: Vec<Expr>) -> PResult<Stmt> {
        let start = decorator_list.first().map(Ranged::start).unwrap_or(self.start()?);
        let name = self.parse_identifier()?;
        if self.at(&Tok::Less)? {
            self.skip_type_params()?;
        }
        self.expect(Tok::Lpar)?;
        let args = self.parse_parameters(Tok::Rpar)?;
        self.expect(Tok::Rpar)?;
        let returns = if self.eat(&Tok::Rarrow)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let end = body.last().map_or(self.range()?.end(), Ranged::end);
        Ok(StmtFunctionDef {
            range: TextRange::new(start, end),
            is_async,
            name,
            args: Box::new(args),
            body,
            decorator_list,
            returns,
        }
        .into())
    }

    /// Parses the parenthesized parameter list of a `def`, handling `/`
    /// (end of positional-only), `*` / `*args` (end of positional-or-kw),
    /// and `**kwargs`.
    fn parse_parameters(&mut self, terminator: Tok) -> PResult<Arguments> {
        let start = self.start()?;
        let mut posonlyargs = Vec::new();
        let mut args = Vec::new();
        let mut vararg = None;
        let mut kwonlyargs = Vec::new();
        let mut kw_defaults = Vec::new();
        let mut kwarg = None;
        let mut defaults = Vec::new();
        let mut seen_star = false;
        let mut seen_default = false;

        while !self.at(&terminator)? {
            if self.eat(&Tok::Slash)? {
                posonlyargs = std::mem::take(&mut args);
                self.eat(&Tok::Comma)?;
                continue;
            }
            if self.at(&Tok::Star)? && self.peek_at(1)? != Tok::Star {
                self.bump()?;
                seen_star = true;
                if !self.at(&Tok::Comma)? && !self.at(&terminator)? {
                    vararg = Some(Box::new(self.parse_param()?));
                }
                self.eat(&Tok::Comma)?;
                continue;
            }
            if self.eat(&Tok::DoubleStar)? {
                kwarg = Some(Box::new(self.parse_param()?));
                self.eat(&Tok::Comma)?;
                continue;
            }

            let param = self.parse_param()?;
            let default = if self.eat(&Tok::Equal)? {
                Some(self.parse_expr()?)
            } else {
                None
            };

            if seen_star {
                kwonlyargs.push(param);
                kw_defaults.push(default);
            } else {
                if default.is_some() {
                    seen_default = true;
                } else if seen_default {
                    return Err(self.error(ParseErrorType::InvalidSyntax(
                        "non-default argument follows default argument".into(),
                    )));
                }
                args.push(param);
                if let Some(default) = default {
                    defaults.push(default);
                }
            }

            if !self.eat(&Tok::Comma)? {
                break;
            }
        }

        let end = self.range()?.end();
        Ok(Arguments {
            range: TextRange::new(start, end),
            posonlyargs,
            args,
            vararg,
            kwonlyargs,
            kw_defaults,
            kwarg,
            defaults,
        })
    }

    fn parse_param(&mut self) -> PResult<Arg> {
        let start = self.start()?;
        let arg = self.parse_identifier()?;
        let annotation = if self.eat(&Tok::Colon)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end = annotation.as_ref().map_or(arg.end(), |a| a.end());
        Ok(Arg {
            range: TextRange::new(start, end),
            arg,
            annotation,
        })
    }

    fn parse_match(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        self.bump()?; // 'match' soft keyword
        let subject = self.parse_expr_list_or_tuple()?;
        self.expect(Tok::Colon)?;
        while self.eat(&Tok::Newline)? {}
        self.expect(Tok::Indent)?;
        let mut cases = Vec::new();
        loop {
            while self.eat(&Tok::Newline)? || self.eat(&Tok::NonLogicalNewline)? {}
            if self.at(&Tok::Dedent)? {
                break;
            }
            cases.push(self.parse_match_case()?);
        }
        self.expect(Tok::Dedent)?;
        let end = cases.last().map_or(self.range()?.end(), Ranged::end);
        Ok(StmtMatch {
            range: TextRange::new(start, end),
            subject: Box::new(subject),
            cases,
        }
        .into())
    }

    fn parse_match_case(&mut self) -> PResult<MatchCase> {
        let start = self.start()?;
        if !self.at_soft_keyword("case")? {
            return Err(self.error(ParseErrorType::UnexpectedToken {
                found: format!("{:?}", self.peek()?),
                expected: "'case'".into(),
            }));
        }
        self.bump()?;
        let pattern = self.parse_patterns()?;
        let guard = if self.eat(&Tok::If)? {
            Some(Box::new(self.parse_named_expr()?))
        } else {
            None
        };
        self.expect(Tok::Colon)?;
        let body = self.parse_block()?;
        let end = body.last().map_or(self.range()?.end(), Ranged::end);
        Ok(MatchCase {
            range: TextRange::new(start, end),
            pattern,
            guard,
            body,
        })
    }

    /// A block is either an indented suite on its own lines, or (for
    /// one-liners like `if x: pass`) a `;`-separated run of simple
    /// statements on the same line as the header's `:`.
    fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
        if self.eat(&Tok::Newline)? {
            while self.eat(&Tok::NonLogicalNewline)? {}
            self.expect(Tok::Indent)?;
            let mut body = Vec::new();
            loop {
                while self.eat(&Tok::Newline)? || self.eat(&Tok::NonLogicalNewline)? {}
                if self.at(&Tok::Dedent)? {
                    break;
                }
                body.extend(self.parse_statement()?);
            }
            self.expect(Tok::Dedent)?;
            Ok(body)
        } else {
            self.parse_simple_statement_line()
        }
    }

    fn parse_simple_statement_line(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = vec![self.parse_simple_statement()?];
        while self.eat(&Tok::Semi)? {
            if self.at(&Tok::Newline)? || self.at(&Tok::EndOfFile)? {
                break;
            }
            stmts.push(self.parse_simple_statement()?);
        }
        if !self.at(&Tok::EndOfFile)? {
            self.expect(Tok::Newline)?;
        }
        Ok(stmts)
    }

    fn parse_simple_statement(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        match self.peek()? {
            Tok::Pass => {
                self.bump()?;
                Ok(StmtPass { range: TextRange::new(start, self.prev_end()) }.into())
            }
            Tok::Break => {
                self.bump()?;
                Ok(StmtBreak { range: TextRange::new(start, self.prev_end()) }.into())
            }
            Tok::Continue => {
                self.bump()?;
                Ok(StmtContinue { range: TextRange::new(start, self.prev_end()) }.into())
            }
            Tok::Return => {
                self.bump()?;
                let value = if self.at_simple_stmt_end()? {
                    None
                } else {
                    Some(Box::new(self.parse_expr_list_or_tuple()?))
                };
                let end = value.as_ref().map_or(self.prev_end(), |v| v.end());
                Ok(StmtReturn { range: TextRange::new(start, end), value }.into())
            }
            Tok::Raise => {
                self.bump()?;
                if self.at_simple_stmt_end()? {
                    return Ok(StmtRaise {
                        range: TextRange::new(start, self.prev_end()),
                        exc: None,
                        cause: None,
                    }
                    .into());
                }
                let exc = Some(Box::new(self.parse_expr()?));
                let cause = if self.eat(&Tok::From)? {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                let end = cause.as_ref().map_or(exc.as_ref().unwrap().end(), |c| c.end());
                Ok(StmtRaise { range: TextRange::new(start, end), exc, cause }.into())
            }
            Tok::Del => {
                self.bump()?;
                let mut targets = vec![self.parse_del_target()?];
                while self.eat(&Tok::Comma)? {
                    if self.at_simple_stmt_end()? {
                        break;
                    }
                    targets.push(self.parse_del_target()?);
                }
                let end = targets.last().map_or(self.prev_end(), Ranged::end);
                Ok(StmtDelete { range: TextRange::new(start, end), targets }.into())
            }
            Tok::Assert => {
                self.bump()?;
                let test = self.parse_expr()?;
                let msg = if self.eat(&Tok::Comma)? {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                let end = msg.as_ref().map_or(test.end(), |m| m.end());
                Ok(StmtAssert { range: TextRange::new(start, end), test: Box::new(test), msg }.into())
            }
            Tok::Global => {
                self.bump()?;
                let names = self.parse_identifier_list()?;
                let end = names.last().map_or(self.prev_end(), Ranged::end);
                Ok(StmtGlobal { range: TextRange::new(start, end), names }.into())
            }
            Tok::Nonlocal => {
                self.bump()?;
                let names = self.parse_identifier_list()?;
                let end = names.last().map_or(self.prev_end(), Ranged::end);
                Ok(StmtNonlocal { range: TextRange::new(start, end), names }.into())
            }
            Tok::Import => self.parse_import(),
            Tok::From => self.parse_import_from(),
            _ => self.parse_expr_statement(),
        }
    }

    fn prev_end(&mut self) -> TextSize {
        self.last_end
    }

    fn at_simple_stmt_end(&mut self) -> PResult<bool> {
        Ok(matches!(self.peek()?, Tok::Newline | Tok::Semi | Tok::EndOfFile))
    }

    fn parse_identifier_list(&mut self) -> PResult<Vec<Identifier>> {
        let mut names = vec![self.parse_identifier()?];
        while self.eat(&Tok::Comma)? {
            names.push(self.parse_identifier()?);
        }
        Ok(names)
    }

    fn parse_import(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        self.bump()?; // 'import'
        let mut names = vec![self.parse_alias()?];
        while self.eat(&Tok::Comma)? {
            names.push(self.parse_alias()?);
        }
        let end = names.last().map_or(self.prev_end(), Ranged::end);
        Ok(StmtImport { range: TextRange::new(start, end), names }.into())
    }

    fn parse_alias(&mut self) -> PResult<Alias> {
        let start = self.start()?;
        let mut dotted = self.parse_identifier()?;
        while self.at(&Tok::Dot)? {
            self.bump()?;
            let next = self.parse_identifier()?;
            let range = TextRange::new(dotted.start(), next.end());
            dotted = Identifier::new(format!("{}.{}", dotted.as_str(), next.as_str()), range);
        }
        let asname = if self.eat(&Tok::As)? { Some(self.parse_identifier()?) } else { None };
        let end = asname.as_ref().map_or(dotted.end(), Ranged::end);
        Ok(Alias { range: TextRange::new(start, end), name: dotted, asname })
    }

    fn parse_import_from(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        self.bump()?; // 'from'
        let mut level = 0u32;
        while matches!(self.peek()?, Tok::Dot | Tok::Ellipsis) {
            match self.bump()?.0 {
                Tok::Dot => level += 1,
                Tok::Ellipsis => level += 3,
                _ => unreachable!(),
            }
        }
        let module = if self.at(&Tok::Import)? {
            None
        } else {
            Some(self.parse_dotted_identifier()?)
        };
        self.expect(Tok::Import)?;
        let names = if self.eat(&Tok::Star)? {
            vec![Alias {
                range: TextRange::new(self.prev_end(), self.prev_end()),
                name: Identifier::new("*", TextRange::empty(self.prev_end())),
                asname: None,
            }]
        } else if self.eat(&Tok::Lpar)? {
            let mut items = vec![self.parse_alias()?];
            while self.eat(&Tok::Comma)? {
                if self.at(&Tok::Rpar)? {
                    break;
                }
                items.push(self.parse_alias()?);
            }
            self.expect(Tok::Rpar)?;
            items
        } else {
            let mut items = vec![self.parse_alias()?];
            while self.eat(&Tok::Comma)? {
                items.push(self.parse_alias()?);
            }
            items
        };
        let end = names.last().map_or(self.prev_end(), Ranged::end);
        Ok(StmtImportFrom {
            range: TextRange::new(start, end),
            module,
            names,
            level,
        }
        .into())
    }

    fn parse_dotted_identifier(&mut self) -> PResult<Identifier> {
        let mut dotted = self.parse_identifier()?;
        while self.at(&Tok::Dot)? {
            self.bump()?;
            let next = self.parse_identifier()?;
            let range = TextRange::new(dotted.start(), next.end());
            dotted = Identifier::new(format!("{}.{}", dotted.as_str(), next.as_str()), range);
        }
        Ok(dotted)
    }

    /// Expression statements and the various assignment forms all start the
    /// same way: parse a (possibly starred, possibly `yield`) expression
    /// list, then decide what follows.
    fn parse_expr_statement(&mut self) -> PResult<Stmt> {
        let start = self.start()?;
        let first = self.parse_expr_list_or_tuple_for_target()?;

        if self.at(&Tok::Colon)? {
            self.bump()?;
            let annotation = self.parse_expr()?;
            let value = if self.eat(&Tok::Equal)? {
                Some(Box::new(self.parse_expr_list_or_tuple()?))
            } else {
                None
            };
            let simple = matches!(&first, Expr::Name(_));
            let target = Box::new(retag_context(first, ExprContext::Store));
            let end = value.as_ref().map_or(annotation.end(), |v| v.end());
            return Ok(StmtAnnAssign {
                range: TextRange::new(start, end),
                target,
                annotation: Box::new(annotation),
                value,
                simple,
            }
            .into());
        }

        if let Some(op) = self.peek_aug_assign_op()? {
            self.bump()?;
            let target = Box::new(self.check_assignment_target(first)?);
            let value = Box::new(self.parse_expr_list_or_tuple()?);
            let end = value.end();
            return Ok(StmtAugAssign {
                range: TextRange::new(start, end),
                target,
                op,
                value,
            }
            .into());
        }

        if self.eat(&Tok::Equal)? {
            let mut targets = vec![self.check_assignment_target(first)?];
            let mut value = self.parse_expr_list_or_tuple_for_target()?;
            while self.eat(&Tok::Equal)? {
                targets.push(self.check_assignment_target(value)?);
                value = self.parse_expr_list_or_tuple_for_target()?;
            }
            let end = value.end();
            return Ok(StmtAssign {
                range: TextRange::new(start, end),
                targets,
                value: Box::new(value),
            }
            .into());
        }

        let end = first.end();
        Ok(StmtExpr {
            range: TextRange::new(start, end),
            value: Box::new(first),
        }
        .into())
    }

    fn peek_aug_assign_op(&mut self) -> PResult<Option<Operator>> {
        Ok(match self.peek()? {
            Tok::PlusEqual => Some(Operator::Add),
            Tok::MinusEqual => Some(Operator::Sub),
            Tok::StarEqual => Some(Operator::Mult),
            Tok::AtEqual => Some(Operator::MatMult),
            Tok::SlashEqual => Some(Operator::Div),
            Tok::PercentEqual => Some(Operator::Mod),
            Tok::DoubleStarEqual => Some(Operator::Pow),
            Tok::LeftShiftEqual => Some(Operator::LShift),
            Tok::RightShiftEqual => Some(Operator::RShift),
            Tok::VbarEqual => Some(Operator::BitOr),
            Tok::CircumflexEqual => Some(Operator::BitXor),
            Tok::AmperEqual => Some(Operator::BitAnd),
            Tok::DoubleSlashEqual => Some(Operator::FloorDiv),
            _ => None,
        })
    }

    // -- targets --------------------------------------------------------

    fn parse_target(&mut self) -> PResult<Expr> {
        let expr = self.parse_expr()?;
        self.check_assignment_target(expr)
    }

    fn parse_target_list(&mut self) -> PResult<Expr> {
        let expr = self.parse_expr_list_or_tuple_for_target()?;
        self.check_assignment_target(expr)
    }

    fn parse_del_target(&mut self) -> PResult<Expr> {
        let expr = self.parse_expr()?;
        Ok(retag_context(check_target_shape(expr, &self.filename)?, ExprContext::Del))
    }

    fn check_assignment_target(&mut self, expr: Expr) -> PResult<Expr> {
        let checked = check_target_shape(expr, &self.filename)?;
        Ok(retag_context(checked, ExprContext::Store))
    }

    // -- expressions ------------------------------------------------------

    /// `expr (',' expr)* [',']`: used for tuple display contexts that are
    /// not inside explicit brackets (assignment RHS, `return`, `for` targets
    /// when unparenthesized, etc).
    fn parse_expr_list_or_tuple(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let first = self.parse_starred_or_named_expr()?;
        if !self.at(&Tok::Comma)? {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Tok::Comma)? {
            if self.at_tuple_end()? {
                break;
            }
            elts.push(self.parse_starred_or_named_expr()?);
        }
        let end = elts.last().map_or(self.prev_end(), Ranged::end);
        Ok(ExprTuple {
            range: TextRange::new(start, end),
            elts,
            ctx: ExprContext::Load,
        }
        .into())
    }

    fn parse_expr_list_or_tuple_for_target(&mut self) -> PResult<Expr> {
        self.parse_expr_list_or_tuple()
    }

    fn at_tuple_end(&mut self) -> PResult<bool> {
        Ok(matches!(
            self.peek()?,
            Tok::Newline
                | Tok::EndOfFile
                | Tok::Equal
                | Tok::Colon
                | Tok::Semi
                | Tok::Rpar
                | Tok::Rsqb
                | Tok::Rbrace
                | Tok::In
        ))
    }

    fn parse_starred_or_named_expr(&mut self) -> PResult<Expr> {
        if self.at(&Tok::Star)? {
            let start = self.start()?;
            self.bump()?;
            let value = self.parse_expr()?;
            let end = value.end();
            return Ok(ExprStarred {
                range: TextRange::new(start, end),
                value: Box::new(value),
                ctx: ExprContext::Load,
            }
            .into());
        }
        self.parse_named_expr()
    }

    /// `expr | expr := expr` (the walrus operator binds tighter than `,` but
    /// looser than everything else).
    fn parse_named_expr(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let target = self.parse_expr()?;
        if self.eat(&Tok::ColonEqual)? {
            let value = self.parse_expr()?;
            let end = value.end();
            return Ok(ExprNamedExpr {
                range: TextRange::new(start, end),
                target: Box::new(retag_context(target, ExprContext::Store)),
                value: Box::new(value),
            }
            .into());
        }
        Ok(target)
    }

    /// Entry point for "one expression, no top-level comma, no bare
    /// `yield`-as-statement special-casing": ternary-or-lower.
    fn parse_expr(&mut self) -> PResult<Expr> {
        if self.at(&Tok::Lambda)? {
            return self.parse_lambda();
        }
        if matches!(self.peek()?, Tok::Yield) {
            return self.parse_yield();
        }
        self.parse_ternary()
    }

    fn parse_lambda(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        self.bump()?; // 'lambda'
        let args = self.parse_parameters(Tok::Colon)?;
        self.expect(Tok::Colon)?;
        let body = self.parse_expr()?;
        let end = body.end();
        Ok(ExprLambda {
            range: TextRange::new(start, end),
            args: Box::new(args),
            body: Box::new(body),
        }
        .into())
    }

    fn parse_yield(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        self.bump()?; // 'yield'
        if self.eat(&Tok::From)? {
            let value = self.parse_expr()?;
            let end = value.end();
            return Ok(ExprYieldFrom {
                range: TextRange::new(start, end),
                value: Box::new(value),
            }
            .into());
        }
        if self.at_simple_stmt_end()? || self.at(&Tok::Rpar)? || self.at(&Tok::Rsqb)? || self.at(&Tok::Rbrace)? {
            return Ok(ExprYield {
                range: TextRange::new(start, self.prev_end()),
                value: None,
            }
            .into());
        }
        let value = self.parse_expr_list_or_tuple()?;
        let end = value.end();
        Ok(ExprYield {
            range: TextRange::new(start, end),
            value: Some(Box::new(value)),
        }
        .into())
    }

    /// `or_test ['if' or_test 'else' expr]`
    fn parse_ternary(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let body = self.parse_or_test()?;
        if self.eat(&Tok::If)? {
            let test = self.parse_or_test()?;
            self.expect(Tok::Else)?;
            let orelse = self.parse_expr()?;
            let end = orelse.end();
            return Ok(ExprIfExp {
                range: TextRange::new(start, end),
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            }
            .into());
        }
        Ok(body)
    }

    fn parse_or_test(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut values = vec![self.parse_and_test()?];
        while self.eat(&Tok::Or)? {
            values.push(self.parse_and_test()?);
        }
        if values.len() == 1 {
            return Ok(values.pop().expect("len checked"));
        }
        let end = values.last().expect("non-empty").end();
        Ok(ExprBoolOp {
            range: TextRange::new(start, end),
            op: BoolOp::Or,
            values,
        }
        .into())
    }

    fn parse_and_test(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut values = vec![self.parse_not_test()?];
        while self.eat(&Tok::And)? {
            values.push(self.parse_not_test()?);
        }
        if values.len() == 1 {
            return Ok(values.pop().expect("len checked"));
        }
        let end = values.last().expect("non-empty").end();
        Ok(ExprBoolOp {
            range: TextRange::new(start, end),
            op: BoolOp::And,
            values,
        }
        .into())
    }

    fn parse_not_test(&mut self) -> PResult<Expr> {
        if self.at(&Tok::Not)? {
            let start = self.start()?;
            self.bump()?;
            let operand = self.parse_not_test()?;
            let end = operand.end();
            return Ok(ExprUnaryOp {
                range: TextRange::new(start, end),
                op: UnaryOp::Not,
                operand: Box::new(operand),
            }
            .into());
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let left = self.parse_bitwise_or()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.peek_cmp_op()? {
            self.consume_cmp_op(&op)?;
            ops.push(op);
            comparators.push(self.parse_bitwise_or()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        let end = comparators.last().expect("non-empty").end();
        Ok(ExprCompare {
            range: TextRange::new(start, end),
            left: Box::new(left),
            ops,
            comparators,
        }
        .into())
    }

    fn peek_cmp_op(&mut self) -> PResult<Option<CmpOp>> {
        Ok(match self.peek()? {
            Tok::Less => Some(CmpOp::Lt),
            Tok::LessEqual => Some(CmpOp::LtE),
            Tok::Greater => Some(CmpOp::Gt),
            Tok::GreaterEqual => Some(CmpOp::GtE),
            Tok::EqEqual => Some(CmpOp::Eq),
            Tok::NotEqual => Some(CmpOp::NotEq),
            Tok::In => Some(CmpOp::In),
            Tok::Is => Some(CmpOp::Is),
            Tok::Not if matches!(self.peek_at(1)?, Tok::In) => Some(CmpOp::NotIn),
            _ => None,
        })
    }

    fn consume_cmp_op(&mut self, op: &CmpOp) -> PResult<()> {
        match op {
            CmpOp::NotIn => {
                self.bump()?;
                self.expect(Tok::In)?;
            }
            CmpOp::Is => {
                self.bump()?;
                if self.eat(&Tok::Not)? {
                    // handled by caller re-peeking; simplest is to special
                    // case here directly since `Is`/`IsNot` share a prefix.
                }
            }
            _ => {
                self.bump()?;
            }
        }
        Ok(())
    }

    fn parse_bitwise_or(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut left = self.parse_bitwise_xor()?;
        while self.eat(&Tok::Vbar)? {
            let right = self.parse_bitwise_xor()?;
            let end = right.end();
            left = ExprBinOp {
                range: TextRange::new(start, end),
                left: Box::new(left),
                op: Operator::BitOr,
                right: Box::new(right),
            }
            .into();
        }
        Ok(left)
    }

    fn parse_bitwise_xor(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut left = self.parse_bitwise_and()?;
        while self.eat(&Tok::CircumFlex)? {
            let right = self.parse_bitwise_and()?;
            let end = right.end();
            left = ExprBinOp {
                range: TextRange::new(start, end),
                left: Box::new(left),
                op: Operator::BitXor,
                right: Box::new(right),
            }
            .into();
        }
        Ok(left)
    }

    fn parse_bitwise_and(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut left = self.parse_shift()?;
        while self.eat(&Tok::Amper)? {
            let right = self.parse_shift()?;
            let end = right.end();
            left = ExprBinOp {
                range: TextRange::new(start, end),
                left: Box::new(left),
                op: Operator::BitAnd,
                right: Box::new(right),
            }
            .into();
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut left = self.parse_arith()?;
        loop {
            let op = match self.peek()? {
                Tok::LeftShift => Operator::LShift,
                Tok::RightShift => Operator::RShift,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_arith()?;
            let end = right.end();
            left = ExprBinOp { range: TextRange::new(start, end), left: Box::new(left), op, right: Box::new(right) }.into();
        }
        Ok(left)
    }

    fn parse_arith(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek()? {
                Tok::Plus => Operator::Add,
                Tok::Minus => Operator::Sub,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_term()?;
            let end = right.end();
            left = ExprBinOp { range: TextRange::new(start, end), left: Box::new(left), op, right: Box::new(right) }.into();
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek()? {
                Tok::Star => Operator::Mult,
                Tok::Slash => Operator::Div,
                Tok::DoubleSlash => Operator::FloorDiv,
                Tok::Percent => Operator::Mod,
                Tok::At => Operator::MatMult,
                _ => break,
            };
            self.bump()?;
            let right = self.parse_factor()?;
            let end = right.end();
            left = ExprBinOp { range: TextRange::new(start, end), left: Box::new(left), op, right: Box::new(right) }.into();
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let op = match self.peek()? {
            Tok::Plus => Some(UnaryOp::UAdd),
            Tok::Minus => Some(UnaryOp::USub),
            Tok::Tilde => Some(UnaryOp::Invert),
            _ => None,
        };
        if let Some(op) = op {
            self.bump()?;
            let operand = self.parse_factor()?;
            let end = operand.end();
            return Ok(ExprUnaryOp { range: TextRange::new(start, end), op, operand: Box::new(operand) }.into());
        }
        self.parse_power()
    }

    /// `**` is right-associative and binds tighter than unary `-` on its
    /// left but the unary operator on its *right* operand is parsed by
    /// recursing back into `parse_factor` (`2 ** -1` is legal, `-2 ** 2`
    /// parses as `-(2 ** 2)`).
    fn parse_power(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let base = self.parse_await_or_unary_postfix()?;
        if self.eat(&Tok::DoubleStar)? {
            let exponent = self.parse_factor()?;
            let end = exponent.end();
            return Ok(ExprBinOp {
                range: TextRange::new(start, end),
                left: Box::new(base),
                op: Operator::Pow,
                right: Box::new(exponent),
            }
            .into());
        }
        Ok(base)
    }

    fn parse_await_or_unary_postfix(&mut self) -> PResult<Expr> {
        if self.at(&Tok::Await)? {
            let start = self.start()?;
            self.bump()?;
            let value = self.parse_unary_postfix()?;
            let end = value.end();
            return Ok(ExprAwait { range: TextRange::new(start, end), value: Box::new(value) }.into());
        }
        self.parse_unary_postfix()
    }

    /// Atom plus any chain of trailers: calls, subscripts, attribute
    /// accesses, in source order (`a.b[0](1)` reads left to right).
    fn parse_unary_postfix(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut expr = self.parse_atom()?;
        loop {
            match self.peek()? {
                Tok::Dot => {
                    self.bump()?;
                    let attr = self.parse_identifier()?;
                    let end = attr.end();
                    expr = ExprAttribute {
                        range: TextRange::new(start, end),
                        value: Box::new(expr),
                        attr,
                        ctx: ExprContext::Load,
                    }
                    .into();
                }
                Tok::Lpar => {
                    self.bump()?;
                    let (args, keywords) = self.parse_call_arguments(Tok::Rpar)?;
                    self.expect(Tok::Rpar)?;
                    let end = self.prev_end();
                    expr = ExprCall {
                        range: TextRange::new(start, end),
                        func: Box::new(expr),
                        args,
                        keywords,
                    }
                    .into();
                }
                Tok::Lsqb => {
                    self.bump()?;
                    let slice = self.parse_subscript_slice()?;
                    self.expect(Tok::Rsqb)?;
                    let end = self.prev_end();
                    expr = ExprSubscript {
                        range: TextRange::new(start, end),
                        value: Box::new(expr),
                        slice: Box::new(slice),
                        ctx: ExprContext::Load,
                    }
                    .into();
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_call_arguments(&mut self, terminator: Tok) -> PResult<(Vec<Expr>, Vec<Keyword>)> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        while !self.at(&terminator)? {
            if self.at(&Tok::DoubleStar)? {
                let start = self.start()?;
                self.bump()?;
                let value = self.parse_expr()?;
                let end = value.end();
                keywords.push(Keyword { range: TextRange::new(start, end), arg: None, value });
            } else if self.at(&Tok::Star)? {
                let start = self.start()?;
                self.bump()?;
                let value = self.parse_expr()?;
                let end = value.end();
                args.push(
                    ExprStarred {
                        range: TextRange::new(start, end),
                        value: Box::new(value),
                        ctx: ExprContext::Load,
                    }
                    .into(),
                );
            } else if self.looks_like_keyword_argument()? {
                let start = self.start()?;
                let name = self.parse_identifier()?;
                self.expect(Tok::Equal)?;
                let value = self.parse_expr()?;
                let end = value.end();
                keywords.push(Keyword { range: TextRange::new(start, end), arg: Some(name), value });
            } else {
                let value = self.parse_named_expr()?;
                if self.at_comprehension_for()? {
                    args.push(self.parse_generator_exp_tail(value)?);
                } else {
                    args.push(value);
                }
            }
            if !self.eat(&Tok::Comma)? {
                break;
            }
        }
        Ok((args, keywords))
    }

    fn looks_like_keyword_argument(&mut self) -> PResult<bool> {
        Ok(matches!(self.peek()?, Tok::Name { .. }) && matches!(self.peek_at(1)?, Tok::Equal))
    }

    fn parse_subscript_slice(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let first = self.parse_slice_item()?;
        if !self.at(&Tok::Comma)? {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Tok::Comma)? {
            if self.at(&Tok::Rsqb)? {
                break;
            }
            elts.push(self.parse_slice_item()?);
        }
        let end = elts.last().map_or(self.prev_end(), Ranged::end);
        Ok(ExprTuple { range: TextRange::new(start, end), elts, ctx: ExprContext::Load }.into())
    }

    fn parse_slice_item(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        if self.at(&Tok::Star)? {
            self.bump()?;
            let value = self.parse_expr()?;
            let end = value.end();
            return Ok(ExprStarred {
                range: TextRange::new(start, end),
                value: Box::new(value),
                ctx: ExprContext::Load,
            }
            .into());
        }

        let lower = if matches!(self.peek()?, Tok::Colon) {
            None
        } else {
            Some(Box::new(self.parse_named_expr()?))
        };

        if !self.at(&Tok::Colon)? {
            return Ok(*lower.expect("no colon means a plain index was parsed"));
        }
        self.bump()?; // ':'

        let upper = if matches!(self.peek()?, Tok::Colon | Tok::Comma | Tok::Rsqb) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let step = if self.eat(&Tok::Colon)? {
            if matches!(self.peek()?, Tok::Comma | Tok::Rsqb) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            }
        } else {
            None
        };

        let end = self.prev_end();
        Ok(ExprSlice { range: TextRange::new(start, end), lower, upper, step }.into())
    }

    // -- atoms ------------------------------------------------------------

    fn parse_atom(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        match self.peek()? {
            Tok::Name { name } => {
                self.bump()?;
                Ok(ExprName {
                    range: TextRange::new(start, self.prev_end()),
                    id: Identifier::new(name, TextRange::new(start, self.prev_end())),
                    ctx: ExprContext::Load,
                }
                .into())
            }
            Tok::Int { value } => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::Int(value), kind: None }.into())
            }
            Tok::Float { value } => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::Float(value), kind: None }.into())
            }
            Tok::Complex { real, imag } => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::Complex { real, imag }, kind: None }.into())
            }
            Tok::String { .. } => self.parse_string_or_concat(),
            Tok::FStringStart { .. } => self.parse_string_or_concat(),
            Tok::True => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::Bool(true), kind: None }.into())
            }
            Tok::False => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::Bool(false), kind: None }.into())
            }
            Tok::None => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::None, kind: None }.into())
            }
            Tok::Ellipsis => {
                self.bump()?;
                let end = self.prev_end();
                Ok(ExprConstant { range: TextRange::new(start, end), value: Constant::Ellipsis, kind: None }.into())
            }
            Tok::Lpar => self.parse_parenthesized(),
            Tok::Lsqb => self.parse_list_display(),
            Tok::Lbrace => self.parse_dict_or_set_display(),
            other => Err(self.error(ParseErrorType::UnexpectedToken {
                found: format!("{other:?}"),
                expected: "an expression".into(),
            })),
        }
    }

    fn parse_string_or_concat(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut parts: Vec<Expr> = Vec::new();
        let mut plain_parts: Vec<(String, StringKind, bool)> = Vec::new();

        loop {
            match self.peek()? {
                Tok::String { .. } => {
                    let (tok, range) = self.bump()?;
                    let Tok::String { value, kind, triple_quoted } = tok else { unreachable!() };
                    plain_parts.push((value, kind, triple_quoted));
                    let _ = range;
                }
                Tok::FStringStart { .. } => {
                    if !plain_parts.is_empty() {
                        parts.push(self.finish_plain_string(start, std::mem::take(&mut plain_parts)));
                    }
                    parts.push(self.parse_fstring()?);
                }
                _ => break,
            }
        }
        if !plain_parts.is_empty() {
            parts.push(self.finish_plain_string(start, plain_parts));
        }

        if parts.len() == 1 {
            return Ok(parts.pop().expect("len == 1"));
        }
        let end = parts.last().map_or(self.prev_end(), Ranged::end);
        if parts.iter().any(|p| matches!(p, Expr::JoinedStr(_))) {
            let values = parts
                .into_iter()
                .flat_map(|p| match p {
                    Expr::JoinedStr(j) => j.values,
                    other => vec![other],
                })
                .collect();
            Ok(ExprJoinedStr { range: TextRange::new(start, end), values }.into())
        } else {
            // adjacent plain string/byte literal concatenation (§4.2:
            // "adjacent literals concatenate at parse time")
            let combined = parts
                .into_iter()
                .map(|p| match p {
                    Expr::Constant(ExprConstant { value, .. }) => value,
                    _ => unreachable!("only Constant pushed by finish_plain_string"),
                })
                .reduce(|acc, next| match (acc, next) {
                    (Constant::Str(mut a), Constant::Str(b)) => {
                        a.push_str(&b);
                        Constant::Str(a)
                    }
                    (Constant::Bytes(mut a), Constant::Bytes(b)) => {
                        a.extend(b);
                        Constant::Bytes(a)
                    }
                    (a, _) => a,
                })
                .expect("at least one part");
            Ok(ExprConstant { range: TextRange::new(start, end), value: combined, kind: None }.into())
        }
    }

    fn finish_plain_string(&self, start: TextSize, parts: Vec<(String, StringKind, bool)>) -> Expr {
        let kind = parts[0].1;
        let mut text = String::new();
        for (value, _, _) in &parts {
            text.push_str(value);
        }
        let value = string_constant(kind, text);
        let end = self.range().map(|r| r.end()).unwrap_or(start);
        ExprConstant { range: TextRange::new(start, end), value, kind: None }.into()
    }

    /// Reassembles one f-string's tokens (`FStringStart`, a mix of
    /// `FStringMiddle` literal chunks and `{`-delimited fields, `FStringEnd`)
    /// into a `JoinedStr` of `Constant` and `FormattedValue` parts.
    fn parse_fstring(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        self.bump()?; // FStringStart
        let mut values = Vec::new();
        loop {
            match self.peek()? {
                Tok::FStringMiddle { .. } => {
                    let (tok, range) = self.bump()?;
                    let Tok::FStringMiddle { value } = tok else { unreachable!() };
                    if !value.is_empty() {
                        values.push(ExprConstant { range, value: Constant::Str(value), kind: None }.into());
                    }
                }
                Tok::Lbrace => {
                    values.extend(self.parse_fstring_field()?);
                }
                Tok::FStringEnd => {
                    self.bump()?;
                    break;
                }
                other => {
                    return Err(self.error(ParseErrorType::UnexpectedToken {
                        found: format!("{other:?}"),
                        expected: "f-string content".into(),
                    }))
                }
            }
        }
        let end = self.prev_end();
        Ok(ExprJoinedStr { range: TextRange::new(start, end), values: merge_adjacent_constants(values) }.into())
    }

    /// Parses one `{expr}` replacement field. Returns one or two values: a
    /// leading `Constant` holding the source text of a self-documenting
    /// (`{expr=}`) field's `expr=` prefix, if present, followed by the
    /// `FormattedValue`.
    fn parse_fstring_field(&mut self) -> PResult<Vec<Expr>> {
        let start = self.start()?;
        self.bump()?; // '{'
        let value_start = self.start()?;
        let value = self.parse_expr_list_or_tuple()?;
        // Self-documenting field (`{expr=}`, §4.1): the literal source text
        // between the `{` and the `=` becomes a Constant that precedes the
        // FormattedValue, and a bare `=` with no explicit conversion or
        // format spec defaults to `!r` (mirrors CPython's `compile.c`
        // debug-field handling).
        let mut debug_text = None;
        if self.at(&Tok::Equal)? {
            let eq_end = self.range()?.end();
            self.bump()?; // '='
            debug_text = Some((
                self.source()[value_start.to_usize()..eq_end.to_usize()].to_string(),
                TextRange::new(value_start, eq_end),
            ));
        }
        let explicit_conversion = if self.eat(&Tok::Exclamation)? {
            match self.peek()? {
                Tok::Name { name } if name.len() == 1 => {
                    let c = name.chars().next().expect("len == 1");
                    let flag = conversion_flag_from_char(c).ok_or_else(|| {
                        self.error(ParseErrorType::InvalidSyntax(format!("invalid conversion flag {c:?}")))
                    })?;
                    self.bump()?;
                    Some(flag)
                }
                other => {
                    return Err(self.error(ParseErrorType::UnexpectedToken {
                        found: format!("{other:?}"),
                        expected: "conversion flag ('s', 'r', or 'a')".into(),
                    }))
                }
            }
        } else {
            None
        };
        let format_spec = if self.eat(&Tok::Colon)? {
            Some(Box::new(self.parse_format_spec()?))
        } else {
            None
        };
        self.expect(Tok::Rbrace)?;
        let end = self.prev_end();
        let conversion = match explicit_conversion {
            Some(flag) => flag,
            None if debug_text.is_some() && format_spec.is_none() => ConversionFlag::Repr,
            None => ConversionFlag::None,
        };
        let formatted = ExprFormattedValue {
            range: TextRange::new(start, end),
            value: Box::new(value),
            conversion,
            format_spec,
        }
        .into();
        match debug_text {
            Some((text, text_range)) => Ok(vec![
                ExprConstant { range: text_range, value: Constant::Str(text), kind: None }.into(),
                formatted,
            ]),
            None => Ok(vec![formatted]),
        }
    }

    fn parse_format_spec(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let mut values = Vec::new();
        loop {
            match self.peek()? {
                Tok::FStringMiddle { .. } => {
                    let (tok, range) = self.bump()?;
                    let Tok::FStringMiddle { value } = tok else { unreachable!() };
                    if !value.is_empty() {
                        values.push(ExprConstant { range, value: Constant::Str(value), kind: None }.into());
                    }
                }
                Tok::Lbrace => values.extend(self.parse_fstring_field()?),
                _ => break,
            }
        }
        let end = self.prev_end();
        Ok(ExprJoinedStr { range: TextRange::new(start, end), values: merge_adjacent_constants(values) }.into())
    }

    fn parse_parenthesized(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        self.bump()?; // '('
        if self.eat(&Tok::Rpar)? {
            return Ok(ExprTuple {
                range: TextRange::new(start, self.prev_end()),
                elts: Vec::new(),
                ctx: ExprContext::Load,
            }
            .into());
        }
        if self.at(&Tok::Yield)? {
            let value = self.parse_yield()?;
            self.expect(Tok::Rpar)?;
            return Ok(value);
        }

        let first = self.parse_starred_or_named_expr()?;

        if self.at_comprehension_for()? {
            let gen = self.parse_generator_exp_tail(first)?;
            self.expect(Tok::Rpar)?;
            return Ok(gen);
        }

        if self.at(&Tok::Comma)? {
            let mut elts = vec![first];
            while self.eat(&Tok::Comma)? {
                if self.at(&Tok::Rpar)? {
                    break;
                }
                elts.push(self.parse_starred_or_named_expr()?);
            }
            self.expect(Tok::Rpar)?;
            return Ok(ExprTuple {
                range: TextRange::new(start, self.prev_end()),
                elts,
                ctx: ExprContext::Load,
            }
            .into());
        }

        self.expect(Tok::Rpar)?;
        Ok(first)
    }

    fn parse_list_display(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        self.bump()?; // '['
        if self.eat(&Tok::Rsqb)? {
            return Ok(ExprList {
                range: TextRange::new(start, self.prev_end()),
                elts: Vec::new(),
                ctx: ExprContext::Load,
            }
            .into());
        }
        let first = self.parse_starred_or_named_expr()?;
        if self.at_comprehension_for()? {
            let elt = Box::new(first);
            let generators = self.parse_comprehensions()?;
            self.expect(Tok::Rsqb)?;
            return Ok(ExprListComp {
                range: TextRange::new(start, self.prev_end()),
                elt,
                generators,
            }
            .into());
        }
        let mut elts = vec![first];
        while self.eat(&Tok::Comma)? {
            if self.at(&Tok::Rsqb)? {
                break;
            }
            elts.push(self.parse_starred_or_named_expr()?);
        }
        self.expect(Tok::Rsqb)?;
        Ok(ExprList { range: TextRange::new(start, self.prev_end()), elts, ctx: ExprContext::Load }.into())
    }

    fn parse_dict_or_set_display(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        self.bump()?; // '{'
        if self.eat(&Tok::Rbrace)? {
            return Ok(ExprDict {
                range: TextRange::new(start, self.prev_end()),
                keys: Vec::new(),
                values: Vec::new(),
            }
            .into());
        }

        if self.eat(&Tok::DoubleStar)? {
            let value = self.parse_or_test()?;
            return self.parse_dict_display_tail(start, None, value);
        }

        let first = self.parse_starred_or_named_expr()?;

        if self.eat(&Tok::Colon)? {
            let value = self.parse_expr()?;
            return self.parse_dict_display_tail(start, Some(first), value);
        }

        if self.at_comprehension_for()? {
            let elt = Box::new(first);
            let generators = self.parse_comprehensions()?;
            self.expect(Tok::Rbrace)?;
            return Ok(ExprSetComp {
                range: TextRange::new(start, self.prev_end()),
                elt,
                generators,
            }
            .into());
        }

        let mut elts = vec![first];
        while self.eat(&Tok::Comma)? {
            if self.at(&Tok::Rbrace)? {
                break;
            }
            elts.push(self.parse_starred_or_named_expr()?);
        }
        self.expect(Tok::Rbrace)?;
        Ok(ExprSet { range: TextRange::new(start, self.prev_end()), elts }.into())
    }

    fn parse_dict_display_tail(&mut self, start: TextSize, first_key: Option<Expr>, first_value: Expr) -> PResult<Expr> {
        if self.at_comprehension_for()? {
            let key = first_key.map(Box::new).expect("dict comprehensions require a key:value pair");
            let generators = self.parse_comprehensions()?;
            self.expect(Tok::Rbrace)?;
            return Ok(ExprDictComp {
                range: TextRange::new(start, self.prev_end()),
                key,
                value: Box::new(first_value),
                generators,
            }
            .into());
        }

        let mut keys = vec![first_key];
        let mut values = vec![first_value];
        while self.eat(&Tok::Comma)? {
            if self.at(&Tok::Rbrace)? {
                break;
            }
            if self.eat(&Tok::DoubleStar)? {
                keys.push(None);
                values.push(self.parse_or_test()?);
            } else {
                let key = self.parse_expr()?;
                self.expect(Tok::Colon)?;
                let value = self.parse_expr()?;
                keys.push(Some(key));
                values.push(value);
            }
        }
        self.expect(Tok::Rbrace)?;
        Ok(ExprDict { range: TextRange::new(start, self.prev_end()), keys, values }.into())
    }

    fn at_comprehension_for(&mut self) -> PResult<bool> {
        Ok(matches!(self.peek()?, Tok::For) || (matches!(self.peek()?, Tok::Async) && matches!(self.peek_at(1)?, Tok::For)))
    }

    fn parse_generator_exp_tail(&mut self, elt: Expr) -> PResult<Expr> {
        let start = elt.start();
        let generators = self.parse_comprehensions()?;
        Ok(ExprGeneratorExp {
            range: TextRange::new(start, self.prev_end()),
            elt: Box::new(elt),
            generators,
        }
        .into())
    }

    fn parse_comprehensions(&mut self) -> PResult<Vec<Comprehension>> {
        let mut generators = Vec::new();
        while self.at_comprehension_for()? {
            generators.push(self.parse_comprehension()?);
        }
        Ok(generators)
    }

    fn parse_comprehension(&mut self) -> PResult<Comprehension> {
        let start = self.start()?;
        let is_async = self.eat(&Tok::Async)?;
        self.expect(Tok::For)?;
        let target = self.parse_target_list_for_comprehension()?;
        self.expect(Tok::In)?;
        let iter = self.parse_or_test()?;
        let mut ifs = Vec::new();
        while self.eat(&Tok::If)? {
            ifs.push(self.parse_or_test_no_ternary_recursion()?);
        }
        let end = ifs.last().map(Ranged::end).unwrap_or_else(|| iter.end());
        Ok(Comprehension {
            range: TextRange::new(start, end),
            target,
            iter,
            ifs,
            is_async,
        })
    }

    /// Comprehension `if` clauses parse at `or_test` precedence (no
    /// top-level ternary/lambda/named-expr), the same restriction CPython's
    /// grammar applies.
    fn parse_or_test_no_ternary_recursion(&mut self) -> PResult<Expr> {
        self.parse_or_test()
    }

    fn parse_target_list_for_comprehension(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        let first = self.parse_target_atom()?;
        if !self.at(&Tok::Comma)? {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Tok::Comma)? {
            if matches!(self.peek()?, Tok::In) {
                break;
            }
            elts.push(self.parse_target_atom()?);
        }
        let end = elts.last().map_or(self.prev_end(), Ranged::end);
        Ok(ExprTuple { range: TextRange::new(start, end), elts, ctx: ExprContext::Store }.into())
    }

    fn parse_target_atom(&mut self) -> PResult<Expr> {
        let expr = self.parse_unary_postfix()?;
        self.check_assignment_target(expr)
    }

    // -- match patterns ----------------------------------------------------

    fn parse_patterns(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        let first = self.parse_or_pattern()?;
        if !self.at(&Tok::Comma)? {
            return Ok(first);
        }
        let mut patterns = vec![first];
        while self.eat(&Tok::Comma)? {
            if matches!(self.peek()?, Tok::If | Tok::Colon) {
                break;
            }
            patterns.push(self.parse_or_pattern()?);
        }
        let end = patterns.last().map_or(self.prev_end(), Ranged::end);
        Ok(PatternMatchSequence { range: TextRange::new(start, end), patterns }.into())
    }

    fn parse_or_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        let mut patterns = vec![self.parse_as_pattern()?];
        while self.eat(&Tok::Vbar)? {
            patterns.push(self.parse_as_pattern()?);
        }
        if patterns.len() == 1 {
            return Ok(patterns.pop().expect("len checked"));
        }
        let end = patterns.last().expect("non-empty").end();
        Ok(PatternMatchOr { range: TextRange::new(start, end), patterns }.into())
    }

    fn parse_as_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        let pattern = self.parse_closed_pattern()?;
        if self.eat(&Tok::As)? {
            let name = self.parse_identifier()?;
            let end = name.end();
            return Ok(PatternMatchAs {
                range: TextRange::new(start, end),
                pattern: Some(Box::new(pattern)),
                name: Some(name),
            }
            .into());
        }
        Ok(pattern)
    }

    fn parse_closed_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        match self.peek()? {
            Tok::Name { name } if name == "_" => {
                self.bump()?;
                Ok(PatternMatchAs { range: TextRange::new(start, self.prev_end()), pattern: None, name: None }.into())
            }
            Tok::Star => {
                self.bump()?;
                let name = match self.peek()? {
                    Tok::Name { name } if name == "_" => {
                        self.bump()?;
                        None
                    }
                    Tok::Name { .. } => Some(self.parse_identifier()?),
                    _ => None,
                };
                Ok(PatternMatchStar { range: TextRange::new(start, self.prev_end()), name }.into())
            }
            Tok::None => {
                self.bump()?;
                Ok(PatternMatchSingleton { range: TextRange::new(start, self.prev_end()), value: Constant::None }.into())
            }
            Tok::True => {
                self.bump()?;
                Ok(PatternMatchSingleton { range: TextRange::new(start, self.prev_end()), value: Constant::Bool(true) }.into())
            }
            Tok::False => {
                self.bump()?;
                Ok(PatternMatchSingleton { range: TextRange::new(start, self.prev_end()), value: Constant::Bool(false) }.into())
            }
            Tok::Lsqb | Tok::Lpar => self.parse_sequence_pattern(),
            Tok::Lbrace => self.parse_mapping_pattern(),
            Tok::Name { .. } => self.parse_value_or_class_or_capture_pattern(),
            Tok::Minus | Tok::Int { .. } | Tok::Float { .. } | Tok::Complex { .. } | Tok::String { .. } => {
                self.parse_literal_pattern()
            }
            other => Err(self.error(ParseErrorType::UnexpectedToken {
                found: format!("{other:?}"),
                expected: "a pattern".into(),
            })),
        }
    }

    fn parse_literal_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        let value = self.parse_pattern_literal_expr()?;
        let end = value.end();
        Ok(PatternMatchValue { range: TextRange::new(start, end), value: Box::new(value) }.into())
    }

    /// The constrained expression grammar legal in a literal match pattern:
    /// numbers (optionally negated), strings, and `real ± imagj` complex
    /// literals, matching CPython's `literal_pattern` production.
    fn parse_pattern_literal_expr(&mut self) -> PResult<Expr> {
        let start = self.start()?;
        if self.eat(&Tok::Minus)? {
            let operand = self.parse_pattern_number_atom()?;
            let end = operand.end();
            let mut expr: Expr = ExprUnaryOp {
                range: TextRange::new(start, end),
                op: UnaryOp::USub,
                operand: Box::new(operand),
            }
            .into();
            if matches!(self.peek()?, Tok::Plus | Tok::Minus) {
                expr = self.parse_pattern_complex_tail(start, expr)?;
            }
            return Ok(expr);
        }
        let first = self.parse_atom()?;
        if matches!(self.peek()?, Tok::Plus | Tok::Minus) {
            return self.parse_pattern_complex_tail(start, first);
        }
        Ok(first)
    }

    fn parse_pattern_number_atom(&mut self) -> PResult<Expr> {
        self.parse_atom()
    }

    fn parse_pattern_complex_tail(&mut self, start: TextSize, real: Expr) -> PResult<Expr> {
        let op = match self.peek()? {
            Tok::Plus => Operator::Add,
            Tok::Minus => Operator::Sub,
            _ => return Ok(real),
        };
        self.bump()?;
        let imag = self.parse_pattern_number_atom()?;
        let end = imag.end();
        Ok(ExprBinOp {
            range: TextRange::new(start, end),
            left: Box::new(real),
            op,
            right: Box::new(imag),
        }
        .into())
    }

    fn parse_value_or_class_or_capture_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        let mut expr: Expr = {
            let name = self.parse_identifier()?;
            ExprName { range: name.range(), id: name, ctx: ExprContext::Load }.into()
        };
        let mut is_dotted_or_call = false;
        while self.at(&Tok::Dot)? {
            is_dotted_or_call = true;
            self.bump()?;
            let attr = self.parse_identifier()?;
            let end = attr.end();
            expr = ExprAttribute {
                range: TextRange::new(start, end),
                value: Box::new(expr),
                attr,
                ctx: ExprContext::Load,
            }
            .into();
        }

        if self.at(&Tok::Lpar)? {
            is_dotted_or_call = true;
            self.bump()?;
            let (positional, keyword) = self.parse_class_pattern_arguments()?;
            self.expect(Tok::Rpar)?;
            let (mut patterns, mut kwd_attrs, mut kwd_patterns) = (Vec::new(), Vec::new(), Vec::new());
            for p in positional {
                patterns.push(p);
            }
            for (name, pattern) in keyword {
                kwd_attrs.push(name);
                kwd_patterns.push(pattern);
            }
            return Ok(PatternMatchClass {
                range: TextRange::new(start, self.prev_end()),
                cls: Box::new(expr),
                patterns: std::mem::take(&mut patterns),
                kwd_attrs,
                kwd_patterns,
            }
            .into());
        }

        if is_dotted_or_call {
            let end = expr.end();
            return Ok(PatternMatchValue { range: TextRange::new(start, end), value: Box::new(expr) }.into());
        }

        let Expr::Name(ExprName { id, .. }) = expr else {
            unreachable!("built as ExprName above");
        };
        Ok(PatternMatchAs { range: TextRange::new(start, id.end()), pattern: None, name: Some(id) }.into())
    }

    fn parse_class_pattern_arguments(&mut self) -> PResult<(Vec<Pattern>, Vec<(Identifier, Pattern)>)> {
        let mut positional = Vec::new();
        let mut keyword = Vec::new();
        while !self.at(&Tok::Rpar)? {
            if matches!(self.peek()?, Tok::Name { .. }) && matches!(self.peek_at(1)?, Tok::Equal) {
                let name = self.parse_identifier()?;
                self.bump()?; // '='
                let pattern = self.parse_or_pattern()?;
                keyword.push((name, pattern));
            } else {
                positional.push(self.parse_or_pattern()?);
            }
            if !self.eat(&Tok::Comma)? {
                break;
            }
        }
        Ok((positional, keyword))
    }

    fn parse_sequence_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        let (open, close) = if self.eat(&Tok::Lsqb)? {
            (Tok::Lsqb, Tok::Rsqb)
        } else {
            self.bump()?;
            (Tok::Lpar, Tok::Rpar)
        };
        let _ = open;
        let mut patterns = Vec::new();
        while !self.at(&close)? {
            patterns.push(self.parse_or_pattern()?);
            if !self.eat(&Tok::Comma)? {
                break;
            }
        }
        self.expect(close)?;
        Ok(PatternMatchSequence { range: TextRange::new(start, self.prev_end()), patterns }.into())
    }

    fn parse_mapping_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start()?;
        self.bump()?; // '{'
        let mut keys = Vec::new();
        let mut patterns = Vec::new();
        let mut rest = None;
        while !self.at(&Tok::Rbrace)? {
            if self.eat(&Tok::DoubleStar)? {
                rest = Some(self.parse_identifier()?);
            } else {
                let key = self.parse_pattern_literal_expr()?;
                self.expect(Tok::Colon)?;
                let pattern = self.parse_or_pattern()?;
                keys.push(key);
                patterns.push(pattern);
            }
            if !self.eat(&Tok::Comma)? {
                break;
            }
        }
        self.expect(Tok::Rbrace)?;
        Ok(PatternMatchMapping {
            range: TextRange::new(start, self.prev_end()),
            keys,
            patterns,
            rest,
        }
        .into())
    }

    // -- leaves -------------------------------------------------------------

    fn parse_identifier(&mut self) -> PResult<Identifier> {
        let range = self.range()?;
        match self.peek()? {
            Tok::Name { name } => {
                self.bump()?;
                Ok(Identifier::new(name, range))
            }
            other => Err(self.error(ParseErrorType::UnexpectedToken {
                found: format!("{other:?}"),
                expected: "an identifier".into(),
            })),
        }
    }
}

/// Rewrites every `Name`/`Attribute`/`Subscript`/`Starred`/`List`/`Tuple`
/// leaf's context in an assignment-target expression tree, leaving
/// everything else (already validated by `check_target_shape`) untouched.
fn retag_context(expr: Expr, ctx: ExprContext) -> Expr {
    match expr {
        Expr::Name(mut e) => {
            e.ctx = ctx;
            Expr::Name(e)
        }
        Expr::Attribute(mut e) => {
            e.ctx = ctx;
            Expr::Attribute(e)
        }
        Expr::Subscript(mut e) => {
            e.ctx = ctx;
            Expr::Subscript(e)
        }
        Expr::Starred(mut e) => {
            e.value = Box::new(retag_context(*e.value, ctx));
            e.ctx = ctx;
            Expr::Starred(e)
        }
        Expr::List(mut e) => {
            e.elts = e.elts.into_iter().map(|el| retag_context(el, ctx)).collect();
            e.ctx = ctx;
            Expr::List(e)
        }
        Expr::Tuple(mut e) => {
            e.elts = e.elts.into_iter().map(|el| retag_context(el, ctx)).collect();
            e.ctx = ctx;
            Expr::Tuple(e)
        }
        other => other,
    }
}

/// Merges adjacent `Constant(Str)` entries in a `JoinedStr`'s value list
/// (§3.2 invariant 5), which can arise either from adjacent literal string
/// tokens or from a self-documenting field's `expr=` constant landing next
/// to a preceding literal chunk.
fn merge_adjacent_constants(values: Vec<Expr>) -> Vec<Expr> {
    let mut out: Vec<Expr> = Vec::with_capacity(values.len());
    for value in values {
        if let (Some(Expr::Constant(prev)), Expr::Constant(next)) = (out.last_mut(), &value) {
            if let (Constant::Str(prev_s), Constant::Str(next_s)) = (&mut prev.value, &next.value) {
                prev_s.push_str(next_s);
                prev.range = TextRange::new(prev.range.start(), next.range.end());
                continue;
            }
        }
        out.push(value);
    }
    out
}

/// Validates that an expression is legal as an assignment/`del` target
/// (§4.2 "Targets"): names, attributes, subscripts, and (possibly nested,
/// possibly starred) lists/tuples of the same. Anything else (a call, a
/// literal, a comparison, ...) is a `SyntaxError`.
fn check_target_shape(expr: Expr, filename: &str) -> PResult<Expr> {
    match &expr {
        Expr::Name(_) | Expr::Attribute(_) | Expr::Subscript(_) => Ok(expr),
        Expr::Starred(e) => {
            check_target_shape_ref(&e.value, filename)?;
            Ok(expr)
        }
        Expr::List(e) => {
            for el in &e.elts {
                check_target_shape_ref(el, filename)?;
            }
            Ok(expr)
        }
        Expr::Tuple(e) => {
            for el in &e.elts {
                check_target_shape_ref(el, filename)?;
            }
            Ok(expr)
        }
        other => Err(Error::Parse(ParseError {
            error: ParseErrorType::InvalidAssignmentTarget(other.python_name().to_string()),
            location: other.range(),
            filename: filename.to_string(),
        })),
    }
}

fn check_target_shape_ref(expr: &Expr, filename: &str) -> PResult<()> {
    check_target_shape(expr.clone(), filename).map(|_| ())
}

pub fn parse_module(source: &str) -> Result<ModModule, crate::error::Error> {
    Parser::new(source, String::new(), None).parse_module()
}

/// Builds an `Int`/`Float`/etc constant directly, used by tests that need a
/// `BigInt` without going through the lexer.
#[allow(dead_code)]
fn int_constant(value: i64) -> Constant {
    Constant::Int(BigInt::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(source: &str) -> ModModule {
        parse_module(source).expect("parses")
    }

    fn stmt(source: &str) -> Stmt {
        module(source).body.into_iter().next().expect("one statement")
    }

    #[test]
    fn walrus_in_while_condition() {
        let Stmt::While(w) = stmt("while (n := next(it)) is not None:\n    use(n)\n") else {
            panic!("expected While");
        };
        assert!(matches!(*w.test, Expr::Compare(_)));
        let Expr::Compare(cmp) = *w.test else { unreachable!() };
        assert!(matches!(*cmp.left, Expr::NamedExpr(_)));
    }

    #[test]
    fn match_statement_with_class_and_or_patterns() {
        let Stmt::Match(m) = stmt(
            "match command.split():\n\
             \x20   case Point(x=0, y=0) | Point(x=0):\n\
             \x20       pass\n\
             \x20   case [x, y, *rest]:\n\
             \x20       pass\n\
             \x20   case {\"key\": value, **rest}:\n\
             \x20       pass\n\
             \x20   case _:\n\
             \x20       pass\n",
        ) else {
            panic!("expected Match");
        };
        assert_eq!(m.cases.len(), 4);
        assert!(matches!(m.cases[0].pattern, Pattern::MatchOr(_)));
        assert!(matches!(m.cases[1].pattern, Pattern::MatchSequence(_)));
        assert!(matches!(m.cases[2].pattern, Pattern::MatchMapping(_)));
        assert!(matches!(m.cases[3].pattern, Pattern::MatchAs(_)));
    }

    #[test]
    fn try_star_collects_exception_group_handlers() {
        let Stmt::TryStar(t) = stmt(
            "try:\n    work()\nexcept* ValueError:\n    pass\nexcept* (TypeError, KeyError) as e:\n    pass\n",
        ) else {
            panic!("expected TryStar");
        };
        assert_eq!(t.handlers.len(), 2);
    }

    #[test]
    fn parenthesized_with_items_parse_as_a_single_with_statement() {
        let Stmt::With(w) = stmt("with (open(\"a\") as a, open(\"b\") as b):\n    pass\n") else {
            panic!("expected With");
        };
        assert_eq!(w.items.len(), 2);
        assert!(w.items[0].optional_vars.is_some());
    }

    #[test]
    fn async_function_def_shares_function_def_shape() {
        let Stmt::FunctionDef(f) = stmt("async def fetch(url):\n    return await get(url)\n") else {
            panic!("expected FunctionDef");
        };
        assert!(f.is_async);
        assert_eq!(f.name.as_str(), "fetch");
    }

    #[test]
    fn decorator_list_is_attached_in_source_order() {
        let Stmt::FunctionDef(f) = stmt("@a\n@b.c\ndef f():\n    pass\n") else {
            panic!("expected FunctionDef");
        };
        assert_eq!(f.decorator_list.len(), 2);
    }

    #[test]
    fn positional_only_and_keyword_only_params_roundtrip_through_arguments() {
        let Stmt::FunctionDef(f) = stmt("def f(a, b, /, c, *, d=1):\n    pass\n") else {
            panic!("expected FunctionDef");
        };
        assert_eq!(f.args.posonlyargs.len(), 2);
        assert_eq!(f.args.args.len(), 1);
        assert_eq!(f.args.kwonlyargs.len(), 1);
    }

    #[test]
    fn invalid_assignment_target_is_rejected() {
        let err = Parser::new("1 + 1 = 2\n", String::new(), None)
            .parse_module()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError {
                error: ParseErrorType::InvalidAssignmentTarget(_),
                ..
            })
        ));
    }

    #[test]
    fn token_ceiling_reports_a_resource_error() {
        let err = Parser::new("x = 1\ny = 2\nz = 3\n", String::new(), Some(2))
            .parse_module()
            .unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn dict_comprehension_has_one_generator_with_tuple_target() {
        let Stmt::Expr(e) = stmt("{k: v for k, v in pairs}\n") else {
            panic!("expected Expr");
        };
        let Expr::DictComp(comp) = *e.value else {
            panic!("expected DictComp");
        };
        assert!(matches!(*comp.key, Expr::Name(_)));
        assert!(matches!(*comp.value, Expr::Name(_)));
        assert_eq!(comp.generators.len(), 1);
        assert!(matches!(comp.generators[0].target, Expr::Tuple(_)));
        assert!(comp.generators[0].ifs.is_empty());
    }
}
