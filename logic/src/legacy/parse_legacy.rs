use crate::legacy::lexer::{Token, TokenKind};
use crate::legacy::object::MAX_NESTING_DEPTH;
use crate::legacy::source_error::{SourceError, SourceResult, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `a = b = value`; targets are assigned left to right.
    Assign {
        targets: Vec<Target>,
        value: Expression,
    },
    AugmentedAdd {
        target: Target,
        value: Expression,
        span: Span,
    },
    /// `name.update(argument)`
    Update {
        name: Identifier,
        argument: Expression,
        span: Span,
    },
    Import {
        span: Span,
    },
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Name(Identifier),
    Subscript {
        name: Identifier,
        key: Expression,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),
    List(Vec<Expression>),
    Tuple(Vec<Expression>),
    Dict(Vec<(Expression, Expression)>),
    Negate(Box<Expression>),
    Plus(Box<Expression>),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Subscript {
        value: Box<Expression>,
        key: Box<Expression>,
    },
    MethodCall {
        receiver: Box<Expression>,
        method: Identifier,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
        }
    }
}

const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "and", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "global", "if", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

pub fn parse_module(tokens: &[Token]) -> SourceResult<Module> {
    Parser::new(tokens).parse_module()
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    /// Expressions currently being parsed inside one another.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    fn current(&self) -> &'a Token {
        // the lexer always terminates the stream with EndOfFile
        let index = self.position.min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    fn peek_kind(&self, offset: usize) -> Option<&'a TokenKind> {
        self.tokens.get(self.position + offset).map(|token| &token.kind)
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> SourceResult<&'a Token> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        Err(self.unexpected(&format!("{kind}")))
    }

    fn unexpected(&self, expected: &str) -> SourceError {
        let token = self.current();
        match &token.kind {
            TokenKind::Unsupported(operator) => SourceError::unsupported(
                format!("operator '{operator}' is not supported"),
                token.span.clone(),
                "unsupported operator",
            ),
            TokenKind::Name(name) if UNSUPPORTED_KEYWORDS.contains(&name.as_str()) => {
                SourceError::unsupported(
                    format!("'{name}' is not supported"),
                    token.span.clone(),
                    "unsupported keyword",
                )
            }
            other => SourceError::syntax(
                format!("expected {expected}, found {other}"),
                token.span.clone(),
                format!("expected {expected}"),
            ),
        }
    }

    fn parse_module(mut self) -> SourceResult<Module> {
        let mut statements = vec![];
        loop {
            while self.eat(&TokenKind::Newline) {}
            if self.at(&TokenKind::EndOfFile) {
                break;
            }
            statements.push(self.parse_simple_statement()?);
            while self.eat(&TokenKind::Semicolon) {
                if matches!(
                    self.current().kind,
                    TokenKind::Newline | TokenKind::EndOfFile
                ) {
                    break;
                }
                statements.push(self.parse_simple_statement()?);
            }
            if !self.eat(&TokenKind::Newline) && !self.at(&TokenKind::EndOfFile) {
                return Err(self.unexpected("end of statement"));
            }
        }
        Ok(Module { statements })
    }

    fn parse_simple_statement(&mut self) -> SourceResult<Statement> {
        let first = self.current();
        if let TokenKind::Name(name) = &first.kind {
            match name.as_str() {
                "import" | "from" => return Ok(self.skip_import()),
                name if UNSUPPORTED_KEYWORDS.contains(&name) => {
                    return Err(SourceError::unsupported(
                        format!("'{name}' statements are not supported"),
                        first.span.clone(),
                        "unsupported statement",
                    ));
                }
                _ => {}
            }
        }

        let expression = self.parse_expression_list()?;
        if self.at(&TokenKind::Equals) {
            let mut targets = vec![to_target(expression)?];
            self.advance();
            let mut value = self.parse_expression_list()?;
            while self.eat(&TokenKind::Equals) {
                targets.push(to_target(value)?);
                value = self.parse_expression_list()?;
            }
            return Ok(Statement::Assign { targets, value });
        }
        if self.eat(&TokenKind::PlusEquals) {
            let value = self.parse_expression_list()?;
            let span = expression.span.start..value.span.end;
            return Ok(Statement::AugmentedAdd {
                target: to_target(expression)?,
                value,
                span,
            });
        }
        if let ExpressionKind::MethodCall {
            receiver,
            method,
            arguments,
        } = &expression.kind
        {
            if let (ExpressionKind::Name(name), "update", [argument]) =
                (&receiver.kind, method.name.as_str(), arguments.as_slice())
            {
                return Ok(Statement::Update {
                    name: Identifier {
                        name: name.clone(),
                        span: receiver.span.clone(),
                    },
                    argument: argument.clone(),
                    span: expression.span.clone(),
                });
            }
        }
        Ok(Statement::Expression(expression))
    }

    /// Imports are skipped; whatever they would bind stays undefined.
    fn skip_import(&mut self) -> Statement {
        let start = self.current().span.start;
        let mut end = start;
        while !matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EndOfFile
        ) {
            end = self.advance().span.end;
        }
        Statement::Import { span: start..end }
    }

    /// Comma separated expressions; more than one (or a trailing comma) yields a tuple.
    fn parse_expression_list(&mut self) -> SourceResult<Expression> {
        let first = self.parse_expression()?;
        if !self.at(&TokenKind::Comma) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut end = first.span.end;
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if !self.starts_expression() {
                break;
            }
            let item = self.parse_expression()?;
            end = item.span.end;
            items.push(item);
        }
        Ok(Expression {
            kind: ExpressionKind::Tuple(items),
            span: start..end,
        })
    }

    fn starts_expression(&self) -> bool {
        match &self.current().kind {
            TokenKind::Name(name) => !UNSUPPORTED_KEYWORDS.contains(&name.as_str()),
            TokenKind::Str(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::Plus
            | TokenKind::Minus => true,
            _ => false,
        }
    }

    fn parse_expression(&mut self) -> SourceResult<Expression> {
        let mut left = self.parse_term()?;
        loop {
            let operator = match self.current().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_term(&mut self) -> SourceResult<Expression> {
        let mut left = self.parse_unary()?;
        while self.eat(&TokenKind::Star) {
            let right = self.parse_unary()?;
            left = binary(BinaryOperator::Multiply, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> SourceResult<Expression> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SourceError::syntax(
                "too many nested parentheses",
                self.current().span.clone(),
                "nested too deeply",
            ));
        }
        self.depth += 1;
        let result = self.parse_nested_unary();
        self.depth -= 1;
        result
    }

    fn parse_nested_unary(&mut self) -> SourceResult<Expression> {
        let start = self.current().span.start;
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            let span = start..operand.span.end;
            return Ok(Expression {
                kind: ExpressionKind::Negate(Box::new(operand)),
                span,
            });
        }
        if self.eat(&TokenKind::Plus) {
            let operand = self.parse_unary()?;
            let span = start..operand.span.end;
            return Ok(Expression {
                kind: ExpressionKind::Plus(Box::new(operand)),
                span,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> SourceResult<Expression> {
        let mut expression = self.parse_primary()?;
        loop {
            match self.current().kind {
                TokenKind::LeftBracket => {
                    self.advance();
                    let key = self.parse_expression_list()?;
                    let end = self.expect(&TokenKind::RightBracket)?.span.end;
                    let span = expression.span.start..end;
                    expression = Expression {
                        kind: ExpressionKind::Subscript {
                            value: Box::new(expression),
                            key: Box::new(key),
                        },
                        span,
                    };
                }
                TokenKind::Dot => {
                    let dot = self.advance();
                    let method = match &self.current().kind {
                        TokenKind::Name(name) => Identifier {
                            name: name.clone(),
                            span: self.advance().span.clone(),
                        },
                        _ => return Err(self.unexpected("attribute name")),
                    };
                    if !self.at(&TokenKind::LeftParen) {
                        return Err(SourceError::unsupported(
                            format!("attribute access '.{}' is not supported", method.name),
                            dot.span.start..method.span.end,
                            "attribute access",
                        ));
                    }
                    let (arguments, end) = self.parse_call_arguments()?;
                    let span = expression.span.start..end;
                    expression = Expression {
                        kind: ExpressionKind::MethodCall {
                            receiver: Box::new(expression),
                            method,
                            arguments,
                        },
                        span,
                    };
                }
                TokenKind::LeftParen => {
                    let (_, end) = self.parse_call_arguments()?;
                    return Err(SourceError::unsupported(
                        "function calls are not supported",
                        expression.span.start..end,
                        "function call",
                    ));
                }
                _ => return Ok(expression),
            }
        }
    }

    fn parse_call_arguments(&mut self) -> SourceResult<(Vec<Expression>, usize)> {
        self.expect(&TokenKind::LeftParen)?;
        let mut arguments = vec![];
        while !self.at(&TokenKind::RightParen) {
            if let (TokenKind::Name(_), Some(TokenKind::Equals)) =
                (&self.current().kind, self.peek_kind(1))
            {
                return Err(SourceError::unsupported(
                    "keyword arguments are not supported",
                    self.current().span.clone(),
                    "keyword argument",
                ));
            }
            arguments.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RightParen)?.span.end;
        Ok((arguments, end))
    }

    fn parse_primary(&mut self) -> SourceResult<Expression> {
        let token = self.current();
        let start = token.span.start;
        let kind = match &token.kind {
            TokenKind::Name(name) => match name.as_str() {
                "None" => ExpressionKind::None,
                "True" => ExpressionKind::Bool(true),
                "False" => ExpressionKind::Bool(false),
                name if UNSUPPORTED_KEYWORDS.contains(&name) => {
                    return Err(self.unexpected("expression"));
                }
                name => ExpressionKind::Name(name.to_string()),
            },
            TokenKind::Int(value) => ExpressionKind::Int(*value),
            TokenKind::Float(value) => ExpressionKind::Float(*value),
            TokenKind::Str(_) => return Ok(self.parse_strings()),
            TokenKind::LeftParen => return self.parse_parenthesized(),
            TokenKind::LeftBracket => return self.parse_list(),
            TokenKind::LeftBrace => return self.parse_dict(),
            _ => return Err(self.unexpected("expression")),
        };
        let end = self.advance().span.end;
        Ok(Expression {
            kind,
            span: start..end,
        })
    }

    /// Adjacent string literals concatenate.
    fn parse_strings(&mut self) -> Expression {
        let start = self.current().span.start;
        let mut end = start;
        let mut value = String::new();
        while let TokenKind::Str(part) = &self.current().kind {
            value.push_str(part);
            end = self.advance().span.end;
        }
        Expression {
            kind: ExpressionKind::Str(value),
            span: start..end,
        }
    }

    fn parse_parenthesized(&mut self) -> SourceResult<Expression> {
        let start = self.expect(&TokenKind::LeftParen)?.span.start;
        if self.at(&TokenKind::RightParen) {
            let end = self.advance().span.end;
            return Ok(Expression {
                kind: ExpressionKind::Tuple(vec![]),
                span: start..end,
            });
        }
        let inner = self.parse_expression_list()?;
        let end = self.expect(&TokenKind::RightParen)?.span.end;
        Ok(Expression {
            kind: inner.kind,
            span: start..end,
        })
    }

    fn parse_list(&mut self) -> SourceResult<Expression> {
        let start = self.expect(&TokenKind::LeftBracket)?.span.start;
        let mut items = vec![];
        while !self.at(&TokenKind::RightBracket) {
            items.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if !self.at(&TokenKind::RightBracket) {
            return Err(self.unexpected("',' or ']'"));
        }
        let end = self.advance().span.end;
        Ok(Expression {
            kind: ExpressionKind::List(items),
            span: start..end,
        })
    }

    fn parse_dict(&mut self) -> SourceResult<Expression> {
        let start = self.expect(&TokenKind::LeftBrace)?.span.start;
        let mut entries = vec![];
        while !self.at(&TokenKind::RightBrace) {
            let key = self.parse_expression()?;
            if !self.at(&TokenKind::Colon) {
                if matches!(self.current().kind, TokenKind::Comma | TokenKind::RightBrace) {
                    return Err(SourceError::unsupported(
                        "set literals are not supported",
                        key.span,
                        "set element",
                    ));
                }
                return Err(self.unexpected("':'"));
            }
            self.advance();
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if !self.at(&TokenKind::RightBrace) {
            return Err(self.unexpected("',' or '}'"));
        }
        let end = self.advance().span.end;
        Ok(Expression {
            kind: ExpressionKind::Dict(entries),
            span: start..end,
        })
    }
}

fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    let span = left.span.start..right.span.end;
    Expression {
        kind: ExpressionKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    }
}

fn to_target(expression: Expression) -> SourceResult<Target> {
    match expression.kind {
        ExpressionKind::Name(name) => Ok(Target::Name(Identifier {
            name,
            span: expression.span,
        })),
        ExpressionKind::Subscript { value, key } => match value.kind {
            ExpressionKind::Name(name) => Ok(Target::Subscript {
                name: Identifier {
                    name,
                    span: value.span,
                },
                key: *key,
                span: expression.span,
            }),
            _ => Err(SourceError::unsupported(
                "only subscripts of plain names can be assigned to",
                expression.span,
                "assignment target",
            )),
        },
        ExpressionKind::Tuple(_) => Err(SourceError::unsupported(
            "tuple unpacking is not supported",
            expression.span,
            "assignment target",
        )),
        _ => Err(SourceError::syntax(
            "cannot assign to expression",
            expression.span,
            "assignment target",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::lexer::tokenize;
    use expect_test::{Expect, expect};
    use std::fmt::Write;

    /// Compact s-expression rendering of the parse tree.
    fn render_expression(expression: &Expression) -> String {
        fn render_all(items: &[Expression]) -> String {
            items.iter().map(render_expression).collect::<Vec<_>>().join(" ")
        }
        match &expression.kind {
            ExpressionKind::None => "None".to_string(),
            ExpressionKind::Bool(value) => format!("{value}"),
            ExpressionKind::Int(value) => format!("{value}"),
            ExpressionKind::Float(value) => format!("{value:?}"),
            ExpressionKind::Str(value) => format!("{value:?}"),
            ExpressionKind::Name(name) => name.clone(),
            ExpressionKind::List(items) => format!("(list {})", render_all(items)),
            ExpressionKind::Tuple(items) => format!("(tuple {})", render_all(items)),
            ExpressionKind::Dict(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| {
                        format!("{}={}", render_expression(key), render_expression(value))
                    })
                    .collect();
                format!("(dict {})", entries.join(" "))
            }
            ExpressionKind::Negate(operand) => format!("(neg {})", render_expression(operand)),
            ExpressionKind::Plus(operand) => format!("(pos {})", render_expression(operand)),
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => format!(
                "({} {} {})",
                operator.symbol(),
                render_expression(left),
                render_expression(right)
            ),
            ExpressionKind::Subscript { value, key } => {
                format!("(index {} {})", render_expression(value), render_expression(key))
            }
            ExpressionKind::MethodCall {
                receiver,
                method,
                arguments,
            } => format!(
                "(call {}.{} {})",
                render_expression(receiver),
                method.name,
                render_all(arguments)
            ),
        }
    }

    fn render_target(target: &Target) -> String {
        match target {
            Target::Name(identifier) => identifier.name.clone(),
            Target::Subscript { name, key, .. } => {
                format!("{}[{}]", name.name, render_expression(key))
            }
        }
    }

    fn render_module(module: &Module) -> String {
        let mut output = String::new();
        for statement in &module.statements {
            match statement {
                Statement::Assign { targets, value } => {
                    let targets: Vec<String> = targets.iter().map(render_target).collect();
                    writeln!(output, "{} = {}", targets.join(" = "), render_expression(value))
                }
                Statement::AugmentedAdd { target, value, .. } => writeln!(
                    output,
                    "{} += {}",
                    render_target(target),
                    render_expression(value)
                ),
                Statement::Update { name, argument, .. } => {
                    writeln!(output, "update {} {}", name.name, render_expression(argument))
                }
                Statement::Import { span } => writeln!(output, "import @ {span:?}"),
                Statement::Expression(expression) => {
                    writeln!(output, "expr {}", render_expression(expression))
                }
            }
            .unwrap();
        }
        output
    }

    fn test_parse(source: &str, expected: Expect) {
        let tokens = tokenize(source).unwrap();
        let module = parse_module(&tokens).unwrap();
        expected.assert_eq(&render_module(&module));
    }

    macro_rules! test_parse {
        ($name: ident, $source: expr, $expected: expr) => {
            #[test]
            fn $name() {
                test_parse($source, $expected);
            }
        };
    }

    fn test_parse_fail(source: &str, expected: Expect) {
        let tokens = tokenize(source).unwrap();
        let error = parse_module(&tokens).expect_err("Expected error");
        expected.assert_eq(&format!("{} @ {:?}", error.message, error.span));
    }

    macro_rules! test_parse_fail {
        ($name: ident, $source: expr, $expected: expr) => {
            #[test]
            fn $name() {
                test_parse_fail($source, $expected);
            }
        };
    }

    test_parse!(empty, "", expect![""]);

    test_parse!(
        typical_um_env,
        r#"
# UM environment
import os

vars = {
    "UM_START_DATE": "19600101",
    "UM_NPES": 16,
    "UM_FLAGS": ["-d", "-v"],
}
"#,
        expect![[r#"
            import @ 18..27
            vars = (dict "UM_START_DATE"="19600101" "UM_NPES"=16 "UM_FLAGS"=(list "-d" "-v"))
        "#]]
    );

    test_parse!(
        scalars,
        "a = None; b = True; c = False; d = -1.5; e = +2",
        expect![[r#"
            a = None
            b = true
            c = false
            d = (neg 1.5)
            e = (pos 2)
        "#]]
    );

    test_parse!(
        tuples,
        "a = (); b = (1,); c = 1, 2; d = (3)",
        expect![[r#"
            a = (tuple )
            b = (tuple 1)
            c = (tuple 1 2)
            d = 3
        "#]]
    );

    test_parse!(
        operator_precedence,
        "x = 1 + 2 * 3 - 4",
        expect![[r#"
            x = (- (+ 1 (* 2 3)) 4)
        "#]]
    );

    test_parse!(
        adjacent_strings,
        "x = ('abc'\n     \"def\")",
        expect![[r#"
            x = "abcdef"
        "#]]
    );

    test_parse!(
        chained_assignment,
        "a = b = 'x'",
        expect![[r#"
            a = b = "x"
        "#]]
    );

    test_parse!(
        subscripts_and_updates,
        "vars['A'] = base['B'][0]\nvars += {}\nvars.update({'C': 1})\n'docstring'",
        expect![[r#"
            vars["A"] = (index (index base "B") 0)
            vars += (dict )
            update vars (dict "C"=1)
            expr "docstring"
        "#]]
    );

    test_parse!(
        from_import,
        "from os import path as p\nx = 1",
        expect![[r#"
            import @ 0..24
            x = 1
        "#]]
    );

    test_parse_fail!(
        attribute_access,
        "x = os.environ['HOME']",
        expect![[r#"attribute access '.environ' is not supported @ 6..14"#]]
    );

    test_parse_fail!(
        plain_call,
        "x = dict(A=1)",
        expect![[r#"keyword arguments are not supported @ 9..10"#]]
    );

    test_parse_fail!(
        call_without_keywords,
        "x = str(1)",
        expect![[r#"function calls are not supported @ 4..10"#]]
    );

    test_parse_fail!(
        if_statement,
        "if x: y = 1",
        expect![[r#"'if' statements are not supported @ 0..2"#]]
    );

    test_parse_fail!(
        conditional_expression,
        "x = 1 if y else 2",
        expect![[r#"'if' is not supported @ 6..8"#]]
    );

    test_parse_fail!(
        division,
        "x = 1 / 2",
        expect![[r#"operator '/' is not supported @ 6..7"#]]
    );

    test_parse_fail!(
        set_literal,
        "x = {1, 2}",
        expect![[r#"set literals are not supported @ 5..6"#]]
    );

    test_parse_fail!(
        missing_comma,
        "x = [1 2]",
        expect![[r#"expected ',' or ']', found number @ 7..8"#]]
    );

    test_parse_fail!(
        missing_value,
        "x = ",
        expect![[r#"expected expression, found end of line @ 4..4"#]]
    );

    test_parse_fail!(
        assign_to_literal,
        "1 = x",
        expect![[r#"cannot assign to expression @ 0..1"#]]
    );

    test_parse!(
        nesting_up_to_the_limit,
        &format!("x = {}1{}", "(".repeat(199), ")".repeat(199)),
        expect![[r#"
            x = 1
        "#]]
    );

    test_parse_fail!(
        nesting_beyond_the_limit,
        &format!("x = {}1{}", "[".repeat(300), "]".repeat(300)),
        expect![[r#"too many nested parentheses @ 204..205"#]]
    );

    test_parse_fail!(
        tuple_unpacking,
        "a, b = 1, 2",
        expect![[r#"tuple unpacking is not supported @ 0..4"#]]
    );
}
