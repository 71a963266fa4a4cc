use crate::legacy::source_error::{SourceError, SourceResult, Span};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    Str(String),
    Int(i64),
    Float(f64),
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Equals,
    PlusEquals,
    Plus,
    Minus,
    Star,
    /// Operator outside the supported subset, kept so the parser can point at it.
    Unsupported(String),
    Newline,
    EndOfFile,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Name(name) => write!(f, "name '{name}'"),
            TokenKind::Str(_) => write!(f, "string literal"),
            TokenKind::Int(_) | TokenKind::Float(_) => write!(f, "number"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBracket => write!(f, "'['"),
            TokenKind::RightBracket => write!(f, "']'"),
            TokenKind::LeftBrace => write!(f, "'{{'"),
            TokenKind::RightBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::PlusEquals => write!(f, "'+='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Unsupported(operator) => write!(f, "'{operator}'"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::EndOfFile => write!(f, "end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Splits legacy source into tokens. Newlines inside brackets and after a
/// backslash continuation are dropped, so every `Newline` token ends a logical line.
pub fn tokenize(source: &str) -> SourceResult<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    position: usize,
    at_line_start: bool,
    open_brackets: Vec<(char, usize)>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            at_line_start: true,
            open_brackets: vec![],
            tokens: vec![],
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.position..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            span: start..self.position,
        });
    }

    fn push_newline(&mut self, start: usize) {
        if matches!(
            self.tokens.last().map(|token| &token.kind),
            None | Some(TokenKind::Newline)
        ) {
            return;
        }
        self.tokens.push(Token {
            kind: TokenKind::Newline,
            span: start..start,
        });
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn run(mut self) -> SourceResult<Vec<Token>> {
        loop {
            if self.at_line_start && self.open_brackets.is_empty() {
                let indent_start = self.position;
                while matches!(self.peek(), Some(' ' | '\t' | '\x0c')) {
                    self.advance();
                }
                match self.peek() {
                    None => break,
                    Some('\n' | '\r') => {
                        self.advance();
                        continue;
                    }
                    Some('#') => {
                        self.skip_comment();
                        continue;
                    }
                    Some(_) if self.position > indent_start => {
                        return Err(SourceError::unsupported(
                            "unexpected indent",
                            indent_start..self.position,
                            "indented block",
                        )
                        .with_help("Statements must start at the beginning of the line"));
                    }
                    Some(_) => {}
                }
                self.at_line_start = false;
            }
            let start = self.position;
            let Some(c) = self.peek() else {
                break;
            };
            match c {
                ' ' | '\t' | '\x0c' | '\r' => {
                    self.advance();
                }
                '#' => self.skip_comment(),
                '\n' => {
                    self.advance();
                    if self.open_brackets.is_empty() {
                        self.push_newline(start);
                        self.at_line_start = true;
                    }
                }
                '\\' => {
                    self.advance();
                    if self.peek() == Some('\r') {
                        self.advance();
                    }
                    if self.advance() != Some('\n') {
                        return Err(SourceError::syntax(
                            "unexpected character after line continuation character",
                            start..self.position,
                            "line continuation",
                        ));
                    }
                }
                '\'' | '"' => {
                    let value = self.lex_string(start, false)?;
                    self.push(TokenKind::Str(value), start);
                }
                '0'..='9' => {
                    let kind = self.lex_number(start)?;
                    self.push(kind, start);
                }
                '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    let kind = self.lex_number(start)?;
                    self.push(kind, start);
                }
                c if c.is_alphabetic() || c == '_' => {
                    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                        self.advance();
                    }
                    let source = self.source;
                    let name = &source[start..self.position];
                    if matches!(self.peek(), Some('\'' | '"')) {
                        match name.to_ascii_lowercase().as_str() {
                            "r" => {
                                let value = self.lex_string(start, true)?;
                                self.push(TokenKind::Str(value), start);
                                continue;
                            }
                            "u" => {
                                let value = self.lex_string(start, false)?;
                                self.push(TokenKind::Str(value), start);
                                continue;
                            }
                            "b" | "br" | "rb" | "f" | "fr" | "rf" => {
                                return Err(SourceError::unsupported(
                                    format!("string prefix '{name}' is not supported"),
                                    start..self.position,
                                    "string prefix",
                                ));
                            }
                            _ => {}
                        }
                    }
                    self.push(TokenKind::Name(name.to_string()), start);
                }
                '(' | '[' | '{' => {
                    self.advance();
                    self.open_brackets.push((c, start));
                    let kind = match c {
                        '(' => TokenKind::LeftParen,
                        '[' => TokenKind::LeftBracket,
                        _ => TokenKind::LeftBrace,
                    };
                    self.push(kind, start);
                }
                ')' | ']' | '}' => {
                    self.advance();
                    let expected_opener = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match self.open_brackets.pop() {
                        None => {
                            return Err(SourceError::syntax(
                                format!("unmatched '{c}'"),
                                start..self.position,
                                "no matching opening bracket",
                            ));
                        }
                        Some((opener, opener_position)) if opener != expected_opener => {
                            return Err(SourceError::syntax(
                                format!(
                                    "closing bracket '{c}' does not match opening bracket '{opener}'"
                                ),
                                opener_position..self.position,
                                "mismatched brackets",
                            ));
                        }
                        Some(_) => {}
                    }
                    let kind = match c {
                        ')' => TokenKind::RightParen,
                        ']' => TokenKind::RightBracket,
                        _ => TokenKind::RightBrace,
                    };
                    self.push(kind, start);
                }
                ',' | ':' | ';' | '.' => {
                    self.advance();
                    let kind = match c {
                        ',' => TokenKind::Comma,
                        ':' => TokenKind::Colon,
                        ';' => TokenKind::Semicolon,
                        _ => TokenKind::Dot,
                    };
                    self.push(kind, start);
                }
                '=' | '+' | '-' | '*' | '/' | '%' | '<' | '>' | '!' | '&' | '|' | '^' | '~'
                | '@' => {
                    self.advance();
                    let next = self.peek();
                    let kind = match (c, next) {
                        (_, Some('=')) => {
                            self.advance();
                            if c == '+' {
                                TokenKind::PlusEquals
                            } else {
                                TokenKind::Unsupported(self.source[start..self.position].to_string())
                            }
                        }
                        ('*', Some('*')) | ('/', Some('/')) | ('<', Some('<')) | ('>', Some('>')) => {
                            self.advance();
                            TokenKind::Unsupported(self.source[start..self.position].to_string())
                        }
                        ('=', _) => TokenKind::Equals,
                        ('+', _) => TokenKind::Plus,
                        ('-', _) => TokenKind::Minus,
                        ('*', _) => TokenKind::Star,
                        _ => TokenKind::Unsupported(c.to_string()),
                    };
                    self.push(kind, start);
                }
                other => {
                    self.advance();
                    return Err(SourceError::syntax(
                        format!("invalid character '{other}'"),
                        start..self.position,
                        "not valid here",
                    ));
                }
            }
        }
        if let Some((opener, opener_position)) = self.open_brackets.last() {
            return Err(SourceError::syntax(
                format!("'{opener}' was never closed"),
                *opener_position..*opener_position + 1,
                "unclosed bracket",
            ));
        }
        let end = self.source.len();
        self.push_newline(end);
        self.tokens.push(Token {
            kind: TokenKind::EndOfFile,
            span: end..end,
        });
        Ok(self.tokens)
    }

    /// Lexes a string literal; `start` points at the prefix if there is one.
    fn lex_string(&mut self, start: usize, raw: bool) -> SourceResult<String> {
        let Some(quote) = self.advance() else {
            return Err(SourceError::syntax(
                "expected string literal",
                start..self.position,
                "here",
            ));
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }
        let unterminated = |position: usize| {
            SourceError::syntax(
                "unterminated string literal",
                start..position,
                "string starts here",
            )
        };
        let mut value = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(unterminated(self.position));
            };
            match c {
                '\n' if !triple => return Err(unterminated(self.position - 1)),
                '\\' if raw => {
                    value.push('\\');
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                '\\' => self.lex_escape(&mut value)?,
                c if c == quote => {
                    if !triple {
                        return Ok(value);
                    }
                    if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                        self.advance();
                        self.advance();
                        return Ok(value);
                    }
                    value.push(c);
                }
                '\r' if self.peek() == Some('\n') => {}
                c => value.push(c),
            }
        }
    }

    fn lex_escape(&mut self, value: &mut String) -> SourceResult<()> {
        let escape_start = self.position - 1;
        let Some(c) = self.advance() else {
            return Ok(());
        };
        match c {
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.advance();
                }
            }
            '\\' | '\'' | '"' => value.push(c),
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'a' => value.push('\x07'),
            'b' => value.push('\x08'),
            'f' => value.push('\x0c'),
            'v' => value.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            self.advance();
                        }
                        None => break,
                    }
                }
                value.push(self.code_point(code, escape_start)?);
            }
            'x' | 'u' | 'U' => {
                let digits = match c {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut code = 0u32;
                for _ in 0..digits {
                    let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                        return Err(SourceError::syntax(
                            format!("truncated \\{c} escape, expected {digits} hex digits"),
                            escape_start..self.position,
                            "invalid escape",
                        ));
                    };
                    code = code * 16 + digit;
                    self.advance();
                }
                value.push(self.code_point(code, escape_start)?);
            }
            'N' => {
                return Err(SourceError::unsupported(
                    "named unicode escapes are not supported",
                    escape_start..self.position,
                    "escape",
                ));
            }
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Ok(())
    }

    fn code_point(&self, code: u32, escape_start: usize) -> SourceResult<char> {
        char::from_u32(code).ok_or_else(|| {
            SourceError::syntax(
                format!("invalid code point {code:#x}"),
                escape_start..self.position,
                "invalid escape",
            )
        })
    }

    fn lex_number(&mut self, start: usize) -> SourceResult<TokenKind> {
        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            self.advance();
            self.advance();
            let digits_start = self.position;
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                self.advance();
            }
            let digits = self.source[digits_start..self.position].replace('_', "");
            return i64::from_str_radix(&digits, radix)
                .map(TokenKind::Int)
                .map_err(|_| self.invalid_number(start));
        }

        let mut is_float = false;
        self.consume_digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            self.consume_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_nth(1) {
                Some('+' | '-') => self.peek_nth(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.consume_digits();
            }
        }
        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            return Err(self.invalid_number(start));
        }
        let text = self.source[start..self.position].replace('_', "");
        if is_float {
            return text
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.invalid_number(start));
        }
        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(SourceError::syntax(
                "leading zeros in decimal integer literals are not permitted",
                start..self.position,
                "use an 0o prefix for octal integers",
            ));
        }
        text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
            SourceError::unsupported(
                "integer literal is too large",
                start..self.position,
                "does not fit into 64 bits",
            )
        })
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    fn invalid_number(&self, start: usize) -> SourceError {
        SourceError::syntax(
            "invalid number literal",
            start..self.position,
            "not a number",
        )
    }
}
