use cursor::{Col, Cursor, Line};
use errors::{LoxError, LoxErrors};
use log::{debug, trace};

pub mod token;
pub use token::{Literal, Token, TokenKind};

use TokenKind::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorKind {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub line: Line,
    pub col: Col,
}

impl From<ScanError> for LoxError {
    fn from(error: ScanError) -> Self {
        LoxError::new(error.line, error.col, error.kind.to_string())
    }
}

/// Everything the scanner found: all valid tokens (always ending in
/// [`TokenKind::Eof`]) and every error encountered on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Scanned<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<ScanError>,
}

impl<'a> Scanned<'a> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<Token<'a>>, LoxErrors> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors.into_iter().map(LoxError::from).collect())
        }
    }
}

pub fn scan(source: &str) -> Scanned<'_> {
    Scanner::new(source).scan_tokens()
}

pub struct Scanner<'a> {
    start: Cursor<'a>,
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let cursor = Cursor::new(source);
        Self { start: cursor.clone(), cursor, tokens: Vec::new(), errors: Vec::new() }
    }

    pub fn scan_tokens(mut self) -> Scanned<'a> {
        loop {
            self.start = self.cursor.clone();
            let Some(c) = self.cursor.next() else { break };
            self.scan_token(c);
        }

        self.tokens.push(Token::new(Eof, "", self.cursor.line(), self.cursor.col()));

        debug!("Scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());

        Scanned { tokens: self.tokens, errors: self.errors }
    }

    fn scan_token(&mut self, c: char) {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),

            '!' => self.add_token_if_eq('=', BangEqual, Bang),
            '=' => self.add_token_if_eq('=', EqualEqual, Equal),
            '<' => self.add_token_if_eq('=', LessEqual, Less),
            '>' => self.add_token_if_eq('=', GreaterEqual, Greater),

            '/' => {
                if self.cursor.next_if_eq('/') {
                    // Comment
                    self.cursor.eat_while(|c| c != '\n');
                } else {
                    self.add_token(Slash)
                }
            }

            ' ' | '\r' | '\t' | '\n' => (),

            '"' => self.string(),

            d if d.is_ascii_digit() => self.number(),

            a if is_alpha(a) => self.identifier(),

            c => self.error(ScanErrorKind::UnexpectedCharacter(c), self.start.col()),
        }
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, self.lexeme(), self.cursor.line(), self.start.col())
    }

    fn push(&mut self, token: Token<'a>) {
        trace!("Scanned {token}");
        self.tokens.push(token);
    }

    fn add_token(&mut self, kind: TokenKind) {
        let token = self.make_token(kind);
        self.push(token);
    }

    fn add_token_if_eq(&mut self, expected: char, matched: TokenKind, otherwise: TokenKind) {
        let kind = if self.cursor.next_if_eq(expected) { matched } else { otherwise };
        self.add_token(kind)
    }

    fn error(&mut self, kind: ScanErrorKind, col: Col) {
        let error = ScanError { kind, line: self.cursor.line(), col };
        debug!("Scan error: {error} ({error:?})");
        self.errors.push(error);
    }

    fn string(&mut self) {
        self.cursor.eat_while(|c| c != '"');

        if !self.cursor.next_if_eq('"') {
            self.error(ScanErrorKind::UnterminatedString, self.cursor.col());
            return;
        }

        let lexeme = self.lexeme();
        let value = &lexeme[1..lexeme.len() - 1];
        let token = self.make_token(String).with_literal(Literal::Str(value));
        self.push(token);
    }

    fn number(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next(); // '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let value = self
            .lexeme()
            .parse()
            .expect("a run of digits with an optional fraction is always a valid f64");
        let token = self.make_token(Number).with_literal(Literal::Number(value));
        self.push(token);
    }

    fn identifier(&mut self) {
        self.cursor.eat_while(|c| is_alpha(c) || c.is_ascii_digit());

        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(Identifier);
        self.add_token(kind)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
