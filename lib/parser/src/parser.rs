mod expr;
pub mod printer;

use std::fmt::{self, Display, Formatter};

use errors::{LoxError, LoxErrors};
use log::{debug, trace};
use scanner::{Token, TokenKind};

pub use expr::{Expr, ExprVisitor, LiteralValue};
pub use printer::{print, print_rpn, AstPrinter, RpnPrinter};

use TokenKind::{
    Bang, BangEqual, Eof, EqualEqual, False, Greater, GreaterEqual, LeftParen, Less, LessEqual,
    Minus, Nil, Number, Plus, RightParen, Slash, Star, True,
};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum SyntaxErrorKind {
    #[error("Expect ')' after expression.")]
    MissingRightParen,
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect end of expression.")]
    ExpectedEndOfExpression,
}

/// The parser hit `token` where the grammar didn't allow it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub struct SyntaxError<'a> {
    pub kind: SyntaxErrorKind,
    pub token: Token<'a>,
}

impl<'a> SyntaxError<'a> {
    fn new(kind: SyntaxErrorKind, token: Token<'a>) -> Self {
        Self { kind, token }
    }
}

impl<'a> From<&SyntaxError<'a>> for LoxError {
    fn from(error: &SyntaxError<'a>) -> Self {
        let location = match error.token.kind {
            Eof => "end".to_string(),
            _ => format!("'{}'", error.token.lexeme),
        };
        LoxError::new(error.token.line, error.token.col, error.kind.to_string()).at(location)
    }
}

impl<'a> From<SyntaxError<'a>> for LoxError {
    fn from(error: SyntaxError<'a>) -> Self {
        LoxError::from(&error)
    }
}

impl Display for SyntaxError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", LoxError::from(self))
    }
}

pub type Result<'a, T> = std::result::Result<T, SyntaxError<'a>>;

/// Recursive descent parser for a single expression.
///
/// ```text
/// expression → equality
/// equality   → comparison ( ( "!=" | "==" ) comparison )*
/// comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       → factor ( ( "-" | "+" ) factor )*
/// factor     → unary ( ( "/" | "*" ) unary )*
/// unary      → ( "!" | "-" ) unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
#[derive(Debug)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parses one expression starting at the current token. Tokens after it
    /// are left alone, see [`Parser::expect_end`].
    pub fn parse(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression();
        match &expr {
            Ok(expr) => debug!("Parsed {expr}"),
            Err(e) => debug!("Parse failed: {e}"),
        }
        expr
    }

    /// Fails unless every token up to [`TokenKind::Eof`] has been consumed.
    pub fn expect_end(&mut self) -> Result<'a, Token<'a>> {
        self.consume_or_error(Eof, SyntaxErrorKind::ExpectedEndOfExpression)
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing expression at {}", self.peek());
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing equality at {}", self.peek());
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek().kind {
            let operator = self.advance();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing comparison at {}", self.peek());
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek().kind {
            let operator = self.advance();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing term at {}", self.peek());
        let mut expr = self.factor()?;

        while let Minus | Plus = self.peek().kind {
            let operator = self.advance();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing factor at {}", self.peek());
        let mut expr = self.unary()?;

        while let Slash | Star = self.peek().kind {
            let operator = self.advance();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing unary at {}", self.peek());
        if let Bang | Minus = self.peek().kind {
            let operator = self.advance();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek();
        trace!("Parsing primary at {token}");

        let expr = match (token.kind, token.literal) {
            (False, _) => Expr::Literal(LiteralValue::Boolean(false)),
            (True, _) => Expr::Literal(LiteralValue::Boolean(true)),
            (Nil, _) => Expr::Literal(LiteralValue::Nil),
            (Number | TokenKind::String, Some(literal)) => Expr::Literal(literal.into()),
            (LeftParen, _) => {
                self.advance();
                let inner = self.expression()?;
                self.consume_or_error(RightParen, SyntaxErrorKind::MissingRightParen)?;
                return Ok(Expr::grouping(inner));
            }
            _ => return Err(SyntaxError::new(SyntaxErrorKind::ExpectedExpression, token)),
        };

        self.advance();
        Ok(expr)
    }
}

// Helpers
impl<'t, 'a> Parser<'t, 'a> {
    /// The current token. Running off the end of the slice yields a
    /// synthetic [`TokenKind::Eof`], so the parser also copes with token
    /// lists that weren't produced by the scanner.
    fn peek(&self) -> Token<'a> {
        match self.tokens.get(self.current) {
            Some(token) => token.clone(),
            None => {
                let (line, col) = self
                    .tokens
                    .last()
                    .map_or((cursor::Line(1), cursor::Col(1)), |t| (t.line, t.col));
                Token::new(Eof, "", line, col)
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn consume_or_error(&mut self, kind: TokenKind, error: SyntaxErrorKind) -> Result<'a, Token<'a>> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(SyntaxError::new(error, token))
        }
    }
}

pub fn parse<'a>(tokens: &[Token<'a>]) -> Result<'a, Expr<'a>> {
    Parser::new(tokens).parse()
}

/// Scans and parses `source`, which must hold exactly one expression.
pub fn parse_source(source: &str) -> std::result::Result<Expr<'_>, LoxErrors> {
    let tokens = scanner::scan(source).into_result()?;

    let mut parser = Parser::new(&tokens);
    let expr = parser.parse()?;
    parser.expect_end()?;

    Ok(expr)
}

impl<'a> From<SyntaxError<'a>> for LoxErrors {
    fn from(error: SyntaxError<'a>) -> Self {
        LoxError::from(error).into()
    }
}

#[cfg(test)]
mod tests {
    use cursor::{Col, Line};
    use pretty_assertions::assert_eq;

    use super::*;

    #[ctor::ctor]
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parse_and_print(source: &str) -> String {
        let tokens = scanner::scan(source).into_result().unwrap();
        print(&parse(&tokens).unwrap())
    }

    fn parse_error(source: &str) -> SyntaxError<'_> {
        let tokens = scanner::scan(source).into_result().unwrap();
        parse(&tokens).unwrap_err()
    }

    #[test]
    fn precedence() {
        assert_eq!(parse_and_print("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(parse_and_print("1 * 2 + 3"), "(+ (* 1 2) 3)");
        assert_eq!(parse_and_print("1 < 2 == 3 >= 4"), "(== (< 1 2) (>= 3 4))");
        assert_eq!(parse_and_print("1 + 2 > 3 - 4"), "(> (+ 1 2) (- 3 4))");
        assert_eq!(parse_and_print("-1 * 2"), "(* (- 1) 2)");
    }

    #[test]
    fn left_associativity() {
        assert_eq!(parse_and_print("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(parse_and_print("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(parse_and_print("1 == 2 != 3"), "(!= (== 1 2) 3)");
    }

    #[test]
    fn unary_is_right_associative() {
        assert_eq!(parse_and_print("!!true"), "(! (! true))");
        assert_eq!(parse_and_print("- -1"), "(- (- 1))");
        assert_eq!(parse_and_print("!nil == false"), "(== (! nil) false)");
    }

    #[test]
    fn grouping() {
        assert_eq!(parse_and_print("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
        assert_eq!(parse_and_print("-123 * (45.67)"), "(* (- 123) (group 45.67))");
        assert_eq!(parse_and_print("((nil))"), "(group (group nil))");
    }

    #[test]
    fn string_literal_tokens_become_literals() {
        let tokens = scanner::scan("\"lox\"").tokens;
        assert_eq!(tokens[0].kind, TokenKind::String);
        let printed: String = print(&parse(&tokens).unwrap());
        assert_eq!(printed, "lox");
    }

    #[test]
    fn literals() {
        assert_eq!(parse_and_print("\"i am cool\" + 1.5"), "(+ i am cool 1.5)");
        assert_eq!(parse_and_print("true != false"), "(!= true false)");
        assert_eq!(parse_and_print("007"), "7");
    }

    #[test]
    fn operators_keep_their_tokens() {
        let tokens = scanner::scan("1 +\n2").tokens;
        let Expr::Binary { operator, .. } = parse(&tokens).unwrap() else {
            panic!("expected a binary expression");
        };
        assert_eq!(operator, Token::new(Plus, "+", Line(1), Col(3)));
    }

    #[test]
    fn missing_right_paren() {
        let error = parse_error("(1 + 2");
        assert_eq!(error.kind, SyntaxErrorKind::MissingRightParen);
        assert_eq!(error.token, Token::new(Eof, "", Line(1), Col(7)));

        let error = parse_error("(1 + 2\n\n");
        assert_eq!(error.token.kind, Eof);
        assert_eq!(error.token.line, Line(3));

        let error = parse_error("(1 2)");
        assert_eq!(error.kind, SyntaxErrorKind::MissingRightParen);
        assert_eq!(error.token.lexeme, "2");
    }

    #[test]
    fn expected_expression() {
        let error = parse_error("1 + ");
        assert_eq!(error.kind, SyntaxErrorKind::ExpectedExpression);
        assert!(error.token.is_eof());

        let error = parse_error("foo");
        assert_eq!(error.kind, SyntaxErrorKind::ExpectedExpression);
        assert_eq!(error.token.kind, TokenKind::Identifier);

        assert_eq!(parse_error(")").kind, SyntaxErrorKind::ExpectedExpression);
        assert_eq!(parse_error("").kind, SyntaxErrorKind::ExpectedExpression);
    }

    #[test]
    #[cfg(not(feature = "strict"))]
    fn error_display() {
        assert_eq!(
            parse_error("(1 + 2").to_string(),
            "[line 1, col 7] Error at end: Expect ')' after expression."
        );
        assert_eq!(parse_error("1 + *").to_string(), "[line 1, col 5] Error at '*': Expect expression.");
    }

    #[test]
    fn trailing_tokens_are_not_consumed() {
        let tokens = scanner::scan("1 + 2 3").tokens;
        let mut parser = Parser::new(&tokens);
        assert_eq!(print(&parser.parse().unwrap()), "(+ 1 2)");

        let error = parser.expect_end().unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::ExpectedEndOfExpression);
        assert_eq!(error.token.lexeme, "3");
    }

    #[test]
    fn tokens_without_eof() {
        let tokens = scanner::scan("(1").tokens;
        let error = parse(&tokens[..2]).unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::MissingRightParen);
        assert!(error.token.is_eof());

        assert_eq!(parse(&[]).unwrap_err().kind, SyntaxErrorKind::ExpectedExpression);
    }

    #[test]
    fn parse_source_reports_all_scan_errors() {
        let errors = parse_source("1 @ 2 #").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message == "Unexpected character."));
    }

    #[test]
    fn parse_source_requires_a_single_expression() {
        assert_eq!(print(&parse_source("1 + 2 * 3").unwrap()), "(+ 1 (* 2 3))");

        let errors = parse_source("1 2").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expect end of expression.");
        assert_eq!(errors[0].location.as_deref(), Some("'2'"));

        let errors = parse_source("(1").unwrap_err();
        assert_eq!(errors[0].location.as_deref(), Some("end"));
    }

    #[test]
    fn printed_form_is_stable() {
        for source in ["1 + 2 * 3", "-(1 - 2) / !true", "\"a\" == nil", "1 >= 2 <= 3"] {
            let expr = parse_source(source).unwrap();
            assert_eq!(print(&expr), print(&expr));
            assert_eq!(print(&expr), expr.to_string());
        }
    }
}
