use std::fmt::{self, Display, Formatter};

use scanner::Token;

use crate::printer::AstPrinter;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Literal(LiteralValue<'a>),
}

/// An operation over expressions, one method per [`Expr`] variant.
///
/// New renderings or analyses implement this trait instead of matching on
/// [`Expr`] themselves; [`Expr::accept`] routes each node to the right method.
pub trait ExprVisitor {
    type Output;

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Self::Output;
    fn visit_grouping(&mut self, inner: &Expr) -> Self::Output;
    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> Self::Output;
    fn visit_literal(&mut self, value: &LiteralValue) -> Self::Output;
}

impl<'a> Expr<'a> {
    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Binary { left, operator, right } => visitor.visit_binary(left, operator, right),
            Expr::Grouping(inner) => visitor.visit_grouping(inner),
            Expr::Unary { operator, right } => visitor.visit_unary(operator, right),
            Expr::Literal(value) => visitor.visit_literal(value),
        }
    }

    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }

    pub fn grouping(inner: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(inner))
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.accept(&mut AstPrinter))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl Display for LiteralValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Str(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}

impl<'a> From<scanner::Literal<'a>> for LiteralValue<'a> {
    fn from(literal: scanner::Literal<'a>) -> Self {
        match literal {
            scanner::Literal::Number(n) => LiteralValue::Number(n),
            scanner::Literal::Str(s) => LiteralValue::Str(s),
        }
    }
}
