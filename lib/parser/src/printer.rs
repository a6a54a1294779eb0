use itertools::Itertools;
use scanner::Token;

use crate::{Expr, ExprVisitor, LiteralValue};

/// Renders an expression as fully parenthesized prefix notation,
/// e.g. `(* (- 123) (group 45.67))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({name}");
        for expr in exprs {
            out.push(' ');
            out.push_str(&expr.accept(self));
        }
        out.push(')');
        out
    }
}

impl ExprVisitor for AstPrinter {
    type Output = String;

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> String {
        self.parenthesize(operator.lexeme, &[left, right])
    }

    fn visit_grouping(&mut self, inner: &Expr) -> String {
        self.parenthesize("group", &[inner])
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) -> String {
        self.parenthesize(operator.lexeme, &[right])
    }

    fn visit_literal(&mut self, value: &LiteralValue) -> String {
        value.to_string()
    }
}

/// Renders an expression in reverse polish notation, e.g. `1 2 + 4 3 - *`.
/// Groupings leave no trace since the operand order already encodes them.
#[derive(Debug, Default)]
pub struct RpnPrinter {
    parts: Vec<String>,
}

impl RpnPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, expr: &Expr) -> String {
        self.parts.clear();
        expr.accept(self);
        self.parts.drain(..).join(" ")
    }
}

impl ExprVisitor for RpnPrinter {
    type Output = ();

    fn visit_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) {
        left.accept(self);
        right.accept(self);
        self.parts.push(operator.lexeme.to_string());
    }

    fn visit_grouping(&mut self, inner: &Expr) {
        inner.accept(self)
    }

    fn visit_unary(&mut self, operator: &Token, right: &Expr) {
        right.accept(self);
        self.parts.push(operator.lexeme.to_string());
    }

    fn visit_literal(&mut self, value: &LiteralValue) {
        self.parts.push(value.to_string());
    }
}

pub fn print(expr: &Expr) -> String {
    AstPrinter.print(expr)
}

pub fn print_rpn(expr: &Expr) -> String {
    RpnPrinter::new().print(expr)
}
