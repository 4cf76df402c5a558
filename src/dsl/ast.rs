//! Syntax tree for constraint expressions

use crate::error::Span;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Unitless number
    Number(f64),
    /// `10px`, optionally followed by `opposite` and/or `outside`
    Pixels {
        value: f64,
        opposite: bool,
        outside: bool,
    },
    /// `50%`
    Percent(f64),
    /// `#rrggbb` literal, not yet validated
    Color(String),
    /// Bare identifier: a keyword constraint, a named color or a component
    Name(String),
    Call {
        name: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    Neg(Box<Spanned<Expr>>),
    Binary {
        op: BinOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    /// `expr * factor`
    Scale {
        inner: Box<Spanned<Expr>>,
        factor: f64,
    },
}
