//! Expression parsing and evaluation for guards and formulas
//!
//! Guards and formulas are written in a small, closed expression language.
//! By the time an expression reaches this module every `$name` reference has
//! already been replaced with literal text, so evaluation needs no context.
//!
//! ## Grammar
//!
//! ```text
//! expr        := or_expr
//! or_expr     := and_expr ( "or" and_expr )*
//! and_expr    := not_expr ( "and" not_expr )*
//! not_expr    := "not" not_expr | comparison
//! comparison  := additive ( cmp_op additive )*
//! cmp_op      := "==" | "!=" | "<=" | ">=" | "<" | ">" | "in" | "not" "in"
//! additive    := term ( ("+" | "-") term )*
//! term        := unary ( ("*" | "//" | "/" | "%") unary )*
//! unary       := ("-" | "+") unary | power
//! power       := postfix ( "**" unary )?
//! postfix     := primary ( "." IDENT "(" args ")" )*
//! primary     := NUMBER | STRING | "True" | "False" | "None"
//!              | "[" args "]" | "(" expr ("," expr)* ")" | DOTTED_IDENT "(" args ")"
//! ```
//!
//! Functions: `abs`, `min`, `max`, `int`, `float`, `str`, `bool`, `len`,
//! `round`, `re.search`, `re.match`, `re.fullmatch`. String methods:
//! `startswith`, `endswith`, `lower`, `upper`, `strip`, `replace`.
//!
//! ## Example
//!
//! ```rust
//! use paramgen_rs::expression::{Expression, Value};
//!
//! let expr = Expression::parse(r#""gx1v6" .startswith("gx1v") and 320 // 2 == 160"#).unwrap();
//! assert_eq!(expr.evaluate().unwrap(), Value::Bool(true));
//! ```

mod eval;
mod parser;
pub mod value;

use thiserror::Error;

pub use value::Value;
pub use parser::MAX_DEPTH;

/// Error that can occur during expression parsing or evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression: {message}")]
    ParseError { message: String },

    #[error("Unknown name: {name}")]
    UnknownName { name: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow")]
    Overflow,

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },
}

/// Result type for expression evaluation
pub(crate) type ExprResult<T> = Result<T, ExpressionError>;

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant value
    Literal(Value),

    /// List or tuple display
    List(Vec<Expression>),

    /// A bare identifier; always an error when evaluated
    Name(String),

    /// Unary operations
    Unary(UnaryOp, Box<Expression>),

    /// Binary arithmetic operations
    Binary(BinaryOp, Box<Expression>, Box<Expression>),

    /// Short-circuiting `and`
    And(Box<Expression>, Box<Expression>),

    /// Short-circuiting `or`
    Or(Box<Expression>, Box<Expression>),

    /// A chain of comparisons, `a < b <= c`
    Compare(Box<Expression>, Vec<(CompareOp, Expression)>),

    /// Function call; the name may be dotted, e.g. `re.search`
    Call(String, Vec<Expression>),

    /// Method call on a value, e.g. `"abc".startswith("a")`
    Method(Box<Expression>, String, Vec<Expression>),
}

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,

    /// Identity (+)
    Pos,

    /// Logical not
    Not,
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition or concatenation (+)
    Add,

    /// Subtraction (-)
    Sub,

    /// Multiplication (*)
    Mul,

    /// True division (/)
    Div,

    /// Floor division (//)
    FloorDiv,

    /// Modulo (%)
    Mod,

    /// Power (**)
    Pow,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl Expression {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        parser::parse_expression(input)
    }

    /// Evaluate the expression
    pub fn evaluate(&self) -> Result<Value, ExpressionError> {
        eval::evaluate(self)
    }
}

/// Parse and evaluate `input` in one step
pub fn evaluate_str(input: &str) -> Result<Value, ExpressionError> {
    Expression::parse(input)?.evaluate()
}
