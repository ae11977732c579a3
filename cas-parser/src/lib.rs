//! Tokenizer and parser for the algebraic expressions and equations consumed by the step engine.
//!
//! The grammar covers the four arithmetic operators, exponentiation, unary minus, implicit
//! multiplication (`2x`, `3(x + 1)`), parentheses, function calls (`nthRoot(x, 3)`), member
//! access (`const.pi`), and a single top-level `=` for equations.
//!
//! ```
//! use cas_parser::parser::{expr::Expr, Parser};
//!
//! let mut parser = Parser::new("2x^2 + 3");
//! let expr = parser.try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.span(), 0..8);
//! ```

pub mod parser;
pub mod tokenizer;
