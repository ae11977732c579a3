use std::ops::Range;
use super::{
    error::{kind, Error},
    expr::Expr,
    token::Assign,
    Parse,
    Parser,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation between two expressions, such as `2x + 3 = 5`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: Expr,

    /// The right-hand side of the equation.
    pub rhs: Expr,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

impl Parse for Equation {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = input.try_parse::<Expr>()?;
        input.try_parse::<Assign>().map_err(|_| input.error(kind::ExpectedEquation))?;
        let rhs = input.try_parse::<Expr>()?;
        let span = lhs.span().start..rhs.span().end;
        Ok(Self { lhs, rhs, span })
    }
}
