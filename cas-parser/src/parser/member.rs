use std::ops::Range;
use super::{
    error::Error,
    literal::LitSym,
    token::Dot,
    Parse,
    Parser,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Accessing a member of a named container, such as `const.pi`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// The container being accessed, such as `const`.
    pub object: LitSym,

    /// The member of the container, such as `pi`.
    pub member: LitSym,

    /// The region of the source code that this member access was parsed from.
    pub span: Range<usize>,
}

impl Member {
    /// Returns the span of the member access.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Member {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let object = input.try_parse::<LitSym>()?;
        input.try_parse::<Dot>()?;
        let member = input.try_parse::<LitSym>()?;
        let span = object.span.start..member.span.end;
        Ok(Self { object, member, span })
    }
}
