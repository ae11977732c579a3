//! Errors raised by the step engine itself, as opposed to errors in the user's input, which are
//! reported by [`cas_parser`].
//!
//! Most of these indicate a mistake in a rule table or in the way the engine was configured, and
//! are reported without spans.

use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{ErrorKind, EXPR};

/// An equation-mode wildcard (`x`, `a*` or `fx*`) was matched without an unknown variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "no unknown variable was set for equation-mode pattern matching",
    labels = ["this pattern"],
    help = format!("call {} with the variable to solve for", "`Session::solve`".fg(EXPR)),
)]
pub struct MissingUnknown;

/// A rule's pattern could not be parsed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("malformed rule pattern `{}`", rule),
    labels = ["this pattern"],
    help = "rule patterns must be valid expressions or equations",
)]
pub struct MalformedRule {
    /// The text of the pattern.
    pub rule: String,
}

/// The input could not be interpreted as an expression the engine supports.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid input `{}`", input),
    labels = [format!("this {} could not be read", "expression".fg(EXPR))],
)]
pub struct InvalidInput {
    /// The offending input.
    pub input: String,
}

/// The input was expected to be an equation with exactly one `=`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected an equation",
    labels = ["this input"],
    help = format!("equations are written as {}", "`lhs = rhs`".fg(EXPR)),
)]
pub struct NotAnEquation;
