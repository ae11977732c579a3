//! Step-by-step simplification of algebraic expressions, and assessment of the steps students
//! take themselves.
//!
//! # Simplification
//!
//! Expressions are simplified by a rule-based rewrite engine. Each rule is a pair of patterns, or
//! a pattern and a function computing the replacement (see [`rules`]). The [`Simplifier`] applies
//! one rule at a time, recording a [`Step`] for every rewrite, until no rule applies. The final
//! expression is the expression's **answer**.
//!
//! ```
//! use cas_steps::{simplify, SimplifyOptions};
//!
//! let simplified = simplify("2 * 3 + x", SimplifyOptions::default()).unwrap();
//! assert_eq!(simplified.root.to_string(), "x + 6");
//! ```
//!
//! # Step assessment
//!
//! Given an expression and the expression a student turned it into, [`assess_user_step`]
//! searches the steps the rules allow for a path between the two. If the student's expression is
//! a known mistake of some step, the mistake is reported, along with what the student should have
//! gotten.
//!
//! ```
//! use cas_steps::{assess_user_step, rules::MistakeType};
//!
//! let infos = assess_user_step("4 + 3", "8").unwrap();
//! assert!(!infos[0].is_valid);
//! assert_eq!(infos[0].attempted_to_get_to.as_deref(), Some("7"));
//! assert_eq!(infos[0].mistaken_change_type, Some(MistakeType::AddedOneTooMany));
//! ```
//!
//! Steps between equations are assessed with [`assess_user_equation_step`], which also checks
//! that the same operation was performed on both sides.
//!
//! # Sessions
//!
//! Assessment simplifies and explores the same expressions many times, so every operation caches
//! its work in a [`Session`]. The free functions in this module create a new session for every
//! call; to assess many steps, create one [`Session`] and use its methods instead.
//!
//! [`Simplifier`]: simplify::Simplifier
//! [`Step`]: simplify::Step

pub mod assess;
pub mod equality;
pub mod error;
pub mod explore;
pub mod node;
pub mod pattern;
pub mod primitive;
pub mod rules;
pub mod session;
pub mod simplify;
pub mod solve;
pub mod terms;

use cas_error::Error;

pub use assess::{EquationStepInfo, StepInfo};
pub use node::Node;
pub use session::{Session, SessionConfig, Simplified, SimplifyOptions};
pub use solve::{EquationStep, Solution};

/// Simplifies the expression. See [`Session::simplify`].
pub fn simplify(text: &str, options: SimplifyOptions) -> Result<Simplified, Error> {
    Session::new()?.simplify(text, options)
}

/// Returns true if the two expressions are the same, up to presentation. Unparsable expressions
/// are only equal to themselves.
pub fn are_equal(a: &str, b: &str) -> Result<bool, Error> {
    Ok(Session::new()?.are_equal(a, b))
}

/// Classifies the step from one expression to another. See [`Session::assess_user_step`].
pub fn assess_user_step(from: &str, to: &str) -> Result<Vec<StepInfo>, Error> {
    Session::new()?.assess_user_step(from, to)
}

/// Classifies every step of a sequence of expressions. See [`Session::assess_user_steps`].
pub fn assess_user_steps(expressions: &[&str]) -> Result<Vec<Vec<StepInfo>>, Error> {
    Session::new()?.assess_user_steps(expressions)
}

/// Classifies the step from one equation to another. See
/// [`Session::assess_user_equation_step`].
pub fn assess_user_equation_step(from: &str, to: &str) -> Result<EquationStepInfo, Error> {
    Session::new()?.assess_user_equation_step(from, to)
}

/// Solves the equation for the unknown. See [`Session::solve`].
pub fn solve(equation: &str, unknown: &str) -> Result<Solution, Error> {
    Session::new()?.solve(equation, Some(unknown))
}
