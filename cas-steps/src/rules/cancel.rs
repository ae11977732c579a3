//! Rules that cancel opposite terms and common factors.
//!
//! Opposite constants, as in `3 - 3`, are not cancelled here; they are evaluated as arithmetic.

use crate::{node::Node, pattern::Bindings};
use rug::Rational;
use super::{bound, constant, rational_node, ChangeType, RuleDef};

/// `x^3 / x = x^2`
fn cancel_base_from_power(_: &Node, bindings: &Bindings) -> Option<Node> {
    let exponent = Rational::from(constant(bindings, "c1")? - 1);
    Some(Node::pow(bound(bindings, "v1")?, rational_node(exponent)))
}

/// `x^5 / x^2 = x^3`, `x^2 / x^5 = 1/x^3`
fn cancel_powers(_: &Node, bindings: &Bindings) -> Option<Node> {
    let base = bound(bindings, "v1")?;
    let difference = Rational::from(constant(bindings, "c1")? - constant(bindings, "c2")?);
    if difference >= 0 {
        Some(Node::pow(base, rational_node(difference)))
    } else {
        Some(Node::div(Node::constant(1), Node::pow(base, rational_node(-difference))))
    }
}

pub const RULES: &[RuleDef] = &[
    RuleDef::structural(ChangeType::CancelTerms, "n1 + -n1", "0"),
    RuleDef::structural(ChangeType::CancelFactors, "n1 * n2 / n1", "n2"),
    RuleDef::structural(ChangeType::DivideBySelf, "v1 / v1", "1"),
    RuleDef::structural(ChangeType::CancelCommonFactor, "(n1 * n2) / (n1 * n3)", "n2 / n3"),
    RuleDef::structural(ChangeType::CancelNumerator, "n1 / (n1 * n2)", "1 / n2"),
    RuleDef::computed(ChangeType::CancelFactors, "v1 ^ c1 / v1", cancel_base_from_power),
    RuleDef::computed(ChangeType::CancelFactors, "v1 ^ c1 / v1 ^ c2", cancel_powers),
];
