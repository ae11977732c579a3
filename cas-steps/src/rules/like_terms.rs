//! Rules that collect like terms and like factors.

use crate::{node::Node, pattern::Bindings};
use rug::Rational;
use super::{bound, constant, rational_node, ChangeType, MistakeDef, MistakeType, RuleDef};

/// Builds `coefficient * v1`.
fn scaled(coefficient: Rational, bindings: &Bindings) -> Option<Node> {
    Some(Node::mul(vec![rational_node(coefficient), bound(bindings, "v1")?]))
}

/// `2x + 3x = 5x`
fn add_coefficients(_: &Node, bindings: &Bindings) -> Option<Node> {
    let sum = Rational::from(constant(bindings, "c1")? + constant(bindings, "c2")?);
    scaled(sum, bindings)
}

/// `2x + x = 3x`
fn add_one_to_coefficient(_: &Node, bindings: &Bindings) -> Option<Node> {
    scaled(Rational::from(constant(bindings, "c1")? + 1), bindings)
}

/// `2x - x = x`
fn subtract_one_from_coefficient(_: &Node, bindings: &Bindings) -> Option<Node> {
    scaled(Rational::from(constant(bindings, "c1")? - 1), bindings)
}

/// `x^2 * x = x^3`
fn add_one_to_exponent(_: &Node, bindings: &Bindings) -> Option<Node> {
    let exponent = Rational::from(constant(bindings, "c1")? + 1);
    Some(Node::pow(bound(bindings, "v1")?, rational_node(exponent)))
}

/// `x^a * x^b = x^(ab)`
fn multiplied_exponents(_: &Node, bindings: &Bindings) -> Option<Node> {
    Some(Node::pow(
        bound(bindings, "v1")?,
        Node::mul(vec![bound(bindings, "n1")?, bound(bindings, "n2")?]),
    ))
}

pub const RULES: &[RuleDef] = &[
    RuleDef::computed(ChangeType::CollectLikeTerms, "c1 * v1 + c2 * v1", add_coefficients),
    RuleDef::computed(ChangeType::CollectLikeTerms, "c1 * v1 + v1", add_one_to_coefficient),
    RuleDef::computed(ChangeType::CollectLikeTerms, "c1 * v1 + -v1", subtract_one_from_coefficient),
    RuleDef::structural(ChangeType::CollectLikeTerms, "v1 + v1", "2 * v1"),
    RuleDef::structural(ChangeType::MultiplyLikeFactors, "v1 * v1", "v1 ^ 2"),
    RuleDef::computed(ChangeType::AddExponentOfOne, "v1 ^ c1 * v1", add_one_to_exponent),
    RuleDef::structural(ChangeType::AddExponents, "v1 ^ n1 * v1 ^ n2", "v1 ^ (n1 + n2)")
        .with_mistakes(&[
            MistakeDef { kind: MistakeType::MultipliedExponents, build: multiplied_exponents },
        ]),
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{
        pattern::MatchContext,
        rules::{apply, RuleSet},
    };
    use super::*;

    fn apply_rule(id: &str, node: &str) -> Option<String> {
        let rules = RuleSet::standard().unwrap();
        let node = node.parse::<Node>().unwrap().normalize();
        apply(&node, rules.get(id).unwrap(), &MatchContext::default(), false)
            .unwrap()
            .map(|app| app.after.normalize().to_string())
    }

    #[test]
    fn collect_terms() {
        assert_eq!(apply_rule("COLLECT_LIKE_TERMS", "2x + 3x").as_deref(), Some("5x"));
        assert_eq!(apply_rule("COLLECT_LIKE_TERMS", "2x + y + 3x").as_deref(), Some("5x + y"));
        assert_eq!(apply_rule("COLLECT_LIKE_TERMS__CASE_1", "2x + x").as_deref(), Some("3x"));
        assert_eq!(apply_rule("COLLECT_LIKE_TERMS__CASE_2", "3x - x").as_deref(), Some("2x"));
        assert_eq!(apply_rule("COLLECT_LIKE_TERMS__CASE_3", "y + y").as_deref(), Some("2y"));
        assert_eq!(apply_rule("COLLECT_LIKE_TERMS", "2x + 3y"), None);
    }

    #[test]
    fn collect_factors() {
        assert_eq!(apply_rule("MULTIPLY_LIKE_FACTORS", "x * x").as_deref(), Some("x^2"));
        assert_eq!(apply_rule("ADD_EXPONENT_OF_ONE", "x^2 * x").as_deref(), Some("x^3"));
        assert_eq!(apply_rule("ADD_EXPONENTS", "x^2 * x^3").as_deref(), Some("x^(2 + 3)"));
    }
}
