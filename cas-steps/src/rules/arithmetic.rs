//! Rules that evaluate arithmetic on constants, and the mistakes commonly made while doing so.

use crate::{node::Node, pattern::Bindings};
use rug::{ops::PowAssign, Rational};
use super::{constant, integer, rational_node, ChangeType, MistakeDef, MistakeType, RuleDef};

/// Largest exponent evaluated by [`SIMPLIFY_ARITHMETIC__POWER`].
const MAX_EXPONENT: u32 = 64;

/// Largest number of bits allowed in the numerator or denominator of the result of a power.
const MAX_POWER_BITS: u32 = 4096;

/// Returns the constants bound to `c1` and `c2`.
fn operands<'a>(bindings: &'a Bindings) -> Option<(&'a Rational, &'a Rational)> {
    Some((constant(bindings, "c1")?, constant(bindings, "c2")?))
}

/// Returns the fraction `c{numer} / c{denom}`, or [`None`] if the denominator is zero.
fn fraction(bindings: &Bindings, numer: &str, denom: &str) -> Option<Rational> {
    let denom = constant(bindings, denom)?;
    if *denom == 0 {
        return None;
    }
    Some(Rational::from(constant(bindings, numer)? / denom))
}

fn sum(bindings: &Bindings) -> Option<Rational> {
    let (a, b) = operands(bindings)?;
    Some(Rational::from(a + b))
}

fn product(bindings: &Bindings) -> Option<Rational> {
    let (a, b) = operands(bindings)?;
    Some(Rational::from(a * b))
}

/// `4 + 3 = 7`
fn add(_: &Node, bindings: &Bindings) -> Option<Node> {
    sum(bindings).map(rational_node)
}

/// `4 + 3 = 8`
fn added_one_too_many(_: &Node, bindings: &Bindings) -> Option<Node> {
    Some(rational_node(sum(bindings)? + 1))
}

/// `4 + 3 = 6`
fn added_one_too_few(_: &Node, bindings: &Bindings) -> Option<Node> {
    Some(rational_node(sum(bindings)? - 1))
}

/// `4 + 3 = 12`
fn multiplied_instead_of_added(_: &Node, bindings: &Bindings) -> Option<Node> {
    product(bindings).map(rational_node)
}

/// `5 - 3 = 8`
fn added_instead_of_subtracted(_: &Node, bindings: &Bindings) -> Option<Node> {
    let (a, b) = operands(bindings)?;
    if *b >= 0 {
        return None;
    }
    Some(rational_node(Rational::from(a - b)))
}

/// `4 * 3 = 12`
fn multiply(_: &Node, bindings: &Bindings) -> Option<Node> {
    product(bindings).map(rational_node)
}

/// `4 * 3 = 16`
fn multiplied_one_too_many(_: &Node, bindings: &Bindings) -> Option<Node> {
    let (a, _) = operands(bindings)?;
    Some(rational_node(product(bindings)? + a))
}

/// `4 * 3 = 8`
fn multiplied_one_too_few(_: &Node, bindings: &Bindings) -> Option<Node> {
    let (a, _) = operands(bindings)?;
    Some(rational_node(product(bindings)? - a))
}

/// `4 * 3 = 7`
fn added_instead_of_multiplied(_: &Node, bindings: &Bindings) -> Option<Node> {
    sum(bindings).map(rational_node)
}

/// `4 * 3 = 4/3`
fn divided_instead_of_multiplied(_: &Node, bindings: &Bindings) -> Option<Node> {
    fraction(bindings, "c1", "c2").map(rational_node)
}

/// `12 / 3 = 4`. Only applies if the quotient is an integer.
fn divide(_: &Node, bindings: &Bindings) -> Option<Node> {
    let quotient = fraction(bindings, "c1", "c2")?;
    if *quotient.denom() != 1 {
        return None;
    }
    Some(Node::Constant(quotient))
}

/// `12 / 3 = 36`
fn multiplied_instead_of_divided(_: &Node, bindings: &Bindings) -> Option<Node> {
    product(bindings).map(rational_node)
}

/// `6 / 4 = 3/2`, `1 / -2 = -1/2`
fn simplify_fraction(_: &Node, bindings: &Bindings) -> Option<Node> {
    integer(bindings, "c1")?;
    integer(bindings, "c2")?;
    fraction(bindings, "c1", "c2").map(rational_node)
}

/// `2 ^ 3 = 8`, `2 ^ -2 = 1/4`
fn power(_: &Node, bindings: &Bindings) -> Option<Node> {
    let base = constant(bindings, "c1")?;
    let exponent = integer(bindings, "c2")?;
    let magnitude = exponent.clone().abs().to_u32().filter(|e| *e <= MAX_EXPONENT)?;
    let bits = base.numer().significant_bits().max(base.denom().significant_bits());
    if bits.saturating_mul(magnitude) > MAX_POWER_BITS {
        return None;
    }

    let mut value = base.clone();
    value.pow_assign(magnitude);
    if *exponent < 0 {
        if value == 0 {
            return None;
        }
        Some(Node::div(Node::constant(1), rational_node(value)))
    } else {
        Some(rational_node(value))
    }
}

/// `2 ^ 3 = 6`
fn multiplied_instead_of_power(_: &Node, bindings: &Bindings) -> Option<Node> {
    product(bindings).map(rational_node)
}

/// `1/2 + 1/3 = 5/6`
fn add_fractions(_: &Node, bindings: &Bindings) -> Option<Node> {
    let sum = fraction(bindings, "c1", "c2")? + fraction(bindings, "c3", "c4")?;
    Some(rational_node(sum))
}

/// `1/2 + 1/3 = 2/5`
fn added_denominators(_: &Node, bindings: &Bindings) -> Option<Node> {
    let numer = Rational::from(constant(bindings, "c1")? + constant(bindings, "c3")?);
    let denom = Rational::from(constant(bindings, "c2")? + constant(bindings, "c4")?);
    if denom == 0 {
        return None;
    }
    Some(Node::div(Node::Constant(numer), Node::Constant(denom)))
}

/// `1 + 1/2 = 3/2`
fn add_integer_and_fraction(_: &Node, bindings: &Bindings) -> Option<Node> {
    let sum = fraction(bindings, "c2", "c3")? + constant(bindings, "c1")?;
    Some(rational_node(sum))
}

/// `1/2 * 2/3 = 1/3`
fn multiply_fractions(_: &Node, bindings: &Bindings) -> Option<Node> {
    let product = fraction(bindings, "c1", "c2")? * fraction(bindings, "c3", "c4")?;
    Some(rational_node(product))
}

pub const RULES: &[RuleDef] = &[
    RuleDef::computed(ChangeType::SimplifyArithmeticAdd, "c1 + c2", add).with_mistakes(&[
        MistakeDef { kind: MistakeType::AddedOneTooMany, build: added_one_too_many },
        MistakeDef { kind: MistakeType::AddedOneTooFew, build: added_one_too_few },
        MistakeDef { kind: MistakeType::MultipliedInsteadOfAdded, build: multiplied_instead_of_added },
        MistakeDef { kind: MistakeType::AddedInsteadOfSubtracted, build: added_instead_of_subtracted },
    ]),
    RuleDef::computed(ChangeType::SimplifyArithmeticMultiply, "c1 * c2", multiply).with_mistakes(&[
        MistakeDef { kind: MistakeType::MultipliedOneTooMany, build: multiplied_one_too_many },
        MistakeDef { kind: MistakeType::MultipliedOneTooFew, build: multiplied_one_too_few },
        MistakeDef { kind: MistakeType::AddedInsteadOfMultiplied, build: added_instead_of_multiplied },
        MistakeDef { kind: MistakeType::DividedInsteadOfMultiplied, build: divided_instead_of_multiplied },
    ]),
    RuleDef::computed(ChangeType::SimplifyArithmeticDivide, "c1 / c2", divide).with_mistakes(&[
        MistakeDef { kind: MistakeType::MultipliedInsteadOfDivided, build: multiplied_instead_of_divided },
    ]),
    RuleDef::computed(ChangeType::SimplifyFraction, "c1 / c2", simplify_fraction),
    RuleDef::computed(ChangeType::SimplifyArithmeticPower, "c1 ^ c2", power).with_mistakes(&[
        MistakeDef { kind: MistakeType::MultipliedInsteadOfPower, build: multiplied_instead_of_power },
    ]),
    RuleDef::computed(ChangeType::AddFractions, "c1 / c2 + c3 / c4", add_fractions).with_mistakes(&[
        MistakeDef { kind: MistakeType::AddedDenominators, build: added_denominators },
    ]),
    RuleDef::computed(ChangeType::AddIntegerAndFraction, "c1 + c2 / c3", add_integer_and_fraction),
    RuleDef::computed(ChangeType::MultiplyFractions, "(c1 / c2) * (c3 / c4)", multiply_fractions),
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

    fn mistakes(id: &str, node: &str) -> Vec<(MistakeType, String)> {
        let rules = RuleSet::standard().unwrap();
        let node = node.parse::<Node>().unwrap().normalize();
        apply(&node, rules.get(id).unwrap(), &MatchContext::default(), true)
            .unwrap()
            .map(|app| app.mistakes
                .into_iter()
                .map(|(kind, node)| (kind, node.normalize().to_string()))
                .collect())
            .unwrap_or_default()
    }

    #[test]
    fn add_and_subtract() {
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__ADD", "5 - 3").as_deref(), Some("2"));
        assert!(mistakes("SIMPLIFY_ARITHMETIC__ADD", "5 - 3")
            .contains(&(MistakeType::AddedInsteadOfSubtracted, "8".to_string())));
        assert!(!mistakes("SIMPLIFY_ARITHMETIC__ADD", "5 + 3")
            .iter()
            .any(|(kind, _)| *kind == MistakeType::AddedInsteadOfSubtracted));
    }

    #[test]
    fn multiply() {
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__MULTIPLY", "4 * 3").as_deref(), Some("12"));
        assert_eq!(mistakes("SIMPLIFY_ARITHMETIC__MULTIPLY", "4 * 3"), vec![
            (MistakeType::MultipliedOneTooMany, "16".to_string()),
            (MistakeType::MultipliedOneTooFew, "8".to_string()),
            (MistakeType::AddedInsteadOfMultiplied, "7".to_string()),
            (MistakeType::DividedInsteadOfMultiplied, "4/3".to_string()),
        ]);
    }

    #[test]
    fn divide() {
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__DIVIDE", "12 / 3").as_deref(), Some("4"));
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__DIVIDE", "12 / 5"), None);
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__DIVIDE", "12 / 0"), None);
        assert_eq!(apply_rule("SIMPLIFY_FRACTION", "6 / 4").as_deref(), Some("3/2"));
        assert_eq!(apply_rule("SIMPLIFY_FRACTION", "1 / -3").as_deref(), Some("-1/3"));
        assert_eq!(apply_rule("SIMPLIFY_FRACTION", "2 / 3"), None);
    }

    #[test]
    fn powers() {
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__POWER", "2 ^ 3").as_deref(), Some("8"));
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__POWER", "2 ^ -2").as_deref(), Some("1/4"));
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__POWER", "2 ^ 1000"), None);
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__POWER", "0 ^ -1"), None);
    }

    #[test]
    fn fractions() {
        assert_eq!(apply_rule("ADD_FRACTIONS", "1/2 + 1/3").as_deref(), Some("5/6"));
        assert_eq!(mistakes("ADD_FRACTIONS", "1/2 + 1/3"), vec![
            (MistakeType::AddedDenominators, "2/5".to_string()),
        ]);
        assert_eq!(apply_rule("ADD_INTEGER_AND_FRACTION", "1 + 1/2").as_deref(), Some("3/2"));
        assert_eq!(apply_rule("MULTIPLY_FRACTIONS", "(1/2) * (2/3)").as_deref(), Some("1/3"));
    }
}
