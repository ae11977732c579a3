//! Rules that evaluate functions at known values.

use crate::{
    node::{Node, Op},
    pattern::Bindings,
};
use once_cell::sync::Lazy;
use rug::Rational;
use std::collections::HashMap;
use super::{constant, rational_node, ChangeType, RuleDef};

/// Exact values of `sin`, `cos` and `tan` at the constructible angles, keyed by the angle as a
/// fraction of a full turn, in `[0, 1)`. `tan` is undefined at a quarter and three quarters of a
/// turn.
static TRIG_VALUES: Lazy<HashMap<Rational, [Option<&'static str>; 3]>> = Lazy::new(|| {
    [
        ((0, 1), [Some("0"), Some("1"), Some("0")]),
        ((1, 12), [Some("1/2"), Some("nthRoot(3, 2)/2"), Some("nthRoot(3, 2)/3")]),
        ((1, 8), [Some("nthRoot(2, 2)/2"), Some("nthRoot(2, 2)/2"), Some("1")]),
        ((1, 6), [Some("nthRoot(3, 2)/2"), Some("1/2"), Some("nthRoot(3, 2)")]),
        ((1, 4), [Some("1"), Some("0"), None]),
        ((1, 3), [Some("nthRoot(3, 2)/2"), Some("-1/2"), Some("-nthRoot(3, 2)")]),
        ((3, 8), [Some("nthRoot(2, 2)/2"), Some("-nthRoot(2, 2)/2"), Some("-1")]),
        ((5, 12), [Some("1/2"), Some("-nthRoot(3, 2)/2"), Some("-nthRoot(3, 2)/3")]),
        ((1, 2), [Some("0"), Some("-1"), Some("0")]),
        ((7, 12), [Some("-1/2"), Some("-nthRoot(3, 2)/2"), Some("nthRoot(3, 2)/3")]),
        ((5, 8), [Some("-nthRoot(2, 2)/2"), Some("-nthRoot(2, 2)/2"), Some("1")]),
        ((2, 3), [Some("-nthRoot(3, 2)/2"), Some("-1/2"), Some("nthRoot(3, 2)")]),
        ((3, 4), [Some("-1"), Some("0"), None]),
        ((5, 6), [Some("-nthRoot(3, 2)/2"), Some("1/2"), Some("-nthRoot(3, 2)")]),
        ((7, 8), [Some("-nthRoot(2, 2)/2"), Some("nthRoot(2, 2)/2"), Some("-1")]),
        ((11, 12), [Some("-1/2"), Some("nthRoot(3, 2)/2"), Some("-nthRoot(3, 2)/3")]),
    ]
    .into_iter()
    .map(|(turn, values)| (Rational::from(turn), values))
    .collect()
});

/// Returns true if the node is `const.pi`.
fn is_pi(node: &Node) -> bool {
    matches!(node, Node::Accessor { object, index } if object == "const" && index == "pi")
}

/// Returns the multiple of `pi` the node represents, as in `3const.pi/4`.
fn multiple_of_pi(node: &Node) -> Option<Rational> {
    match node {
        Node::Constant(value) if *value == 0 => Some(Rational::new()),
        node if is_pi(node) => Some(Rational::from(1)),
        Node::Operator { op: Op::Mul, args, .. } => match args.as_slice() {
            [Node::Constant(c), pi] | [pi, Node::Constant(c)] if is_pi(pi) => Some(c.clone()),
            _ => None,
        },
        Node::Operator { op: Op::Div, args, .. } => match args.as_slice() {
            [numerator, Node::Constant(denominator)] if *denominator != 0 => {
                Some(multiple_of_pi(numerator)? / denominator)
            },
            _ => None,
        },
        Node::Operator { op: Op::Neg, args, .. } => Some(-multiple_of_pi(args.first()?)?),
        _ => None,
    }
}

/// `sin(const.pi/6) = 1/2`, `cos(const.pi) = -1`, ..
fn evaluate_trig(node: &Node, _: &Bindings) -> Option<Node> {
    let Node::Function { name, args } = node else {
        return None;
    };
    let column = match name.as_str() {
        "sin" => 0,
        "cos" => 1,
        "tan" => 2,
        _ => return None,
    };

    // half a turn is one `pi`
    let turns = multiple_of_pi(args.first()?)? / Rational::from(2);
    let whole = turns.clone().floor();
    let turns = turns - whole;
    let value = TRIG_VALUES.get(&turns)?[column]?;
    value.parse::<Node>().ok().map(Node::normalize)
}

/// `abs(-3) = 3`
fn absolute_value(_: &Node, bindings: &Bindings) -> Option<Node> {
    Some(rational_node(constant(bindings, "c1")?.clone().abs()))
}

pub const RULES: &[RuleDef] = &[
    RuleDef::computed(ChangeType::EvaluateTrigFunction, "sin(n1)", evaluate_trig),
    RuleDef::computed(ChangeType::EvaluateTrigFunction, "cos(n1)", evaluate_trig),
    RuleDef::computed(ChangeType::EvaluateTrigFunction, "tan(n1)", evaluate_trig),
    RuleDef::computed(ChangeType::AbsoluteValue, "abs(c1)", absolute_value),
    RuleDef::structural(ChangeType::AbsoluteValue, "abs(-n1)", "abs(n1)"),
    RuleDef::structural(ChangeType::ConvertPercent, "percent(n1)", "n1 / 100"),
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn trig(input: &str) -> Option<String> {
        let node = input.parse::<Node>().unwrap().normalize();
        evaluate_trig(&node, &Bindings::new()).map(|node| node.to_string())
    }

    #[test]
    fn known_angles() {
        assert_eq!(trig("sin(0)").as_deref(), Some("0"));
        assert_eq!(trig("sin(const.pi / 6)").as_deref(), Some("1/2"));
        assert_eq!(trig("cos(const.pi)").as_deref(), Some("-1"));
        assert_eq!(trig("cos(2 * const.pi)").as_deref(), Some("1"));
        assert_eq!(trig("tan(const.pi / 4)").as_deref(), Some("1"));
        assert_eq!(trig("sin(-const.pi / 2)").as_deref(), Some("-1"));
    }

    #[test]
    fn unknown_angles() {
        assert_eq!(trig("sin(1)"), None);
        assert_eq!(trig("tan(const.pi / 2)"), None);
        assert_eq!(trig("sin(x)"), None);
    }
}
