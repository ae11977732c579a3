//! Rules for the identities of the arithmetic operators, and for moving signs and fractions into
//! a standard position.

use crate::{node::{Node, Op}, pattern::Bindings};
use super::{bound, ChangeType, RuleDef};

/// Returns true if the node is zero as written: the constant zero, or a sum whose terms cancel in
/// pairs, such as `x - x`.
fn is_zero(node: &Node) -> bool {
    match node {
        Node::Constant(value) => *value == 0,
        Node::Operator { op: Op::Add, args, .. } => {
            let mut used = vec![false; args.len()];
            for i in 0..args.len() {
                if used[i] {
                    continue;
                }
                used[i] = true;
                let opposite = args[i].clone().negated();
                let found = (i + 1..args.len()).find(|&j| !used[j] && args[j] == opposite);
                match found {
                    Some(j) => used[j] = true,
                    None if is_zero(&args[i]) => {},
                    None => return false,
                }
            }
            true
        },
        _ => false,
    }
}

/// `0 / x = 0`, unless the denominator is zero too.
fn reduce_zero_numerator(_: &Node, bindings: &Bindings) -> Option<Node> {
    let denominator = bound(bindings, "n1")?;
    (!is_zero(&denominator)).then(|| Node::constant(0))
}

pub const RULES: &[RuleDef] = &[
    RuleDef::structural(ChangeType::RemoveAddingZero, "n1 + 0", "n1"),
    RuleDef::structural(ChangeType::RemoveMultiplyingByOne, "n1 * 1", "n1"),
    RuleDef::structural(ChangeType::MultiplyByZero, "n1 * 0", "0"),
    RuleDef::structural(ChangeType::RemoveExponentByOne, "n1 ^ 1", "n1"),
    RuleDef::structural(ChangeType::ReduceExponentByZero, "n1 ^ 0", "1"),
    RuleDef::structural(ChangeType::RemoveDividingByOne, "n1 / 1", "n1"),
    RuleDef::structural(ChangeType::DivideByNegativeOne, "n1 / -1", "-n1"),
    RuleDef::structural(ChangeType::RemoveMultiplyingByNegativeOne, "-1 * n1", "-n1"),
    RuleDef::structural(ChangeType::ResolveDoubleMinus, "-(-n1)", "n1"),
    RuleDef::computed(ChangeType::ReduceZeroNumerator, "0 / n1", reduce_zero_numerator),
    RuleDef::structural(ChangeType::RemoveExponentBaseOne, "1 ^ n1", "1"),
    RuleDef::structural(ChangeType::MultiplyNegatives, "-n1 * -n2", "n1 * n2"),
    RuleDef::structural(ChangeType::CancelMinuses, "-n1 / -n2", "n1 / n2"),
    RuleDef::structural(ChangeType::MultiplyByInverse, "n1 / (n2 / n3)", "n1 * n3 / n2"),
    RuleDef::structural(ChangeType::SimplifyNestedFraction, "(n1 / n2) / n3", "n1 / (n2 * n3)"),
    RuleDef::structural(ChangeType::MultiplyByFraction, "n1 * (n2 / n3)", "(n1 * n2) / n3"),
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(s: &str) -> Node {
        s.parse::<Node>().unwrap().normalize()
    }

    #[test]
    fn zero_denominators() {
        assert!(is_zero(&parse("0")));
        assert!(is_zero(&parse("x - x")));
        assert!(is_zero(&parse("x + 2 - x - 2")));
        assert!(!is_zero(&parse("x - 2")));
        assert!(!is_zero(&parse("x")));
    }

    #[test]
    fn zero_numerator() {
        let bindings = |denominator: &str| Bindings::from([("n1".to_string(), parse(denominator))]);
        let zero = Node::constant(0);
        assert_eq!(reduce_zero_numerator(&zero, &bindings("x + 1")), Some(Node::constant(0)));
        assert_eq!(reduce_zero_numerator(&zero, &bindings("0")), None);
        assert_eq!(reduce_zero_numerator(&zero, &bindings("x - x")), None);
    }
}
