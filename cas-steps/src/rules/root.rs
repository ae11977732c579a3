//! Rules for roots.

use crate::{
    node::Node,
    primitive::{exact_root, int},
    pattern::Bindings,
};
use rug::{ops::Pow, Integer};
use std::collections::BTreeMap;
use super::{bound, integer, ChangeType, RuleDef};

/// Largest radicand that is factored by [`SIMPLIFY_ROOT_OF_CONSTANT`]. Trial division up to its
/// square root stays fast.
const MAX_RADICAND: u64 = 1_000_000_000_000;

/// Largest root index that is simplified.
const MAX_INDEX: u32 = 64;

/// Computes the prime factorization of a positive integer.
fn prime_factorization(mut n: Integer) -> BTreeMap<Integer, u32> {
    let mut factors = BTreeMap::new();
    let mut i = int(2);
    while Integer::from(&i * &i) <= n {
        while n.is_divisible(&i) {
            *factors.entry(i.clone()).or_insert(0) += 1;
            n /= &i;
        }
        i += 1;
    }
    if n > 1 {
        *factors.entry(n).or_insert(0) += 1;
    }

    factors
}

/// Returns the root index bound to the wildcard, if it is small enough to simplify.
fn root_index(bindings: &Bindings, name: &str) -> Option<u32> {
    integer(bindings, name)?.to_u32().filter(|k| (1..=MAX_INDEX).contains(k))
}

/// `nthRoot(x^6, 2) = x^3`
fn root_of_power(_: &Node, bindings: &Bindings) -> Option<Node> {
    let exponent = integer(bindings, "c1")?;
    let index = Integer::from(root_index(bindings, "c2")?);
    if !exponent.is_divisible(&index) {
        return None;
    }

    let reduced = Integer::from(exponent / &index);
    Some(Node::pow(bound(bindings, "n1")?, Node::constant(reduced)))
}

/// `nthRoot(12, 2) = 2 * nthRoot(3, 2)`, `nthRoot(-8, 3) = -2`
fn root_of_constant(_: &Node, bindings: &Bindings) -> Option<Node> {
    let radicand = integer(bindings, "c1")?;
    let index = root_index(bindings, "c2")?;
    if let Some(root) = exact_root(radicand, index) {
        return Some(Node::constant(root));
    }

    // even roots of negative numbers are not real
    if *radicand < 0 && index % 2 == 0 {
        return None;
    }
    let magnitude = radicand.clone().abs();
    if magnitude > MAX_RADICAND || magnitude < 2 {
        return None;
    }

    let mut outside = int(1);
    let mut inside = int(1);
    for (prime, count) in prime_factorization(magnitude) {
        outside *= Integer::from((&prime).pow(count / index));
        inside *= Integer::from((&prime).pow(count % index));
    }
    if outside == 1 {
        return None;
    }
    if *radicand < 0 {
        outside = -outside;
    }

    Some(Node::mul(vec![
        Node::constant(outside),
        Node::function("nthRoot", vec![Node::constant(inside), Node::constant(index)]),
    ]))
}

pub const ROOT_OF_POWER: &[RuleDef] = &[
    RuleDef::structural(ChangeType::CancelRootOfPower, "nthRoot(n1 ^ n2, n2)", "n1"),
    RuleDef::structural(ChangeType::RemoveRootIndexOne, "nthRoot(n1, 1)", "n1"),
    RuleDef::computed(ChangeType::RootOfPower, "nthRoot(n1 ^ c1, c2)", root_of_power),
    RuleDef::structural(ChangeType::CancelPowerOfRoot, "nthRoot(n1, n2) ^ n2", "n1"),
];

pub const ROOT_OF_CONSTANT: &[RuleDef] = &[
    RuleDef::computed(ChangeType::SimplifyRootOfConstant, "nthRoot(c1, c2)", root_of_constant),
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
    fn factorization() {
        let factors = prime_factorization(int(360));
        assert_eq!(
            factors.into_iter().collect::<Vec<_>>(),
            vec![(int(2), 3), (int(3), 2), (int(5), 1)],
        );
    }

    #[test]
    fn roots_of_powers() {
        assert_eq!(apply_rule("CANCEL_ROOT_OF_POWER", "sqrt(x^2)").as_deref(), Some("x"));
        assert_eq!(apply_rule("REMOVE_ROOT_INDEX_ONE", "nthRoot(x, 1)").as_deref(), Some("x"));
        assert_eq!(apply_rule("ROOT_OF_POWER", "sqrt(x^6)").as_deref(), Some("x^3"));
        assert_eq!(apply_rule("ROOT_OF_POWER", "nthRoot(x^5, 2)"), None);
        assert_eq!(apply_rule("CANCEL_POWER_OF_ROOT", "sqrt(x)^2").as_deref(), Some("x"));
    }

    #[test]
    fn roots_of_constants() {
        assert_eq!(apply_rule("SIMPLIFY_ROOT_OF_CONSTANT", "sqrt(16)").as_deref(), Some("4"));
        assert_eq!(apply_rule("SIMPLIFY_ROOT_OF_CONSTANT", "nthRoot(-8, 3)").as_deref(), Some("-2"));
        assert_eq!(
            apply_rule("SIMPLIFY_ROOT_OF_CONSTANT", "sqrt(12)").as_deref(),
            Some("2nthRoot(3, 2)"),
        );
        assert_eq!(apply_rule("SIMPLIFY_ROOT_OF_CONSTANT", "sqrt(7)"), None);
        assert_eq!(apply_rule("SIMPLIFY_ROOT_OF_CONSTANT", "sqrt(-4)"), None);
    }
}
