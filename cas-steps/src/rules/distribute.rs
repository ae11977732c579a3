//! Rules that distribute products over sums, and expand powers of sums.

use crate::{node::Node, pattern::Bindings};
use super::{bound, ChangeType, MistakeDef, MistakeType, RuleDef};

/// `-(a + b) = -a + b`
fn negated_first_term_only(_: &Node, bindings: &Bindings) -> Option<Node> {
    Some(Node::add(vec![bound(bindings, "n1")?.negated(), bound(bindings, "n2")?]))
}

/// `(a + b)^2 = a^2 + b^2`
fn squared_each_term(_: &Node, bindings: &Bindings) -> Option<Node> {
    let two = || Node::constant(2);
    Some(Node::add(vec![
        Node::pow(bound(bindings, "n1")?, two()),
        Node::pow(bound(bindings, "n2")?, two()),
    ]))
}

pub const DISTRIBUTE: &[RuleDef] = &[
    RuleDef::structural(ChangeType::Distribute, "n1 * (n2 + n3)", "n1 * n2 + n1 * n3"),
    RuleDef::structural(ChangeType::DistributeNegativeOne, "-(n1 + n2)", "-n1 + -n2")
        .with_mistakes(&[
            MistakeDef {
                kind: MistakeType::DistributedNegativeToFirstTermOnly,
                build: negated_first_term_only,
            },
        ]),
];

pub const EXPAND: &[RuleDef] = &[
    RuleDef::structural(
        ChangeType::ExpandSquareOfSum,
        "(n1 + n2) ^ 2",
        "n1 ^ 2 + 2 * n1 * n2 + n2 ^ 2",
    )
    .with_mistakes(&[
        MistakeDef { kind: MistakeType::SquaredEachTerm, build: squared_each_term },
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

    fn apply_rule(id: &str, node: &str) -> Option<(String, Vec<String>)> {
        let rules = RuleSet::standard().unwrap();
        let node = node.parse::<Node>().unwrap().normalize();
        apply(&node, rules.get(id).unwrap(), &MatchContext::default(), true)
            .unwrap()
            .map(|app| (
                app.after.normalize().to_string(),
                app.mistakes.into_iter().map(|(_, node)| node.normalize().to_string()).collect(),
            ))
    }

    #[test]
    fn distribute() {
        let (after, _) = apply_rule("DISTRIBUTE", "2(x + 1)").unwrap();
        assert_eq!(after, "2x + 2 * 1");
    }

    #[test]
    fn distribute_negative() {
        let (after, mistakes) = apply_rule("DISTRIBUTE_NEGATIVE_ONE", "-(x + y)").unwrap();
        assert_eq!(after, "-x - y");
        assert_eq!(mistakes, vec!["-x + y"]);
    }

    #[test]
    fn expand_square() {
        let (after, mistakes) = apply_rule("EXPAND_SQUARE_OF_SUM", "(x + 1)^2").unwrap();
        assert_eq!(after, "x^2 + 2x * 1 + 1^2");
        assert_eq!(mistakes, vec!["x^2 + 1^2"]);
    }
}
