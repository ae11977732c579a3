//! Enumeration of every step that can be taken from an expression.
//!
//! Unlike the [`Simplifier`], which greedily takes the first applicable rewrite, the explorer
//! tries every rule at every node of the tree, under every match, and returns each distinct
//! resulting expression. Step assessment searches the graph these steps form for the step a user
//! submitted.
//!
//! [`Simplifier`]: crate::simplify::Simplifier

use cas_error::Error;
use crate::{
    node::{Node, Path},
    pattern::MatchContext,
    rules::{apply_all, RuleSet},
    simplify::{splice, unsupported::find_unsupported, MistakeStep, Step},
};
use std::collections::HashMap;
use tracing::debug;

/// Returns the node, and if it is a commutative operator node, the node with its first two
/// arguments swapped. Some rewrites are only found under a particular order of the arguments.
fn orderings(node: &Node) -> Vec<Node> {
    let mut orderings = vec![node.clone()];
    if let Node::Operator { op, args, implicit } = node {
        if op.is_commutative() && args.len() >= 2 {
            let mut swapped = args.clone();
            swapped.swap(0, 1);
            orderings.push(Node::Operator { op: *op, args: swapped, implicit: *implicit });
        }
    }
    orderings
}

/// Adds the mistakes to the list, skipping ones already in it.
fn merge_mistakes(into: &mut Vec<MistakeStep>, mistakes: Vec<MistakeStep>) {
    for mistake in mistakes {
        if !into.iter().any(|existing| existing.to == mistake.to) {
            into.push(mistake);
        }
    }
}

/// Returns every distinct step that can be taken from the expression, in rule priority order.
///
/// Each step carries the mistakes that could be made while taking it. A mistake whose result is the
/// same as the correct result, or the same as the starting expression, is dropped.
///
/// An expression calling a function the rules do not support has no next steps, just as the
/// simplifier leaves it alone.
pub fn next_steps(root: &Node, rules: &RuleSet, ctx: &MatchContext) -> Result<Vec<Step>, Error> {
    if let Some(function) = find_unsupported(root) {
        debug!(expression = %root, function, "unsupported function, no next steps");
        return Ok(Vec::new());
    }

    let from = root.to_string();
    let before = root.key();
    let nodes = root.post_order_paths()
        .map(|(path, node)| (path, orderings(node)))
        .collect::<Vec<(Path, Vec<Node>)>>();

    let mut steps = Vec::<Step>::new();
    let mut seen = HashMap::<String, usize>::new();
    for rule in rules.rules() {
        for (path, orderings) in &nodes {
            for node in orderings {
                for application in apply_all(node, rule, ctx, true)? {
                    let after = splice(root, path, application.after);
                    let key = after.key();
                    if key == before {
                        continue;
                    }

                    let mut mistakes = Vec::new();
                    merge_mistakes(&mut mistakes, application.mistakes
                        .into_iter()
                        .filter_map(|(kind, wrong)| {
                            let wrong = splice(root, path, wrong);
                            let wrong_key = wrong.key();
                            (wrong_key != key && wrong_key != before)
                                .then(|| MistakeStep { kind, to: wrong.to_string() })
                        })
                        .collect());

                    match seen.get(&key) {
                        Some(&index) => merge_mistakes(&mut steps[index].mistakes, mistakes),
                        None => {
                            seen.insert(key, steps.len());
                            steps.push(Step {
                                rule: rule.id.clone(),
                                change: rule.change,
                                from: from.clone(),
                                to: after.to_string(),
                                mistakes,
                            });
                        },
                    }
                }
            }
        }
    }

    debug!(expression = from.as_str(), count = steps.len(), "enumerated next steps");
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::rules::{ChangeType, MistakeType};
    use super::*;

    fn explore(input: &str) -> Vec<Step> {
        let rules = RuleSet::standard().unwrap();
        let node = input.parse::<Node>().unwrap().normalize();
        next_steps(&node, &rules, &MatchContext::default()).unwrap()
    }

    #[test]
    fn single_step() {
        let steps = explore("4 + 3");
        let add = steps.iter().find(|step| step.to == "7").unwrap();
        assert_eq!(add.change, ChangeType::SimplifyArithmeticAdd);
        assert_eq!(add.from, "4 + 3");
        assert!(add.mistakes.contains(&MistakeStep {
            kind: MistakeType::AddedOneTooMany,
            to: "8".to_string(),
        }));
    }

    #[test]
    fn every_pair() {
        let steps = explore("1 + 2 + 3");
        for expected in ["3 + 3", "1 + 5", "4 + 2"] {
            assert!(steps.iter().any(|step| step.to == expected), "{}", expected);
        }
    }

    #[test]
    fn every_node() {
        let steps = explore("(1 + 1) * (2 + 2)");
        assert!(steps.iter().any(|step| step.to == "2(2 + 2)"));
        assert!(steps.iter().any(|step| step.to == "(1 + 1) * 4"));
    }

    #[test]
    fn distinct_results() {
        let steps = explore("x + 3 + 4");
        let mut keys = steps.iter().map(|step| step.to.replace(' ', "")).collect::<Vec<_>>();
        let count = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), count);
        assert!(steps.iter().all(|step| step.to != step.from));
    }

    #[test]
    fn nothing_to_do() {
        assert!(explore("x").is_empty());
    }

    #[test]
    fn unsupported_function() {
        assert!(explore("foo(1 + 2)").is_empty());
        assert!(explore("2 * foo(x) + 1 + 2").is_empty());
        assert!(!explore("sin(1 + 2)").is_empty());
    }
}
