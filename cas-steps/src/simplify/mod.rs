//! The rewrite engine, which drives an expression to its simplified form one rule at a time.
//!
//! # Algorithm
//!
//! The simplifier keeps track of an **active** node, initially the root. On each iteration, it
//! tries the rule groups in priority order; within a group, it visits every node below the active
//! node in post-order and tries each rule of the group on it. The first rule that changes the tree
//! wins: its result is spliced into the tree, the tree is normalized again, a [`Step`] is recorded,
//! and the node that was just rewritten becomes the active node, since most follow-up rewrites
//! happen near the last one.
//!
//! When nothing applies below the active node, the root becomes active again. When nothing applies
//! at the root either, the tree is printed and parsed again once, which can regroup it in ways the
//! rules cannot, and then the simplifier gives up. It also stops after a fixed number of rewrites,
//! returning the tree it has so far.
//!
//! Finally, the arguments of sums and products are put in presentation order (see
//! [`rearranged`]).
//!
//! ```
//! use cas_steps::{node::Node, rules::RuleSet, simplify::Simplifier};
//!
//! let rules = RuleSet::standard().unwrap();
//! let node = "x + 3 + 4".parse::<Node>().unwrap();
//! let mut steps = Vec::new();
//! let simplified = Simplifier::new(&rules).run(node, &mut steps).unwrap();
//! assert_eq!(simplified.to_string(), "x + 7");
//! assert_eq!(steps.len(), 2);
//! ```

pub mod step_collector;
pub mod unsupported;

use cas_error::Error;
use crate::{
    node::{sort::rearranged, Node, Path},
    pattern::MatchContext,
    rules::{apply, ChangeType, MistakeType, Rule, RuleSet},
};
use tracing::{debug, error};

pub use step_collector::StepCollector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of rewrites after which the simplifier stops.
pub const MAX_ITERATIONS: usize = 64;

/// A plausible but incorrect result of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MistakeStep {
    pub kind: MistakeType,

    /// The whole expression, as it would read after making the mistake.
    pub to: String,
}

/// A single rewrite of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Step {
    /// Identifier of the rule that was applied.
    pub rule: String,
    pub change: ChangeType,
    pub from: String,
    pub to: String,

    /// Incorrect results of the same rule under the same match. Only filled in if requested.
    pub mistakes: Vec<MistakeStep>,
}

impl Step {
    /// The synthetic step that starts every trace.
    pub fn original(node: &Node) -> Self {
        let text = node.to_string();
        Self {
            rule: ChangeType::OriginalExpression.as_str().to_string(),
            change: ChangeType::OriginalExpression,
            from: text.clone(),
            to: text,
            mistakes: Vec::new(),
        }
    }
}

/// Replaces the node at the path and normalizes the whole tree.
pub(crate) fn splice(root: &Node, path: &[usize], replacement: Node) -> Node {
    let mut root = root.clone();
    if root.replace_at(path, replacement).is_none() {
        return root;
    }
    root.normalize()
}

/// Returns the longest prefix of the path that still leads to a node of the tree.
fn valid_prefix(root: &Node, path: &[usize]) -> Path {
    let mut prefix = Path::new();
    for &index in path {
        prefix.push(index);
        if root.get(&prefix).is_none() {
            prefix.pop();
            break;
        }
    }
    prefix
}

/// A rewrite found by [`Simplifier::rewrite_once`].
struct Rewrite<'r> {
    rule: &'r Rule,
    path: Path,
    after: Node,
    mistakes: Vec<MistakeStep>,
}

/// Drives expressions to their simplified form.
#[derive(Clone, Copy)]
pub struct Simplifier<'a> {
    rules: &'a RuleSet,
    ctx: MatchContext<'a>,
    max_iterations: usize,
    with_mistakes: bool,
}

impl<'a> Simplifier<'a> {
    /// Creates a simplifier using the given rules.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            ctx: MatchContext::default(),
            max_iterations: MAX_ITERATIONS,
            with_mistakes: false,
        }
    }

    /// Sets the context the rules are matched in.
    pub fn context(self, ctx: MatchContext<'a>) -> Self {
        Self { ctx, ..self }
    }

    /// Sets the number of rewrites after which the simplifier stops.
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self { max_iterations, ..self }
    }

    /// Sets whether each step should include the mistakes that could be made performing it.
    pub fn with_mistakes(self, with_mistakes: bool) -> Self {
        Self { with_mistakes, ..self }
    }

    /// Finds the first rewrite below the active node that changes the tree.
    fn rewrite_once(&self, root: &Node, active: &[usize]) -> Result<Option<Rewrite<'a>>, Error> {
        let Some(base) = root.get(active) else {
            return Ok(None);
        };
        let before = root.key();

        for (group, rules) in self.rules.groups() {
            for (relative, node) in base.post_order_paths() {
                for rule in rules {
                    let Some(application) = apply(node, rule, &self.ctx, self.with_mistakes)? else {
                        continue;
                    };

                    let path = active.iter().copied().chain(relative.iter().copied()).collect::<Path>();
                    let after = splice(root, &path, application.after);
                    if after.key() == before {
                        continue;
                    }

                    debug!(group, rule = rule.id.as_str(), "applied rule");
                    let mistakes = application.mistakes
                        .into_iter()
                        .map(|(kind, wrong)| MistakeStep {
                            kind,
                            to: splice(root, &path, wrong).to_string(),
                        })
                        .collect();
                    return Ok(Some(Rewrite { rule, path, after, mistakes }));
                }
            }
        }

        Ok(None)
    }

    /// Simplifies the expression, reporting each rewrite to the step collector.
    ///
    /// If the expression calls a function the rules do not support, it is returned unchanged and
    /// no steps are reported.
    pub fn run(&self, node: Node, steps: &mut dyn StepCollector<Step>) -> Result<Node, Error> {
        let mut root = node.normalize();
        if !unsupported::check_supported(&root) {
            return Ok(root);
        }
        steps.push(Step::original(&root));

        let mut active = Path::new();
        let mut reparsed = false;
        let mut rewrites = 0;
        loop {
            if rewrites >= self.max_iterations {
                error!(
                    expression = %root,
                    "simplification did not finish after {} rewrites, possible infinite loop",
                    self.max_iterations
                );
                break;
            }

            match self.rewrite_once(&root, &active)? {
                Some(rewrite) => {
                    if steps.is_recording() {
                        steps.push(Step {
                            rule: rewrite.rule.id.clone(),
                            change: rewrite.rule.change,
                            from: root.to_string(),
                            to: rewrite.after.to_string(),
                            mistakes: rewrite.mistakes,
                        });
                    }
                    active = valid_prefix(&rewrite.after, &rewrite.path);
                    root = rewrite.after;
                    reparsed = false;
                    rewrites += 1;
                },
                None if !active.is_empty() => active.clear(),
                None if !reparsed => {
                    // a tree that does not print and parse back cleanly is kept as is
                    if let Ok(node) = root.to_string().parse::<Node>() {
                        root = node.normalize();
                    }
                    reparsed = true;
                },
                None => break,
            }
        }

        let arranged = rearranged(root.clone());
        if arranged.key() != root.key() {
            steps.push(Step {
                rule: ChangeType::RearrangeCoefficients.as_str().to_string(),
                change: ChangeType::RearrangeCoefficients,
                from: root.to_string(),
                to: arranged.to_string(),
                mistakes: Vec::new(),
            });
        }

        Ok(arranged)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplify(input: &str) -> (String, Vec<Step>) {
        let rules = RuleSet::standard().unwrap();
        let mut steps = Vec::new();
        let node = Simplifier::new(&rules)
            .run(input.parse::<Node>().unwrap(), &mut steps)
            .unwrap();
        (node.to_string(), steps)
    }

    fn simplified(input: &str) -> String {
        simplify(input).0
    }

    #[test]
    fn already_simple() {
        let (result, steps) = simplify("2*x^2");
        assert_eq!(result, "2x^2");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].change, ChangeType::OriginalExpression);
    }

    #[test]
    fn identities() {
        assert_eq!(simplified("x/1"), "x");
        assert_eq!(simplified("x * 1 + 0"), "x");
        assert_eq!(simplified("-(-x)"), "x");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(simplified("4 + 3"), "7");
        assert_eq!(simplified("2 * 3 + 4"), "10");
        assert_eq!(simplified("6 / 4"), "3/2");
        assert_eq!(simplified("0.5 + 0.25"), "3/4");
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("2x + 3x"), "5x");
        assert_eq!(simplified("x * x"), "x^2");
        assert_eq!(simplified("3 + x + 4"), "x + 7");
    }

    #[test]
    fn trace() {
        let (result, steps) = simplify("x + 3 + 4");
        assert_eq!(result, "x + 7");
        assert_eq!(steps[1].change, ChangeType::SimplifyArithmeticAdd);
        assert_eq!(steps[1].from, "x + 3 + 4");
        assert_eq!(steps[1].to, "x + 7");
        for pair in steps.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn rearranges_at_the_end() {
        let (result, steps) = simplify("x * 2");
        assert_eq!(result, "2x");
        assert_eq!(steps.last().unwrap().change, ChangeType::RearrangeCoefficients);
    }

    #[test]
    fn idempotent() {
        for input in ["2x + 3x + 1", "(x + 1)^2", "x/1 + 4 * 3", "2(x + 3)"] {
            let once = simplified(input);
            assert_eq!(simplified(&once), once, "{}", input);
        }
    }

    #[test]
    fn logs_and_powers() {
        assert_eq!(simplified("log10(100)"), "2");
        assert_eq!(simplified("logXY(2, 8)"), "3");
        assert_eq!(simplified("log10(x)"), "log10(x)");
        assert_eq!(simplified("x^2/x"), "x");
        assert_eq!(simplified("x^5/x^2"), "x^3");
    }

    #[test]
    fn zero_over_zero_is_left_alone() {
        let (result, steps) = simplify("0/0");
        assert_eq!(result, "0/0");
        assert_eq!(steps.len(), 1);
        assert_eq!(simplified("0/(x - x)"), "0/0");
        assert_eq!(simplified("0/(x + 1)"), "0");
    }

    #[test]
    fn unsupported_function_is_left_alone() {
        let (result, steps) = simplify("foo(1 + 2)");
        assert_eq!(result, "foo(1 + 2)");
        assert!(steps.is_empty());
    }

    #[test]
    fn mistakes_are_recorded() {
        let rules = RuleSet::standard().unwrap();
        let mut steps = Vec::new();
        Simplifier::new(&rules)
            .with_mistakes(true)
            .run("4 + 3".parse::<Node>().unwrap(), &mut steps)
            .unwrap();
        assert!(steps[1].mistakes.contains(&MistakeStep {
            kind: MistakeType::AddedOneTooMany,
            to: "8".to_string(),
        }));
    }

    #[test]
    fn iteration_cap() {
        let rules = RuleSet::standard().unwrap();
        let node = Simplifier::new(&rules)
            .max_iterations(1)
            .run("1 + 2 + 3".parse::<Node>().unwrap(), &mut ())
            .unwrap();
        assert_eq!(node.to_string(), "3 + 3");
    }
}
