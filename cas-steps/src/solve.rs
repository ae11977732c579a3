//! Solving linear equations for an unknown variable.
//!
//! Solving uses its own small group of rules written over whole equations, such as
//! `fx1 + a1 = a2` → `fx1 = a2 - a1`. They use the equation-mode wildcards (`x`, `a*` and
//! `fx*`), so they can only be matched once the unknown is known. After every move, both sides
//! are simplified with the standard rules. Solving stops once the equation reads `x = a1`, or
//! when no rule applies.

use cas_error::Error;
use crate::{
    error::MalformedRule,
    node::Node,
    pattern::{match_pattern, merge, Bindings, MatchContext, Pattern},
    rules::{EquationChange, RuleSet},
    simplify::Simplifier,
};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The equation that is solved for the unknown.
const SOLVED: &str = "x = a1";

/// The moves performed while solving, in priority order.
const MOVES: [(EquationChange, &str, &str); 6] = [
    (EquationChange::SwapSides, "a1 = fx1", "fx1 = a1"),
    (EquationChange::SubtractFromBothSides, "fx1 + a1 = a2", "fx1 = a2 - a1"),
    (EquationChange::DivideBothSides, "a1 * fx1 = a2", "fx1 = a2 / a1"),
    (EquationChange::MultiplyBothSides, "fx1 / a1 = a2", "fx1 = a2 * a1"),
    (EquationChange::NegateBothSides, "-fx1 = a1", "fx1 = -a1"),
    (EquationChange::MoveToLeftSide, "fx1 = fx2", "fx1 - fx2 = 0"),
];

/// One step of a solution, between two equations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquationStep {
    pub from: String,
    pub to: String,
    pub change: EquationChange,
}

/// The result of solving an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub lhs: Node,
    pub rhs: Node,
    pub steps: Vec<EquationStep>,

    /// True if the unknown ended up alone on the left-hand side.
    pub solved: bool,
}

/// A compiled pair of patterns, one per side of an equation.
struct EquationPattern {
    lhs: Pattern,
    rhs: Pattern,
}

impl EquationPattern {
    fn compile(text: &str) -> Result<Self, Error> {
        let (lhs, rhs) = text.split_once('=')
            .ok_or_else(|| Error::spanless(MalformedRule { rule: text.to_string() }))?;
        Ok(Self {
            lhs: Pattern::compile(lhs.trim())?,
            rhs: Pattern::compile(rhs.trim())?,
        })
    }

    /// Returns the first set of bindings under which both sides match.
    fn matches(&self, lhs: &Node, rhs: &Node, ctx: &MatchContext) -> Result<Option<Bindings>, Error> {
        let left = match_pattern(&self.lhs, lhs, ctx)?;
        if left.is_empty() {
            return Ok(None);
        }
        let right = match_pattern(&self.rhs, rhs, ctx)?;
        Ok(merge(&left, &right).into_iter().next())
    }

    fn substitute(&self, bindings: &Bindings) -> Option<(Node, Node)> {
        Some((
            self.lhs.substitute(bindings)?.normalize(),
            self.rhs.substitute(bindings)?.normalize(),
        ))
    }
}

fn equation(lhs: &Node, rhs: &Node) -> String {
    format!("{} = {}", lhs, rhs)
}

/// Returns true if the move cannot be made under the bindings.
fn blocked(change: EquationChange, bindings: &Bindings) -> bool {
    let zero = |name: &str| bindings.get(name)
        .and_then(Node::as_constant)
        .map_or(false, |value| *value == 0);
    change == EquationChange::DivideBothSides && zero("a1")
}

/// Solves the equation for the unknown, using `rules` to simplify both sides after every move.
pub fn solve(
    rules: &RuleSet,
    lhs: Node,
    rhs: Node,
    unknown: &str,
    max_iterations: usize,
) -> Result<Solution, Error> {
    let ctx = MatchContext::with_unknown(unknown);
    let simplifier = Simplifier::new(rules).max_iterations(max_iterations);
    let solved = EquationPattern::compile(SOLVED)?;
    let moves = MOVES.iter()
        .map(|(change, from, to)| Ok((*change, EquationPattern::compile(from)?, EquationPattern::compile(to)?)))
        .collect::<Result<Vec<_>, Error>>()?;

    let mut steps = Vec::new();
    let simplify_sides = |lhs: Node, rhs: Node, steps: &mut Vec<EquationStep>| -> Result<(Node, Node), Error> {
        let from = equation(&lhs, &rhs);
        let lhs = simplifier.run(lhs, &mut ())?;
        let after_lhs = equation(&lhs, &rhs);
        if after_lhs != from {
            steps.push(EquationStep { from, to: after_lhs.clone(), change: EquationChange::SimplifyLhs });
        }

        let rhs = simplifier.run(rhs, &mut ())?;
        let after_rhs = equation(&lhs, &rhs);
        if after_rhs != after_lhs {
            steps.push(EquationStep { from: after_lhs, to: after_rhs, change: EquationChange::SimplifyRhs });
        }
        Ok((lhs, rhs))
    };

    let (mut lhs, mut rhs) = simplify_sides(lhs, rhs, &mut steps)?;
    for _ in 0..max_iterations {
        if solved.matches(&lhs, &rhs, &ctx)?.is_some() {
            return Ok(Solution { lhs, rhs, steps, solved: true });
        }

        let mut moved = None;
        for (change, from, to) in &moves {
            let Some(bindings) = from.matches(&lhs, &rhs, &ctx)? else {
                continue;
            };
            if blocked(*change, &bindings) {
                continue;
            }
            if let Some(sides) = to.substitute(&bindings) {
                moved = Some((*change, sides));
                break;
            }
        }

        let Some((change, (new_lhs, new_rhs))) = moved else {
            break;
        };
        debug!(change = change.as_str(), equation = equation(&lhs, &rhs).as_str(), "moved terms");
        steps.push(EquationStep {
            from: equation(&lhs, &rhs),
            to: equation(&new_lhs, &new_rhs),
            change,
        });
        (lhs, rhs) = simplify_sides(new_lhs, new_rhs, &mut steps)?;
    }

    let solved = solved.matches(&lhs, &rhs, &ctx)?.is_some();
    Ok(Solution { lhs, rhs, steps, solved })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::node::parse_equation;
    use super::*;

    fn solve_for_x(input: &str) -> Solution {
        let rules = RuleSet::standard().unwrap();
        let (lhs, rhs) = parse_equation(input).unwrap();
        solve(&rules, lhs.normalize(), rhs.normalize(), "x", 64).unwrap()
    }

    #[test]
    fn linear() {
        let solution = solve_for_x("2x + 3 = 5");
        assert!(solution.solved);
        assert_eq!(solution.rhs.to_string(), "1");
        assert_eq!(
            solution.steps.iter().map(|step| step.change).collect::<Vec<_>>(),
            vec![
                EquationChange::SubtractFromBothSides,
                EquationChange::SimplifyRhs,
                EquationChange::DivideBothSides,
                EquationChange::SimplifyRhs,
            ],
        );
        for pair in solution.steps.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn unknown_on_the_right() {
        let solution = solve_for_x("5 = x + 2");
        assert!(solution.solved);
        assert_eq!(solution.steps[0].change, EquationChange::SwapSides);
        assert_eq!(solution.rhs.to_string(), "3");
    }

    #[test]
    fn quotient() {
        let solution = solve_for_x("x / 4 = 2");
        assert!(solution.solved);
        assert_eq!(solution.steps[0].change, EquationChange::MultiplyBothSides);
        assert_eq!(solution.rhs.to_string(), "8");
    }

    #[test]
    fn already_solved() {
        let solution = solve_for_x("x = 3");
        assert!(solution.solved);
        assert!(solution.steps.is_empty());
    }

    #[test]
    fn nothing_to_solve() {
        let solution = solve_for_x("y = 3");
        assert!(!solution.solved);
        assert!(solution.steps.is_empty());
    }

    #[test]
    fn zero_coefficient_is_not_divided() {
        assert!(blocked(EquationChange::DivideBothSides, &Bindings::from([
            ("a1".to_string(), Node::constant(0)),
        ])));
        assert!(!blocked(EquationChange::DivideBothSides, &Bindings::from([
            ("a1".to_string(), Node::constant(2)),
        ])));
    }
}
