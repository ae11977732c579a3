//! Assessment of steps between equations.
//!
//! A step between equations is first sorted into one of five cases by checking which sides
//! changed: neither, both swapped, only the left side, only the right side, or both. Only the
//! last case needs more than single-expression assessment. There, each side is classified on its
//! own as simplified, having had one of its own terms or factors removed, having had an operation
//! added, or unknown; the pair of classifications then decides whether the user performed the same
//! operation on both sides.
//!
//! Only a removal from one side paired with the same operation added to the other side is
//! correct. Removals from both sides, additions to both sides, or a change to one side only are
//! each reported with their own [`EquationError`].
//!
//! When several operations could explain a side, the first one found is used, so steps that move
//! several terms at once may be reported as [`EquationError::NotSameOpPerformed`] even when they
//! are correct.

use cas_error::Error;
use crate::{
    error::NotAnEquation,
    node::Node,
    rules::{EquationChange, EquationError},
    session::Session,
    terms::{numerators, operations_with, removal_operations, terms, Operation},
};
use super::{assess, StepInfo};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The classification of a step between two equations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquationStepInfo {
    pub left: Vec<StepInfo>,
    pub right: Vec<StepInfo>,
    pub attempted_equation_change_type: EquationChange,
    pub equation_error_type: Option<EquationError>,
}

/// How one side of an equation changed.
#[derive(Debug, Clone, PartialEq)]
enum SideChange {
    /// The side was simplified, keeping its answer.
    Simplified,

    /// One of the side's own terms or factors was removed.
    Removed(Operation),

    /// An operation was performed on the side.
    Added(Operation),

    Unknown,
}

/// Splits an equation into the text of its sides.
fn split(equation: &str) -> Result<(&str, &str), Error> {
    match equation.split_once('=') {
        Some((lhs, rhs)) if !rhs.contains('=') => Ok((lhs.trim(), rhs.trim())),
        _ => Err(Error::spanless(NotAnEquation)),
    }
}

/// Returns true if the operation performed on `before` gives an expression with the same answer as
/// `after`.
fn explains(session: &mut Session, before: &Node, operation: &Operation, after: &str) -> Result<bool, Error> {
    let performed = operation.apply(before).to_string();
    let performed = session.answer(&performed)?;
    let after = session.answer(after)?;
    Ok(session.are_equal(&performed, &after))
}

/// Classifies the change of one side, given the side of the equation before the step.
fn classify(session: &mut Session, before: &Node, after: &str, other: &Node) -> Result<SideChange, Error> {
    let answer = session.answer(&before.to_string())?;
    let after_answer = session.answer(after)?;
    if session.are_equal(&answer, &after_answer) {
        return Ok(SideChange::Simplified);
    }

    for operation in removal_operations(before) {
        if explains(session, before, &operation, after)? {
            return Ok(SideChange::Removed(operation));
        }
    }

    // removing a term from the other side means adding it to this one
    let mut candidates = removal_operations(other);
    let mut known = terms(other);
    known.extend(terms(before));
    known.extend(numerators(other));
    candidates.extend(operations_with(&known));
    for operation in candidates {
        if explains(session, before, &operation, after)? {
            return Ok(SideChange::Added(operation));
        }
    }

    Ok(SideChange::Unknown)
}

/// Returns true if the two operations are the same.
fn same_operation(session: &mut Session, a: &Operation, b: &Operation) -> bool {
    a.op == b.op && session.are_equal(&a.operand.to_string(), &b.operand.to_string())
}

/// Decides what the user attempted from the changes of both sides.
fn pair(
    session: &mut Session,
    left: &SideChange,
    right: &SideChange,
) -> (EquationChange, Option<EquationError>) {
    use SideChange::*;

    // a term moves across the equals sign by being removed from one side and added to the other
    match (left, right) {
        (Simplified, Simplified) => (EquationChange::SimplifyBoth, None),
        (Removed(a), Added(b)) | (Added(a), Removed(b)) => {
            if same_operation(session, a, b) {
                (EquationChange::SameOperationBothSides, None)
            } else {
                (EquationChange::Unknown, Some(EquationError::NotSameOpPerformed))
            }
        },
        (Added(_), Added(_)) => (EquationChange::Unknown, Some(EquationError::PlacedBothSides)),
        (Removed(_), Removed(_)) => {
            (EquationChange::Unknown, Some(EquationError::AttemptedRemovalBothSides))
        },
        (Removed(_), Simplified | Unknown) => {
            (EquationChange::Unknown, Some(EquationError::RemovedFromLhsOnly))
        },
        (Simplified | Unknown, Removed(_)) => {
            (EquationChange::Unknown, Some(EquationError::RemovedFromRhsOnly))
        },
        (Added(_), Simplified | Unknown) => {
            (EquationChange::Unknown, Some(EquationError::AddedToLhsOnly))
        },
        (Simplified | Unknown, Added(_)) => {
            (EquationChange::Unknown, Some(EquationError::AddedToRhsOnly))
        },
        (Simplified | Unknown, Simplified | Unknown) => (EquationChange::Unknown, None),
    }
}

/// Assesses one side after it was classified. If an operation was removed or added, the step is
/// assessed from the side with the operation performed, and each step is tagged with it.
fn assess_side(
    session: &mut Session,
    before: &str,
    before_node: &Node,
    after: &str,
    change: &SideChange,
) -> Result<Vec<StepInfo>, Error> {
    let (operation, removed) = match change {
        SideChange::Removed(operation) => (operation, true),
        SideChange::Added(operation) => (operation, false),
        _ => {
            let answer = session.answer(before)?;
            return assess(session, before, after, &answer);
        },
    };

    let performed = operation.apply(before_node).to_string();
    let answer = session.answer(&performed)?;
    let mut infos = assess(session, &performed, after, &answer)?;
    for info in &mut infos {
        if removed {
            info.removed_num_op = Some(operation.num_op());
        } else {
            info.added_num_op = Some(operation.num_op());
        }
    }
    Ok(infos)
}

/// Classifies the step from one equation to another.
pub fn assess_equation(session: &mut Session, from: &str, to: &str) -> Result<EquationStepInfo, Error> {
    let (from_lhs, from_rhs) = split(from)?;
    let (to_lhs, to_rhs) = split(to)?;
    let lhs = session.parse(from_lhs)?;
    let rhs = session.parse(from_rhs)?;
    session.parse(to_lhs)?;
    session.parse(to_rhs)?;

    let lhs_same = session.are_equal(from_lhs, to_lhs);
    let rhs_same = session.are_equal(from_rhs, to_rhs);
    let unchanged = |from: &str, to: &str| vec![StepInfo::no_change(from, to)];

    if lhs_same && rhs_same {
        return Ok(EquationStepInfo {
            left: unchanged(from_lhs, to_lhs),
            right: unchanged(from_rhs, to_rhs),
            attempted_equation_change_type: EquationChange::NoChange,
            equation_error_type: None,
        });
    }

    if session.are_equal(from_lhs, to_rhs) && session.are_equal(from_rhs, to_lhs) {
        return Ok(EquationStepInfo {
            left: unchanged(from_lhs, to_rhs),
            right: unchanged(from_rhs, to_lhs),
            attempted_equation_change_type: EquationChange::SwapSides,
            equation_error_type: None,
        });
    }

    if rhs_same {
        let answer = session.answer(from_lhs)?;
        return Ok(EquationStepInfo {
            left: assess(session, from_lhs, to_lhs, &answer)?,
            right: unchanged(from_rhs, to_rhs),
            attempted_equation_change_type: EquationChange::SimplifyLhs,
            equation_error_type: None,
        });
    }

    if lhs_same {
        let answer = session.answer(from_rhs)?;
        return Ok(EquationStepInfo {
            left: unchanged(from_lhs, to_lhs),
            right: assess(session, from_rhs, to_rhs, &answer)?,
            attempted_equation_change_type: EquationChange::SimplifyRhs,
            equation_error_type: None,
        });
    }

    let left_change = classify(session, &lhs, to_lhs, &rhs)?;
    let right_change = classify(session, &rhs, to_rhs, &lhs)?;
    let (change, error) = pair(session, &left_change, &right_change);

    Ok(EquationStepInfo {
        left: assess_side(session, from_lhs, &lhs, to_lhs, &left_change)?,
        right: assess_side(session, from_rhs, &rhs, to_rhs, &right_change)?,
        attempted_equation_change_type: change,
        equation_error_type: error,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{rules::ChangeType, terms::NumOp};
    use super::*;

    fn assess_step(from: &str, to: &str) -> EquationStepInfo {
        Session::new().unwrap().assess_user_equation_step(from, to).unwrap()
    }

    #[test]
    fn not_an_equation() {
        let mut session = Session::new().unwrap();
        assert!(session.assess_user_equation_step("x + 1", "x = 1").is_err());
        assert!(session.assess_user_equation_step("x = 1 = 2", "x = 1").is_err());
    }

    #[test]
    fn unchanged_and_swapped() {
        let info = assess_step("2x = 4", "2x = 4");
        assert_eq!(info.attempted_equation_change_type, EquationChange::NoChange);

        let info = assess_step("2x = 4", "4 = 2x");
        assert_eq!(info.attempted_equation_change_type, EquationChange::SwapSides);
        assert!(info.left[0].is_valid && info.right[0].is_valid);
    }

    #[test]
    fn one_side() {
        let info = assess_step("x = 2 + 3", "x = 5");
        assert_eq!(info.attempted_equation_change_type, EquationChange::SimplifyRhs);
        assert_eq!(info.right[0].attempted_change_type, ChangeType::SimplifyArithmeticAdd);
        assert!(info.right[0].is_valid);
    }

    #[test]
    fn subtract_from_both_sides() {
        let info = assess_step("2x + 3 = 5", "2x = 2");
        assert_eq!(info.attempted_equation_change_type, EquationChange::SameOperationBothSides);
        assert_eq!(info.equation_error_type, None);

        let three = Some(NumOp { op: '-', number: "3".to_string() });
        assert_eq!(info.left.len(), 2);
        assert!(info.left.iter().all(|step| step.is_valid && step.removed_num_op == three));
        assert_eq!(info.left[0].from, "2x + 3 - 3");
        assert_eq!(info.left[0].attempted_change_type, ChangeType::SimplifyArithmeticSubtract);
        assert_eq!(info.left[1].to, "2x");

        assert_eq!(info.right.len(), 1);
        assert_eq!(info.right[0].from, "5 - 3");
        assert_eq!(info.right[0].to, "2");
        assert_eq!(info.right[0].attempted_change_type, ChangeType::SimplifyArithmeticSubtract);
        assert_eq!(info.right[0].added_num_op, three);
    }

    #[test]
    fn removed_from_one_side_only() {
        let info = assess_step("2x + 3 = 5", "2x = 5 + 0");
        assert_eq!(info.equation_error_type, Some(EquationError::RemovedFromLhsOnly));
    }

    #[test]
    fn removed_from_right_side_only() {
        let info = assess_step("5 + 0 = 2x + 3", "5 = 2x");
        assert_eq!(info.attempted_equation_change_type, EquationChange::Unknown);
        assert_eq!(info.equation_error_type, Some(EquationError::RemovedFromRhsOnly));
    }

    #[test]
    fn added_to_one_side_only() {
        let info = assess_step("2x = 1 + 3", "2x + 3 = 4");
        assert_eq!(info.equation_error_type, Some(EquationError::AddedToLhsOnly));

        let info = assess_step("1 + 3 = 2x", "4 = 2x + 3");
        assert_eq!(info.equation_error_type, Some(EquationError::AddedToRhsOnly));
    }

    #[test]
    fn removed_from_both_sides() {
        let info = assess_step("x + 3 = y + 3", "x = y");
        assert_eq!(info.attempted_equation_change_type, EquationChange::Unknown);
        assert_eq!(info.equation_error_type, Some(EquationError::AttemptedRemovalBothSides));

        let three = Some(NumOp { op: '-', number: "3".to_string() });
        assert_eq!(info.left[0].removed_num_op, three);
        assert_eq!(info.right[0].removed_num_op, three);
    }

    #[test]
    fn placed_on_both_sides() {
        let info = assess_step("2x = 4", "2x + 4 = 8");
        assert_eq!(info.attempted_equation_change_type, EquationChange::Unknown);
        assert_eq!(info.equation_error_type, Some(EquationError::PlacedBothSides));
    }

    #[test]
    fn removed_with_unknown_other_side() {
        let info = assess_step("2x + 3 = 5", "2x + 3 - 3 = 5 - 2");
        assert_eq!(info.equation_error_type, Some(EquationError::RemovedFromLhsOnly));
    }

    #[test]
    fn different_operations() {
        let info = assess_step("2x + 3 = 5", "2x = 8");
        assert_eq!(info.equation_error_type, Some(EquationError::NotSameOpPerformed));
    }
}
