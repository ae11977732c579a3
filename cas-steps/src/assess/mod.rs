//! Assessment of steps submitted by users.
//!
//! To assess a step from one expression to another, a breadth-first search is run over the steps
//! the [explorer](crate::explore) can take, starting from the first expression. Each state is
//! checked in two passes:
//!
//! 1. If a correct step leads to the user's expression, the search succeeds, and every step on the
//! path is reported as valid.
//! 2. Otherwise, if a mistake of some step leads to the user's expression, the search succeeds with
//! the final step reported as that mistake. A mistake whose expression simplifies to the same
//! answer as the correct step is not a mistake after all, and is skipped.
//!
//! States are deduplicated by their canonical form. If the search runs out of depth or of states
//! to visit, the step is reported as [`ChangeType::Unknown`]; this is an expected outcome, not an
//! error.

pub mod equation;
pub mod heuristic;

use cas_error::Error;
use crate::{
    equality::strip_whitespace,
    rules::{ChangeType, MistakeType},
    session::Session,
    simplify::Step,
    terms::NumOp,
};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use equation::EquationStepInfo;

/// The classification of one step from one expression to another.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepInfo {
    /// True if the step is correct.
    pub is_valid: bool,

    /// True if the expression after the step still simplifies to the answer of the expression the
    /// user started from.
    pub reaches_original_answer: bool,
    pub from: String,
    pub to: String,

    /// For an invalid step, what the user should have gotten.
    pub attempted_to_get_to: Option<String>,
    pub attempted_change_type: ChangeType,

    /// For an invalid step, the mistake the user made.
    pub mistaken_change_type: Option<MistakeType>,

    /// The kinds of changes that could have been made from `from`.
    pub available_change_types: Vec<ChangeType>,

    /// Set when the step is one side of an equation to which the user added an operation.
    pub added_num_op: Option<NumOp>,

    /// Set when the step is one side of an equation from which the user removed a term or factor.
    pub removed_num_op: Option<NumOp>,
}

impl StepInfo {
    /// A step that does not change the expression.
    pub fn no_change(from: &str, to: &str) -> Self {
        Self {
            is_valid: true,
            reaches_original_answer: true,
            from: from.to_string(),
            to: to.to_string(),
            attempted_to_get_to: None,
            attempted_change_type: ChangeType::NoChange,
            mistaken_change_type: None,
            available_change_types: Vec::new(),
            added_num_op: None,
            removed_num_op: None,
        }
    }
}

/// One step along a search path.
#[derive(Debug, Clone)]
struct Hop {
    step: Step,

    /// The kinds of changes that could have been made instead.
    available: Vec<ChangeType>,
}

/// A successful search.
struct Found {
    path: Vec<Hop>,

    /// Set if the last hop was made by mistake.
    mistake: Option<MistakeType>,
}

/// Returns the distinct change types of the candidate steps.
fn change_types(candidates: &[Step]) -> Vec<ChangeType> {
    let mut types = Vec::new();
    for candidate in candidates {
        if !types.contains(&candidate.change) {
            types.push(candidate.change);
        }
    }
    types
}

fn extended(path: &[Hop], step: &Step, available: &[ChangeType]) -> Vec<Hop> {
    let mut path = path.to_vec();
    path.push(Hop { step: step.clone(), available: available.to_vec() });
    path
}

/// Searches for a path of steps from one expression to the other.
fn search(session: &mut Session, from: &str, to: &str) -> Result<Option<Found>, Error> {
    let key = |session: &mut Session, text: &str| {
        session.canonical_key(text).unwrap_or_else(|| strip_whitespace(text))
    };

    let mut visited = HashSet::from([key(session, from)]);
    let mut queue = VecDeque::from([(from.to_string(), Vec::<Hop>::new())]);
    let mut states = 0;

    while let Some((current, path)) = queue.pop_front() {
        states += 1;
        if states > session.config.max_states {
            debug!(from, to, states, "step search ran out of states");
            break;
        }

        let candidates = session.next_steps(&current)?;
        let available = change_types(&candidates);

        for candidate in candidates.iter() {
            if session.are_equal(&candidate.to, to) {
                return Ok(Some(Found { path: extended(&path, candidate, &available), mistake: None }));
            }
        }

        for candidate in candidates.iter() {
            for mistake in &candidate.mistakes {
                if !session.are_equal(&mistake.to, to) {
                    continue;
                }

                let wrong = session.answer(&mistake.to)?;
                let right = session.answer(&candidate.to)?;
                if session.are_equal(&wrong, &right) {
                    continue;
                }

                return Ok(Some(Found {
                    path: extended(&path, candidate, &available),
                    mistake: Some(mistake.kind),
                }));
            }
        }

        if path.len() + 1 >= session.config.max_depth {
            continue;
        }
        for candidate in candidates.iter() {
            if visited.insert(key(session, &candidate.to)) {
                queue.push_back((candidate.to.clone(), extended(&path, candidate, &available)));
            }
        }
        debug!(depth = path.len(), queued = queue.len(), "searched state");
    }

    Ok(None)
}

/// Returns true if the expression simplifies to the given answer.
fn reaches(session: &mut Session, expression: &str, answer: &str) -> Result<bool, Error> {
    let reached = session.answer(expression)?;
    Ok(session.are_equal(&reached, answer))
}

/// Turns a successful search into step classifications. The last step ends at the user's
/// expression, as written by the user.
fn describe(session: &mut Session, found: Found, to: &str, answer: &str) -> Result<Vec<StepInfo>, Error> {
    let last = found.path.len().saturating_sub(1);
    let mut infos = Vec::with_capacity(found.path.len());

    for (i, hop) in found.path.into_iter().enumerate() {
        let mut info = StepInfo {
            is_valid: true,
            reaches_original_answer: false,
            from: hop.step.from,
            to: hop.step.to,
            attempted_to_get_to: None,
            attempted_change_type: hop.step.change,
            mistaken_change_type: None,
            available_change_types: hop.available,
            added_num_op: None,
            removed_num_op: None,
        };

        if i == last {
            let correct = std::mem::replace(&mut info.to, to.to_string());
            if let Some(kind) = found.mistake {
                info.is_valid = false;
                info.attempted_to_get_to = Some(correct);
                info.mistaken_change_type = Some(kind);
            }
        }

        info.reaches_original_answer = reaches(session, &info.to, answer)?;
        infos.push(info);
    }

    Ok(infos)
}

/// Classifies a step for which no path was found.
fn unknown(session: &mut Session, from: &str, to: &str, answer: &str) -> Result<StepInfo, Error> {
    let reaches_original_answer = reaches(session, to, answer)?;
    let available = change_types(&session.next_steps(from)?);
    Ok(StepInfo {
        is_valid: false,
        reaches_original_answer,
        from: from.to_string(),
        to: to.to_string(),
        attempted_to_get_to: None,
        attempted_change_type: ChangeType::Unknown,
        mistaken_change_type: (!reaches_original_answer).then_some(MistakeType::Unknown),
        available_change_types: available,
        added_num_op: None,
        removed_num_op: None,
    })
}

/// Classifies the step from one expression to another. `answer` is the answer of the expression
/// the user started from, used to tell whether each step still leads to it.
pub fn assess(session: &mut Session, from: &str, to: &str, answer: &str) -> Result<Vec<StepInfo>, Error> {
    session.parse(from)?;
    session.parse(to)?;
    if session.are_equal(from, to) {
        return Ok(vec![StepInfo::no_change(from, to)]);
    }

    let mut infos = match search(session, from, to)? {
        Some(found) => describe(session, found, to, answer)?,
        None => vec![unknown(session, from, to, answer)?],
    };
    for info in &mut infos {
        heuristic::relabel_subtraction(info);
    }

    Ok(infos)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn assess_step(from: &str, to: &str) -> Vec<StepInfo> {
        Session::new().unwrap().assess_user_step(from, to).unwrap()
    }

    #[test]
    fn unchanged() {
        let infos = assess_step("x + 1", "1 + x");
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].attempted_change_type, ChangeType::NoChange);
        assert!(infos[0].is_valid);
    }

    #[test]
    fn valid_step() {
        let infos = assess_step("5 + 5", "10");
        assert_eq!(infos.len(), 1);
        assert!(infos[0].is_valid);
        assert!(infos[0].reaches_original_answer);
        assert_eq!(infos[0].attempted_change_type, ChangeType::SimplifyArithmeticAdd);
        assert_eq!(infos[0].mistaken_change_type, None);
    }

    #[test]
    fn mistake() {
        let infos = assess_step("4 + 3", "8");
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].is_valid);
        assert!(!infos[0].reaches_original_answer);
        assert_eq!(infos[0].to, "8");
        assert_eq!(infos[0].attempted_to_get_to.as_deref(), Some("7"));
        assert_eq!(infos[0].attempted_change_type, ChangeType::SimplifyArithmeticAdd);
        assert_eq!(infos[0].mistaken_change_type, Some(MistakeType::AddedOneTooMany));
    }

    #[test]
    fn subtraction() {
        let infos = assess_step("5 - 3", "2");
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].attempted_change_type, ChangeType::SimplifyArithmeticSubtract);
    }

    #[test]
    fn several_steps_at_once() {
        let infos = assess_step("2 * 3 + 4", "10");
        assert_eq!(infos.len(), 2);
        assert!(infos.iter().all(|info| info.is_valid));
        assert_eq!(infos[0].attempted_change_type, ChangeType::SimplifyArithmeticMultiply);
        assert_eq!(infos[1].to, "10");
    }

    #[test]
    fn deterministic_mistakes() {
        let first = assess_step("4 * 3", "7");
        let second = assess_step("4 * 3", "7");
        assert_eq!(first, second);
        assert_eq!(first[0].mistaken_change_type, Some(MistakeType::AddedInsteadOfMultiplied));
    }
}
