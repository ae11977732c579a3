//! The [`Session`], which owns the compiled rules and every cache the engine uses.
//!
//! Assessing a single user step can simplify and explore the same expressions many times over,
//! so everything that is expensive to compute is memoized for the lifetime of the session: parsed
//! trees, the next steps of each expression, the answer each expression simplifies to, and the
//! results of equality checks. Caches are keyed by the expression text with whitespace removed.
//!
//! A session is meant to be used for one grading request, or one user, at a time. The caches are
//! never evicted.

use cas_error::Error;
use crate::{
    assess::{self, equation::assess_equation, EquationStepInfo, StepInfo},
    equality::{strip_whitespace, EqualityCache},
    error::MissingUnknown,
    explore,
    node::{parse_equation, Node},
    pattern::MatchContext,
    rules::RuleSet,
    simplify::{Simplifier, Step, MAX_ITERATIONS},
    solve::{self, Solution},
};
use std::{collections::HashMap, rc::Rc};

/// Limits and settings of a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of rewrites after which simplification stops.
    pub max_iterations: usize,

    /// Length of the longest path of steps step assessment will look for.
    pub max_depth: usize,

    /// Number of expressions step assessment will visit before giving up.
    pub max_states: usize,

    /// The variable solved for when none is given to [`Session::solve`].
    pub unknown: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            max_depth: 100,
            max_states: 500,
            unknown: None,
        }
    }
}

/// Options for [`Session::simplify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Include the mistakes that could be made performing each step.
    pub mistakes: bool,

    /// Compute the result without storing anything in the session's caches.
    pub dry_run: bool,

    /// Return every step that can be taken from the expression, instead of simplifying it.
    pub all_possibilities: bool,
}

/// The result of [`Session::simplify`].
#[derive(Debug, Clone, PartialEq)]
pub struct Simplified {
    /// The simplified expression, or with [`SimplifyOptions::all_possibilities`], the expression
    /// itself.
    pub root: Node,
    pub steps: Vec<Step>,
}

/// Owns the compiled rules and the caches shared by every operation of the engine.
///
/// ```
/// use cas_steps::{Session, SimplifyOptions};
///
/// let mut session = Session::new().unwrap();
/// let simplified = session.simplify("2*x^2", SimplifyOptions::default()).unwrap();
/// assert_eq!(simplified.root.to_string(), "2x^2");
///
/// let infos = session.assess_user_step("4 + 3", "8").unwrap();
/// assert!(!infos[0].is_valid);
/// ```
pub struct Session {
    pub config: SessionConfig,
    rules: RuleSet,
    parsed: HashMap<String, Node>,
    equality: EqualityCache,
    explored: HashMap<String, Rc<Vec<Step>>>,
    answers: HashMap<String, String>,
}

impl Session {
    /// Creates a session with the standard rules and default limits.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a session with the standard rules and the given limits.
    pub fn with_config(config: SessionConfig) -> Result<Self, Error> {
        Ok(Self {
            config,
            rules: RuleSet::standard()?,
            parsed: HashMap::new(),
            equality: EqualityCache::default(),
            explored: HashMap::new(),
            answers: HashMap::new(),
        })
    }

    /// Returns the compiled rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn parse_uncached(&self, text: &str) -> Result<Node, Error> {
        match self.parsed.get(&strip_whitespace(text)) {
            Some(node) => Ok(node.clone()),
            None => Ok(text.parse::<Node>()?.normalize()),
        }
    }

    /// Parses and normalizes the expression.
    pub fn parse(&mut self, text: &str) -> Result<Node, Error> {
        let key = strip_whitespace(text);
        if let Some(node) = self.parsed.get(&key) {
            return Ok(node.clone());
        }
        let node = text.parse::<Node>()?.normalize();
        self.parsed.insert(key, node.clone());
        Ok(node)
    }

    /// Returns the canonical key of the expression, or [`None`] if it cannot be parsed. Two
    /// expressions are equal exactly when their keys are.
    pub fn canonical_key(&mut self, text: &str) -> Option<String> {
        self.equality.canonical_key(text)
    }

    /// Returns true if the two expressions are the same, up to presentation.
    pub fn are_equal(&mut self, a: &str, b: &str) -> bool {
        self.equality.are_equal(a, b)
    }

    fn simplifier(&self) -> Simplifier<'_> {
        Simplifier::new(&self.rules)
            .context(MatchContext { unknown: self.config.unknown.as_deref() })
            .max_iterations(self.config.max_iterations)
    }

    /// Simplifies the expression, returning the result and the step trace.
    pub fn simplify(&mut self, text: &str, options: SimplifyOptions) -> Result<Simplified, Error> {
        if options.all_possibilities {
            let root = self.parse_uncached(text)?;
            let steps = if options.dry_run {
                let ctx = MatchContext { unknown: self.config.unknown.as_deref() };
                explore::next_steps(&root, &self.rules, &ctx)?
            } else {
                (*self.next_steps(text)?).clone()
            };
            return Ok(Simplified { root, steps });
        }

        let root = if options.dry_run { self.parse_uncached(text)? } else { self.parse(text)? };
        let mut steps = Vec::new();
        let root = self.simplifier()
            .with_mistakes(options.mistakes)
            .run(root, &mut steps)?;
        if !options.dry_run {
            self.answers.insert(strip_whitespace(text), root.to_string());
        }

        Ok(Simplified { root, steps })
    }

    /// Returns every distinct step that can be taken from the expression.
    pub fn next_steps(&mut self, text: &str) -> Result<Rc<Vec<Step>>, Error> {
        let key = strip_whitespace(text);
        if let Some(steps) = self.explored.get(&key) {
            return Ok(Rc::clone(steps));
        }

        let root = self.parse(text)?;
        let ctx = MatchContext { unknown: self.config.unknown.as_deref() };
        let steps = Rc::new(explore::next_steps(&root, &self.rules, &ctx)?);
        self.explored.insert(key, Rc::clone(&steps));
        Ok(steps)
    }

    /// Returns the simplified form of the expression, as text.
    pub fn answer(&mut self, text: &str) -> Result<String, Error> {
        let key = strip_whitespace(text);
        if let Some(answer) = self.answers.get(&key) {
            return Ok(answer.clone());
        }

        let root = self.parse(text)?;
        let answer = self.simplifier().run(root, &mut ())?.to_string();
        self.answers.insert(key, answer.clone());
        Ok(answer)
    }

    /// Classifies the step a user made from one expression to another.
    pub fn assess_user_step(&mut self, from: &str, to: &str) -> Result<Vec<StepInfo>, Error> {
        let answer = self.answer(from)?;
        assess::assess(self, from, to, &answer)
    }

    /// Classifies every step of a sequence of expressions submitted by a user, each against the
    /// answer of the first expression.
    pub fn assess_user_steps(&mut self, expressions: &[&str]) -> Result<Vec<Vec<StepInfo>>, Error> {
        let Some(first) = expressions.first() else {
            return Ok(Vec::new());
        };
        let answer = self.answer(first)?;
        expressions.windows(2)
            .map(|pair| assess::assess(self, pair[0], pair[1], &answer))
            .collect()
    }

    /// Classifies the step a user made from one equation to another.
    pub fn assess_user_equation_step(&mut self, from: &str, to: &str) -> Result<EquationStepInfo, Error> {
        assess_equation(self, from, to)
    }

    /// Solves the equation for the unknown. If no unknown is given, the one in the session's
    /// configuration is used.
    pub fn solve(&mut self, equation: &str, unknown: Option<&str>) -> Result<Solution, Error> {
        let unknown = unknown
            .or(self.config.unknown.as_deref())
            .ok_or_else(|| Error::spanless(MissingUnknown))?;
        let (lhs, rhs) = parse_equation(equation)?;
        solve::solve(&self.rules, lhs.normalize(), rhs.normalize(), unknown, self.config.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::rules::{ChangeType, MistakeType};
    use super::*;

    fn session() -> Session {
        Session::new().unwrap()
    }

    fn simplified(session: &mut Session, text: &str) -> String {
        session.simplify(text, SimplifyOptions::default()).unwrap().root.to_string()
    }

    #[test]
    fn simplify_scenarios() {
        let mut session = session();
        assert_eq!(simplified(&mut session, "2*x^2"), "2x^2");
        assert_eq!(simplified(&mut session, "x/1"), "x");
    }

    #[test]
    fn simplify_is_idempotent() {
        let mut session = session();
        for text in ["2x + 3x", "4 * 3 + x", "(x + 1)^2", "6 / 4"] {
            let once = simplified(&mut session, text);
            assert_eq!(simplified(&mut session, &once), once, "{}", text);
        }
    }

    #[test]
    fn answers_match_simplification() {
        let mut session = session();
        let answer = session.answer("2 * 3 + x").unwrap();
        assert_eq!(answer, simplified(&mut session, "2 * 3 + x"));
        assert_eq!(session.answer("2*3+x").unwrap(), answer);
    }

    #[test]
    fn dry_run_leaves_caches_alone() {
        let mut session = session();
        let options = SimplifyOptions { dry_run: true, ..Default::default() };
        let result = session.simplify("1 + 2", options).unwrap();
        assert_eq!(result.root.to_string(), "3");
        assert!(session.answers.is_empty());
        assert!(session.parsed.is_empty());

        let options = SimplifyOptions { all_possibilities: true, dry_run: true, ..Default::default() };
        session.simplify("1 + 2", options).unwrap();
        assert!(session.explored.is_empty());
    }

    #[test]
    fn all_possibilities() {
        let mut session = session();
        let options = SimplifyOptions { all_possibilities: true, ..Default::default() };
        let result = session.simplify("1 + 2 + 3", options).unwrap();
        assert_eq!(result.root.to_string(), "1 + 2 + 3");
        assert!(result.steps.iter().any(|step| step.to == "3 + 3"));
        assert!(result.steps.iter().any(|step| step.to == "1 + 5"));
    }

    #[test]
    fn mistakes_option() {
        let mut session = session();
        let options = SimplifyOptions { mistakes: true, ..Default::default() };
        let result = session.simplify("4 + 3", options).unwrap();
        assert!(result.steps[1].mistakes.iter().any(|m| m.kind == MistakeType::AddedOneTooMany));
    }

    #[test]
    fn step_scenarios() {
        let mut session = session();
        let infos = session.assess_user_step("4 + 3", "8").unwrap();
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].is_valid);
        assert_eq!(infos[0].attempted_to_get_to.as_deref(), Some("7"));
        assert_eq!(infos[0].mistaken_change_type, Some(MistakeType::AddedOneTooMany));

        let infos = session.assess_user_step("5 + 5", "10").unwrap();
        assert_eq!(infos.len(), 1);
        assert!(infos[0].is_valid);
        assert_eq!(infos[0].attempted_change_type, ChangeType::SimplifyArithmeticAdd);
    }

    #[test]
    fn no_change_on_self() {
        let mut session = session();
        for text in ["x", "2x + 3", "4 + 3", "foo(x)"] {
            let infos = session.assess_user_step(text, text).unwrap();
            assert_eq!(infos.len(), 1);
            assert_eq!(infos[0].attempted_change_type, ChangeType::NoChange);
        }
    }

    #[test]
    fn unsupported_functions_have_no_steps() {
        let mut session = session();
        let options = SimplifyOptions { all_possibilities: true, ..Default::default() };
        assert!(session.simplify("foo(1 + 2)", options).unwrap().steps.is_empty());

        let infos = session.assess_user_step("foo(1 + 2)", "foo(3)").unwrap();
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].is_valid);
        assert_eq!(infos[0].attempted_change_type, ChangeType::Unknown);
    }

    #[test]
    fn search_runs_out_of_states() {
        let config = SessionConfig { max_states: 1, ..Default::default() };
        let mut session = Session::with_config(config).unwrap();
        let infos = session.assess_user_step("2 * 3 + 4", "10").unwrap();
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].is_valid);
        assert!(infos[0].reaches_original_answer);
        assert_eq!(infos[0].attempted_change_type, ChangeType::Unknown);
        assert_eq!(infos[0].mistaken_change_type, None);

        assert!(session.assess_user_step("6 + 4", "10").unwrap()[0].is_valid);
    }

    #[test]
    fn search_runs_out_of_depth() {
        let config = SessionConfig { max_depth: 1, ..Default::default() };
        let mut session = Session::with_config(config).unwrap();
        let infos = session.assess_user_step("2 * 3 + 4", "10").unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].attempted_change_type, ChangeType::Unknown);

        assert!(session.assess_user_step("6 + 4", "10").unwrap()[0].is_valid);
    }

    #[test]
    fn several_user_steps() {
        let mut session = session();
        let infos = session.assess_user_steps(&["2 * 3 + 4", "6 + 4", "11"]).unwrap();
        assert_eq!(infos.len(), 2);
        assert!(infos[0][0].is_valid);
        assert!(infos[0][0].reaches_original_answer);
        assert!(!infos[1][0].is_valid);
        assert!(!infos[1][0].reaches_original_answer);
        assert_eq!(infos[1][0].attempted_to_get_to.as_deref(), Some("10"));

        assert!(session.assess_user_steps(&[]).unwrap().is_empty());
    }

    #[test]
    fn equation_scenario() {
        let mut session = session();
        let info = session.assess_user_equation_step("2x + 3 = 5", "2x = 2").unwrap();
        assert_eq!(info.left[0].from, "2x + 3 - 3");
        assert_eq!(info.left.last().unwrap().to, "2x");
        assert_eq!(info.right[0].from, "5 - 3");
        assert_eq!(info.right[0].to, "2");
        assert_eq!(info.right[0].attempted_change_type, ChangeType::SimplifyArithmeticSubtract);
    }

    #[test]
    fn equality_scenario() {
        let mut session = session();
        assert!(session.are_equal("8 + 4 * (2/4)", "8+4*2/4"));
        assert!(session.are_equal("8+4*2/4", "8 + 4 * (2/4)"));
    }

    #[test]
    fn solve_with_configured_unknown() {
        let mut session = session();
        assert!(session.solve("2x + 3 = 5", None).is_err());

        let solution = session.solve("2x + 3 = 5", Some("x")).unwrap();
        assert_eq!(solution.rhs.to_string(), "1");

        session.config.unknown = Some("y".to_string());
        let solution = session.solve("y - 4 = 1", None).unwrap();
        assert!(solution.solved);
        assert_eq!(solution.rhs.to_string(), "5");
    }
}
