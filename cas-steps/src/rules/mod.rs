//! Rewrite rules and the tables that define them.
//!
//! A rule is written as data: the text of its left-hand pattern, and either the text of its
//! right-hand pattern (a **structural** rule) or a function that computes the replacement from
//! the matched node and its bindings (a **computed** rule). Rules can also carry **mistakes**,
//! functions computing a plausible but wrong replacement, which are used to classify incorrect
//! steps submitted by users.
//!
//! The tables in this module are compiled into a [`RuleSet`] once per [`Session`]. The order of
//! the groups in [`GROUPS`], and of the rules within each group, decides which rewrite the
//! simplifier performs first, so it must not be changed lightly.
//!
//! [`Session`]: crate::Session

pub mod apply;
pub mod arithmetic;
pub mod cancel;
pub mod change;
pub mod decimal;
pub mod distribute;
pub mod function;
pub mod identity;
pub mod like_terms;
pub mod log;
pub mod root;

use cas_error::Error;
use crate::{
    error::MalformedRule,
    node::{Node, Op},
    pattern::{Bindings, Pattern},
};
use rug::{Integer, Rational};
use std::collections::HashMap;

pub use apply::{apply, apply_all, Application};
pub use change::{ChangeType, EquationChange, EquationError, MistakeType};

/// Computes the replacement for a match. Returns [`None`] if the rule does not apply after all,
/// for example because a constant is out of range.
pub type Builder = fn(&Node, &Bindings) -> Option<Node>;

/// The right-hand side of a rule, as written in a table.
#[derive(Clone, Copy)]
pub enum BodyDef {
    Rhs(&'static str),
    Computed(Builder),
}

/// A mistake, as written in a table.
#[derive(Clone, Copy)]
pub struct MistakeDef {
    pub kind: MistakeType,
    pub build: Builder,
}

/// A rule, as written in a table.
#[derive(Clone, Copy)]
pub struct RuleDef {
    pub change: ChangeType,
    pub lhs: &'static str,
    pub body: BodyDef,
    pub mistakes: &'static [MistakeDef],
}

impl RuleDef {
    /// A rule that replaces the left-hand pattern with the right-hand pattern.
    pub const fn structural(change: ChangeType, lhs: &'static str, rhs: &'static str) -> Self {
        Self { change, lhs, body: BodyDef::Rhs(rhs), mistakes: &[] }
    }

    /// A rule whose replacement is computed by a function.
    pub const fn computed(change: ChangeType, lhs: &'static str, build: Builder) -> Self {
        Self { change, lhs, body: BodyDef::Computed(build), mistakes: &[] }
    }

    pub const fn with_mistakes(self, mistakes: &'static [MistakeDef]) -> Self {
        Self { mistakes, ..self }
    }
}

/// A named group of rules. The simplifier tries groups one at a time.
pub struct RuleGroup {
    pub name: &'static str,
    pub rules: &'static [RuleDef],
}

/// Every rule group, in priority order.
pub const GROUPS: &[RuleGroup] = &[
    RuleGroup { name: "decimal", rules: decimal::RULES },
    RuleGroup { name: "log", rules: log::RULES },
    RuleGroup { name: "identity", rules: identity::RULES },
    RuleGroup { name: "cancel", rules: cancel::RULES },
    RuleGroup { name: "like terms", rules: like_terms::RULES },
    RuleGroup { name: "function", rules: function::RULES },
    RuleGroup { name: "distribute", rules: distribute::DISTRIBUTE },
    RuleGroup { name: "root of power", rules: root::ROOT_OF_POWER },
    RuleGroup { name: "root of constant", rules: root::ROOT_OF_CONSTANT },
    RuleGroup { name: "expand", rules: distribute::EXPAND },
    RuleGroup { name: "arithmetic", rules: arithmetic::RULES },
];

/// The replacement of a compiled rule.
#[derive(Clone)]
pub enum RuleBody {
    Structural(Pattern),
    Computed(Builder),
}

/// A compiled mistake.
#[derive(Clone)]
pub struct Mistake {
    pub kind: MistakeType,
    pub build: Builder,
}

/// A compiled rule.
#[derive(Clone)]
pub struct Rule {
    /// Unique identifier of the rule: the change type's name, followed by `__CASE_n` if another
    /// rule with the same change type was compiled before it.
    pub id: String,
    pub change: ChangeType,
    pub lhs: Pattern,

    /// Set if the left-hand pattern can also match two arguments extracted from a longer
    /// addition or multiplication.
    pub expanded: bool,
    pub body: RuleBody,
    pub mistakes: Vec<Mistake>,
}

impl Rule {
    /// Compiles a rule. `id` must be unique among the rules used together.
    pub fn compile(def: &RuleDef, id: String) -> Result<Self, Error> {
        let lhs = Pattern::compile(def.lhs)?;
        let body = match def.body {
            BodyDef::Rhs(rhs) => {
                let rhs_pattern = Pattern::compile(rhs)?;
                if !rhs_pattern.wildcards().is_subset(&lhs.wildcards()) {
                    return Err(Error::spanless(MalformedRule {
                        rule: format!("{} -> {}", def.lhs, rhs),
                    }));
                }
                RuleBody::Structural(rhs_pattern)
            },
            BodyDef::Computed(build) => RuleBody::Computed(build),
        };

        Ok(Self {
            id,
            change: def.change,
            expanded: lhs.is_associative_binary(),
            lhs,
            body,
            mistakes: def.mistakes
                .iter()
                .map(|m| Mistake { kind: m.kind, build: m.build })
                .collect(),
        })
    }

    /// Builds the replacement for a match against the given node.
    pub fn build(&self, node: &Node, bindings: &Bindings) -> Option<Node> {
        match &self.body {
            RuleBody::Structural(rhs) => rhs.substitute(bindings),
            RuleBody::Computed(build) => build(node, bindings),
        }
    }
}

/// A compiled set of rule groups.
#[derive(Clone)]
pub struct RuleSet {
    groups: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    /// Compiles the given groups, giving every rule a unique identifier.
    pub fn compile(groups: &[RuleGroup]) -> Result<Self, Error> {
        let mut seen = HashMap::<ChangeType, usize>::new();
        let groups = groups.iter()
            .map(|group| {
                let rules = group.rules
                    .iter()
                    .map(|def| {
                        let count = seen.entry(def.change).or_insert(0);
                        let id = if *count == 0 {
                            def.change.as_str().to_string()
                        } else {
                            format!("{}__CASE_{}", def.change, count)
                        };
                        *count += 1;
                        Rule::compile(def, id)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((group.name, rules))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { groups })
    }

    /// Compiles the standard rule groups.
    pub fn standard() -> Result<Self, Error> {
        Self::compile(GROUPS)
    }

    /// Returns the groups, in priority order.
    pub fn groups(&self) -> impl Iterator<Item = (&'static str, &[Rule])> + '_ {
        self.groups.iter().map(|(name, rules)| (*name, rules.as_slice()))
    }

    /// Returns every rule individually, in priority order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.groups.iter().flat_map(|(_, rules)| rules)
    }

    /// Returns the rule with the given identifier.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules().find(|rule| rule.id == id)
    }
}

/// Returns the constant bound to the wildcard.
pub(crate) fn constant<'a>(bindings: &'a Bindings, name: &str) -> Option<&'a Rational> {
    bindings.get(name)?.as_constant()
}

/// Returns the integer bound to the wildcard.
pub(crate) fn integer<'a>(bindings: &'a Bindings, name: &str) -> Option<&'a Integer> {
    bindings.get(name)?.as_integer()
}

/// Returns the node bound to the wildcard.
pub(crate) fn bound(bindings: &Bindings, name: &str) -> Option<Node> {
    bindings.get(name).cloned()
}

/// Creates a node for an exact rational value: a constant if it is an integer, and a quotient of
/// integer constants otherwise.
pub(crate) fn rational_node(value: Rational) -> Node {
    if *value.denom() == 1 {
        Node::Constant(value)
    } else {
        let (numer, denom) = value.into_numer_denom();
        Node::op(Op::Div, vec![Node::constant(numer), Node::constant(denom)])
    }
}
