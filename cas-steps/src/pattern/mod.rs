//! Patterns describing the left- and right-hand sides of rewrite rules.
//!
//! A pattern is written as an ordinary expression, in which some symbols are **wildcards** that
//! stand for a subtree. The kind of subtree a wildcard accepts is decided once, when the pattern
//! is compiled, from the wildcard's name:
//!
//! | name             | binds to                                           |
//! | ---------------- | -------------------------------------------------- |
//! | `n1`, `n2`, ..   | any node                                           |
//! | `c1`, `c2`, ..   | a constant                                         |
//! | `-c1`, `-c2`, .. | a negative constant; the bound value is its magnitude |
//! | `v1`, `v2`, ..   | any node that is not a constant                    |
//! | `x`              | exactly the unknown variable (equation mode)        |
//! | `a1`, `a2`, ..   | a node that does not contain the unknown (equation mode) |
//! | `fx1`, `fx2`, .. | a node that contains the unknown (equation mode)   |
//!
//! Any other symbol, constant, member access (`const.pi`) or function name must match literally.

pub mod matcher;

use cas_error::Error;
use crate::{
    error::MalformedRule,
    node::{Node, Op},
};
use rug::Rational;
use std::collections::{BTreeMap, BTreeSet};

pub use matcher::{match_pattern, merge, Match, MatchContext};

/// The values bound to the wildcards of a pattern by a successful match.
pub type Bindings = BTreeMap<String, Node>;

/// The kind of subtree a wildcard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardKind {
    AnyNode,

    /// A constant. If `negative` is set, only negative constants match, and the wildcard is bound
    /// to the constant's magnitude.
    ConstantOnly { negative: bool },

    NonConstant,

    /// Exactly the unknown variable.
    Unknown,

    /// A subtree that does not contain the unknown variable.
    ExcludesUnknown,

    /// A subtree that contains the unknown variable.
    ContainsUnknown,
}

impl WildcardKind {
    /// Determines the kind of wildcard a symbol in a pattern represents, or returns [`None`] if
    /// the symbol must match literally.
    pub fn classify(name: &str) -> Option<Self> {
        if name == "x" {
            return Some(WildcardKind::Unknown);
        }

        let (kind, index) = match name.strip_prefix("fx") {
            Some(index) => (WildcardKind::ContainsUnknown, index),
            None => {
                let mut chars = name.chars();
                let kind = match chars.next()? {
                    'n' => WildcardKind::AnyNode,
                    'c' => WildcardKind::ConstantOnly { negative: false },
                    'v' => WildcardKind::NonConstant,
                    'a' => WildcardKind::ExcludesUnknown,
                    _ => return None,
                };
                (kind, chars.as_str())
            },
        };

        if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
            Some(kind)
        } else {
            None
        }
    }

    /// Returns true if this wildcard can only be matched when an unknown variable is set.
    pub fn needs_unknown(self) -> bool {
        matches!(
            self,
            WildcardKind::Unknown | WildcardKind::ExcludesUnknown | WildcardKind::ContainsUnknown,
        )
    }
}

/// A compiled pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Wildcard {
        name: String,
        kind: WildcardKind,
    },
    Constant(Rational),
    Symbol(String),
    Accessor {
        object: String,
        index: String,
    },
    Operator {
        op: Op,
        args: Vec<Pattern>,
    },
    Function {
        name: String,
        args: Vec<Pattern>,
    },
}

impl Pattern {
    /// Compiles the pattern from its text.
    ///
    /// Patterns are not flattened, so `n1 + n2 + n3` is an addition whose first argument is
    /// another addition.
    pub fn compile(text: &str) -> Result<Self, Error> {
        text.parse::<Node>()
            .map(Pattern::from)
            .map_err(|_| Error::spanless(MalformedRule { rule: text.to_string() }))
    }

    /// Returns the names of every wildcard in the pattern.
    pub fn wildcards(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_wildcards(&mut names);
        names
    }

    fn collect_wildcards<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Pattern::Wildcard { name, .. } => {
                names.insert(name);
            },
            Pattern::Operator { args, .. } | Pattern::Function { args, .. } => {
                for arg in args {
                    arg.collect_wildcards(names);
                }
            },
            _ => {},
        }
    }

    /// Returns true if the pattern contains an equation-mode wildcard.
    pub fn needs_unknown(&self) -> bool {
        match self {
            Pattern::Wildcard { kind, .. } => kind.needs_unknown(),
            Pattern::Operator { args, .. } | Pattern::Function { args, .. } => {
                args.iter().any(Pattern::needs_unknown)
            },
            _ => false,
        }
    }

    /// Returns true if the pattern is a binary application of an associative operator, which can
    /// also match a pair of arguments extracted from a longer operator node.
    pub fn is_associative_binary(&self) -> bool {
        matches!(self, Pattern::Operator { op, args } if op.is_associative() && args.len() == 2)
    }

    /// Builds a node from the pattern by replacing every wildcard with its bound value. Returns
    /// [`None`] if a wildcard is unbound.
    pub fn substitute(&self, bindings: &Bindings) -> Option<Node> {
        Some(match self {
            Pattern::Wildcard { name, kind: WildcardKind::ConstantOnly { negative: true } } => {
                bindings.get(name)?.clone().negated()
            },
            Pattern::Wildcard { name, .. } => bindings.get(name)?.clone(),
            Pattern::Constant(value) => Node::Constant(value.clone()),
            Pattern::Symbol(name) => Node::Symbol(name.clone()),
            Pattern::Accessor { object, index } => Node::Accessor {
                object: object.clone(),
                index: index.clone(),
            },
            Pattern::Operator { op, args } => Node::op(
                *op,
                args.iter().map(|arg| arg.substitute(bindings)).collect::<Option<_>>()?,
            ),
            Pattern::Function { name, args } => Node::function(
                name.clone(),
                args.iter().map(|arg| arg.substitute(bindings)).collect::<Option<_>>()?,
            ),
        })
    }
}

impl From<Node> for Pattern {
    fn from(node: Node) -> Self {
        match node {
            Node::Constant(value) => Pattern::Constant(value),
            Node::Symbol(name) => match WildcardKind::classify(&name) {
                Some(kind) => Pattern::Wildcard { name, kind },
                None => Pattern::Symbol(name),
            },
            Node::Accessor { object, index } => Pattern::Accessor { object, index },
            Node::Operator { op: Op::Neg, args, .. } => match <[Node; 1]>::try_from(args) {
                Ok([operand]) => match Pattern::from(operand) {
                    Pattern::Constant(value) => Pattern::Constant(-value),
                    Pattern::Wildcard { name, kind: WildcardKind::ConstantOnly { negative } } => {
                        Pattern::Wildcard {
                            name,
                            kind: WildcardKind::ConstantOnly { negative: !negative },
                        }
                    },
                    operand => Pattern::Operator { op: Op::Neg, args: vec![operand] },
                },
                Err(args) => Pattern::Operator {
                    op: Op::Neg,
                    args: args.into_iter().map(Pattern::from).collect(),
                },
            },
            Node::Operator { op, args, .. } => Pattern::Operator {
                op,
                args: args.into_iter().map(Pattern::from).collect(),
            },
            Node::Function { name, args } => Pattern::Function {
                name,
                args: args.into_iter().map(Pattern::from).collect(),
            },
        }
    }
}
