//! Matching of [`Pattern`]s against [`Node`]s.
//!
//! Matching a pattern against a node produces every distinct set of [`Bindings`] under which the
//! pattern equals the node. There can be more than one: the binary pattern `n1 + n2` matches the
//! flattened node `a + b + c` by splitting it into one argument and the rest, in each of the
//! possible ways.

use cas_error::Error;
use crate::{
    error::MissingUnknown,
    node::{Node, Op},
};
use super::{Bindings, Pattern, WildcardKind};

/// The context in which a pattern is matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    /// The unknown variable of equation mode. Required by the `x`, `a*` and `fx*` wildcards.
    pub unknown: Option<&'a str>,
}

impl<'a> MatchContext<'a> {
    /// Creates a context for solving for the given unknown.
    pub fn with_unknown(unknown: &'a str) -> Self {
        Self { unknown: Some(unknown) }
    }
}

/// A successful match of a rule's pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The values bound to the pattern's wildcards.
    pub bindings: Bindings,

    /// If the pattern only matched two arguments `(i, j)` extracted from a longer operator node,
    /// the indices of those arguments.
    pub extraction: Option<(usize, usize)>,
}

/// Matches the pattern against the node, returning every distinct set of bindings.
///
/// Returns an error if the pattern uses an equation-mode wildcard and no unknown is set.
pub fn match_pattern(
    pattern: &Pattern,
    node: &Node,
    ctx: &MatchContext,
) -> Result<Vec<Bindings>, Error> {
    if ctx.unknown.is_none() && pattern.needs_unknown() {
        return Err(Error::spanless(MissingUnknown));
    }
    match_node(pattern, node, ctx)
}

/// Matches a binary pattern of an associative operator against every pair of arguments of a
/// longer node of the same operator. Any order of the pair is tried if the operator is
/// commutative; otherwise only adjacent arguments are tried, in order.
pub fn match_extracted(
    pattern: &Pattern,
    node: &Node,
    ctx: &MatchContext,
) -> Result<Vec<Match>, Error> {
    let (Pattern::Operator { op, args: patterns }, Node::Operator { op: node_op, args, .. }) = (pattern, node) else {
        return Ok(Vec::new());
    };
    if op != node_op || !pattern.is_associative_binary() || args.len() <= 2 {
        return Ok(Vec::new());
    }
    if ctx.unknown.is_none() && pattern.needs_unknown() {
        return Err(Error::spanless(MissingUnknown));
    }

    let mut matches = Vec::new();
    for i in 0..args.len() {
        for j in 0..args.len() {
            let allowed = if op.is_commutative() { i != j } else { j == i + 1 };
            if !allowed {
                continue;
            }

            for bindings in match_positional(patterns, [&args[i], &args[j]], ctx)? {
                matches.push(Match { bindings, extraction: Some((i, j)) });
            }
        }
    }

    Ok(matches)
}

/// Checks that a wildcard accepts the node, returning the value to bind.
fn match_wildcard(kind: WildcardKind, node: &Node, ctx: &MatchContext) -> Result<Option<Node>, Error> {
    let unknown = || ctx.unknown.ok_or_else(|| Error::spanless(MissingUnknown));
    let accepted = match kind {
        WildcardKind::AnyNode => true,
        WildcardKind::ConstantOnly { negative: false } => node.is_constant(),
        WildcardKind::ConstantOnly { negative: true } => {
            return Ok(match node {
                Node::Constant(value) if *value < 0 => Some(Node::Constant(-value.clone())),
                _ => None,
            });
        },
        WildcardKind::NonConstant => !node.is_constant(),
        WildcardKind::Unknown => {
            let unknown = unknown()?;
            matches!(node, Node::Symbol(name) if name == unknown)
        },
        WildcardKind::ExcludesUnknown => !node.contains_symbol(unknown()?),
        WildcardKind::ContainsUnknown => node.contains_symbol(unknown()?),
    };

    Ok(accepted.then(|| node.clone()))
}

fn match_node(pattern: &Pattern, node: &Node, ctx: &MatchContext) -> Result<Vec<Bindings>, Error> {
    let matched = match (pattern, node) {
        (Pattern::Wildcard { name, kind }, node) => {
            return Ok(match_wildcard(*kind, node, ctx)?
                .map(|value| vec![Bindings::from([(name.clone(), value)])])
                .unwrap_or_default());
        },
        (Pattern::Constant(a), Node::Constant(b)) => a == b,
        (Pattern::Symbol(a), Node::Symbol(b)) => a == b,
        (
            Pattern::Accessor { object: a_object, index: a_index },
            Node::Accessor { object: b_object, index: b_index },
        ) => a_object == b_object && a_index == b_index,
        (
            Pattern::Function { name: a_name, args: patterns },
            Node::Function { name: b_name, args },
        ) => {
            if a_name != b_name || patterns.len() != args.len() {
                return Ok(Vec::new());
            }
            return match_positional(patterns, args, ctx);
        },
        (
            Pattern::Operator { op, args: patterns },
            Node::Operator { op: node_op, args, implicit },
        ) => {
            if op != node_op {
                return Ok(Vec::new());
            }
            if pattern.is_associative_binary() && args.len() >= 2 {
                return match_split(*op, patterns, args, *implicit, ctx);
            }
            if patterns.len() != args.len() {
                return Ok(Vec::new());
            }
            return match_positional(patterns, args, ctx);
        },
        _ => false,
    };

    Ok(if matched { vec![Bindings::new()] } else { Vec::new() })
}

/// Matches a binary pattern against every grouping of the node's arguments into one argument and
/// the rest.
fn match_split(
    op: Op,
    patterns: &[Pattern],
    args: &[Node],
    implicit: bool,
    ctx: &MatchContext,
) -> Result<Vec<Bindings>, Error> {
    let group = |nodes: Vec<Node>| match <[Node; 1]>::try_from(nodes) {
        Ok([node]) => node,
        Err(args) => Node::Operator { op, args, implicit },
    };

    let elements = if op.is_commutative() { args.len() } else { 1 };
    let mut results = Vec::new();
    for i in 0..elements {
        let element = &args[i];
        let rest = group(args.iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, arg)| arg.clone())
            .collect());

        let mut groupings = vec![[element, &rest]];
        if op.is_commutative() {
            groupings.push([&rest, element]);
        }

        for grouping in groupings {
            for bindings in match_positional(patterns, grouping, ctx)? {
                if !results.contains(&bindings) {
                    results.push(bindings);
                }
            }
        }
    }

    Ok(results)
}

/// Matches each pattern against the node in the same position, and merges the results.
fn match_positional<'n>(
    patterns: &[Pattern],
    nodes: impl IntoIterator<Item = &'n Node>,
    ctx: &MatchContext,
) -> Result<Vec<Bindings>, Error> {
    let mut merged = vec![Bindings::new()];
    for (pattern, node) in patterns.iter().zip(nodes) {
        let child = match_node(pattern, node, ctx)?;
        merged = merge(&merged, &child);
        if merged.is_empty() {
            break;
        }
    }

    Ok(merged)
}

/// Combines every set of bindings on the left with every set on the right, dropping the
/// combinations that bind the same wildcard to two different nodes.
pub fn merge(left: &[Bindings], right: &[Bindings]) -> Vec<Bindings> {
    let mut out = Vec::new();
    for l in left {
        for r in right {
            let consistent = r.iter().all(|(name, value)| {
                l.get(name).map_or(true, |existing| existing == value)
            });
            if !consistent {
                continue;
            }

            let mut combined = l.clone();
            combined.extend(r.iter().map(|(name, value)| (name.clone(), value.clone())));
            if !out.contains(&combined) {
                out.push(combined);
            }
        }
    }
    out
}
