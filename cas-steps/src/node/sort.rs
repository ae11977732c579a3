//! Deterministic orderings of the arguments of commutative operators.

use rug::Rational;
use std::cmp::Reverse;
use super::{Node, Op};

/// Returns the polynomial degree of the node, treating every symbol as a variable of degree one.
/// Nodes that are not polynomial in their symbols have degree zero.
pub fn degree(node: &Node) -> Rational {
    match node {
        Node::Symbol(_) => Rational::from(1),
        Node::Operator { op: Op::Pow, args, .. } => match (args.first(), args.get(1)) {
            (Some(base), Some(Node::Constant(exponent))) => degree(base) * exponent,
            _ => Rational::new(),
        },
        Node::Operator { op: Op::Mul, args, .. } => args.iter().map(degree).sum(),
        Node::Operator { op: Op::Neg, args, .. } | Node::Operator { op: Op::Div, args, .. } => {
            args.first().map(degree).unwrap_or_default()
        },
        Node::Operator { op: Op::Add, args, .. } => {
            args.iter().map(degree).max().unwrap_or_default()
        },
        _ => Rational::new(),
    }
}

/// Rearranges the tree into its final presentation order: constant factors first, then the
/// remaining factors and the terms of sums by descending degree, then alphabetically.
pub fn rearranged(node: Node) -> Node {
    match node {
        Node::Operator { op, args, implicit } => {
            let mut args = args.into_iter().map(rearranged).collect::<Vec<_>>();
            match op {
                Op::Mul => args.sort_by_cached_key(|arg| {
                    (!arg.is_constant(), Reverse(degree(arg)), arg.key())
                }),
                Op::Add => args.sort_by_cached_key(|arg| {
                    (Reverse(degree(arg)), arg.is_constant(), arg.key())
                }),
                _ => {},
            }
            Node::Operator { op, args, implicit }
        },
        Node::Function { name, args } => Node::Function {
            name,
            args: args.into_iter().map(rearranged).collect(),
        },
        node => node,
    }
}

/// Sorts the arguments of every commutative operator by their key and clears the `implicit`
/// annotation, so that equal trees have equal keys.
pub fn canonical(node: Node) -> Node {
    match node {
        Node::Operator { op, args, .. } => {
            let mut args = args.into_iter().map(canonical).collect::<Vec<_>>();
            if op.is_commutative() {
                args.sort_by_cached_key(Node::key);
            }
            Node::Operator { op, args, implicit: false }
        },
        Node::Function { name, args } => Node::Function {
            name,
            args: args.into_iter().map(canonical).collect(),
        },
        node => node,
    }
}
