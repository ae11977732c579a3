//! Printing of [`Node`]s.
//!
//! There are two printed forms. The [`Display`] form is what users see: `2x^2 - 3`, `(x + 1)/2`.
//! The [`Node::key`] form is the same text without any whitespace, and without the
//! juxtaposition that the `implicit` annotation allows; it is a pure function of the tree's shape
//! and is used as a cache and deduplication key.
//!
//! Both forms can be parsed back into an equivalent tree.

use crate::primitive::terminating_decimal;
use rug::Rational;
use std::fmt::{self, Display, Formatter, Write};
use super::{Node, Op};

/// The printed form to produce.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Style {
    Display,
    Key,
}

impl Style {
    fn spaced<'a>(self, spaced: &'a str, compact: &'a str) -> &'a str {
        match self {
            Style::Display => spaced,
            Style::Key => compact,
        }
    }
}

/// Returns the binding strength of the printed form of the node. Higher binds tighter.
fn precedence(node: &Node) -> u8 {
    match node {
        Node::Constant(value) => {
            if *value.denom() != 1 && terminating_decimal(value).is_none() {
                2
            } else if *value < 0 {
                3
            } else {
                5
            }
        },
        Node::Operator { op, .. } => match op {
            Op::Add => 1,
            Op::Mul | Op::Div => 2,
            Op::Neg => 3,
            Op::Pow => 4,
        },
        _ => 5,
    }
}

fn write_constant<W: Write>(f: &mut W, value: &Rational) -> fmt::Result {
    match terminating_decimal(value) {
        Some(decimal) => write!(f, "{}", decimal),
        None => write!(f, "{}/{}", value.numer(), value.denom()),
    }
}

/// Writes the node, surrounded by parentheses if `wrap` is set.
fn write_wrapped<W: Write>(f: &mut W, node: &Node, wrap: bool, style: Style) -> fmt::Result {
    if wrap {
        write!(f, "(")?;
        write_node(f, node, style)?;
        write!(f, ")")
    } else {
        write_node(f, node, style)
    }
}

/// If the term prints with a leading minus sign, returns the term without it, so that it can be
/// printed after a ` - ` in a sum.
fn subtracted_term(term: &Node) -> Option<Node> {
    match term {
        Node::Constant(value) if *value < 0 => Some(Node::Constant(-value.clone())),
        Node::Operator { op: Op::Neg, args, .. } => args.first().cloned(),
        Node::Operator { op: op @ (Op::Mul | Op::Div), args, implicit } => {
            let (first, rest) = args.split_first()?;
            let first = subtracted_term(first)?;
            let mut args = vec![first];
            args.extend(rest.iter().cloned());
            Some(Node::Operator { op: *op, args, implicit: *implicit })
        },
        _ => None,
    }
}

fn write_sum<W: Write>(f: &mut W, terms: &[Node], style: Style) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            write_node(f, term, style)?;
            continue;
        }

        match subtracted_term(term) {
            Some(positive) => {
                write!(f, "{}", style.spaced(" - ", "-"))?;
                write_wrapped(f, &positive, precedence(&positive) <= 1, style)?;
            },
            None => {
                write!(f, "{}", style.spaced(" + ", "+"))?;
                write_wrapped(f, term, precedence(term) <= 1, style)?;
            },
        }
    }

    Ok(())
}

/// Returns true if the printed form of the factor starts with a letter or an opening
/// parenthesis, so that a coefficient can be written directly in front of it.
fn starts_with_name_or_paren(node: &Node) -> bool {
    match node {
        Node::Symbol(_) | Node::Accessor { .. } | Node::Function { .. } => true,
        Node::Operator { op: Op::Add, .. } => true,
        Node::Operator { op: Op::Pow, args, .. } => args
            .first()
            .map_or(false, |base| starts_with_name_or_paren(base) || precedence(base) < 5),
        _ => false,
    }
}

/// Returns true if the factor is wrapped in parentheses when printed at the given index of a
/// product.
fn factor_is_wrapped(factor: &Node, index: usize) -> bool {
    let precedence = precedence(factor);
    precedence <= 1 || (index > 0 && (precedence <= 3 || factor.starts_negative()))
}

fn write_product<W: Write>(f: &mut W, factors: &[Node], implicit: bool, style: Style) -> fmt::Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            let prev = &factors[i - 1];

            // a leading integer or decimal coefficient is written directly in front of the
            // factor, as in `2x` or `3(x + 1)`
            let coefficient = i == 1
                && prev.is_constant()
                && precedence(prev) >= 3
                && starts_with_name_or_paren(factor);
            let juxtaposed = style == Style::Display
                && implicit
                && factor_is_wrapped(factor, i)
                && !matches!(prev, Node::Symbol(_));

            if !coefficient && !juxtaposed {
                write!(f, "{}", style.spaced(" * ", "*"))?;
            }
        }

        write_wrapped(f, factor, factor_is_wrapped(factor, i), style)?;
    }

    Ok(())
}

fn write_node<W: Write>(f: &mut W, node: &Node, style: Style) -> fmt::Result {
    match node {
        Node::Constant(value) => write_constant(f, value),
        Node::Symbol(name) => write!(f, "{}", name),
        Node::Accessor { object, index } => write!(f, "{}.{}", object, index),
        Node::Function { name, args } => {
            // logarithms are stored as `logXY(base, x)`, but shown the way they are usually typed
            let (name, args) = match (style, name.as_str(), args.as_slice()) {
                (Style::Display, "logXY", [base, rest @ ..]) if rest.len() == 1 => match base {
                    Node::Constant(value) if *value == 10 => ("log10", rest),
                    Node::Accessor { object, index } if object == "const" && index == "e" => ("ln", rest),
                    _ => (name.as_str(), args.as_slice()),
                },
                _ => (name.as_str(), args.as_slice()),
            };
            write!(f, "{}(", name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, "{}", style.spaced(", ", ","))?;
                }
                write_node(f, arg, style)?;
            }
            write!(f, ")")
        },
        Node::Operator { op, args, implicit } => match op {
            Op::Add => write_sum(f, args, style),
            Op::Mul => write_product(f, args, *implicit, style),
            Op::Div => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, "/")?;
                        write_wrapped(f, arg, precedence(arg) <= 3, style)?;
                    } else {
                        write_wrapped(f, arg, precedence(arg) <= 1, style)?;
                    }
                }
                Ok(())
            },
            Op::Pow => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, "^")?;
                        write_wrapped(f, arg, precedence(arg) <= 2, style)?;
                    } else {
                        write_wrapped(f, arg, precedence(arg) < 5, style)?;
                    }
                }
                Ok(())
            },
            Op::Neg => {
                write!(f, "-")?;
                for arg in args {
                    write_wrapped(f, arg, precedence(arg) <= 3, style)?;
                }
                Ok(())
            },
        },
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_node(f, self, Style::Display)
    }
}

impl Node {
    /// Returns the canonical, whitespace-free printed form of the node.
    pub fn key(&self) -> String {
        let mut out = String::new();
        // writing to a `String` cannot fail
        let _ = write_node(&mut out, self, Style::Key);
        out
    }
}
