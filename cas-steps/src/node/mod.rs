//! The expression tree manipulated by the step engine.
//!
//! # Representation
//!
//! A [`Node`] is built from the [`cas_parser`] AST, but unlike the AST it carries no span
//! information and no parentheses. Subtraction is represented as addition of a negation, so
//! `x - 3` is stored as `x + (-3)`; this lets every rule about addition apply to subtraction as
//! well.
//!
//! Addition and multiplication are **flattened** by [`Node::normalize`]: `a + (b + c)` becomes a
//! single addition node with three arguments. The pattern matcher knows how to split such a node
//! back into two groups when a rule is written for a binary operator.
//!
//! ```
//! use cas_steps::node::Node;
//!
//! let node = "2*x^2 - 3".parse::<Node>().unwrap().normalize();
//! assert_eq!(node.to_string(), "2x^2 - 3");
//! assert_eq!(node.key(), "2x^2-3");
//! ```
//!
//! # Equality
//!
//! [`PartialEq`] for [`Node`] is strict structural equality, except that the order of the
//! arguments of an addition or multiplication is ignored, as is the `implicit` annotation. Use
//! [`Node::key`] when an order-sensitive, hashable form is needed.

pub mod fmt;
pub mod iter;
pub mod sort;

use cas_error::Error;
use cas_parser::parser::{
    binary::Binary,
    equation::Equation,
    expr::Expr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
    Parser,
};
use crate::{error::InvalidInput, primitive::rational_from_str};
use iter::PathIter;
use rug::{Integer, Rational};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sequence of argument indices leading from the root of a tree to one of its nodes.
pub type Path = Vec<usize>;

/// An operator that can appear in an [`Node::Operator`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    Add,
    Mul,
    Div,
    Pow,
    Neg,
}

impl Op {
    /// Returns true if nested applications of this operator can be merged into one node.
    pub fn is_associative(self) -> bool {
        matches!(self, Op::Add | Op::Mul)
    }

    /// Returns true if the order of the operator's arguments does not matter.
    pub fn is_commutative(self) -> bool {
        matches!(self, Op::Add | Op::Mul)
    }
}

/// A node in an expression tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// An exact numeric constant.
    Constant(Rational),

    /// A variable, such as `x`.
    Symbol(String),

    /// A member access, such as `const.pi`.
    Accessor {
        object: String,
        index: String,
    },

    /// An operator applied to its arguments.
    Operator {
        op: Op,
        args: Vec<Node>,

        /// Set if the multiplication was written by juxtaposition, as in `2x`. Only used when
        /// printing.
        implicit: bool,
    },

    /// A function call, such as `sin(x)`.
    Function {
        name: String,
        args: Vec<Node>,
    },
}

impl Node {
    /// Creates a constant node.
    pub fn constant(n: impl Into<Rational>) -> Self {
        Node::Constant(n.into())
    }

    /// Creates a symbol node.
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    /// Creates an explicit operator node.
    pub fn op(op: Op, args: Vec<Node>) -> Self {
        Node::Operator { op, args, implicit: false }
    }

    pub fn add(args: Vec<Node>) -> Self {
        Node::op(Op::Add, args)
    }

    pub fn mul(args: Vec<Node>) -> Self {
        Node::op(Op::Mul, args)
    }

    pub fn div(numerator: Node, denominator: Node) -> Self {
        Node::op(Op::Div, vec![numerator, denominator])
    }

    pub fn pow(base: Node, exponent: Node) -> Self {
        Node::op(Op::Pow, vec![base, exponent])
    }

    pub fn neg(operand: Node) -> Self {
        Node::op(Op::Neg, vec![operand])
    }

    /// Creates a function call node.
    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Function { name: name.into(), args }
    }

    /// Returns the value of the node if it is a constant.
    pub fn as_constant(&self) -> Option<&Rational> {
        match self {
            Node::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value of the node if it is an integer constant.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Node::Constant(value) if *value.denom() == 1 => Some(value.numer()),
            _ => None,
        }
    }

    /// Returns true if the node is a constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Node::Constant(_))
    }

    /// Returns the arguments of an operator or function node. Leaf nodes have no arguments.
    pub fn args(&self) -> &[Node] {
        match self {
            Node::Operator { args, .. } | Node::Function { args, .. } => args,
            _ => &[],
        }
    }

    /// Returns a mutable reference to the arguments of an operator or function node.
    pub fn args_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Operator { args, .. } | Node::Function { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Returns the node at the given path.
    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &index| node.args().get(index))
    }

    /// Returns a mutable reference to the node at the given path.
    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter().try_fold(self, |node, &index| node.args_mut()?.get_mut(index))
    }

    /// Replaces the node at the given path, returning the node that was there.
    pub fn replace_at(&mut self, path: &[usize], node: Node) -> Option<Node> {
        self.get_mut(path).map(|target| std::mem::replace(target, node))
    }

    /// Returns true if the symbol with the given name appears anywhere in the tree.
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Node::Symbol(symbol) => symbol == name,
            node => node.args().iter().any(|arg| arg.contains_symbol(name)),
        }
    }

    /// Returns true if the printed form of the node starts with a minus sign.
    pub fn starts_negative(&self) -> bool {
        match self {
            Node::Constant(value) => *value < 0,
            Node::Operator { op: Op::Neg, .. } => true,
            Node::Operator { op: Op::Mul | Op::Div, args, .. } => {
                args.first().map_or(false, Node::starts_negative)
            },
            _ => false,
        }
    }

    /// Returns the negation of this node, folding the sign into constants and removing double
    /// negation.
    pub fn negated(self) -> Node {
        match self {
            Node::Constant(value) => Node::Constant(-value),
            Node::Operator { op: Op::Neg, mut args, .. } if args.len() == 1 => args.remove(0),
            node => Node::neg(node),
        }
    }

    /// Returns an iterator over the paths of every node in the tree, in left-to-right post-order.
    /// The root's path, the empty path, is yielded last.
    pub fn post_order_paths(&self) -> PathIter<'_> {
        PathIter::new(self)
    }

    /// Normalizes the tree:
    ///
    /// - nested additions and multiplications are flattened,
    /// - negated constants are folded into the constant (`-(3)` becomes `-3`), as are negated
    /// products and quotients with a leading constant (`-(2x)` becomes `-2x`),
    /// - `sqrt(x)` and `nthRoot(x)` become `nthRoot(x, 2)`,
    /// - `log10(x)`, `log(x)`, `logE(x)` and `ln(x)` become `logXY(base, x)`,
    /// - additions and multiplications with a single argument are replaced by the argument.
    pub fn normalize(self) -> Node {
        match self {
            Node::Operator { op, args, implicit } => {
                let args = args.into_iter().map(Node::normalize).collect();
                normalize_operator(op, args, implicit)
            },
            Node::Function { name, args } => {
                let args = args.into_iter().map(Node::normalize).collect();
                normalize_function(name, args)
            },
            node => node,
        }
    }
}

/// Normalizes an operator node whose arguments are already normalized.
fn normalize_operator(op: Op, args: Vec<Node>, implicit: bool) -> Node {
    match op {
        Op::Add | Op::Mul => {
            let mut implicit = implicit;
            let mut flat = Vec::with_capacity(args.len());
            for arg in args {
                match arg {
                    Node::Operator { op: inner, args: inner_args, implicit: inner_implicit }
                        if inner == op =>
                    {
                        implicit &= inner_implicit;
                        flat.extend(inner_args);
                    },
                    arg => flat.push(arg),
                }
            }

            if flat.is_empty() {
                return Node::constant(if op == Op::Add { 0 } else { 1 });
            }
            match <[Node; 1]>::try_from(flat) {
                Ok([only]) => only,
                Err(args) => Node::Operator { op, args, implicit },
            }
        },
        Op::Neg => match <[Node; 1]>::try_from(args) {
            Ok([Node::Constant(value)]) => Node::Constant(-value),
            Ok([Node::Operator { op: Op::Mul, mut args, implicit }])
                if args.first().map_or(false, Node::is_constant) =>
            {
                args[0] = std::mem::replace(&mut args[0], Node::constant(0)).negated();
                Node::Operator { op: Op::Mul, args, implicit }
            },
            Ok([Node::Operator { op: Op::Div, mut args, implicit }])
                if args.first().map_or(false, Node::is_constant) =>
            {
                args[0] = std::mem::replace(&mut args[0], Node::constant(0)).negated();
                Node::Operator { op: Op::Div, args, implicit }
            },
            Ok([operand]) => Node::neg(operand),
            Err(args) => Node::Operator { op, args, implicit },
        },
        Op::Div | Op::Pow => Node::Operator { op, args, implicit },
    }
}

/// Normalizes a function call whose arguments are already normalized.
fn normalize_function(name: String, args: Vec<Node>) -> Node {
    let e = || Node::Accessor { object: "const".to_string(), index: "e".to_string() };
    match (name.as_str(), <[Node; 1]>::try_from(args)) {
        ("sqrt" | "nthRoot", Ok([radicand])) => {
            Node::function("nthRoot", vec![radicand, Node::constant(2)])
        },
        ("log10" | "log", Ok([arg])) => Node::function("logXY", vec![Node::constant(10), arg]),
        ("logE" | "ln", Ok([arg])) => Node::function("logXY", vec![e(), arg]),
        (_, Ok([arg])) => Node::Function { name, args: vec![arg] },
        (_, Err(args)) => Node::Function { name, args },
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Constant(a), Node::Constant(b)) => a == b,
            (Node::Symbol(a), Node::Symbol(b)) => a == b,
            (
                Node::Accessor { object: a_object, index: a_index },
                Node::Accessor { object: b_object, index: b_index },
            ) => a_object == b_object && a_index == b_index,
            (
                Node::Operator { op: a_op, args: a_args, .. },
                Node::Operator { op: b_op, args: b_args, .. },
            ) => {
                a_op == b_op && if a_op.is_commutative() {
                    unordered_eq(a_args, b_args)
                } else {
                    a_args == b_args
                }
            },
            (
                Node::Function { name: a_name, args: a_args },
                Node::Function { name: b_name, args: b_args },
            ) => a_name == b_name && a_args == b_args,
            _ => false,
        }
    }
}

impl Eq for Node {}

/// Returns true if the two slices contain the same nodes, in any order.
fn unordered_eq(a: &[Node], b: &[Node]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut used = vec![false; b.len()];
    for node in a {
        let found = b.iter()
            .enumerate()
            .find(|(i, other)| !used[*i] && node == *other)
            .map(|(i, _)| i);
        match found {
            Some(i) => used[i] = true,
            None => return false,
        }
    }

    true
}

impl TryFrom<Expr> for Node {
    type Error = Error;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        match expr {
            Expr::Literal(Literal::Number(num)) => rational_from_str(&num.value)
                .map(Node::Constant)
                .ok_or_else(|| Error::new(vec![num.span], InvalidInput { input: num.value })),
            Expr::Literal(Literal::Symbol(sym)) => Ok(Node::Symbol(sym.name)),
            Expr::Paren(paren) => paren.into_innermost().try_into(),
            Expr::Call(call) => {
                let args = call.args
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                // a single letter followed by parentheses is a product, as in `x(x + 1)`
                if call.name.name.chars().count() == 1 && args.len() == 1 {
                    let mut args = args;
                    args.insert(0, Node::Symbol(call.name.name));
                    return Ok(Node::Operator { op: Op::Mul, args, implicit: true });
                }

                Ok(Node::Function { name: call.name.name, args })
            },
            Expr::Member(member) => Ok(Node::Accessor {
                object: member.object.name,
                index: member.member.name,
            }),
            Expr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => Ok(Node::neg((*unary.operand).try_into()?)),
            },
            Expr::Binary(binary) => binary_to_node(binary),
        }
    }
}

/// Converts a binary AST node. Subtraction becomes addition of a negation.
fn binary_to_node(binary: Binary) -> Result<Node, Error> {
    let lhs = Node::try_from(*binary.lhs)?;
    let rhs = Node::try_from(*binary.rhs)?;
    Ok(match binary.op.kind {
        BinOpKind::Add => Node::add(vec![lhs, rhs]),
        BinOpKind::Sub => Node::add(vec![lhs, Node::neg(rhs)]),
        BinOpKind::Mul => Node::Operator {
            op: Op::Mul,
            args: vec![lhs, rhs],
            implicit: binary.op.implicit,
        },
        BinOpKind::Div => Node::div(lhs, rhs),
        BinOpKind::Exp => Node::pow(lhs, rhs),
    })
}

impl FromStr for Node {
    type Err = Error;

    /// Parses an expression. The result is not normalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).try_parse_full::<Expr>()?.try_into()
    }
}

/// Parses an equation into its left- and right-hand sides. The sides are not normalized.
pub fn parse_equation(s: &str) -> Result<(Node, Node), Error> {
    let Equation { lhs, rhs, .. } = Parser::new(s).try_parse_full::<Equation>()?;
    Ok((lhs.try_into()?, rhs.try_into()?))
}
