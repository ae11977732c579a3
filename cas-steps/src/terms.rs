//! Terms and factors of one side of an equation, and the operations that move them between sides.

use crate::node::{Node, Op};
use rug::Rational;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An operation with a number, such as `- 3`, reported as having been performed on one side of an
/// equation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumOp {
    /// One of `+`, `-`, `*` or `/`.
    pub op: char,

    /// The printed operand.
    pub number: String,
}

/// An operation that can be performed on a whole side of an equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// One of `+`, `-`, `*` or `/`.
    pub op: char,
    pub operand: Node,
}

/// The operators tried when looking for an operation.
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

impl Operation {
    pub fn new(op: char, operand: Node) -> Self {
        Self { op, operand }
    }

    /// Performs the operation on the side, returning the normalized result.
    pub fn apply(&self, side: &Node) -> Node {
        let side = side.clone();
        let operand = self.operand.clone();
        let node = match self.op {
            '+' => Node::add(vec![side, operand]),
            '-' => Node::add(vec![side, operand.negated()]),
            '*' => Node::mul(vec![side, operand]),
            _ => Node::div(side, operand),
        };
        node.normalize()
    }

    /// Returns the operation in reporting form.
    pub fn num_op(&self) -> NumOp {
        NumOp { op: self.op, number: self.operand.to_string() }
    }
}

/// Returns the terms of a sum, or the node itself.
pub fn terms(node: &Node) -> Vec<Node> {
    match node {
        Node::Operator { op: Op::Add, args, .. } => args.clone(),
        node => vec![node.clone()],
    }
}

/// Returns the factors of a product, or the node itself.
pub fn factors(node: &Node) -> Vec<Node> {
    match node {
        Node::Operator { op: Op::Mul, args, .. } => args.clone(),
        node => vec![node.clone()],
    }
}

/// Returns the numerator of the node, looking through nested quotients, so that both `(x + 3)/2`
/// and `(x + 3)/2/4` give `x + 3`. Any other node is its own numerator.
pub fn numerator(node: &Node) -> &Node {
    match node {
        Node::Operator { op: Op::Div, args, .. } => args.first().map_or(node, numerator),
        node => node,
    }
}

/// Returns the numerators of the terms of a side.
pub fn numerators(side: &Node) -> Vec<Node> {
    terms(side).iter().map(|term| numerator(term).clone()).collect()
}

/// A term of a side, found by looking into the numerators of quotients.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTerm {
    pub term: Node,

    /// Number of quotients the term is nested in. Terms of the side itself are at depth 0.
    pub depth: usize,

    /// The product of the denominators of the quotients the term is nested in.
    pub divisor: Option<Node>,
}

impl IndexedTerm {
    /// Returns the amount the term contributes to the whole side: the term over its divisor.
    pub fn share(&self) -> Node {
        match &self.divisor {
            Some(divisor) => Node::div(self.term.clone(), divisor.clone()).normalize(),
            None => self.term.clone(),
        }
    }
}

/// Returns the product of two denominators, multiplying them out if both are constants.
fn combined(outer: &Node, inner: &Node) -> Node {
    match (outer.as_constant(), inner.as_constant()) {
        (Some(a), Some(b)) => Node::Constant(Rational::from(a * b)),
        _ => Node::mul(vec![inner.clone(), outer.clone()]).normalize(),
    }
}

fn index_terms(node: &Node, depth: usize, divisor: Option<&Node>, out: &mut Vec<IndexedTerm>) {
    match node {
        Node::Operator { op: Op::Add, args, .. } => {
            for arg in args {
                index_terms(arg, depth, divisor, out);
            }
        },
        Node::Operator { op: Op::Div, args, .. } if args.len() == 2 => {
            let divisor = match divisor {
                Some(outer) => combined(outer, &args[1]),
                None => args[1].clone(),
            };
            index_terms(&args[0], depth + 1, Some(&divisor), out);
        },
        node => out.push(IndexedTerm {
            term: node.clone(),
            depth,
            divisor: divisor.cloned(),
        }),
    }
}

/// Returns every term of the side, including the terms of the numerators of its quotients, in
/// printed order. `x + (y + 3)/2` gives `x` at depth 0, then `y` and `3` at depth 1 with divisor
/// `2`.
pub fn indexed_terms(side: &Node) -> Vec<IndexedTerm> {
    let mut out = Vec::new();
    index_terms(side, 0, None, &mut out);
    out
}

/// Returns the operations that would remove one of the side's own terms or factors: subtracting a
/// term, adding the magnitude of a negative term, dividing by a factor, or multiplying by the
/// denominator. A term inside a quotient is removed together with the quotient's denominator, so
/// `3` is removed from `(x + 3)/2` by subtracting `3/2`.
pub fn removal_operations(side: &Node) -> Vec<Operation> {
    let mut operations = Vec::new();
    let mut push = |operation: Operation| {
        if !operations.contains(&operation) {
            operations.push(operation);
        }
    };

    let indexed = indexed_terms(side);
    if indexed.len() > 1 {
        for IndexedTerm { term, depth, divisor } in indexed {
            let (op, magnitude) = if term.starts_negative() {
                ('+', term.negated().normalize())
            } else {
                ('-', term)
            };
            let share = IndexedTerm { term: magnitude, depth, divisor }.share();
            push(Operation::new(op, share));
        }
    }

    match side {
        Node::Operator { op: Op::Mul, .. } => {
            for factor in factors(side) {
                push(Operation::new('/', factor));
            }
        },
        Node::Operator { op: Op::Div, args, .. } => {
            if let Some(denominator) = args.get(1) {
                push(Operation::new('*', denominator.clone()));
            }
        },
        _ => {},
    }

    operations
}

/// Returns every operation with one of the given terms as its operand.
pub fn operations_with(terms: &[Node]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for term in terms {
        for op in OPERATORS {
            let operation = Operation::new(op, term.clone());
            if !operations.contains(&operation) {
                operations.push(operation);
            }
        }
    }
    operations
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(s: &str) -> Node {
        s.parse::<Node>().unwrap().normalize()
    }

    fn printed(operations: Vec<Operation>) -> Vec<(char, String)> {
        operations.into_iter().map(|op| (op.op, op.operand.to_string())).collect()
    }

    #[test]
    fn removals() {
        assert_eq!(printed(removal_operations(&parse("2x + 3"))), vec![
            ('-', "2x".to_string()),
            ('-', "3".to_string()),
        ]);
        assert_eq!(printed(removal_operations(&parse("x - 4"))), vec![
            ('-', "x".to_string()),
            ('+', "4".to_string()),
        ]);
        assert_eq!(printed(removal_operations(&parse("2x"))), vec![
            ('/', "2".to_string()),
            ('/', "x".to_string()),
        ]);
        assert_eq!(printed(removal_operations(&parse("x / 5"))), vec![('*', "5".to_string())]);
        assert!(removal_operations(&parse("x")).is_empty());
    }

    #[test]
    fn removals_inside_quotients() {
        assert_eq!(printed(removal_operations(&parse("(x + 3)/2"))), vec![
            ('-', "x/2".to_string()),
            ('-', "3/2".to_string()),
            ('*', "2".to_string()),
        ]);
        assert_eq!(printed(removal_operations(&parse("(x - 4)/2 + 1"))), vec![
            ('-', "x/2".to_string()),
            ('+', "4/2".to_string()),
            ('-', "1".to_string()),
        ]);
    }

    #[test]
    fn numerators_across_divisions() {
        assert_eq!(numerator(&parse("(x + 3)/2/4")), &parse("x + 3"));
        assert_eq!(numerator(&parse("x")), &parse("x"));
        assert_eq!(numerators(&parse("x/2 + (y + 1)/3")), vec![parse("x"), parse("y + 1")]);
    }

    #[test]
    fn term_depths() {
        let indexed = indexed_terms(&parse("x + (y + 3)/2"));
        let depths = indexed.iter()
            .map(|indexed| (indexed.term.to_string(), indexed.depth))
            .collect::<Vec<_>>();
        assert_eq!(depths, vec![
            ("x".to_string(), 0),
            ("y".to_string(), 1),
            ("3".to_string(), 1),
        ]);
        assert_eq!(indexed[0].divisor, None);
        assert_eq!(indexed[2].divisor, Some(Node::constant(2)));
        assert_eq!(indexed[2].share().to_string(), "3/2");

        let nested = indexed_terms(&parse("(x + 1)/2/3"));
        assert_eq!(nested[0].depth, 2);
        assert_eq!(nested[0].share().to_string(), "x/6");
    }

    #[test]
    fn apply_operations() {
        let side = parse("2x + 3");
        assert_eq!(Operation::new('-', Node::constant(3)).apply(&side).to_string(), "2x + 3 - 3");
        assert_eq!(Operation::new('+', Node::constant(1)).apply(&side).to_string(), "2x + 3 + 1");
        assert_eq!(Operation::new('/', Node::constant(2)).apply(&parse("2x")).to_string(), "2x/2");
        assert_eq!(
            Operation::new('-', Node::constant(3)).num_op(),
            NumOp { op: '-', number: "3".to_string() },
        );
    }

    #[test]
    fn split_sides() {
        assert_eq!(terms(&parse("a + b - c")).len(), 3);
        assert_eq!(factors(&parse("2 * x * y")).len(), 3);
        assert_eq!(terms(&parse("2x")), vec![parse("2x")]);
        assert_eq!(operations_with(&[Node::constant(1)]).len(), 4);
    }
}
