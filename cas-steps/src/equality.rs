//! Equality of expressions written as text, up to the order of commutative arguments and other
//! differences in presentation.
//!
//! Step assessment compares the same strings many times, so every comparison that succeeds is
//! remembered in a disjoint-set forest keyed by the raw strings. Two strings already known to be
//! in the same set are equal without being parsed again.

use crate::node::{sort::canonical, Node, Op};
use std::collections::HashMap;

/// A disjoint-set forest over strings.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet {
    ids: HashMap<String, usize>,
    parent: Vec<usize>,
}

impl DisjointSet {
    /// Returns the id of the string, adding it as its own set if it is new.
    fn id(&mut self, key: &str) -> usize {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }
        let id = self.parent.len();
        self.parent.push(id);
        self.ids.insert(key.to_string(), id);
        id
    }

    /// Returns the representative of the set containing the id.
    pub fn find(&self, id: usize) -> usize {
        let mut current = id;
        while self.parent[current] != current {
            current = self.parent[current];
        }
        current
    }

    /// Returns the representative of the set containing the id, pointing every id on the way
    /// directly at it.
    fn find_mut(&mut self, id: usize) -> usize {
        let mut current = id;
        let mut path = Vec::new();
        while self.parent[current] != current {
            path.push(current);
            current = self.parent[current];
        }
        for node in path {
            self.parent[node] = current;
        }
        current
    }

    /// Merges the sets containing the two strings. The lower id becomes the representative.
    pub fn union(&mut self, a: &str, b: &str) {
        let a = self.id(a);
        let b = self.id(b);
        let a = self.find_mut(a);
        let b = self.find_mut(b);
        if a == b {
            return;
        }
        let (parent, child) = if a < b { (a, b) } else { (b, a) };
        self.parent[child] = parent;
    }

    /// Returns true if both strings are known and in the same set.
    pub fn same(&mut self, a: &str, b: &str) -> bool {
        match (self.ids.get(a).copied(), self.ids.get(b).copied()) {
            (Some(a), Some(b)) => self.find_mut(a) == self.find_mut(b),
            _ => false,
        }
    }
}

/// Moves every quotient inside a product out of it: `a * (b / c)` becomes `(a * b) / c`.
fn hoist_quotients(node: Node) -> Node {
    match node {
        Node::Operator { op: Op::Mul, args, implicit } => {
            let mut numerators = Vec::new();
            let mut denominators = Vec::new();
            for arg in args.into_iter().map(hoist_quotients) {
                match arg {
                    Node::Operator { op: Op::Div, args, .. } if args.len() == 2 => {
                        let mut args = args.into_iter();
                        numerators.extend(args.next());
                        denominators.extend(args.next());
                    },
                    arg => numerators.push(arg),
                }
            }

            let product = Node::Operator { op: Op::Mul, args: numerators, implicit };
            if denominators.is_empty() {
                product
            } else {
                Node::div(product, Node::mul(denominators))
            }
        },
        Node::Operator { op, args, implicit } => Node::Operator {
            op,
            args: args.into_iter().map(hoist_quotients).collect(),
            implicit,
        },
        Node::Function { name, args } => Node::Function {
            name,
            args: args.into_iter().map(hoist_quotients).collect(),
        },
        node => node,
    }
}

/// Brings a parsed tree into canonical form.
fn canonicalize(node: Node) -> Node {
    canonical(hoist_quotients(node.normalize()).normalize())
}

/// Parses the text and brings it into canonical form. The canonical form is printed and parsed
/// once more, which settles groupings that only the parser produces.
pub fn canonical_form(text: &str) -> Option<Node> {
    let node = canonicalize(text.parse::<Node>().ok()?);
    match node.key().parse::<Node>() {
        Ok(reparsed) => Some(canonicalize(reparsed)),
        Err(_) => Some(node),
    }
}

/// Removes all whitespace from the text.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Caches the results of comparing expressions.
#[derive(Debug, Clone, Default)]
pub struct EqualityCache {
    sets: DisjointSet,

    /// Canonical form of every string seen so far, or [`None`] if it could not be parsed.
    forms: HashMap<String, Option<Node>>,
}

impl EqualityCache {
    /// Returns the canonical form of the text, computing it if needed.
    fn form(&mut self, text: &str) -> Option<Node> {
        if let Some(form) = self.forms.get(text) {
            return form.clone();
        }
        let form = canonical_form(text);
        self.forms.insert(text.to_string(), form.clone());
        form
    }

    /// Returns the canonical key of the text: two texts are equal exactly when their keys are.
    pub fn canonical_key(&mut self, text: &str) -> Option<String> {
        self.form(text).map(|form| form.key())
    }

    /// Returns true if the two texts represent the same expression.
    ///
    /// Empty or unparsable texts are not equal to anything, except through the fast paths: two
    /// identical texts are always equal, as are two texts that only differ in whitespace.
    pub fn are_equal(&mut self, a: &str, b: &str) -> bool {
        if a.trim().is_empty() || b.trim().is_empty() {
            return false;
        }
        if a == b || strip_whitespace(a) == strip_whitespace(b) {
            return true;
        }
        if self.sets.same(a, b) {
            return true;
        }

        let (Some(left), Some(right)) = (self.form(a), self.form(b)) else {
            return false;
        };
        let equal = left == right || left.key() == right.key();
        if equal {
            self.sets.union(a, b);
        }
        equal
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn disjoint_set() {
        let mut sets = DisjointSet::default();
        sets.union("a", "b");
        sets.union("c", "d");
        assert!(sets.same("a", "b"));
        assert!(!sets.same("a", "c"));

        sets.union("b", "d");
        assert!(sets.same("a", "c"));
        assert_eq!(sets.find(3), 0);
        assert!(!sets.same("a", "unknown"));
    }

    #[test]
    fn fast_paths() {
        let mut cache = EqualityCache::default();
        assert!(!cache.are_equal("", "x"));
        assert!(cache.are_equal("x +", "x +"));
        assert!(cache.are_equal("2 x + 1", "2x+1"));
    }

    #[test]
    fn presentation_differences() {
        let mut cache = EqualityCache::default();
        assert!(cache.are_equal("8 + 4 * (2/4)", "8+4*2/4"));
        assert!(cache.are_equal("x + y", "y + x"));
        assert!(cache.are_equal("2 * x", "x * 2"));
        assert!(cache.are_equal("x - 3", "-3 + x"));
        assert!(!cache.are_equal("x / 2", "2 / x"));
        assert!(!cache.are_equal("x + 1", "x + 2"));
        assert!(!cache.are_equal("x +", "x"));
    }

    #[test]
    fn symmetric_and_transitive() {
        let mut cache = EqualityCache::default();
        assert_eq!(cache.are_equal("a * b + c", "c + b * a"), cache.are_equal("c + b * a", "a * b + c"));
        assert!(cache.are_equal("x + 2y", "2y + x"));
        assert!(cache.are_equal("2y + x", "y * 2 + x"));
        assert!(cache.are_equal("x + 2y", "y * 2 + x"));
    }

    #[test]
    fn canonical_keys() {
        let mut cache = EqualityCache::default();
        assert_eq!(cache.canonical_key("y + x"), cache.canonical_key("x + y"));
        assert_eq!(cache.canonical_key("x +"), None);
    }
}
