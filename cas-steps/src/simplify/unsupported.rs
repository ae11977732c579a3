//! Detection of nodes the rule tables know nothing about.

use crate::node::Node;
use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::warn;

/// Names of the functions the rules can work with, after normalization.
pub static SUPPORTED_FUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan",
        "sqrt", "nthRoot", "abs", "percent", "logXY", "log10", "logE", "log", "ln",
    ]
    .into_iter()
    .collect()
});

/// Returns the supported functions with a name similar to the given name.
pub fn similar_functions(name: &str) -> Vec<&'static str> {
    let mut similar = SUPPORTED_FUNCTIONS
        .iter()
        .copied()
        .filter(|supported| levenshtein(supported, name) < 2)
        .collect::<Vec<_>>();
    similar.sort_unstable();
    similar
}

/// Returns the name of the first function in the tree that is not supported, if any.
pub fn find_unsupported(node: &Node) -> Option<&str> {
    node.post_order_paths().find_map(|(_, node)| match node {
        Node::Function { name, .. } if !SUPPORTED_FUNCTIONS.contains(name.as_str()) => {
            Some(name.as_str())
        },
        _ => None,
    })
}

/// Returns true if every function in the tree is supported. Otherwise, logs the first unsupported
/// function along with any supported function the user may have meant.
pub fn check_supported(node: &Node) -> bool {
    let Some(name) = find_unsupported(node) else {
        return true;
    };

    let similar = similar_functions(name);
    if similar.is_empty() {
        warn!(function = name, "unsupported function, skipping simplification");
    } else {
        warn!(
            function = name,
            "unsupported function, skipping simplification; did you mean {}?",
            similar.join(" or ")
        );
    }
    false
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn detects_unknown_functions() {
        let node = "2 * foo(x) + sin(x)".parse::<Node>().unwrap().normalize();
        assert_eq!(find_unsupported(&node), Some("foo"));
        assert!(!check_supported(&node));

        let node = "sqrt(x) + log10(y)".parse::<Node>().unwrap().normalize();
        assert_eq!(find_unsupported(&node), None);
        assert!(check_supported(&node));
    }

    #[test]
    fn suggestions() {
        assert_eq!(similar_functions("sinn"), vec!["sin"]);
        assert_eq!(similar_functions("ab"), vec!["abs"]);
        assert!(similar_functions("frobnicate").is_empty());
    }
}
