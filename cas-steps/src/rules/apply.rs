//! Application of a single rule to a single node.

use cas_error::Error;
use crate::{
    node::Node,
    pattern::{match_pattern, matcher::match_extracted, Match, MatchContext},
};
use super::{MistakeType, Rule};

/// The result of applying a rule to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    /// The node that replaces the one the rule was applied to. It is not normalized.
    pub after: Node,

    /// The results of the rule's mistakes under the same match, if they were requested.
    pub mistakes: Vec<(MistakeType, Node)>,
}

/// Returns every match of the rule's left-hand side. Pairs of arguments extracted from a longer
/// addition or multiplication are only tried if the whole node does not match.
fn find_matches(node: &Node, rule: &Rule, ctx: &MatchContext) -> Result<Vec<Match>, Error> {
    let direct = match_pattern(&rule.lhs, node, ctx)?
        .into_iter()
        .map(|bindings| Match { bindings, extraction: None })
        .collect::<Vec<_>>();

    if direct.is_empty() && rule.expanded {
        match_extracted(&rule.lhs, node, ctx)
    } else {
        Ok(direct)
    }
}

/// Puts the replacement for an extracted pair of arguments back into the original operator node,
/// at the position of the first argument of the pair.
fn splice(node: &Node, extraction: Option<(usize, usize)>, replacement: Node) -> Node {
    let Some((i, j)) = extraction else {
        return replacement;
    };
    let Node::Operator { op, args, implicit } = node else {
        return replacement;
    };

    let (keep, remove) = (i.min(j), i.max(j));
    let mut args = args.clone();
    args[keep] = replacement;
    args.remove(remove);
    Node::Operator { op: *op, args, implicit: *implicit }
}

/// Returns the node a match was made against: the node itself, or the extracted pair.
fn matched_node(node: &Node, extraction: Option<(usize, usize)>) -> Node {
    match (node, extraction) {
        (Node::Operator { op, args, implicit }, Some((i, j))) => Node::Operator {
            op: *op,
            args: vec![args[i].clone(), args[j].clone()],
            implicit: *implicit,
        },
        (node, _) => node.clone(),
    }
}

/// Builds the application for one match, or returns [`None`] if the rule does not change the
/// node under that match.
fn build(node: &Node, rule: &Rule, found: &Match, with_mistakes: bool) -> Option<Application> {
    let target = matched_node(node, found.extraction);
    let after = splice(node, found.extraction, rule.build(&target, &found.bindings)?);
    if after.key() == node.key() {
        return None;
    }

    let mistakes = if with_mistakes {
        rule.mistakes
            .iter()
            .filter_map(|mistake| {
                let wrong = (mistake.build)(&target, &found.bindings)?;
                Some((mistake.kind, splice(node, found.extraction, wrong)))
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(Application { after, mistakes })
}

/// Applies the rule to the node using the first match that changes it.
pub fn apply(
    node: &Node,
    rule: &Rule,
    ctx: &MatchContext,
    with_mistakes: bool,
) -> Result<Option<Application>, Error> {
    Ok(find_matches(node, rule, ctx)?
        .iter()
        .find_map(|found| build(node, rule, found, with_mistakes)))
}

/// Applies the rule to the node once for every match, returning each distinct result.
pub fn apply_all(
    node: &Node,
    rule: &Rule,
    ctx: &MatchContext,
    with_mistakes: bool,
) -> Result<Vec<Application>, Error> {
    let mut applications = Vec::<Application>::new();
    for found in find_matches(node, rule, ctx)? {
        let Some(application) = build(node, rule, &found, with_mistakes) else {
            continue;
        };
        if applications.iter().all(|other| other.after.key() != application.after.key()) {
            applications.push(application);
        }
    }

    Ok(applications)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::rules::RuleSet;
    use super::*;

    fn parse(s: &str) -> Node {
        s.parse::<Node>().unwrap().normalize()
    }

    fn apply_rule(id: &str, node: &str) -> Option<String> {
        let rules = RuleSet::standard().unwrap();
        let rule = rules.get(id).unwrap();
        apply(&parse(node), rule, &MatchContext::default(), false)
            .unwrap()
            .map(|app| app.after.normalize().to_string())
    }

    #[test]
    fn structural_rule() {
        assert_eq!(apply_rule("REMOVE_DIVIDING_BY_ONE", "x/1").as_deref(), Some("x"));
        assert_eq!(apply_rule("REMOVE_DIVIDING_BY_ONE", "x/2"), None);
    }

    #[test]
    fn computed_rule() {
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__ADD", "4 + 3").as_deref(), Some("7"));
    }

    #[test]
    fn extracted_pair_is_spliced_back() {
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__ADD", "x + 3 + 4").as_deref(), Some("x + 7"));
        assert_eq!(apply_rule("SIMPLIFY_ARITHMETIC__MULTIPLY", "2 * x * 3").as_deref(), Some("6x"));
    }

    #[test]
    fn mistakes_share_the_match() {
        let rules = RuleSet::standard().unwrap();
        let rule = rules.get("SIMPLIFY_ARITHMETIC__ADD").unwrap();
        let app = apply(&parse("4 + 3"), rule, &MatchContext::default(), true).unwrap().unwrap();
        let mistakes = app.mistakes
            .into_iter()
            .map(|(kind, node)| (kind, node.normalize().to_string()))
            .collect::<Vec<_>>();
        assert!(mistakes.contains(&(MistakeType::AddedOneTooMany, "8".to_string())));
        assert!(mistakes.contains(&(MistakeType::AddedOneTooFew, "6".to_string())));
        assert!(mistakes.contains(&(MistakeType::MultipliedInsteadOfAdded, "12".to_string())));
    }

    #[test]
    fn every_match() {
        let rules = RuleSet::standard().unwrap();
        let rule = rules.get("SIMPLIFY_ARITHMETIC__ADD").unwrap();
        let apps = apply_all(&parse("1 + 2 + 3"), rule, &MatchContext::default(), false).unwrap();
        let mut results = apps.into_iter()
            .map(|app| app.after.normalize().to_string())
            .collect::<Vec<_>>();
        results.sort();
        assert_eq!(results, vec!["1 + 5", "3 + 3", "4 + 2"]);
    }
}
