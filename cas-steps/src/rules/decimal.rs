//! Conversion of decimal constants into fractions.

use crate::{node::Node, pattern::Bindings};
use super::{constant, rational_node, ChangeType, RuleDef};

/// `0.25 = 1/4`
fn decimal_to_fraction(_: &Node, bindings: &Bindings) -> Option<Node> {
    let value = constant(bindings, "c1")?;
    if *value.denom() == 1 {
        return None;
    }
    Some(rational_node(value.clone()))
}

pub const RULES: &[RuleDef] = &[
    RuleDef::computed(ChangeType::ConvertDecimalToFraction, "c1", decimal_to_fraction),
];
