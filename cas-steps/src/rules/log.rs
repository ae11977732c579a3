//! Rules for logarithms, which are all written as `logXY(base, x)`.

use crate::{node::Node, pattern::Bindings};
use super::{integer, ChangeType, RuleDef};

/// `logXY(10, 1000) = 3`
fn log_of_power_of_constant(_: &Node, bindings: &Bindings) -> Option<Node> {
    let base = integer(bindings, "c1")?;
    let mut value = integer(bindings, "c2")?.clone();
    if *base <= 1 || value <= 1 {
        return None;
    }

    let mut exponent = 0u32;
    while value.is_divisible(base) {
        value /= base;
        exponent += 1;
    }
    (value == 1).then(|| Node::constant(exponent))
}

pub const RULES: &[RuleDef] = &[
    RuleDef::structural(ChangeType::LogOfOne, "logXY(n1, 1)", "0"),
    RuleDef::structural(ChangeType::LogOfBase, "logXY(n1, n1)", "1"),
    RuleDef::structural(ChangeType::LogOfPowerOfBase, "logXY(n1, n1 ^ n2)", "n2"),
    RuleDef::computed(ChangeType::LogOfPowerOfBase, "logXY(c1, c2)", log_of_power_of_constant),
    RuleDef::structural(ChangeType::LogPowerRule, "logXY(n1, n2 ^ n3)", "n3 * logXY(n1, n2)"),
    RuleDef::structural(ChangeType::PowerOfLogBase, "n1 ^ logXY(n1, n2)", "n2"),
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn log(base: i32, value: i32) -> Option<Node> {
        let bindings = Bindings::from([
            ("c1".to_string(), Node::constant(base)),
            ("c2".to_string(), Node::constant(value)),
        ]);
        log_of_power_of_constant(&Node::constant(0), &bindings)
    }

    #[test]
    fn powers_of_the_base() {
        assert_eq!(log(10, 100), Some(Node::constant(2)));
        assert_eq!(log(2, 32), Some(Node::constant(5)));
        assert_eq!(log(10, 50), None);
        assert_eq!(log(1, 1), None);
        assert_eq!(log(10, 0), None);
    }
}
