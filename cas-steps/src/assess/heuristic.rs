//! Corrections applied to classified steps after the search.

use crate::{primitive::count_minus, rules::ChangeType};
use super::StepInfo;

/// Subtraction is addition of a negative number, so `5 - 3 = 2` is found as an addition. If the
/// step removed a minus sign, it is reported as a subtraction instead.
///
/// This only counts minus signs in the printed text, so it can misreport steps that also move
/// signs around elsewhere in the expression.
pub fn relabel_subtraction(info: &mut StepInfo) {
    if info.attempted_change_type == ChangeType::SimplifyArithmeticAdd
        && count_minus(&info.to) < count_minus(&info.from)
    {
        info.attempted_change_type = ChangeType::SimplifyArithmeticSubtract;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn info(from: &str, to: &str) -> StepInfo {
        let mut info = StepInfo::no_change(from, to);
        info.attempted_change_type = ChangeType::SimplifyArithmeticAdd;
        info
    }

    #[test]
    fn fewer_minus_signs() {
        let mut step = info("5 - 3", "2");
        relabel_subtraction(&mut step);
        assert_eq!(step.attempted_change_type, ChangeType::SimplifyArithmeticSubtract);
    }

    #[test]
    fn same_minus_signs() {
        let mut step = info("5 + 3", "8");
        relabel_subtraction(&mut step);
        assert_eq!(step.attempted_change_type, ChangeType::SimplifyArithmeticAdd);

        let mut step = info("-5 + 3", "-2");
        relabel_subtraction(&mut step);
        assert_eq!(step.attempted_change_type, ChangeType::SimplifyArithmeticAdd);
    }
}
