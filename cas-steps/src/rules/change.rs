//! Identifiers for the kinds of changes and mistakes the engine reports.
//!
//! Each identifier has a stable `SCREAMING_SNAKE_CASE` name, returned by `as_str`, which is also
//! the name used when serializing.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Generates an enum of identifiers along with its `as_str`, [`fmt::Display`] and [`FromStr`]
/// implementations.
macro_rules! identifiers {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $variant:ident => $id:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                $(#[doc = $doc])*
                #[cfg_attr(feature = "serde", serde(rename = $id))]
                $variant,
            )*
        }

        impl $name {
            /// Every identifier, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Returns the identifier's name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $id,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($id => Ok($name::$variant),)*
                    _ => Err(format!("unknown {} `{}`", stringify!($name), s)),
                }
            }
        }
    };
}

identifiers! {
    /// The kind of change made by a single step.
    pub enum ChangeType {
        /// The unmodified input, as the first step of a trace.
        OriginalExpression => "ORIGINAL_EXPRESSION",
        NoChange => "NO_CHANGE",
        /// The change could not be identified.
        Unknown => "UNKNOWN",
        RearrangeCoefficients => "REARRANGE_COEFFICIENTS",

        ConvertDecimalToFraction => "CONVERT_DECIMAL_TO_FRACTION",

        LogOfOne => "LOG_OF_ONE",
        LogOfBase => "LOG_OF_BASE",
        LogOfPowerOfBase => "LOG_OF_POWER_OF_BASE",
        LogPowerRule => "LOG_POWER_RULE",
        PowerOfLogBase => "POWER_OF_LOG_BASE",

        RemoveAddingZero => "REMOVE_ADDING_ZERO",
        RemoveMultiplyingByOne => "REMOVE_MULTIPLYING_BY_ONE",
        MultiplyByZero => "MULTIPLY_BY_ZERO",
        RemoveExponentByOne => "REMOVE_EXPONENT_BY_ONE",
        ReduceExponentByZero => "REDUCE_EXPONENT_BY_ZERO",
        RemoveDividingByOne => "REMOVE_DIVIDING_BY_ONE",
        DivideByNegativeOne => "DIVIDE_BY_NEGATIVE_ONE",
        RemoveMultiplyingByNegativeOne => "REMOVE_MULTIPLYING_BY_NEGATIVE_ONE",
        ResolveDoubleMinus => "RESOLVE_DOUBLE_MINUS",
        ReduceZeroNumerator => "REDUCE_ZERO_NUMERATOR",
        RemoveExponentBaseOne => "REMOVE_EXPONENT_BASE_ONE",
        MultiplyNegatives => "MULTIPLY_NEGATIVES",
        CancelMinuses => "CANCEL_MINUSES",
        MultiplyByInverse => "MULTIPLY_BY_INVERSE",
        SimplifyNestedFraction => "SIMPLIFY_NESTED_FRACTION",
        MultiplyByFraction => "MULTIPLY_BY_FRACTION",

        CancelTerms => "CANCEL_TERMS",
        CancelFactors => "CANCEL_FACTORS",
        DivideBySelf => "DIVIDE_BY_SELF",
        CancelCommonFactor => "CANCEL_COMMON_FACTOR",
        CancelNumerator => "CANCEL_NUMERATOR",

        CollectLikeTerms => "COLLECT_LIKE_TERMS",
        MultiplyLikeFactors => "MULTIPLY_LIKE_FACTORS",
        AddExponentOfOne => "ADD_EXPONENT_OF_ONE",
        AddExponents => "ADD_EXPONENTS",

        EvaluateTrigFunction => "EVALUATE_TRIG_FUNCTION",
        AbsoluteValue => "ABSOLUTE_VALUE",
        ConvertPercent => "CONVERT_PERCENT",

        Distribute => "DISTRIBUTE",
        DistributeNegativeOne => "DISTRIBUTE_NEGATIVE_ONE",

        CancelRootOfPower => "CANCEL_ROOT_OF_POWER",
        RemoveRootIndexOne => "REMOVE_ROOT_INDEX_ONE",
        RootOfPower => "ROOT_OF_POWER",
        CancelPowerOfRoot => "CANCEL_POWER_OF_ROOT",
        SimplifyRootOfConstant => "SIMPLIFY_ROOT_OF_CONSTANT",

        ExpandSquareOfSum => "EXPAND_SQUARE_OF_SUM",

        SimplifyArithmeticAdd => "SIMPLIFY_ARITHMETIC__ADD",
        SimplifyArithmeticSubtract => "SIMPLIFY_ARITHMETIC__SUBTRACT",
        SimplifyArithmeticMultiply => "SIMPLIFY_ARITHMETIC__MULTIPLY",
        SimplifyArithmeticDivide => "SIMPLIFY_ARITHMETIC__DIVIDE",
        SimplifyArithmeticPower => "SIMPLIFY_ARITHMETIC__POWER",
        SimplifyFraction => "SIMPLIFY_FRACTION",
        AddFractions => "ADD_FRACTIONS",
        AddIntegerAndFraction => "ADD_INTEGER_AND_FRACTION",
        MultiplyFractions => "MULTIPLY_FRACTIONS",
    }
}

identifiers! {
    /// A plausible but wrong way to apply a rule.
    pub enum MistakeType {
        AddedOneTooMany => "ADDED_ONE_TOO_MANY",
        AddedOneTooFew => "ADDED_ONE_TOO_FEW",
        MultipliedInsteadOfAdded => "MULTIPLIED_INSTEAD_OF_ADDED",
        AddedInsteadOfSubtracted => "ADDED_INSTEAD_OF_SUBTRACTED",
        MultipliedOneTooMany => "MULTIPLIED_ONE_TOO_MANY",
        MultipliedOneTooFew => "MULTIPLIED_ONE_TOO_FEW",
        AddedInsteadOfMultiplied => "ADDED_INSTEAD_OF_MULTIPLIED",
        MultipliedInsteadOfDivided => "MULTIPLIED_INSTEAD_OF_DIVIDED",
        DividedInsteadOfMultiplied => "DIVIDED_INSTEAD_OF_MULTIPLIED",
        MultipliedInsteadOfPower => "MULTIPLIED_INSTEAD_OF_POWER",
        AddedDenominators => "ADDED_DENOMINATORS",
        MultipliedExponents => "MULTIPLIED_EXPONENTS",
        SquaredEachTerm => "SQUARED_EACH_TERM",
        DistributedNegativeToFirstTermOnly => "DISTRIBUTED_NEGATIVE_TO_FIRST_TERM_ONLY",
        /// A wrong step whose mistake could not be identified.
        Unknown => "UNKNOWN",
    }
}

identifiers! {
    /// The kind of change made to an equation as a whole.
    pub enum EquationChange {
        NoChange => "NO_CHANGE",
        SwapSides => "SWAP_SIDES",
        SimplifyLhs => "SIMPLIFY_LHS",
        SimplifyRhs => "SIMPLIFY_RHS",
        /// Both sides were simplified independently.
        SimplifyBoth => "EQ_SIMPLIFY_BOTH",
        /// The same operation was performed on both sides.
        SameOperationBothSides => "EQ_SAME_OPERATION_BOTH_SIDES",
        SubtractFromBothSides => "SUBTRACT_FROM_BOTH_SIDES",
        DivideBothSides => "DIVIDE_BOTH_SIDES",
        MultiplyBothSides => "MULTIPLY_BOTH_SIDES",
        NegateBothSides => "NEGATE_BOTH_SIDES",
        MoveToLeftSide => "MOVE_TO_LEFT_SIDE",
        Unknown => "UNKNOWN",
    }
}

identifiers! {
    /// A mistake made when changing both sides of an equation.
    pub enum EquationError {
        /// A term was removed from both sides, instead of moved from one to the other.
        AttemptedRemovalBothSides => "EQ_ATMPT_REMOVAL_BOTH_SIDES",
        /// Different terms were placed on both sides.
        PlacedBothSides => "EQ_PLACED_BOTH_SIDES",
        /// The operation undone on one side is not the one performed on the other.
        NotSameOpPerformed => "EQ_NOT_SAME_OP_PERFORMED",
        RemovedFromLhsOnly => "EQ_REMOVED_FROM_LHS_ONLY",
        RemovedFromRhsOnly => "EQ_REMOVED_FROM_RHS_ONLY",
        AddedToLhsOnly => "EQ_ADDED_TO_LHS_ONLY",
        AddedToRhsOnly => "EQ_ADDED_TO_RHS_ONLY",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn names_round_trip() {
        for change in ChangeType::ALL {
            assert_eq!(change.as_str().parse::<ChangeType>(), Ok(*change));
        }
        assert_eq!(ChangeType::SimplifyArithmeticAdd.to_string(), "SIMPLIFY_ARITHMETIC__ADD");
        assert_eq!(EquationError::AttemptedRemovalBothSides.as_str(), "EQ_ATMPT_REMOVAL_BOTH_SIDES");
        assert!("NOT_A_CHANGE".parse::<MistakeType>().is_err());
    }
}
