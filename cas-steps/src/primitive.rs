//! Functions to construct exact [`Integer`]s and [`Rational`]s from various types, and to print
//! them back out.
//!
//! Every number handled by the step engine is exact. Decimal literals such as `0.25` are read
//! digit by digit into a [`Rational`], so no floating point rounding can leak into a step.

use rug::{Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] from a numerator and denominator. The denominator must be non-zero.
pub fn ratio(numer: Integer, denom: Integer) -> Rational {
    Rational::from((numer, denom))
}

/// Returns `10^exp`.
fn pow10(exp: u32) -> Integer {
    Integer::from(Integer::u_pow_u(10, exp))
}

/// Parses a decimal literal, such as `12`, `3.5`, or `.25`, into an exact [`Rational`].
///
/// Returns [`None`] if the string contains anything other than digits and at most one `.`.
pub fn rational_from_str(s: &str) -> Option<Rational> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", whole, frac);
    let numer = Integer::from_str_radix(&digits, 10).ok()?;
    Some(ratio(numer, pow10(frac.len() as u32)))
}

/// Returns the decimal expansion of the given number if it terminates, such as `0.25` for `1/4`.
/// Integers are printed without a decimal point.
pub fn terminating_decimal(n: &Rational) -> Option<String> {
    if *n.denom() == 1 {
        return Some(n.numer().to_string());
    }

    let mut rest = n.denom().clone();
    let twos = rest.remove_factor_mut(&int(2));
    let fives = rest.remove_factor_mut(&int(5));
    if rest != 1 {
        return None;
    }

    let places = twos.max(fives);
    let scaled = Integer::from(n.numer() * pow10(places)) / n.denom();
    let digits = scaled.clone().abs().to_string();
    let places = places as usize;

    // left-pad so that there is at least one digit before the decimal point
    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, frac) = padded.split_at(padded.len() - places);
    let sign = if scaled < 0 { "-" } else { "" };
    Some(format!("{}{}.{}", sign, whole, frac))
}

/// Returns the exact `k`-th root of `n`, if there is one.
pub fn exact_root(n: &Integer, k: u32) -> Option<Integer> {
    if k == 0 || (*n < 0 && k % 2 == 0) {
        return None;
    }

    let (root, rem) = n.clone().root_rem(Integer::new(), k);
    if rem == 0 {
        Some(root)
    } else {
        None
    }
}

/// Returns the number of minus signs in the string.
pub fn count_minus(s: &str) -> usize {
    s.chars().filter(|&c| c == '-').count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_decimal() {
        assert_eq!(rational_from_str("12"), Some(Rational::from(12)));
        assert_eq!(rational_from_str("0.25"), Some(Rational::from((1, 4))));
        assert_eq!(rational_from_str(".5"), Some(Rational::from((1, 2))));
        assert_eq!(rational_from_str("1.2.3"), None);
        assert_eq!(rational_from_str("."), None);
    }

    #[test]
    fn print_decimal() {
        assert_eq!(terminating_decimal(&Rational::from(7)).as_deref(), Some("7"));
        assert_eq!(terminating_decimal(&Rational::from((1, 4))).as_deref(), Some("0.25"));
        assert_eq!(terminating_decimal(&Rational::from((-1, 20))).as_deref(), Some("-0.05"));
        assert_eq!(terminating_decimal(&Rational::from((5, 2))).as_deref(), Some("2.5"));
        assert_eq!(terminating_decimal(&Rational::from((1, 3))), None);
    }

    #[test]
    fn roots() {
        assert_eq!(exact_root(&int(27), 3), Some(int(3)));
        assert_eq!(exact_root(&int(-8), 3), Some(int(-2)));
        assert_eq!(exact_root(&int(12), 2), None);
        assert_eq!(exact_root(&int(-4), 2), None);
    }
}
