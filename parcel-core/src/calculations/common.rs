//! Shared numeric helpers for the discharge plan.
//!
//! User input is never rejected: anything that does not parse as a
//! non-negative number becomes zero, so a computed field can never hold a
//! non-numeric value.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

/// Trims whitespace and removes commas (thousands separator).
fn normalize_numeric_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Coerces free-form input into a non-negative [`Decimal`].
///
/// Empty input is zero. Unparseable or negative input is logged and becomes
/// zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use parcel_core::calculations::common::coerce_decimal;
///
/// assert_eq!(coerce_decimal("1,234.50"), dec!(1234.50));
/// assert_eq!(coerce_decimal(""), Decimal::ZERO);
/// assert_eq!(coerce_decimal("abc"), Decimal::ZERO);
/// assert_eq!(coerce_decimal("-3"), Decimal::ZERO);
/// ```
pub fn coerce_decimal(input: &str) -> Decimal {
    let normalized = normalize_numeric_input(input);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    match normalized.parse::<Decimal>() {
        Ok(value) if value.is_zero() => Decimal::ZERO,
        Ok(value) if value.is_sign_negative() => {
            warn!(input = %input, "negative amount clamped to zero");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            warn!(input = %input, "invalid amount treated as zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Coerces free-form input into a non-negative whole count.
///
/// Fractions are truncated (`"3.9"` is 3); anything else that
/// [`coerce_decimal`] maps to zero is also zero here, as is a value too
/// large for `u32`.
pub fn coerce_count(input: &str) -> u32 {
    let value = coerce_decimal(input).trunc();
    value.to_u32().unwrap_or_else(|| {
        warn!(input = %input, "count out of range treated as zero");
        0
    })
}

/// Multiplies an amount by a count; a product beyond [`Decimal::MAX`] is
/// logged and becomes zero.
pub fn checked_product(
    count: u32,
    amount: Decimal,
) -> Decimal {
    Decimal::from(count)
        .checked_mul(amount)
        .unwrap_or_else(|| {
            warn!(count, %amount, "amount overflows; treated as zero");
            Decimal::ZERO
        })
}

/// Sums amounts; a sum beyond [`Decimal::MAX`] is logged and becomes zero.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .unwrap_or_else(|| {
            warn!("sum of amounts overflows; treated as zero");
            Decimal::ZERO
        })
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // coerce_decimal tests
    // =========================================================================

    #[test]
    fn coerce_decimal_parses_plain_values() {
        assert_eq!(coerce_decimal("13500"), dec!(13500));
        assert_eq!(coerce_decimal("3.27"), dec!(3.27));
    }

    #[test]
    fn coerce_decimal_accepts_comma_thousands_separator() {
        assert_eq!(coerce_decimal("1,234,567.89"), dec!(1234567.89));
    }

    #[test]
    fn coerce_decimal_trims_whitespace() {
        assert_eq!(coerce_decimal("  0.25  "), dec!(0.25));
    }

    #[test]
    fn coerce_decimal_empty_is_zero() {
        assert_eq!(coerce_decimal(""), Decimal::ZERO);
        assert_eq!(coerce_decimal("   "), Decimal::ZERO);
    }

    #[test]
    fn coerce_decimal_garbage_is_zero() {
        assert_eq!(coerce_decimal("twelve"), Decimal::ZERO);
        assert_eq!(coerce_decimal("12abc"), Decimal::ZERO);
    }

    #[test]
    fn coerce_decimal_negative_is_zero() {
        assert_eq!(coerce_decimal("-0.01"), Decimal::ZERO);
    }

    #[test]
    fn coerce_decimal_keeps_negative_zero_as_zero() {
        assert!(coerce_decimal("-0").is_zero());
    }

    // =========================================================================
    // coerce_count tests
    // =========================================================================

    #[test]
    fn coerce_count_parses_integers() {
        assert_eq!(coerce_count("7"), 7);
    }

    #[test]
    fn coerce_count_truncates_fractions() {
        assert_eq!(coerce_count("3.9"), 3);
    }

    #[test]
    fn coerce_count_invalid_is_zero() {
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("many"), 0);
        assert_eq!(coerce_count("-4"), 0);
    }

    #[test]
    fn coerce_count_out_of_range_is_zero() {
        assert_eq!(coerce_count("99999999999"), 0);
    }

    // =========================================================================
    // checked arithmetic tests
    // =========================================================================

    #[test]
    fn checked_product_multiplies_in_range() {
        assert_eq!(checked_product(4, dec!(16000)), dec!(64000));
    }

    #[test]
    fn checked_product_overflow_is_zero() {
        assert_eq!(checked_product(2, Decimal::MAX), Decimal::ZERO);
    }

    #[test]
    fn checked_sum_adds_in_range() {
        assert_eq!(checked_sum([dec!(3.27), dec!(0.25)]), dec!(3.52));
        assert_eq!(checked_sum(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn checked_sum_overflow_is_zero() {
        assert_eq!(checked_sum([Decimal::MAX, dec!(1)]), Decimal::ZERO);
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(3.525)), dec!(3.53));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(3.524)), dec!(3.52));
    }
}
