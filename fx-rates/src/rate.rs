//! Unit-rate resolution.
//!
//! Pure business logic, independent of the transport layer: providers
//! sometimes omit `info.rate`, in which case the rate is derived from the
//! converted and requested amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept on a derived rate.
const RATE_SCALE: u32 = 8;

/// Derives a unit rate from `converted / requested`, rounded half-up to 8
/// fractional digits. Returns `None` when derivation is impossible (missing
/// converted amount or zero requested amount).
pub fn derive_rate(converted: Option<Decimal>, requested: Decimal) -> Option<Decimal> {
    let converted = converted?;
    if requested.is_zero() {
        return None;
    }
    converted
        .checked_div(requested)
        .map(|rate| rate.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Resolves the effective unit rate for a quote: a provider-supplied rate is
/// used verbatim (never re-derived); otherwise derivation is attempted.
pub fn effective_rate(
    supplied: Option<Decimal>,
    converted: Option<Decimal>,
    requested: Decimal,
) -> Option<Decimal> {
    supplied.or_else(|| derive_rate(converted, requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn supplied_rate_wins_over_derivation() {
        // 108.50 / 100 would give 1.085; the declared rate must win as-is.
        let rate = effective_rate(Some(dec("1.0850")), Some(dec("999.99")), dec("100"));
        assert_eq!(rate, Some(dec("1.0850")));
    }

    #[test]
    fn derives_when_rate_missing() {
        let rate = effective_rate(None, Some(dec("108.50")), dec("100.00"));
        assert_eq!(rate, Some(dec("1.085")));
    }

    #[test]
    fn derivation_rounds_half_up_to_eight_digits() {
        // 10 / 3 = 3.333333333... -> 3.33333333
        assert_eq!(derive_rate(Some(dec("10")), dec("3")), Some(dec("3.33333333")));
        // 2 / 3 = 0.666666666... -> 0.66666667 (half-up on the 9th digit)
        assert_eq!(derive_rate(Some(dec("2")), dec("3")), Some(dec("0.66666667")));
        // Exact midpoint rounds away from zero.
        assert_eq!(
            derive_rate(Some(dec("0.000000125")), dec("1")),
            Some(dec("0.00000013"))
        );
    }

    #[test]
    fn zero_requested_amount_is_underivable() {
        assert_eq!(derive_rate(Some(dec("108.50")), Decimal::ZERO), None);
    }

    #[test]
    fn missing_converted_amount_is_underivable() {
        assert_eq!(derive_rate(None, dec("100")), None);
    }
}
