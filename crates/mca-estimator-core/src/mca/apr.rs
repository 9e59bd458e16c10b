use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::EstimatorError;
use crate::types::{round_half_up, Money};
use crate::EstimatorResult;

/// Attached to every quote alongside the APR figure.
pub const APR_DISCLAIMER: &str = "APR equivalent is a simplified annualised estimate \
    (total cost / advance, scaled to 12 months) with no amortisation or compounding; \
    it is not a regulated APR disclosure.";

/// Simple annualised cost of capital, in whole percent.
///
/// `(total_payback - advance) / advance * (12 / term) * 100`, rounded half-up.
pub fn estimate_apr(
    advance_amount: Money,
    total_payback: Money,
    term_length_months: u32,
) -> EstimatorResult<Decimal> {
    if advance_amount <= Decimal::ZERO {
        return Err(EstimatorError::InvalidInput {
            field: "advance_amount".into(),
            reason: "Advance must be positive to estimate APR".into(),
        });
    }
    if term_length_months == 0 {
        return Err(EstimatorError::InvalidInput {
            field: "term_length_months".into(),
            reason: "Term must be at least one month".into(),
        });
    }

    let total_interest = total_payback - advance_amount;
    let annualiser = dec!(12) / Decimal::from(term_length_months);
    Ok(round_half_up(
        total_interest / advance_amount * annualiser * dec!(100),
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apr_twelve_month_term() {
        // 20% cost over 12 months = 20%
        assert_eq!(
            estimate_apr(dec!(100_000), dec!(120_000), 12).unwrap(),
            dec!(20)
        );
    }

    #[test]
    fn test_apr_short_term_scales_up() {
        // 30% cost over 10 months = 36%
        assert_eq!(
            estimate_apr(dec!(10_000), dec!(13_000), 10).unwrap(),
            dec!(36)
        );
        // 10% over 9 months = 13.33 -> 13
        assert_eq!(
            estimate_apr(dec!(50_000), dec!(55_000), 9).unwrap(),
            dec!(13)
        );
    }

    #[test]
    fn test_apr_rejects_zero_term_and_advance() {
        assert!(estimate_apr(dec!(10_000), dec!(13_000), 0).is_err());
        assert!(estimate_apr(Decimal::ZERO, dec!(13_000), 10).is_err());
    }
}
