//! Rate Adjuster: flexible-terms discount and collection-frequency choice.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::mca::risk::RiskAssessment;
use crate::mca::schedule::PaymentFrequency;
use crate::types::{round_half_up, Rate};

/// Discount applied to the base rate for flexible-terms applicants.
const FLEXIBLE_DISCOUNT: Decimal = dec!(0.95);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustment {
    /// Adjusted rate at full precision. Payback, payments and APR price off this.
    pub factor_rate: Rate,
    /// `factor_rate` rounded half-up to 2 dp for display.
    pub display_factor_rate: Rate,
    pub payment_frequency: PaymentFrequency,
}

/// Apply the flexible discount and pick the collection frequency.
pub fn adjust_rate(risk: &RiskAssessment, avg_revenue: Decimal) -> RateAdjustment {
    let (adjusted, payment_frequency) = if risk.qualifies_for_flexible {
        let freq = if avg_revenue >= dec!(200_000) {
            PaymentFrequency::Monthly
        } else {
            PaymentFrequency::Biweekly
        };
        (risk.base_factor_rate * FLEXIBLE_DISCOUNT, freq)
    } else {
        let freq = if avg_revenue >= dec!(50_000) {
            PaymentFrequency::Weekly
        } else {
            PaymentFrequency::Daily
        };
        (risk.base_factor_rate, freq)
    };

    RateAdjustment {
        factor_rate: adjusted,
        display_factor_rate: round_half_up(adjusted, 2),
        payment_frequency,
    }
}
