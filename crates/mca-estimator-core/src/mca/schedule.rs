//! Term selection and payment amounts for every collection frequency.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::mca::risk::RiskCategory;
use crate::types::{round_currency, round_half_up, Money, Months};
use crate::EstimatorResult;

/// Business days in a month.
pub const BUSINESS_DAYS_PER_MONTH: Decimal = dec!(22);
/// Weeks in a month.
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);
/// Bi-weekly periods in a month.
pub const BIWEEKLY_PERIODS_PER_MONTH: Decimal = dec!(2.17);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl PaymentFrequency {
    pub fn periods_per_month(self) -> Months {
        match self {
            PaymentFrequency::Daily => BUSINESS_DAYS_PER_MONTH,
            PaymentFrequency::Weekly => WEEKS_PER_MONTH,
            PaymentFrequency::Biweekly => BIWEEKLY_PERIODS_PER_MONTH,
            PaymentFrequency::Monthly => Decimal::ONE,
        }
    }
}

impl std::fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentFrequency::Daily => write!(f, "daily"),
            PaymentFrequency::Weekly => write!(f, "weekly"),
            PaymentFrequency::Biweekly => write!(f, "biweekly"),
            PaymentFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// Repayment figures before the APR estimate is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub total_payback: Money,
    pub term_length_months: u32,
    pub number_of_payments: u32,
    pub payment_amount: Money,
    pub daily_payment: Money,
    pub weekly_payment: Money,
    pub bi_weekly_payment: Money,
    pub monthly_payment: Money,
}

/// Term in months by advance size and tier. Fair and poor share a term.
pub fn term_length_months(advance_amount: Money, tier: RiskCategory) -> u32 {
    let (excellent, good, other) = if advance_amount <= dec!(25_000) {
        (6, 8, 10)
    } else if advance_amount <= dec!(100_000) {
        (9, 12, 15)
    } else {
        (12, 15, 18)
    };
    match tier {
        RiskCategory::Excellent => excellent,
        RiskCategory::Good => good,
        RiskCategory::Fair | RiskCategory::Poor => other,
    }
}

/// Number of collection periods over the term (fractional for weekly/bi-weekly).
pub fn total_periods(term_months: u32, frequency: PaymentFrequency) -> Decimal {
    Decimal::from(term_months) * frequency.periods_per_month()
}

/// Derive the payment views from `total_payback`.
///
/// The chosen frequency's per-period payment is the anchor; the other three
/// are converted from it through its monthly equivalent so the four figures
/// always describe the same cost.
pub fn build_schedule(
    advance_amount: Money,
    total_payback: Money,
    tier: RiskCategory,
    frequency: PaymentFrequency,
) -> EstimatorResult<RepaymentSchedule> {
    let term = term_length_months(advance_amount, tier);
    let periods = total_periods(term, frequency);
    if periods.is_zero() {
        return Err(EstimatorError::InvalidInput {
            field: "term_length_months".into(),
            reason: "Term produced zero payment periods".into(),
        });
    }

    let base_payment = total_payback / periods;
    let monthly_equivalent = base_payment * frequency.periods_per_month();

    let daily_payment = round_currency(monthly_equivalent / BUSINESS_DAYS_PER_MONTH);
    let weekly_payment = round_currency(monthly_equivalent / WEEKS_PER_MONTH);
    let bi_weekly_payment = round_currency(monthly_equivalent / BIWEEKLY_PERIODS_PER_MONTH);
    let monthly_payment = round_currency(monthly_equivalent);

    let payment_amount = match frequency {
        PaymentFrequency::Daily => daily_payment,
        PaymentFrequency::Weekly => weekly_payment,
        PaymentFrequency::Biweekly => bi_weekly_payment,
        PaymentFrequency::Monthly => monthly_payment,
    };

    let number_of_payments = round_half_up(periods, 0).to_u32().ok_or_else(|| {
        EstimatorError::InvalidInput {
            field: "term_length_months".into(),
            reason: format!("Payment count {periods} does not fit a u32"),
        }
    })?;

    tracing::debug!(
        term,
        %frequency,
        number_of_payments,
        %payment_amount,
        "schedule derived"
    );

    Ok(RepaymentSchedule {
        total_payback: round_currency(total_payback),
        term_length_months: term,
        number_of_payments,
        payment_amount,
        daily_payment,
        weekly_payment,
        bi_weekly_payment,
        monthly_payment,
    })
}
