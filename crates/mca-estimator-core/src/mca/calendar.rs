//! Dated collection calendar for a quote, starting from a funding date.

use chrono::{Datelike, Duration, Months as CalendarMonths, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::mca::schedule::PaymentFrequency;
use crate::types::Money;
use crate::EstimatorResult;

/// Rows returned in `PaymentCalendar::preview`.
pub const PREVIEW_PAYMENTS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub number: u32,
    pub date: NaiveDate,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCalendar {
    pub funding_date: NaiveDate,
    pub first_payment_date: NaiveDate,
    pub final_payment_date: NaiveDate,
    pub number_of_payments: u32,
    /// Amount of every payment but the last.
    pub installment_amount: Money,
    /// Last payment absorbs the rounding residue so the calendar sums to payback.
    pub final_payment_amount: Money,
    pub preview: Vec<ScheduledPayment>,
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut d = date + Duration::days(1);
    while is_weekend(d) {
        d += Duration::days(1);
    }
    d
}

/// Date of the `n`th collection (1-based). Daily collections need the
/// previous date since weekends are skipped.
fn payment_date(
    funding_date: NaiveDate,
    previous: NaiveDate,
    frequency: PaymentFrequency,
    n: u32,
) -> EstimatorResult<NaiveDate> {
    let date = match frequency {
        PaymentFrequency::Daily => Some(next_business_day(previous)),
        PaymentFrequency::Weekly => {
            funding_date.checked_add_signed(Duration::days(7 * i64::from(n)))
        }
        PaymentFrequency::Biweekly => {
            funding_date.checked_add_signed(Duration::days(14 * i64::from(n)))
        }
        PaymentFrequency::Monthly => funding_date.checked_add_months(CalendarMonths::new(n)),
    };
    date.ok_or_else(|| {
        EstimatorError::DateError(format!(
            "payment {n} after {funding_date} is outside the supported date range"
        ))
    })
}

/// Regular calendar installment. The quoted payment is kept when the first
/// `n - 1` collections stay under payback; otherwise payback is split evenly
/// in cents, truncated, so the last collection is never zero or negative.
fn installment_for(payment_amount: Money, total_payback: Money, number_of_payments: u32) -> Money {
    if number_of_payments == 1 {
        return total_payback;
    }
    let regular = Decimal::from(number_of_payments - 1);
    if payment_amount > Decimal::ZERO && payment_amount * regular < total_payback {
        return payment_amount;
    }
    (total_payback / Decimal::from(number_of_payments))
        .round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

pub fn build_payment_calendar(
    funding_date: NaiveDate,
    frequency: PaymentFrequency,
    number_of_payments: u32,
    payment_amount: Money,
    total_payback: Money,
) -> EstimatorResult<PaymentCalendar> {
    if number_of_payments == 0 {
        return Err(EstimatorError::InvalidInput {
            field: "number_of_payments".into(),
            reason: "Calendar needs at least one payment".into(),
        });
    }

    let installment_amount = installment_for(payment_amount, total_payback, number_of_payments);
    let final_payment_amount =
        total_payback - installment_amount * Decimal::from(number_of_payments - 1);
    if number_of_payments > 1 && installment_amount != payment_amount {
        tracing::debug!(
            %payment_amount,
            %installment_amount,
            number_of_payments,
            "quoted payment overshoots payback, calendar split evenly"
        );
    }

    let mut preview = Vec::with_capacity(PREVIEW_PAYMENTS);
    let mut previous = funding_date;
    let mut first_payment_date = funding_date;

    for n in 1..=number_of_payments {
        let date = payment_date(funding_date, previous, frequency, n)?;
        if n == 1 {
            first_payment_date = date;
        }
        if preview.len() < PREVIEW_PAYMENTS {
            let amount = if n == number_of_payments {
                final_payment_amount
            } else {
                installment_amount
            };
            preview.push(ScheduledPayment {
                number: n,
                date,
                amount,
            });
        }
        previous = date;
    }

    Ok(PaymentCalendar {
        funding_date,
        first_payment_date,
        final_payment_date: previous,
        number_of_payments,
        installment_amount,
        final_payment_amount,
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_skips_weekends() {
        // 2026-10-16 is a Friday
        let cal = build_payment_calendar(
            date(2026, 10, 16),
            PaymentFrequency::Daily,
            220,
            dec!(59),
            dec!(13_000),
        )
        .unwrap();
        assert_eq!(cal.first_payment_date, date(2026, 10, 19));
        assert!(cal.preview.iter().all(|p| !is_weekend(p.date)));
        assert!(!is_weekend(cal.final_payment_date));
        assert_eq!(cal.preview.len(), PREVIEW_PAYMENTS);
    }

    #[test]
    fn test_calendar_sums_to_payback() {
        let cal = build_payment_calendar(
            date(2026, 1, 5),
            PaymentFrequency::Daily,
            220,
            dec!(59),
            dec!(13_000),
        )
        .unwrap();
        // 219 * 59 = 12921, final = 79
        assert_eq!(cal.installment_amount, dec!(59));
        assert_eq!(cal.final_payment_amount, dec!(79));
        let total = dec!(59) * Decimal::from(cal.number_of_payments - 1) + cal.final_payment_amount;
        assert_eq!(total, dec!(13_000));
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let cal = build_payment_calendar(
            date(2026, 1, 31),
            PaymentFrequency::Monthly,
            3,
            dec!(1_000),
            dec!(3_000),
        )
        .unwrap();
        assert_eq!(cal.preview[0].date, date(2026, 2, 28));
        assert_eq!(cal.preview[1].date, date(2026, 3, 31));
        assert_eq!(cal.final_payment_date, date(2026, 4, 30));
        assert_eq!(cal.preview.len(), 3);
        assert_eq!(cal.preview[2].amount, dec!(1_000));
    }

    #[test]
    fn test_weekly_and_biweekly_spacing() {
        let weekly = build_payment_calendar(
            date(2026, 3, 2),
            PaymentFrequency::Weekly,
            4,
            dec!(100),
            dec!(400),
        )
        .unwrap();
        assert_eq!(weekly.first_payment_date, date(2026, 3, 9));
        assert_eq!(weekly.final_payment_date, date(2026, 3, 30));

        let biweekly = build_payment_calendar(
            date(2026, 3, 2),
            PaymentFrequency::Biweekly,
            2,
            dec!(100),
            dec!(200),
        )
        .unwrap();
        assert_eq!(biweekly.final_payment_date, date(2026, 3, 30));
    }

    #[test]
    fn test_rounded_up_payment_spread_evenly() {
        // 220 daily payments of 30 would collect 6600 against a 6500 payback
        let cal = build_payment_calendar(
            date(2026, 10, 16),
            PaymentFrequency::Daily,
            220,
            dec!(30),
            dec!(6_500),
        )
        .unwrap();
        // 6500 / 220 = 29.5454.. -> 29.54; 6500 - 219 * 29.54 = 30.74
        assert_eq!(cal.installment_amount, dec!(29.54));
        assert_eq!(cal.final_payment_amount, dec!(30.74));
        assert_eq!(cal.preview[0].amount, dec!(29.54));
        let total = cal.installment_amount * Decimal::from(cal.number_of_payments - 1)
            + cal.final_payment_amount;
        assert_eq!(total, dec!(6_500));
    }

    #[test]
    fn test_single_payment_carries_full_payback() {
        let cal = build_payment_calendar(
            date(2026, 3, 2),
            PaymentFrequency::Monthly,
            1,
            dec!(5_300),
            dec!(5_225),
        )
        .unwrap();
        assert_eq!(cal.installment_amount, dec!(5_225));
        assert_eq!(cal.final_payment_amount, dec!(5_225));
        assert_eq!(cal.preview.len(), 1);
        assert_eq!(cal.preview[0].amount, dec!(5_225));
    }

    #[test]
    fn test_zero_payments_rejected() {
        assert!(build_payment_calendar(
            date(2026, 3, 2),
            PaymentFrequency::Weekly,
            0,
            dec!(200),
            dec!(1_000),
        )
        .is_err());
    }
}
