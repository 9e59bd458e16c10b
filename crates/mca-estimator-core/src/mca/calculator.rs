use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{EstimatorError, FieldErrors};
use crate::mca::apr::{estimate_apr, APR_DISCLAIMER};
use crate::mca::brackets::{normalize, NormalizedInputs, MAX_ADVANCE, MIN_ADVANCE};
use crate::mca::calendar::{build_payment_calendar, PaymentCalendar};
use crate::mca::pricing::adjust_rate;
use crate::mca::risk::{assess_risk, RateDraw, RiskAssessment, SeededDraw};
use crate::mca::schedule::{build_schedule, PaymentFrequency};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Rate};
use crate::EstimatorResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A quote request as captured from the calculator form.
///
/// Bracket fields hold the option ids from the bracket tables (`"10k-25k"`,
/// `"700+"`, `"6-12"`). They are optional so that an incomplete form can be
/// reported field by field instead of failing deserialisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McaQuoteInput {
    #[serde(default)]
    pub monthly_revenue: Option<String>,
    #[serde(default)]
    pub credit_score: Option<String>,
    #[serde(default)]
    pub time_in_business: Option<String>,
    #[serde(default)]
    pub advance_amount: Option<Money>,
    /// Seed for the factor-rate draw; omit for a fresh draw per quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// When present, a dated payment calendar is attached to the quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Rate the plan is priced at: the tier draw after any flexible discount.
    pub factor_rate: Rate,
    /// `factor_rate` rounded to 2 dp, the figure shown to the applicant.
    pub display_factor_rate: Rate,
    pub total_payback: Money,
    pub total_cost: Money,
    pub term_length_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub number_of_payments: u32,
    pub payment_amount: Money,
    pub daily_payment: Money,
    pub weekly_payment: Money,
    pub bi_weekly_payment: Money,
    pub monthly_payment: Money,
    /// Simplified estimate in whole percent; see `APR_DISCLAIMER`.
    pub apr_equivalent: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McaQuoteOutput {
    pub inputs: NormalizedInputs,
    pub risk: RiskAssessment,
    pub plan: PaymentPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_calendar: Option<PaymentCalendar>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Field-level checks run before any pricing. An empty map means the input
/// can be quoted (bracket ids are still resolved later, see `normalize`).
pub fn validate_quote_input(input: &McaQuoteInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&input.monthly_revenue) {
        errors.insert("monthly_revenue", "Monthly revenue is required");
    }
    if is_blank(&input.credit_score) {
        errors.insert("credit_score", "Credit score is required");
    }
    if is_blank(&input.time_in_business) {
        errors.insert("time_in_business", "Time in business is required");
    }
    match input.advance_amount {
        None => errors.insert("advance_amount", "Advance amount is required"),
        Some(amount) if amount < MIN_ADVANCE || amount > MAX_ADVANCE => errors.insert(
            "advance_amount",
            "Advance amount must be between $5,000 and $500,000",
        ),
        Some(_) => {}
    }

    errors
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Price a quote, drawing the factor rate from `input.seed` when given or
/// from OS entropy otherwise.
pub fn calculate_mca_quote(
    input: &McaQuoteInput,
) -> EstimatorResult<ComputationOutput<McaQuoteOutput>> {
    let mut draw = match input.seed {
        Some(s) => SeededDraw::from_seed(s),
        None => SeededDraw::from_entropy(),
    };
    let mut output = calculate_mca_quote_with_draw(input, &mut draw)?;
    if input.seed.is_none() {
        output.warnings.push(
            "Factor rate drawn at random within the tier band; supply a seed for a repeatable quote."
                .into(),
        );
    }
    Ok(output)
}

/// Price a quote with a caller-supplied draw source.
pub fn calculate_mca_quote_with_draw(
    input: &McaQuoteInput,
    draw: &mut dyn RateDraw,
) -> EstimatorResult<ComputationOutput<McaQuoteOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation ----------------------------------------------------------
    let errors = validate_quote_input(input);
    let (Some(revenue), Some(credit), Some(tib), Some(advance)) = (
        input.monthly_revenue.as_deref(),
        input.credit_score.as_deref(),
        input.time_in_business.as_deref(),
        input.advance_amount,
    ) else {
        tracing::debug!(%errors, "quote input rejected");
        return Err(EstimatorError::Validation(errors));
    };
    if !errors.is_empty() {
        tracing::debug!(%errors, "quote input rejected");
        return Err(EstimatorError::Validation(errors));
    }

    // -- Normalise + classify ------------------------------------------------
    let normalized = normalize(revenue, credit, tib, advance)?;
    let risk = assess_risk(&normalized, draw);

    // -- Adjust + schedule ---------------------------------------------------
    let adjustment = adjust_rate(&risk, normalized.avg_revenue);
    if risk.qualifies_for_flexible {
        warnings.push("Flexible terms applied: 5% factor-rate discount.".into());
    }

    let total_payback = advance * adjustment.factor_rate;
    let schedule = build_schedule(
        advance,
        total_payback,
        risk.risk_category,
        adjustment.payment_frequency,
    )?;

    // -- APR -----------------------------------------------------------------
    let apr_equivalent = estimate_apr(advance, total_payback, schedule.term_length_months)?;
    warnings.push(APR_DISCLAIMER.into());

    let payment_calendar = match input.funding_date {
        Some(funding_date) => Some(build_payment_calendar(
            funding_date,
            adjustment.payment_frequency,
            schedule.number_of_payments,
            schedule.payment_amount,
            schedule.total_payback,
        )?),
        None => None,
    };

    let plan = PaymentPlan {
        factor_rate: adjustment.factor_rate,
        display_factor_rate: adjustment.display_factor_rate,
        total_payback: schedule.total_payback,
        total_cost: round_currency(total_payback - advance),
        term_length_months: schedule.term_length_months,
        payment_frequency: adjustment.payment_frequency,
        number_of_payments: schedule.number_of_payments,
        payment_amount: schedule.payment_amount,
        daily_payment: schedule.daily_payment,
        weekly_payment: schedule.weekly_payment,
        bi_weekly_payment: schedule.bi_weekly_payment,
        monthly_payment: schedule.monthly_payment,
        apr_equivalent,
    };

    tracing::debug!(
        tier = %risk.risk_category,
        factor_rate = %plan.display_factor_rate,
        total_payback = %plan.total_payback,
        apr = %plan.apr_equivalent,
        "quote priced"
    );

    let output = McaQuoteOutput {
        inputs: normalized,
        risk,
        plan,
        payment_calendar,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "bracket_values": "revenue and credit at bracket midpoint; time in business at representative months",
        "factor_rate_bands": {
            "excellent": "[1.10, 1.20)",
            "good": "[1.20, 1.30)",
            "fair": "[1.25, 1.35)",
            "poor": "[1.30, 1.40)"
        },
        "flexible_discount": "5%",
        "periods_per_month": { "daily": 22, "weekly": 4.33, "biweekly": 2.17, "monthly": 1 },
        "rounding": "priced at the exact factor rate; money to whole units and displayed rate to 2 dp, half-up"
    });

    Ok(with_metadata(
        "MCA quote estimate (tiered factor rate, term lookup, simple APR)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mca::risk::{FixedDraw, RiskCategory};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_input() -> McaQuoteInput {
        McaQuoteInput {
            monthly_revenue: Some("50k-100k".into()),
            credit_score: Some("650-700".into()),
            time_in_business: Some("2-5".into()),
            advance_amount: Some(dec!(80_000)),
            seed: None,
            funding_date: None,
        }
    }

    #[test]
    fn test_good_tier_weekly_quote() {
        let mut draw = FixedDraw::new(dec!(0.5)).unwrap();
        let result = calculate_mca_quote_with_draw(&sample_input(), &mut draw).unwrap();
        let out = &result.result;

        assert_eq!(out.risk.risk_category, RiskCategory::Good);
        assert!(!out.risk.qualifies_for_flexible);
        // 1.20 + 0.5 * 0.10
        assert_eq!(out.risk.base_factor_rate, dec!(1.25));
        assert_eq!(out.plan.factor_rate, dec!(1.25));
        assert_eq!(out.plan.payment_frequency, PaymentFrequency::Weekly);
        assert_eq!(out.plan.total_payback, dec!(100_000));
        assert_eq!(out.plan.total_cost, dec!(20_000));
        assert_eq!(out.plan.term_length_months, 12);
        // 20k cost on 80k over 12 months = 25%
        assert_eq!(out.plan.apr_equivalent, dec!(25));
        assert!(out.payment_calendar.is_none());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let input = McaQuoteInput {
            advance_amount: Some(dec!(4_999)),
            ..Default::default()
        };
        let errors = validate_quote_input(&input);
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get("monthly_revenue"),
            Some("Monthly revenue is required")
        );
        assert!(errors.get("advance_amount").is_some());
    }

    #[test]
    fn test_blank_selection_is_missing() {
        let mut input = sample_input();
        input.credit_score = Some("  ".into());
        let err = calculate_mca_quote_with_draw(&input, &mut FixedDraw::new(dec!(0)).unwrap())
            .unwrap_err();
        match err {
            EstimatorError::Validation(errors) => {
                assert_eq!(errors.get("credit_score"), Some("Credit score is required"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_apr_disclaimer_always_attached() {
        let result = calculate_mca_quote(&McaQuoteInput {
            seed: Some(1),
            ..sample_input()
        })
        .unwrap();
        assert!(result.warnings.iter().any(|w| w == APR_DISCLAIMER));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_unseeded_quote_notes_random_draw() {
        let result = calculate_mca_quote(&sample_input()).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("seed")));
    }

    #[test]
    fn test_funding_date_attaches_calendar() {
        let input = McaQuoteInput {
            funding_date: NaiveDate::from_ymd_opt(2026, 10, 16),
            ..sample_input()
        };
        let result =
            calculate_mca_quote_with_draw(&input, &mut FixedDraw::new(dec!(0.5)).unwrap()).unwrap();
        let cal = result.result.payment_calendar.as_ref().unwrap();
        assert_eq!(cal.number_of_payments, result.result.plan.number_of_payments);
        assert_eq!(cal.installment_amount, result.result.plan.payment_amount);
        assert_eq!(cal.preview[0].amount, result.result.plan.payment_amount);
    }

    #[test]
    fn test_small_daily_quote_with_funding_date_never_fails() {
        // Daily payment rounds up here for many draws (e.g. 220 x 30 > 6500)
        let input = McaQuoteInput {
            monthly_revenue: Some("10k-25k".into()),
            credit_score: Some("500-550".into()),
            time_in_business: Some("6-12".into()),
            advance_amount: Some(dec!(5_000)),
            seed: None,
            funding_date: NaiveDate::from_ymd_opt(2026, 10, 16),
        };
        for i in 0..100 {
            let mut draw = FixedDraw::new(Decimal::new(i, 2)).unwrap();
            let out = calculate_mca_quote_with_draw(&input, &mut draw)
                .unwrap_or_else(|e| panic!("draw 0.{i:02} failed: {e}"))
                .result;
            let cal = out.payment_calendar.unwrap();
            assert!(cal.final_payment_amount > Decimal::ZERO);
            assert_eq!(
                cal.installment_amount * Decimal::from(cal.number_of_payments - 1)
                    + cal.final_payment_amount,
                out.plan.total_payback
            );
        }
    }

    #[test]
    fn test_payback_priced_at_exact_rate() {
        let input = McaQuoteInput {
            monthly_revenue: Some("10k-25k".into()),
            credit_score: Some("500-550".into()),
            time_in_business: Some("6-12".into()),
            advance_amount: Some(dec!(10_000)),
            ..Default::default()
        };
        let mut draw = FixedDraw::new(dec!(0.96)).unwrap();
        let plan = calculate_mca_quote_with_draw(&input, &mut draw).unwrap().result.plan;
        // 1.30 + 0.96 * 0.10
        assert_eq!(plan.factor_rate, dec!(1.396));
        assert!(plan.factor_rate < dec!(1.40));
        assert_eq!(plan.display_factor_rate, dec!(1.40));
        assert_eq!(plan.total_payback, dec!(13_960));
        assert_eq!(plan.total_cost, dec!(3_960));
    }

    #[test]
    fn test_input_deserialises_with_missing_fields() {
        let input: McaQuoteInput =
            serde_json::from_str(r#"{"monthly_revenue": "100k+", "advance_amount": "25000"}"#)
                .unwrap();
        assert_eq!(input.monthly_revenue.as_deref(), Some("100k+"));
        assert_eq!(input.advance_amount, Some(dec!(25_000)));
        assert!(input.credit_score.is_none());
        assert_eq!(validate_quote_input(&input).len(), 2);
    }
}
