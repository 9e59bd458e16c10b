//! Fixed option tables for the quote form and the normaliser that turns a
//! bracket selection into the numbers the risk classifier works with.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::types::{Money, Months};
use crate::EstimatorResult;

/// Smallest advance the estimator will quote.
pub const MIN_ADVANCE: Money = dec!(5_000);
/// Largest advance the estimator will quote.
pub const MAX_ADVANCE: Money = dec!(500_000);

// ---------------------------------------------------------------------------
// Monthly revenue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevenueBracket {
    #[serde(rename = "under-10k")]
    Under10k,
    #[serde(rename = "10k-25k")]
    From10kTo25k,
    #[serde(rename = "25k-50k")]
    From25kTo50k,
    #[serde(rename = "50k-100k")]
    From50kTo100k,
    #[serde(rename = "100k+")]
    Over100k,
}

impl RevenueBracket {
    pub const ALL: [RevenueBracket; 5] = [
        RevenueBracket::Under10k,
        RevenueBracket::From10kTo25k,
        RevenueBracket::From25kTo50k,
        RevenueBracket::From50kTo100k,
        RevenueBracket::Over100k,
    ];

    pub fn id(self) -> &'static str {
        match self {
            RevenueBracket::Under10k => "under-10k",
            RevenueBracket::From10kTo25k => "10k-25k",
            RevenueBracket::From25kTo50k => "25k-50k",
            RevenueBracket::From50kTo100k => "50k-100k",
            RevenueBracket::Over100k => "100k+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RevenueBracket::Under10k => "Under $10,000",
            RevenueBracket::From10kTo25k => "$10,000 - $25,000",
            RevenueBracket::From25kTo50k => "$25,000 - $50,000",
            RevenueBracket::From50kTo100k => "$50,000 - $100,000",
            RevenueBracket::Over100k => "$100,000+",
        }
    }

    /// (min, max) monthly revenue. The open-ended top bracket is capped at 500k.
    pub fn range(self) -> (Money, Money) {
        match self {
            RevenueBracket::Under10k => (dec!(0), dec!(10_000)),
            RevenueBracket::From10kTo25k => (dec!(10_000), dec!(25_000)),
            RevenueBracket::From25kTo50k => (dec!(25_000), dec!(50_000)),
            RevenueBracket::From50kTo100k => (dec!(50_000), dec!(100_000)),
            RevenueBracket::Over100k => (dec!(100_000), dec!(500_000)),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Credit score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditBracket {
    #[serde(rename = "below-500")]
    Below500,
    #[serde(rename = "500-550")]
    From500To550,
    #[serde(rename = "550-600")]
    From550To600,
    #[serde(rename = "600-650")]
    From600To650,
    #[serde(rename = "650-700")]
    From650To700,
    #[serde(rename = "700+")]
    Over700,
}

impl CreditBracket {
    pub const ALL: [CreditBracket; 6] = [
        CreditBracket::Below500,
        CreditBracket::From500To550,
        CreditBracket::From550To600,
        CreditBracket::From600To650,
        CreditBracket::From650To700,
        CreditBracket::Over700,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CreditBracket::Below500 => "below-500",
            CreditBracket::From500To550 => "500-550",
            CreditBracket::From550To600 => "550-600",
            CreditBracket::From600To650 => "600-650",
            CreditBracket::From650To700 => "650-700",
            CreditBracket::Over700 => "700+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CreditBracket::Below500 => "Below 500",
            CreditBracket::From500To550 => "500 - 550",
            CreditBracket::From550To600 => "550 - 600",
            CreditBracket::From600To650 => "600 - 650",
            CreditBracket::From650To700 => "650 - 700",
            CreditBracket::Over700 => "700+",
        }
    }

    /// (min, max) score on the 300-850 FICO scale.
    pub fn range(self) -> (Decimal, Decimal) {
        match self {
            CreditBracket::Below500 => (dec!(300), dec!(500)),
            CreditBracket::From500To550 => (dec!(500), dec!(550)),
            CreditBracket::From550To600 => (dec!(550), dec!(600)),
            CreditBracket::From600To650 => (dec!(600), dec!(650)),
            CreditBracket::From650To700 => (dec!(650), dec!(700)),
            CreditBracket::Over700 => (dec!(700), dec!(850)),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Time in business
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInBusinessBracket {
    #[serde(rename = "0-6")]
    UnderSixMonths,
    #[serde(rename = "6-12")]
    SixToTwelveMonths,
    #[serde(rename = "1-2")]
    OneToTwoYears,
    #[serde(rename = "2-5")]
    TwoToFiveYears,
    #[serde(rename = "5+")]
    OverFiveYears,
}

impl TimeInBusinessBracket {
    pub const ALL: [TimeInBusinessBracket; 5] = [
        TimeInBusinessBracket::UnderSixMonths,
        TimeInBusinessBracket::SixToTwelveMonths,
        TimeInBusinessBracket::OneToTwoYears,
        TimeInBusinessBracket::TwoToFiveYears,
        TimeInBusinessBracket::OverFiveYears,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TimeInBusinessBracket::UnderSixMonths => "0-6",
            TimeInBusinessBracket::SixToTwelveMonths => "6-12",
            TimeInBusinessBracket::OneToTwoYears => "1-2",
            TimeInBusinessBracket::TwoToFiveYears => "2-5",
            TimeInBusinessBracket::OverFiveYears => "5+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeInBusinessBracket::UnderSixMonths => "Less than 6 months",
            TimeInBusinessBracket::SixToTwelveMonths => "6 - 12 months",
            TimeInBusinessBracket::OneToTwoYears => "1 - 2 years",
            TimeInBusinessBracket::TwoToFiveYears => "2 - 5 years",
            TimeInBusinessBracket::OverFiveYears => "5+ years",
        }
    }

    /// Representative month count. Not a midpoint: the open-ended "5+" bracket
    /// is quoted as six years.
    pub fn representative_months(self) -> Months {
        match self {
            TimeInBusinessBracket::UnderSixMonths => dec!(3),
            TimeInBusinessBracket::SixToTwelveMonths => dec!(9),
            TimeInBusinessBracket::OneToTwoYears => dec!(18),
            TimeInBusinessBracket::TwoToFiveYears => dec!(42),
            TimeInBusinessBracket::OverFiveYears => dec!(72),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Normaliser
// ---------------------------------------------------------------------------

/// Numeric view of a quote request, as consumed by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInputs {
    pub avg_revenue: Money,
    pub avg_credit: Decimal,
    pub months_in_business: Months,
    pub advance_amount: Money,
}

fn midpoint((min, max): (Decimal, Decimal)) -> Decimal {
    (min + max) / dec!(2)
}

fn unknown(field: &str, value: &str) -> EstimatorError {
    tracing::error!(field, value, "bracket selection not found in option table");
    EstimatorError::UnknownBracket {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Resolve the three bracket ids against the option tables.
///
/// An id that is not in its table is a caller bug (stale form option), not a
/// user mistake, and is reported as `UnknownBracket`. Range checks on the
/// advance amount happen during validation, before this is called.
pub fn normalize(
    monthly_revenue: &str,
    credit_score: &str,
    time_in_business: &str,
    advance_amount: Money,
) -> EstimatorResult<NormalizedInputs> {
    let revenue = RevenueBracket::from_id(monthly_revenue)
        .ok_or_else(|| unknown("monthly_revenue", monthly_revenue))?;
    let credit = CreditBracket::from_id(credit_score)
        .ok_or_else(|| unknown("credit_score", credit_score))?;
    let tib = TimeInBusinessBracket::from_id(time_in_business)
        .ok_or_else(|| unknown("time_in_business", time_in_business))?;

    Ok(NormalizedInputs {
        avg_revenue: midpoint(revenue.range()),
        avg_credit: midpoint(credit.range()),
        months_in_business: tib.representative_months(),
        advance_amount,
    })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One selectable option with its numeric interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeOption {
    pub value: String,
    pub label: String,
    pub min: Decimal,
    pub max: Decimal,
}

/// One time-in-business option with its representative month count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthsOption {
    pub value: String,
    pub label: String,
    pub months: Months,
}

/// Every option table plus the accepted advance range, for form population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketCatalog {
    pub monthly_revenue: Vec<RangeOption>,
    pub credit_score: Vec<RangeOption>,
    pub time_in_business: Vec<MonthsOption>,
    pub min_advance: Money,
    pub max_advance: Money,
}

pub fn bracket_catalog() -> BracketCatalog {
    BracketCatalog {
        monthly_revenue: RevenueBracket::ALL
            .into_iter()
            .map(|b| {
                let (min, max) = b.range();
                RangeOption {
                    value: b.id().into(),
                    label: b.label().into(),
                    min,
                    max,
                }
            })
            .collect(),
        credit_score: CreditBracket::ALL
            .into_iter()
            .map(|b| {
                let (min, max) = b.range();
                RangeOption {
                    value: b.id().into(),
                    label: b.label().into(),
                    min,
                    max,
                }
            })
            .collect(),
        time_in_business: TimeInBusinessBracket::ALL
            .into_iter()
            .map(|b| MonthsOption {
                value: b.id().into(),
                label: b.label().into(),
                months: b.representative_months(),
            })
            .collect(),
        min_advance: MIN_ADVANCE,
        max_advance: MAX_ADVANCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_top_brackets() {
        let n = normalize("100k+", "700+", "5+", dec!(50_000)).unwrap();
        assert_eq!(n.avg_revenue, dec!(300_000));
        assert_eq!(n.avg_credit, dec!(775));
        assert_eq!(n.months_in_business, dec!(72));
        assert_eq!(n.advance_amount, dec!(50_000));
    }

    #[test]
    fn test_normalize_low_brackets() {
        let n = normalize("10k-25k", "500-550", "6-12", dec!(10_000)).unwrap();
        assert_eq!(n.avg_revenue, dec!(17_500));
        assert_eq!(n.avg_credit, dec!(525));
        assert_eq!(n.months_in_business, dec!(9));
    }

    #[test]
    fn test_unknown_bracket_is_lookup_error() {
        let err = normalize("1m+", "700+", "5+", dec!(50_000)).unwrap_err();
        match err {
            EstimatorError::UnknownBracket { field, value } => {
                assert_eq!(field, "monthly_revenue");
                assert_eq!(value, "1m+");
            }
            other => panic!("expected UnknownBracket, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_is_exact_match() {
        assert!(CreditBracket::from_id("700+").is_some());
        assert!(CreditBracket::from_id(" 700+").is_none());
        assert!(CreditBracket::from_id("700 +").is_none());
    }

    #[test]
    fn test_ids_round_trip_through_serde() {
        for b in TimeInBusinessBracket::ALL {
            let json = serde_json::to_string(&b).unwrap();
            assert_eq!(json, format!("\"{}\"", b.id()));
        }
    }

    #[test]
    fn test_catalog_covers_every_option() {
        let c = bracket_catalog();
        assert_eq!(c.monthly_revenue.len(), RevenueBracket::ALL.len());
        assert_eq!(c.credit_score.len(), CreditBracket::ALL.len());
        assert_eq!(c.time_in_business.len(), TimeInBusinessBracket::ALL.len());
        assert_eq!(c.min_advance, dec!(5_000));
        assert_eq!(c.max_advance, dec!(500_000));
        assert!(c.monthly_revenue.iter().all(|o| o.min < o.max));
    }
}
