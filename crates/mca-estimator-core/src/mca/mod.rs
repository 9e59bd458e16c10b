//! Merchant cash advance quote estimation.
//!
//! Pipeline: bracket normalisation -> risk classification -> rate adjustment
//! -> repayment schedule -> APR estimate. Every stage is a pure function;
//! the only non-determinism is the factor-rate draw, which is injectable.

pub mod apr;
pub mod brackets;
pub mod calculator;
pub mod calendar;
pub mod pricing;
pub mod risk;
pub mod schedule;

pub use brackets::{bracket_catalog, BracketCatalog};
pub use calculator::{
    calculate_mca_quote, calculate_mca_quote_with_draw, validate_quote_input, McaQuoteInput,
    McaQuoteOutput, PaymentPlan,
};
pub use risk::{FixedDraw, RateDraw, RiskAssessment, RiskCategory, SeededDraw};
pub use schedule::PaymentFrequency;
