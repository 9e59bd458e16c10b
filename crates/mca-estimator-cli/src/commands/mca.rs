use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use mca_estimator_core::mca::{self, McaQuoteInput};
use mca_estimator_core::FieldErrors;

use crate::input;

/// Arguments shared by `quote` and `validate`
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON request file (individual flags override its fields)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly revenue bracket id (e.g. "25k-50k", "100k+")
    #[arg(long)]
    pub monthly_revenue: Option<String>,

    /// Credit score bracket id (e.g. "600-650", "700+")
    #[arg(long)]
    pub credit_score: Option<String>,

    /// Time in business bracket id (e.g. "6-12", "5+")
    #[arg(long, alias = "tib")]
    pub time_in_business: Option<String>,

    /// Requested advance amount (5,000 - 500,000)
    #[arg(long, alias = "amount")]
    pub advance_amount: Option<Decimal>,

    /// Seed for a repeatable factor-rate draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Funding date (YYYY-MM-DD); attaches a dated payment calendar
    #[arg(long)]
    pub funding_date: Option<NaiveDate>,
}

/// Arguments for request validation
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub request: QuoteArgs,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum BracketField {
    MonthlyRevenue,
    CreditScore,
    TimeInBusiness,
}

/// Arguments for listing bracket options
#[derive(Args)]
pub struct BracketsArgs {
    /// Only list the options for one field
    #[arg(long)]
    pub field: Option<BracketField>,
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    errors: FieldErrors,
}

fn build_request(args: QuoteArgs) -> Result<McaQuoteInput, Box<dyn std::error::Error>> {
    let mut request: McaQuoteInput =
        input::load_request(args.input.as_deref())?.unwrap_or_default();

    if args.monthly_revenue.is_some() {
        request.monthly_revenue = args.monthly_revenue;
    }
    if args.credit_score.is_some() {
        request.credit_score = args.credit_score;
    }
    if args.time_in_business.is_some() {
        request.time_in_business = args.time_in_business;
    }
    if args.advance_amount.is_some() {
        request.advance_amount = args.advance_amount;
    }
    if args.seed.is_some() {
        request.seed = args.seed;
    }
    if args.funding_date.is_some() {
        request.funding_date = args.funding_date;
    }

    Ok(request)
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = build_request(args)?;
    let result = mca::calculate_mca_quote(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = build_request(args.request)?;
    let errors = mca::validate_quote_input(&request);
    let report = ValidationReport {
        valid: errors.is_empty(),
        errors,
    };
    Ok(serde_json::to_value(report)?)
}

pub fn run_brackets(args: BracketsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = mca::bracket_catalog();
    let value = match args.field {
        None => serde_json::to_value(catalog)?,
        Some(BracketField::MonthlyRevenue) => serde_json::to_value(catalog.monthly_revenue)?,
        Some(BracketField::CreditScore) => serde_json::to_value(catalog.credit_score)?,
        Some(BracketField::TimeInBusiness) => serde_json::to_value(catalog.time_in_business)?,
    };
    Ok(value)
}
