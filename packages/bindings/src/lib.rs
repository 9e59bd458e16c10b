use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use mca_estimator_core::mca::{self, McaQuoteInput, McaQuoteOutput};
use mca_estimator_core::{ComputationOutput, EstimatorError, FieldErrors};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// What the quote form receives. Field errors come back as data so the form
/// can show them inline; anything else is thrown.
#[derive(Serialize)]
#[serde(untagged)]
enum QuoteResponse {
    Quoted {
        success: bool,
        quote: ComputationOutput<McaQuoteOutput>,
    },
    Rejected {
        success: bool,
        errors: FieldErrors,
    },
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    errors: FieldErrors,
}

// ---------------------------------------------------------------------------
// MCA quote
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_mca_quote(input_json: String) -> NapiResult<String> {
    let input: McaQuoteInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let response = match mca::calculate_mca_quote(&input) {
        Ok(quote) => QuoteResponse::Quoted {
            success: true,
            quote,
        },
        Err(EstimatorError::Validation(errors)) => QuoteResponse::Rejected {
            success: false,
            errors,
        },
        Err(e) => return Err(to_napi_error(e)),
    };
    serde_json::to_string(&response).map_err(to_napi_error)
}

#[napi]
pub fn validate_mca_input(input_json: String) -> NapiResult<String> {
    let input: McaQuoteInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let errors = mca::validate_quote_input(&input);
    let report = ValidationReport {
        valid: errors.is_empty(),
        errors,
    };
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn mca_bracket_catalog() -> NapiResult<String> {
    serde_json::to_string(&mca::bracket_catalog()).map_err(to_napi_error)
}
