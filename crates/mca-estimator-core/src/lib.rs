pub mod error;
pub mod mca;
pub mod types;

pub use error::{EstimatorError, FieldErrors};
pub use types::*;

/// Standard result type for all estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;
