//! Error types for valuation computations.

use thiserror::Error;

/// Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that can occur while valuing a share.
///
/// Every variant is a deterministic rejection of the inputs of a single
/// calculation. None of them are worth retrying and none of them leave
/// state behind, so the next calculation starts clean.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// A non-empty token in the multiples text is not an integer
    #[error("invalid P/E multiple '{token}': expected a whole number")]
    InputParse {
        /// The offending token, already trimmed
        token: String,
    },

    /// Terminal growth is not strictly below the discount rate
    #[error(
        "terminal growth ({terminal_growth_pct}%) must be less than discount rate ({discount_rate_pct}%)"
    )]
    InvalidInput {
        /// Requested perpetual growth rate in percent
        terminal_growth_pct: f64,
        /// Discount rate in percent
        discount_rate_pct: f64,
    },

    /// Projection horizon is shorter than one year
    #[error("horizon must be at least 1 year, got {years}")]
    InvalidHorizon {
        /// Requested horizon
        years: u32,
    },

    /// A numeric field is NaN or infinite
    #[error("{field} must be a finite number, got {value}")]
    NonFinite {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Share price is zero, so upside cannot be expressed as a ratio
    #[error("share price is zero: upside is undefined")]
    DivisionUndefined,

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be deserialized
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
