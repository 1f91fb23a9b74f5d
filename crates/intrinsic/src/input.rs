//! Typed inputs for a single valuation.
//!
//! A [`ValuationInput`] carries every scalar already parsed. The only free-form
//! piece the presentation layer hands over is the list of P/E multiples, which
//! goes through [`parse_multiples`] before it gets here.

use crate::{Result, ValuationError};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Per-share figure being projected.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Earnings per share
    #[default]
    #[display("EPS")]
    Eps,
    /// Free cash flow per share
    #[display("FCF per share")]
    FcfPerShare,
}

/// Inputs for one calculation.
///
/// The terminal value is enabled exactly when `terminal_growth_pct` is `Some`,
/// so a growth rate can never be supplied for a disabled terminal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    /// Which per-share figure `metric_value` is
    pub metric_kind: MetricKind,
    /// Trailing-twelve-month value of the metric
    pub metric_value: f64,
    /// Compound annual growth rate in percent, may be negative
    pub cagr_pct: f64,
    /// Annual discount rate in percent
    pub discount_rate_pct: f64,
    /// Projection horizon in years
    pub horizon_years: u32,
    /// Perpetual growth rate in percent when a terminal value is included
    pub terminal_growth_pct: Option<f64>,
    /// Current market price per share
    pub share_price: f64,
    /// P/E multiples in the order they were entered, duplicates kept
    pub multiples: Vec<i64>,
}

impl ValuationInput {
    /// Whether a discounted terminal value is added to the horizon metric.
    pub const fn include_terminal_value(&self) -> bool {
        self.terminal_growth_pct.is_some()
    }
}

/// Parse comma-separated P/E multiples.
///
/// Tokens are trimmed and empty tokens dropped, so `"10, ,20,"` yields
/// `[10, 20]`. Order and duplicates are preserved. A single malformed token
/// rejects the whole list; nothing is skipped.
pub fn parse_multiples(text: &str) -> Result<Vec<i64>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>().map_err(|_| ValuationError::InputParse {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Return `value` if it is finite, otherwise reject it as `field`.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValuationError::NonFinite { field, value })
    }
}
