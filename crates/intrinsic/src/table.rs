//! Implied value table.
//!
//! Prices a present-value per-share figure at each P/E multiple and compares
//! the result with the market price.

use crate::{Result, ValuationError};
use serde::{Deserialize, Serialize};

/// One line of the implied value table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    /// P/E multiple applied
    pub multiple: i64,
    /// `pv_factor × multiple`
    pub implied_value_per_share: f64,
    /// Percentage difference between implied value and share price
    pub upside_pct: f64,
}

/// Build one row per multiple, in input order.
///
/// Multiples are neither sorted, deduplicated nor checked for sign: a zero or
/// negative multiple simply yields a zero or negative implied value. A share
/// price of exactly zero fails with [`ValuationError::DivisionUndefined`],
/// even when there are no multiples.
///
/// # Formula
///
/// ```text
/// implied = pv_factor × m
/// upside  = (implied / price − 1) × 100
/// ```
pub fn build_table(pv_factor: f64, multiples: &[i64], share_price: f64) -> Result<Vec<ValuationRow>> {
    if share_price == 0.0 {
        return Err(ValuationError::DivisionUndefined);
    }

    let rows = multiples
        .iter()
        .map(|&multiple| {
            let implied_value_per_share = pv_factor * multiple as f64;
            ValuationRow {
                multiple,
                implied_value_per_share,
                upside_pct: (implied_value_per_share / share_price - 1.0) * 100.0,
            }
        })
        .collect();

    Ok(rows)
}
