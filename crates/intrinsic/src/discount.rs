//! Growth projection and discounting.
//!
//! Rates are taken in percent, the way they are entered, and converted to
//! fractions internally.
//!
//! # Formulas
//!
//! ```text
//! FV       = metric × (1 + cagr)^n
//! PV       = FV / (1 + r)^n
//! TV       = FV × (1 + g) / (r − g)        (requires g < r)
//! PV(TV)   = TV / (1 + r)^n
//! ```

use crate::{Result, ValuationError};
use std::cmp::Ordering;

/// Convert a percentage to a fraction.
const fn fraction(pct: f64) -> f64 {
    pct / 100.0
}

/// Grow `metric_value` at `cagr_pct` for `horizon_years`.
///
/// Negative growth is allowed and shrinks the metric.
pub fn future_value(metric_value: f64, cagr_pct: f64, horizon_years: u32) -> f64 {
    metric_value * (1.0 + fraction(cagr_pct)).powf(f64::from(horizon_years))
}

/// Compounded discount divisor `(1 + r)^n`.
pub fn discount_factor(discount_rate_pct: f64, horizon_years: u32) -> f64 {
    (1.0 + fraction(discount_rate_pct)).powf(f64::from(horizon_years))
}

/// Project a per-share metric to the horizon and discount it back to today.
///
/// Never fails. When `cagr_pct == discount_rate_pct` growth and discounting
/// cancel and the result equals `metric_value`.
pub fn project_and_discount(
    metric_value: f64,
    cagr_pct: f64,
    discount_rate_pct: f64,
    horizon_years: u32,
) -> f64 {
    future_value(metric_value, cagr_pct, horizon_years)
        / discount_factor(discount_rate_pct, horizon_years)
}

/// Present value of a growing perpetuity started at the horizon.
///
/// `future_value` is the metric at the horizon, before discounting. The
/// perpetuity diverges unless terminal growth is strictly below the discount
/// rate, so anything else (including NaN rates) is rejected with
/// [`ValuationError::InvalidInput`] before any arithmetic happens.
pub fn terminal_value(
    future_value: f64,
    discount_rate_pct: f64,
    terminal_growth_pct: f64,
    horizon_years: u32,
) -> Result<f64> {
    let r = fraction(discount_rate_pct);
    let g = fraction(terminal_growth_pct);

    if g.partial_cmp(&r) != Some(Ordering::Less) {
        return Err(ValuationError::InvalidInput {
            terminal_growth_pct,
            discount_rate_pct,
        });
    }

    let tv = future_value * (1.0 + g) / (r - g);
    Ok(tv / discount_factor(discount_rate_pct, horizon_years))
}
