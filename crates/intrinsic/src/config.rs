//! Raw calculator form and its defaults.
//!
//! [`ValuationConfig`] is what a presentation layer collects before the
//! "calculate" trigger: typed scalars plus the multiples as free text. It can
//! be stored as JSON, and any field left out falls back to the defaults below.

use crate::{
    MetricKind, Result, ValuationError, ValuationInput,
    input::{ensure_finite, parse_multiples},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default trailing-twelve-month metric value.
pub const DEFAULT_METRIC_VALUE: f64 = 2.50;
/// Default compound annual growth rate (%).
pub const DEFAULT_CAGR_PCT: f64 = 5.00;
/// Default discount rate (%).
pub const DEFAULT_DISCOUNT_RATE_PCT: f64 = 10.00;
/// Default projection horizon in years.
pub const DEFAULT_HORIZON_YEARS: u32 = 5;
/// Terminal growth rate (%) offered when the terminal value is switched on.
pub const DEFAULT_TERMINAL_GROWTH_PCT: f64 = 2.00;
/// Default market price per share.
pub const DEFAULT_SHARE_PRICE: f64 = 72.00;
/// Default P/E multiples.
pub const DEFAULT_MULTIPLES: &str = "5,10,15,20,25,30,35,40,45,50";

/// Calculator form as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Metric to project
    pub metric: MetricKind,
    /// Current value of the metric (TTM)
    pub metric_value: f64,
    /// CAGR in percent
    pub cagr_pct: f64,
    /// Discount rate in percent
    pub discount_rate_pct: f64,
    /// Horizon in years
    pub horizon_years: u32,
    /// Terminal growth in percent; `None` leaves the terminal value out
    pub terminal_growth_pct: Option<f64>,
    /// Current share price
    pub share_price: f64,
    /// Comma-separated P/E multiples
    pub multiples: String,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            metric: MetricKind::Eps,
            metric_value: DEFAULT_METRIC_VALUE,
            cagr_pct: DEFAULT_CAGR_PCT,
            discount_rate_pct: DEFAULT_DISCOUNT_RATE_PCT,
            horizon_years: DEFAULT_HORIZON_YEARS,
            terminal_growth_pct: None,
            share_price: DEFAULT_SHARE_PRICE,
            multiples: DEFAULT_MULTIPLES.to_string(),
        }
    }
}

impl ValuationConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the form and produce typed engine input.
    ///
    /// Rejects a horizon below one year, NaN or infinite numbers, and
    /// malformed multiples, the same inputs a calculator form would refuse.
    pub fn to_input(&self) -> Result<ValuationInput> {
        if self.horizon_years < 1 {
            return Err(ValuationError::InvalidHorizon {
                years: self.horizon_years,
            });
        }

        Ok(ValuationInput {
            metric_kind: self.metric,
            metric_value: ensure_finite("metric value", self.metric_value)?,
            cagr_pct: ensure_finite("CAGR", self.cagr_pct)?,
            discount_rate_pct: ensure_finite("discount rate", self.discount_rate_pct)?,
            horizon_years: self.horizon_years,
            terminal_growth_pct: self
                .terminal_growth_pct
                .map(|g| ensure_finite("terminal growth", g))
                .transpose()?,
            share_price: ensure_finite("share price", self.share_price)?,
            multiples: parse_multiples(&self.multiples)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = ValuationConfig::default();
        let input = config.to_input().unwrap();

        assert_eq!(input.metric_kind, MetricKind::Eps);
        assert_eq!(input.horizon_years, 5);
        assert!(!input.include_terminal_value());
        assert_eq!(input.multiples, vec![5, 10, 15, 20, 25, 30, 35, 40, 45, 50]);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = ValuationConfig::from_json_str(
            r#"{ "metric": "fcf_per_share", "share_price": 120.5, "terminal_growth_pct": 3.0 }"#,
        )
        .unwrap();

        assert_eq!(config.metric, MetricKind::FcfPerShare);
        assert_eq!(config.share_price, 120.5);
        assert_eq!(config.terminal_growth_pct, Some(3.0));
        assert_eq!(config.metric_value, DEFAULT_METRIC_VALUE);
        assert_eq!(config.multiples, DEFAULT_MULTIPLES);
    }

    #[test]
    fn test_json_roundtrip_keeps_text_multiples() {
        let config = ValuationConfig {
            multiples: "20, 10, 20".to_string(),
            ..ValuationConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ValuationConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ValuationConfig::from_json_str("{ \"horizon_years\": \"five\" }"),
            Err(ValuationError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ValuationConfig::from_path("/nonexistent/intrinsic/config.json"),
            Err(ValuationError::Io(_))
        ));
    }

    #[test]
    fn test_bad_multiples_reject_input() {
        let config = ValuationConfig {
            multiples: "5, ten, 15".to_string(),
            ..ValuationConfig::default()
        };
        assert!(matches!(
            config.to_input(),
            Err(ValuationError::InputParse { .. })
        ));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let config = ValuationConfig::from_json_str(r#"{ "horizon_years": 0 }"#).unwrap();
        assert!(matches!(
            config.to_input(),
            Err(ValuationError::InvalidHorizon { years: 0 })
        ));
    }

    #[rstest]
    #[case::metric_value(ValuationConfig { metric_value: f64::NAN, ..ValuationConfig::default() }, "metric value")]
    #[case::cagr(ValuationConfig { cagr_pct: f64::INFINITY, ..ValuationConfig::default() }, "CAGR")]
    #[case::discount_rate(ValuationConfig { discount_rate_pct: f64::NEG_INFINITY, ..ValuationConfig::default() }, "discount rate")]
    #[case::terminal_growth(ValuationConfig { terminal_growth_pct: Some(f64::NAN), ..ValuationConfig::default() }, "terminal growth")]
    #[case::share_price(ValuationConfig { share_price: f64::INFINITY, ..ValuationConfig::default() }, "share price")]
    fn test_non_finite_rejected(#[case] config: ValuationConfig, #[case] expected: &str) {
        match config.to_input() {
            Err(ValuationError::NonFinite { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }
}
