//! Valuation engine.
//!
//! The engine is the whole calculation: project, discount, optionally add a
//! terminal value, then price the present value across the requested
//! multiples. Presentation layers talk to it through [`ValuationService`] so
//! they never depend on a concrete implementation.

use crate::{
    MetricKind, Result, ValuationConfig, ValuationInput,
    discount::{future_value, project_and_discount, terminal_value},
    table::{ValuationRow, build_table},
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column label of the multiple index in [`ValuationResult::to_dataframe`].
pub const MULTIPLE_COLUMN: &str = "P/E Multiple";
/// Column label of the upside column in [`ValuationResult::to_dataframe`].
pub const UPSIDE_COLUMN: &str = "Upside (%)";

/// Outcome of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Metric the figures are expressed in
    pub metric_kind: MetricKind,
    /// Market price the upside is measured against
    pub share_price: f64,
    /// Metric at the horizon, undiscounted
    pub future_metric: f64,
    /// Present value of the horizon metric
    pub pv_metric: f64,
    /// Present value of the terminal perpetuity, when requested
    pub pv_terminal_value: Option<f64>,
    /// `pv_metric` plus `pv_terminal_value` if any
    pub pv_total: f64,
    /// Implied values, one per multiple in input order
    pub rows: Vec<ValuationRow>,
}

impl ValuationResult {
    /// Per-share figure the multiples were applied to.
    pub const fn pv_factor(&self) -> f64 {
        self.pv_total
    }

    /// Label of the implied value column, e.g. `Value per Share (EPS)`.
    pub fn value_column(&self) -> String {
        format!("Value per Share ({})", self.metric_kind)
    }

    /// The implied value table as a DataFrame.
    ///
    /// Columns: [`MULTIPLE_COLUMN`], [`Self::value_column`] and
    /// [`UPSIDE_COLUMN`], one row per table row in order.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let value_column = self.value_column();
        let multiples: Vec<i64> = self.rows.iter().map(|r| r.multiple).collect();
        let values: Vec<f64> = self.rows.iter().map(|r| r.implied_value_per_share).collect();
        let upsides: Vec<f64> = self.rows.iter().map(|r| r.upside_pct).collect();

        let df = df![
            MULTIPLE_COLUMN => multiples,
            value_column.as_str() => values,
            UPSIDE_COLUMN => upsides,
        ]?;

        Ok(df)
    }
}

/// Capability to value a share from calculator inputs.
///
/// Implementations must be pure: identical inputs give identical results and
/// a failed call leaves nothing behind that could affect the next one.
pub trait ValuationService: Send + Sync + std::fmt::Debug {
    /// Value a share from typed inputs.
    ///
    /// Either the full result is returned or nothing is: there are no partial
    /// tables on failure.
    fn value(&self, input: &ValuationInput) -> Result<ValuationResult>;

    /// Parse a raw calculator form and value it.
    fn value_config(&self, config: &ValuationConfig) -> Result<ValuationResult> {
        let input = config.to_input()?;
        self.value(&input)
    }
}

/// Discounted projection engine.
///
/// Stateless; one instance can serve any number of concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcfEngine;

impl DcfEngine {
    /// Create a new engine.
    pub const fn new() -> Self {
        Self
    }
}

impl ValuationService for DcfEngine {
    fn value(&self, input: &ValuationInput) -> Result<ValuationResult> {
        let future_metric = future_value(input.metric_value, input.cagr_pct, input.horizon_years);
        let pv_metric = project_and_discount(
            input.metric_value,
            input.cagr_pct,
            input.discount_rate_pct,
            input.horizon_years,
        );
        debug!(
            metric = %input.metric_kind,
            future_metric,
            pv_metric,
            years = input.horizon_years,
            "projected metric"
        );

        let pv_terminal_value = input
            .terminal_growth_pct
            .map(|g| {
                terminal_value(future_metric, input.discount_rate_pct, g, input.horizon_years)
            })
            .transpose()?;
        let pv_total = pv_metric + pv_terminal_value.unwrap_or(0.0);
        if let Some(pv_tv) = pv_terminal_value {
            debug!(pv_terminal_value = pv_tv, pv_total, "added terminal value");
        }

        let rows = build_table(pv_total, &input.multiples, input.share_price)?;
        debug!(rows = rows.len(), share_price = input.share_price, "built implied value table");

        Ok(ValuationResult {
            metric_kind: input.metric_kind,
            share_price: input.share_price,
            future_metric,
            pv_metric,
            pv_terminal_value,
            pv_total,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValuationError;
    use approx::assert_relative_eq;

    fn sample_input() -> ValuationInput {
        ValuationInput {
            metric_kind: MetricKind::Eps,
            metric_value: 2.50,
            cagr_pct: 5.00,
            discount_rate_pct: 10.00,
            horizon_years: 5,
            terminal_growth_pct: None,
            share_price: 72.00,
            multiples: vec![10, 20],
        }
    }

    #[test]
    fn test_horizon_only() {
        let result = DcfEngine::new().value(&sample_input()).unwrap();

        assert_relative_eq!(result.future_metric, 3.1907, epsilon = 1e-4);
        assert_relative_eq!(result.pv_metric, 1.9812, epsilon = 1e-4);
        assert!(result.pv_terminal_value.is_none());
        assert_relative_eq!(result.pv_total, result.pv_metric);

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].multiple, 10);
        assert_relative_eq!(result.rows[0].implied_value_per_share, 19.81, epsilon = 1e-2);
        assert_relative_eq!(result.rows[0].upside_pct, -72.5, epsilon = 0.05);
        assert_eq!(result.rows[1].multiple, 20);
        assert_relative_eq!(result.rows[1].implied_value_per_share, 39.62, epsilon = 1e-2);
        assert_relative_eq!(result.rows[1].upside_pct, -45.0, epsilon = 0.05);
    }

    #[test]
    fn test_with_terminal_value() {
        let input = ValuationInput {
            terminal_growth_pct: Some(2.00),
            ..sample_input()
        };
        let result = DcfEngine::new().value(&input).unwrap();

        let pv_tv = result.pv_terminal_value.unwrap();
        assert_relative_eq!(pv_tv, 25.26, epsilon = 1e-2);
        assert_relative_eq!(result.pv_total, 27.24, epsilon = 1e-2);
        assert_relative_eq!(result.pv_total, result.pv_metric + pv_tv, epsilon = 1e-12);
        assert_relative_eq!(
            result.rows[0].implied_value_per_share,
            result.pv_total * 10.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_terminal_growth_above_discount_rate() {
        let input = ValuationInput {
            terminal_growth_pct: Some(12.00),
            ..sample_input()
        };
        assert!(matches!(
            DcfEngine::new().value(&input),
            Err(ValuationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_share_price() {
        let input = ValuationInput {
            share_price: 0.0,
            ..sample_input()
        };
        assert!(matches!(
            DcfEngine::new().value(&input),
            Err(ValuationError::DivisionUndefined)
        ));
    }

    #[test]
    fn test_failure_does_not_affect_next_call() {
        let engine = DcfEngine::new();
        let bad = ValuationInput {
            terminal_growth_pct: Some(10.0),
            ..sample_input()
        };
        assert!(engine.value(&bad).is_err());
        assert_eq!(
            engine.value(&sample_input()).unwrap(),
            DcfEngine::new().value(&sample_input()).unwrap()
        );
    }

    #[test]
    fn test_value_config_parses_multiples() {
        let config = ValuationConfig {
            multiples: "20, 10".to_string(),
            ..ValuationConfig::default()
        };
        let result = DcfEngine::new().value_config(&config).unwrap();
        let multiples: Vec<_> = result.rows.iter().map(|r| r.multiple).collect();
        assert_eq!(multiples, vec![20, 10]);

        let bad = ValuationConfig {
            multiples: "5, ten, 15".to_string(),
            ..ValuationConfig::default()
        };
        assert!(matches!(
            DcfEngine::new().value_config(&bad),
            Err(ValuationError::InputParse { .. })
        ));
    }

    #[test]
    fn test_service_as_trait_object() {
        let service: Box<dyn ValuationService> = Box::new(DcfEngine::new());
        assert!(service.value(&sample_input()).is_ok());
    }

    #[test]
    fn test_to_dataframe() {
        let input = ValuationInput {
            metric_kind: MetricKind::FcfPerShare,
            multiples: vec![15, 5, 15],
            ..sample_input()
        };
        let result = DcfEngine::new().value(&input).unwrap();
        let df = result.to_dataframe().unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
        assert_eq!(result.value_column(), "Value per Share (FCF per share)");

        let multiples = df.column(MULTIPLE_COLUMN).unwrap().i64().unwrap();
        assert_eq!(multiples.get(0), Some(15));
        assert_eq!(multiples.get(1), Some(5));
        assert_eq!(multiples.get(2), Some(15));

        let values = df.column(&result.value_column()).unwrap().f64().unwrap();
        assert_relative_eq!(values.get(1).unwrap(), result.pv_total * 5.0, epsilon = 1e-12);

        let upsides = df.column(UPSIDE_COLUMN).unwrap().f64().unwrap();
        assert_relative_eq!(upsides.get(0).unwrap(), result.rows[0].upside_pct, epsilon = 1e-12);
    }

    #[test]
    fn test_to_dataframe_empty_table() {
        let input = ValuationInput {
            multiples: vec![],
            ..sample_input()
        };
        let df = DcfEngine::new().value(&input).unwrap().to_dataframe().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }
}
