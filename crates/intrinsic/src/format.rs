//! Display formatting for valuation results.
//!
//! The engine returns raw numbers; these helpers turn them into the figures a
//! reader expects to see: `$1,234.57` for money and `+12.3%` for upside.

use crate::{
    ValuationResult,
    engine::{MULTIPLE_COLUMN, UPSIDE_COLUMN},
};
use std::fmt;

/// Heading printed above the implied value table.
pub const TABLE_HEADING: &str = "Implied Values vs. Current Price";

/// Format an amount as dollars with thousands separators and two decimals.
///
/// The sign follows the dollar sign: `-1234.5` renders as `$-1,234.50`, and
/// `-0.001` as `$-0.00`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // Negative amounts keep their sign even when they round to zero
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}

/// Format an upside percentage with explicit sign and one decimal.
pub fn format_upside(pct: f64) -> String {
    format!("{pct:+.1}%")
}

/// Human readable rendering of a [`ValuationResult`].
///
/// When a terminal value was included the three present-value components are
/// listed first. The table follows, one line per multiple.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    result: &'a ValuationResult,
}

impl<'a> Report<'a> {
    /// Wrap a result for display.
    pub const fn new(result: &'a ValuationResult) -> Self {
        Self { result }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        if let Some(pv_tv) = result.pv_terminal_value {
            writeln!(f, "PV of Horizon Metric: {}", format_currency(result.pv_metric))?;
            writeln!(f, "PV of Terminal Value: {}", format_currency(pv_tv))?;
            writeln!(f, "Combined PV Factor:   {}", format_currency(result.pv_total))?;
            writeln!(f)?;
        }

        let value_header = result.value_column();
        let cells: Vec<(String, String, String)> = result
            .rows
            .iter()
            .map(|row| {
                (
                    row.multiple.to_string(),
                    format_currency(row.implied_value_per_share),
                    format_upside(row.upside_pct),
                )
            })
            .collect();

        let w0 = cells
            .iter()
            .map(|c| c.0.len())
            .chain([MULTIPLE_COLUMN.len()])
            .max()
            .unwrap_or_default();
        let w1 = cells
            .iter()
            .map(|c| c.1.len())
            .chain([value_header.len()])
            .max()
            .unwrap_or_default();
        let w2 = cells
            .iter()
            .map(|c| c.2.len())
            .chain([UPSIDE_COLUMN.len()])
            .max()
            .unwrap_or_default();

        writeln!(f, "{TABLE_HEADING}")?;
        writeln!(
            f,
            "{:<w0$}  {:>w1$}  {:>w2$}",
            MULTIPLE_COLUMN,
            value_header,
            UPSIDE_COLUMN
        )?;
        writeln!(f, "{}  {}  {}", "-".repeat(w0), "-".repeat(w1), "-".repeat(w2))?;
        for (multiple, value, upside) in &cells {
            writeln!(f, "{multiple:<w0$}  {value:>w1$}  {upside:>w2$}")?;
        }

        Ok(())
    }
}
