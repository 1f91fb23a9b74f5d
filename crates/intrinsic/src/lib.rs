#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod discount;
pub mod engine;
pub mod error;
pub mod format;
pub mod input;
pub mod table;

// Re-export core types
pub use config::ValuationConfig;
pub use discount::{discount_factor, future_value, project_and_discount, terminal_value};
pub use engine::{DcfEngine, ValuationResult, ValuationService};
pub use error::{Result, ValuationError};
pub use format::{Report, format_currency, format_upside};
pub use input::{MetricKind, ValuationInput, ensure_finite, parse_multiples};
pub use table::{ValuationRow, build_table};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
