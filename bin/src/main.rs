//! CLI for the intrinsic valuation engine.
//!
//! This binary is a thin form over the library: it collects the calculator
//! inputs from flags or a JSON config, hands them to the engine and prints
//! either a formatted report or the raw result as JSON.

use clap::{Args, Parser, Subcommand, ValueEnum};
use intrinsic::{
    DcfEngine, MetricKind, Report, ValuationConfig, ValuationError, ValuationService,
    config::DEFAULT_TERMINAL_GROWTH_PCT, ensure_finite,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intrinsic")]
#[command(about = "Intrinsic value per share from projected EPS or FCF", long_about = None)]
#[command(version)]
struct Cli {
    /// Log intermediate figures to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate implied values per share
    Value(ValueArgs),
    /// Explain the inputs and DCF best practices
    Guide,
    /// Print the default configuration as JSON
    Defaults,
}

#[derive(Args, Debug, Default)]
struct ValueArgs {
    /// JSON config to start from (flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metric to project
    #[arg(long, value_enum)]
    metric: Option<MetricArg>,

    /// Current metric value (TTM)
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
    metric_value: Option<f64>,

    /// Compound annual growth rate (%)
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
    cagr: Option<f64>,

    /// Discount rate (%)
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
    discount_rate: Option<f64>,

    /// Horizon in years
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    years: Option<u32>,

    /// Include a terminal value growing at this rate (%), 2.00 when omitted
    #[arg(
        long,
        num_args = 0..=1,
        allow_negative_numbers = true,
        value_parser = parse_finite,
        conflicts_with = "no_terminal"
    )]
    terminal_growth: Option<Option<f64>>,

    /// Leave the terminal value out even if the config includes it
    #[arg(long)]
    no_terminal: bool,

    /// Current share price
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
    price: Option<f64>,

    /// P/E multiples, comma-separated
    #[arg(long, allow_hyphen_values = true)]
    multiples: Option<String>,

    /// Print the raw result as JSON
    #[arg(long)]
    json: bool,
}

/// Metric names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    /// Earnings per share
    Eps,
    /// Free cash flow per share
    Fcf,
}

/// Parse a float flag, refusing NaN and infinities.
fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    ensure_finite("value", value).map_err(|_| format!("{s} is not a finite number"))
}

impl From<MetricArg> for MetricKind {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Eps => Self::Eps,
            MetricArg::Fcf => Self::FcfPerShare,
        }
    }
}

impl ValueArgs {
    /// Apply the flags on top of a base config.
    fn merge_into(&self, mut config: ValuationConfig) -> ValuationConfig {
        if let Some(metric) = self.metric {
            config.metric = metric.into();
        }
        if let Some(v) = self.metric_value {
            config.metric_value = v;
        }
        if let Some(v) = self.cagr {
            config.cagr_pct = v;
        }
        if let Some(v) = self.discount_rate {
            config.discount_rate_pct = v;
        }
        if let Some(v) = self.years {
            config.horizon_years = v;
        }
        if self.no_terminal {
            config.terminal_growth_pct = None;
        } else if let Some(g) = self.terminal_growth {
            config.terminal_growth_pct = Some(g.unwrap_or(DEFAULT_TERMINAL_GROWTH_PCT));
        }
        if let Some(v) = self.price {
            config.share_price = v;
        }
        if let Some(v) = &self.multiples {
            config.multiples.clone_from(v);
        }
        config
    }

    /// Resolve the config file (if any) and the flags into one form.
    fn resolve(&self) -> Result<ValuationConfig, ValuationError> {
        let base = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                ValuationConfig::from_path(path)?
            }
            None => ValuationConfig::default(),
        };
        Ok(self.merge_into(base))
    }
}

const GUIDE: &str = "\
How to use

1. Metric
   EPS (earnings per share) or FCF (free cash flow per share).

2. Current metric (TTM)
   Use the trailing-twelve-month figure for a stable baseline.

3. CAGR (%)
   Expected annual growth of the metric over the horizon.

4. Discount rate (%)
   Your WACC or another risk-adjusted required return.

5. Horizon (years)
   Usually 5 to 10 years depending on business maturity.

6. Current share price
   Today's market price, the reference for upside.

7. P/E multiples
   Historical or peer-group average P/E ratios, comma-separated.

8. Terminal value (optional)
   Adds a growing perpetuity at the horizon, discounted back as a lump sum:
     TV = Metric_n x (1 + g) / (r - g)
   The terminal growth rate g must be below the discount rate r.

DCF best practices
  - Use TTM figures to smooth seasonality.
  - Run sensitivity on growth, discount rate and multiples.
  - Cross-check implied values against peers.
";

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Value(args) => run_value(&args),
        Commands::Guide => {
            print!("{GUIDE}");
            ExitCode::SUCCESS
        }
        Commands::Defaults => print_defaults(),
    }
}

/// Run one calculation and print the outcome.
fn run_value(args: &ValueArgs) -> ExitCode {
    match calculate(args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Input error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Produce the full output text, or the first error. Nothing is printed on
/// failure, so a rejected calculation never shows a partial table.
fn calculate(args: &ValueArgs) -> Result<String, ValuationError> {
    let config = args.resolve()?;
    let result = DcfEngine::new().value_config(&config)?;

    if args.json {
        let mut json = serde_json::to_string_pretty(&result)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(Report::new(&result).to_string())
    }
}

fn print_defaults() -> ExitCode {
    match serde_json::to_string_pretty(&ValuationConfig::default()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
