//! Command-line front end: resolve a segment (or take raw prices), forecast
//! the next year and print the response JSON on stdout.

use anyhow::anyhow;
use clap::Parser;
use price_forecast::error::Result;
use price_forecast::{
    ErrorResponse, ForecastConfig, ForecastError, ForecastPipeline, ForecastResponse,
    PropertyTable, SegmentQuery,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "plotcast=info,price_forecast=info";

#[derive(Parser, Debug)]
#[command(name = "plotcast")]
#[command(about = "Forecast next year's price for a property segment", long_about = None)]
struct Cli {
    /// Property table (CSV with city, location, area_marla and price_<year> columns)
    #[arg(short, long, required_unless_present = "prices")]
    data: Option<PathBuf>,

    #[arg(long)]
    city: Option<String>,

    /// Society or neighbourhood name
    #[arg(long)]
    location: Option<String>,

    /// Plot size in marla
    #[arg(long)]
    marla: Option<f64>,

    /// Comma-separated annual prices, oldest first (skips the table lookup)
    #[arg(long, value_delimiter = ',', conflicts_with = "data")]
    prices: Option<Vec<f64>>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Year of the first price given with --prices
    #[arg(long)]
    base_year: Option<i32>,

    /// Training deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Include validation metrics in the output
    #[arg(long)]
    diagnostics: bool,
}

fn init_logging() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn load_config(cli: &Cli) -> Result<ForecastConfig> {
    let mut config = match &cli.config {
        Some(path) => ForecastConfig::from_json_file(path)?,
        None => ForecastConfig::default(),
    };
    if let Some(base_year) = cli.base_year {
        config.base_year = base_year;
    }
    if cli.timeout_ms.is_some() {
        config.timeout_ms = cli.timeout_ms;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<ForecastResponse> {
    let pipeline = ForecastPipeline::new(load_config(cli)?)?;
    info!(
        version = price_forecast::VERSION,
        lag_mode = ?pipeline.config().lag_mode,
        timeout_ms = ?pipeline.config().timeout_ms,
        "{} ready",
        price_forecast::NAME
    );

    let report = match (&cli.prices, &cli.data) {
        (Some(prices), _) => pipeline.run_prices(prices.clone())?,
        (None, Some(path)) => {
            let (city, location, marla) = match (&cli.city, &cli.location, cli.marla) {
                (Some(city), Some(location), Some(marla)) => (city, location, marla),
                _ => {
                    return Err(ForecastError::InvalidParameter(
                        "City, location and marla parameters are required".to_string(),
                    ))
                }
            };
            let table = PropertyTable::from_csv(path)?;
            info!(rows = table.len(), "Property table loaded");
            let query = SegmentQuery::new(city.as_str(), location.as_str(), marla)?;
            pipeline.run_segment(&table, &query)?
        }
        (None, None) => {
            return Err(ForecastError::InvalidParameter(
                "Either --data or --prices is required".to_string(),
            ))
        }
    };

    info!(
        year = report.forecast.forecast_year(),
        price = report.forecast.predicted_price(),
        trees = report.trees,
        "Forecast ready"
    );
    Ok(ForecastResponse::from_report(&report, cli.diagnostics))
}

fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            false
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("{e:#}");
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(response) if print_json(&response) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            error!(kind = err.kind(), error = %err, "Forecast failed");
            print_json(&ErrorResponse::from(&err));
            ExitCode::FAILURE
        }
    }
}
