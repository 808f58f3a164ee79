//! solaredge - Command-line tool for the SolarEdge monitoring API
//!
//! Every subcommand maps onto one monitoring endpoint and prints the JSON
//! document the service returned.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use solaredge_client::{MonitoringClient, SortOrder, TimeUnit, DEFAULT_SITE_STATUS};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{CliOverrides, Config, MergedConfig};

#[derive(Parser)]
#[command(name = "solaredge")]
#[command(author, version, about = "SolarEdge monitoring API CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Monitoring API key
    #[arg(short = 'k', long, env = "SOLAREDGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API endpoint
    #[arg(short, long, env = "SOLAREDGE_BASE_URL")]
    base_url: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "SOLAREDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of requests in flight
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the sites visible to the API key
    List {
        /// Page size
        #[arg(long, default_value_t = 100)]
        size: u32,

        /// Index of the first site returned
        #[arg(long, default_value_t = 0)]
        start_index: u32,

        /// Free-text search over site fields
        #[arg(long)]
        search: Option<String>,

        /// Property to sort by (Name, Country, Status, ...)
        #[arg(long)]
        sort_property: Option<String>,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "asc")]
        sort_order: SortOrder,

        /// Comma-separated site statuses
        #[arg(long, default_value = DEFAULT_SITE_STATUS)]
        status: String,
    },

    /// Show site details
    Details {
        /// Site ID
        site: u64,
    },

    /// Show the first and last dates with production data
    DataPeriod {
        /// Site ID
        site: u64,
    },

    /// Energy measurements over a date range
    Energy {
        #[command(flatten)]
        range: DateRange,

        /// Aggregation granularity (DAY when omitted)
        #[arg(long)]
        time_unit: Option<TimeUnit>,
    },

    /// Total energy produced over a date range
    TimeFrameEnergy {
        #[command(flatten)]
        range: DateRange,

        /// Aggregation granularity (DAY when omitted)
        #[arg(long)]
        time_unit: Option<TimeUnit>,
    },

    /// Power measurements in 15 minute resolution
    Power {
        #[command(flatten)]
        window: TimeWindow,
    },

    /// Current, daily, monthly, yearly and lifetime figures
    Overview {
        /// Site ID
        site: u64,
    },

    /// Power per meter over a time window
    PowerDetails {
        #[command(flatten)]
        window: TimeWindow,

        /// Meters to include, comma separated
        #[arg(long, value_delimiter = ',')]
        meters: Vec<String>,
    },

    /// Energy per meter over a time window
    EnergyDetails {
        #[command(flatten)]
        window: TimeWindow,

        /// Meters to include, comma separated
        #[arg(long, value_delimiter = ',')]
        meters: Vec<String>,

        /// Aggregation granularity (DAY when omitted)
        #[arg(long)]
        time_unit: Option<TimeUnit>,
    },

    /// Current power flow between the site's components
    PowerFlow {
        /// Site ID
        site: u64,
    },

    /// Storage (battery) measurements over a time window
    Storage {
        #[command(flatten)]
        window: TimeWindow,

        /// Battery serial numbers, comma separated
        #[arg(long, value_delimiter = ',')]
        serials: Vec<String>,
    },
}

#[derive(Debug, clap::Args)]
struct DateRange {
    /// Site ID
    site: u64,

    /// First day (YYYY-MM-DD)
    start: NaiveDate,

    /// Last day (YYYY-MM-DD)
    end: NaiveDate,
}

#[derive(Debug, clap::Args)]
struct TimeWindow {
    /// Site ID
    site: u64,

    /// Window start ("YYYY-MM-DD hh:mm:ss")
    #[arg(value_parser = parse_date_time)]
    start: NaiveDateTime,

    /// Window end ("YYYY-MM-DD hh:mm:ss")
    #[arg(value_parser = parse_date_time)]
    end: NaiveDateTime,
}

/// Accepts the API's own format as well as ISO 8601 with a `T` separator
fn parse_date_time(value: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("invalid date-time '{value}', expected YYYY-MM-DD hh:mm:ss"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(&CliOverrides {
        api_key: cli.api_key.as_deref(),
        base_url: cli.base_url.as_deref(),
        timeout_secs: cli.timeout,
        max_concurrent_requests: cli.max_concurrent,
        pretty: cli.pretty,
    })?;

    let client = create_client(&merged)?;
    let result = commands::run(&client, &cli.command).await;
    client.close();

    let document = result.context("Request failed")?;
    output::print_json(&document, merged.pretty)
}

/// Create a monitoring client from the merged configuration
fn create_client(merged: &MergedConfig) -> Result<MonitoringClient> {
    MonitoringClient::builder(merged.api_key.clone())
        .base_url(merged.base_url.clone())
        .timeout(merged.timeout)
        .max_concurrent_requests(merged.max_concurrent_requests)
        .build()
        .context("Failed to create monitoring client")
}
