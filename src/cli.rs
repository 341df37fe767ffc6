//! Command-line interface for the postal extremes processor
//!
//! Defines the argument surface with the clap derive API, layers the
//! arguments over the loaded configuration, and owns logging setup and the
//! end-of-run summary.

use crate::config::ExtremesConfig;
use crate::error::{PostalError, Result};
use crate::models::{ProcessingStats, ReportFormat};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

/// Per-region geographic extremes for a postal code dataset
///
/// Reads a delimited file of postal codes with coordinates, prints a flat
/// listing of every record and a table naming, for each region, the codes
/// lying furthest east, west, north and south.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "postal-extremes",
    version,
    about = "Find the easternmost, westernmost, northernmost and southernmost postal codes per region"
)]
pub struct Args {
    /// Postal dataset to read
    ///
    /// Each line holds code, place, region, county, latitude and longitude.
    /// Defaults to data/us_postal_codes.csv when neither this argument nor a
    /// config file names an input.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the extremes table to this file instead of stdout
    #[arg(short = 'e', long = "extremes-output", value_name = "FILE")]
    pub extremes_output: Option<PathBuf>,

    /// Write the flat listing to this file instead of stdout
    #[arg(short = 'l', long = "listing-output", value_name = "FILE")]
    pub listing_output: Option<PathBuf>,

    /// Also export every normalized record as a fixed-width line
    #[arg(short = 'r', long = "records-output", value_name = "FILE")]
    pub records_output: Option<PathBuf>,

    /// Report layout
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<ReportFormat>,

    /// Input field delimiter
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Treat the first line as data rather than a header
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Path to a JSON configuration file
    ///
    /// If not specified, looks for postal-extremes/config.json in the
    /// platform config directory.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors; no progress spinner or summary
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Load configuration using the layered approach (defaults -> file -> args)
    pub fn load_config(&self) -> Result<ExtremesConfig> {
        let config = ExtremesConfig::load_layered(self.config_file.as_deref())?;
        let config = self.apply_overrides(config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: ExtremesConfig) -> ExtremesConfig {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(path) = &self.extremes_output {
            config.extremes_output = Some(path.clone());
        }
        if let Some(path) = &self.listing_output {
            config.listing_output = Some(path.clone());
        }
        if let Some(path) = &self.records_output {
            config.records_output = Some(path.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.no_header {
            config.skip_header = false;
        }
        if self.quiet {
            config.show_progress = false;
        }
        config
    }
}

/// Set up structured logging on stderr based on CLI arguments
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("postal_extremes={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| PostalError::configuration(format!("failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Print the end-of-run summary to stderr so it never mixes with the reports
pub fn print_summary(stats: &ProcessingStats) {
    eprintln!();
    eprintln!("{}", "Postal extremes complete".bright_green().bold());
    eprintln!(
        "   Records processed: {}",
        stats.records_processed.to_string().bright_yellow()
    );
    eprintln!("   Regions: {}", stats.regions.to_string().bright_yellow());
    if stats.blank_lines > 0 {
        eprintln!("   Blank lines skipped: {}", stats.blank_lines);
    }
    eprintln!(
        "   Processing time: {}ms ({:.0} records/s)",
        stats.processing_time_ms,
        stats.throughput()
    );

    let outputs = [
        ("Extremes", &stats.extremes_output),
        ("Listing", &stats.listing_output),
        ("Records", &stats.records_output),
    ];
    for (label, path) in outputs {
        if let Some(path) = path {
            eprintln!("   {}: {}", label, path.display().to_string().cyan());
        }
    }
}
