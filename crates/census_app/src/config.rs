//! Command-line configuration for the harvester binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use census_engine::{FetchSettings, DEFAULT_BASE_URL, DEFAULT_OUTPUT_FILENAME};
use census_logging::LogDestination;

/// Fetch state and county population from the census API into a CSV file.
#[derive(Debug, Clone, Parser)]
#[command(name = "census_population", version)]
pub struct Cli {
    /// Base URL of the ACS dataset endpoint.
    #[arg(long, env = "CENSUS_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Where to write the CSV.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILENAME)]
    pub output: PathBuf,

    /// Optional census API key, sent as the `key` query parameter.
    #[arg(long, env = "CENSUS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Connect timeout in seconds. No timeout when omitted.
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds. No timeout when omitted.
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: self.connect_timeout.map(Duration::from_secs),
            request_timeout: self.request_timeout.map(Duration::from_secs),
            ..FetchSettings::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
