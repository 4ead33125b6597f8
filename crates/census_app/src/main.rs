mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use census_engine::{run_pipeline, CensusClient, ReqwestFetcher};
use census_logging::{census_error, census_info};

use crate::config::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    census_logging::initialize(cli.log_destination(), cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            census_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Requests are issued one after another; a single thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let fetcher = ReqwestFetcher::new(cli.fetch_settings()).context("failed to build HTTP client")?;
    let mut client = CensusClient::new(Arc::new(fetcher), cli.base_url.clone());
    if let Some(key) = &cli.api_key {
        client = client.with_api_key(key.clone());
    }

    let summary = runtime.block_on(run_pipeline(&client, &cli.output))?;
    census_info!(
        "Successfully wrote data to {}",
        summary.output_path.display()
    );
    Ok(())
}
