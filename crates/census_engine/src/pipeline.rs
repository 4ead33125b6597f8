use std::path::{Path, PathBuf};

use census_logging::census_info;

use crate::aggregate::{Aggregator, CountyFailure};
use crate::export::{ExportError, TabularWriter};
use crate::geography::CensusClient;
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetching states failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("writing output failed: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub state_count: usize,
    pub county_count: usize,
    pub total: usize,
    pub county_failures: Vec<CountyFailure>,
    pub output_path: PathBuf,
}

/// Fetch everything, then write it to `output`. Nothing is written unless
/// the state list was fetched.
pub async fn run_pipeline(client: &CensusClient, output: &Path) -> Result<RunSummary, PipelineError> {
    census_info!("Fetching US Census population data...");
    let aggregate = Aggregator::new(client).run().await?;
    let summary = TabularWriter.write(output, &aggregate.records)?;

    Ok(RunSummary {
        state_count: aggregate.state_count,
        county_count: aggregate.county_count,
        total: summary.row_count,
        county_failures: aggregate.county_failures,
        output_path: summary.output_path,
    })
}
