use census_logging::{census_debug, census_info, census_warn};

use crate::geography::CensusClient;
use crate::{FetchError, Record};

/// A state whose county request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyFailure {
    pub state_identifier: String,
    pub state_name: String,
    pub error: FetchError,
}

/// Everything one run collected, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregate {
    pub records: Vec<Record>,
    pub state_count: usize,
    pub county_count: usize,
    pub county_failures: Vec<CountyFailure>,
}

/// Walks states, then the counties of each state, one request at a time.
pub struct Aggregator<'a> {
    client: &'a CensusClient,
}

impl<'a> Aggregator<'a> {
    pub fn new(client: &'a CensusClient) -> Self {
        Self { client }
    }

    /// Fails only when the state list cannot be fetched. A failed county
    /// request is logged and recorded; its state keeps its own record.
    pub async fn run(&self) -> Result<Aggregate, FetchError> {
        let states = self.client.fetch_states().await?;
        census_info!("Fetched {} states", states.len());

        let mut counties = Vec::new();
        let mut county_failures = Vec::new();
        for state in &states {
            match self.client.fetch_counties(state.identifier()).await {
                Ok(batch) => {
                    census_debug!(
                        "Fetched {} counties for {} ({})",
                        batch.len(),
                        state.name(),
                        state.identifier()
                    );
                    counties.extend(batch);
                }
                Err(error) => {
                    census_warn!(
                        "Error fetching counties for {} ({}): {}",
                        state.name(),
                        state.identifier(),
                        error
                    );
                    county_failures.push(CountyFailure {
                        state_identifier: state.identifier().to_string(),
                        state_name: state.name().to_string(),
                        error,
                    });
                }
            }
        }

        let state_count = states.len();
        let county_count = counties.len();
        let mut records = states;
        records.extend(counties);
        census_info!("Total locations: {}", records.len());

        Ok(Aggregate {
            records,
            state_count,
            county_count,
            county_failures,
        })
    }
}
