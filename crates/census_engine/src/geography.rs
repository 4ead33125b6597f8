use std::sync::Arc;

use census_logging::{census_debug, census_trace};
use url::Url;

use crate::fetch::Fetcher;
use crate::table::{ResponseTable, Row};
use crate::{FailureKind, FetchError, GeographyKind, Record};

pub const DEFAULT_BASE_URL: &str = "https://api.census.gov/data/2021/acs/acs5";

/// Name and total population (ACS table B01003).
pub const POPULATION_FIELDS: &str = "NAME,B01003_001E";

/// What to ask the source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Geography {
    States,
    CountiesOf { state: String },
}

impl Geography {
    pub fn kind(&self) -> GeographyKind {
        match self {
            Geography::States => GeographyKind::State,
            Geography::CountiesOf { .. } => GeographyKind::County,
        }
    }

    /// Narrowest row that still carries every column we read.
    pub fn min_columns(&self) -> usize {
        match self {
            Geography::States => 3,
            Geography::CountiesOf { .. } => 4,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("get", POPULATION_FIELDS.to_string())];
        match self {
            Geography::States => pairs.push(("for", "state:*".to_string())),
            Geography::CountiesOf { state } => {
                pairs.push(("for", "county:*".to_string()));
                pairs.push(("in", format!("state:{state}")));
            }
        }
        pairs
    }

    /// Columns: NAME, population, state code[, county code].
    pub fn extract(&self, row: &Row) -> Option<Record> {
        match self {
            Geography::States => {
                let [name, population, state] = row.columns::<3>()?;
                Some(Record::new(state, name, GeographyKind::State, population))
            }
            Geography::CountiesOf { .. } => {
                let [name, population, state, county] = row.columns::<4>()?;
                Some(Record::new(
                    format!("{state}{county}"),
                    name.trim(),
                    GeographyKind::County,
                    population,
                ))
            }
        }
    }
}

/// Client for the population endpoint of the census data API.
#[derive(Clone)]
pub struct CensusClient {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    api_key: Option<String>,
}

impl CensusClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn query_url(&self, geography: &Geography) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in geography.query_pairs() {
                query.append_pair(key, &value);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        Ok(url)
    }

    /// Fetch one geography level and normalize its rows.
    ///
    /// The header row is dropped. Rows narrower than
    /// [`Geography::min_columns`] are skipped without failing the call.
    pub async fn fetch_geography(&self, geography: &Geography) -> Result<Vec<Record>, FetchError> {
        let url = self.query_url(geography)?;
        census_debug!("GET {}", redact_key(&url));
        let output = self.fetcher.fetch(url.as_str()).await?;
        census_debug!(
            "Received {} bytes ({}) for {}",
            output.metadata.byte_len,
            output.metadata.content_type.as_deref().unwrap_or("no content type"),
            geography.kind()
        );
        let table = ResponseTable::parse(&output.bytes)?;

        let mut records = Vec::with_capacity(table.rows().len());
        for (index, row) in table.rows().iter().enumerate() {
            match geography.extract(row) {
                Some(record) => records.push(record),
                None => census_trace!(
                    "Skipping {} row {} with {} of {} columns",
                    geography.kind(),
                    index + 1,
                    row.len(),
                    geography.min_columns()
                ),
            }
        }
        Ok(records)
    }

    pub async fn fetch_states(&self) -> Result<Vec<Record>, FetchError> {
        self.fetch_geography(&Geography::States).await
    }

    pub async fn fetch_counties(&self, state_identifier: &str) -> Result<Vec<Record>, FetchError> {
        self.fetch_geography(&Geography::CountiesOf {
            state: state_identifier.to_string(),
        })
        .await
    }
}

fn redact_key(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
