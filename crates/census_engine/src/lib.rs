//! Census engine: fetch state and county population rows, normalize them and
//! write a single CSV.
mod aggregate;
mod export;
mod fetch;
mod geography;
mod persist;
mod pipeline;
mod table;
mod types;

pub use aggregate::{Aggregate, Aggregator, CountyFailure};
pub use export::{ExportError, TabularWriter, WriteSummary, DEFAULT_OUTPUT_FILENAME, HEADER};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use geography::{CensusClient, Geography, DEFAULT_BASE_URL, POPULATION_FIELDS};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{run_pipeline, PipelineError, RunSummary};
pub use table::{ResponseTable, Row};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, GeographyKind, Record};
