use std::path::{Path, PathBuf};

use census_logging::census_debug;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::Record;

pub const DEFAULT_OUTPUT_FILENAME: &str = "census_population.csv";

pub const HEADER: [&str; 4] = ["geoid", "name", "type", "population"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub row_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("output path has no file name: {0:?}")]
    InvalidPath(PathBuf),
}

/// Serializes records as comma-separated text with a fixed header.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabularWriter;

impl TabularWriter {
    /// Replaces `path` with the header plus one row per record, in input order.
    pub fn write(&self, path: &Path, records: &[Record]) -> Result<WriteSummary, ExportError> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ExportError::InvalidPath(path.to_path_buf()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let writer = AtomicFileWriter::new(dir);
        let output_path = writer.write_with(filename, |out| -> Result<(), ExportError> {
            let mut csv = csv::Writer::from_writer(out);
            csv.write_record(HEADER)?;
            for record in records {
                csv.write_record([
                    record.identifier(),
                    record.name(),
                    record.kind().as_str(),
                    record.population(),
                ])?;
            }
            csv.flush()?;
            Ok(())
        })?;

        census_debug!("Wrote {} rows to {:?}", records.len(), output_path);
        Ok(WriteSummary {
            row_count: records.len(),
            output_path,
        })
    }
}
