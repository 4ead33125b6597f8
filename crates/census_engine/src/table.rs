use serde::Deserialize;

use crate::{FailureKind, FetchError};

/// One row of a source response: positional string cells.
///
/// A JSON `null` cell decodes as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<Option<String>>")]
pub struct Row(Vec<String>);

impl From<Vec<Option<String>>> for Row {
    fn from(cells: Vec<Option<String>>) -> Self {
        Self(cells.into_iter().map(Option::unwrap_or_default).collect())
    }
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// The first `N` cells, or `None` when the row is narrower than `N`.
    pub fn columns<const N: usize>(&self) -> Option<[&str; N]> {
        if self.0.len() < N {
            return None;
        }
        Some(std::array::from_fn(|i| self.0[i].as_str()))
    }
}

/// A decoded response: header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseTable {
    header: Option<Row>,
    rows: Vec<Row>,
}

impl ResponseTable {
    /// Decode a JSON array of arrays of strings. The first row is always
    /// treated as the header, whatever it contains.
    pub fn parse(bytes: &[u8]) -> Result<Self, FetchError> {
        let mut rows: Vec<Row> = serde_json::from_slice(bytes)
            .map_err(|err| FetchError::new(FailureKind::Format, err.to_string()))?;
        if rows.is_empty() {
            return Ok(Self::default());
        }
        let header = rows.remove(0);
        Ok(Self {
            header: Some(header),
            rows,
        })
    }

    pub fn header(&self) -> Option<&Row> {
        self.header.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
