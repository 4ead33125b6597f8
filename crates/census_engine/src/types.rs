use std::fmt;

/// The two geography levels the harvester knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeographyKind {
    State,
    County,
}

impl GeographyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeographyKind::State => "state",
            GeographyKind::County => "county",
        }
    }
}

impl fmt::Display for GeographyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized population row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    identifier: String,
    name: String,
    kind: GeographyKind,
    population: String,
}

impl Record {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        kind: GeographyKind,
        population: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind,
            population: population.into(),
        }
    }

    /// GeoID: two digits for a state, state + county code for a county.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GeographyKind {
        self.kind
    }

    /// Population exactly as the source reported it.
    pub fn population(&self) -> &str {
        &self.population
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind.is_transport()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// Body is not JSON, or not an array of arrays of strings.
    Format,
}

impl FailureKind {
    /// Everything that went wrong before a body could be interpreted.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FailureKind::Format)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Format => write!(f, "unexpected response format"),
        }
    }
}
