use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole conflation run. Per-record data problems are
/// never errors; they become classifications.
#[derive(Debug, Error)]
pub enum ConflateError {
    /// A stack key produced by the stacking stage does not decode.
    #[error("Malformed stack id {id:?} while classifying as {status}")]
    MalformedStackId { id: String, status: String },
    #[error("Failed to parse {what}: {source}")]
    Snapshot {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConflateError {
    pub fn snapshot(what: &str, source: serde_json::Error) -> Self {
        ConflateError::Snapshot {
            what: what.to_string(),
            source,
        }
    }

    /// Registry record ID attached to a fail-fast error, if any.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            ConflateError::MalformedStackId { id, .. } => Some(id),
            _ => None,
        }
    }
}

pub type ConflateResult<T> = Result<T, ConflateError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
