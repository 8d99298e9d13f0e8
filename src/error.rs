//! Error types for the table loader, state store, cost lookup, and pipeline wiring
//!
//! None of these ever reach the applicant. Missing inputs are not errors at all:
//! readers default to zero or empty and the cascade keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while querying the cost-of-attendance source
#[derive(Debug, Error)]
pub enum CostLookupError {
    /// Network or HTTP status failure
    #[error("cost lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a body we could not decode
    #[error("cost lookup returned a malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The background fetch task panicked or was cancelled
    #[error("cost lookup task did not complete: {0}")]
    Task(String),
}

/// Failure while loading rate table or cost table CSV files
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row in {file}: {message}")]
    Invalid { file: String, message: String },
}

impl TableError {
    pub(crate) fn invalid(file: &str, message: impl Into<String>) -> Self {
        TableError::Invalid {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

/// Failure while persisting or restoring session form state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Stage wiring that would read a calculated field before it is produced
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("stage `{stage}` reads `{field}` before any earlier stage produces it")]
    UnorderedDependency { stage: &'static str, field: &'static str },

    #[error("field `{field}` is produced by both `{first}` and `{second}`")]
    DuplicateProducer {
        field: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("stage `{stage}` writes `{field}`, which is not a calculated field")]
    NotCalculated { stage: &'static str, field: &'static str },

    #[error("stage `{stage}` declares unknown field `{field}`")]
    UnknownField { stage: &'static str, field: &'static str },
}
