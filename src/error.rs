//! Error types
//!
//! Malformed records never surface as errors: candidates that do not match
//! the grammar are skipped and unparsable pairs are dropped. Errors are
//! reserved for malformed files, unknown field names, worker faults, and
//! the opt-in strict field policy.

use crate::model::Field;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A field-level value rejected under the strict field policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record '{record}': aspect '{key}' has non-integer value '{value}'")]
    InvalidAspect {
        record: String,
        key: String,
        value: String,
    },

    #[error("record '{record}': trigger '{key}' -> '{target}' has an empty side")]
    EmptyTrigger {
        record: String,
        key: String,
        target: String,
    },

    #[error("record '{record}': malformed {block} entry '{text}'")]
    MalformedEntry {
        record: String,
        block: &'static str,
        text: String,
    },

    #[error("record '{record}': lifetime '{value}' is not an integer")]
    InvalidLifetime { record: String, value: String },
}

/// Failures at the named-field accessor boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { field: Field, value: String },

    #[error("invalid filter '{0}' (expected field=text)")]
    InvalidCriterion(String),
}

/// Failures of a concurrent ingestion call
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("ingestion worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Document serialization failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Failures reading or writing document files
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is in use by another process", path.display())]
    Locked { path: PathBuf },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CodecError::Io {
            path: path.into(),
            source,
        }
    }
}
