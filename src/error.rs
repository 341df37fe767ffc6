//! Error handling for postal extremes processing.
//!
//! Field buffer contract violations live in [`FieldBufferError`]; everything
//! a run can fail with is wrapped by [`PostalError`].

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the fixed-width field buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldBufferError {
    #[error("Invalid field schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("Field schema exhausted: cannot {operation} beyond {field_count} fields")]
    SchemaExhausted {
        operation: &'static str,
        field_count: usize,
    },

    #[error(
        "Buffer overflow: {requested} bytes at offset {offset} exceeds capacity {capacity}"
    )]
    BufferOverflow {
        offset: usize,
        requested: usize,
        capacity: usize,
    },

    #[error("Field {field} does not hold valid UTF-8 text")]
    InvalidEncoding { field: usize },
}

impl FieldBufferError {
    /// Create an invalid schema error
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PostalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open input file: {path}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output file: {path}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record buffer error on line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: FieldBufferError,
    },

    #[error("Field buffer error: {0}")]
    Buffer(#[from] FieldBufferError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PostalError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Attach the input line number to a buffer failure
    pub fn record(line: usize, source: FieldBufferError) -> Self {
        Self::Record { line, source }
    }
}

pub type Result<T> = std::result::Result<T, PostalError>;
