//! Error type shared by every fallible HashLab operation.
//!
//! Table operations themselves are mostly infallible: search misses are
//! `None` and probing rejections are an [`InsertStatus`](crate::table::InsertStatus),
//! not errors. What remains is construction input, selector parsing and I/O.

use thiserror::Error;

/// Main error type for the hashlab library
#[derive(Error, Debug)]
pub enum HashLabError {
    /// A record code that is not exactly nine decimal digits
    #[error("invalid record code {code:?}: {reason}")]
    InvalidCode {
        /// The rejected input
        code: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Tables need at least one slot
    #[error("invalid capacity {capacity}: tables need at least one slot")]
    InvalidCapacity {
        /// The rejected capacity
        capacity: usize,
    },

    #[error("unknown hash function: {0}")]
    UnknownHashFunction(String),

    #[error("unknown probe strategy: {0}")]
    UnknownProbeStrategy(String),

    /// Malformed line in a dataset or results file
    #[error("invalid data at line {line}: {message}")]
    InvalidData {
        /// 1-based line number
        line: usize,
        /// Error message describing the issue
        message: String,
    },

    /// Configuration or parameter errors
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl HashLabError {
    /// Create an invalid code error
    pub fn invalid_code<S: Into<String>>(code: S, reason: &'static str) -> Self {
        Self::InvalidCode { code: code.into(), reason }
    }

    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(line: usize, message: S) -> Self {
        Self::InvalidData { line, message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, HashLabError>;
