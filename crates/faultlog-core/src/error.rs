//! Errors of the internal fallible steps
//!
//! The public logging operations never return these; they are turned
//! into a `false` result and a `tracing` event.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while persisting a rendered line
#[derive(Debug, Error)]
pub enum LogWriteError {
    #[error("failed to create log directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invariant violation found while walking a cause chain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("cause chain refers back to an earlier error at depth {depth}")]
    CyclicCauseChain { depth: usize },

    #[error("cause chain exceeds {max} levels")]
    ChainTooDeep { max: usize },
}

/// Invalid logger configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
