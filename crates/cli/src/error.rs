//! Driver error definitions.

use std::io;

use smsim_core::common::ConfigError;
use thiserror::Error;

use crate::trace::TraceError;

/// Everything that can stop a replay.
#[derive(Error, Debug)]
pub enum CliError {
    /// A file or stream could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path (or `<stdin>`) being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The engine configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A trace line was malformed.
    #[error("{path}:{line}: {source}")]
    Trace {
        /// Trace being replayed.
        path: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: TraceError,
    },

    /// The JSON report could not be encoded.
    #[error("cannot encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CliError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
