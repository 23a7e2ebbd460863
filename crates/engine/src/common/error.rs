//! Configuration error definitions.
//!
//! The engine has no recoverable run-time errors: lookup failures are ordinary
//! branches and full tables resolve through eviction. Everything that can go
//! wrong is caught once, when a configuration is loaded or an engine is built.

use thiserror::Error;

/// Errors raised while loading or validating an [`SmsConfig`](crate::config::SmsConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A table was configured with no entries.
    ///
    /// Every structure must be able to hold at least one entry, otherwise
    /// replacement would have nothing to evict.
    #[error("{table} capacity must be at least 1")]
    ZeroCapacity {
        /// Name of the offending table (`"ft_size"`, `"at_size"`, ...).
        table: &'static str,
    },

    /// A size that is used as a mask/shift is not a power of two.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// The region is smaller than a single line.
    #[error("region size ({region_bytes} B) is smaller than line size ({line_bytes} B)")]
    RegionSmallerThanLine {
        /// Configured region size in bytes.
        region_bytes: u64,
        /// Configured line size in bytes.
        line_bytes: u64,
    },

    /// A region holds more lines than a pattern has bits.
    #[error("{lines} lines per region exceeds the {max}-bit pattern width")]
    TooManyLines {
        /// Lines per region implied by the configuration.
        lines: u64,
        /// Pattern width in bits.
        max: u32,
    },

    /// The JSON configuration could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
