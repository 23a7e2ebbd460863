//! Spatial Memory Streaming (SMS) prefetch engine.
//!
//! This crate implements the SMS cache-line prefetcher (Somogyi et al., ISCA'06):
//! 1. **Addressing:** Region tags, in-region line offsets, and line reconstruction.
//! 2. **Learning:** Filter, Accumulation, and Pattern History tables with LRU replacement.
//! 3. **Prediction:** A Prediction Register File drained by a round-robin fetch scheduler.
//! 4. **Host interface:** Timestamp and fetch-admission traits the engine is driven through.
//! 5. **Configuration and statistics:** Serde-backed config and counters for reporting.

/// Common types (region geometry, spatial patterns, errors).
pub mod common;
/// Engine configuration (defaults, validation, JSON loading).
pub mod config;
/// Host-facing interfaces (clock, fetch admission) and reference implementations.
pub mod host;
/// The SMS prefetcher and its internal tables.
pub mod sms;
/// Prefetcher statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `SmsConfig::default()` or `SmsConfig::from_json`.
pub use crate::config::SmsConfig;
/// Host fetch-admission queue trait.
pub use crate::host::FetchQueue;
/// The prefetch engine; one instance per instruction stream.
pub use crate::sms::SmsPrefetcher;
/// Counters exposed by the engine.
pub use crate::stats::SmsStats;
