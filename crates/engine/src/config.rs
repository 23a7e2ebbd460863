//! Configuration for the SMS prefetch engine.
//!
//! This module defines the single configuration structure the engine is built
//! from. It provides:
//! 1. **Defaults:** Baseline table capacities and region geometry.
//! 2. **Structure:** A flat, serde-deserializable `SmsConfig`.
//! 3. **Validation:** Capacity and geometry checks performed before any table is allocated.
//!
//! Configuration is supplied as JSON (see [`SmsConfig::from_json`]) or built
//! from `SmsConfig::default()` with individual fields overridden.

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::common::region::RegionGeometry;

/// Default configuration constants for the engine.
mod defaults {
    /// Filter Table entries.
    pub const FT_SIZE: usize = 32;

    /// Accumulation Table entries (active generations).
    pub const AT_SIZE: usize = 64;

    /// Pattern History Table entries.
    pub const PHT_SIZE: usize = 2048;

    /// Prediction Register File entries (outstanding predicted regions).
    pub const PRF_SIZE: usize = 16;

    /// Spatial region size in bytes (2 KiB, 32 lines).
    pub const REGION_BYTES: u64 = 2048;

    /// Cache line size in bytes.
    pub const LINE_BYTES: u64 = 64;
}

/// SMS engine configuration.
///
/// # Examples
///
/// ```
/// use smsim_core::config::SmsConfig;
///
/// let json = r#"{ "pht_size": 512, "region_bytes": 4096 }"#;
/// let config = SmsConfig::from_json(json).unwrap();
/// assert_eq!(config.pht_size, 512);
/// assert_eq!(config.ft_size, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmsConfig {
    /// Enable the prefetcher. A disabled engine ignores every entry point.
    #[serde(default = "SmsConfig::default_enabled")]
    pub enabled: bool,

    /// Filter Table capacity.
    #[serde(default = "SmsConfig::default_ft_size")]
    pub ft_size: usize,

    /// Accumulation Table capacity.
    #[serde(default = "SmsConfig::default_at_size")]
    pub at_size: usize,

    /// Pattern History Table capacity.
    #[serde(default = "SmsConfig::default_pht_size")]
    pub pht_size: usize,

    /// Prediction Register File capacity.
    #[serde(default = "SmsConfig::default_prf_size")]
    pub prf_size: usize,

    /// Spatial region size in bytes (power of two).
    #[serde(default = "SmsConfig::default_region_bytes")]
    pub region_bytes: u64,

    /// Cache line size in bytes (power of two, at most `region_bytes`).
    #[serde(default = "SmsConfig::default_line_bytes")]
    pub line_bytes: u64,
}

impl SmsConfig {
    /// Returns the default enable flag.
    const fn default_enabled() -> bool {
        true
    }

    /// Returns the default Filter Table capacity.
    const fn default_ft_size() -> usize {
        defaults::FT_SIZE
    }

    /// Returns the default Accumulation Table capacity.
    const fn default_at_size() -> usize {
        defaults::AT_SIZE
    }

    /// Returns the default Pattern History Table capacity.
    const fn default_pht_size() -> usize {
        defaults::PHT_SIZE
    }

    /// Returns the default Prediction Register File capacity.
    const fn default_prf_size() -> usize {
        defaults::PRF_SIZE
    }

    /// Returns the default region size in bytes.
    const fn default_region_bytes() -> u64 {
        defaults::REGION_BYTES
    }

    /// Returns the default line size in bytes.
    const fn default_line_bytes() -> u64 {
        defaults::LINE_BYTES
    }

    /// Parses a JSON configuration and validates it.
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and any validation
    /// error from [`SmsConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks capacities and geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] for an empty table and the
    /// geometry errors of [`RegionGeometry::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.geometry()?;
        for (table, size) in [
            ("ft_size", self.ft_size),
            ("at_size", self.at_size),
            ("pht_size", self.pht_size),
            ("prf_size", self.prf_size),
        ] {
            if size == 0 {
                return Err(ConfigError::ZeroCapacity { table });
            }
        }
        Ok(())
    }

    /// Derives the region geometry for this configuration.
    ///
    /// # Errors
    ///
    /// See [`RegionGeometry::new`].
    pub fn geometry(&self) -> Result<RegionGeometry, ConfigError> {
        RegionGeometry::new(self.region_bytes, self.line_bytes)
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            ft_size: Self::default_ft_size(),
            at_size: Self::default_at_size(),
            pht_size: Self::default_pht_size(),
            prf_size: Self::default_prf_size(),
            region_bytes: Self::default_region_bytes(),
            line_bytes: Self::default_line_bytes(),
        }
    }
}
