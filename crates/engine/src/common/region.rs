//! Region addressing.
//!
//! A region is an aligned, power-of-two span of the address space. Every
//! structure in the engine works in terms of a region *tag* (the address with
//! the in-region bits cleared) and a line *offset* (the line index within the
//! region). This module provides the conversions between the three forms:
//! 1. **Tag:** `addr & !region_mask`.
//! 2. **Offset:** `(addr & region_mask) >> line_shift`.
//! 3. **Line address:** `base + (offset << line_shift)`.

use crate::common::error::ConfigError;
use crate::common::pattern::Pattern;

/// Immutable region/line geometry derived from configuration.
///
/// Both sizes are powers of two and `region_bytes >= line_bytes`, so every
/// conversion is a mask or a shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionGeometry {
    region_mask: u64,
    line_shift: u32,
    lines_per_region: u32,
}

impl RegionGeometry {
    /// Builds the geometry for the given region and line sizes.
    ///
    /// # Arguments
    ///
    /// * `region_bytes` - Region size in bytes (power of two).
    /// * `line_bytes` - Cache line size in bytes (power of two, `<= region_bytes`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either size is not a power of two, the region
    /// is smaller than a line, or a region holds more lines than a [`Pattern`]
    /// has bits.
    pub fn new(region_bytes: u64, line_bytes: u64) -> Result<Self, ConfigError> {
        if !region_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "region_bytes",
                value: region_bytes,
            });
        }
        if !line_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "line_bytes",
                value: line_bytes,
            });
        }
        if region_bytes < line_bytes {
            return Err(ConfigError::RegionSmallerThanLine {
                region_bytes,
                line_bytes,
            });
        }

        let lines = region_bytes / line_bytes;
        if lines > u64::from(Pattern::BITS) {
            return Err(ConfigError::TooManyLines {
                lines,
                max: Pattern::BITS,
            });
        }

        Ok(Self {
            region_mask: region_bytes - 1,
            line_shift: line_bytes.trailing_zeros(),
            lines_per_region: lines as u32,
        })
    }

    /// Returns the region tag of `addr` (low region bits cleared).
    #[inline(always)]
    pub const fn region_tag(&self, addr: u64) -> u64 {
        addr & !self.region_mask
    }

    /// Returns the line index of `addr` within its region.
    #[inline(always)]
    pub const fn offset(&self, addr: u64) -> u32 {
        ((addr & self.region_mask) >> self.line_shift) as u32
    }

    /// Reconstructs the line address for `offset` within the region at `region_base`.
    #[inline(always)]
    pub const fn line_address(&self, region_base: u64, offset: u32) -> u64 {
        region_base + ((offset as u64) << self.line_shift)
    }

    /// Aligns `addr` down to the start of its line.
    #[inline(always)]
    pub const fn line_align(&self, addr: u64) -> u64 {
        addr & !((1u64 << self.line_shift) - 1)
    }

    /// Number of lines in one region.
    pub const fn lines_per_region(&self) -> u32 {
        self.lines_per_region
    }

    /// Region size in bytes.
    pub const fn region_bytes(&self) -> u64 {
        self.region_mask + 1
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> u64 {
        1 << self.line_shift
    }
}
