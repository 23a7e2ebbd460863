//! Spatial pattern bitmap.
//!
//! A pattern records which lines of a region were touched during one
//! generation: bit *i* set means the line at offset *i* was accessed. Bit 0 is
//! the lowest offset. Patterns are associative data keyed by (PC, offset), not
//! addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-width (64-bit) line bitmap over a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(u64);

impl Pattern {
    /// Width of a pattern in bits; the maximum number of lines per region.
    pub const BITS: u32 = u64::BITS;

    /// The empty pattern.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw bitmap.
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bitmap.
    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Builds a pattern with only `offset` set.
    #[inline(always)]
    pub const fn single(offset: u32) -> Self {
        Self(1 << offset)
    }

    /// Sets the bit for `offset`.
    #[inline(always)]
    pub const fn set(&mut self, offset: u32) {
        self.0 |= 1 << offset;
    }

    /// Whether the bit for `offset` is set.
    #[inline(always)]
    pub const fn contains(self, offset: u32) -> bool {
        offset < Self::BITS && self.0 & (1 << offset) != 0
    }

    /// Whether no bit is set.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits (lines in the pattern).
    #[inline(always)]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The lowest set offset, or `None` for the empty pattern.
    #[inline(always)]
    pub const fn lowest(self) -> Option<u32> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros())
        }
    }

    /// Clears the lowest set bit.
    #[inline(always)]
    pub const fn clear_lowest(&mut self) {
        self.0 &= self.0.wrapping_sub(1);
    }

    /// Iterates over the set offsets in ascending order.
    pub fn offsets(self) -> impl Iterator<Item = u32> {
        let mut rest = self;
        std::iter::from_fn(move || {
            let next = rest.lowest()?;
            rest.clear_lowest();
            Some(next)
        })
    }
}

impl FromIterator<u32> for Pattern {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut pattern = Self::EMPTY;
        for offset in iter {
            pattern.set(offset);
        }
        pattern
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
