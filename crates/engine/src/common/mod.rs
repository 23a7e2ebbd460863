//! Common building blocks shared by every SMS structure.
//!
//! 1. **Region Geometry:** Mapping line addresses to region tags and offsets and back.
//! 2. **Patterns:** The per-region line bitmap learned and replayed by the engine.
//! 3. **Error Handling:** Configuration errors reported at construction time.

/// Region addressing (tag, offset, line reconstruction).
pub mod region;

/// Spatial pattern bitmap.
pub mod pattern;

/// Error types.
pub mod error;

pub use error::ConfigError;
pub use pattern::Pattern;
pub use region::RegionGeometry;
