//! Region Geometry Tests.
//!
//! Verifies tag/offset extraction, line reconstruction, and the geometry
//! constraints (powers of two, region at least one line, at most 64 lines).

use rstest::rstest;
use smsim_core::common::{ConfigError, RegionGeometry};

// ══════════════════════════════════════════════════════════
// 1. Tag and offset extraction
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::default_geometry(2048, 64, 0x1_0145, 0x1_0000, 5)]
#[case::page_sized_region(4096, 64, 0xdead_beef, 0xdead_b000, 59)]
#[case::wide_lines(1024, 128, 0x7ff, 0x400, 7)]
#[case::one_line_region(64, 64, 0x1_2345, 0x1_2340, 0)]
fn tag_and_offset(
    #[case] region: u64,
    #[case] line: u64,
    #[case] addr: u64,
    #[case] tag: u64,
    #[case] offset: u32,
) {
    let g = RegionGeometry::new(region, line).unwrap();
    assert_eq!(g.region_tag(addr), tag);
    assert_eq!(g.offset(addr), offset);
}

/// Address zero is an ordinary region tag, not a free-slot sentinel.
#[test]
fn address_zero_is_a_valid_region() {
    let g = RegionGeometry::new(2048, 64).unwrap();
    assert_eq!(g.region_tag(0x40), 0);
    assert_eq!(g.offset(0x40), 1);
}

// ══════════════════════════════════════════════════════════
// 2. Line reconstruction
// ══════════════════════════════════════════════════════════

/// Every offset maps back to the line it came from.
#[test]
fn line_address_inverts_offset() {
    let g = RegionGeometry::new(2048, 64).unwrap();
    let base = 0x8000_0800;
    for offset in 0..g.lines_per_region() {
        let addr = g.line_address(base, offset);
        assert_eq!(g.region_tag(addr), base);
        assert_eq!(g.offset(addr), offset);
        assert_eq!(addr % 64, 0);
    }
}

/// Line reconstruction scales by the line size, not by one byte.
#[test]
fn line_address_uses_line_shift() {
    let g = RegionGeometry::new(4096, 128).unwrap();
    assert_eq!(g.line_address(0x10_0000, 3), 0x10_0000 + 3 * 128);
}

// ══════════════════════════════════════════════════════════
// 3. Geometry validation
// ══════════════════════════════════════════════════════════

#[test]
fn region_must_be_power_of_two() {
    let err = RegionGeometry::new(3000, 64).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NotPowerOfTwo {
            field: "region_bytes",
            value: 3000
        }
    ));
}

#[test]
fn line_must_be_power_of_two() {
    let err = RegionGeometry::new(2048, 48).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NotPowerOfTwo {
            field: "line_bytes",
            ..
        }
    ));
}

#[test]
fn region_must_hold_a_line() {
    let err = RegionGeometry::new(32, 64).unwrap_err();
    assert!(matches!(err, ConfigError::RegionSmallerThanLine { .. }));
}

#[test]
fn region_must_fit_pattern_width() {
    let err = RegionGeometry::new(8192, 64).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::TooManyLines { lines: 128, max: 64 }
    ));
    assert_eq!(
        RegionGeometry::new(4096, 64).unwrap().lines_per_region(),
        64
    );
}
