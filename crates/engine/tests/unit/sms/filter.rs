//! Filter Table Tests.
//!
//! Verifies that a region stays filtered while only one offset has been seen,
//! that a second distinct offset promotes it with the first access's PC, and
//! that capacity pressure forgets entries without learning from them.

use rstest::rstest;
use smsim_core::common::Pattern;
use smsim_core::sms::filter::{FilterEntry, FilterOutcome, FilterTable};

use crate::common::harness::{config, engine, line, open_queue, region_base, small_engine};

// ══════════════════════════════════════════════════════════
// 1. Single-offset stability
// ══════════════════════════════════════════════════════════

/// Re-touching the same offset never duplicates the entry or promotes it.
#[rstest]
#[case(1)]
#[case(2)]
#[case(17)]
fn repeated_offset_stays_filtered(#[case] repeats: usize) {
    let mut sms = small_engine();
    let mut q = open_queue();
    for i in 0..repeats {
        sms.train(line(0, 9), 0x400 + i as u64 * 4, &mut q);
    }
    assert_eq!(sms.filter_len(), 1);
    assert_eq!(sms.accumulation_len(), 0);
    assert_eq!(sms.stats().ft_inserts, 1);
    assert_eq!(sms.stats().ft_same_offset, repeats as u64 - 1);
}

/// The stored PC and offset belong to the first access.
#[test]
fn first_access_is_recorded() {
    let mut ft = FilterTable::new(4);
    let _ = ft.train(0x2000, 4, 0x111, 1);
    let _ = ft.train(0x2000, 4, 0x222, 2);
    let entries: Vec<FilterEntry> = ft.entries().copied().collect();
    assert_eq!(
        entries,
        vec![FilterEntry {
            tag: 0x2000,
            pc: 0x111,
            offset: 4
        }]
    );
}

// ══════════════════════════════════════════════════════════
// 2. Promotion
// ══════════════════════════════════════════════════════════

/// Offsets A then B of an unseen region yield one AT entry with exactly bits
/// A and B, attributed to the PC of the first access.
#[test]
fn second_offset_promotes_to_accumulation() {
    let mut sms = small_engine();
    let mut q = open_queue();
    sms.train(line(3, 2), 0xA00, &mut q);
    sms.train(line(3, 11), 0xB00, &mut q);

    assert_eq!(sms.filter_len(), 0);
    assert_eq!(sms.accumulation_len(), 1);
    let entry = sms
        .accumulation_table()
        .get(region_base(3))
        .copied()
        .unwrap();
    assert_eq!(entry.pc, 0xA00);
    assert_eq!(entry.offset, 2);
    assert_eq!(entry.pattern, Pattern::from_iter([2, 11]));
    assert_eq!(sms.stats().ft_promotions, 1);
}

/// A promoted region is never also filtered.
#[test]
fn promoted_region_leaves_filter_table() {
    let mut sms = small_engine();
    let mut q = open_queue();
    sms.train(line(1, 0), 0x400, &mut q);
    sms.train(line(1, 1), 0x400, &mut q);
    sms.train(line(1, 2), 0x400, &mut q);
    assert!(!sms.filter_table().contains(region_base(1)));
    assert!(sms.accumulation_table().contains(region_base(1)));
    assert_eq!(sms.stats().at_hits, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Capacity and discard
// ══════════════════════════════════════════════════════════

/// A full table forgets its least recently touched entry and learns nothing.
#[test]
fn full_table_forgets_lru_silently() {
    let mut ft = FilterTable::new(2);
    let _ = ft.train(0x1000, 0, 0x1, 1);
    let _ = ft.train(0x2000, 0, 0x2, 2);
    // Refresh the first region so the second is now the oldest.
    assert_eq!(ft.train(0x1000, 0, 0x1, 3), FilterOutcome::FoundSame);

    let outcome = ft.train(0x3000, 0, 0x3, 4);
    assert_eq!(
        outcome,
        FilterOutcome::Inserted {
            evicted: Some(FilterEntry {
                tag: 0x2000,
                pc: 0x2,
                offset: 0
            })
        }
    );
    assert_eq!(ft.len(), 2);
    assert!(ft.contains(0x1000));
    assert!(ft.contains(0x3000));
}

/// A forgotten region starts over: its next access is a fresh insert, not a
/// promotion, and no pattern reaches the PHT.
#[test]
fn forgotten_region_is_not_promoted() {
    let mut sms = engine(config(1, 4, 16, 4));
    let mut q = open_queue();
    sms.train(line(0, 1), 0x400, &mut q);
    sms.train(line(1, 1), 0x400, &mut q);
    sms.train(line(0, 5), 0x400, &mut q);

    assert_eq!(sms.accumulation_len(), 0);
    assert_eq!(sms.history_len(), 0);
    assert_eq!(sms.stats().ft_evictions, 2);
}

#[test]
fn discard_reports_presence() {
    let mut ft = FilterTable::new(4);
    let _ = ft.train(0x1000, 3, 0x1, 1);
    assert!(ft.discard(0x1000));
    assert!(!ft.discard(0x1000));
    assert!(ft.is_empty());
}
