//! Pattern History Table Tests.
//!
//! Verifies (PC, offset) keying, in-place overwrite of an existing key, LRU
//! eviction, and the pattern-size histogram recorded on each commit.

use smsim_core::common::Pattern;
use smsim_core::sms::history::{HistoryEntry, HistoryInsert, PatternHistoryTable};

use crate::common::harness::{config, engine, learn};

#[test]
fn free_slots_fill_first() {
    let mut pht = PatternHistoryTable::new(3);
    for (i, pc) in [0x10, 0x20, 0x30].into_iter().enumerate() {
        assert_eq!(
            pht.insert(pc, 0, Pattern::from_bits(0b11), i as u64),
            HistoryInsert::Filled
        );
    }
    assert_eq!(pht.len(), 3);
}

/// A lookup hit refreshes the entry, so a different one is evicted next.
#[test]
fn lookup_hit_protects_from_eviction() {
    let mut pht = PatternHistoryTable::new(2);
    let _ = pht.insert(0x10, 1, Pattern::from_bits(0b11), 1);
    let _ = pht.insert(0x20, 1, Pattern::from_bits(0b101), 2);
    assert!(pht.find(0x10, 1, 3).is_some());

    assert_eq!(
        pht.insert(0x30, 1, Pattern::from_bits(0b1001), 4),
        HistoryInsert::Evicted(HistoryEntry {
            pc: 0x20,
            offset: 1,
            pattern: Pattern::from_bits(0b101),
        })
    );
    assert!(pht.peek(0x10, 1).is_some());
    assert!(pht.peek(0x20, 1).is_none());
}

/// A miss does not disturb replacement order.
#[test]
fn lookup_miss_does_not_touch() {
    let mut pht = PatternHistoryTable::new(2);
    let _ = pht.insert(0x10, 1, Pattern::from_bits(0b11), 1);
    let _ = pht.insert(0x20, 1, Pattern::from_bits(0b11), 2);
    assert!(pht.find(0x10, 2, 3).is_none());
    assert!(matches!(
        pht.insert(0x30, 1, Pattern::from_bits(0b11), 4),
        HistoryInsert::Evicted(HistoryEntry { pc: 0x10, .. })
    ));
}

/// Learning the same trigger twice keeps one entry with the newer footprint.
#[test]
fn relearning_trigger_overwrites() {
    let mut sms = engine(config(8, 4, 16, 4));
    learn(&mut sms, 0, 0x500, &[3, 4]);
    learn(&mut sms, 1, 0x500, &[3, 7, 8]);

    assert_eq!(sms.history_len(), 1);
    assert_eq!(
        sms.history_table().peek(0x500, 3),
        Some(Pattern::from_iter([3, 7, 8]))
    );
    assert_eq!(sms.stats().pht_inserts, 2);
    assert_eq!(sms.stats().pht_overwrites, 1);
}

/// The PHT never grows beyond its capacity however many triggers are learned.
#[test]
fn capacity_is_respected() {
    let mut sms = engine(config(8, 4, 4, 4));
    for region in 0..12 {
        learn(&mut sms, region, 0x1000 + region * 4, &[0, 1]);
    }
    assert_eq!(sms.history_len(), 4);
    assert_eq!(sms.stats().pht_evictions, 8);
}

/// Each commit records the number of lines in its pattern.
#[test]
fn commits_feed_pattern_size_histogram() {
    let mut sms = engine(config(8, 4, 16, 4));
    learn(&mut sms, 0, 0x500, &[0, 1]);
    learn(&mut sms, 1, 0x600, &[0, 1, 2, 3]);
    learn(&mut sms, 2, 0x700, &[5, 6]);

    let sizes = &sms.stats().pattern_sizes;
    assert_eq!(sizes.len(), 33);
    assert_eq!(sizes[2], 2);
    assert_eq!(sizes[4], 1);
    assert_eq!(sizes.iter().sum::<u64>(), 3);
}
