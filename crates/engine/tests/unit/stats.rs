//! # Statistics Tests
//!
//! Counter accounting across a full learn-and-replay cycle, derived rates,
//! and the serialized report shape.

use pretty_assertions::assert_eq;
use smsim_core::SmsStats;

use crate::common::harness::{closed_queue, learn, line, open_queue, small_engine};

#[test]
fn test_learn_and_replay_accounting() {
    let mut sms = small_engine();
    learn(&mut sms, 0, 0x10, &[1, 2, 3]);

    let mut q = open_queue();
    sms.train(line(1, 1), 0x10, &mut q);
    let _ = sms.issue_prefetches(&mut q);
    let _ = sms.issue_prefetches(&mut q);
    sms.train(line(1, 1), 0x10, &mut q);
    sms.end_generation(line(1, 0), 0x10, &mut q);

    let mut expected = SmsStats::new(32);
    expected.accesses = 5;
    expected.generation_ends = 2;
    expected.at_hits = 1;
    expected.ft_inserts = 2;
    expected.ft_same_offset = 1;
    expected.ft_promotions = 1;
    expected.ft_discards = 1;
    expected.at_discards = 1;
    expected.pht_inserts = 1;
    expected.pht_hits = 1;
    expected.pht_misses = 1;
    expected.predictions = 1;
    expected.predictions_completed = 1;
    expected.prefetches_issued = 3;
    expected.pattern_sizes[3] = 1;

    assert_eq!(*sms.stats(), expected);
}

#[test]
fn test_rejections_count_halted_passes() {
    let mut sms = small_engine();
    learn(&mut sms, 0, 0x10, &[1, 2]);
    let mut closed = closed_queue();
    sms.train(line(1, 1), 0x10, &mut closed);
    let _ = sms.issue_prefetches(&mut closed);

    assert_eq!(sms.stats().fetch_rejections, 2);
    assert_eq!(sms.stats().prefetches_issued, 0);
}

/// A pass over an empty register file offers nothing, so nothing is rejected.
#[test]
fn test_idle_pass_is_not_a_rejection() {
    let mut sms = small_engine();
    assert_eq!(sms.issue_prefetches(&mut closed_queue()), 0);
    assert_eq!(sms.stats().fetch_rejections, 0);
}

#[test]
fn test_hit_rate() {
    let mut sms = small_engine();
    learn(&mut sms, 0, 0x10, &[1, 2]);
    let mut q = open_queue();
    sms.train(line(1, 1), 0x10, &mut q);
    sms.train(line(2, 1), 0x10, &mut q);
    sms.train(line(3, 1), 0x14, &mut q);

    // One miss while learning, two hits, one miss on the unknown PC.
    assert!((sms.stats().pht_hit_rate() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_serializes_every_counter() {
    let mut sms = small_engine();
    learn(&mut sms, 0, 0x10, &[1, 2]);
    let value = serde_json::to_value(sms.stats()).unwrap();

    assert_eq!(value["accesses"], 2);
    assert_eq!(value["pht_inserts"], 1);
    assert_eq!(value["pattern_sizes"].as_array().map(Vec::len), Some(33));
    assert_eq!(value["pattern_sizes"][2], 1);
}

/// The engine's tracing output must not disturb its behaviour at any level.
#[test]
fn test_tracing_enabled_run_matches_silent_run() {
    let run = || {
        let mut sms = small_engine();
        learn(&mut sms, 0, 0x10, &[1, 2, 4]);
        let mut q = closed_queue();
        sms.train(line(1, 1), 0x10, &mut q);
        sms.stats().clone()
    };

    let silent = run();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let traced = tracing::subscriber::with_default(subscriber, run);

    assert_eq!(silent, traced);
}
