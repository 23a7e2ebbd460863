//! Configuration and address builders shared by the engine tests.
//!
//! All tests use 2 KiB regions of 64 B lines (32 offsets per region) unless
//! they say otherwise, and name regions by index so addresses stay readable.

use smsim_core::config::SmsConfig;
use smsim_core::host::BoundedFetchQueue;
use smsim_core::sms::SmsPrefetcher;

/// Line size used by the harness.
pub const LINE_BYTES: u64 = 64;

/// Region size used by the harness.
pub const REGION_BYTES: u64 = 2048;

/// Base of the region with index `region`, placed away from address zero.
pub const fn region_base(region: u64) -> u64 {
    0x1_0000 + region * REGION_BYTES
}

/// Address of line `offset` in region `region`.
pub const fn line(region: u64, offset: u32) -> u64 {
    region_base(region) + offset as u64 * LINE_BYTES
}

/// A configuration with explicit capacities and the harness geometry.
pub fn config(ft: usize, at: usize, pht: usize, prf: usize) -> SmsConfig {
    SmsConfig {
        enabled: true,
        ft_size: ft,
        at_size: at,
        pht_size: pht,
        prf_size: prf,
        region_bytes: REGION_BYTES,
        line_bytes: LINE_BYTES,
    }
}

/// An engine with small tables: FT 8, AT 4, PHT 16, PRF 4.
pub fn small_engine() -> SmsPrefetcher {
    engine(config(8, 4, 16, 4))
}

/// Builds an engine, failing the test on an invalid configuration.
pub fn engine(config: SmsConfig) -> SmsPrefetcher {
    SmsPrefetcher::new(&config).unwrap()
}

/// A queue that accepts everything a test can throw at it.
pub fn open_queue() -> BoundedFetchQueue {
    BoundedFetchQueue::new(1024)
}

/// A queue that rejects every request.
pub fn closed_queue() -> BoundedFetchQueue {
    BoundedFetchQueue::new(0)
}

/// Runs one full generation for `pc` over `offsets` of `region` and ends it,
/// leaving the pattern in the PHT keyed by (`pc`, `offsets[0]`).
pub fn learn(engine: &mut SmsPrefetcher, region: u64, pc: u64, offsets: &[u32]) {
    let mut queue = open_queue();
    for &offset in offsets {
        engine.train(line(region, offset), pc, &mut queue);
    }
    engine.end_generation(line(region, offsets[0]), pc, &mut queue);
}
