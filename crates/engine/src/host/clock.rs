//! Logical timestamp sources.
//!
//! Replacement in every table compares timestamps only by order, so any
//! non-decreasing counter works. Hosts with a cycle counter can pass a closure
//! reading it; otherwise [`LogicalClock`] ticks once per read.

/// Source of non-decreasing logical timestamps.
pub trait Clock {
    /// Returns the current timestamp. Successive calls never decrease.
    fn now(&mut self) -> u64;
}

/// A counter that advances on every read.
///
/// Every table touch therefore gets a distinct timestamp, which makes LRU
/// ordering exact even when many touches happen within one host cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalClock {
    ticks: u64,
}

impl LogicalClock {
    /// Creates a clock starting at zero.
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }
}

impl Clock for LogicalClock {
    fn now(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }
}

impl<F: FnMut() -> u64> Clock for F {
    fn now(&mut self) -> u64 {
        self()
    }
}
