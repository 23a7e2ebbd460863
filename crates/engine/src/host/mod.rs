//! Host-facing interfaces.
//!
//! The engine does not own simulated time or the downstream request queue; the
//! host supplies both through the traits in this module:
//! 1. **Clock:** A non-decreasing logical timestamp, read on every table touch.
//! 2. **FetchQueue:** Non-blocking single-line fetch admission with backpressure.
//!
//! Reference implementations are provided for hosts that have nothing better
//! to plug in, and for tests.

/// Logical timestamp sources.
pub mod clock;

/// Bounded fetch-admission queue.
pub mod queue;

pub use clock::{Clock, LogicalClock};
pub use queue::BoundedFetchQueue;

/// Single-line fetch admission.
///
/// Models enqueueing a prefetch request into a bounded downstream queue
/// (an L2 request queue, a memory controller, ...). Implementations must not
/// block.
pub trait FetchQueue {
    /// Attempts to enqueue a fetch for the line at `line_addr`.
    ///
    /// # Returns
    ///
    /// `true` if the request was accepted, `false` if the queue is currently
    /// full. A rejection is backpressure, not an error; the engine stops its
    /// current scheduling pass and tries again on the next driving event.
    fn try_fetch(&mut self, line_addr: u64) -> bool;
}

impl<Q: FetchQueue + ?Sized> FetchQueue for &mut Q {
    fn try_fetch(&mut self, line_addr: u64) -> bool {
        (**self).try_fetch(line_addr)
    }
}
