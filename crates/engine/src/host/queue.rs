//! Bounded fetch-admission queue.
//!
//! A FIFO of line addresses with a fixed depth. `try_fetch` accepts while
//! there is room and rejects otherwise; the host retires requests with
//! [`BoundedFetchQueue::pop`] or [`BoundedFetchQueue::drain`] as its memory
//! model completes them.

use std::collections::VecDeque;

use super::FetchQueue;

/// Fixed-depth FIFO of pending line fetches.
#[derive(Debug, Clone)]
pub struct BoundedFetchQueue {
    pending: VecDeque<u64>,
    depth: usize,
    accepted: u64,
    rejected: u64,
}

impl BoundedFetchQueue {
    /// Creates an empty queue holding at most `depth` requests.
    pub fn new(depth: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(depth),
            depth,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Retires the oldest pending request.
    pub fn pop(&mut self) -> Option<u64> {
        self.pending.pop_front()
    }

    /// Retires up to `n` requests, oldest first.
    pub fn drain(&mut self, n: usize) -> Vec<u64> {
        let n = n.min(self.pending.len());
        self.pending.drain(..n).collect()
    }

    /// Pending requests, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = u64> + '_ {
        self.pending.iter().copied()
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no request is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the queue would reject the next request.
    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.depth
    }

    /// Total requests accepted since creation.
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Total requests rejected since creation.
    pub const fn rejected(&self) -> u64 {
        self.rejected
    }
}

impl FetchQueue for BoundedFetchQueue {
    fn try_fetch(&mut self, line_addr: u64) -> bool {
        if self.is_full() {
            self.rejected += 1;
            return false;
        }
        self.pending.push_back(line_addr);
        self.accepted += 1;
        true
    }
}
