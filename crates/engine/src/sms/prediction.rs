//! Prediction Register File (PRF) and fetch scheduler.
//!
//! Each register holds one predicted region: its base address and the lines
//! not yet requested. The scheduler walks the live registers round-robin,
//! issuing the lowest outstanding line of each through the host's
//! [`FetchQueue`]. The first rejection ends the pass; the remaining lines wait
//! for the next driving event.
//!
//! Registers are kept dense: when one runs out of lines it is swapped with the
//! last live register and dropped. When the file is full, a new prediction
//! replaces the register with the oldest insertion time.

use crate::common::pattern::Pattern;
use crate::common::region::RegionGeometry;
use crate::host::FetchQueue;

/// One outstanding prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictionRegister {
    /// Base address (tag) of the predicted region.
    pub base: u64,
    /// Offsets not yet issued. Never empty while the register is live.
    pub pattern: Pattern,
    /// Timestamp at which the prediction was inserted.
    pub inserted_at: u64,
}

/// Summary of one scheduling pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IssueReport {
    /// Fetches accepted by the queue.
    pub issued: usize,
    /// Registers emptied (and removed) during the pass.
    pub completed: usize,
    /// Whether the pass stopped on a rejected fetch.
    pub rejected: bool,
}

/// Prediction Register File state.
#[derive(Clone, Debug)]
pub struct PredictionRegisterFile {
    live: Vec<PredictionRegister>,
    capacity: usize,
    cursor: usize,
}

impl PredictionRegisterFile {
    /// Creates an empty register file with room for `capacity` predictions.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "prediction register file built with zero capacity");
        Self {
            live: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Queues a prediction for the region at `base`.
    ///
    /// Appends while below capacity; otherwise replaces the register with the
    /// oldest insertion timestamp. An empty pattern predicts nothing and is
    /// ignored.
    ///
    /// # Returns
    ///
    /// The displaced register, if one was replaced.
    pub fn insert(&mut self, base: u64, pattern: Pattern, now: u64) -> Option<PredictionRegister> {
        if pattern.is_empty() {
            return None;
        }
        let register = PredictionRegister {
            base,
            pattern,
            inserted_at: now,
        };
        if self.live.len() < self.capacity {
            self.live.push(register);
            return None;
        }

        let oldest = self
            .live
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.inserted_at)
            .map(|(idx, _)| idx)?;
        Some(std::mem::replace(&mut self.live[oldest], register))
    }

    /// Consumes the lowest outstanding offset of the register at `idx`.
    ///
    /// If that was its last offset, the register is removed by swapping in the
    /// last live register.
    ///
    /// # Returns
    ///
    /// `true` if the register was removed.
    pub fn discard_first(&mut self, idx: usize) -> bool {
        let Some(register) = self.live.get_mut(idx) else {
            return false;
        };
        register.pattern.clear_lowest();
        if register.pattern.is_empty() {
            let _ = self.live.swap_remove(idx);
            true
        } else {
            false
        }
    }

    /// Runs one round-robin scheduling pass.
    ///
    /// Starting at the persistent cursor, each live register gets at most one
    /// turn: its lowest outstanding line is offered to `queue`. An accepted
    /// fetch consumes that offset and moves the cursor on; a rejected fetch
    /// ends the pass with nothing consumed.
    pub fn fetch_next_preds<Q: FetchQueue + ?Sized>(
        &mut self,
        geometry: &RegionGeometry,
        queue: &mut Q,
    ) -> IssueReport {
        let mut report = IssueReport::default();
        let start = self.cursor;
        let mut wrapped = false;
        // Registers are only removed after their turn, so this is also the
        // number of registers still waiting for one.
        let mut turns = self.live.len();

        while turns > 0 {
            if self.cursor >= self.live.len() {
                self.cursor = 0;
                wrapped = true;
            }
            let register = self.live[self.cursor];
            let Some(offset) = register.pattern.lowest() else {
                unreachable!("empty prediction register left live");
            };
            let line = geometry.line_address(register.base, offset);
            if !queue.try_fetch(line) {
                report.rejected = true;
                break;
            }
            report.issued += 1;
            turns -= 1;

            if self.discard_first(self.cursor) {
                report.completed += 1;
                // The register swapped into this slot came from the tail. Before
                // wrapping the tail has not had its turn yet; after wrapping it
                // has, unless the file shrank below where the pass began.
                if wrapped && self.live.len() >= start {
                    self.cursor += 1;
                }
            } else {
                self.cursor += 1;
            }
        }
        report
    }

    /// Live registers, densely packed.
    pub fn registers(&self) -> &[PredictionRegister] {
        &self.live
    }

    /// Number of live registers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no prediction is outstanding.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Configured capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every outstanding prediction.
    pub fn clear(&mut self) {
        self.live.clear();
        self.cursor = 0;
    }
}
