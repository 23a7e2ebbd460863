//! Spatial Memory Streaming prefetcher.
//!
//! Learns, per triggering instruction, which lines of a fixed-size region get
//! touched together, and replays that footprint when the same instruction
//! opens a new region. A region moves through three states:
//!
//! 1. **Filtered:** seen at one offset (Filter Table).
//! 2. **Accumulating:** seen at two or more offsets; its pattern is being
//!    recorded (Accumulation Table).
//! 3. **Absent:** the generation ended and its pattern was committed to the
//!    Pattern History Table under the trigger (PC, offset).
//!
//! The first access to an unseen region looks up the Pattern History Table;
//! a hit queues a prediction in the Prediction Register File, which the fetch
//! scheduler drains after every event as far as the host queue allows.
//!
//! One `SmsPrefetcher` serves one instruction stream. Hosts with several cores
//! build one per core.

/// Accumulation Table.
pub mod accumulation;
/// Filter Table.
pub mod filter;
/// Pattern History Table.
pub mod history;
/// Prediction Register File and fetch scheduler.
pub mod prediction;

mod table;

use std::fmt;

use tracing::{debug, trace};

use self::accumulation::{AccumulationEntry, AccumulationTable};
use self::filter::{FilterOutcome, FilterTable};
use self::history::{HistoryInsert, PatternHistoryTable};
use self::prediction::PredictionRegisterFile;
use crate::common::error::ConfigError;
use crate::common::region::RegionGeometry;
use crate::config::SmsConfig;
use crate::host::{Clock, FetchQueue, LogicalClock};
use crate::stats::SmsStats;

/// The SMS prefetch engine.
///
/// Driven synchronously by the host: every entry point runs to completion,
/// including any number of fetch attempts, before returning. `C` supplies the
/// logical timestamps used for replacement.
pub struct SmsPrefetcher<C = LogicalClock> {
    config: SmsConfig,
    geometry: RegionGeometry,
    ft: FilterTable,
    at: AccumulationTable,
    pht: PatternHistoryTable,
    prf: PredictionRegisterFile,
    clock: C,
    stats: SmsStats,
}

impl SmsPrefetcher<LogicalClock> {
    /// Builds an engine that timestamps with an internal [`LogicalClock`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: &SmsConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, LogicalClock::new())
    }
}

impl<C: Clock> SmsPrefetcher<C> {
    /// Builds an engine that reads timestamps from `clock`.
    ///
    /// Allocates the four structures at their configured capacities.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn with_clock(config: &SmsConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = config.geometry()?;
        debug!(
            ft = config.ft_size,
            at = config.at_size,
            pht = config.pht_size,
            prf = config.prf_size,
            region_bytes = config.region_bytes,
            line_bytes = config.line_bytes,
            enabled = config.enabled,
            "sms prefetcher initialised"
        );
        Ok(Self {
            config: config.clone(),
            geometry,
            ft: FilterTable::new(config.ft_size),
            at: AccumulationTable::new(config.at_size),
            pht: PatternHistoryTable::new(config.pht_size),
            prf: PredictionRegisterFile::new(config.prf_size),
            clock,
            stats: SmsStats::new(geometry.lines_per_region()),
        })
    }

    /// Demand miss hook; trains on the access.
    pub fn on_miss<Q: FetchQueue + ?Sized>(&mut self, line_addr: u64, pc: u64, queue: &mut Q) {
        self.train(line_addr, pc, queue);
    }

    /// Demand hit hook; trains on the access.
    pub fn on_hit<Q: FetchQueue + ?Sized>(&mut self, line_addr: u64, pc: u64, queue: &mut Q) {
        self.train(line_addr, pc, queue);
    }

    /// Hit on a previously prefetched line; trains on the access.
    pub fn on_prefetch_hit<Q: FetchQueue + ?Sized>(
        &mut self,
        line_addr: u64,
        pc: u64,
        queue: &mut Q,
    ) {
        self.train(line_addr, pc, queue);
    }

    /// Trains the engine with an access to `line_addr` by the instruction at `pc`,
    /// then runs one scheduling pass.
    ///
    /// # Arguments
    ///
    /// * `line_addr` - Address of the accessed line.
    /// * `pc` - Address of the instruction that caused the access.
    /// * `queue` - Host fetch-admission queue for issued prefetches.
    pub fn train<Q: FetchQueue + ?Sized>(&mut self, line_addr: u64, pc: u64, queue: &mut Q) {
        if !self.config.enabled {
            return;
        }
        self.stats.accesses += 1;
        let tag = self.geometry.region_tag(line_addr);
        let offset = self.geometry.offset(line_addr);

        let now = self.clock.now();
        if self.at.record(tag, offset, now) {
            self.stats.at_hits += 1;
        } else {
            let now = self.clock.now();
            match self.ft.train(tag, offset, pc, now) {
                FilterOutcome::Inserted { evicted } => {
                    self.stats.ft_inserts += 1;
                    if let Some(lost) = evicted {
                        self.stats.ft_evictions += 1;
                        trace!(region = lost.tag, pc = lost.pc, "filter entry forgotten");
                    }
                    self.seed_prediction(tag, offset, pc);
                }
                FilterOutcome::Promote {
                    offset: first_offset,
                    pc: first_pc,
                } => {
                    self.stats.ft_promotions += 1;
                    trace!(
                        region = tag,
                        pc = first_pc,
                        first_offset,
                        second_offset = offset,
                        "generation opened"
                    );
                    let now = self.clock.now();
                    if let Some(evicted) = self.at.insert(tag, first_pc, first_offset, offset, now)
                    {
                        self.stats.at_evictions += 1;
                        self.commit(evicted);
                    }
                }
                FilterOutcome::FoundSame => self.stats.ft_same_offset += 1,
            }
        }

        let _ = self.issue_prefetches(queue);
    }

    /// Signals that the generation for the region containing `line_addr` has
    /// ended, then runs one scheduling pass.
    ///
    /// A region still in the Filter Table is forgotten; an accumulating region
    /// has its pattern committed to the Pattern History Table. No prediction is
    /// ever seeded from here.
    pub fn end_generation<Q: FetchQueue + ?Sized>(
        &mut self,
        line_addr: u64,
        pc: u64,
        queue: &mut Q,
    ) {
        if !self.config.enabled {
            return;
        }
        self.stats.generation_ends += 1;
        let tag = self.geometry.region_tag(line_addr);

        if self.ft.discard(tag) {
            self.stats.ft_discards += 1;
            trace!(region = tag, pc, "filtered region dropped at generation end");
        } else if let Some(entry) = self.at.discard(tag) {
            self.stats.at_discards += 1;
            self.commit(entry);
        }

        let _ = self.issue_prefetches(queue);
    }

    /// Runs one scheduling pass without training.
    ///
    /// Lets a host retry outstanding predictions once its queue has drained.
    ///
    /// # Returns
    ///
    /// The number of prefetches the queue accepted.
    pub fn issue_prefetches<Q: FetchQueue + ?Sized>(&mut self, queue: &mut Q) -> usize {
        if !self.config.enabled {
            return 0;
        }
        let report = self.prf.fetch_next_preds(&self.geometry, queue);
        self.stats.prefetches_issued += report.issued as u64;
        self.stats.predictions_completed += report.completed as u64;
        if report.rejected {
            self.stats.fetch_rejections += 1;
            trace!(outstanding = self.prf.len(), "fetch queue full, pass halted");
        }
        report.issued
    }

    /// Looks up the PHT for a region seen for the first time and queues a
    /// prediction on a hit.
    fn seed_prediction(&mut self, tag: u64, offset: u32, pc: u64) {
        let now = self.clock.now();
        let Some(pattern) = self.pht.find(pc, offset, now) else {
            self.stats.pht_misses += 1;
            return;
        };
        self.stats.pht_hits += 1;
        self.stats.predictions += 1;
        trace!(region = tag, pc, offset, %pattern, "prediction seeded");

        let now = self.clock.now();
        if let Some(displaced) = self.prf.insert(tag, pattern, now) {
            self.stats.predictions_displaced += 1;
            debug!(
                region = displaced.base,
                outstanding = displaced.pattern.count(),
                "prediction displaced before completion"
            );
        }
    }

    /// Commits a finished generation to the PHT.
    fn commit(&mut self, entry: AccumulationEntry) {
        let now = self.clock.now();
        let lines = entry.pattern.count();
        match self.pht.insert(entry.pc, entry.offset, entry.pattern, now) {
            HistoryInsert::Filled => {}
            HistoryInsert::Overwrote => self.stats.pht_overwrites += 1,
            HistoryInsert::Evicted(old) => {
                self.stats.pht_evictions += 1;
                trace!(pc = old.pc, offset = old.offset, "pattern evicted");
            }
        }
        self.stats.pht_inserts += 1;
        self.stats.record_pattern_size(lines);
        debug!(
            region = entry.tag,
            pc = entry.pc,
            offset = entry.offset,
            lines,
            "generation committed"
        );
    }

    /// Clears all learned and in-flight state and zeroes the statistics.
    pub fn reset(&mut self) {
        self.ft.clear();
        self.at.clear();
        self.pht.clear();
        self.prf.clear();
        self.stats = SmsStats::new(self.geometry.lines_per_region());
    }
}

impl<C> SmsPrefetcher<C> {
    /// Statistics collected so far.
    pub const fn stats(&self) -> &SmsStats {
        &self.stats
    }

    /// Region geometry in use.
    pub const fn geometry(&self) -> &RegionGeometry {
        &self.geometry
    }

    /// Configuration the engine was built from.
    pub const fn config(&self) -> &SmsConfig {
        &self.config
    }

    /// Whether the engine reacts to its entry points.
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Filter Table, for inspection.
    pub const fn filter_table(&self) -> &FilterTable {
        &self.ft
    }

    /// Accumulation Table, for inspection.
    pub const fn accumulation_table(&self) -> &AccumulationTable {
        &self.at
    }

    /// Pattern History Table, for inspection.
    pub const fn history_table(&self) -> &PatternHistoryTable {
        &self.pht
    }

    /// Prediction Register File, for inspection.
    pub const fn predictions(&self) -> &PredictionRegisterFile {
        &self.prf
    }

    /// Live Filter Table entries.
    pub const fn filter_len(&self) -> usize {
        self.ft.len()
    }

    /// Live Accumulation Table entries.
    pub const fn accumulation_len(&self) -> usize {
        self.at.len()
    }

    /// Live Pattern History Table entries.
    pub const fn history_len(&self) -> usize {
        self.pht.len()
    }

    /// Live Prediction Register File entries.
    pub fn predictions_len(&self) -> usize {
        self.prf.len()
    }
}

impl<C> fmt::Debug for SmsPrefetcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsPrefetcher")
            .field("config", &self.config)
            .field("ft", &self.ft.len())
            .field("at", &self.at.len())
            .field("pht", &self.pht.len())
            .field("prf", &self.prf.len())
            .finish_non_exhaustive()
    }
}
