//! Trace replay through one engine instance.
//!
//! The modelled memory system is a single [`BoundedFetchQueue`] that retires a
//! fixed number of requests after every trace event. Retired lines count as
//! prefetched; a later demand for one of them is a useful prefetch and is
//! reported to the engine through its prefetch-hit hook.

use std::collections::HashSet;
use std::io::BufRead;

use serde::Serialize;
use smsim_core::common::ConfigError;
use smsim_core::host::BoundedFetchQueue;
use smsim_core::{SmsConfig, SmsPrefetcher, SmsStats};
use tracing::{debug, info};

use crate::error::CliError;
use crate::trace::{self, TraceEvent};

/// Replay state.
#[derive(Debug)]
pub struct Replay {
    engine: SmsPrefetcher,
    queue: BoundedFetchQueue,
    drain: usize,
    prefetched: HashSet<u64>,
    events: u64,
    useful: u64,
    late: u64,
}

/// Outcome of a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    /// Trace events replayed.
    pub events: u64,
    /// Demands for lines that had already been prefetched.
    pub useful: u64,
    /// Demands for lines still waiting in the fetch queue.
    pub late: u64,
    /// Requests the fetch queue accepted.
    pub queue_accepted: u64,
    /// Requests the fetch queue turned away.
    pub queue_rejected: u64,
    /// Engine counters.
    pub stats: SmsStats,
}

impl Replay {
    /// Builds a replay around a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: &SmsConfig, queue_depth: usize, drain: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: SmsPrefetcher::new(config)?,
            queue: BoundedFetchQueue::new(queue_depth),
            drain,
            prefetched: HashSet::new(),
            events: 0,
            useful: 0,
            late: 0,
        })
    }

    /// Replays every event read from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] on a read failure or a malformed line; `path` only
    /// labels the error.
    pub fn run<R: BufRead>(&mut self, reader: R, path: &str) -> Result<(), CliError> {
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| CliError::Io {
                path: path.to_owned(),
                source,
            })?;
            let event = trace::parse_line(&line).map_err(|source| CliError::Trace {
                path: path.to_owned(),
                line: idx + 1,
                source,
            })?;
            if let Some(event) = event {
                self.apply(event);
            }
        }
        info!(events = self.events, useful = self.useful, "trace replayed");
        Ok(())
    }

    /// Feeds one event to the engine, then lets the memory system retire
    /// requests.
    pub fn apply(&mut self, event: TraceEvent) {
        let geometry = *self.engine.geometry();
        match event {
            TraceEvent::Access { pc, addr } => {
                let line = geometry.line_align(addr);
                if self.prefetched.remove(&line) {
                    self.useful += 1;
                    self.engine.on_prefetch_hit(line, pc, &mut self.queue);
                } else {
                    if self.queue.pending().any(|queued| queued == line) {
                        self.late += 1;
                    }
                    self.engine.on_miss(line, pc, &mut self.queue);
                }
            }
            TraceEvent::EndGeneration { pc, addr } => {
                self.engine
                    .end_generation(geometry.line_align(addr), pc, &mut self.queue);
            }
        }
        self.events += 1;

        for line in self.queue.drain(self.drain) {
            if !self.prefetched.insert(line) {
                debug!(line, "line prefetched again before use");
            }
        }
    }

    /// Consumes the replay and returns its report.
    pub fn finish(self) -> ReplayReport {
        ReplayReport {
            events: self.events,
            useful: self.useful,
            late: self.late,
            queue_accepted: self.queue.accepted(),
            queue_rejected: self.queue.rejected(),
            stats: self.engine.stats().clone(),
        }
    }
}

impl ReplayReport {
    /// Prints the engine report followed by the replay summary.
    pub fn print(&self) {
        self.stats.print();
        println!("TRACE");
        println!("  trace.events           {}", self.events);
        println!("  pref.useful            {}", self.useful);
        println!("  pref.late              {}", self.late);
        println!("  queue.accepted         {}", self.queue_accepted);
        println!("  queue.rejected         {}", self.queue_rejected);
        println!("==========================================================");
    }
}
