//! Prefetcher statistics collection and reporting.
//!
//! This module tracks what the engine did, for analysis only; no counter feeds
//! back into control flow. It provides:
//! 1. **Training:** Accesses, generation ends, and the outcome of each table probe.
//! 2. **Learning:** Promotions, evictions, and PHT inserts, with a pattern-size histogram.
//! 3. **Prediction:** Predictions seeded, displaced, and completed.
//! 4. **Issue:** Prefetches issued and passes halted by backpressure.

use serde::Serialize;

/// Engine statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SmsStats {
    /// Accesses routed to `train`.
    pub accesses: u64,
    /// Generation-end signals received.
    pub generation_ends: u64,

    /// Accesses that hit an active Accumulation Table entry.
    pub at_hits: u64,
    /// Filter Table insertions (first sight of a region).
    pub ft_inserts: u64,
    /// Filter Table hits on the already-recorded offset.
    pub ft_same_offset: u64,
    /// Filter Table entries promoted to the Accumulation Table.
    pub ft_promotions: u64,
    /// Filter Table entries forgotten to make room.
    pub ft_evictions: u64,
    /// Filter Table entries dropped by a generation end.
    pub ft_discards: u64,

    /// Accumulation Table entries evicted for capacity (generation ended by pressure).
    pub at_evictions: u64,
    /// Accumulation Table entries retired by a generation end.
    pub at_discards: u64,

    /// Patterns committed to the Pattern History Table.
    pub pht_inserts: u64,
    /// Commits that overwrote an existing (PC, offset) entry.
    pub pht_overwrites: u64,
    /// Commits that evicted a different live entry.
    pub pht_evictions: u64,
    /// PHT lookups that found a pattern.
    pub pht_hits: u64,
    /// PHT lookups that found nothing.
    pub pht_misses: u64,

    /// Predictions placed in the Prediction Register File.
    pub predictions: u64,
    /// Predictions displaced by a newer one before completing.
    pub predictions_displaced: u64,
    /// Predictions whose every line was issued.
    pub predictions_completed: u64,

    /// Prefetch requests accepted by the fetch queue.
    pub prefetches_issued: u64,
    /// Scheduling passes stopped by a rejected request.
    pub fetch_rejections: u64,

    /// `pattern_sizes[k]` is the number of PHT commits whose pattern had `k` lines.
    pub pattern_sizes: Vec<u64>,
}

impl SmsStats {
    /// Creates zeroed statistics with a histogram sized for `lines_per_region`.
    pub fn new(lines_per_region: u32) -> Self {
        Self {
            pattern_sizes: vec![0; lines_per_region as usize + 1],
            ..Self::default()
        }
    }

    /// Records the size of a pattern committed to the PHT.
    pub fn record_pattern_size(&mut self, lines: u32) {
        let idx = lines as usize;
        if idx >= self.pattern_sizes.len() {
            self.pattern_sizes.resize(idx + 1, 0);
        }
        self.pattern_sizes[idx] += 1;
    }

    /// Fraction of PHT lookups that hit, in `[0, 1]`.
    pub fn pht_hit_rate(&self) -> f64 {
        let total = self.pht_hits + self.pht_misses;
        if total == 0 {
            0.0
        } else {
            self.pht_hits as f64 / total as f64
        }
    }

    /// Mean number of lines per committed pattern.
    pub fn mean_pattern_size(&self) -> f64 {
        let (count, lines) = self
            .pattern_sizes
            .iter()
            .enumerate()
            .fold((0u64, 0u64), |(c, l), (size, &n)| {
                (c + n, l + n * size as u64)
            });
        if count == 0 {
            0.0
        } else {
            lines as f64 / count as f64
        }
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("SPATIAL MEMORY STREAMING STATISTICS");
        println!("==========================================================");
        println!("sms.accesses             {}", self.accesses);
        println!("sms.generation_ends      {}", self.generation_ends);
        println!("----------------------------------------------------------");
        println!("TRAINING");
        println!("  at.hits                {}", self.at_hits);
        println!("  ft.inserts             {}", self.ft_inserts);
        println!("  ft.same_offset         {}", self.ft_same_offset);
        println!("  ft.promotions          {}", self.ft_promotions);
        println!("  ft.evictions           {}", self.ft_evictions);
        println!("  ft.discards            {}", self.ft_discards);
        println!("  at.evictions           {}", self.at_evictions);
        println!("  at.discards            {}", self.at_discards);
        println!("----------------------------------------------------------");
        println!("PATTERN HISTORY");
        println!("  pht.inserts            {}", self.pht_inserts);
        println!("  pht.overwrites         {}", self.pht_overwrites);
        println!("  pht.evictions          {}", self.pht_evictions);
        println!(
            "  pht.lookups            {} (hit rate {:.2}%)",
            self.pht_hits + self.pht_misses,
            self.pht_hit_rate() * 100.0
        );
        println!("  pattern.mean_lines     {:.2}", self.mean_pattern_size());
        for (size, &n) in self.pattern_sizes.iter().enumerate() {
            if n > 0 {
                println!("    pattern.lines[{size:>2}]    {n}");
            }
        }
        println!("----------------------------------------------------------");
        println!("PREDICTION");
        println!("  prf.predictions        {}", self.predictions);
        println!("  prf.displaced          {}", self.predictions_displaced);
        println!("  prf.completed          {}", self.predictions_completed);
        println!("  pref.issued            {}", self.prefetches_issued);
        println!("  pref.rejections        {}", self.fetch_rejections);
        println!("==========================================================");
    }
}
