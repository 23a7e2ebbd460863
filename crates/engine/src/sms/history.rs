//! Pattern History Table (PHT).
//!
//! The long-lived store of learned patterns. Entries are keyed by the trigger
//! (PC, offset) of the generation that produced them, not by region: the
//! engine predicts that the same instruction touching the same offset of a
//! *different* region will repeat the footprint. Patterns only arrive here from
//! the Accumulation Table when a generation ends.

use super::table::LruTable;
use crate::common::pattern::Pattern;

/// A learned pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Trigger PC.
    pub pc: u64,
    /// Trigger offset.
    pub offset: u32,
    /// Lines touched during the generation.
    pub pattern: Pattern,
}

/// How a pattern was placed by [`PatternHistoryTable::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryInsert {
    /// Stored in a free slot.
    Filled,
    /// Replaced the pattern already stored for the same (PC, offset).
    Overwrote,
    /// Evicted the least recently touched entry, returned here.
    Evicted(HistoryEntry),
}

/// Pattern History Table state.
#[derive(Clone, Debug)]
pub struct PatternHistoryTable {
    table: LruTable<HistoryEntry>,
}

impl PatternHistoryTable {
    /// Creates an empty Pattern History Table with `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            table: LruTable::new(capacity),
        }
    }

    /// Looks up the pattern learned for (`pc`, `offset`), refreshing it on a hit.
    pub fn find(&mut self, pc: u64, offset: u32, now: u64) -> Option<Pattern> {
        self.table
            .find_mut(|e| e.pc == pc && e.offset == offset, now)
            .map(|e| e.pattern)
    }

    /// Commits a pattern under (`pc`, `offset`).
    ///
    /// An existing entry with the same key is overwritten in place so the key
    /// stays unique. Otherwise a free slot is used, or the least recently
    /// touched entry is evicted.
    pub fn insert(&mut self, pc: u64, offset: u32, pattern: Pattern, now: u64) -> HistoryInsert {
        if let Some(entry) = self.table.find_mut(|e| e.pc == pc && e.offset == offset, now) {
            entry.pattern = pattern;
            return HistoryInsert::Overwrote;
        }
        match self.table.insert(HistoryEntry { pc, offset, pattern }, now) {
            Some(evicted) => HistoryInsert::Evicted(evicted),
            None => HistoryInsert::Filled,
        }
    }

    /// The pattern for (`pc`, `offset`), without refreshing it.
    pub fn peek(&self, pc: u64, offset: u32) -> Option<Pattern> {
        self.table
            .iter()
            .find(|e| e.pc == pc && e.offset == offset)
            .map(|e| e.pattern)
    }

    /// Live entries in slot order.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.table.iter()
    }

    /// Number of learned patterns.
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing has been learned.
    pub const fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Forgets every learned pattern.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
