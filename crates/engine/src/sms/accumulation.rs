//! Accumulation Table (AT).
//!
//! Holds the regions whose generation is currently being recorded. An entry is
//! created when the Filter Table sees a second distinct offset and accumulates
//! one bit per touched line until the generation ends, either by capacity
//! eviction or by an explicit end-of-generation signal. Either way the entry is
//! handed back to the caller so its pattern can be committed to the Pattern
//! History Table under its trigger (PC, offset).

use super::table::LruTable;
use crate::common::pattern::Pattern;

/// An active generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccumulationEntry {
    /// Region tag.
    pub tag: u64,
    /// Trigger PC (first access to the region).
    pub pc: u64,
    /// Trigger offset (first access to the region).
    pub offset: u32,
    /// Lines touched so far in this generation.
    pub pattern: Pattern,
}

/// Accumulation Table state.
#[derive(Clone, Debug)]
pub struct AccumulationTable {
    table: LruTable<AccumulationEntry>,
}

impl AccumulationTable {
    /// Creates an empty Accumulation Table with `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            table: LruTable::new(capacity),
        }
    }

    /// Records an access to `offset` in the active generation for `tag`.
    ///
    /// Refreshes the entry's timestamp and sets the offset bit in place.
    ///
    /// # Returns
    ///
    /// `true` if `tag` has an active generation, `false` if it has none (and
    /// nothing was changed).
    pub fn record(&mut self, tag: u64, offset: u32, now: u64) -> bool {
        match self.table.find_mut(|e| e.tag == tag, now) {
            Some(entry) => {
                entry.pattern.set(offset);
                true
            }
            None => false,
        }
    }

    /// Opens a generation for `tag` with the first two observed offsets.
    ///
    /// # Arguments
    ///
    /// * `tag` - Region tag.
    /// * `pc` - Trigger PC (the PC of the first access).
    /// * `first_offset` - Trigger offset; also the PHT key offset on commit.
    /// * `second_offset` - The offset that confirmed spatial reuse.
    /// * `now` - Current logical timestamp.
    ///
    /// # Returns
    ///
    /// The least recently touched entry if one had to be evicted; its
    /// generation is over and its pattern should be committed.
    pub fn insert(
        &mut self,
        tag: u64,
        pc: u64,
        first_offset: u32,
        second_offset: u32,
        now: u64,
    ) -> Option<AccumulationEntry> {
        let mut pattern = Pattern::single(first_offset);
        pattern.set(second_offset);
        self.table.insert(
            AccumulationEntry {
                tag,
                pc,
                offset: first_offset,
                pattern,
            },
            now,
        )
    }

    /// Ends the generation for `tag`, returning its entry if one was active.
    pub fn discard(&mut self, tag: u64) -> Option<AccumulationEntry> {
        self.table.remove_where(|e| e.tag == tag)
    }

    /// Whether `tag` has an active generation.
    pub fn contains(&self, tag: u64) -> bool {
        self.table.position(|e| e.tag == tag).is_some()
    }

    /// The active generation for `tag`, without refreshing it.
    pub fn get(&self, tag: u64) -> Option<&AccumulationEntry> {
        self.table.iter().find(|e| e.tag == tag)
    }

    /// Live entries in slot order.
    pub fn entries(&self) -> impl Iterator<Item = &AccumulationEntry> {
        self.table.iter()
    }

    /// Number of active generations.
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no generation is active.
    pub const fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Drops every active generation without committing it.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
