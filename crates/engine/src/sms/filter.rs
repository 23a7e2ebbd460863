//! Filter Table (FT).
//!
//! Detects regions whose generation is worth recording. An entry means exactly
//! one offset of the region has been seen so far, attributed to the PC that
//! touched it. A second, different offset confirms spatial reuse and the entry
//! graduates to the Accumulation Table. Entries squeezed out by capacity are
//! simply forgotten; nothing is learned from them.

use super::table::LruTable;

/// A region seen at exactly one offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterEntry {
    /// Region tag.
    pub tag: u64,
    /// PC of the first access to the region.
    pub pc: u64,
    /// Offset of the first access to the region.
    pub offset: u32,
}

/// Result of training the Filter Table with one access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The region was already filtered at this same offset; only its
    /// timestamp was refreshed.
    FoundSame,
    /// A second distinct offset was seen. The entry was removed and its
    /// first-access offset and PC are returned for promotion.
    Promote {
        /// Offset of the first access.
        offset: u32,
        /// PC of the first access.
        pc: u64,
    },
    /// First sight of the region; a new entry was created.
    Inserted {
        /// Entry forgotten to make room, if the table was full.
        evicted: Option<FilterEntry>,
    },
}

/// Filter Table state.
#[derive(Clone, Debug)]
pub struct FilterTable {
    table: LruTable<FilterEntry>,
}

impl FilterTable {
    /// Creates an empty Filter Table with `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            table: LruTable::new(capacity),
        }
    }

    /// Trains the table with an access to `offset` of region `tag` by `pc`.
    ///
    /// # Arguments
    ///
    /// * `tag` - Region tag of the access.
    /// * `offset` - Line offset within the region.
    /// * `pc` - Instruction address that caused the access.
    /// * `now` - Current logical timestamp.
    pub fn train(&mut self, tag: u64, offset: u32, pc: u64, now: u64) -> FilterOutcome {
        if let Some(idx) = self.table.position(|e| e.tag == tag) {
            if self.table.get(idx).is_some_and(|e| e.offset == offset) {
                self.table.touch(idx, now);
                return FilterOutcome::FoundSame;
            }
            if let Some(first) = self.table.remove(idx) {
                return FilterOutcome::Promote {
                    offset: first.offset,
                    pc: first.pc,
                };
            }
        }

        let evicted = self.table.insert(FilterEntry { tag, pc, offset }, now);
        FilterOutcome::Inserted { evicted }
    }

    /// Drops the entry for `tag` without learning from it.
    ///
    /// # Returns
    ///
    /// `true` if an entry was present.
    pub fn discard(&mut self, tag: u64) -> bool {
        self.table.remove_where(|e| e.tag == tag).is_some()
    }

    /// Whether `tag` is currently filtered.
    pub fn contains(&self, tag: u64) -> bool {
        self.table.position(|e| e.tag == tag).is_some()
    }

    /// Live entries in slot order.
    pub fn entries(&self) -> impl Iterator<Item = &FilterEntry> {
        self.table.iter()
    }

    /// Number of live entries.
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table holds no entries.
    pub const fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
