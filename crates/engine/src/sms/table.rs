//! Fixed-capacity associative table with timestamp LRU.
//!
//! Shared storage for the Filter, Accumulation, and Pattern History tables.
//! Each table is a flat array of slots; a slot is either free (`None`) or holds
//! an entry plus the timestamp of its last touch. Victim selection prefers a
//! free slot and otherwise picks the live entry with the smallest timestamp
//! (the lowest index wins a tie).
//!
//! # Performance
//!
//! - **Time Complexity:** lookup, insert, and victim selection are O(N) scans.
//! - **Space Complexity:** O(N), allocated once at construction.
//! - **Hardware Cost:** Fully associative CAM with per-entry age counters.

/// A live slot.
#[derive(Clone, Debug)]
struct Slot<T> {
    entry: T,
    last_access: u64,
}

/// Fully associative LRU table of `T`.
#[derive(Clone, Debug)]
pub(crate) struct LruTable<T> {
    slots: Vec<Option<Slot<T>>>,
    len: usize,
}

impl<T> LruTable<T> {
    /// Allocates a table with `capacity` free slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Configuration validation rejects that
    /// before any table is built.
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "associative table built with zero capacity");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the first live entry matching `pred`.
    pub(crate) fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| pred(&s.entry)))
    }

    /// The live entry at `idx`.
    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx)?.as_ref().map(|s| &s.entry)
    }

    /// Refreshes the timestamp of the live entry at `idx`.
    pub(crate) fn touch(&mut self, idx: usize, now: u64) {
        if let Some(Some(slot)) = self.slots.get_mut(idx) {
            slot.last_access = now;
        }
    }

    /// Finds the entry matching `pred`, refreshes its timestamp, and returns it.
    pub(crate) fn find_mut(
        &mut self,
        pred: impl FnMut(&T) -> bool,
        now: u64,
    ) -> Option<&mut T> {
        let idx = self.position(pred)?;
        let slot = self.slots[idx].as_mut()?;
        slot.last_access = now;
        Some(&mut slot.entry)
    }

    /// Removes and returns the entry at `idx`.
    pub(crate) fn remove(&mut self, idx: usize) -> Option<T> {
        let slot = self.slots.get_mut(idx)?.take()?;
        self.len -= 1;
        Some(slot.entry)
    }

    /// Removes and returns the first entry matching `pred`.
    pub(crate) fn remove_where(&mut self, pred: impl FnMut(&T) -> bool) -> Option<T> {
        let idx = self.position(pred)?;
        self.remove(idx)
    }

    /// Stores `entry`, evicting the LRU entry if no slot is free.
    ///
    /// # Returns
    ///
    /// The evicted entry, if a live entry had to make room.
    pub(crate) fn insert(&mut self, entry: T, now: u64) -> Option<T> {
        let idx = self.victim();
        let previous = self.slots[idx].replace(Slot {
            entry,
            last_access: now,
        });
        match previous {
            Some(slot) => Some(slot.entry),
            None => {
                self.len += 1;
                None
            }
        }
    }

    /// Live entries in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten().map(|s| &s.entry)
    }

    /// Frees every slot.
    pub(crate) fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    /// Selects the slot to fill: the first free slot, else the least recently
    /// touched live entry.
    fn victim(&self) -> usize {
        assert!(
            !self.slots.is_empty(),
            "eviction requested from a table with no slots"
        );
        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (idx, slot) in self.slots.iter().enumerate() {
            match slot {
                None => return idx,
                Some(s) if s.last_access < oldest => {
                    oldest = s.last_access;
                    victim = idx;
                }
                Some(_) => {}
            }
        }
        victim
    }
}
