//! Sweep record: the best active box per level.
//!
//! Slot `s` holds the active box of level `s` with the smallest base value.
//! Levels run from 1 to `smax - 1`; slot 0 is never used.

use crate::storage::{BoxId, BoxStorage};

#[derive(Debug, Clone)]
pub struct SweepRecord {
    slots: Vec<Option<BoxId>>,
}

impl SweepRecord {
    /// Record with room for levels `1..max_levels`.
    pub fn new(max_levels: usize) -> Self {
        Self {
            slots: vec![None; max_levels.max(1)],
        }
    }

    /// Number of slots (`smax`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, level: usize) -> Option<BoxId> {
        self.slots.get(level).copied().flatten()
    }

    /// Remove and return the record of `level`.
    pub fn take(&mut self, level: usize) -> Option<BoxId> {
        self.slots.get_mut(level).and_then(Option::take)
    }

    /// Rebuild the record from every active box.
    ///
    /// Returns the lowest level holding an active box, or `len()` when none
    /// is left.
    pub fn start_sweep(&mut self, storage: &BoxStorage) -> usize {
        self.slots.iter_mut().for_each(|s| *s = None);
        let mut lowest = self.slots.len();
        for (id, b) in storage.iter() {
            if b.level == 0 {
                continue;
            }
            lowest = lowest.min(b.level);
            self.update(id, storage);
        }
        lowest
    }

    /// Register box `id` at its current level if the slot is empty or the
    /// box is strictly better than the recorded one.
    pub fn update(&mut self, id: BoxId, storage: &BoxStorage) {
        let level = storage.get(id).level;
        if level >= self.slots.len() {
            self.slots.resize(level + 1, None);
        }
        match self.slots[level] {
            Some(current) if storage.get(id).f[0] >= storage.get(current).f[0] => {}
            _ => self.slots[level] = Some(id),
        }
    }

    /// The first level above `level` with a recorded box, or `smax` if none.
    pub fn next_level(&self, level: usize, smax: usize) -> usize {
        let mut s = level + 1;
        while s < smax && self.get(s).is_none() {
            s += 1;
        }
        s
    }
}
