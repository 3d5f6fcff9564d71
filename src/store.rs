//! Fixed-capacity circular sample history
//!
//! One store exists per stream. Writes are O(1) and never block: once the
//! store is full each write silently overwrites the oldest slot.
//! [`SampleStore::snapshot`] returns slots in storage order, which stops
//! being chronological after the first wrap; use
//! [`SampleStore::chronological`] when order matters.

use crate::types::Sample;

/// Default number of slots per stream
pub const DEFAULT_CAPACITY: usize = 1000;

/// Ring buffer of the most recent samples on one stream
#[derive(Debug, Clone)]
pub struct SampleStore {
    slots: Box<[Sample]>,
    cursor: usize,
    written: u64,
}

impl SampleStore {
    /// Create a store with `capacity` slots, all holding [`Sample::SENTINEL`]
    ///
    /// A zero capacity is raised to one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Sample::SENTINEL; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            written: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot the next write lands in
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of writes since creation or the last [`clear`](Self::clear)
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Number of slots holding real samples
    pub fn len(&self) -> usize {
        self.written.min(self.capacity() as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Whether every slot has been written at least once
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Store `sample` in the current slot and advance the cursor
    pub fn write(&mut self, sample: Sample) {
        self.slots[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.written = self.written.saturating_add(1);
        tracing::trace!(cursor = self.cursor, delta = sample.delta, "Stored sample");
    }

    /// Copy of every slot in storage order, sentinels included
    pub fn snapshot(&self) -> Vec<Sample> {
        self.slots.to_vec()
    }

    /// Copy of the written samples, oldest first
    pub fn chronological(&self) -> Vec<Sample> {
        if self.is_full() {
            let (newer, older) = self.slots.split_at(self.cursor);
            older.iter().chain(newer.iter()).copied().collect()
        } else {
            self.slots[..self.cursor].to_vec()
        }
    }

    /// The `n` most recent samples, oldest first
    pub fn latest(&self, n: usize) -> Vec<Sample> {
        let history = self.chronological();
        let skip = history.len().saturating_sub(n);
        history[skip..].to_vec()
    }

    /// Reset every slot to the sentinel and rewind the cursor
    pub fn clear(&mut self) {
        self.slots.fill(Sample::SENTINEL);
        self.cursor = 0;
        self.written = 0;
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: u16) -> Sample {
        Sample::new(i, i as f64, -(i as f64), 0.5)
    }

    #[test]
    fn test_new_store() {
        let store = SampleStore::new(4);
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.cursor(), 0);
        assert!(store.is_empty());
        assert!(store.snapshot().iter().all(Sample::is_sentinel));
        assert!(store.chronological().is_empty());
    }

    #[test]
    fn test_write_advances_cursor() {
        let mut store = SampleStore::new(4);
        store.write(sample(1));
        store.write(sample(2));

        assert_eq!(store.cursor(), 2);
        assert_eq!(store.len(), 2);
        let snapshot = store.snapshot();
        assert_eq!(snapshot[0], sample(1));
        assert_eq!(snapshot[1], sample(2));
        assert!(snapshot[2].is_sentinel());
    }

    #[test]
    fn test_wraparound_overwrites_oldest() {
        let capacity = 5;
        let k = 3;
        let mut store = SampleStore::new(capacity);
        for i in 0..(capacity + k) as u16 {
            store.write(sample(i));
        }

        assert_eq!(store.cursor(), k);
        assert!(store.is_full());
        assert_eq!(store.written(), (capacity + k) as u64);

        // First k slots now hold the newest samples, the rest are originals
        let snapshot = store.snapshot();
        for (slot, value) in snapshot.iter().enumerate() {
            let expected = if slot < k { slot + capacity } else { slot };
            assert_eq!(*value, sample(expected as u16));
        }
    }

    #[test]
    fn test_chronological_rotates_by_cursor() {
        let mut store = SampleStore::new(4);
        for i in 0..6 {
            store.write(sample(i));
        }
        let deltas: Vec<u16> = store.chronological().iter().map(|s| s.delta).collect();
        assert_eq!(deltas, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_latest() {
        let mut store = SampleStore::new(4);
        for i in 0..3 {
            store.write(sample(i));
        }
        let deltas: Vec<u16> = store.latest(2).iter().map(|s| s.delta).collect();
        assert_eq!(deltas, vec![1, 2]);
        assert_eq!(store.latest(10).len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut store = SampleStore::new(3);
        store.write(sample(9));
        store.clear();
        assert_eq!(store.cursor(), 0);
        assert!(store.is_empty());
        assert!(store.snapshot().iter().all(Sample::is_sentinel));
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        let mut store = SampleStore::new(0);
        store.write(sample(1));
        store.write(sample(2));
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.snapshot(), vec![sample(2)]);
    }

    #[test]
    fn test_large_volume_never_fails() {
        let mut store = SampleStore::default();
        for i in 0..10_000u32 {
            store.write(sample(i as u16));
        }
        assert_eq!(store.cursor(), 10_000 % DEFAULT_CAPACITY);
        assert_eq!(store.chronological().len(), DEFAULT_CAPACITY);
    }
}
