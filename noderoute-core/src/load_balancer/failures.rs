//! Per-node failure counters.
//!
//! A counter of `0` means the node is eligible for selection, anything above
//! means the caller has seen it fail since the counter was last reset. There is
//! no time-based decay: counters only go back to zero on an explicit restore or
//! when a new topology replaces the whole array.

use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed-size array of atomic failure counters, one slot per node.
///
/// The length is set at creation and never changes, so it always matches the
/// node list it was built for.
#[derive(Debug)]
pub struct FailureCounters {
    slots: Box<[AtomicU64]>,
}

impl FailureCounters {
    /// Create `len` counters, all at zero.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Read the counter at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<u64> {
        self.slots.get(index).map(|slot| slot.load(Ordering::Acquire))
    }

    /// Whether the node at `index` has no recorded failures.
    ///
    /// Out-of-range indices are never healthy.
    pub fn is_healthy(&self, index: usize) -> bool {
        self.get(index) == Some(0)
    }

    /// Record one failure at `index`.
    ///
    /// Returns `false` without touching anything when `index` is out of bounds.
    pub fn increment(&self, index: usize) -> bool {
        match self.slots.get(index) {
            Some(slot) => {
                slot.fetch_add(1, Ordering::AcqRel);
                true
            }
            None => false,
        }
    }

    /// Clear the counter at `index` back to zero.
    ///
    /// Returns `false` when `index` is out of bounds.
    pub fn reset(&self, index: usize) -> bool {
        match self.slots.get(index) {
            Some(slot) => {
                slot.store(0, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Copy every counter. Each slot is loaded on its own, so the copy is not
    /// a single atomic view when other threads are writing.
    pub fn to_vec(&self) -> Vec<u64> {
        self.slots
            .iter()
            .map(|slot| slot.load(Ordering::Acquire))
            .collect()
    }
}
