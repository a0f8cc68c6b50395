//! Bounded FIFO Ring Buffer Implementation

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded FIFO buffer that evicts its oldest entry on overflow.
///
/// Entries are kept oldest first, so the most recent insertion is always
/// `last()`. The length never exceeds `capacity()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingBuffer<T> {
    /// Storage, oldest entry at the front
    storage: VecDeque<T>,
    /// Hard capacity limit
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an entry, returning the evicted oldest entry if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.storage.len() == self.capacity {
            self.storage.pop_front()
        } else {
            None
        };
        self.storage.push_back(item);
        evicted
    }

    /// Get the number of entries currently in the buffer
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&T> {
        self.storage.back()
    }

    /// Iterate from oldest to most recent
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.storage.iter()
    }

    /// Change the capacity (at least 1), evicting the oldest entries if the buffer shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.storage.len() > self.capacity {
            self.storage.pop_front();
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.storage.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copy all entries out, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.storage.iter().cloned().collect()
    }
}
