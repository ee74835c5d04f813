//! Bounded in-memory buffers.
//!
//! A [`RollingBuffer`] keeps the most recent `capacity` items in arrival
//! order, evicting the oldest first. The service keeps one for live
//! readings and one for threshold breaches.

use std::collections::VecDeque;

use weatherdash_types::Reading;

use crate::analysis::{self, AnalysisSnapshot};
use crate::error::{Error, Result};

/// Default number of live readings kept for analysis.
pub const DEFAULT_BUFFER_CAPACITY: usize = 300;

/// A fixed-capacity FIFO window.
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` items.
    ///
    /// Returns [`Error::InvalidConfig`] for a zero capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfig(
                "buffer capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Like [`with_capacity`](Self::with_capacity), raising zero to one.
    pub(crate) fn bounded(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Append an item, returning the evicted oldest item when full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Append items in order. Returns how many were evicted.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        items
            .into_iter()
            .filter_map(|item| self.push(item))
            .count()
    }

    /// The most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> RollingBuffer<T> {
    /// Owned copy of the contents, oldest first.
    pub fn readings(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// Owned copy of the `n` most recent items, oldest first.
    pub fn tail(&self, n: usize) -> Vec<T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }
}

impl Default for RollingBuffer<Reading> {
    fn default() -> Self {
        Self::bounded(DEFAULT_BUFFER_CAPACITY)
    }
}

impl RollingBuffer<Reading> {
    /// Analyze the current contents.
    pub fn analyze(&self) -> AnalysisSnapshot {
        analysis::analyze(&self.readings())
    }
}
