//! History Buffer: bounded FIFO of distance readings
//!
//! Oldest readings are evicted first once the capacity is exceeded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::DistanceReading;
use crate::MAX_HISTORY_LENGTH;

/// Time-ordered readings, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceHistory {
    readings: VecDeque<DistanceReading>,
    capacity: usize,
}

impl Default for DistanceHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceHistory {
    /// Empty history holding up to 30 readings
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_LENGTH)
    }

    /// A capacity of zero is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push to the back, then drop from the front down to capacity
    pub fn append(&mut self, reading: DistanceReading) {
        self.readings.push_back(reading);
        self.prune();
    }

    fn prune(&mut self) {
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// Owned copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<DistanceReading> {
        self.readings.iter().cloned().collect()
    }

    /// Contents, or a single unpersisted fallback reading if empty
    pub fn snapshot_or_fallback(&self) -> Vec<DistanceReading> {
        if self.readings.is_empty() {
            vec![DistanceReading::fallback()]
        } else {
            self.snapshot()
        }
    }

    pub fn readings(&self) -> impl Iterator<Item = &DistanceReading> {
        self.readings.iter()
    }

    pub fn latest(&self) -> Option<&DistanceReading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Change the capacity, evicting the oldest readings if it shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.prune();
    }
}

// =============================================================================
// TESTS
// =============================================================================
