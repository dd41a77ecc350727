//! Fixed-capacity rolling window of scalar samples.

use std::collections::VecDeque;

/// Keeps the most recent `capacity` samples in time order (oldest first) and
/// counts every sample ever pushed.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
    samples: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            samples: 0,
        }
    }

    /// Append a value, returning the one evicted when the window was full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        self.samples += 1;
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples currently held (≤ capacity).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Samples pushed since construction or the last `clear`.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.samples = 0;
    }
}
