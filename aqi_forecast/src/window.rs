//! Rolling buffer of recent index values

use crate::error::{ForecastError, Result};
use std::collections::VecDeque;

/// Fixed-capacity ring of the most recent index values, oldest first.
///
/// `lag(1)` is the newest value. Pushing beyond capacity evicts the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct LagWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl LagWindow {
    /// Fill a window of `capacity` from the tail of `history`
    pub fn from_history(history: &[f64], capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window capacity must be greater than zero".to_string(),
            ));
        }
        if history.len() < capacity {
            return Err(ForecastError::InsufficientHistory {
                required: capacity,
                available: history.len(),
            });
        }

        let mut values = VecDeque::with_capacity(capacity);
        values.extend(&history[history.len() - capacity..]);

        Ok(Self { values, capacity })
    }

    /// Append a value as the newest entry
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);

        // Keep only the required number of values
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Value `lag` steps back from the next hour; `lag(1)` is the newest value
    pub fn lag(&self, lag: usize) -> Option<f64> {
        if lag == 0 || lag > self.values.len() {
            return None;
        }
        self.values.get(self.values.len() - lag).copied()
    }

    /// Newest value
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
