use std::collections::VecDeque;

use crate::models::GazeMode;

/// Fixed-capacity FIFO of raw per-sample labels. Never holds more than
/// `capacity` entries.
#[derive(Debug, Clone)]
pub struct ModeHistory {
    capacity: usize,
    labels: VecDeque<GazeMode>,
}

impl ModeHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, mode: GazeMode) {
        if self.labels.len() == self.capacity {
            self.labels.pop_front();
        }
        self.labels.push_back(mode);
    }

    /// Most frequent label and the fraction of the history it occupies.
    /// Ties go to the earlier label in [`GazeMode::CLASSIFIED`].
    pub fn majority(&self) -> Option<(GazeMode, f64)> {
        if self.labels.is_empty() {
            return None;
        }

        let mut best = (GazeMode::Idle, 0usize);
        for mode in GazeMode::CLASSIFIED {
            let count = self.labels.iter().filter(|label| **label == mode).count();
            if count > best.1 {
                best = (mode, count);
            }
        }

        Some((best.0, best.1 as f64 / self.labels.len() as f64))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
