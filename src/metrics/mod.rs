mod types;

pub use types::{GazeMetrics, MetricsSnapshot, TimeInMode};

use std::time::Duration;

use crate::models::GazeMode;

/// Session metrics. Values only grow until [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    gaze: GazeMetrics,
    time_in_mode: TimeInMode,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the classifier's latest counters.
    pub fn record_gaze(&mut self, metrics: GazeMetrics) {
        self.gaze = metrics;
    }

    /// Credit one ticker period to `mode`. Idle and freeze are not accumulated.
    pub fn accrue(&mut self, mode: GazeMode, period: Duration) {
        let ms = period.as_millis() as u64;
        let slot = match mode {
            GazeMode::Reading => &mut self.time_in_mode.reading_ms,
            GazeMode::Skimming => &mut self.time_in_mode.skimming_ms,
            GazeMode::Rereading => &mut self.time_in_mode.rereading_ms,
            GazeMode::Idle | GazeMode::Freeze => return,
        };
        *slot = slot.saturating_add(ms);
    }

    pub fn gaze(&self) -> GazeMetrics {
        self.gaze
    }

    pub fn time_in_mode(&self) -> TimeInMode {
        self.time_in_mode
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            gaze: self.gaze,
            time_in_mode: self.time_in_mode,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
