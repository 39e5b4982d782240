use serde::{Deserialize, Serialize};

/// Sample counters published by the classifier after every sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GazeMetrics {
    pub gaze_samples: u64,
    pub backward_jumps: u64,
}

/// Accumulated milliseconds per committed classifier mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeInMode {
    pub reading_ms: u64,
    pub skimming_ms: u64,
    pub rereading_ms: u64,
}

impl TimeInMode {
    /// Sum of the three attentive modes; idle time is not tracked.
    pub fn total_ms(&self) -> u64 {
        self.reading_ms + self.skimming_ms + self.rereading_ms
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub gaze: GazeMetrics,
    pub time_in_mode: TimeInMode,
}
