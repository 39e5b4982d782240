use serde::{Deserialize, Serialize};

/// Tunable thresholds for per-sample classification and the debounce gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Raw labels kept for the majority vote.
    pub history_len: usize,

    /// Minimum share of the history the majority label must hold to commit.
    pub mode_threshold: f64,

    /// Minimum time between two committed transitions.
    pub min_switch_interval_ms: f64,

    /// Vertical jump (px) that counts as a forward or backward move.
    pub jump_px: f64,

    /// Directional moves only count when they happen faster than this.
    pub fast_window_secs: f64,

    /// Idle: gaze moved less than this many px over at least `idle_min_secs`.
    pub idle_distance_px: f64,
    pub idle_min_secs: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            history_len: 6,
            mode_threshold: 0.4,
            min_switch_interval_ms: 500.0,
            jump_px: 40.0,
            fast_window_secs: 1.5,
            idle_distance_px: 10.0,
            idle_min_secs: 1.0,
        }
    }
}
