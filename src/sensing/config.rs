use serde::{Deserialize, Serialize};

/// Producer cadence. Gaze is polled at a fixed rate; hand frames run as fast
/// as the detector allows, capped by `hand_frame_ms`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    pub gaze_poll_ms: u64,
    pub hand_frame_ms: u64,
    pub mode_tick_ms: u64,
    /// Upper bound on a single estimator call before the tick is skipped.
    pub sensor_timeout_ms: u64,
    pub channel_capacity: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            gaze_poll_ms: 100,
            hand_frame_ms: 16,
            mode_tick_ms: 200,
            sensor_timeout_ms: 1_000,
            channel_capacity: 256,
        }
    }
}
