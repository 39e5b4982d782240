use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum time between two freeze/unfreeze firings.
    pub cooldown_ms: f64,
    /// Minimum time between two non-forced status updates.
    pub status_throttle_ms: f64,
    /// Normalized horizontal distance between index and pinky tips for a palm.
    pub palm_min_spread: f32,
    /// Fingers that must be extended for a palm.
    pub palm_min_extended: usize,
    /// Non-thumb fingers that must be folded for a thumbs up.
    pub thumbs_min_folded: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 900.0,
            status_throttle_ms: 250.0,
            palm_min_spread: 0.18,
            palm_min_extended: 3,
            thumbs_min_folded: 2,
        }
    }
}
