use serde::Serialize;

use super::Gesture;

/// Human-readable gesture panel state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GestureStatus {
    pub status: String,
    pub last_gesture: Option<Gesture>,
}

/// Rate-limits status text so a 60Hz frame loop does not flood the UI.
/// Forced updates bypass the limit.
#[derive(Debug, Clone)]
pub struct StatusThrottle {
    interval_ms: f64,
    last_update_ms: Option<f64>,
    status: String,
    last_gesture: Option<Gesture>,
}

impl StatusThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_update_ms: None,
            status: String::new(),
            last_gesture: None,
        }
    }

    /// Returns the new status when something visible changed and the update
    /// was not throttled.
    pub fn update(
        &mut self,
        status: &str,
        gesture: Option<Gesture>,
        force: bool,
        now_ms: f64,
    ) -> Option<GestureStatus> {
        if !force {
            if let Some(last) = self.last_update_ms {
                if now_ms - last < self.interval_ms {
                    return None;
                }
            }
        }

        let mut changed = false;
        if status != self.status {
            self.status = status.to_string();
            changed = true;
        }
        if gesture.is_some() && gesture != self.last_gesture {
            self.last_gesture = gesture;
            changed = true;
        }

        if !changed {
            return None;
        }

        self.last_update_ms = Some(now_ms);
        Some(self.current())
    }

    pub fn current(&self) -> GestureStatus {
        GestureStatus {
            status: self.status.clone(),
            last_gesture: self.last_gesture,
        }
    }

    pub fn reset(&mut self) {
        self.last_update_ms = None;
        self.status.clear();
        self.last_gesture = None;
    }
}
