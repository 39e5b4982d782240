use serde::Serialize;

use super::{Gesture, GestureConfig, GestureStatus, StatusThrottle};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

const STATUS_READY: &str = "Gesture control ready (palm to freeze, thumbs up to continue)";
const STATUS_NO_HAND: &str = "Gesture control: show palm to freeze or thumbs up to continue";
const STATUS_FROZEN: &str = "Frozen (show thumbs up to continue)";
const STATUS_ALREADY_LIVE: &str = "Thumbs up detected (already live)";
const STATUS_FROZE: &str = "Palm detected: FREEZE (modes and highlights locked)";
const STATUS_UNFROZE: &str = "Thumbs up detected: UNFREEZE (live again)";

/// What caused a freeze change.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FreezeTrigger {
    pub source: String,
    pub gesture: Option<Gesture>,
}

impl FreezeTrigger {
    pub fn gesture(gesture: Gesture) -> Self {
        Self {
            source: "gesture".to_string(),
            gesture: Some(gesture),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FreezeTransition {
    pub frozen: bool,
    pub trigger: FreezeTrigger,
}

/// Result of one hand frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub transition: Option<FreezeTransition>,
    pub status: Option<GestureStatus>,
}

/// Palm freezes, thumbs up unfreezes, with a cooldown between firings.
#[derive(Debug, Clone)]
pub struct FreezeController {
    config: GestureConfig,
    frozen: bool,
    last_fire_ms: Option<f64>,
    throttle: StatusThrottle,
}

impl FreezeController {
    pub fn new(config: GestureConfig) -> Self {
        let throttle = StatusThrottle::new(config.status_throttle_ms);
        Self {
            config,
            frozen: false,
            last_fire_ms: None,
            throttle,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn status(&self) -> GestureStatus {
        self.throttle.current()
    }

    /// Feed one frame's classification. `hand_present` is false when the
    /// estimator found no hand at all.
    pub fn observe(
        &mut self,
        gesture: Option<Gesture>,
        hand_present: bool,
        now_ms: f64,
    ) -> FrameOutcome {
        if self.frozen {
            if gesture == Some(Gesture::ThumbsUp) {
                return self.fire(false, Gesture::ThumbsUp, now_ms);
            }
            return self.status_only(STATUS_FROZEN, None, now_ms);
        }

        if !hand_present {
            return self.status_only(STATUS_NO_HAND, None, now_ms);
        }

        match gesture {
            Some(Gesture::ThumbsUp) => {
                self.status_only(STATUS_ALREADY_LIVE, Some(Gesture::ThumbsUp), now_ms)
            }
            Some(Gesture::Palm) => self.fire(true, Gesture::Palm, now_ms),
            None => self.status_only(STATUS_READY, None, now_ms),
        }
    }

    fn status_only(&mut self, text: &str, gesture: Option<Gesture>, now_ms: f64) -> FrameOutcome {
        FrameOutcome {
            transition: None,
            status: self.throttle.update(text, gesture, false, now_ms),
        }
    }

    fn fire(&mut self, frozen: bool, gesture: Gesture, now_ms: f64) -> FrameOutcome {
        if let Some(last) = self.last_fire_ms {
            if now_ms - last < self.config.cooldown_ms {
                log_debug!("{gesture} ignored, cooldown ({:.0}ms since last)", now_ms - last);
                return FrameOutcome::default();
            }
        }

        self.last_fire_ms = Some(now_ms);
        self.frozen = frozen;
        log_info!("{gesture} -> {}", if frozen { "freeze" } else { "unfreeze" });

        let text = if frozen { STATUS_FROZE } else { STATUS_UNFROZE };
        FrameOutcome {
            transition: Some(FreezeTransition {
                frozen,
                trigger: FreezeTrigger::gesture(gesture),
            }),
            status: self.throttle.update(text, Some(gesture), true, now_ms),
        }
    }

    /// Drop the local frozen flag after an external reset. The cooldown clock
    /// is kept.
    pub fn release(&mut self) {
        self.frozen = false;
    }

    pub fn reset(&mut self) {
        self.frozen = false;
        self.last_fire_ms = None;
        self.throttle.reset();
    }

    /// Forced ready status shown when gesture control starts.
    pub fn announce_ready(&mut self, now_ms: f64) -> Option<GestureStatus> {
        self.throttle.update(STATUS_READY, None, true, now_ms)
    }
}
