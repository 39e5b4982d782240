pub mod config;
pub mod controller;
pub mod detect;
pub mod status;

pub use config::GestureConfig;
pub use controller::{FrameOutcome, FreezeController, FreezeTransition, FreezeTrigger};
pub use detect::{detect_gesture, is_open_palm, is_thumbs_up, Gesture};
pub use status::{GestureStatus, StatusThrottle};
