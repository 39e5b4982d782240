mod gaze;
mod hand;
mod layout;

pub use gaze::{DisplayMode, GazeMode, GazePoint, GazePrediction, GazeSample};
pub use hand::{HandLandmarks, Landmark, LANDMARK_COUNT};
pub use layout::{RenderedSentence, ScrollOffset, SentenceRect, Viewport};
