pub mod config;
pub mod gaze_classifier;
pub mod history;

pub use config::ClassifierConfig;
pub use gaze_classifier::{ClassifierOutput, GazeClassifier};
pub use history::ModeHistory;
