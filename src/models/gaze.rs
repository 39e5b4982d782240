use serde::{Deserialize, Serialize};

/// Semantic reading state. `Freeze` is never produced by the classifier; it is
/// imposed by the coordinator while a freeze gesture is held.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum GazeMode {
    Idle,
    Reading,
    Skimming,
    Rereading,
    Freeze,
}

impl Default for GazeMode {
    fn default() -> Self {
        GazeMode::Idle
    }
}

impl GazeMode {
    /// Modes the classifier can vote for, in tie-break order.
    pub const CLASSIFIED: [GazeMode; 4] = [
        GazeMode::Idle,
        GazeMode::Reading,
        GazeMode::Skimming,
        GazeMode::Rereading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GazeMode::Idle => "idle",
            GazeMode::Reading => "reading",
            GazeMode::Skimming => "skimming",
            GazeMode::Rereading => "rereading",
            GazeMode::Freeze => "freeze",
        }
    }
}

impl std::fmt::Display for GazeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI-selected presentation. `Adaptive` is the gaze-driven reader.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    Baseline,
    Adaptive,
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Baseline
    }
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Baseline => "baseline",
            DisplayMode::Adaptive => "adaptive",
        }
    }
}

/// Raw estimator output in viewport pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GazePrediction {
    pub x: f64,
    pub y: f64,
}

/// One timestamped observation. `t_ms` comes from a monotonic session clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GazeSample {
    pub x: f64,
    pub y: f64,
    pub t_ms: f64,
}

impl GazeSample {
    pub fn new(x: f64, y: f64, t_ms: f64) -> Self {
        Self { x, y, t_ms }
    }
}

/// A sample enriched with the line it resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazePoint {
    pub sample: GazeSample,
    pub line_index: Option<usize>,
}
