use serde::{Deserialize, Serialize};

/// Vertical and horizontal bounds of one rendered sentence in document
/// coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SentenceRect {
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl SentenceRect {
    pub fn center_y(&self) -> f64 {
        self.top + (self.bottom - self.top) / 2.0
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Bounding box of a rendered sentence element as reported by the renderer,
/// in viewport coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RenderedSentence {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Presentation state reported by the reader surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub height: f64,
    pub scroll: ScrollOffset,
    /// Text entry has keyboard focus; auto-scroll must not fight the caret.
    pub input_focused: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: 900.0,
            scroll: ScrollOffset::default(),
            input_focused: false,
        }
    }
}
