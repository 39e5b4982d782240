//! Recorded sensor traces played back as sources.
//!
//! A trace is JSON lines, one observation per line, in capture order:
//!
//! ```text
//! {"gaze": {"x": 412.0, "y": 230.5}}
//! {"gaze": null}
//! {"hand": [{"x": 0.5, "y": 0.8}, ...]}
//! {"hand": null}
//! ```
//!
//! Gaze entries are consumed one per poll and hand entries one per frame, so
//! the two streams keep their own cadence. Blank lines and `#` comments are
//! skipped.

use std::collections::VecDeque;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{GazePrediction, HandLandmarks};

use super::{GazeSource, HandSource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum TraceEntry {
    Gaze(Option<GazePrediction>),
    Hand(Option<HandLandmarks>),
}

#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub gaze: Vec<Option<GazePrediction>>,
    pub hand: Vec<Option<HandLandmarks>>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open trace {}", path.display()))?;
        Self::parse(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to parse trace {}", path.display()))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut trace = Trace::default();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry: TraceEntry = serde_json::from_str(line)
                .with_context(|| format!("line {}", number + 1))?;
            match entry {
                TraceEntry::Gaze(prediction) => trace.gaze.push(prediction),
                TraceEntry::Hand(hand) => trace.hand.push(hand),
            }
        }
        Ok(trace)
    }

    pub fn into_sources(self) -> (ReplayGazeSource, ReplayHandSource) {
        (
            ReplayGazeSource::new(self.gaze),
            ReplayHandSource::new(self.hand),
        )
    }
}

pub struct ReplayGazeSource {
    predictions: VecDeque<Option<GazePrediction>>,
}

impl ReplayGazeSource {
    pub fn new(predictions: Vec<Option<GazePrediction>>) -> Self {
        Self {
            predictions: predictions.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.predictions.len()
    }
}

#[async_trait]
impl GazeSource for ReplayGazeSource {
    async fn current_prediction(&mut self) -> Result<Option<GazePrediction>> {
        Ok(self.predictions.pop_front().flatten())
    }
}

pub struct ReplayHandSource {
    frames: VecDeque<Option<HandLandmarks>>,
}

impl ReplayHandSource {
    pub fn new(frames: Vec<Option<HandLandmarks>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl HandSource for ReplayHandSource {
    async fn next_frame(&mut self) -> Result<Option<HandLandmarks>> {
        Ok(self.frames.pop_front().flatten())
    }
}
