use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{GazePrediction, HandLandmarks};

/// Which physical sensor a status message refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    Gaze,
    Hand,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Gaze => "gaze",
            SensorKind::Hand => "hand",
        }
    }
}

/// A gaze estimator polled at a fixed rate.
#[async_trait]
pub trait GazeSource: Send {
    /// Acquire the camera and load the model. Failing here leaves the session
    /// running without gaze input.
    async fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// The latest estimate in viewport pixels, or `None` when the estimator
    /// has nothing to offer this tick.
    async fn current_prediction(&mut self) -> Result<Option<GazePrediction>>;

    async fn stop(&mut self) {}
}

/// A hand landmark detector producing at most one hand per frame.
#[async_trait]
pub trait HandSource: Send {
    async fn start(&mut self) -> Result<()> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<HandLandmarks>>;

    async fn stop(&mut self) {}
}
