use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Number of landmarks produced per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// A landmark normalized to [0, 1] within the (already mirrored) video frame.
/// `y` grows downward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The landmark set of a single detected hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_slice(points: &[Landmark]) -> Result<Self> {
        if points.len() != LANDMARK_COUNT {
            bail!(
                "expected {LANDMARK_COUNT} hand landmarks, got {}",
                points.len()
            );
        }
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        out.copy_from_slice(points);
        Ok(Self { points: out })
    }

    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

impl<'de> Deserialize<'de> for HandLandmarks {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Landmark>::deserialize(deserializer)?;
        HandLandmarks::from_slice(&points).map_err(serde::de::Error::custom)
    }
}
