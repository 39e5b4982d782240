//! Static hand poses recognised from a single landmark frame.
//!
//! Landmark indices follow the 21-point hand model: 3/4 are the thumb joint
//! and tip, 6/10/14/18 the proximal joints and 8/12/16/20 the tips of the
//! index, middle, ring and pinky fingers. Image `y` grows downward, so "above"
//! means a smaller `y`.

use serde::{Deserialize, Serialize};

use crate::models::HandLandmarks;

use super::GestureConfig;

const THUMB_JOINT: usize = 3;
const THUMB_TIP: usize = 4;
const INDEX_TIP: usize = 8;
const PINKY_TIP: usize = 20;
const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];
const FINGER_JOINTS: [usize; 4] = [6, 10, 14, 18];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Palm,
    ThumbsUp,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Palm => "palm",
            Gesture::ThumbsUp => "thumbs_up",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn extended_fingers(hand: &HandLandmarks) -> usize {
    FINGER_TIPS
        .iter()
        .zip(FINGER_JOINTS)
        .filter(|(tip, joint)| hand.get(**tip).y < hand.get(*joint).y)
        .count()
}

fn folded_fingers(hand: &HandLandmarks) -> usize {
    FINGER_TIPS
        .iter()
        .zip(FINGER_JOINTS)
        .filter(|(tip, joint)| hand.get(**tip).y > hand.get(*joint).y)
        .count()
}

/// Open hand: most fingers up and spread wide.
pub fn is_open_palm(hand: &HandLandmarks, config: &GestureConfig) -> bool {
    let spread = (hand.get(PINKY_TIP).x - hand.get(INDEX_TIP).x).abs();
    extended_fingers(hand) >= config.palm_min_extended && spread > config.palm_min_spread
}

/// Thumb pointing up with the other fingers mostly folded.
pub fn is_thumbs_up(hand: &HandLandmarks, config: &GestureConfig) -> bool {
    let thumb_up = hand.get(THUMB_TIP).y < hand.get(THUMB_JOINT).y;
    thumb_up && folded_fingers(hand) >= config.thumbs_min_folded
}

/// Thumbs up takes precedence over palm when both match.
pub fn detect_gesture(hand: &HandLandmarks, config: &GestureConfig) -> Option<Gesture> {
    if is_thumbs_up(hand, config) {
        Some(Gesture::ThumbsUp)
    } else if is_open_palm(hand, config) {
        Some(Gesture::Palm)
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{HandLandmarks, Landmark, LANDMARK_COUNT};

    /// Neutral hand with every point at mid-frame.
    fn base() -> [Landmark; LANDMARK_COUNT] {
        [Landmark::new(0.5, 0.5); LANDMARK_COUNT]
    }

    pub fn open_palm() -> HandLandmarks {
        let mut points = base();
        // Thumb pointing sideways, level with its joint.
        points[3] = Landmark::new(0.30, 0.55);
        points[4] = Landmark::new(0.25, 0.55);
        for (i, x) in [0.35, 0.45, 0.55, 0.65].into_iter().enumerate() {
            points[6 + i * 4] = Landmark::new(x, 0.45);
            points[8 + i * 4] = Landmark::new(x, 0.25);
        }
        HandLandmarks::new(points)
    }

    pub fn thumbs_up() -> HandLandmarks {
        let mut points = base();
        points[3] = Landmark::new(0.45, 0.40);
        points[4] = Landmark::new(0.45, 0.30);
        for (i, x) in [0.48, 0.50, 0.52, 0.54].into_iter().enumerate() {
            points[6 + i * 4] = Landmark::new(x, 0.50);
            points[8 + i * 4] = Landmark::new(x, 0.58);
        }
        HandLandmarks::new(points)
    }

    pub fn fist() -> HandLandmarks {
        let mut raw = *thumbs_up().points();
        // Thumb tucked below its joint.
        raw[4] = Landmark::new(0.45, 0.48);
        HandLandmarks::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::Landmark;

    #[test]
    fn recognises_open_palm() {
        let config = GestureConfig::default();
        assert!(is_open_palm(&open_palm(), &config));
        assert!(!is_thumbs_up(&open_palm(), &config));
        assert_eq!(detect_gesture(&open_palm(), &config), Some(Gesture::Palm));
    }

    #[test]
    fn narrow_palm_is_not_a_palm() {
        let config = GestureConfig::default();
        let mut raw = *open_palm().points();
        raw[20] = Landmark::new(0.45, 0.25);
        // Spread is now 0.10, below the 0.18 minimum.
        assert!(!is_open_palm(&HandLandmarks::new(raw), &config));
    }

    #[test]
    fn recognises_thumbs_up() {
        let config = GestureConfig::default();
        assert!(is_thumbs_up(&thumbs_up(), &config));
        assert_eq!(detect_gesture(&thumbs_up(), &config), Some(Gesture::ThumbsUp));
    }

    #[test]
    fn fist_matches_nothing() {
        assert_eq!(detect_gesture(&fist(), &GestureConfig::default()), None);
    }

    #[test]
    fn gesture_names() {
        assert_eq!(Gesture::Palm.as_str(), "palm");
        assert_eq!(Gesture::ThumbsUp.as_str(), "thumbs_up");
    }
}
