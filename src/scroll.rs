//! Edge-proximity auto-scroll driven by the latest gaze `y`.

use serde::{Deserialize, Serialize};

use crate::models::Viewport;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    pub enabled: bool,
    /// Height of the top band; the bottom band is twice as tall.
    pub edge_px: f64,
    pub max_px_per_tick: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            edge_px: 120.0,
            max_px_per_tick: 34.0,
        }
    }
}

/// Scroll delta in px for one gaze sample; negative scrolls up. `None` when no
/// scrolling should happen.
pub fn compute_scroll_delta(
    config: &ScrollConfig,
    gaze_y: Option<f64>,
    viewport: &Viewport,
    active: bool,
    frozen: bool,
) -> Option<f64> {
    if !config.enabled || !active || frozen || viewport.input_focused {
        return None;
    }
    let y = gaze_y?;
    if !y.is_finite() {
        return None;
    }

    let height = viewport.height;
    let top_edge = config.edge_px;
    let bottom_edge = height - config.edge_px * 2.0;
    let max = config.max_px_per_tick;
    if !max.is_finite() || max <= 0.0 {
        return None;
    }
    let min = max.min(1.0);

    if y < top_edge {
        let depth = (top_edge - y) / top_edge;
        Some(-(depth * max).clamp(min, max))
    } else if y > bottom_edge {
        let depth = (y - bottom_edge) / (height - bottom_edge).max(1.0);
        Some((depth * max).clamp(min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            height: 1000.0,
            ..Viewport::default()
        }
    }

    #[test]
    fn middle_of_screen_does_not_scroll() {
        let delta = compute_scroll_delta(&ScrollConfig::default(), Some(500.0), &viewport(), true, false);
        assert_eq!(delta, None);
    }

    #[test]
    fn top_band_scrolls_up_proportionally() {
        let config = ScrollConfig::default();
        let half = compute_scroll_delta(&config, Some(60.0), &viewport(), true, false).unwrap();
        assert!((half + 17.0).abs() < 1e-9);

        let edge = compute_scroll_delta(&config, Some(0.0), &viewport(), true, false).unwrap();
        assert_eq!(edge, -34.0);
    }

    #[test]
    fn bottom_band_scrolls_down_and_caps() {
        let config = ScrollConfig::default();
        // Bottom band starts at 1000 - 240 = 760.
        let delta = compute_scroll_delta(&config, Some(880.0), &viewport(), true, false).unwrap();
        assert!((delta - 17.0).abs() < 1e-9);

        let beyond = compute_scroll_delta(&config, Some(5_000.0), &viewport(), true, false).unwrap();
        assert_eq!(beyond, 34.0);
    }

    #[test]
    fn degenerate_speed_cap_never_panics() {
        for max_px_per_tick in [0.0, -5.0, f64::NAN] {
            let config = ScrollConfig {
                max_px_per_tick,
                ..ScrollConfig::default()
            };
            assert_eq!(compute_scroll_delta(&config, Some(10.0), &viewport(), true, false), None);
            assert_eq!(compute_scroll_delta(&config, Some(990.0), &viewport(), true, false), None);
        }

        let slow = ScrollConfig {
            max_px_per_tick: 0.5,
            ..ScrollConfig::default()
        };
        assert_eq!(compute_scroll_delta(&slow, Some(0.0), &viewport(), true, false), Some(-0.5));
        assert_eq!(compute_scroll_delta(&slow, Some(990.0), &viewport(), true, false), Some(0.5));
    }

    #[test]
    fn gated_by_state() {
        let config = ScrollConfig::default();
        let vp = viewport();
        assert_eq!(compute_scroll_delta(&config, Some(0.0), &vp, false, false), None);
        assert_eq!(compute_scroll_delta(&config, Some(0.0), &vp, true, true), None);
        assert_eq!(compute_scroll_delta(&config, None, &vp, true, false), None);

        let focused = Viewport {
            input_focused: true,
            ..vp
        };
        assert_eq!(compute_scroll_delta(&config, Some(0.0), &focused, true, false), None);
    }
}
