use serde::{Deserialize, Serialize};

/// Scalar behavioral metrics derived from a signal window.
///
/// Recomputed on every evaluation tick; never authoritative outside the
/// snapshot archived in an [`AdaptationEvent`](super::AdaptationEvent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralMetrics {
    /// Average scroll velocity over the window, px/s.
    pub scroll_speed: f64,
    /// Focus pauses per minute of window time.
    pub pause_frequency: f64,
    pub clicks_per_minute: f64,
    pub session_duration_minutes: f64,
    /// Bounded composite scores, 0..=100.
    pub engagement_score: f64,
    pub eye_strain_index: f64,
    pub focus_level: f64,
}

impl Default for BehavioralMetrics {
    fn default() -> Self {
        Self {
            scroll_speed: 0.0,
            pause_frequency: 0.0,
            clicks_per_minute: 0.0,
            session_duration_minutes: 0.0,
            engagement_score: 50.0,
            eye_strain_index: 0.0,
            focus_level: 50.0,
        }
    }
}
