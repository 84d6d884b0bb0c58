use serde::{Deserialize, Serialize};

/// Weights for the composite behavioral scores.
///
/// Each score is a clamped weighted linear combination of the raw window
/// metrics; see `context::scoring` for the exact formulas. Tunable, not
/// hard-coded in the scoring functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWeights {
    /// Eye strain contributed per minute of session time.
    pub strain_per_session_minute: f64,
    /// Eye strain contributed per px/s of scroll speed.
    pub strain_per_scroll_speed: f64,
    /// Eye strain contributed per pause/min.
    pub strain_per_pause: f64,

    /// Focus starting point before penalties.
    pub focus_baseline: f64,
    /// Focus lost per pause/min.
    pub focus_pause_penalty: f64,
    /// Focus lost per click/min (navigation churn).
    pub focus_click_penalty: f64,

    /// Engagement starting point.
    pub engagement_baseline: f64,
    /// Engagement gained per click/min.
    pub engagement_per_click: f64,
    /// Engagement gained per px/s of scroll speed.
    pub engagement_per_scroll_speed: f64,
    /// Engagement lost per pause/min.
    pub engagement_pause_penalty: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            strain_per_session_minute: 1.2,
            strain_per_scroll_speed: 0.04,
            strain_per_pause: 2.5,
            focus_baseline: 80.0,
            focus_pause_penalty: 6.0,
            focus_click_penalty: 1.5,
            engagement_baseline: 40.0,
            engagement_per_click: 4.0,
            engagement_per_scroll_speed: 0.05,
            engagement_pause_penalty: 3.0,
        }
    }
}

/// Engine configuration with tunable thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// How eagerly adaptations are committed, 0..=100. Below the acceptance
    /// threshold (see `engine::decision`) no tick ever commits.
    pub adaptation_strength: u8,

    /// Scheduler tick period.
    pub tick_interval_ms: u64,

    /// At most this many top-priority rules compose per tick.
    pub max_rules_per_tick: usize,

    /// Deadline for the optional advisory scorer before falling back to
    /// the rule-composed result.
    pub advisory_timeout_ms: u64,

    /// Collector bounds: the window keeps the last `max_samples` samples or
    /// the last `max_sample_age_secs` seconds, whichever is smaller.
    pub max_samples: usize,
    pub max_sample_age_secs: u64,

    /// Feedback re-weighting runs on every Nth commit.
    pub reweight_every: u64,

    pub weights: MetricWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            adaptation_strength: 60,
            tick_interval_ms: 30_000,
            max_rules_per_tick: 3,
            advisory_timeout_ms: 3_000,
            max_samples: 512,
            max_sample_age_secs: 300,
            reweight_every: 5,
            weights: MetricWeights::default(),
        }
    }
}
