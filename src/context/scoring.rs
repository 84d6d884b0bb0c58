use chrono::{DateTime, Utc};

use crate::config::MetricWeights;
use crate::models::{BehavioralMetrics, RawSignals, SampleKind};

/// Derive the behavioral metric snapshot from a signal window.
///
/// Window rates (scroll speed, pause frequency, click rate) are computed
/// over the span covered by the samples, using only non-negative deltas
/// between consecutive timestamps so jitter cannot produce negative time.
/// The composite scores are weighted linear combinations clamped to
/// [0, 100]; the weights come from [`MetricWeights`].
pub fn compute_metrics(
    raw: &RawSignals,
    now: DateTime<Utc>,
    weights: &MetricWeights,
) -> BehavioralMetrics {
    let session_duration_minutes =
        ((now - raw.session_started_at).num_seconds().max(0) as f64) / 60.0;

    let span_secs = window_span_secs(raw);
    let span_minutes = span_secs / 60.0;

    let mut scroll_px = 0.0;
    let mut pauses = 0u32;
    let mut clicks = 0u32;
    for sample in &raw.samples {
        match sample.kind {
            SampleKind::Scroll => scroll_px += sample.value,
            SampleKind::FocusPause => pauses += 1,
            SampleKind::Click => clicks += 1,
        }
    }

    let scroll_speed = if span_secs > 0.0 {
        scroll_px / span_secs
    } else {
        0.0
    };
    let pause_frequency = if span_minutes > 0.0 {
        f64::from(pauses) / span_minutes
    } else {
        0.0
    };
    let clicks_per_minute = if span_minutes > 0.0 {
        f64::from(clicks) / span_minutes
    } else {
        0.0
    };

    let eye_strain_index = clamp_score(
        session_duration_minutes * weights.strain_per_session_minute
            + scroll_speed * weights.strain_per_scroll_speed
            + pause_frequency * weights.strain_per_pause,
    );

    let focus_level = clamp_score(
        weights.focus_baseline
            - pause_frequency * weights.focus_pause_penalty
            - clicks_per_minute * weights.focus_click_penalty,
    );

    let engagement_score = clamp_score(
        weights.engagement_baseline
            + clicks_per_minute * weights.engagement_per_click
            + scroll_speed * weights.engagement_per_scroll_speed
            - pause_frequency * weights.engagement_pause_penalty,
    );

    BehavioralMetrics {
        scroll_speed,
        pause_frequency,
        clicks_per_minute,
        session_duration_minutes,
        engagement_score,
        eye_strain_index,
        focus_level,
    }
}

/// Seconds covered by the window, summing only monotonic deltas.
fn window_span_secs(raw: &RawSignals) -> f64 {
    let mut span_ms: i64 = 0;
    for pair in raw.samples.windows(2) {
        let delta = (pair[1].timestamp - pair[0].timestamp).num_milliseconds();
        span_ms += delta.max(0);
    }
    span_ms as f64 / 1_000.0
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
