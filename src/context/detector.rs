use chrono::{DateTime, Utc};

use crate::config::MetricWeights;
use crate::models::{BehavioralMetrics, ContentMeta, DeviceInfo, EnvironmentalContext, RawSignals};

use super::scoring::compute_metrics;

/// Combine wall-clock time, device class, and the signal window into the
/// discrete context plus the derived metric snapshot.
///
/// Pure and deterministic given its inputs: the only clock is the passed
/// `now`, so identical arguments always produce identical output.
pub fn detect(
    raw: &RawSignals,
    now: DateTime<Utc>,
    device: &DeviceInfo,
    content: &ContentMeta,
    weights: &MetricWeights,
) -> (EnvironmentalContext, BehavioralMetrics) {
    let context = EnvironmentalContext::new(now, device, content);
    let metrics = compute_metrics(raw, now, weights);
    (context, metrics)
}
