use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SampleKind {
    Scroll,
    Click,
    FocusPause,
}

/// A single raw interaction observation. Immutable once recorded.
///
/// `value` is kind-dependent: scroll distance in pixels for `Scroll`,
/// always 1.0 for `Click`, pause length in milliseconds for `FocusPause`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSample {
    pub timestamp: DateTime<Utc>,
    pub kind: SampleKind,
    pub value: f64,
}

impl InteractionSample {
    pub fn new(timestamp: DateTime<Utc>, kind: SampleKind, value: f64) -> Self {
        Self {
            timestamp,
            kind,
            value,
        }
    }

    /// Samples with non-finite or negative magnitudes are noise and never
    /// enter the buffer.
    pub fn is_well_formed(&self) -> bool {
        self.value.is_finite() && self.value >= 0.0
    }
}

/// Best-effort snapshot of the collector's window, handed to the detector.
#[derive(Debug, Clone)]
pub struct RawSignals {
    /// Approximately time-ordered window contents, oldest first.
    pub samples: Vec<InteractionSample>,
    pub session_started_at: DateTime<Utc>,
    /// Malformed samples rejected since session start.
    pub dropped_count: u64,
}
