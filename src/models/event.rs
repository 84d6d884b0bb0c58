use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BehavioralMetrics, EnvironmentalContext, PresentationConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feedback {
    Positive,
    Negative,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Positive => "Positive",
            Feedback::Negative => "Negative",
        }
    }

    /// Scalar outcome archived next to the feedback tag.
    pub fn effectiveness_score(&self) -> f64 {
        match self {
            Feedback::Positive => 1.0,
            Feedback::Negative => 0.0,
        }
    }
}

/// One committed adaptation. Append-only; the only in-place mutation is the
/// feedback fill-in, and the first recorded feedback wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub context: EnvironmentalContext,
    pub metrics: BehavioralMetrics,
    pub rules_applied: Vec<String>,
    pub before: PresentationConfig,
    pub after: PresentationConfig,
    pub rationale: Vec<String>,
    pub feedback: Option<Feedback>,
    pub effectiveness_score: Option<f64>,
}
