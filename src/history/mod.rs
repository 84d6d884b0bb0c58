mod memory;
mod reweight;

pub use memory::MemoryHistory;
pub use reweight::recompute_bias;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AdaptationEvent, Feedback};

/// What a feedback call did to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Recorded,
    /// The event already carried feedback; first-feedback-wins, so the call
    /// was a no-op.
    AlreadySet,
    UnknownEvent,
}

/// Append-only adaptation log with a single mutation path: the idempotent
/// feedback fill-in.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, event: AdaptationEvent) -> Result<()>;

    /// Tag an event with user feedback. No-op for unknown ids and for
    /// events that already have feedback.
    async fn provide_feedback(&self, event_id: &str, feedback: Feedback)
        -> Result<FeedbackOutcome>;

    /// All recorded events, oldest first.
    async fn events(&self) -> Result<Vec<AdaptationEvent>>;

    async fn commit_count(&self) -> Result<u64>;
}

/// Per-rule soft bias learned from feedback, keyed by context bucket.
///
/// Consumed only as the tie-break among equal-priority rule candidates;
/// declared priorities are never modified.
#[derive(Debug, Clone, Default)]
pub struct RuleBias {
    weights: HashMap<(String, String), f64>,
}

impl RuleBias {
    pub fn for_rule(&self, bucket: &str, rule_id: &str) -> f64 {
        self.weights
            .get(&(bucket.to_string(), rule_id.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, bucket: impl Into<String>, rule_id: impl Into<String>, bias: f64) {
        self.weights
            .insert((bucket.into(), rule_id.into()), bias.clamp(-1.0, 1.0));
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
