use anyhow::Result;

use crate::models::{BehavioralMetrics, EnvironmentalContext, PresentationConfig};

type Predicate = dyn Fn(&BehavioralMetrics, &EnvironmentalContext) -> bool + Send + Sync;
type Transform = dyn Fn(&PresentationConfig, &BehavioralMetrics, &EnvironmentalContext) -> Result<PresentationConfig>
    + Send
    + Sync;

/// A data-described condition→adaptation pair.
///
/// Rules are defined at catalog construction and never mutated afterwards.
/// The transform takes the config as mutated by earlier rules in the chain
/// and returns a new draft; returning `Err` marks the rule as skipped for
/// the current tick without aborting the batch.
pub struct AdaptationRule {
    id: String,
    priority: i32,
    rationale: String,
    predicate: Box<Predicate>,
    transform: Box<Transform>,
}

impl AdaptationRule {
    pub fn new(
        id: impl Into<String>,
        priority: i32,
        rationale: impl Into<String>,
        predicate: impl Fn(&BehavioralMetrics, &EnvironmentalContext) -> bool + Send + Sync + 'static,
        transform: impl Fn(&PresentationConfig, &BehavioralMetrics, &EnvironmentalContext) -> Result<PresentationConfig>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            rationale: rationale.into(),
            predicate: Box::new(predicate),
            transform: Box::new(transform),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn applies(&self, metrics: &BehavioralMetrics, context: &EnvironmentalContext) -> bool {
        (self.predicate)(metrics, context)
    }

    pub fn apply(
        &self,
        config: &PresentationConfig,
        metrics: &BehavioralMetrics,
        context: &EnvironmentalContext,
    ) -> Result<PresentationConfig> {
        (self.transform)(config, metrics, context)
    }
}

impl std::fmt::Debug for AdaptationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptationRule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("rationale", &self.rationale)
            .finish()
    }
}

/// Ordered, introspectable set of adaptation rules.
#[derive(Debug, Default)]
pub struct RuleCatalog {
    rules: Vec<AdaptationRule>,
}

impl RuleCatalog {
    pub fn new(rules: Vec<AdaptationRule>) -> Self {
        Self { rules }
    }

    /// Extend the catalog at construction time. Duplicate ids replace the
    /// earlier definition so embedders can override a built-in rule.
    pub fn with_rule(mut self, rule: AdaptationRule) -> Self {
        self.rules.retain(|existing| existing.id() != rule.id());
        self.rules.push(rule);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdaptationRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AdaptationRule> {
        self.rules.iter().find(|rule| rule.id() == id)
    }
}
