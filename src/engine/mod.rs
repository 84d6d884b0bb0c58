mod advisory;
mod decision;

pub use advisory::AdvisoryScorer;
pub use decision::{resolve, Decision, ACCEPTANCE_THRESHOLD};

use std::sync::{Arc, Mutex, RwLock};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::context;
use crate::history::{recompute_bias, FeedbackOutcome, HistoryStore, RuleBias};
use crate::models::{AdaptationEvent, ContentMeta, DeviceInfo, Feedback, InteractionSample};
use crate::rules::RuleCatalog;
use crate::scheduler::{EnginePhase, PhaseGuard, PhaseReset};
use crate::signals::SignalCollector;
use crate::stores::PresentationStore;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Why an evaluation request did not produce a result.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Another evaluation holds the phase guard. Requests are rejected, not
    /// queued, to keep at most one adaptation in flight.
    #[error("adaptation already in flight (phase: {})", .0.as_str())]
    Busy(EnginePhase),

    /// The presentation store (or the history behind it) failed while
    /// committing. Nothing was persisted for this tick.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// One user session's adaptation engine.
///
/// Owns the signal window, the rule catalog, and the learned tie-break
/// bias; collaborates with the presentation store and the history store.
/// All evaluation entry points funnel through [`AttuneEngine::evaluate_once`],
/// which the phase guard keeps mutually exclusive.
pub struct AttuneEngine {
    config: EngineConfig,
    catalog: RuleCatalog,
    collector: Mutex<SignalCollector>,
    store: Arc<dyn PresentationStore>,
    history: Arc<dyn HistoryStore>,
    advisory: Option<Arc<dyn AdvisoryScorer>>,
    bias: RwLock<RuleBias>,
    device: DeviceInfo,
    content: RwLock<ContentMeta>,
    phase: PhaseGuard,
}

impl AttuneEngine {
    pub fn new(
        config: EngineConfig,
        catalog: RuleCatalog,
        device: DeviceInfo,
        store: Arc<dyn PresentationStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let collector = SignalCollector::new(Utc::now(), &config);
        Self {
            config,
            catalog,
            collector: Mutex::new(collector),
            store,
            history,
            advisory: None,
            bias: RwLock::new(RuleBias::default()),
            device,
            content: RwLock::new(ContentMeta::default()),
            phase: PhaseGuard::new(),
        }
    }

    pub fn with_advisory(mut self, scorer: Arc<dyn AdvisoryScorer>) -> Self {
        self.advisory = Some(scorer);
        self
    }

    /// Rebase the session clock, e.g. when attaching the engine to a
    /// session that started before the engine was constructed.
    pub fn with_session_start(self, started_at: DateTime<Utc>) -> Self {
        let collector = SignalCollector::new(started_at, &self.config);
        Self {
            collector: Mutex::new(collector),
            ..self
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase.current()
    }

    /// Snapshot of the learned tie-break bias.
    pub fn rule_bias(&self) -> RuleBias {
        self.bias.read().unwrap().clone()
    }

    /// Feed one raw interaction observation into the window.
    pub fn record_sample(&self, sample: InteractionSample) {
        self.collector.lock().unwrap().record(sample);
    }

    /// Update what the session is currently looking at.
    pub fn set_content(&self, content: ContentMeta) {
        *self.content.write().unwrap() = content;
    }

    /// Malformed samples rejected so far (observability).
    pub fn dropped_samples(&self) -> u64 {
        self.collector.lock().unwrap().dropped_count()
    }

    /// Tag a past adaptation with user feedback. Idempotent: the first
    /// recorded feedback wins, later calls and unknown ids are no-ops.
    pub async fn provide_feedback(
        &self,
        event_id: &str,
        feedback: Feedback,
    ) -> anyhow::Result<FeedbackOutcome> {
        let outcome = self.history.provide_feedback(event_id, feedback).await?;
        log_debug!("feedback {feedback:?} for event {event_id}: {outcome:?}");
        Ok(outcome)
    }

    /// Run one full evaluation: snapshot signals, detect context, resolve
    /// rules, consult the advisory scorer, and commit if the result is a
    /// meaningful change.
    ///
    /// `Ok(None)` means "no adaptation this tick"; `Err(Busy)` means
    /// another evaluation already holds the guard.
    pub async fn evaluate_once(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<AdaptationEvent>, TriggerError> {
        self.phase.begin_evaluating().map_err(TriggerError::Busy)?;
        let _reset = PhaseReset::new(&self.phase);
        self.evaluate_inner(now).await.map_err(TriggerError::Store)
    }

    async fn evaluate_inner(&self, now: DateTime<Utc>) -> anyhow::Result<Option<AdaptationEvent>> {
        let raw = self.collector.lock().unwrap().snapshot();
        let content = *self.content.read().unwrap();
        let (ctx, metrics) =
            context::detect(&raw, now, &self.device, &content, &self.config.weights);
        let bias = self.bias.read().unwrap().clone();
        let before = self.store.get_current();

        let Some(mut decision) = resolve(
            &self.catalog,
            &bias,
            &self.config,
            &before,
            &metrics,
            &ctx,
        ) else {
            return Ok(None);
        };

        if let Some(scorer) = &self.advisory {
            if let Some(suggested) = advisory::consult(
                scorer.as_ref(),
                self.config.advisory_timeout_ms,
                &ctx,
                &metrics,
                &decision.after,
            )
            .await
            {
                decision.after = suggested;
                decision.rationale.push("advisory suggestion applied".into());
            }
        }

        if decision.after.diff(&before).is_empty() {
            log_debug!("evaluation converged on the current config, nothing to commit");
            return Ok(None);
        }

        self.phase
            .begin_committing()
            .map_err(|phase| anyhow!("commit refused while {}", phase.as_str()))?;

        self.store
            .apply(decision.after.clone())
            .context("presentation store apply failed")?;

        let event = AdaptationEvent {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            context: ctx,
            metrics,
            rules_applied: decision.rules_applied,
            before,
            after: decision.after,
            rationale: decision.rationale,
            feedback: None,
            effectiveness_score: None,
        };
        self.history
            .append(event.clone())
            .await
            .context("failed to record adaptation event")?;

        log_info!(
            "committed adaptation {} (rules: {:?})",
            event.id,
            event.rules_applied
        );

        self.maybe_reweight().await?;

        Ok(Some(event))
    }

    /// Re-weighting pass, on every Nth commit.
    async fn maybe_reweight(&self) -> anyhow::Result<()> {
        let commits = self.history.commit_count().await?;
        let every = self.config.reweight_every.max(1);
        if commits == 0 || commits % every != 0 {
            return Ok(());
        }

        let events = self.history.events().await?;
        let bias = recompute_bias(&events);
        *self.bias.write().unwrap() = bias;
        log_info!("re-weighted rule bias after {commits} commits");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::models::{DeviceClass, PresentationConfig};
    use crate::rules::AdaptationRule;
    use crate::stores::{InMemoryPresentationStore, PresentationStore};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn accent_rule(id: &str, priority: i32, accent: &str) -> AdaptationRule {
        let accent = accent.to_string();
        AdaptationRule::new(
            id,
            priority,
            format!("write accent {accent}"),
            |_, _| true,
            move |config, _, _| {
                let mut draft = config.clone();
                draft.accent = accent.clone();
                Ok(draft)
            },
        )
    }

    fn engine_with(
        catalog: RuleCatalog,
        store: Arc<dyn PresentationStore>,
        history: Arc<dyn HistoryStore>,
    ) -> AttuneEngine {
        let config = EngineConfig {
            adaptation_strength: 100,
            ..EngineConfig::default()
        };
        AttuneEngine::new(
            config,
            catalog,
            DeviceInfo::new(DeviceClass::Desktop),
            store,
            history,
        )
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    struct SlowScorer;

    #[async_trait]
    impl AdvisoryScorer for SlowScorer {
        async fn advise(
            &self,
            _: &crate::models::EnvironmentalContext,
            _: &crate::models::BehavioralMetrics,
            _: &PresentationConfig,
        ) -> anyhow::Result<PresentationConfig> {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Err(anyhow!("too slow anyway"))
        }
    }

    struct FailingStore;

    impl PresentationStore for FailingStore {
        fn get_current(&self) -> PresentationConfig {
            PresentationConfig::default()
        }

        fn apply(&self, _: PresentationConfig) -> anyhow::Result<()> {
            Err(anyhow!("renderer went away"))
        }
    }

    #[tokio::test]
    async fn commit_writes_store_and_history() {
        let store = Arc::new(InMemoryPresentationStore::default());
        let history = Arc::new(MemoryHistory::new());
        let engine = engine_with(
            RuleCatalog::new(vec![accent_rule("a", 9, "#123456")]),
            store.clone(),
            history.clone(),
        );

        let event = engine.evaluate_once(noon()).await.unwrap().unwrap();
        assert_eq!(event.rules_applied, vec!["a"]);
        assert_eq!(store.get_current().accent, "#123456");
        assert_eq!(history.commit_count().await.unwrap(), 1);
        assert_eq!(engine.phase(), EnginePhase::Idle);

        // Converged: the same inputs produce no further commit.
        assert!(engine.evaluate_once(noon()).await.unwrap().is_none());
        assert_eq!(history.commit_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_trigger_is_rejected_while_evaluating() {
        let store = Arc::new(InMemoryPresentationStore::default());
        let history = Arc::new(MemoryHistory::new());
        let engine = Arc::new(
            engine_with(
                RuleCatalog::new(vec![accent_rule("a", 9, "#123456")]),
                store,
                history,
            )
            .with_advisory(Arc::new(SlowScorer)),
        );

        let racing = Arc::clone(&engine);
        let first = tokio::spawn(async move { racing.evaluate_once(noon()).await });

        // Let the first evaluation reach the advisory await.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let second = engine.evaluate_once(noon()).await;
        assert!(matches!(second, Err(TriggerError::Busy(_))));

        // The first one still completes (advisory fails, rules win).
        let event = first.await.unwrap().unwrap().unwrap();
        assert_eq!(event.after.accent, "#123456");
        assert_eq!(engine.phase(), EnginePhase::Idle);
    }

    #[tokio::test]
    async fn store_failure_persists_nothing_and_returns_to_idle() {
        let history = Arc::new(MemoryHistory::new());
        let engine = engine_with(
            RuleCatalog::new(vec![accent_rule("a", 9, "#123456")]),
            Arc::new(FailingStore),
            history.clone(),
        );

        let result = engine.evaluate_once(noon()).await;
        assert!(matches!(result, Err(TriggerError::Store(_))));
        assert_eq!(history.commit_count().await.unwrap(), 0);
        assert_eq!(engine.phase(), EnginePhase::Idle);

        // The guard is released, so the next attempt is not Busy.
        assert!(matches!(
            engine.evaluate_once(noon()).await,
            Err(TriggerError::Store(_))
        ));
    }

    #[tokio::test]
    async fn advisory_failure_matches_rules_only_result() {
        let catalog = || RuleCatalog::new(vec![accent_rule("a", 9, "#123456")]);

        let plain_store = Arc::new(InMemoryPresentationStore::default());
        let plain = engine_with(
            catalog(),
            plain_store.clone(),
            Arc::new(MemoryHistory::new()),
        );
        plain.evaluate_once(noon()).await.unwrap().unwrap();

        let advised_store = Arc::new(InMemoryPresentationStore::default());
        let advised = engine_with(
            catalog(),
            advised_store.clone(),
            Arc::new(MemoryHistory::new()),
        )
        .with_advisory(Arc::new(SlowScorer));
        advised.evaluate_once(noon()).await.unwrap().unwrap();

        assert_eq!(plain_store.get_current(), advised_store.get_current());
    }

    #[tokio::test]
    async fn reweighting_updates_bias_from_feedback() {
        let store = Arc::new(InMemoryPresentationStore::default());
        let history = Arc::new(MemoryHistory::new());
        let config = EngineConfig {
            adaptation_strength: 100,
            reweight_every: 1,
            ..EngineConfig::default()
        };
        let engine = AttuneEngine::new(
            config,
            RuleCatalog::new(vec![accent_rule("a", 9, "#123456")]),
            DeviceInfo::new(DeviceClass::Desktop),
            store.clone(),
            history,
        );

        let event = engine.evaluate_once(noon()).await.unwrap().unwrap();
        engine
            .provide_feedback(&event.id, Feedback::Positive)
            .await
            .unwrap();

        // Reset the store so the same rule commits again and triggers the
        // next re-weighting pass, now with feedback in the log.
        store.apply(PresentationConfig::default()).unwrap();
        engine.evaluate_once(noon()).await.unwrap().unwrap();

        let bias = engine.rule_bias();
        assert!(bias.for_rule(&event.context.bucket(), "a") > 0.0);
    }
}

