//! End-to-end flow: a late-night mobile reading session moves through the
//! collector, detector, rule resolution, commit, and feedback.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use attune::{
    default_catalog, AttuneEngine, ContentCategory, ContentMeta, DeviceClass, DeviceInfo,
    EngineConfig, EngineController, Feedback, FeedbackOutcome, HistoryStore,
    InMemoryPresentationStore, InteractionSample, MemoryHistory, PresentationStore, RuleCatalog,
    SampleKind, StaticPresetCatalog,
};

fn late_night() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 23, 5, 0).unwrap()
}

/// Twenty minutes of session, with pauses frequent enough to trip the
/// motion-reduction threshold.
fn build_night_engine(
    store: Arc<InMemoryPresentationStore>,
    history: Arc<MemoryHistory>,
) -> AttuneEngine {
    let now = late_night();
    let config = EngineConfig {
        adaptation_strength: 100,
        ..EngineConfig::default()
    };
    let engine = AttuneEngine::new(
        config,
        default_catalog(Arc::new(StaticPresetCatalog::builtin())),
        DeviceInfo::new(DeviceClass::Mobile),
        store,
        history,
    )
    .with_session_start(now - Duration::minutes(20));
    engine.set_content(ContentMeta::new(ContentCategory::Article));

    for i in 0..30 {
        let at = now - Duration::seconds(240 - i * 8);
        engine.record_sample(InteractionSample::new(at, SampleKind::Scroll, 120.0));
        engine.record_sample(InteractionSample::new(at, SampleKind::FocusPause, 1_500.0));
    }

    engine
}

#[tokio::test]
async fn night_mobile_session_composes_expected_rules() {
    let store = Arc::new(InMemoryPresentationStore::default());
    let history = Arc::new(MemoryHistory::new());
    let engine = build_night_engine(store.clone(), history.clone());

    let event = engine.evaluate_once(late_night()).await.unwrap().unwrap();

    // Both the night and mobile rules were eligible and land in declared
    // priority order.
    let night_pos = event
        .rules_applied
        .iter()
        .position(|id| id == "night-reading-comfort")
        .expect("night rule applied");
    let mobile_pos = event
        .rules_applied
        .iter()
        .position(|id| id == "mobile-readability")
        .expect("mobile rule applied");
    assert!(night_pos < mobile_pos);

    // The night rule owns the background; the mobile rule owns the type
    // scale; the pause cadence also tripped motion reduction.
    let applied = store.get_current();
    assert_eq!(applied.background, "#1c1917");
    assert!(applied.font_scale >= 1.15);
    assert!(applied.reduce_motion);

    // The archived event matches what the store now holds.
    let events = history.events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].after, applied);
    assert_eq!(events[0].context.hour_of_day, 23);
    assert!(events[0].metrics.pause_frequency > 6.0);
}

#[tokio::test]
async fn feedback_is_first_write_wins_through_the_engine() {
    let store = Arc::new(InMemoryPresentationStore::default());
    let history = Arc::new(MemoryHistory::new());
    let engine = build_night_engine(store, history.clone());

    let event = engine.evaluate_once(late_night()).await.unwrap().unwrap();

    let outcome = engine
        .provide_feedback(&event.id, Feedback::Positive)
        .await
        .unwrap();
    assert_eq!(outcome, FeedbackOutcome::Recorded);

    let outcome = engine
        .provide_feedback(&event.id, Feedback::Negative)
        .await
        .unwrap();
    assert_eq!(outcome, FeedbackOutcome::AlreadySet);

    let events = history.events().await.unwrap();
    assert_eq!(events[0].feedback, Some(Feedback::Positive));
    assert_eq!(events[0].effectiveness_score, Some(1.0));
}

#[tokio::test]
async fn zero_strength_never_commits() {
    let store = Arc::new(InMemoryPresentationStore::default());
    let history = Arc::new(MemoryHistory::new());
    let now = late_night();

    let config = EngineConfig {
        adaptation_strength: 0,
        ..EngineConfig::default()
    };
    let engine = AttuneEngine::new(
        config,
        default_catalog(Arc::new(StaticPresetCatalog::builtin())),
        DeviceInfo::new(DeviceClass::Mobile),
        store,
        history.clone(),
    )
    .with_session_start(now - Duration::minutes(20));

    for i in 0..10 {
        engine.record_sample(InteractionSample::new(
            now - Duration::seconds(100 - i * 10),
            SampleKind::FocusPause,
            1_000.0,
        ));
    }

    assert!(engine.evaluate_once(now).await.unwrap().is_none());
    assert_eq!(history.commit_count().await.unwrap(), 0);
}

#[tokio::test]
async fn scheduler_ticks_commit_and_stop_cleanly() {
    use attune::AdaptationRule;

    // A clock-independent rule so the tick commits whatever the wall time.
    let catalog = RuleCatalog::new(vec![AdaptationRule::new(
        "tint",
        5,
        "always tint the accent",
        |_, _| true,
        |config, _, _| {
            let mut draft = config.clone();
            draft.accent = "#0f766e".into();
            Ok(draft)
        },
    )]);

    let store = Arc::new(InMemoryPresentationStore::default());
    let history = Arc::new(MemoryHistory::new());
    let config = EngineConfig {
        adaptation_strength: 100,
        tick_interval_ms: 20,
        ..EngineConfig::default()
    };
    let engine = Arc::new(AttuneEngine::new(
        config,
        catalog,
        DeviceInfo::new(DeviceClass::Desktop),
        store.clone(),
        history.clone(),
    ));

    let mut controller = EngineController::new(engine);
    assert!(!controller.is_running());
    controller.start().unwrap();
    assert!(controller.is_running());
    assert!(controller.start().is_err());

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    controller.stop().await.unwrap();
    assert!(!controller.is_running());

    // The first tick committed; later ticks converged and stayed quiet.
    assert_eq!(history.commit_count().await.unwrap(), 1);
    assert_eq!(store.get_current().accent, "#0f766e");

    // Stopping twice is harmless.
    controller.stop().await.unwrap();
}

#[tokio::test]
async fn manual_trigger_accepted_while_idle() {
    let store = Arc::new(InMemoryPresentationStore::default());
    let history = Arc::new(MemoryHistory::new());
    let engine = Arc::new(build_night_engine(store, history));

    let controller = EngineController::new(Arc::clone(&engine));

    // Nothing in flight: the trigger is accepted (whether or not the
    // wall-clock context commits anything).
    assert!(controller.trigger_now().await.is_ok());
}
