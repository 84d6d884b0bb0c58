use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use log::info;

use attune::{
    default_catalog, AttuneEngine, ContentCategory, ContentMeta, DeviceClass, DeviceInfo,
    EngineConfig, EngineController, Feedback, InMemoryPresentationStore, InteractionSample,
    MemoryHistory, PresentationStore, SampleKind, StaticPresetCatalog,
};

/// Replays a synthetic late-night mobile reading session through the engine
/// and prints what the rules decided.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("attune demo starting up...");

    let presets = Arc::new(StaticPresetCatalog::builtin());
    let store = Arc::new(InMemoryPresentationStore::default());
    let history = Arc::new(MemoryHistory::new());

    let config = EngineConfig {
        adaptation_strength: 100,
        tick_interval_ms: 2_000,
        ..EngineConfig::default()
    };

    // A session that has been running for twenty minutes, late at night.
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 23, 5, 0).unwrap();
    let session_start = now - Duration::minutes(20);

    let engine = Arc::new(
        AttuneEngine::new(
            config,
            default_catalog(presets),
            DeviceInfo::new(DeviceClass::Mobile),
            store.clone(),
            history,
        )
        .with_session_start(session_start),
    );
    engine.set_content(ContentMeta::new(ContentCategory::Article));

    // Slow scrolling with frequent focus pauses over the last few minutes.
    for i in 0..30 {
        let at = now - Duration::seconds(240 - i * 8);
        engine.record_sample(InteractionSample::new(at, SampleKind::Scroll, 120.0));
        if i % 3 == 0 {
            engine.record_sample(InteractionSample::new(at, SampleKind::FocusPause, 1_500.0));
        }
    }

    let before = store.get_current();
    match engine.evaluate_once(now).await? {
        Some(event) => {
            info!("adaptation committed: {}", event.id);
            info!("  rules applied: {:?}", event.rules_applied);
            for line in &event.rationale {
                info!("  rationale: {line}");
            }
            info!("  changed params: {:?}", event.after.diff(&before));
            info!("  background: {} -> {}", before.background, event.after.background);

            let outcome = engine.provide_feedback(&event.id, Feedback::Positive).await?;
            info!("feedback recorded: {outcome:?}");
        }
        None => info!("no adaptation was necessary"),
    }

    // Same inputs again: the engine converges and stays quiet.
    if engine.evaluate_once(now + Duration::seconds(30)).await?.is_none() {
        info!("second evaluation converged, nothing to commit");
    }

    // Scheduler lifecycle: tick a couple of times, then shut down cleanly.
    let mut controller = EngineController::new(engine);
    controller.start()?;
    tokio::time::sleep(std::time::Duration::from_millis(4_500)).await;
    controller.stop().await?;
    info!("scheduler stopped, demo complete");

    Ok(())
}
