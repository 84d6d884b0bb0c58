use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::{AttuneEngine, TriggerError};
use crate::models::AdaptationEvent;

use super::adaptation_loop;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns the scheduler lifecycle for one engine.
///
/// `start` spawns the tick loop, `stop` cancels and joins it. Manual
/// triggers go through the same phase guard as the timer, so a trigger
/// during an in-flight evaluation is rejected rather than queued.
pub struct EngineController {
    engine: Arc<AttuneEngine>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl EngineController {
    pub fn new(engine: Arc<AttuneEngine>) -> Self {
        Self {
            engine,
            handle: None,
            cancel_token: None,
        }
    }

    pub fn engine(&self) -> &Arc<AttuneEngine> {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            bail!("adaptation scheduler already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let engine = Arc::clone(&self.engine);

        log_info!(
            "starting adaptation scheduler (tick every {}ms)",
            self.engine.config().tick_interval_ms
        );
        let handle = tokio::spawn(adaptation_loop(engine, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("adaptation loop task failed to join")?;
        }
        Ok(())
    }

    /// Run one evaluation immediately. Accepted only while the engine is
    /// idle; returns [`TriggerError::Busy`] otherwise.
    pub async fn trigger_now(&self) -> Result<Option<AdaptationEvent>, TriggerError> {
        self.engine.evaluate_once(Utc::now()).await
    }
}
