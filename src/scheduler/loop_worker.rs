use std::sync::Arc;

use chrono::Utc;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::{AttuneEngine, TriggerError};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// Fixed-period evaluation loop. One per running session; owned by the
/// controller and torn down through the cancellation token so no timer
/// outlives its session.
pub(crate) async fn adaptation_loop(engine: Arc<AttuneEngine>, cancel_token: CancellationToken) {
    let mut ticker =
        tokio::time::interval(Duration::from_millis(engine.config().tick_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match engine.evaluate_once(Utc::now()).await {
                    Ok(Some(event)) => {
                        log_info!(
                            "tick committed adaptation {} via rules {:?}",
                            event.id,
                            event.rules_applied
                        );
                    }
                    Ok(None) => {
                        log_debug!("tick produced no adaptation");
                    }
                    Err(TriggerError::Busy(phase)) => {
                        // A manual trigger got there first; skip, never queue.
                        log_debug!("tick skipped, evaluation already {}", phase.as_str());
                    }
                    Err(TriggerError::Store(err)) => {
                        log_error!("tick failed to commit: {err:#}");
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("adaptation loop shutting down");
                break;
            }
        }
    }
}
