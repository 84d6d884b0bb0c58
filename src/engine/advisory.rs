use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{timeout, Duration};

use crate::models::{BehavioralMetrics, EnvironmentalContext, PresentationConfig};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Optional external suggestion source. Unreliable by contract: it may be
/// slow, error out, or return garbage, and the engine must never depend on
/// it producing anything.
#[async_trait]
pub trait AdvisoryScorer: Send + Sync {
    /// Suggest a full configuration for the current situation. `draft` is
    /// the rule-composed result the engine will fall back to.
    async fn advise(
        &self,
        context: &EnvironmentalContext,
        metrics: &BehavioralMetrics,
        draft: &PresentationConfig,
    ) -> Result<PresentationConfig>;
}

/// Consult the scorer under a deadline. Any failure mode — error, timeout,
/// or an out-of-bounds suggestion — yields `None` and the caller keeps the
/// rule-composed draft.
pub(crate) async fn consult(
    scorer: &dyn AdvisoryScorer,
    timeout_ms: u64,
    context: &EnvironmentalContext,
    metrics: &BehavioralMetrics,
    draft: &PresentationConfig,
) -> Option<PresentationConfig> {
    match timeout(
        Duration::from_millis(timeout_ms),
        scorer.advise(context, metrics, draft),
    )
    .await
    {
        Ok(Ok(suggested)) if suggested.is_valid() => Some(suggested),
        Ok(Ok(_)) => {
            log_warn!("advisory suggestion failed validation, keeping rule-composed result");
            None
        }
        Ok(Err(err)) => {
            log_warn!("advisory scorer failed: {err:#}, keeping rule-composed result");
            None
        }
        Err(_) => {
            log_warn!("advisory scorer timed out after {timeout_ms}ms, keeping rule-composed result");
            None
        }
    }
}
