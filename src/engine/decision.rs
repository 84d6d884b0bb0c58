use crate::config::EngineConfig;
use crate::history::RuleBias;
use crate::models::{BehavioralMetrics, EnvironmentalContext, PresentationConfig};
use crate::rules::RuleCatalog;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Strength below this fraction of the scale skips the tick entirely.
/// `adaptation_strength / 100 < ACCEPTANCE_THRESHOLD` means the user asked
/// for essentially no automatic adaptation.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.25;

/// Outcome of one rule-resolution pass.
#[derive(Debug, Clone)]
pub struct Decision {
    pub after: PresentationConfig,
    pub rules_applied: Vec<String>,
    pub rationale: Vec<String>,
}

/// Resolve the rule catalog against one (metrics, context) pair.
///
/// Candidate ordering is priority descending, then feedback bias descending
/// within equal priorities, then id ascending. At most
/// `max_rules_per_tick` candidates compose left-to-right, each transform
/// receiving the draft as mutated by the previous one. Conflicts are
/// first-writer-wins per parameter: once a higher-ranked rule has written a
/// parameter, a later rule's write to it is discarded (its writes to fresh
/// parameters still land). A failing transform is skipped and noted in the
/// rationale; the batch continues.
///
/// Returns `None` when the sensitivity gate blocks the tick, when no
/// predicate matches, or when every candidate transform failed.
pub fn resolve(
    catalog: &RuleCatalog,
    bias: &RuleBias,
    config: &EngineConfig,
    before: &PresentationConfig,
    metrics: &BehavioralMetrics,
    context: &EnvironmentalContext,
) -> Option<Decision> {
    // The gate is evaluated once per tick, never per rule.
    if f64::from(config.adaptation_strength) / 100.0 < ACCEPTANCE_THRESHOLD {
        log_debug!(
            "sensitivity gate: strength {} below acceptance threshold, skipping tick",
            config.adaptation_strength
        );
        return None;
    }

    let mut candidates: Vec<_> = catalog
        .iter()
        .filter(|rule| rule.applies(metrics, context))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let bucket = context.bucket();
    candidates.sort_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| {
                let bias_a = bias.for_rule(&bucket, a.id());
                let bias_b = bias.for_rule(&bucket, b.id());
                bias_b.total_cmp(&bias_a)
            })
            .then_with(|| a.id().cmp(b.id()))
    });

    let mut draft = before.clone();
    let mut claimed: Vec<&'static str> = Vec::new();
    let mut rules_applied = Vec::new();
    let mut rationale = Vec::new();

    for rule in candidates.into_iter().take(config.max_rules_per_tick) {
        let pre = draft.clone();
        match rule.apply(&pre, metrics, context) {
            Ok(mut next) => {
                let changed = next.diff(&pre);
                let conflicts: Vec<&str> = changed
                    .iter()
                    .copied()
                    .filter(|param| claimed.contains(param))
                    .collect();
                if !conflicts.is_empty() {
                    log_debug!(
                        "rule {} lost conflicting params to higher-ranked rules: {:?}",
                        rule.id(),
                        conflicts
                    );
                    next.restore_params(&pre, &conflicts);
                }
                for param in changed {
                    if !claimed.contains(&param) {
                        claimed.push(param);
                    }
                }
                draft = next;
                rules_applied.push(rule.id().to_string());
                rationale.push(rule.rationale().to_string());
            }
            Err(err) => {
                log_warn!("rule {} transform failed: {err:#}", rule.id());
                rationale.push(format!("{} failed, skipped", rule.id()));
            }
        }
    }

    if rules_applied.is_empty() {
        return None;
    }

    Some(Decision {
        after: draft,
        rules_applied,
        rationale,
    })
}
