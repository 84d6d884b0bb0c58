use std::collections::HashMap;

use crate::models::{AdaptationEvent, Feedback};

use super::RuleBias;

/// Aggregate feedback-tagged events by `(context bucket, rule id)` into the
/// soft tie-break bias.
///
/// The bias for a pairing is the net feedback ratio
/// `(positives - negatives) / total`, so it always lands in [-1, 1].
/// Untagged events contribute nothing; a pairing with no feedback keeps the
/// neutral 0.0 bias.
pub fn recompute_bias(events: &[AdaptationEvent]) -> RuleBias {
    let mut tallies: HashMap<(String, String), (u32, u32)> = HashMap::new();

    for event in events {
        let Some(feedback) = event.feedback else {
            continue;
        };
        let bucket = event.context.bucket();
        for rule_id in &event.rules_applied {
            let tally = tallies
                .entry((bucket.clone(), rule_id.clone()))
                .or_insert((0, 0));
            match feedback {
                Feedback::Positive => tally.0 += 1,
                Feedback::Negative => tally.1 += 1,
            }
        }
    }

    let mut bias = RuleBias::default();
    for ((bucket, rule_id), (positives, negatives)) in tallies {
        let total = positives + negatives;
        let net = (f64::from(positives) - f64::from(negatives)) / f64::from(total);
        bias.set(bucket, rule_id, net);
    }
    bias
}
