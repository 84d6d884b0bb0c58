use std::sync::Arc;

use anyhow::anyhow;

use crate::models::{AmbientLight, ContentCategory, ContrastLevel, DeviceClass};
use crate::stores::PresetCatalog;

use super::{AdaptationRule, RuleCatalog};

// Metric thresholds the built-in predicates fire on.
const EYE_STRAIN_RELIEF_THRESHOLD: f64 = 60.0;
const LOW_FOCUS_THRESHOLD: f64 = 35.0;
const HIGH_PAUSE_FREQUENCY: f64 = 6.0;
const LOW_ENGAGEMENT_THRESHOLD: f64 = 30.0;
const LONG_SESSION_MINUTES: f64 = 45.0;
const DEEP_FOCUS_THRESHOLD: f64 = 80.0;

/// The default rule set, in the order the catalog lists them.
///
/// Priorities are static; when several rules fire on a tick the decision
/// engine composes the top ones by priority. The preset rule is the only
/// one that pulls a whole bundle from the preset catalog.
pub fn default_catalog(presets: Arc<dyn PresetCatalog>) -> RuleCatalog {
    RuleCatalog::new(vec![
        AdaptationRule::new(
            "night-reading-comfort",
            9,
            "low ambient light, switching to a dark warm palette",
            |_, context| {
                matches!(
                    context.ambient_light,
                    AmbientLight::Dim | AmbientLight::Dark
                )
            },
            |config, _, _| {
                let mut draft = config.clone();
                draft.background = "#1c1917".into();
                draft.foreground = "#e7e5e4".into();
                draft.accent = "#f59e0b".into();
                draft.contrast = ContrastLevel::Low;
                Ok(draft)
            },
        ),
        AdaptationRule::new(
            "mobile-readability",
            8,
            "small screen, enlarging text and spacing",
            |_, context| context.device_class == DeviceClass::Mobile,
            |config, _, _| {
                let mut draft = config.clone();
                draft.font_scale = draft.font_scale.max(1.15);
                draft.line_spacing = draft.line_spacing.max(1.7);
                Ok(draft)
            },
        ),
        AdaptationRule::new(
            "eye-strain-relief",
            7,
            "elevated eye strain, softening contrast",
            |metrics, _| metrics.eye_strain_index > EYE_STRAIN_RELIEF_THRESHOLD,
            |config, _, _| {
                let mut draft = config.clone();
                draft.contrast = ContrastLevel::Low;
                draft.font_scale = (draft.font_scale * 1.05).min(2.0);
                Ok(draft)
            },
        ),
        AdaptationRule::new(
            "motion-reduction",
            6,
            "attention is fragmented, disabling nonessential motion",
            |metrics, _| {
                metrics.focus_level < LOW_FOCUS_THRESHOLD
                    || metrics.pause_frequency > HIGH_PAUSE_FREQUENCY
            },
            |config, _, _| {
                let mut draft = config.clone();
                draft.reduce_motion = true;
                Ok(draft)
            },
        ),
        AdaptationRule::new(
            "low-engagement-accent",
            5,
            "engagement is flagging, warming the accent color",
            |metrics, _| metrics.engagement_score < LOW_ENGAGEMENT_THRESHOLD,
            |config, _, _| {
                let mut draft = config.clone();
                draft.accent = "#f97316".into();
                Ok(draft)
            },
        ),
        AdaptationRule::new(
            "long-session-comfort",
            4,
            "long session, relaxing type for sustained reading",
            |metrics, _| metrics.session_duration_minutes > LONG_SESSION_MINUTES,
            |config, _, _| {
                let mut draft = config.clone();
                draft.font_scale = (draft.font_scale * 1.05).min(2.0);
                draft.line_spacing = draft.line_spacing.max(1.8);
                Ok(draft)
            },
        ),
        AdaptationRule::new(
            "deep-focus-preset",
            3,
            "sustained focus on an article, applying the deep-focus preset",
            |metrics, context| {
                metrics.focus_level > DEEP_FOCUS_THRESHOLD
                    && context.content_category == ContentCategory::Article
            },
            {
                let presets = Arc::clone(&presets);
                move |_, _, _| {
                    presets
                        .resolve("deep-focus")
                        .ok_or_else(|| anyhow!("preset deep-focus is not in the catalog"))
                }
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BehavioralMetrics, ContentMeta, DeviceInfo, EnvironmentalContext, PresentationConfig,
    };
    use crate::stores::StaticPresetCatalog;
    use chrono::{TimeZone, Utc};

    fn context_at(hour: u32, device: DeviceClass) -> EnvironmentalContext {
        EnvironmentalContext::new(
            Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap(),
            &DeviceInfo::new(device),
            &ContentMeta::new(ContentCategory::Article),
        )
    }

    #[test]
    fn night_rule_fires_in_dim_and_dark() {
        let catalog = default_catalog(Arc::new(StaticPresetCatalog::builtin()));
        let rule = catalog.get("night-reading-comfort").unwrap();
        let metrics = BehavioralMetrics::default();

        assert!(rule.applies(&metrics, &context_at(23, DeviceClass::Desktop)));
        assert!(rule.applies(&metrics, &context_at(3, DeviceClass::Desktop)));
        assert!(!rule.applies(&metrics, &context_at(10, DeviceClass::Desktop)));
    }

    #[test]
    fn mobile_rule_scales_up_but_never_down() {
        let catalog = default_catalog(Arc::new(StaticPresetCatalog::builtin()));
        let rule = catalog.get("mobile-readability").unwrap();
        let metrics = BehavioralMetrics::default();
        let context = context_at(10, DeviceClass::Mobile);

        let mut generous = PresentationConfig::default();
        generous.font_scale = 1.5;
        let out = rule.apply(&generous, &metrics, &context).unwrap();
        assert_eq!(out.font_scale, 1.5);

        let out = rule
            .apply(&PresentationConfig::default(), &metrics, &context)
            .unwrap();
        assert_eq!(out.font_scale, 1.15);
        assert_eq!(out.line_spacing, 1.7);
    }

    #[test]
    fn preset_rule_fails_cleanly_when_preset_is_missing() {
        let catalog = default_catalog(Arc::new(StaticPresetCatalog::new(Vec::new())));
        let rule = catalog.get("deep-focus-preset").unwrap();
        let mut metrics = BehavioralMetrics::default();
        metrics.focus_level = 95.0;
        let context = context_at(10, DeviceClass::Desktop);

        assert!(rule.applies(&metrics, &context));
        assert!(rule
            .apply(&PresentationConfig::default(), &metrics, &context)
            .is_err());
    }
}
