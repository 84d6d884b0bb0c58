use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContrastLevel {
    Low,
    Standard,
    High,
}

/// The set of visual parameters the engine adapts.
///
/// Exactly one current instance is owned by the presentation store; the
/// engine only ever holds a transient working draft per evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationConfig {
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub font_scale: f64,
    pub line_spacing: f64,
    pub contrast: ContrastLevel,
    pub reduce_motion: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".into(),
            foreground: "#1a1a1a".into(),
            accent: "#3b82f6".into(),
            font_scale: 1.0,
            line_spacing: 1.5,
            contrast: ContrastLevel::Standard,
            reduce_motion: false,
        }
    }
}

impl PresentationConfig {
    /// Names of parameters whose values differ from `other`.
    pub fn diff(&self, other: &PresentationConfig) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.background != other.background {
            changed.push("background");
        }
        if self.foreground != other.foreground {
            changed.push("foreground");
        }
        if self.accent != other.accent {
            changed.push("accent");
        }
        if self.font_scale != other.font_scale {
            changed.push("fontScale");
        }
        if self.line_spacing != other.line_spacing {
            changed.push("lineSpacing");
        }
        if self.contrast != other.contrast {
            changed.push("contrast");
        }
        if self.reduce_motion != other.reduce_motion {
            changed.push("reduceMotion");
        }
        changed
    }

    /// Copy the named parameters from `source` into `self`. Unknown names
    /// are ignored.
    pub fn restore_params(&mut self, source: &PresentationConfig, params: &[&str]) {
        for param in params {
            match *param {
                "background" => self.background = source.background.clone(),
                "foreground" => self.foreground = source.foreground.clone(),
                "accent" => self.accent = source.accent.clone(),
                "fontScale" => self.font_scale = source.font_scale,
                "lineSpacing" => self.line_spacing = source.line_spacing,
                "contrast" => self.contrast = source.contrast,
                "reduceMotion" => self.reduce_motion = source.reduce_motion,
                _ => {}
            }
        }
    }

    /// Sanity bounds for externally supplied configs (advisory suggestions,
    /// preset bundles). Colors must be `#rrggbb`; scales must stay within
    /// ranges the renderer can honor.
    pub fn is_valid(&self) -> bool {
        fn is_hex_color(value: &str) -> bool {
            value.len() == 7
                && value.starts_with('#')
                && value[1..].chars().all(|c| c.is_ascii_hexdigit())
        }

        is_hex_color(&self.background)
            && is_hex_color(&self.foreground)
            && is_hex_color(&self.accent)
            && self.font_scale.is_finite()
            && (0.5..=3.0).contains(&self.font_scale)
            && self.line_spacing.is_finite()
            && (1.0..=3.0).contains(&self.line_spacing)
    }
}

/// A named preset bundle from the preset catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedConfig {
    pub id: String,
    pub name: String,
    pub config: PresentationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_lists_only_changed_params() {
        let base = PresentationConfig::default();
        let mut edited = base.clone();
        edited.background = "#000000".into();
        edited.reduce_motion = true;

        assert_eq!(edited.diff(&base), vec!["background", "reduceMotion"]);
        assert!(base.diff(&base).is_empty());
    }

    #[test]
    fn restore_params_reverts_named_fields() {
        let base = PresentationConfig::default();
        let mut edited = base.clone();
        edited.background = "#000000".into();
        edited.font_scale = 1.4;

        edited.restore_params(&base, &["background"]);
        assert_eq!(edited.background, base.background);
        assert_eq!(edited.font_scale, 1.4);
    }

    #[test]
    fn validation_rejects_malformed_colors_and_scales() {
        let mut config = PresentationConfig::default();
        assert!(config.is_valid());

        config.background = "112233".into();
        assert!(!config.is_valid());

        config.background = "#112233".into();
        config.font_scale = f64::NAN;
        assert!(!config.is_valid());

        config.font_scale = 5.0;
        assert!(!config.is_valid());
    }
}
