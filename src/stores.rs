use std::sync::RwLock;

use anyhow::Result;

use crate::models::{NamedConfig, PresentationConfig};

/// Owner of the single current presentation configuration.
///
/// Both calls are synchronous from the engine's point of view. If `apply`
/// fails the commit phase surfaces the error and no adaptation event is
/// recorded.
pub trait PresentationStore: Send + Sync {
    fn get_current(&self) -> PresentationConfig;
    fn apply(&self, config: PresentationConfig) -> Result<()>;
}

/// Supplier of named configuration bundles. Consulted only by rules that
/// select a whole preset rather than composing deltas.
pub trait PresetCatalog: Send + Sync {
    fn list(&self) -> Vec<NamedConfig>;
    fn resolve(&self, id: &str) -> Option<PresentationConfig>;
}

/// Process-local presentation store; the default for embedding and tests.
pub struct InMemoryPresentationStore {
    current: RwLock<PresentationConfig>,
}

impl InMemoryPresentationStore {
    pub fn new(initial: PresentationConfig) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }
}

impl Default for InMemoryPresentationStore {
    fn default() -> Self {
        Self::new(PresentationConfig::default())
    }
}

impl PresentationStore for InMemoryPresentationStore {
    fn get_current(&self) -> PresentationConfig {
        self.current.read().unwrap().clone()
    }

    fn apply(&self, config: PresentationConfig) -> Result<()> {
        *self.current.write().unwrap() = config;
        Ok(())
    }
}

/// Fixed preset catalog built at startup.
pub struct StaticPresetCatalog {
    presets: Vec<NamedConfig>,
}

impl StaticPresetCatalog {
    pub fn new(presets: Vec<NamedConfig>) -> Self {
        Self { presets }
    }

    /// The presets the built-in rules reference.
    pub fn builtin() -> Self {
        Self::new(vec![NamedConfig {
            id: "deep-focus".into(),
            name: "Deep Focus".into(),
            config: PresentationConfig {
                background: "#fafaf9".into(),
                foreground: "#292524".into(),
                accent: "#78716c".into(),
                font_scale: 1.1,
                line_spacing: 1.7,
                contrast: crate::models::ContrastLevel::Standard,
                reduce_motion: true,
            },
        }])
    }
}

impl PresetCatalog for StaticPresetCatalog {
    fn list(&self) -> Vec<NamedConfig> {
        self.presets.clone()
    }

    fn resolve(&self, id: &str) -> Option<PresentationConfig> {
        self.presets
            .iter()
            .find(|preset| preset.id == id)
            .map(|preset| preset.config.clone())
    }
}
