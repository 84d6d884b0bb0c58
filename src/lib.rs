//! Behavioral adaptation engine: observes a session's interaction signals,
//! infers an environmental context, and evaluates a prioritized rule set to
//! keep the presentation configuration matched to how the user is reading.

pub mod config;
pub mod context;
pub mod db;
pub mod engine;
pub mod history;
pub mod models;
pub mod rules;
pub mod scheduler;
pub mod settings;
pub mod signals;
pub mod stores;
mod utils;

pub use config::{EngineConfig, MetricWeights};
pub use engine::{AdvisoryScorer, AttuneEngine, TriggerError, ACCEPTANCE_THRESHOLD};
pub use history::{FeedbackOutcome, HistoryStore, MemoryHistory, RuleBias};
pub use models::{
    AdaptationEvent, AmbientLight, BehavioralMetrics, ContentCategory, ContentMeta, ContrastLevel,
    DeviceClass, DeviceInfo, EnvironmentalContext, Feedback, InteractionSample, NamedConfig,
    PresentationConfig, RawSignals, SampleKind,
};
pub use rules::{default_catalog, AdaptationRule, RuleCatalog};
pub use scheduler::{EngineController, EnginePhase};
pub use settings::SettingsStore;
pub use stores::{
    InMemoryPresentationStore, PresentationStore, PresetCatalog, StaticPresetCatalog,
};
