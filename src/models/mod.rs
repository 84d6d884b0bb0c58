pub mod context;
pub mod event;
pub mod metrics;
pub mod presentation;
pub mod sample;

pub use context::{AmbientLight, ContentCategory, ContentMeta, DeviceClass, DeviceInfo, EnvironmentalContext};
pub use event::{AdaptationEvent, Feedback};
pub use metrics::BehavioralMetrics;
pub use presentation::{ContrastLevel, NamedConfig, PresentationConfig};
pub use sample::{InteractionSample, RawSignals, SampleKind};
