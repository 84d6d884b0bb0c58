use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Breakpoint classification for callers that only know the viewport.
    pub fn from_viewport_width(px: u32) -> Self {
        if px < 768 {
            DeviceClass::Mobile
        } else if px < 1024 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbientLight {
    Bright,
    Medium,
    Dim,
    Dark,
}

impl AmbientLight {
    /// Hour-of-day inference table. Behavioral contract, not an
    /// implementation detail; boundaries are inclusive-low/exclusive-high:
    ///
    /// | hour     | light  |
    /// |----------|--------|
    /// | [6, 11)  | Bright |
    /// | [11, 17) | Bright |
    /// | [17, 21) | Medium |
    /// | [21, 24) | Dim    |
    /// | [0, 6)   | Dark   |
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=10 => AmbientLight::Bright,
            11..=16 => AmbientLight::Bright,
            17..=20 => AmbientLight::Medium,
            21..=23 => AmbientLight::Dim,
            _ => AmbientLight::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientLight::Bright => "bright",
            AmbientLight::Medium => "medium",
            AmbientLight::Dim => "dim",
            AmbientLight::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentCategory {
    Article,
    Code,
    Video,
    Social,
    Other,
}

impl Default for ContentCategory {
    fn default() -> Self {
        ContentCategory::Other
    }
}

/// Caller-supplied device description.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_class: DeviceClass,
}

impl DeviceInfo {
    pub fn new(device_class: DeviceClass) -> Self {
        Self { device_class }
    }
}

/// Caller-supplied metadata about what is currently on screen.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeta {
    pub category: ContentCategory,
}

impl ContentMeta {
    pub fn new(category: ContentCategory) -> Self {
        Self { category }
    }
}

/// Discrete environmental classification, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalContext {
    pub hour_of_day: u32,
    pub device_class: DeviceClass,
    pub ambient_light: AmbientLight,
    pub content_category: ContentCategory,
}

impl EnvironmentalContext {
    pub fn new(now: DateTime<Utc>, device: &DeviceInfo, content: &ContentMeta) -> Self {
        let hour_of_day = now.hour();
        Self {
            hour_of_day,
            device_class: device.device_class,
            ambient_light: AmbientLight::from_hour(hour_of_day),
            content_category: content.category,
        }
    }

    /// Aggregation key for feedback re-weighting.
    pub fn bucket(&self) -> String {
        format!(
            "{}/{}",
            self.ambient_light.as_str(),
            self.device_class.as_str()
        )
    }
}
