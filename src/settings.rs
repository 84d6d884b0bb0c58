use anyhow::{Context, Result};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::config::EngineConfig;

/// Disk-backed store for user-facing engine configuration.
///
/// Reads the config on construction (falling back to defaults on a missing
/// or unreadable file) and writes pretty JSON on every update so the file
/// stays hand-editable.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineConfig>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            EngineConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, config: EngineConfig) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = config;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: EngineConfig = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &EngineConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        let mut config = store.engine_config();
        config.adaptation_strength = 85;
        config.tick_interval_ms = 10_000;
        store.update(config).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        let config = reopened.engine_config();
        assert_eq!(config.adaptation_strength, 85);
        assert_eq!(config.tick_interval_ms, 10_000);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.engine_config(), EngineConfig::default());
    }
}
