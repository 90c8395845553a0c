use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::content::DEFAULT_MAX_FILE_SIZE;
use crate::engine::{DEFAULT_WPM, MAX_WPM, MIN_WPM};
use crate::error::ConfigError;

/// Reader configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub default_speed_wpm: u32,
    pub max_file_size: u64,
    pub fetch_proxy: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_speed_wpm: DEFAULT_WPM,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            fetch_proxy: Some("https://api.allorigins.win/raw?url=".to_string()),
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    config: ReaderConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;
        let config = Self::load_config(&config_path).unwrap_or_default();

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn get_config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn update_config<F>(&mut self, updater: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut ReaderConfig),
    {
        updater(&mut self.config);
        self.save_config()
    }

    pub fn set_default_speed(&mut self, wpm: u32) -> Result<(), ConfigError> {
        self.config.default_speed_wpm = wpm.clamp(MIN_WPM, MAX_WPM);
        self.save_config()
    }

    pub fn set_max_file_size(&mut self, max_file_size: u64) -> Result<(), ConfigError> {
        self.config.max_file_size = max_file_size;
        self.save_config()
    }

    pub fn set_fetch_proxy(&mut self, proxy: Option<String>) -> Result<(), ConfigError> {
        self.config.fetch_proxy = proxy;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.config = ReaderConfig::default();
        self.save_config()
    }

    fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::home_dir()
            .ok_or(ConfigError::ConfigDirNotFound)?
            .join(".config")
            .join("rsvp-reader");

        std::fs::create_dir_all(&config_dir).map_err(ConfigError::IoError)?;

        Ok(config_dir.join("config.toml"))
    }

    fn load_config(path: &Path) -> Result<ReaderConfig, ConfigError> {
        if !path.exists() {
            return Ok(ReaderConfig::default());
        }

        let config_content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: ReaderConfig =
            toml::from_str(&config_content).map_err(ConfigError::DeserializationError)?;

        Ok(config)
    }

    fn save_config(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
        }

        let config_content =
            toml::to_string_pretty(&self.config).map_err(ConfigError::SerializationError)?;

        std::fs::write(&self.config_path, config_content).map_err(ConfigError::IoError)?;

        Ok(())
    }
}

/// Durable storage for per-user reading preferences, such as the speed
/// carried across sessions. The engine itself never touches storage;
/// callers read the preference at startup and write it on change.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

pub const SPEED_PREFERENCE_KEY: &str = "speed_wpm";

/// Read the persisted reading speed, clamped to the supported range.
/// Absent or unparseable values fall back to the default.
pub fn load_speed(store: &dyn PreferenceStore) -> u32 {
    store
        .get(SPEED_PREFERENCE_KEY)
        .and_then(|value| value.parse::<u32>().ok())
        .map(|wpm| wpm.clamp(MIN_WPM, MAX_WPM))
        .unwrap_or(DEFAULT_WPM)
}

/// Persist the reading speed for the next session.
pub fn store_speed(store: &mut dyn PreferenceStore, wpm: u32) -> Result<(), ConfigError> {
    store.set(SPEED_PREFERENCE_KEY, &wpm.to_string())
}

/// In-memory preference store, for tests and embedders that persist
/// elsewhere.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preference store backed by a TOML file. Every set rewrites the file,
/// so preferences survive a crash without an explicit save step.
pub struct FilePreferenceStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FilePreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(ConfigError::IoError)?;
            toml::from_str(&content).map_err(ConfigError::DeserializationError)?
        } else {
            HashMap::new()
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
        }
        let content =
            toml::to_string_pretty(&self.values).map_err(ConfigError::SerializationError)?;
        std::fs::write(&self.path, content).map_err(ConfigError::IoError)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config_manager = ConfigManager {
            config: ReaderConfig::default(),
            config_path,
        };

        (config_manager, temp_dir)
    }

    #[test]
    fn test_reader_config_default() {
        let config = ReaderConfig::default();

        assert_eq!(config.default_speed_wpm, 300);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.fetch_proxy.as_deref().unwrap().contains("allorigins"));
    }

    #[test]
    fn test_config_serialization() {
        let config = ReaderConfig {
            default_speed_wpm: 450,
            max_file_size: 1024,
            fetch_proxy: None,
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: ReaderConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.default_speed_wpm, deserialized.default_speed_wpm);
        assert_eq!(config.max_file_size, deserialized.max_file_size);
        assert_eq!(config.fetch_proxy, deserialized.fetch_proxy);
    }

    #[test]
    fn test_save_and_load_config() {
        let (mut config_manager, _temp_dir) = create_test_config_manager();

        config_manager.config.default_speed_wpm = 500;
        config_manager.config.fetch_proxy = None;
        config_manager.save_config().unwrap();

        let loaded_config = ConfigManager::load_config(&config_manager.config_path).unwrap();

        assert_eq!(loaded_config.default_speed_wpm, 500);
        assert_eq!(loaded_config.fetch_proxy, None);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = ConfigManager::load_config(&nonexistent_path).unwrap();

        assert_eq!(
            config.default_speed_wpm,
            ReaderConfig::default().default_speed_wpm
        );
    }

    #[test]
    fn test_load_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "not [valid toml {").unwrap();

        assert!(ConfigManager::load_config(&config_path).is_err());
    }

    #[test]
    fn test_set_default_speed_clamps() {
        let (mut config_manager, _temp_dir) = create_test_config_manager();

        config_manager.set_default_speed(5000).unwrap();
        assert_eq!(config_manager.get_config().default_speed_wpm, 1000);

        config_manager.set_default_speed(10).unwrap();
        assert_eq!(config_manager.get_config().default_speed_wpm, 60);
    }

    #[test]
    fn test_memory_store_speed_round_trip() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(load_speed(&store), 300);

        store_speed(&mut store, 450).unwrap();
        assert_eq!(load_speed(&store), 450);
    }

    #[test]
    fn test_load_speed_clamps_and_ignores_garbage() {
        let mut store = MemoryPreferenceStore::new();

        store.set(SPEED_PREFERENCE_KEY, "5000").unwrap();
        assert_eq!(load_speed(&store), 1000);

        store.set(SPEED_PREFERENCE_KEY, "not a number").unwrap();
        assert_eq!(load_speed(&store), 300);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");

        {
            let mut store = FilePreferenceStore::open(&path).unwrap();
            store_speed(&mut store, 600).unwrap();
        }

        let reopened = FilePreferenceStore::open(&path).unwrap();
        assert_eq!(load_speed(&reopened), 600);
    }
}
