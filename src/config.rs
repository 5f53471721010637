use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_SERVER_URL, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    SERVER_URL_ENV,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub last_input_folder: Option<PathBuf>,
    pub download_folder: Option<PathBuf>,
    pub window_width: f32,
    pub window_height: f32,
    /// Environment override of `server_url`. Never written back.
    #[serde(skip)]
    server_override: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            last_input_folder: None,
            download_folder: None,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            server_override: None,
        }
    }
}

impl AppConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.json"))
    }

    /// Loads the saved config, falling back to defaults. The server URL can be
    /// overridden from the environment for this run only.
    pub fn load() -> Self {
        Self::load_from(
            Self::config_path().as_deref(),
            std::env::var(SERVER_URL_ENV).ok(),
        )
    }

    fn load_from(path: Option<&Path>, server_override: Option<String>) -> Self {
        let mut config = match path {
            Some(path) if path.exists() => match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Config loaded from: {:?}", path);
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file, using defaults: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config file, using defaults: {}", e);
                    Self::default()
                }
            },
            Some(_) => {
                tracing::info!("Config file doesn't exist, using defaults");
                Self::default()
            }
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        };

        config.server_url = normalize_server_url(&config.server_url);
        config.server_override = server_override
            .filter(|url| !url.trim().is_empty())
            .map(|url| normalize_server_url(&url));
        if let Some(url) = &config.server_override {
            tracing::info!("Server URL overridden by {}: {}", SERVER_URL_ENV, url);
        }
        config
    }

    /// The server to talk to: the environment override if set, else the
    /// saved URL.
    pub fn server_url(&self) -> &str {
        self.server_override
            .as_deref()
            .unwrap_or(self.server_url.as_str())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Config saved to: {:?}", path);
        Ok(())
    }

    pub fn update_input_folder(&mut self, path: Option<PathBuf>) {
        self.last_input_folder = path;
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    pub fn update_download_folder(&mut self, path: Option<PathBuf>) {
        self.download_folder = path;
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }
}

fn normalize_server_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_SERVER_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_normalization() {
        assert_eq!(
            normalize_server_url(" http://files.local:8080/ "),
            "http://files.local:8080"
        );
        assert_eq!(normalize_server_url(""), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_server_override_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_DIR_NAME).join("config.json");

        let mut config = AppConfig::load_from(
            Some(&path),
            Some("http://temporary-override:9999/".to_string()),
        );
        assert_eq!(config.server_url(), "http://temporary-override:9999");

        config.last_input_folder = Some(PathBuf::from("/tmp"));
        config.save_to(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("temporary-override"));

        let reloaded = AppConfig::load_from(Some(&path), None);
        assert_eq!(reloaded.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(reloaded.last_input_folder, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_saved_server_url_survives_blank_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server_url": "http://files.local:8080/"}"#).unwrap();

        let config = AppConfig::load_from(Some(&path), Some("  ".to_string()));
        assert_eq!(config.server_url(), "http://files.local:8080");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server_url": "http://example.org"}"#).unwrap();
        assert_eq!(config.server_url, "http://example.org");
        assert_eq!(config.window_width, DEFAULT_WINDOW_WIDTH);
        assert!(config.download_folder.is_none());
    }
}
