use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather access credential, sent as `appid`.
    pub api_key: Option<String>,

    /// Current-weather endpoint.
    pub endpoint: String,

    /// Image URL with an `{icon}` placeholder for the condition icon code.
    pub icon_url_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            icon_url_template: DEFAULT_ICON_URL_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Load config from the platform location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Returns the API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    /// Substitute an icon code into the icon URL template.
    pub fn icon_url(&self, icon: &str) -> String {
        self.icon_url_template.replace("{icon}", icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg = Config::from_toml("api_key = \"KEY\"\n").expect("valid toml");
        assert_eq!(cfg.api_key(), Some("KEY"));
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.icon_url_template, DEFAULT_ICON_URL_TEMPLATE);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn icon_url_interpolates_code() {
        let cfg = Config::default();
        assert_eq!(cfg.icon_url("04d"), "https://openweathermap.org/img/wn/04d@2x.png");
    }

    #[test]
    fn save_then_load_from_explicit_path() {
        let path = std::env::temp_dir()
            .join(format!("weather-core-config-{}", std::process::id()))
            .join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED".into());
        cfg.save_to(&path).expect("config must be written");

        let loaded = Config::load_from(&path).expect("config must load");
        assert_eq!(loaded.api_key(), Some("SAVED"));

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("weather-core-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).expect("defaults");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = Config::from_toml("api_key = ").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
