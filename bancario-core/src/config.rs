//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "api": { "baseUrl": "http://localhost:8000", "timeoutSecs": 30, "pageSize": 100 }
//! }
//! ```
//! Keys this crate does not know about are kept when saving.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::DEFAULT_PAGE_SIZE;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding `api.baseUrl`
pub const API_URL_ENV: &str = "BANCARIO_API_URL";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Effective configuration (settings file plus environment)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// No timeout when `None`
    pub timeout_secs: Option<u64>,
    pub page_size: u32,
    /// File value of `base_url` while an environment override is active
    stored_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            page_size: DEFAULT_PAGE_SIZE,
            stored_base_url: None,
        }
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", settings_path.display()))
}

impl Config {
    /// Load config from the data directory, then apply `BANCARIO_API_URL`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = Self::from_file(data_dir)?.with_base_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Settings file only, no environment and no validation.
    ///
    /// Fails when the file exists but cannot be parsed.
    pub fn from_file(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let defaults = Config::default();

        Ok(Self {
            base_url: raw.api.base_url.unwrap_or(defaults.base_url),
            timeout_secs: raw.api.timeout_secs.filter(|s| *s > 0),
            page_size: raw.api.page_size.filter(|p| *p > 0).unwrap_or(defaults.page_size),
            stored_base_url: None,
        })
    }

    /// Use `url` as the base URL for this run. `save` keeps writing the
    /// file value.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            let stored = std::mem::replace(&mut self.base_url, url);
            self.stored_base_url.get_or_insert(stored);
        }
        self
    }

    pub fn is_base_url_overridden(&self) -> bool {
        self.stored_base_url.is_some()
    }

    /// Save to the data directory, preserving keys not managed here.
    ///
    /// An unreadable settings file is left untouched.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        std::fs::create_dir_all(data_dir)?;
        let mut settings = read_settings(data_dir)?;

        let base_url = self.stored_base_url.as_ref().unwrap_or(&self.base_url);
        settings.api.base_url = Some(base_url.clone());
        settings.api.timeout_secs = self.timeout_secs;
        settings.api.page_size = Some(self.page_size);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL '{}'", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("API base URL must use http or https: {}", self.base_url);
        }
        if self.page_size == 0 {
            bail!("Page size must be greater than 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Set a value by its settings key (`api.baseUrl`, `api.timeoutSecs`, `api.pageSize`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.baseUrl" | "baseUrl" => {
                self.base_url = value.trim().to_string();
                self.stored_base_url = None;
            }
            "api.timeoutSecs" | "timeoutSecs" => {
                self.timeout_secs = match value.trim() {
                    "" | "none" | "0" => None,
                    v => Some(v.parse().with_context(|| format!("Invalid timeout '{}'", v))?),
                };
            }
            "api.pageSize" | "pageSize" => {
                self.page_size = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid page size '{}'", value))?;
            }
            other => bail!(
                "Unknown setting '{}'. Known settings: api.baseUrl, api.timeoutSecs, api.pageSize",
                other
            ),
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"api": {"baseUrl": "http://bank.local", "retries": 3}, "theme": "dark"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.set("api.timeoutSecs", "15").unwrap();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["api"]["retries"], 3);
        assert_eq!(raw["api"]["timeoutSecs"], 15);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("api.baseUrl", "not a url").is_err());
        assert!(config.set("api.pageSize", "abc").is_err());
        assert!(config.set("colour", "blue").is_err());

        let mut config = Config::default();
        config.set("api.timeoutSecs", "none").unwrap();
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_unparseable_settings_are_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let original = r#"{"api":{"baseUrl":"http://bank.local","pageSize":"fifty"},"theme":"dark"}"#;
        std::fs::write(&path, original).unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains(SETTINGS_FILE));
        assert!(Config::from_file(dir.path()).is_err());

        let mut config = Config::default();
        config.set("api.pageSize", "50").unwrap();
        assert!(config.save(dir.path()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_base_url_override_is_not_saved() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"api": {"baseUrl": "http://bank.local"}}"#,
        )
        .unwrap();

        let mut config = Config::from_file(dir.path())
            .unwrap()
            .with_base_url_override(Some("http://staging.example".to_string()));
        assert_eq!(config.base_url, "http://staging.example");
        assert!(config.is_base_url_overridden());

        config.set("api.pageSize", "50").unwrap();
        config.save(dir.path()).unwrap();

        let saved = Config::from_file(dir.path()).unwrap();
        assert_eq!(saved.base_url, "http://bank.local");
        assert_eq!(saved.page_size, 50);

        // an explicit set replaces the stored value
        config.set("api.baseUrl", "https://bank.example").unwrap();
        config.save(dir.path()).unwrap();
        assert_eq!(
            Config::from_file(dir.path()).unwrap().base_url,
            "https://bank.example"
        );
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = Config::default().with_base_url_override(Some("  ".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.is_base_url_overridden());
    }
}
