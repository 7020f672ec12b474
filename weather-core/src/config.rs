use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

pub const PROVIDER_ENV: &str = "WEATHER_PROVIDER";
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const API_HOST_ENV: &str = "WEATHER_API_HOST";

/// Credentials and endpoint overrides for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Value of the gateway host header, where the provider needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Replaces the provider's built-in endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: None,
            base_url: None,
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "rapidapi" or "visualcrossing".
    pub default_provider: Option<String>,

    /// Where the raw CSV of the last search is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    /// Whole-request timeout. Absent means the HTTP client's default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Example TOML:
    /// [providers.rapidapi]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `weather-viewer configure <provider>` (e.g. `weather-viewer configure rapidapi`) \
                 or set {API_KEY_ENV}."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from the platform location, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path; a missing file yields the empty default.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Load from `path` (or the platform location) and apply environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Overlay `WEATHER_PROVIDER`, `WEATHER_API_KEY` and `WEATHER_API_HOST`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(provider) = non_empty(PROVIDER_ENV) {
            let id = ProviderId::try_from(provider.as_str())
                .with_context(|| format!("Invalid {PROVIDER_ENV}"))?;
            self.set_default_provider(id);
        }

        let target = match &self.default_provider {
            Some(s) => ProviderId::try_from(s.as_str())?,
            None => ProviderId::RapidApi,
        };

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.upsert_provider_api_key(target, key);
        }

        if let Some(host) = non_empty(API_HOST_ENV) {
            if let Some(cfg) = self.providers.get_mut(target.as_str()) {
                cfg.api_host = Some(host);
            }
        }

        Ok(())
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
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

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-viewer")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Configured cache file, falling back to the platform cache directory.
    pub fn cache_file_path(&self) -> Result<PathBuf> {
        match &self.cache_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.cache_dir().join("weather_data.csv")),
        }
    }

    /// Log file used by the interactive viewer.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("weather-viewer.log"))
    }

    /// Convenience helper: set/replace a provider API key and optionally set default provider.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert_with(|| ProviderConfig::with_key(api_key));

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::RapidApi, "RAPID_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::RapidApi);

        let key = cfg.provider_api_key(ProviderId::RapidApi);
        assert_eq!(key, Some("RAPID_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::RapidApi));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::RapidApi, "RAPID_KEY".into());
        cfg.upsert_provider_api_key(ProviderId::VisualCrossing, "VC_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");

        assert_eq!(default, ProviderId::RapidApi);
        assert!(cfg.is_provider_configured(ProviderId::VisualCrossing));
    }

    #[test]
    fn upsert_keeps_host_override() {
        let mut cfg = Config::default();
        cfg.providers.insert(
            "rapidapi".into(),
            ProviderConfig {
                api_host: Some("gateway.example".into()),
                ..ProviderConfig::with_key("OLD")
            },
        );

        cfg.upsert_provider_api_key(ProviderId::RapidApi, "NEW".into());

        let stored = cfg.provider_config(ProviderId::RapidApi).unwrap();
        assert_eq!(stored.api_key, "NEW");
        assert_eq!(stored.api_host.as_deref(), Some("gateway.example"));
    }

    #[test]
    fn env_key_configures_rapidapi_by_default() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[(API_KEY_ENV, "ENV_KEY"), (API_HOST_ENV, "h.example")]))
            .unwrap();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::RapidApi);
        let stored = cfg.provider_config(ProviderId::RapidApi).unwrap();
        assert_eq!(stored.api_key, "ENV_KEY");
        assert_eq!(stored.api_host.as_deref(), Some("h.example"));
    }

    #[test]
    fn env_provider_selects_target_for_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::RapidApi, "FILE_KEY".into());

        cfg.apply_env(env(&[(PROVIDER_ENV, "visualcrossing"), (API_KEY_ENV, "VC")]))
            .unwrap();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::VisualCrossing);
        assert_eq!(cfg.provider_api_key(ProviderId::VisualCrossing), Some("VC"));
        assert_eq!(cfg.provider_api_key(ProviderId::RapidApi), Some("FILE_KEY"));
    }

    #[test]
    fn env_rejects_unknown_provider() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[(PROVIDER_ENV, "nope")])).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown provider"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            request_timeout_secs: Some(30),
            ..Config::default()
        };
        cfg.upsert_provider_api_key(ProviderId::VisualCrossing, "KEY".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.request_timeout_secs, Some(30));
        assert_eq!(loaded.default_provider_id().unwrap(), ProviderId::VisualCrossing);
        assert_eq!(loaded.provider_api_key(ProviderId::VisualCrossing), Some("KEY"));
    }

    #[test]
    fn missing_file_loads_empty_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.providers.is_empty());
    }
}
