use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::{
    Config, HistoryQuery, WeatherError, WeatherTable, parse::parse_history_csv,
    provider::{HistoryProvider, default_provider_from_config},
};

/// Turns a location into a [`WeatherTable`] covering the trailing week.
#[derive(Debug)]
pub struct HistoryFetcher {
    provider: Box<dyn HistoryProvider>,
    cache_file: Option<PathBuf>,
}

impl HistoryFetcher {
    pub fn new(provider: Box<dyn HistoryProvider>, cache_file: Option<PathBuf>) -> Self {
        Self {
            provider,
            cache_file,
        }
    }

    /// Build from the default provider in `config`, writing responses to its cache file.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = default_provider_from_config(config)?;
        let cache_file = config.cache_file_path()?;
        Ok(Self::new(provider, Some(cache_file)))
    }

    pub fn cache_file(&self) -> Option<&Path> {
        self.cache_file.as_deref()
    }

    pub async fn fetch(&self, location: &str) -> Result<WeatherTable, WeatherError> {
        self.fetch_at(location, Utc::now()).await
    }

    /// Fetch the seven days ending at `now`.
    pub async fn fetch_at(
        &self,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<WeatherTable, WeatherError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(WeatherError::BlankInput);
        }

        let query = HistoryQuery::trailing_week(location, now);
        tracing::info!(
            provider = %self.provider.id(),
            location,
            start = %query.window.start_param(),
            end = %query.window.end_param(),
            "fetching weather history"
        );

        let body = self.provider.fetch_history_csv(&query).await.inspect_err(|e| {
            tracing::warn!(location, error = %e, "weather history request failed");
        })?;

        self.persist(&body).await;

        let table = parse_history_csv(location, &body)?;
        tracing::info!(location, rows = table.len(), "weather history loaded");
        Ok(table)
    }

    /// Overwrite the cache file with the raw body. Failures are logged, not returned.
    async fn persist(&self, body: &str) {
        let Some(path) = &self.cache_file else {
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(path = %parent.display(), error = %e, "could not create cache directory");
                return;
            }
        }

        match tokio::fs::write(path, body).await {
            Ok(()) => tracing::debug!(path = %path.display(), "saved raw response"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not save raw response"),
        }
    }
}
