use async_trait::async_trait;
use reqwest::Client;

use crate::{HistoryQuery, ProviderConfig, WeatherError};

use super::{HistoryProvider, ProviderId, history_params, send_history_request};

pub const DEFAULT_BASE_URL: &str = "https://visual-crossing-weather.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "visual-crossing-weather.p.rapidapi.com";

/// Visual Crossing history served through the RapidAPI gateway.
#[derive(Debug, Clone)]
pub struct RapidApiProvider {
    api_key: String,
    api_host: String,
    base_url: String,
    http: Client,
}

impl RapidApiProvider {
    pub fn new(http: Client, config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string()),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        }
    }

    fn history_url(&self) -> String {
        format!("{}/history", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl HistoryProvider for RapidApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::RapidApi
    }

    async fn fetch_history_csv(&self, query: &HistoryQuery) -> Result<String, WeatherError> {
        let request = self
            .http
            .get(self.history_url())
            .query(&history_params(query))
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host);

        send_history_request(self.id(), request).await
    }
}
