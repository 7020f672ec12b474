use async_trait::async_trait;
use reqwest::Client;

use crate::{HistoryQuery, ProviderConfig, WeatherError};

use super::{HistoryProvider, ProviderId, history_params, send_history_request};

pub const DEFAULT_HISTORY_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/weatherdata/history";

/// Visual Crossing's own history endpoint, authenticated with a `key` query parameter.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(http: Client, config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_HISTORY_URL.to_string()),
            http,
        }
    }
}

#[async_trait]
impl HistoryProvider for VisualCrossingProvider {
    fn id(&self) -> ProviderId {
        ProviderId::VisualCrossing
    }

    async fn fetch_history_csv(&self, query: &HistoryQuery) -> Result<String, WeatherError> {
        let request = self
            .http
            .get(&self.url)
            .query(&history_params(query))
            .query(&[("key", self.api_key.as_str())]);

        send_history_request(self.id(), request).await
    }
}
