use crate::{
    Config, HistoryQuery, WeatherError,
    provider::{rapidapi::RapidApiProvider, visualcrossing::VisualCrossingProvider},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod rapidapi;
pub mod visualcrossing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    RapidApi,
    VisualCrossing,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::RapidApi => "rapidapi",
            ProviderId::VisualCrossing => "visualcrossing",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::RapidApi, ProviderId::VisualCrossing]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "rapidapi" => Ok(ProviderId::RapidApi),
            "visualcrossing" => Ok(ProviderId::VisualCrossing),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: rapidapi, visualcrossing."
            )),
        }
    }
}

/// A source of daily weather history, returned as the vendor's raw CSV body.
#[async_trait]
pub trait HistoryProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch_history_csv(&self, query: &HistoryQuery) -> Result<String, WeatherError>;
}

/// Query string shared by every history endpoint: daily aggregates, US units, CSV output.
fn history_params(query: &HistoryQuery) -> Vec<(&'static str, String)> {
    vec![
        ("startDateTime", query.window.start_param()),
        ("aggregateHours", "24".to_string()),
        ("location", query.location.clone()),
        ("endDateTime", query.window.end_param()),
        ("unitGroup", "us".to_string()),
        ("dayStartTime", "0:00:00".to_string()),
        ("dayEndTime", "23:59:59".to_string()),
        ("contentType", "csv".to_string()),
        ("shortColumnNames", "false".to_string()),
    ]
}

/// Send a prepared request and return the body, or the body as an error on a bad status.
async fn send_history_request(
    provider: ProviderId,
    request: RequestBuilder,
) -> Result<String, WeatherError> {
    let res = request.send().await?;

    let status = res.status();
    let body = res.text().await?;

    tracing::debug!(%provider, %status, bytes = body.len(), "history response received");

    if !status.is_success() {
        return Err(WeatherError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

fn http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn HistoryProvider>> {
    let provider_cfg = config.provider_config(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather-viewer configure {id}` or set WEATHER_API_KEY."
        )
    })?;

    if provider_cfg.api_key.trim().is_empty() {
        anyhow::bail!("The API key configured for provider '{id}' is empty.");
    }

    let http = http_client(config)?;

    let boxed: Box<dyn HistoryProvider> = match id {
        ProviderId::RapidApi => Box::new(RapidApiProvider::new(http, provider_cfg)),
        ProviderId::VisualCrossing => Box::new(VisualCrossingProvider::new(http, provider_cfg)),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn HistoryProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::{TimeZone, Utc};

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("openweather").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::RapidApi, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn default_provider_from_config_errors_when_not_set() {
        let cfg = Config::default();
        let err = default_provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No default provider configured"));
        assert!(msg.contains("Hint: run `weather-viewer configure"));
    }

    #[test]
    fn default_provider_from_config_works_when_set_and_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::VisualCrossing, "KEY".to_string());

        let provider = default_provider_from_config(&cfg).expect("provider must build");
        assert_eq!(provider.id(), ProviderId::VisualCrossing);
    }

    #[test]
    fn history_params_request_daily_us_csv() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let query = HistoryQuery::trailing_week("Washington,DC,USA", now);
        let params = history_params(&query);

        let get = |k: &str| params.iter().find(|(name, _)| *name == k).map(|(_, v)| v.as_str());
        assert_eq!(get("startDateTime"), Some("2024-03-03T00:00:00"));
        assert_eq!(get("endDateTime"), Some("2024-03-10T00:00:00"));
        assert_eq!(get("aggregateHours"), Some("24"));
        assert_eq!(get("unitGroup"), Some("us"));
        assert_eq!(get("contentType"), Some("csv"));
        assert_eq!(get("location"), Some("Washington,DC,USA"));
    }
}
