//! Core library for the `weather-viewer` application.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather history providers and the fetcher built on them
//! - The daily record table, its summary and chart models
//! - The view-controller session state
//!
//! It has no terminal or UI dependencies, so other front ends can reuse it.

pub mod chart;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod parse;
pub mod provider;
pub mod session;
pub mod summary;

pub use chart::{ChartKind, ChartModel};
pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use fetcher::HistoryFetcher;
pub use model::{DateWindow, HistoryQuery, WeatherRecord, WeatherTable};
pub use provider::{HistoryProvider, ProviderId};
pub use session::{Session, SessionError, View};
pub use summary::{Extremum, WeatherSummary};
