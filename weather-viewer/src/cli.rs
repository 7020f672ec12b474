use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use weather_core::{
    Config, HistoryFetcher, ProviderId, WeatherSummary, provider::rapidapi::DEFAULT_HOST,
};

use crate::{app::App, logging, output, tui};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-viewer",
    version,
    about = "Browse the last seven days of weather for a location"
)]
pub struct Cli {
    /// Read configuration from this file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "rapidapi" or "visualcrossing".
        provider: String,
    },

    /// Print the weekly summary and data table for a location.
    Show {
        /// Address or location name, e.g. "Washington,DC,USA".
        location: String,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive viewer (the default).
    View {
        /// Search for this location right away.
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            verbose,
            command,
        } = self;

        match command.unwrap_or(Command::View { location: None }) {
            Command::Configure { provider } => {
                logging::init_stderr(verbose);
                configure(config, &provider)
            }
            Command::Show { location, json } => {
                logging::init_stderr(verbose);
                let cfg = Config::load_with_env(config.as_deref())?;
                show(&cfg, &location, json).await
            }
            Command::View { location } => {
                let cfg = Config::load_with_env(config.as_deref())?;
                view(&cfg, location, verbose).await
            }
        }
    }
}

fn configure(config_path: Option<PathBuf>, provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let path = match config_path {
        Some(p) => p,
        None => Config::config_file_path()?,
    };
    let mut cfg = Config::load_from(&path)?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    cfg.upsert_provider_api_key(id, api_key);

    if id == ProviderId::RapidApi {
        let current = cfg
            .provider_config(id)
            .and_then(|c| c.api_host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = inquire::Text::new("RapidAPI host:")
            .with_default(&current)
            .prompt()
            .context("Failed to read API host")?;
        if let Some(provider_cfg) = cfg.providers.get_mut(id.as_str()) {
            provider_cfg.api_host = Some(host.trim().to_string());
        }
    }

    if cfg.default_provider_id().ok() != Some(id) {
        let make_default = inquire::Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            cfg.set_default_provider(id);
        }
    }

    cfg.save_to(&path)?;
    tracing::info!(provider = %id, path = %path.display(), "configuration saved");
    println!("Saved {id} credentials to {}", path.display());
    Ok(())
}

async fn show(cfg: &Config, location: &str, json: bool) -> Result<()> {
    let fetcher = HistoryFetcher::from_config(cfg)?;
    let table = fetcher.fetch(location).await?;
    let summary = WeatherSummary::from_table(&table)?;

    if json {
        println!("{}", output::render_json(&table, &summary)?);
    } else {
        print!("{}", output::render_report(&table, &summary));
    }
    Ok(())
}

async fn view(cfg: &Config, location: Option<String>, verbose: u8) -> Result<()> {
    // Fail on missing credentials before the terminal switches screens.
    let fetcher = Arc::new(HistoryFetcher::from_config(cfg)?);

    let log_path = Config::log_file_path()?;
    logging::init_file(&log_path, verbose)?;
    tracing::info!(log = %log_path.display(), "starting interactive viewer");

    let mut app = App::new(fetcher, tokio::runtime::Handle::current());
    if let Some(location) = location {
        app.search_for(&location);
    }

    tokio::task::spawn_blocking(move || tui::run(app))
        .await
        .context("Interactive viewer stopped unexpectedly")??;
    Ok(())
}
