//! Binary crate for the `weather-viewer` application.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The terminal UI and human-friendly output

use clap::Parser;

mod app;
mod cli;
mod logging;
mod output;
mod tui;
mod ui;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
