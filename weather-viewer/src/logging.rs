use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

fn filter(verbose: u8, quiet_default: &str) -> EnvFilter {
    let default = match verbose {
        0 => quiet_default,
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr for one-shot commands. Only warnings unless asked for more.
pub fn init_stderr(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, "warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a file; the interactive viewer owns the terminal.
pub fn init_file(path: &Path, verbose: u8) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, "info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {e}"))
}
