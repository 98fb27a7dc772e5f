use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Environment variable holding the log filter, e.g. `FOLIO_LOG=folio=debug`.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Where logs go when the config does not say.
pub fn default_log_path() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .context("Could not find data directory")?
        .join("folio")
        .join("folio.log"))
}

/// Routes `tracing` output to a file. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = match &config.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(path)
}
