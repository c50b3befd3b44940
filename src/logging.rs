//! File logging. The terminal UI owns stdout, so tracing output goes to
//! `scoreboard.log` in the data directory, or nowhere when there is none.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "scoreboard.log";

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init(data_dir: Option<&Path>, default_filter: &str) -> Result<()> {
    let Some(dir) = data_dir else {
        return Ok(());
    };
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))?;
    Ok(())
}
