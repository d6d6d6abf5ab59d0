use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to `log_file`.
///
/// The terminal belongs to the UI, so nothing is logged when no file is
/// given. Level comes from `RUST_LOG`, default `info`.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {}", e))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
