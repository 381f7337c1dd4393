use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

/// Send tracing output to a log file, since the terminal belongs to the UI.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Returns the log
/// path, or `None` when the platform has no data directory and logging is off.
pub fn init() -> Result<Option<PathBuf>> {
    let Some(dir) = dirs::data_local_dir().map(|d| d.join("event-calendar")) else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join("event-calendar.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to initialize logging: {e}"))?;

    Ok(Some(path))
}
