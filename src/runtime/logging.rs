use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_log_path};

fn log_file(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// `RUST_LOG` when set, otherwise the configured level.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a file-backed subscriber. The terminal belongs to the UI, so
/// nothing is written to stdout/stderr once this succeeds.
///
/// Returns the log file path, or `None` when logging is disabled.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = log_file(settings)?;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("hires: cannot create log directory {}: {e}", parent.display());
            return None;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("hires: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    if let Err(e) = tracing_subscriber::registry()
        .with(build_filter(&settings.level))
        .with(layer)
        .try_init()
    {
        eprintln!("hires: logging already initialised: {e}");
    }
    Some(path)
}
