use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::session::{MAX_RATE, MIN_RATE};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `HIRES__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("HIRES")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err("audio.volume must be within 0.0..=1.0".to_string());
        }
        if self.audio.rate_step <= 0.0 || self.audio.rate_step > MAX_RATE - MIN_RATE {
            return Err(format!(
                "audio.rate_step must be within (0, {}]",
                MAX_RATE - MIN_RATE
            ));
        }
        if self.audio.volume_step <= 0.0 || self.audio.volume_step > 1.0 {
            return Err("audio.volume_step must be within (0, 1]".to_string());
        }
        if self.ui.art_rows < 2 {
            return Err("ui.art_rows must be >= 2".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `HIRES_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("HIRES_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/hires/config.toml`
/// or `~/.config/hires/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("hires").join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/hires/hires.log`
/// or `~/.local/state/hires/hires.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("hires").join("hires.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
