use std::{env, path::PathBuf};

use super::schema::Settings;

/// `Settings::load` reads environment variables (prefix `MEDLEY__`) over an
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
            ::config::Environment::with_prefix("MEDLEY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let v = self.playback.volume;
        if !(0.0..=1.0).contains(&v) {
            return Err(format!("playback.volume must be within 0.0..=1.0, got {v}"));
        }
        for (name, step) in [
            ("controls.volume_step", self.controls.volume_step),
            ("controls.volume_slider_step", self.controls.volume_slider_step),
        ] {
            if !(step > 0.0 && step <= 1.0) {
                return Err(format!("{name} must be within (0.0, 1.0], got {step}"));
            }
        }
        if self.storage.playlist_key.trim().is_empty() {
            return Err("storage.playlist_key must not be empty".to_string());
        }
        Ok(())
    }

    /// The configured data directory, or the XDG default.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(default_data_dir)
    }

    /// The configured log file, or the XDG default.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(default_log_file)
    }
}

/// Resolve the config path from `MEDLEY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MEDLEY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/medley/config.toml`, or `~/.config/medley/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("medley").join("config.toml"))
}

/// `$XDG_DATA_HOME/medley`, or `~/.local/share/medley`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("medley"))
}

/// `$XDG_STATE_HOME/medley/medley.log`, or `~/.local/state/medley/medley.log`.
pub fn default_log_file() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("medley").join("medley.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
