use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::MonitoredTitles;
use crate::log::LogConfig;

pub mod template;

/// Name of the JSON config file read from the working directory when no
/// TOML config exists. Kept for configs written for earlier releases.
pub const LEGACY_CONFIG_FILE: &str = "black_bars_config.json";

/// Top-level configuration.
///
/// Loaded from `~/.config/blackbars/config.toml`. Missing fields fall
/// back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exact titles of the windows that get the black backdrop.
    pub window_titles: Vec<String>,
    /// Whether to show the notification-area icon.
    pub tray: bool,
    /// File logging settings.
    pub logging: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_titles: vec![
                "League of Legends (TM) Client".into(),
                "League of Legends".into(),
            ],
            tray: true,
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    /// Replaces the configured titles when `titles` is non-empty.
    ///
    /// Command-line titles win over the file; an empty list means "no
    /// override", not "monitor nothing".
    pub fn with_titles(mut self, titles: Vec<String>) -> Self {
        if !titles.is_empty() {
            self.window_titles = titles;
        }
        self
    }

    pub fn monitored_titles(&self) -> MonitoredTitles {
        MonitoredTitles::new(self.window_titles.iter().cloned())
    }
}

/// On-disk format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Returns the config directory: `~/.config/blackbars/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("blackbars"))
}

/// Returns the config file path: `~/.config/blackbars/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Parses config text in the given format.
pub fn parse(content: &str, format: Format) -> Result<Config, String> {
    match format {
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Tries to load and parse the config file at `path`.
///
/// Returns an error string naming the file on IO or parse failure.
pub fn try_load_from(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    parse(&content, Format::from_path(path)).map_err(|e| format!("{}: {e}", path.display()))
}

/// Loads the configuration, falling back to defaults.
///
/// An explicit path must exist; a missing explicit file is reported.
/// Without one, `~/.config/blackbars/config.toml` is tried first, then
/// [`LEGACY_CONFIG_FILE`] in the working directory. Absent default files
/// silently yield defaults; unreadable or invalid ones are reported on
/// stderr and also yield defaults.
pub fn load(explicit: Option<&Path>) -> Config {
    if let Some(path) = explicit {
        return load_or_default(path);
    }

    let candidates = config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(LEGACY_CONFIG_FILE)));
    for path in candidates {
        if path.exists() {
            return load_or_default(&path);
        }
    }
    Config::default()
}

fn load_or_default(path: &Path) -> Config {
    match try_load_from(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: failed to load config {e}");
            Config::default()
        }
    }
}

#[cfg(test)]
#[path = "config/tests.rs"]
mod tests;
