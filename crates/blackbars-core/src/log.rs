//! Logger writing status lines to the console and, optionally, a file.
//!
//! The file lives at `~/.config/blackbars/logs/blackbars.log`. When it
//! exceeds the configured max size it is rotated to `blackbars.log.1`
//! (one backup kept). Console output goes to stderr without timestamps.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

const LOG_FILE_NAME: &str = "blackbars.log";
const BACKUP_FILE_NAME: &str = "blackbars.log.1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Parses a level name. Unknown names mean `Info`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Logger {
    file: Option<LogFile>,
    console: bool,
    min_level: Level,
}

struct LogFile {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

/// Initialises the global logger. Call once at startup; later calls are
/// ignored.
///
/// `console` echoes lines to stderr. The file is only opened when
/// `config.enabled` is `true`; failing to open it leaves console
/// logging in place.
pub fn init(config: &LogConfig, console: bool) {
    let file = if config.enabled {
        open_log_file(config.max_file_mb)
    } else {
        None
    };

    let logger = Logger {
        file,
        console,
        min_level: Level::parse(&config.level),
    };
    let _ = LOGGER.set(Mutex::new(logger));
}

fn open_log_file(max_file_mb: u64) -> Option<LogFile> {
    let log_dir = crate::config::config_dir()?.join("logs");
    let _ = fs::create_dir_all(&log_dir);
    let path = log_dir.join(LOG_FILE_NAME);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    let written = file.metadata().map(|m| m.len()).unwrap_or(0);

    Some(LogFile {
        file,
        path,
        max_bytes: max_file_mb * 1024 * 1024,
        written,
    })
}

/// Writes a log line if the level is at or above the configured minimum.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    let Some(mutex) = LOGGER.get() else {
        return;
    };
    let Ok(mut logger) = mutex.lock() else {
        return;
    };
    if level < logger.min_level {
        return;
    }

    if logger.console {
        eprintln!("{}", console_line(level, args));
    }
    if let Some(log_file) = logger.file.as_mut() {
        log_file.append(&file_line(&timestamp(), level, args));
    }
}

impl LogFile {
    fn append(&mut self, line: &str) {
        let _ = self.file.write_all(line.as_bytes());
        self.written += line.len() as u64;

        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let backup = self.path.with_file_name(BACKUP_FILE_NAME);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

fn file_line(now: &str, level: Level, args: fmt::Arguments<'_>) -> String {
    format!("{now} [{level}] {args}\n")
}

fn console_line(level: Level, args: fmt::Arguments<'_>) -> String {
    match level {
        Level::Warn => format!("Warning: {args}"),
        Level::Error => format!("Error: {args}"),
        Level::Debug | Level::Info => args.to_string(),
    }
}

fn timestamp() -> String {
    // UTC wall-clock time of day; the date is in the file's mtime.
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Logs at DEBUG level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*)) };
}

/// Logs at INFO level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Info, format_args!($($arg)*)) };
}

/// Logs at WARN level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*)) };
}

/// Logs at ERROR level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Error, format_args!($($arg)*)) };
}
