//! Logger configuration

use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::format::{RecordFormatter, DEFAULT_DATE_FORMAT, DEFAULT_FORMAT};
use super::level::{LevelSpec, LogLevel};

/// Default rotation threshold: 10 MiB
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated files kept
pub const DEFAULT_BACKUP_COUNT: usize = 5;

/// Environment variable overriding the default level
pub const LOG_LEVEL_ENV: &str = "TOOLBOX_LOG_LEVEL";

/// Configuration used the first time a logger name is set up
///
/// Every field is optional in config files; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Severity threshold, by name or numeric rank
    pub level: LevelSpec,
    /// Record template
    pub format: String,
    /// Timestamp template (strftime)
    pub date_format: String,
    /// Log file name; derived from the logger name when only `log_dir` is set
    pub log_file: Option<String>,
    /// Directory holding the log file
    pub log_dir: Option<PathBuf>,
    /// Emit to stdout
    pub console: bool,
    /// Rotation threshold in bytes (0 disables rotation)
    pub max_bytes: u64,
    /// Rotated files to keep (0 disables rotation)
    pub backup_count: usize,
    /// Forward records to the nearest registered ancestor logger
    pub propagate: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelSpec::default(),
            format: DEFAULT_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            log_file: None,
            log_dir: None,
            console: true,
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            propagate: false,
        }
    }
}

impl LoggerConfig {
    /// Create a config with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the level taken from `TOOLBOX_LOG_LEVEL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            config.level = parse_env_level(&level);
        }
        config
    }

    /// Set the level
    pub fn with_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the record template
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Set the timestamp template
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Set the log file name
    pub fn with_log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    /// Set the log directory
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Set the rotation threshold
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set how many rotated files are kept
    pub fn with_backup_count(mut self, backup_count: usize) -> Self {
        self.backup_count = backup_count;
        self
    }

    /// Enable or disable propagation to ancestor loggers
    pub fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// Resolved severity threshold; unknown names degrade to `INFO`
    pub fn resolved_level(&self) -> LogLevel {
        self.level.resolve()
    }

    pub fn formatter(&self) -> RecordFormatter {
        RecordFormatter::new(self.format.clone(), self.date_format.clone())
    }

    /// Whether a file sink is requested
    pub fn wants_file(&self) -> bool {
        self.log_file.is_some() || self.log_dir.is_some()
    }

    /// Full path of the log file for logger `name`, if a file sink is requested
    ///
    /// Without `log_file` the name is `<safe_name>_<YYYYMMDD>.log`. Without
    /// `log_dir` the file lives in the current directory.
    pub fn file_path(&self, name: &str) -> Option<PathBuf> {
        if !self.wants_file() {
            return None;
        }

        let file_name = match &self.log_file {
            Some(file) => file.clone(),
            None => format!("{}_{}.log", safe_file_stem(name), Local::now().format("%Y%m%d")),
        };
        let dir = self.log_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        Some(dir.join(file_name))
    }
}

fn parse_env_level(value: &str) -> LevelSpec {
    match value.trim().parse::<u32>() {
        Ok(rank) => LevelSpec::Rank(rank),
        Err(_) => LevelSpec::Name(value.to_string()),
    }
}

/// Logger name with path-hostile characters replaced by underscores
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}
