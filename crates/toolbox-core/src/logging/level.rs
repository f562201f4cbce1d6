//! Severity levels and level resolution

use serde::{Deserialize, Serialize};

/// Log levels, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// All levels from least to most severe
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Numeric rank of the level (10, 20, 30, 40, 50)
    pub fn rank(self) -> u32 {
        match self {
            LogLevel::Debug => 10,
            LogLevel::Info => 20,
            LogLevel::Warning => 30,
            LogLevel::Error => 40,
            LogLevel::Critical => 50,
        }
    }

    /// Upper-case level name as it appears in records
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Look up a level by name, case-insensitively
    ///
    /// `WARN` and `FATAL` are accepted as aliases for `WARNING` and `CRITICAL`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARNING" | "WARN" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            "CRITICAL" | "FATAL" => Some(LogLevel::Critical),
            _ => None,
        }
    }

    /// Lowest level whose rank is at least `rank`
    ///
    /// A threshold between two named levels never lets the lower one
    /// through. Ranks above 50 resolve to `Critical`.
    pub fn from_rank(rank: u32) -> Self {
        LogLevel::ALL
            .iter()
            .copied()
            .find(|level| level.rank() >= rank)
            .unwrap_or(LogLevel::Critical)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A level as given by a caller or a config file: a name or a numeric rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Rank(u32),
    Name(String),
}

impl LevelSpec {
    /// Resolve to a concrete level, falling back to `default` on unknown names
    pub fn resolve_or(&self, default: LogLevel) -> LogLevel {
        match self {
            LevelSpec::Rank(rank) => LogLevel::from_rank(*rank),
            LevelSpec::Name(name) => LogLevel::from_name(name).unwrap_or(default),
        }
    }

    /// Resolve to a concrete level, falling back to `INFO`
    pub fn resolve(&self) -> LogLevel {
        self.resolve_or(LogLevel::default())
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        LevelSpec::from(LogLevel::default())
    }
}

impl From<LogLevel> for LevelSpec {
    fn from(level: LogLevel) -> Self {
        LevelSpec::Name(level.as_str().to_string())
    }
}

impl From<u32> for LevelSpec {
    fn from(rank: u32) -> Self {
        LevelSpec::Rank(rank)
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}
