//! File-based logging configuration (YAML or JSON)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::logging::{LoggerConfig, LoggerHandle, LoggerRegistry};

/// Configuration file structure
///
/// ```yaml
/// defaults:
///   level: info
/// loggers:
///   toolbox.face_recognition:
///     level: debug
///     log_dir: /var/log/toolbox
///     backup_count: 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LoggingConfigFile {
    /// Configuration for loggers fetched without explicit setup
    #[serde(default)]
    pub defaults: Option<LoggerConfig>,

    /// Per-logger configuration, keyed by logger name
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerConfig>,
}

impl LoggingConfigFile {
    /// Set up every configured logger in `registry`
    ///
    /// `defaults` becomes the registry's default config. Loggers that already
    /// exist keep their original configuration.
    pub fn apply(&self, registry: &LoggerRegistry) -> ConfigResult<Vec<LoggerHandle>> {
        if let Some(defaults) = &self.defaults {
            registry.set_default_config(defaults.clone());
        }

        self.loggers
            .iter()
            .map(|(name, config)| {
                registry
                    .setup_logger(name, config.clone())
                    .map_err(ConfigError::from)
            })
            .collect()
    }
}

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/toolbox/logging.yaml)
    User,
    /// Workspace-level config (.config/toolbox/logging.yaml in workspace root)
    Workspace,
    /// Explicit path
    Custom,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
            ConfigLevel::Custom => "custom",
        }
    }
}

/// Loads logging configuration from disk
///
/// A missing file is an empty configuration. Files ending in `.json` are
/// parsed as JSON, everything else as YAML.
///
/// # Example
///
/// ```no_run
/// use toolbox_core::config::LoggingConfigLoader;
/// use toolbox_core::logging::LoggerRegistry;
///
/// let registry = LoggerRegistry::new();
/// let config = LoggingConfigLoader::user().load().unwrap();
/// config.apply(&registry).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LoggingConfigLoader {
    path: PathBuf,
    level: ConfigLevel,
}

impl LoggingConfigLoader {
    /// Create a loader for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            level: ConfigLevel::Custom,
        }
    }

    /// Create a user-level loader (~/.config/toolbox/logging.yaml)
    pub fn user() -> Self {
        // Use XDG config directory (~/.config on Linux, ~/Library/Application Support on macOS)
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self {
            path: config_dir.join("toolbox").join("logging.yaml"),
            level: ConfigLevel::User,
        }
    }

    /// Create a workspace-level loader (.config/toolbox/logging.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self {
            path: workspace_root
                .as_ref()
                .join(".config")
                .join("toolbox")
                .join("logging.yaml"),
            level: ConfigLevel::Workspace,
        }
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the config level
    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    /// Load config from file
    pub fn load(&self) -> ConfigResult<LoggingConfigFile> {
        if !self.path.exists() {
            return Ok(LoggingConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LoggingConfigFile::default());
        }

        if self.is_json() {
            serde_json::from_str(&content).map_err(|e| ConfigError::parse("JSON", e))
        } else {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::parse("YAML", e))
        }
    }

    /// Save config to file
    pub fn save(&self, config: &LoggingConfigFile) -> ConfigResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = if self.is_json() {
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::parse("JSON", e))?
        } else {
            serde_yaml::to_string(config).map_err(|e| ConfigError::parse("YAML", e))?
        };

        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Load the file and set up its loggers in `registry`
    pub fn apply(&self, registry: &LoggerRegistry) -> ConfigResult<Vec<LoggerHandle>> {
        self.load()?.apply(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, SharedBuffer};
    use tempfile::tempdir;

    fn quiet_registry() -> LoggerRegistry {
        LoggerRegistry::with_console_factory(SharedBuffer::new().factory())
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempdir().unwrap();
        let loader = LoggingConfigLoader::new(dir.path().join("logging.yaml"));

        assert!(!loader.exists());
        assert_eq!(loader.load().unwrap(), LoggingConfigFile::default());
    }

    #[test]
    fn test_yaml_config_applies_to_registry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logging.yaml");
        let log_dir = dir.path().join("logs");
        fs::write(
            &path,
            format!(
                "defaults:\n  level: debug\nloggers:\n  toolbox.face_recognition:\n    level: WARNING\n    console: false\n    log_dir: {}\n    backup_count: 1\n",
                log_dir.display()
            ),
        )
        .unwrap();

        let registry = quiet_registry();
        let handles = LoggingConfigLoader::new(&path).apply(&registry).unwrap();

        assert_eq!(handles.len(), 1);
        let face = registry.get_logger("toolbox.face_recognition");
        assert!(face.same_as(&handles[0]));
        assert_eq!(face.level(), LogLevel::Warning);
        assert_eq!(face.sink_count(), 1);
        assert!(log_dir.is_dir());

        // Defaults feed implicitly created loggers
        assert_eq!(registry.get_logger("other").level(), LogLevel::Debug);
    }

    #[test]
    fn test_json_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logging.json");
        fs::write(&path, r#"{"loggers": {"svc": {"level": 40, "propagate": true}}}"#).unwrap();

        let config = LoggingConfigLoader::new(&path).load().unwrap();
        let svc = &config.loggers["svc"];
        assert_eq!(svc.resolved_level(), LogLevel::Error);
        assert!(svc.propagate);
        assert!(config.defaults.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logging.yaml");
        fs::write(&path, "loggers: [not, a, map").unwrap();

        let result = LoggingConfigLoader::new(&path).load();
        assert!(matches!(result, Err(ConfigError::Parse { format: "YAML", .. })));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let loader = LoggingConfigLoader::workspace(dir.path());
        assert_eq!(loader.level(), ConfigLevel::Workspace);

        let mut config = LoggingConfigFile::default();
        config
            .loggers
            .insert("svc".to_string(), LoggerConfig::new().with_level("error").with_max_bytes(2048));
        loader.save(&config).unwrap();

        assert!(loader.exists());
        assert_eq!(loader.load().unwrap(), config);
    }

    #[test]
    fn test_user_path() {
        let loader = LoggingConfigLoader::user();
        assert_eq!(loader.level(), ConfigLevel::User);
        assert!(loader.path().ends_with("toolbox/logging.yaml"));
    }
}
