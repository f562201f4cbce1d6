//! Registry of named loggers
//!
//! Each name is set up at most once per registry: the first configuration
//! wins and later `setup_logger` calls for the same name return the
//! existing handle unchanged. Entries are never removed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::config::LoggerConfig;
use super::error::{LoggingError, LoggingResult};
use super::handle::{LoggerHandle, LoggerMap};
use super::rotating::RotatingFileSink;
use super::sink::{stdout_factory, ConsoleFactory, ConsoleSink};

/// Registry mapping logger names to configured handles
pub struct LoggerRegistry {
    loggers: Arc<LoggerMap>,
    default_config: RwLock<LoggerConfig>,
    console: ConsoleFactory,
}

impl LoggerRegistry {
    /// Create an empty registry whose console sinks write to stdout
    pub fn new() -> Self {
        Self::with_console_factory(stdout_factory())
    }

    /// Create a registry whose default level honors `TOOLBOX_LOG_LEVEL`
    pub fn from_env() -> Self {
        let registry = Self::new();
        registry.set_default_config(LoggerConfig::from_env());
        registry
    }

    /// Create a registry whose console sinks write to writers from `console`
    pub fn with_console_factory(console: ConsoleFactory) -> Self {
        Self {
            loggers: Arc::new(RwLock::new(HashMap::new())),
            default_config: RwLock::new(LoggerConfig::default()),
            console,
        }
    }

    /// Configuration used by `get_logger` for names that were never set up
    ///
    /// File settings are ignored there: implicitly created loggers are
    /// console-only.
    pub fn set_default_config(&self, config: LoggerConfig) {
        *self.default_config.write() = config;
    }

    pub fn default_config(&self) -> LoggerConfig {
        self.default_config.read().clone()
    }

    /// Set up a logger, or return the existing one for `name`
    ///
    /// When `name` is already registered `config` is ignored. Fails only when
    /// the name is empty or the log directory/file cannot be created.
    ///
    /// The log directory and file are opened before the registry write lock
    /// is taken, so lookups on other threads never wait on the filesystem.
    /// A caller that loses a setup race drops the sink it opened and gets
    /// the winner's handle.
    pub fn setup_logger(&self, name: &str, config: LoggerConfig) -> LoggingResult<LoggerHandle> {
        if let Some(existing) = self.loggers.read().get(name) {
            return Ok(existing.clone());
        }
        if name.is_empty() {
            return Err(LoggingError::EmptyName);
        }

        let file_sink = match config.file_path(name) {
            Some(path) => {
                let opened = RotatingFileSink::open(
                    path,
                    config.max_bytes,
                    config.backup_count,
                    config.formatter(),
                    config.resolved_level(),
                );
                match opened {
                    Ok(sink) => Some(sink),
                    Err(e) => return self.loggers.read().get(name).cloned().ok_or(e),
                }
            }
            None => None,
        };

        // Check again under the write lock so racing callers build one handle
        let mut loggers = self.loggers.write();
        if let Some(existing) = loggers.get(name) {
            return Ok(existing.clone());
        }

        let handle = self.build(name, config);
        if let Some(sink) = file_sink {
            handle.add_sink(Box::new(sink));
        }

        loggers.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    /// Get the logger for `name`, creating a console-only one if needed
    pub fn get_logger(&self, name: &str) -> LoggerHandle {
        if let Some(existing) = self.loggers.read().get(name) {
            return existing.clone();
        }

        let mut loggers = self.loggers.write();
        if let Some(existing) = loggers.get(name) {
            return existing.clone();
        }

        let mut config = self.default_config();
        config.log_file = None;
        config.log_dir = None;
        config.console = true;

        let handle = self.build(name, config);
        loggers.insert(name.to_string(), handle.clone());
        handle
    }

    /// Flush every sink of every registered logger
    pub fn flush_all(&self) {
        let handles: Vec<LoggerHandle> = self.loggers.read().values().cloned().collect();
        for handle in handles {
            handle.flush();
        }
    }

    /// Guard that flushes this registry when dropped
    pub fn guard(self: &Arc<Self>) -> FlushGuard {
        FlushGuard {
            registry: Arc::clone(self),
            armed: true,
        }
    }

    /// Check if a logger is registered
    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    /// List all registered logger names
    pub fn names(&self) -> Vec<String> {
        self.loggers.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Construct a handle with its console sink; file sinks are added by the caller
    fn build(&self, name: &str, config: LoggerConfig) -> LoggerHandle {
        let handle = LoggerHandle::attached(name, config, Arc::downgrade(&self.loggers));

        if handle.config().console {
            let sink = ConsoleSink::with_writer(
                (self.console)(),
                handle.config().formatter(),
                handle.level(),
            );
            handle.add_sink(Box::new(sink));
        }
        handle
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.names())
            .finish()
    }
}

/// Flushes a registry when it goes out of scope
///
/// Hold one for the lifetime of the program (or of a unit of work) so that
/// buffered log output is written on normal return, early `?` return,
/// panic unwinding and task cancellation alike.
#[must_use = "the registry is flushed when the guard is dropped"]
pub struct FlushGuard {
    registry: Arc<LoggerRegistry>,
    armed: bool,
}

impl FlushGuard {
    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    /// Flush now and disarm the guard
    pub fn finish(mut self) {
        self.registry.flush_all();
        self.armed = false;
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        if self.armed {
            self.registry.flush_all();
        }
    }
}

impl std::fmt::Debug for FlushGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlushGuard")
            .field("armed", &self.armed)
            .finish()
    }
}

// Global registry instance
static GLOBAL_REGISTRY: Lazy<Arc<LoggerRegistry>> = Lazy::new(|| Arc::new(LoggerRegistry::from_env()));

static EXIT_FLUSH_INSTALLED: AtomicBool = AtomicBool::new(false);

/// The process-wide registry, created on first use
pub fn global_registry() -> &'static Arc<LoggerRegistry> {
    &GLOBAL_REGISTRY
}

/// Set up a logger in the global registry
pub fn setup_logger(name: &str, config: LoggerConfig) -> LoggingResult<LoggerHandle> {
    GLOBAL_REGISTRY.setup_logger(name, config)
}

/// Get a logger from the global registry, creating a console-only one if needed
pub fn get_logger(name: &str) -> LoggerHandle {
    GLOBAL_REGISTRY.get_logger(name)
}

/// Flush every logger in the global registry
pub fn flush_all_loggers() {
    GLOBAL_REGISTRY.flush_all();
}

/// Hand out the global registry's exit guard
///
/// Returns `Some` on the first call only; keep the guard alive in `main`.
pub fn install_exit_flush() -> Option<FlushGuard> {
    if EXIT_FLUSH_INSTALLED.swap(true, Ordering::SeqCst) {
        return None;
    }
    Some(GLOBAL_REGISTRY.guard())
}
