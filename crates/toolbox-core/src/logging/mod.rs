//! Named loggers with console and rotating file sinks
//!
//! This module provides:
//! - `LoggerRegistry`: idempotent, name-keyed logger construction
//! - `LoggerHandle`: shared handle to one configured logger
//! - `ConsoleSink` and `RotatingFileSink` outputs
//! - `FlushGuard`: flushes a registry on every exit path
//! - A lazily created global registry with free-function access

mod traits;
mod noop;
mod level;
mod format;
mod sink;
mod rotating;
mod config;
mod error;
mod handle;
mod registry;

pub use traits::{Logger, LoggerExt, SharedLogger};
pub use noop::NoOpLogger;
pub use level::{LevelSpec, LogLevel};
pub use format::{LogRecord, RecordFormatter, DEFAULT_DATE_FORMAT, DEFAULT_FORMAT};
pub use sink::{stdout_factory, BoxedSink, ConsoleFactory, ConsoleSink, SharedBuffer, Sink};
pub use rotating::RotatingFileSink;
pub use config::{safe_file_stem, LoggerConfig, DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES, LOG_LEVEL_ENV};
pub use error::{LoggingError, LoggingResult};
pub use handle::LoggerHandle;
pub use registry::{
    flush_all_loggers, get_logger, global_registry, install_exit_flush, setup_logger,
    FlushGuard, LoggerRegistry,
};
