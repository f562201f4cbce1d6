//! Toolbox Core
//!
//! Named loggers for the toolbox and its inference pipelines.
//!
//! ## Logger registry
//!
//! Loggers are created once per name and reused: the first configuration
//! wins. Each logger writes to stdout and/or a size-rotated log file, and a
//! `FlushGuard` makes sure buffered output reaches disk on every exit path.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use toolbox_core::logging::{Logger, LoggerConfig, LoggerRegistry};
//!
//! let registry = Arc::new(LoggerRegistry::new());
//! let _flush = registry.guard();
//!
//! let logger = registry
//!     .setup_logger("svc", LoggerConfig::new().with_log_dir("/tmp/logs").with_max_bytes(1024))
//!     .unwrap();
//! logger.info("service started");
//!
//! // Same handle, the new configuration is ignored
//! let again = registry.get_logger("svc");
//! assert!(logger.same_as(&again));
//! ```
//!
//! ## Recognition pipeline
//!
//! The `pipeline` module runs a `FrameSource` through a `RecognitionModel`
//! and reports embedding statistics through the registry.

pub mod types;
pub mod logging;
pub mod config;
pub mod pipeline;

// Re-export commonly used types
pub use types::CancellationToken;

pub use logging::{
    Logger, LoggerConfig, LoggerHandle, LoggerRegistry, FlushGuard, LogLevel, LevelSpec,
    LoggingError, LoggingResult, NoOpLogger,
    setup_logger, get_logger, flush_all_loggers, install_exit_flush,
};

pub use config::{LoggingConfigFile, LoggingConfigLoader, ConfigError, ConfigResult};

pub use pipeline::{
    FrameSource, RecognitionModel, RecognitionPipeline, PipelineStats,
    Frame, Embedding, EmbeddingSummary, Recognition, PipelineError, PipelineResult,
};
