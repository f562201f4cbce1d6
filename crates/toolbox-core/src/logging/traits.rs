//! Logger trait definition

use std::sync::Arc;

use super::level::LogLevel;

/// Logger abstraction used by consumer modules
///
/// Implementations:
/// - `LoggerHandle`: a registry logger with console/file sinks
/// - `NoOpLogger`: Silent logger for testing
pub trait Logger: Send + Sync {
    /// Emit a message at `level`
    fn log(&self, level: LogLevel, message: &str);

    /// Whether a message at `level` would be emitted
    fn enabled(&self, level: LogLevel) -> bool;

    /// Log a debug message
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log an info message
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a warning message
    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Log a critical message
    fn critical(&self, message: &str) {
        self.log(LogLevel::Critical, message);
    }
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Extension trait for logging with format arguments
pub trait LoggerExt: Logger {
    /// Log with format arguments; the message is only rendered when enabled
    fn log_fmt(&self, level: LogLevel, args: std::fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.log(level, &args.to_string());
        }
    }

    fn debug_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Debug, args);
    }

    fn info_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Info, args);
    }

    fn warning_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Warning, args);
    }

    fn error_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Error, args);
    }

    fn critical_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Critical, args);
    }
}

// Implement LoggerExt for all Logger implementations
impl<T: Logger + ?Sized> LoggerExt for T {}

/// Convenience macros for logging
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        {
            use $crate::logging::LoggerExt as _;
            $logger.debug_fmt(format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        {
            use $crate::logging::LoggerExt as _;
            $logger.info_fmt(format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => {
        {
            use $crate::logging::LoggerExt as _;
            $logger.warning_fmt(format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        {
            use $crate::logging::LoggerExt as _;
            $logger.error_fmt(format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)*) => {
        {
            use $crate::logging::LoggerExt as _;
            $logger.critical_fmt(format_args!($($arg)*))
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        threshold: LogLevel,
        lines: Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn log(&self, level: LogLevel, message: &str) {
            self.lines.lock().push(format!("{} {}", level, message));
        }

        fn enabled(&self, level: LogLevel) -> bool {
            level >= self.threshold
        }
    }

    #[test]
    fn test_macros_cover_every_level() {
        let recorder = Arc::new(RecordingLogger::default());
        let logger: SharedLogger = recorder.clone();

        crate::log_debug!(logger, "dropped {}", 0);
        crate::log_info!(logger, "frame {}", 1);
        crate::log_warning!(logger, "slow frame {}", 2);
        crate::log_error!(logger, "bad frame {}", 3);
        crate::log_critical!(logger, "device lost after {} frames", 4);

        assert_eq!(
            *recorder.lines.lock(),
            vec![
                "INFO frame 1",
                "WARNING slow frame 2",
                "ERROR bad frame 3",
                "CRITICAL device lost after 4 frames",
            ]
        );
    }

    #[test]
    fn test_fmt_skips_disabled_levels() {
        let recorder = RecordingLogger {
            threshold: LogLevel::Critical,
            ..Default::default()
        };

        recorder.error_fmt(format_args!("ignored"));
        recorder.critical_fmt(format_args!("kept {}", "here"));

        assert_eq!(*recorder.lines.lock(), vec!["CRITICAL kept here"]);
    }
}
