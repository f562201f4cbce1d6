//! Logging error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up a logger
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Logger names are registry keys and must not be empty
    #[error("Logger name must not be empty")]
    EmptyName,

    /// Creating the log directory or opening the log file failed
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoggingError {
    /// Create an IO error tagged with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type LoggingResult<T> = Result<T, LoggingError>;
