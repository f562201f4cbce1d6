//! Pipeline error types

use thiserror::Error;

/// Errors that can occur while running the recognition pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The model failed on a frame
    #[error("{model} failed on frame {frame}: {message}")]
    Model {
        model: String,
        frame: u64,
        message: String,
    },

    /// Embedding values do not match the declared shape
    #[error("Embedding shape {shape:?} does not match {len} values")]
    InvalidShape { shape: Vec<usize>, len: usize },
}

impl PipelineError {
    /// Create a model error
    pub fn model(model: impl Into<String>, frame: u64, message: impl Into<String>) -> Self {
        Self::Model {
            model: model.into(),
            frame,
            message: message.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
