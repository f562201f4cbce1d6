//! Recognition pipeline runner

use std::sync::Arc;

use super::error::PipelineResult;
use super::traits::{FrameSource, RecognitionModel};
use super::types::EmbeddingSummary;
use crate::logging::LoggerRegistry;
use crate::types::CancellationToken;
use crate::{log_error, log_info};

/// Logger the pipeline reports through unless told otherwise
pub const DEFAULT_LOGGER_NAME: &str = "toolbox.face_recognition";

/// Outcome of a pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// Frames the model processed
    pub frames: u64,
    /// Faces recognized across all frames
    pub faces: u64,
    /// Whether the run stopped because of cancellation
    pub cancelled: bool,
    /// Summary of the most recent embedding
    pub last_summary: Option<EmbeddingSummary>,
}

/// Pulls frames from a source, runs the model on each and logs every
/// embedding through the registry
///
/// The registry is flushed when `run` returns, whichever way it returns.
#[derive(Debug, Clone)]
pub struct RecognitionPipeline {
    registry: Arc<LoggerRegistry>,
    logger_name: String,
    max_frames: Option<u64>,
}

impl RecognitionPipeline {
    pub fn new(registry: Arc<LoggerRegistry>) -> Self {
        Self {
            registry,
            logger_name: DEFAULT_LOGGER_NAME.to_string(),
            max_frames: None,
        }
    }

    /// Report through a different logger
    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = name.into();
        self
    }

    /// Stop after this many frames
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    pub async fn run<S, M>(
        &self,
        source: &mut S,
        model: &M,
        cancel: &CancellationToken,
    ) -> PipelineResult<PipelineStats>
    where
        S: FrameSource + ?Sized,
        M: RecognitionModel + ?Sized,
    {
        let _flush = self.registry.guard();
        let logger = self.registry.get_logger(&self.logger_name);
        let mut stats = PipelineStats::default();

        log_info!(logger, "Starting face recognition with {}", model.name());

        loop {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            if self.max_frames.is_some_and(|max| stats.frames >= max) {
                break;
            }
            let Some(frame) = source.next_frame() else {
                break;
            };

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = model.predict(&frame) => Some(result),
            };
            let results = match outcome {
                None => {
                    stats.cancelled = true;
                    break;
                }
                Some(Ok(results)) => results,
                Some(Err(e)) => {
                    log_error!(logger, "Stopping on frame {}: {}", frame.index, e);
                    return Err(e);
                }
            };

            stats.frames += 1;
            for (face, result) in results.iter().enumerate() {
                let summary = result.embeddings().summary();
                log_info!(logger, "Frame {} face {}: {}", frame.index, face, summary);
                stats.faces += 1;
                stats.last_summary = Some(summary);
            }
        }

        log_info!(
            logger,
            "Processed {} frames, {} faces{}",
            stats.frames,
            stats.faces,
            if stats.cancelled { " (cancelled)" } else { "" }
        );
        Ok(stats)
    }
}
