//! Frame source and recognition model traits

use async_trait::async_trait;

use super::error::PipelineResult;
use super::types::{Frame, Recognition};

/// A lazy, possibly infinite, non-restartable sequence of frames
///
/// Any `Iterator<Item = Frame>` is a frame source.
pub trait FrameSource: Send {
    /// Next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Option<Frame>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = Frame> + Send,
{
    fn next_frame(&mut self) -> Option<Frame> {
        self.next()
    }
}

/// A face recognition model
///
/// Implementations wrap an inference runtime; the pipeline only needs one
/// embedding per detected face.
#[async_trait]
pub trait RecognitionModel: Send + Sync {
    /// Model name (e.g., "arcface_r50")
    fn name(&self) -> &str;

    /// Run the model on one frame
    async fn predict(&self, frame: &Frame) -> PipelineResult<Vec<Recognition>>;
}
