//! Mock frame source and model for testing
//!
//! Produce deterministic frames and embeddings without any inference
//! runtime or video input.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::{PipelineError, PipelineResult};
use super::traits::RecognitionModel;
use super::types::{Embedding, Frame, Recognition};
use crate::logging::SharedLogger;

/// Synthetic frames, optionally endless
#[derive(Debug, Clone)]
pub struct MockFrameSource {
    next_index: u64,
    remaining: Option<u64>,
    width: u32,
    height: u32,
}

impl MockFrameSource {
    /// A source yielding `count` small RGB frames
    pub fn new(count: u64) -> Self {
        Self {
            next_index: 0,
            remaining: Some(count),
            width: 8,
            height: 8,
        }
    }

    /// A source that never runs out
    pub fn endless() -> Self {
        Self {
            remaining: None,
            ..Self::new(0)
        }
    }

    /// Set the frame size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Iterator for MockFrameSource {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let index = self.next_index;
        self.next_index += 1;
        Some(Frame::filled(index, self.width, self.height, 3, (index % 256) as u8))
    }
}

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Return deterministic, L2-normalized embeddings
    #[default]
    Embeddings,
    /// Succeed for the first `n` calls, then fail
    FailAfter(usize),
    /// Always fail with this message
    Error(String),
}

/// Mock recognition model for testing
pub struct MockModel {
    name: String,
    dimension: usize,
    faces_per_frame: usize,
    delay_ms: u64,
    mode: MockMode,
    calls: AtomicUsize,
    logger: SharedLogger,
}

impl MockModel {
    /// Create a model producing one `dimension`-long embedding per frame
    pub fn new(dimension: usize, logger: SharedLogger) -> Self {
        Self {
            name: "mock_arcface".to_string(),
            dimension,
            faces_per_frame: 1,
            delay_ms: 0,
            mode: MockMode::Embeddings,
            calls: AtomicUsize::new(0),
            logger,
        }
    }

    /// Create an error-producing model
    pub fn error(message: impl Into<String>, logger: SharedLogger) -> Self {
        Self::new(512, logger).with_mode(MockMode::Error(message.into()))
    }

    pub fn with_mode(mut self, mode: MockMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set how many faces every frame contains
    pub fn with_faces_per_frame(mut self, faces: usize) -> Self {
        self.faces_per_frame = faces;
        self
    }

    /// Set a per-frame inference delay
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of `predict` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embedding_for(&self, frame: u64, face: usize) -> Embedding {
        let raw: Vec<f32> = (0..self.dimension)
            .map(|i| {
                let seed = frame as usize * 31 + face * 7 + i;
                (seed % 17) as f32 / 17.0 - 0.5
            })
            .collect();

        let norm = raw.iter().map(|v| v * v).sum::<f32>().sqrt();
        let values = if norm > 0.0 {
            raw.into_iter().map(|v| v / norm).collect()
        } else {
            raw
        };
        Embedding::from_vector(values)
    }
}

impl std::fmt::Debug for MockModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockModel")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("faces_per_frame", &self.faces_per_frame)
            .field("mode", &self.mode)
            .finish()
    }
}

#[async_trait]
impl RecognitionModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn predict(&self, frame: &Frame) -> PipelineResult<Vec<Recognition>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.mode {
            MockMode::Error(message) => {
                return Err(PipelineError::model(&self.name, frame.index, message.clone()));
            }
            MockMode::FailAfter(limit) if call >= *limit => {
                return Err(PipelineError::model(&self.name, frame.index, "mock failure"));
            }
            _ => {}
        }

        self.logger.debug(&format!(
            "{} predicting {} faces on frame {}",
            self.name, self.faces_per_frame, frame.index
        ));

        Ok((0..self.faces_per_frame)
            .map(|face| Recognition::new(self.embedding_for(frame.index, face)).with_confidence(0.99))
            .collect())
    }
}
