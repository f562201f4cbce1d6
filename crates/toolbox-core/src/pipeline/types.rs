//! Frames, embeddings and recognition results

use super::error::{PipelineError, PipelineResult};

/// A decoded image frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position of the frame in its source, starting at 0
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Row-major pixel data, `width * height * channels` bytes
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(index: u64, width: u32, height: u32, channels: u8, data: Vec<u8>) -> Self {
        Self {
            index,
            width,
            height,
            channels,
            data,
        }
    }

    /// A frame filled with a single byte value
    pub fn filled(index: u64, width: u32, height: u32, channels: u8, value: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self::new(index, width, height, channels, vec![value; len])
    }
}

/// A numeric feature vector produced for one face
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
    shape: Vec<usize>,
}

impl Embedding {
    /// Create an embedding, checking that `shape` covers exactly `values`
    pub fn new(values: Vec<f32>, shape: Vec<usize>) -> PipelineResult<Self> {
        let expected: usize = shape.iter().product();
        if shape.is_empty() || expected != values.len() {
            return Err(PipelineError::InvalidShape {
                shape,
                len: values.len(),
            });
        }
        Ok(Self { values, shape })
    }

    /// A single-row embedding of shape `[1, n]`
    pub fn from_vector(values: Vec<f32>) -> Self {
        let shape = vec![1, values.len()];
        Self { values, shape }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Size of the last axis
    pub fn dimension(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    /// L2 norm
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    pub fn min(&self) -> Option<f32> {
        self.values.iter().copied().reduce(f32::min)
    }

    pub fn max(&self) -> Option<f32> {
        self.values.iter().copied().reduce(f32::max)
    }

    pub fn summary(&self) -> EmbeddingSummary {
        EmbeddingSummary {
            shape: self.shape.clone(),
            dimension: self.dimension(),
            norm: self.norm(),
            min: self.min().unwrap_or(0.0),
            max: self.max().unwrap_or(0.0),
        }
    }
}

/// Shape and value statistics of an embedding
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSummary {
    pub shape: Vec<usize>,
    pub dimension: usize,
    pub norm: f32,
    pub min: f32,
    pub max: f32,
}

impl std::fmt::Display for EmbeddingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "shape {:?}, dimension {}, norm {:.3}, range [{:.3}, {:.3}]",
            self.shape, self.dimension, self.norm, self.min, self.max
        )
    }
}

/// One recognized face
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    embedding: Embedding,
    /// Detector confidence, when the model reports one
    pub confidence: Option<f32>,
}

impl Recognition {
    pub fn new(embedding: Embedding) -> Self {
        Self {
            embedding,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn embeddings(&self) -> &Embedding {
        &self.embedding
    }
}
