//! Face recognition pipeline seams
//!
//! The frame source and the recognition model are external collaborators;
//! this module defines the traits they plug into, embedding statistics,
//! mock implementations and the runner that logs results through a
//! `LoggerRegistry`.

mod error;
mod types;
mod traits;
mod mock;
mod runner;

pub use error::{PipelineError, PipelineResult};
pub use types::{Embedding, EmbeddingSummary, Frame, Recognition};
pub use traits::{FrameSource, RecognitionModel};
pub use mock::{MockFrameSource, MockMode, MockModel};
pub use runner::{PipelineStats, RecognitionPipeline, DEFAULT_LOGGER_NAME};
