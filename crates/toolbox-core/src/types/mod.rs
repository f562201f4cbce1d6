//! Shared types

mod cancellation;

pub use cancellation::CancellationToken;
