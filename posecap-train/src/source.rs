//! Frame source trait for live ingestion

use crate::frame::LiveFrame;

/// Trait for sources that yield decoded frames on demand.
///
/// `try_next_frame` never blocks: the engine's render loop polls it once
/// per iteration, so a slow source must return `None` rather than wait.
pub trait FrameSource {
    /// Get the next decoded frame, or `None` if nothing has arrived yet.
    fn try_next_frame(&mut self) -> Result<Option<LiveFrame>, SourceError>;
}

/// Errors that can occur while pulling frames from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source error: {0}")]
    Source(String),
    #[error("invalid frame data: {0}")]
    InvalidFrame(String),
}
