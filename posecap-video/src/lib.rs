//! Posecap Video Crate
//!
//! Feeds already-encoded H.265 payload fragments into an external encoder
//! process. The process is a scoped resource: spawned lazily once the
//! stream dimensions are known, fed via its standard input, and always
//! closed and reaped, on the error path included.
//!
//! Pose metadata received alongside each payload is persisted to a JSON
//! sidecar next to the output file.

pub mod encoder;
pub mod muxer;

pub use encoder::EncoderConfig;
pub use muxer::{MuxerError, MuxerSummary, PoseRecord, VideoMuxer};
