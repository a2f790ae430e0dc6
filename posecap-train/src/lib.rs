//! Posecap Training Crate
//!
//! Connects a stream of decoded posed frames to an external reconstruction
//! engine's per-frame training slots. The engine itself is opaque: its loop
//! drives the feed, and all side effects go through the
//! [`ReconstructionEngine`] trait.
//!
//! ## Modules
//!
//! - [`frame`]: the decoded frame type handed to the engine
//! - [`source`]: trait for sources that yield decoded frames on demand
//! - [`engine`]: the external engine's frame-update API
//! - [`feed`]: round-robin slot assignment and training bookkeeping

pub mod engine;
pub mod feed;
pub mod frame;
pub mod source;

pub use engine::ReconstructionEngine;
pub use feed::{FeedError, TrainerFeed, DEFAULT_SLOT_CAPACITY};
pub use frame::LiveFrame;
pub use source::{FrameSource, SourceError};
