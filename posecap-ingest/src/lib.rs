//! Posecap Ingest Crate
//!
//! Frame source and frame decoder for the capture pipelines:
//!
//! - [`bus`]: zenoh subscription with a non-blocking `try_next()`, one
//!   topic per wire record type
//! - [`decode`]: unpack raw sample buffers into typed images and poses,
//!   with separate dataset-export and live-training paths
//! - [`live`]: adapter implementing `posecap_train::FrameSource` on top
//!   of a bus subscription

pub mod bus;
pub mod decode;
pub mod live;

pub use bus::{FrameBus, FrameSubscriber, IngestError};
pub use decode::{decode_for_dataset, decode_for_training, DecodeError};
pub use live::LiveFrameSource;
