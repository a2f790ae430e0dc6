//! Posecap Wire Crate
//!
//! Record types published on the capture bus by the mobile capture app,
//! plus the codec used to (de)serialize them. Records carry an explicit
//! schema version tag that is checked on decode.

pub mod codec;
pub mod record;

pub use codec::{WireError, WireRecord};
pub use record::{
    CaptureFrame, CompressedDepthBlock, DepthBlock, Intrinsics, PosedVideoFrame, WIRE_VERSION,
};
