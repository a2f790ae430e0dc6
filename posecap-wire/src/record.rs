//! Wire record definitions.
//!
//! Field layout follows what the capture app publishes: pinhole intrinsics,
//! a 16-element row-major camera-to-world transform, and raw pixel buffers.
//! Layout changes must bump [`WIRE_VERSION`].

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Current schema version stamped into every record.
pub const WIRE_VERSION: u16 = 1;

/// Pinhole camera intrinsics: focal lengths and principal point, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct Intrinsics {
    pub fl_x: f32,
    pub fl_y: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Intrinsics {
    pub fn new(fl_x: f32, fl_y: f32, cx: f32, cy: f32) -> Self {
        Self { fl_x, fl_y, cx, cy }
    }
}

/// Raw depth buffer attached to a [`CaptureFrame`].
///
/// `data` packs one little-endian f32 per pixel (meters), row-major at
/// `width`x`height`, which may be lower resolution than the RGB image.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct DepthBlock {
    pub width: u32,
    pub height: u32,
    /// Scale the capture device applied to its native depth units.
    pub scale: f32,
    pub data: Vec<u8>,
}

/// A posed RGB(D) frame published on the `frames` topic.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct CaptureFrame {
    /// Schema version, must equal [`WIRE_VERSION`].
    pub version: u16,
    /// Capture-session frame id.
    pub id: u32,
    /// Capture timestamp in seconds.
    pub timestamp: f64,
    pub intrinsics: Intrinsics,
    /// Row-major camera-to-world transform as packed by the capture app.
    /// Readers consume its transpose; see `posecap_ingest::decode`.
    pub transform: [f32; 16],
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8 pixels, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
    pub depth: Option<DepthBlock>,
}

/// zlib-compressed depth attached to a [`PosedVideoFrame`].
///
/// Carried through verbatim; the video muxer does not consume it.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct CompressedDepthBlock {
    pub width: u32,
    pub height: u32,
    pub zlib: Vec<u8>,
}

/// An encoded video fragment with pose metadata, published on the
/// `posed_video` topic.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct PosedVideoFrame {
    /// Schema version, must equal [`WIRE_VERSION`].
    pub version: u16,
    pub stream_id: u32,
    /// Capture timestamp in seconds.
    pub timestamp: f64,
    /// H.265 elementary-stream fragment (NAL units) for this frame.
    pub payload: Vec<u8>,
    /// Row-major camera-to-world transform.
    pub transform: [f32; 16],
    pub intrinsics: Intrinsics,
    pub width: u32,
    pub height: u32,
    pub depth: Option<CompressedDepthBlock>,
}
