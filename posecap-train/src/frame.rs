//! Decoded frame type for live training

use posecap_wire::Intrinsics;

/// A single decoded frame ready to be pushed into a training slot.
///
/// Pixels are already in the engine's expected layout: linear-light RGBA
/// floats in `[0, 1]` with a zero alpha channel, and depth in meters at the
/// RGB resolution.
#[derive(Debug, Clone)]
pub struct LiveFrame {
    pub width: u32,
    pub height: u32,
    /// `height * width * 4` linear-light floats.
    pub rgba: Vec<f32>,
    /// `height * width` depth values in meters, if the sample carried depth.
    pub depth: Option<Vec<f32>>,
    /// 3x4 camera-to-world extrinsic block, row-major.
    pub camera_to_world: [f32; 12],
    pub intrinsics: Intrinsics,
    /// Capture timestamp in seconds.
    pub timestamp: f64,
}

impl LiveFrame {
    /// Get image dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
