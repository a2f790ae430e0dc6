//! Decoded frame type for dataset export

use glam::Mat4;
use image::{ImageBuffer, Luma, RgbaImage};
use posecap_wire::Intrinsics;

/// 16-bit single-channel depth image.
pub type DepthImage = ImageBuffer<Luma<u16>, Vec<u16>>;

/// A single decoded frame ready to be written to disk.
///
/// RGB arrives with an opaque alpha channel appended; depth is already
/// quantized to the u16 storage range and resized to the RGB resolution.
#[derive(Debug, Clone)]
pub struct DatasetFrame {
    pub rgba: RgbaImage,
    pub depth: Option<DepthImage>,
    /// Camera-to-world pose in the manifest's orientation convention.
    pub pose: Mat4,
    pub intrinsics: Intrinsics,
    /// Capture timestamp in seconds.
    pub timestamp: f64,
}

impl DatasetFrame {
    /// Get image dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    /// Pose as nested rows, the layout the manifest stores.
    pub fn pose_rows(&self) -> [[f32; 4]; 4] {
        std::array::from_fn(|r| self.pose.row(r).to_array())
    }
}
