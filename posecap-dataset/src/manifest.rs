//! Dataset manifest structures
//!
//! Serialized as `transforms.json` at the dataset root once the frame
//! target is reached. Global fields hold defaults from the first frame;
//! each frame entry carries its own pose and intrinsics override.

use serde::{Deserialize, Serialize};

/// Manifest filename at the dataset root.
pub const MANIFEST_FILE: &str = "transforms.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub fl_x: f32,
    pub fl_y: f32,
    pub cx: f32,
    pub cy: f32,
    pub w: u32,
    pub h: u32,
    /// Factor mapping stored u16 depth back to meters: `depth_scale / 65535`.
    pub integer_depth_scale: f32,
    pub frames: Vec<ManifestFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFrame {
    /// 4x4 camera-to-world transform, row-major.
    pub transform_matrix: [[f32; 4]; 4],
    /// Relative image path without extension, e.g. `images/0`.
    pub file_path: String,
    pub fl_x: f32,
    pub fl_y: f32,
    pub cx: f32,
    pub cy: f32,
    pub w: u32,
    pub h: u32,
    /// Relative depth image path, e.g. `images/0.depth.png`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_path: Option<String>,
}
