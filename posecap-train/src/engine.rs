//! Frame-update API of the external reconstruction engine
//!
//! The engine owns its own render/training loop and window lifetime. The
//! feed only ever touches it through these calls, one training slot at a
//! time.

use posecap_wire::Intrinsics;

/// Per-slot frame-update interface of a running reconstruction session.
pub trait ReconstructionEngine {
    /// Replace the image (and optional depth map) held in a training slot.
    fn set_image(
        &mut self,
        slot: usize,
        width: u32,
        height: u32,
        rgba: &[f32],
        depth: Option<&[f32]>,
        depth_scale: f32,
    );

    /// Replace the camera-to-world extrinsics of a training slot (3x4, row-major).
    fn set_extrinsics(&mut self, slot: usize, camera_to_world: &[f32; 12]);

    /// Replace the camera intrinsics of a training slot.
    fn set_intrinsics(&mut self, slot: usize, intrinsics: Intrinsics);

    /// Tell the engine how many slots currently hold valid training data.
    fn set_active_frames(&mut self, count: usize);

    /// Move the viewer to the camera held in the given slot.
    fn focus_view(&mut self, slot: usize);

    /// Toggle ground-truth overlay rendering.
    fn set_render_ground_truth(&mut self, enabled: bool);
}
