//! Posed frame decoding
//!
//! Turns a received [`CaptureFrame`]'s raw buffers into typed images and a
//! pose matrix. The two sinks want different layouts, so there are two
//! paths: dataset export (8-bit RGBA, quantized u16 depth) and live
//! training (linear-light f32 RGBA, float depth, 3x4 extrinsics).
//!
//! Buffer sizes are validated against the declared dimensions before any
//! reinterpretation; a mismatch is a malformed sample, not a panic.

use glam::Mat4;
use image::RgbaImage;
use posecap_dataset::{DatasetFrame, DepthImage};
use posecap_train::LiveFrame;
use posecap_wire::CaptureFrame;
use thiserror::Error;

/// Errors raised when a sample's buffers do not match its declared shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame declares a zero dimension: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("RGB buffer is {actual} bytes, expected {expected} for {width}x{height}")]
    RgbBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("depth buffer is {actual} bytes, expected {expected} for {width}x{height}")]
    DepthBufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Decode a sample for dataset export.
///
/// RGB gains an opaque alpha channel; depth is quantized by
/// `depth_scale / 65535` into the u16 storage range and resized
/// (nearest-neighbor) to the RGB resolution.
pub fn decode_for_dataset(
    frame: &CaptureFrame,
    depth_scale: f32,
) -> Result<DatasetFrame, DecodeError> {
    check_rgb(frame)?;

    let mut rgba = Vec::with_capacity(frame.rgb.len() / 3 * 4);
    for px in frame.rgb.chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(255);
    }
    let rgba = RgbaImage::from_raw(frame.width, frame.height, rgba).ok_or(
        DecodeError::RgbBufferSize {
            width: frame.width,
            height: frame.height,
            expected: frame.width as usize * frame.height as usize * 3,
            actual: frame.rgb.len(),
        },
    )?;

    let depth = match &frame.depth {
        Some(block) => {
            let meters = depth_to_floats(block)?;
            let quantized: Vec<u16> = meters
                .iter()
                .map(|d| (d * 65535.0 / depth_scale).round().clamp(0.0, 65535.0) as u16)
                .collect();
            let resized = resize_nearest(
                &quantized,
                block.width,
                block.height,
                frame.width,
                frame.height,
            );
            DepthImage::from_raw(frame.width, frame.height, resized)
        }
        None => None,
    };

    Ok(DatasetFrame {
        rgba,
        depth,
        pose: pose_matrix(frame),
        intrinsics: frame.intrinsics,
        timestamp: frame.timestamp,
    })
}

/// Decode a sample for the live training feed.
///
/// RGB is normalized to `[0, 1]`, converted from display (sRGB) to linear
/// color, and gains a zero alpha channel; depth stays float, resized to
/// the RGB resolution; the pose keeps only the 3x4 extrinsic block.
pub fn decode_for_training(frame: &CaptureFrame) -> Result<LiveFrame, DecodeError> {
    check_rgb(frame)?;

    let mut rgba = Vec::with_capacity(frame.rgb.len() / 3 * 4);
    for px in frame.rgb.chunks_exact(3) {
        for c in px {
            rgba.push(srgb_to_linear(*c as f32 / 255.0));
        }
        rgba.push(0.0);
    }

    let depth = match &frame.depth {
        Some(block) => {
            let meters = depth_to_floats(block)?;
            Some(resize_nearest(
                &meters,
                block.width,
                block.height,
                frame.width,
                frame.height,
            ))
        }
        None => None,
    };

    let pose = pose_matrix(frame);
    let mut camera_to_world = [0.0f32; 12];
    for r in 0..3 {
        camera_to_world[r * 4..r * 4 + 4].copy_from_slice(&pose.row(r).to_array());
    }

    Ok(LiveFrame {
        width: frame.width,
        height: frame.height,
        rgba,
        depth,
        camera_to_world,
        intrinsics: frame.intrinsics,
        timestamp: frame.timestamp,
    })
}

fn check_rgb(frame: &CaptureFrame) -> Result<(), DecodeError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(DecodeError::ZeroDimension {
            width: frame.width,
            height: frame.height,
        });
    }
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.rgb.len() != expected {
        return Err(DecodeError::RgbBufferSize {
            width: frame.width,
            height: frame.height,
            expected,
            actual: frame.rgb.len(),
        });
    }
    Ok(())
}

/// Reinterpret a depth block's bytes as little-endian f32 meters.
fn depth_to_floats(block: &posecap_wire::DepthBlock) -> Result<Vec<f32>, DecodeError> {
    if block.width == 0 || block.height == 0 {
        return Err(DecodeError::ZeroDimension {
            width: block.width,
            height: block.height,
        });
    }
    let expected = block.width as usize * block.height as usize * 4;
    if block.data.len() != expected {
        return Err(DecodeError::DepthBufferSize {
            width: block.width,
            height: block.height,
            expected,
            actual: block.data.len(),
        });
    }
    Ok(block
        .data
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// The wire packs the camera-to-world transform row-major, but readers
/// consume its transpose; reinterpreting the 16 floats column-major yields
/// exactly that.
fn pose_matrix(frame: &CaptureFrame) -> Mat4 {
    Mat4::from_cols_array(&frame.transform)
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn resize_nearest<T: Copy>(src: &[T], sw: u32, sh: u32, dw: u32, dh: u32) -> Vec<T> {
    let mut out = Vec::with_capacity(dw as usize * dh as usize);
    for y in 0..dh as u64 {
        let sy = (y * sh as u64 / dh as u64).min(sh as u64 - 1);
        for x in 0..dw as u64 {
            let sx = (x * sw as u64 / dw as u64).min(sw as u64 - 1);
            out.push(src[(sy * sw as u64 + sx) as usize]);
        }
    }
    out
}
