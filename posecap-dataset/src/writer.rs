//! Dataset writer sink

use crate::frame::DatasetFrame;
use crate::manifest::{Manifest, ManifestFrame, MANIFEST_FILE};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the dataset writer.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("frame target must be greater than 0")]
    InvalidFrameTarget,

    #[error("dataset path already exists: {}", .0.display())]
    PathExists(PathBuf),

    #[error("dataset is already complete ({0} frames)")]
    AlreadyComplete(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("manifest serialization error: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Dataset writer configuration.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Dataset root directory. Must not exist unless `overwrite` is set.
    pub root: PathBuf,
    /// Number of frames to persist before the manifest is written.
    pub frame_target: u32,
    /// Depth scale used when the depth images were quantized.
    pub depth_scale: f32,
    /// Remove a pre-existing dataset at `root` instead of failing.
    pub overwrite: bool,
}

/// Outcome of a single frame write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// More frames are needed to reach the target.
    InProgress,
    /// The target was reached and the manifest has been written.
    Complete,
}

/// Persists decoded frames as image files plus a manifest.
///
/// Configuration is validated up front, but no directory is created until
/// the first frame arrives, so an aborted run leaves nothing behind. The
/// manifest is written in one piece after the final frame, and only ever
/// references files that are already on disk.
pub struct DatasetWriter {
    root: PathBuf,
    images_dir: PathBuf,
    frame_target: u32,
    depth_scale: f32,
    manifest: Manifest,
    frames_written: u32,
}

impl DatasetWriter {
    pub fn create(config: DatasetConfig) -> Result<Self, DatasetError> {
        if config.frame_target == 0 {
            return Err(DatasetError::InvalidFrameTarget);
        }

        if config.root.exists() {
            if config.overwrite {
                info!("Removing existing dataset at {}", config.root.display());
                fs::remove_dir_all(&config.root)?;
            } else {
                return Err(DatasetError::PathExists(config.root));
            }
        }

        let images_dir = config.root.join("images");
        Ok(Self {
            root: config.root,
            images_dir,
            frame_target: config.frame_target,
            depth_scale: config.depth_scale,
            manifest: Manifest::default(),
            frames_written: 0,
        })
    }

    /// Write one frame's images and append its manifest entry.
    pub fn write_frame(&mut self, frame: &DatasetFrame) -> Result<WriteOutcome, DatasetError> {
        if self.is_complete() {
            return Err(DatasetError::AlreadyComplete(self.frames_written));
        }

        let (width, height) = frame.dimensions();
        if self.frames_written == 0 {
            fs::create_dir_all(&self.images_dir)?;
            self.manifest.w = width;
            self.manifest.h = height;
            self.manifest.fl_x = frame.intrinsics.fl_x;
            self.manifest.fl_y = frame.intrinsics.fl_y;
            self.manifest.cx = frame.intrinsics.cx;
            self.manifest.cy = frame.intrinsics.cy;
            self.manifest.integer_depth_scale = self.depth_scale / 65535.0;
            info!(
                "Created dataset at {} ({}x{})",
                self.root.display(),
                width,
                height
            );
        }

        let index = self.frames_written;
        frame.rgba.save(self.images_dir.join(format!("{index}.png")))?;

        let depth_path = match &frame.depth {
            Some(depth) => {
                let name = format!("{index}.depth.png");
                depth.save(self.images_dir.join(&name))?;
                Some(format!("images/{name}"))
            }
            None => None,
        };

        self.manifest.frames.push(ManifestFrame {
            transform_matrix: frame.pose_rows(),
            file_path: format!("images/{index}"),
            fl_x: frame.intrinsics.fl_x,
            fl_y: frame.intrinsics.fl_y,
            cx: frame.intrinsics.cx,
            cy: frame.intrinsics.cy,
            w: width,
            h: height,
            depth_path,
        });

        self.frames_written += 1;
        debug!("Wrote frame {}/{}", self.frames_written, self.frame_target);

        if self.is_complete() {
            let json = serde_json::to_string_pretty(&self.manifest)?;
            fs::write(self.root.join(MANIFEST_FILE), json)?;
            info!(
                "Dataset complete: {} frames, manifest at {}",
                self.frames_written,
                self.root.join(MANIFEST_FILE).display()
            );
            Ok(WriteOutcome::Complete)
        } else {
            Ok(WriteOutcome::InProgress)
        }
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    pub fn is_complete(&self) -> bool {
        self.frames_written >= self.frame_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::DepthImage;
    use glam::Mat4;
    use image::{Rgba, RgbaImage};
    use posecap_wire::Intrinsics;

    fn test_frame(tag: u8, with_depth: bool) -> DatasetFrame {
        let rgba = RgbaImage::from_pixel(4, 2, Rgba([tag, 0, 0, 255]));
        let depth = with_depth.then(|| {
            DepthImage::from_raw(4, 2, vec![49151u16; 8]).expect("valid depth buffer")
        });
        DatasetFrame {
            rgba,
            depth,
            pose: Mat4::IDENTITY,
            intrinsics: Intrinsics::new(400.0, 400.0, 2.0, 1.0),
            timestamp: tag as f64,
        }
    }

    fn config(root: PathBuf, target: u32) -> DatasetConfig {
        DatasetConfig {
            root,
            frame_target: target,
            depth_scale: 2.0,
            overwrite: false,
        }
    }

    #[test]
    fn test_zero_frame_target_is_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        let result = DatasetWriter::create(config(root.clone(), 0));
        assert!(matches!(result, Err(DatasetError::InvalidFrameTarget)));
        assert!(!root.exists());
    }

    #[test]
    fn test_existing_path_is_rejected_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("keep.txt"), b"precious").unwrap();

        let result = DatasetWriter::create(config(root.clone(), 3));
        assert!(matches!(result, Err(DatasetError::PathExists(_))));
        assert_eq!(fs::read(root.join("keep.txt")).unwrap(), b"precious");
    }

    #[test]
    fn test_overwrite_replaces_existing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("stale.txt"), b"old").unwrap();

        let mut cfg = config(root.clone(), 1);
        cfg.overwrite = true;
        let mut writer = DatasetWriter::create(cfg).unwrap();
        assert_eq!(
            writer.write_frame(&test_frame(1, false)).unwrap(),
            WriteOutcome::Complete
        );
        assert!(!root.join("stale.txt").exists());
        assert!(root.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_no_directory_until_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        let _writer = DatasetWriter::create(config(root.clone(), 3)).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_full_run_writes_every_file_and_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        let mut writer = DatasetWriter::create(config(root.clone(), 3)).unwrap();

        for i in 0..3u8 {
            let outcome = writer.write_frame(&test_frame(i, true)).unwrap();
            let expected = if i == 2 {
                WriteOutcome::Complete
            } else {
                WriteOutcome::InProgress
            };
            assert_eq!(outcome, expected);
        }
        assert!(writer.is_complete());

        let manifest: Manifest =
            serde_json::from_str(&fs::read_to_string(root.join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(manifest.frames.len(), 3);
        assert_eq!(manifest.w, 4);
        assert_eq!(manifest.h, 2);
        assert!((manifest.integer_depth_scale - 2.0 / 65535.0).abs() < 1e-9);

        for (i, entry) in manifest.frames.iter().enumerate() {
            assert_eq!(entry.file_path, format!("images/{i}"));
            assert!(root.join(format!("images/{i}.png")).exists());
            let depth_path = entry.depth_path.as_ref().unwrap();
            assert!(root.join(depth_path).exists());
        }
    }

    #[test]
    fn test_writes_past_the_target_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        let mut writer = DatasetWriter::create(config(root, 1)).unwrap();

        writer.write_frame(&test_frame(0, false)).unwrap();
        assert!(matches!(
            writer.write_frame(&test_frame(1, false)),
            Err(DatasetError::AlreadyComplete(1))
        ));
    }

    #[test]
    fn test_stored_depth_round_trips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dataset");
        let mut writer = DatasetWriter::create(config(root.clone(), 1)).unwrap();
        writer.write_frame(&test_frame(0, true)).unwrap();

        // depth_scale = 2.0: stored 49151 corresponds to ~1.5 m.
        let loaded = image::open(root.join("images/0.depth.png"))
            .unwrap()
            .into_luma16();
        let stored = loaded.get_pixel(0, 0)[0];
        assert_eq!(stored, 49151);
        let meters = stored as f32 * 2.0 / 65535.0;
        assert!((meters - 1.5).abs() <= 2.0 / 65535.0);
    }
}
