//! Encoder process lifecycle and payload writing

use crate::encoder::EncoderConfig;
use posecap_wire::{Intrinsics, PosedVideoFrame};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while driving the encoder process.
#[derive(Debug, Error)]
pub enum MuxerError {
    #[error("failed to start encoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to write to encoder: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to wait for encoder: {0}")]
    Wait(#[source] std::io::Error),

    #[error("encoder exited with {0}")]
    EncoderExit(std::process::ExitStatus),

    #[error("encoder input already closed")]
    Closed,

    #[error("failed to write pose sidecar: {0}")]
    Sidecar(#[source] std::io::Error),

    #[error("failed to serialize pose sidecar: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pose metadata kept for one written payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseRecord {
    pub timestamp: f64,
    /// 4x4 camera-to-world transform, row-major as received.
    pub transform_matrix: [[f32; 4]; 4],
    pub intrinsics: Intrinsics,
}

impl From<&PosedVideoFrame> for PoseRecord {
    fn from(frame: &PosedVideoFrame) -> Self {
        Self {
            timestamp: frame.timestamp,
            transform_matrix: std::array::from_fn(|r| {
                std::array::from_fn(|c| frame.transform[r * 4 + c])
            }),
            intrinsics: frame.intrinsics,
        }
    }
}

/// Result of a completed muxing run.
#[derive(Debug)]
pub struct MuxerSummary {
    pub frames: u32,
    pub output: PathBuf,
    pub sidecar: PathBuf,
}

/// External encoder process fed raw payload bytes over stdin.
///
/// The input pipe is closed exactly once and the process is always
/// reaped: either by [`finish`](Self::finish), which also checks the exit
/// status and writes the pose sidecar, or by `Drop` on abnormal paths.
pub struct VideoMuxer {
    child: Child,
    stdin: Option<ChildStdin>,
    output: PathBuf,
    frames_written: u32,
    poses: Vec<PoseRecord>,
}

impl VideoMuxer {
    /// Spawn the configured encoder. Width and height come from the first
    /// received sample; the H.265 stream itself carries them, so they are
    /// only reported here.
    pub fn spawn(config: &EncoderConfig, width: u32, height: u32) -> Result<Self, MuxerError> {
        info!(
            "Starting encoder for {}x{} stream -> {}",
            width,
            height,
            config.output.display()
        );
        Self::from_command(config.command(), config.output.clone())
    }

    /// Spawn an arbitrary command as the encoder, with stdin piped and
    /// stdout discarded.
    pub fn from_command(mut command: Command, output: PathBuf) -> Result<Self, MuxerError> {
        command.stdin(Stdio::piped()).stdout(Stdio::null());
        let mut child = command.spawn().map_err(MuxerError::Spawn)?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MuxerError::Spawn(std::io::Error::other("encoder stdin not piped")))?;
        Ok(Self {
            child,
            stdin: Some(stdin),
            output,
            frames_written: 0,
            poses: Vec::new(),
        })
    }

    /// Write one sample's payload bytes verbatim, in arrival order, and
    /// record its pose for the sidecar.
    pub fn write_frame(&mut self, frame: &PosedVideoFrame) -> Result<(), MuxerError> {
        let stdin = self.stdin.as_mut().ok_or(MuxerError::Closed)?;
        stdin.write_all(&frame.payload).map_err(MuxerError::Write)?;
        self.poses.push(PoseRecord::from(frame));
        self.frames_written += 1;
        debug!(
            "Wrote payload {} ({} bytes)",
            self.frames_written,
            frame.payload.len()
        );
        Ok(())
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Close the encoder's input, wait for it to flush the output file,
    /// and write the pose sidecar.
    pub fn finish(&mut self) -> Result<MuxerSummary, MuxerError> {
        let stdin = self.stdin.take().ok_or(MuxerError::Closed)?;
        drop(stdin);

        let status = self.child.wait().map_err(MuxerError::Wait)?;
        if !status.success() {
            return Err(MuxerError::EncoderExit(status));
        }

        let sidecar = sidecar_path(&self.output);
        let json = serde_json::to_string_pretty(&self.poses)?;
        std::fs::write(&sidecar, json).map_err(MuxerError::Sidecar)?;

        info!(
            "Encoder finished: {} frames -> {} (poses at {})",
            self.frames_written,
            self.output.display(),
            sidecar.display()
        );
        Ok(MuxerSummary {
            frames: self.frames_written,
            output: self.output.clone(),
            sidecar,
        })
    }
}

impl Drop for VideoMuxer {
    fn drop(&mut self) {
        // Abnormal exit path: close the pipe and reap the encoder anyway.
        if self.stdin.take().is_some() {
            warn!("Encoder was not finished explicitly, closing input and reaping");
            if let Err(e) = self.child.wait() {
                warn!("Failed to reap encoder process: {}", e);
            }
        }
    }
}

/// Sidecar manifest path next to the output file: `out.mp4` -> `out.poses.json`.
fn sidecar_path(output: &Path) -> PathBuf {
    output.with_extension("poses.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use posecap_wire::WIRE_VERSION;

    fn payload_frame(payload: Vec<u8>, timestamp: f64) -> PosedVideoFrame {
        PosedVideoFrame {
            version: WIRE_VERSION,
            stream_id: 0,
            timestamp,
            payload,
            transform: std::array::from_fn(|i| i as f32),
            intrinsics: Intrinsics::new(500.0, 500.0, 960.0, 720.0),
            width: 1920,
            height: 1440,
            depth: None,
        }
    }

    #[test]
    fn test_payloads_reach_the_process_in_arrival_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.mp4");
        let capture = dir.path().join("capture.bin");

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(format!("cat > {}", capture.display()));
        let mut muxer = VideoMuxer::from_command(cmd, out).unwrap();

        muxer.write_frame(&payload_frame(vec![1, 2], 0.0)).unwrap();
        muxer.write_frame(&payload_frame(vec![3], 0.1)).unwrap();
        muxer.write_frame(&payload_frame(vec![4, 5], 0.2)).unwrap();
        let summary = muxer.finish().unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(std::fs::read(capture).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sidecar_holds_one_pose_per_payload() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.mp4");
        let mut muxer = VideoMuxer::from_command(Command::new("cat"), out.clone()).unwrap();

        for i in 0..3 {
            muxer
                .write_frame(&payload_frame(vec![0; 4], i as f64 / 30.0))
                .unwrap();
        }
        let summary = muxer.finish().unwrap();

        assert_eq!(summary.sidecar, dir.path().join("clip.poses.json"));
        let poses: Vec<PoseRecord> =
            serde_json::from_str(&std::fs::read_to_string(&summary.sidecar).unwrap()).unwrap();
        assert_eq!(poses.len(), 3);
        assert_eq!(poses[1].transform_matrix[1], [4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_finish_twice_reports_closed_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut muxer =
            VideoMuxer::from_command(Command::new("cat"), dir.path().join("o.mp4")).unwrap();
        muxer.finish().unwrap();
        assert!(matches!(muxer.finish(), Err(MuxerError::Closed)));
        assert!(matches!(
            muxer.write_frame(&payload_frame(vec![1], 0.0)),
            Err(MuxerError::Closed)
        ));
    }

    #[test]
    fn test_nonzero_exit_surfaces_as_encoder_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut muxer =
            VideoMuxer::from_command(Command::new("false"), dir.path().join("o.mp4")).unwrap();
        assert!(matches!(muxer.finish(), Err(MuxerError::EncoderExit(_))));
    }

    #[test]
    fn test_missing_encoder_fails_to_spawn() {
        let result = VideoMuxer::from_command(
            Command::new("posecap-no-such-encoder"),
            PathBuf::from("o.mp4"),
        );
        assert!(matches!(result, Err(MuxerError::Spawn(_))));
    }
}
