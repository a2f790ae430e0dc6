//! External encoder invocation

use std::path::PathBuf;
use std::process::Command;

/// Parameters for the external encoder process.
///
/// The defaults reproduce the stock ffmpeg invocation for an H.265
/// elementary stream piped over stdin. The stream's own headers carry the
/// frame dimensions; width/height are only reported for logging.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Output container path.
    pub output: PathBuf,
    /// Encoder executable name or path.
    pub program: String,
    /// Output codec passed to `-vcodec`.
    pub codec: String,
    /// Output pixel format.
    pub pixel_format: String,
    /// Input frame rate.
    pub fps: u32,
    /// Encoder thread count.
    pub threads: u32,
    /// Keep the encoder's own log output instead of silencing it.
    pub verbose: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("capture.mp4"),
            program: "ffmpeg".to_string(),
            codec: "hevc".to_string(),
            pixel_format: "yuv420p".to_string(),
            fps: 30,
            threads: 2,
            verbose: false,
        }
    }
}

impl EncoderConfig {
    /// Build the encoder command line. stdin/stdout wiring is left to the
    /// muxer.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if !self.verbose {
            cmd.args(["-loglevel", "quiet"]);
        }
        cmd.arg("-y")
            .args(["-threads", &self.threads.to_string()])
            .args(["-thread_type", "frame"])
            .args(["-f", "hevc"])
            .args(["-r", &self.fps.to_string()])
            .args(["-i", "pipe:"])
            .args(["-vcodec", &self.codec])
            .args(["-pix_fmt", &self.pixel_format])
            .arg(&self.output);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_line() {
        let config = EncoderConfig {
            output: PathBuf::from("out.mp4"),
            ..EncoderConfig::default()
        };
        let cmd = config.command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "ffmpeg");
        assert_eq!(
            args,
            vec![
                "-loglevel", "quiet", "-y", "-threads", "2", "-thread_type", "frame", "-f",
                "hevc", "-r", "30", "-i", "pipe:", "-vcodec", "hevc", "-pix_fmt", "yuv420p",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn test_verbose_keeps_encoder_logging() {
        let config = EncoderConfig {
            verbose: true,
            ..EncoderConfig::default()
        };
        let cmd = config.command();
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(!args.contains(&"-loglevel".to_string()));
    }
}
