//! Decodes a posed H.265 stream from the capture bus into a video file by
//! piping payload fragments into an external encoder process.
//!
//! The first received sample only reports the stream dimensions and spawns
//! the encoder; payloads are written from the second sample on. Correct
//! output depends on the transport delivering fragments in encode order.

use anyhow::{bail, Result};
use clap::Parser;
use posecap_ingest::{FrameBus, IngestError};
use posecap_video::{EncoderConfig, VideoMuxer};
use posecap_wire::PosedVideoFrame;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Save a posed video stream to a video file.
#[derive(Parser)]
#[command(name = "capture-video")]
struct Args {
    /// Output video file
    #[arg(long, default_value = "capture.mp4")]
    save_path: PathBuf,

    /// Number of payload frames to write before finishing
    #[arg(long, default_value_t = 100)]
    frames: u32,

    /// Capture bus domain id
    #[arg(long, default_value_t = 0)]
    domain_id: u32,

    /// Keep the encoder's own log output
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = EncoderConfig {
        output: args.save_path,
        verbose: args.verbose,
        ..EncoderConfig::default()
    };

    let bus = FrameBus::connect(args.domain_id)?;
    let subscriber = bus.subscribe::<PosedVideoFrame>()?;

    let mut muxer: Option<VideoMuxer> = None;
    loop {
        std::thread::sleep(Duration::from_millis(1));

        let sample = match subscriber.try_next() {
            Ok(Some(sample)) => sample,
            Ok(None) => continue,
            Err(IngestError::ChannelClosed) => bail!("capture bus subscription closed"),
            Err(e) => {
                warn!("Skipping malformed sample: {}", e);
                continue;
            }
        };

        match &mut muxer {
            None => {
                info!(
                    "Initializing encoder with width {} and height {}",
                    sample.width, sample.height
                );
                muxer = Some(VideoMuxer::spawn(&config, sample.width, sample.height)?);
            }
            Some(m) => {
                debug!(
                    "Pose for frame {}: {:?}",
                    m.frames_written(),
                    sample.transform
                );
                m.write_frame(&sample)?;
                info!("Writing frame {}", m.frames_written());

                if m.frames_written() >= args.frames {
                    let summary = m.finish()?;
                    info!(
                        "Wrote {} frames to {} (poses at {})",
                        summary.frames,
                        summary.output.display(),
                        summary.sidecar.display()
                    );
                    break;
                }
            }
        }
    }

    Ok(())
}
