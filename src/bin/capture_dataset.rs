//! Receives posed frames from the capture bus and accumulates them into an
//! image dataset with a `transforms.json` manifest.

use anyhow::{bail, Result};
use clap::Parser;
use posecap_dataset::{DatasetConfig, DatasetWriter, WriteOutcome};
use posecap_ingest::{decode_for_dataset, FrameBus, IngestError};
use posecap_wire::CaptureFrame;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Save a posed-frame capture session as a dataset.
#[derive(Parser)]
#[command(name = "capture-dataset")]
struct Args {
    /// Number of frames to receive before the dataset is finalized
    #[arg(long)]
    n_frames: u32,

    /// Directory to save the dataset into
    #[arg(long)]
    save_path: PathBuf,

    /// Depth scale used when quantizing depth images
    #[arg(long, default_value_t = 1.0)]
    depth_scale: f32,

    /// Rewrite over the dataset if the path already exists
    #[arg(long)]
    overwrite: bool,

    /// Capture bus domain id
    #[arg(long, default_value_t = 0)]
    domain_id: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.save_path.exists() && args.overwrite && !confirm_overwrite(&args.save_path)? {
        info!("Keeping existing dataset, exiting");
        return Ok(());
    }

    let mut writer = DatasetWriter::create(DatasetConfig {
        root: args.save_path,
        frame_target: args.n_frames,
        depth_scale: args.depth_scale,
        overwrite: args.overwrite,
    })?;

    let bus = FrameBus::connect(args.domain_id)?;
    let frames = bus.subscribe::<CaptureFrame>()?;

    loop {
        std::thread::sleep(Duration::from_millis(1));

        let sample = match frames.try_next() {
            Ok(Some(sample)) => sample,
            Ok(None) => continue,
            Err(IngestError::ChannelClosed) => bail!("capture bus subscription closed"),
            Err(e) => {
                warn!("Skipping malformed sample: {}", e);
                continue;
            }
        };
        info!("Frame {} received", writer.frames_written());

        let decoded = match decode_for_dataset(&sample, args.depth_scale) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Skipping malformed sample: {}", e);
                continue;
            }
        };

        if writer.write_frame(&decoded)? == WriteOutcome::Complete {
            break;
        }
    }

    Ok(())
}

/// Prompt before deleting an existing dataset directory.
fn confirm_overwrite(path: &Path) -> Result<bool> {
    eprint!(
        "Warning, {} exists already. Press Y to delete anyway: ",
        path.display()
    );
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim() == "Y")
}
