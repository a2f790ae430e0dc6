//! Feeds posed frames from the capture bus straight into a reconstruction
//! engine's training slots.
//!
//! The engine owns the driving loop: each render iteration polls the bus
//! once and applies at most one frame. This binary wires the feed to a
//! tracing-backed stand-in engine; a real session implements
//! `posecap_train::ReconstructionEngine` the same way.

use anyhow::Result;
use clap::Parser;
use posecap_ingest::{FrameBus, LiveFrameSource};
use posecap_train::{ReconstructionEngine, SourceError, TrainerFeed, DEFAULT_SLOT_CAPACITY};
use posecap_wire::Intrinsics;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stream a capture session live into a reconstruction engine.
#[derive(Parser)]
#[command(name = "capture-stream")]
struct Args {
    /// Maximum number of training slots held by the engine
    #[arg(long, default_value_t = DEFAULT_SLOT_CAPACITY)]
    max_cameras: usize,

    /// Capture bus domain id
    #[arg(long, default_value_t = 0)]
    domain_id: u32,
}

/// Stand-in engine that logs every frame-update call.
#[derive(Default)]
struct TracingEngine;

impl TracingEngine {
    /// One render-loop iteration. Returns false once the engine's window
    /// closes; the stand-in has no window, so it runs until interrupted.
    fn frame(&mut self) -> bool {
        std::thread::sleep(Duration::from_millis(1));
        true
    }
}

impl ReconstructionEngine for TracingEngine {
    fn set_image(
        &mut self,
        slot: usize,
        width: u32,
        height: u32,
        _rgba: &[f32],
        depth: Option<&[f32]>,
        _depth_scale: f32,
    ) {
        debug!(
            "set_image(slot={}, {}x{}, depth={})",
            slot,
            width,
            height,
            depth.is_some()
        );
    }

    fn set_extrinsics(&mut self, slot: usize, camera_to_world: &[f32; 12]) {
        debug!("set_extrinsics(slot={}): {:?}", slot, camera_to_world);
    }

    fn set_intrinsics(&mut self, slot: usize, intrinsics: Intrinsics) {
        debug!("set_intrinsics(slot={}): {:?}", slot, intrinsics);
    }

    fn set_active_frames(&mut self, count: usize) {
        debug!("set_active_frames({})", count);
    }

    fn focus_view(&mut self, slot: usize) {
        info!("Focusing view on slot {}", slot);
    }

    fn set_render_ground_truth(&mut self, enabled: bool) {
        info!("Ground-truth rendering: {}", enabled);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let bus = FrameBus::connect(args.domain_id)?;
    let mut source = LiveFrameSource::new(&bus)?;
    let mut feed = TrainerFeed::new(args.max_cameras)?;
    let mut engine = TracingEngine::default();

    info!(
        "Streaming into {} training slots, waiting for frames",
        feed.capacity()
    );

    while engine.frame() {
        match feed.poll(&mut source, &mut engine) {
            Ok(true) => info!("Frame {} received", feed.total_frames()),
            Ok(false) => {}
            Err(SourceError::InvalidFrame(e)) => warn!("Skipping malformed sample: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
