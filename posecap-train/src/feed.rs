//! Round-robin training-slot assignment

use crate::engine::ReconstructionEngine;
use crate::frame::LiveFrame;
use crate::source::{FrameSource, SourceError};
use tracing::{debug, info};

/// Default number of training slots held by the engine.
pub const DEFAULT_SLOT_CAPACITY: usize = 100;

/// Errors raised when configuring the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("slot capacity must be greater than 0")]
    InvalidCapacity,
}

/// Assigns incoming frames to a fixed ring of engine training slots.
///
/// Frames occupy slots in round-robin order, overwriting the oldest once
/// the ring is full. The engine is told after every frame how many slots
/// hold valid data, capped at the ring capacity. The first frame ever
/// applied additionally focuses the view on its slot and enables
/// ground-truth rendering; that transition fires exactly once.
pub struct TrainerFeed {
    capacity: usize,
    next_slot: usize,
    total_frames: u64,
}

impl TrainerFeed {
    pub fn new(capacity: usize) -> Result<Self, FeedError> {
        if capacity == 0 {
            return Err(FeedError::InvalidCapacity);
        }
        Ok(Self {
            capacity,
            next_slot: 0,
            total_frames: 0,
        })
    }

    /// Push one decoded frame into the next slot. Returns the slot used.
    pub fn apply<E: ReconstructionEngine>(&mut self, engine: &mut E, frame: &LiveFrame) -> usize {
        let slot = self.next_slot;

        engine.set_image(
            slot,
            frame.width,
            frame.height,
            &frame.rgba,
            frame.depth.as_deref(),
            1.0,
        );
        engine.set_extrinsics(slot, &frame.camera_to_world);
        engine.set_intrinsics(slot, frame.intrinsics);

        self.total_frames += 1;
        self.next_slot = (slot + 1) % self.capacity;
        engine.set_active_frames(self.active_frames());

        if self.total_frames == 1 {
            info!("First frame received, focusing view on slot {}", slot);
            engine.focus_view(slot);
            engine.set_render_ground_truth(true);
        }

        debug!(
            "Applied frame {} to slot {} ({} active)",
            self.total_frames,
            slot,
            self.active_frames()
        );
        slot
    }

    /// One engine-loop iteration: poll the source once and apply the frame
    /// if one arrived. Returns whether a frame was applied.
    pub fn poll<S, E>(&mut self, source: &mut S, engine: &mut E) -> Result<bool, SourceError>
    where
        S: FrameSource,
        E: ReconstructionEngine,
    {
        match source.try_next_frame()? {
            Some(frame) => {
                self.apply(engine, &frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Total frames received since the feed was created.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Number of slots currently holding valid training data.
    pub fn active_frames(&self) -> usize {
        (self.total_frames as usize).min(self.capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TrainerFeed {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SLOT_CAPACITY,
            next_slot: 0,
            total_frames: 0,
        }
    }
}
