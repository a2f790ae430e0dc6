//! Live frame source backed by a bus subscription

use crate::bus::{FrameBus, FrameSubscriber, IngestError};
use crate::decode::decode_for_training;
use posecap_train::{FrameSource, LiveFrame, SourceError};
use posecap_wire::CaptureFrame;

/// Adapts a `frames` topic subscription into a training frame source.
pub struct LiveFrameSource {
    subscriber: FrameSubscriber<CaptureFrame>,
}

impl LiveFrameSource {
    pub fn new(bus: &FrameBus) -> Result<Self, IngestError> {
        Ok(Self {
            subscriber: bus.subscribe::<CaptureFrame>()?,
        })
    }
}

impl FrameSource for LiveFrameSource {
    fn try_next_frame(&mut self) -> Result<Option<LiveFrame>, SourceError> {
        match self.subscriber.try_next() {
            Ok(Some(frame)) => decode_for_training(&frame)
                .map(Some)
                .map_err(|e| SourceError::InvalidFrame(e.to_string())),
            Ok(None) => Ok(None),
            Err(IngestError::Wire(e)) => Err(SourceError::InvalidFrame(e.to_string())),
            Err(e) => Err(SourceError::Source(e.to_string())),
        }
    }
}
