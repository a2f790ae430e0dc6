//! Capture bus subscription
//!
//! Each subscriber registers a zenoh callback that pushes raw payloads
//! into a bounded channel; `try_next()` drains that channel without
//! blocking, so the owning loop decides how to idle.

use posecap_wire::{WireError, WireRecord};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, info};
use zenoh::{pubsub::Subscriber, Session, Wait};

/// Samples buffered per subscription before new arrivals are dropped.
const QUEUE_DEPTH: usize = 256;

/// Errors raised by the bus layer.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("subscriber channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Connection to the capture bus for one domain.
///
/// The domain id namespaces all topic key expressions, so several capture
/// sessions can share a network without crosstalk.
pub struct FrameBus {
    session: Session,
    domain_id: u32,
}

impl FrameBus {
    /// Open a bus session for the given domain id.
    pub fn connect(domain_id: u32) -> Result<Self, IngestError> {
        let session = zenoh::open(zenoh::Config::default())
            .wait()
            .map_err(|e| IngestError::Transport(e.to_string()))?;
        info!("Connected to capture bus (domain {})", domain_id);
        Ok(Self { session, domain_id })
    }

    /// Subscribe to the record type's topic within this domain.
    pub fn subscribe<R: WireRecord>(&self) -> Result<FrameSubscriber<R>, IngestError> {
        let key = format!("posecap/{}/{}", self.domain_id, R::TOPIC);
        let (tx, rx) = flume::bounded::<Vec<u8>>(QUEUE_DEPTH);

        let subscriber = self
            .session
            .declare_subscriber(key.clone())
            .callback(move |sample| {
                let payload = sample.payload().to_bytes().to_vec();
                if tx.try_send(payload).is_err() {
                    debug!("Receive queue full, dropping sample");
                }
            })
            .wait()
            .map_err(|e| IngestError::Transport(e.to_string()))?;

        info!("Subscribed to {}", key);
        Ok(FrameSubscriber {
            _subscriber: subscriber,
            rx,
            _record: PhantomData,
        })
    }
}

/// Non-blocking subscription to one topic, typed by wire record.
pub struct FrameSubscriber<R: WireRecord> {
    _subscriber: Subscriber<()>,
    rx: flume::Receiver<Vec<u8>>,
    _record: PhantomData<R>,
}

impl<R: WireRecord> FrameSubscriber<R> {
    /// Return the next received record, or `None` if nothing is queued.
    pub fn try_next(&self) -> Result<Option<R>, IngestError> {
        match self.rx.try_recv() {
            Ok(payload) => Ok(Some(R::decode(&payload)?)),
            Err(flume::TryRecvError::Empty) => Ok(None),
            Err(flume::TryRecvError::Disconnected) => Err(IngestError::ChannelClosed),
        }
    }
}
