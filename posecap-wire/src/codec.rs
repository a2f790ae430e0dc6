//! Bincode codec for wire records, with schema-version enforcement.

use crate::record::{CaptureFrame, PosedVideoFrame, WIRE_VERSION};
use thiserror::Error;

/// Errors raised while encoding or decoding wire records.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode record: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode record: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("unsupported wire version {found}, expected {expected}", expected = WIRE_VERSION)]
    UnsupportedVersion { found: u16 },

    #[error("{trailing} trailing bytes after record")]
    TrailingBytes { trailing: usize },
}

/// A record type with a fixed topic on the capture bus.
pub trait WireRecord: Sized {
    /// Topic name this record is published under.
    const TOPIC: &'static str;

    /// Schema version carried by the record.
    fn version(&self) -> u16;

    fn encode(&self) -> Result<Vec<u8>, WireError>;

    fn decode(bytes: &[u8]) -> Result<Self, WireError>;
}

fn encode_record<T: bincode::Encode>(record: &T) -> Result<Vec<u8>, WireError> {
    Ok(bincode::encode_to_vec(record, bincode::config::standard())?)
}

fn decode_record<T: bincode::Decode<()>>(bytes: &[u8]) -> Result<T, WireError> {
    let (record, consumed) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    if consumed != bytes.len() {
        return Err(WireError::TrailingBytes {
            trailing: bytes.len() - consumed,
        });
    }
    Ok(record)
}

fn check_version(found: u16) -> Result<(), WireError> {
    if found == WIRE_VERSION {
        Ok(())
    } else {
        Err(WireError::UnsupportedVersion { found })
    }
}

impl WireRecord for CaptureFrame {
    const TOPIC: &'static str = "frames";

    fn version(&self) -> u16 {
        self.version
    }

    fn encode(&self) -> Result<Vec<u8>, WireError> {
        encode_record(self)
    }

    fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let record: Self = decode_record(bytes)?;
        check_version(record.version)?;
        Ok(record)
    }
}

impl WireRecord for PosedVideoFrame {
    const TOPIC: &'static str = "posed_video";

    fn version(&self) -> u16 {
        self.version
    }

    fn encode(&self) -> Result<Vec<u8>, WireError> {
        encode_record(self)
    }

    fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let record: Self = decode_record(bytes)?;
        check_version(record.version)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DepthBlock, Intrinsics};

    fn sample_frame() -> CaptureFrame {
        CaptureFrame {
            version: WIRE_VERSION,
            id: 7,
            timestamp: 12.5,
            intrinsics: Intrinsics::new(500.0, 500.0, 320.0, 240.0),
            transform: std::array::from_fn(|i| i as f32),
            width: 2,
            height: 2,
            rgb: vec![10; 12],
            depth: Some(DepthBlock {
                width: 1,
                height: 1,
                scale: 1.0,
                data: 2.0f32.to_le_bytes().to_vec(),
            }),
        }
    }

    #[test]
    fn test_capture_frame_round_trip() {
        let frame = sample_frame();
        let bytes = frame.encode().unwrap();
        let decoded = CaptureFrame::decode(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_posed_video_frame_round_trip() {
        let frame = PosedVideoFrame {
            version: WIRE_VERSION,
            stream_id: 1,
            timestamp: 0.033,
            payload: vec![0, 0, 0, 1, 0x40],
            transform: [0.0; 16],
            intrinsics: Intrinsics::default(),
            width: 1920,
            height: 1440,
            depth: None,
        };
        let bytes = frame.encode().unwrap();
        let decoded = PosedVideoFrame::decode(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let mut frame = sample_frame();
        frame.version = WIRE_VERSION + 1;
        let bytes = frame.encode().unwrap();
        match CaptureFrame::decode(&bytes) {
            Err(WireError::UnsupportedVersion { found }) => {
                assert_eq!(found, WIRE_VERSION + 1);
            }
            other => panic!("expected version error, got {:?}", other.map(|f| f.id)),
        }
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut bytes = sample_frame().encode().unwrap();
        bytes.push(0xff);
        assert!(matches!(
            CaptureFrame::decode(&bytes),
            Err(WireError::TrailingBytes { trailing: 1 })
        ));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        assert!(matches!(
            CaptureFrame::decode(&[0xde, 0xad]),
            Err(WireError::Decode(_))
        ));
    }
}
