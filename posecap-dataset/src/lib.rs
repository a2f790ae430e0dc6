//! Posecap Dataset Crate
//!
//! Persists decoded posed frames as an image dataset with a
//! `transforms.json` manifest. Images land under `images/`, named by
//! zero-based frame index, with depth stored as 16-bit PNGs alongside.

pub mod frame;
pub mod manifest;
pub mod writer;

pub use frame::{DatasetFrame, DepthImage};
pub use manifest::{Manifest, ManifestFrame, MANIFEST_FILE};
pub use writer::{DatasetConfig, DatasetError, DatasetWriter, WriteOutcome};
