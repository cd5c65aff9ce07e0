//! Image pipeline stages for GDR-CAM.
//!
//! This crate provides:
//! - Format detection from magic bytes
//! - Orientation-code correction of raw frames
//! - Center-crop to 16:9 / 9:16
//! - Quarter-turn rotation that carries embedded tags over
//! - The embedded tag block (GPS, capture time, inspection comment)
//! - Overlay compositing of the location/timestamp annotation
//!
//! # Example
//!
//! ```no_run
//! use gdrcam_image::{correct_orientation, crop_to_aspect, encode_jpeg, write_tags};
//! use gdrcam_image::{AspectPolicy, InspectionRecord, RawFrame};
//!
//! # fn main() -> gdrcam_image::Result<()> {
//! let data = std::fs::read("frame.jpg")?;
//! let frame = RawFrame::decode(&data)?;
//! let upright = crop_to_aspect(frame.into_upright(), &AspectPolicy::default())?;
//! let working = encode_jpeg(&upright, 98)?;
//! let tagged = write_tags(&working, &InspectionRecord::default())?;
//! # let _ = (tagged, correct_orientation);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod codec;
mod crop;
mod detect;
mod error;
mod frame;
mod metadata;
mod orient;
pub mod overlay;
mod rotate;
pub mod tags;

#[cfg(feature = "wasm")]
mod wasm;

pub use codec::{decode, encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use crop::{crop_to_aspect, crop_window, AspectPolicy, CropWindow};
pub use detect::{detect_format, ImageFormat};
pub use error::{ImageError, ImageErrorCode, Result};
pub use frame::RawFrame;
pub use metadata::{dimensions, extract_metadata, ImageMetadata};
pub use orient::{correct_orientation, OrientationCode};
pub use overlay::{annotate, OverlayFont, OverlayStyle};
pub use rotate::{rotate_pixels, rotate_tagged, RotationAngle};
pub use tags::{read_tags, write_tags, write_tags_at, InspectionRecord, TagBlock, TaggedImage};
