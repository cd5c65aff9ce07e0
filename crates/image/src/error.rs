//! Error types for the image crate.

use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur during image operations.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Unknown image format
    #[error("Unknown image format")]
    UnknownFormat,

    /// Format is known but cannot carry a tag block
    #[error("Unsupported format for embedded tags: {0}")]
    UnsupportedFormat(&'static str),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),

    /// Pixel transform could not be applied
    #[error("Correction failed: {0}")]
    Correction(String),

    /// Rotation angle that is not a quarter turn
    #[error("Rotation must be a multiple of 90 degrees, got {0}")]
    InvalidRotation(i32),

    /// Latitude/longitude out of range when writing tags
    #[error("Invalid GPS coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Tag block could not be carried onto re-encoded pixels
    #[error("Tag block could not be reinserted: {0}")]
    TagReinsertion(String),

    /// The tag codec failed to produce or accept a block
    #[error("Tag encoding unavailable: {0}")]
    EncodingUnavailable(String),

    /// Image expected to carry tags has none
    #[error("Image carries no embedded tag block")]
    MissingTags,

    /// Overlay font could not be loaded
    #[error("Font error: {0}")]
    Font(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image decode/encode error
    #[error("Image processing error: {0}")]
    ProcessingError(#[from] image::ImageError),
}

/// Error code for integration with gdrcam-core error handling.
/// Range: 20xxx for image errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorCode {
    /// Unknown or unsupported format
    Format = 20001,
    /// Invalid data or failed decode
    InvalidData = 20002,
    /// Pixel correction failure
    Correction = 20003,
    /// Out-of-range coordinates
    InvalidCoordinates = 20004,
    /// Tag reinsertion failure
    TagReinsertion = 20005,
    /// Tag codec failure
    EncodingUnavailable = 20006,
    /// Missing tag block
    MissingTags = 20007,
    /// Font loading failure
    Font = 20008,
    /// IO failure
    Io = 20009,
}

impl ImageError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ImageErrorCode {
        match self {
            ImageError::UnknownFormat | ImageError::UnsupportedFormat(_) => ImageErrorCode::Format,
            ImageError::InvalidData(_) | ImageError::ProcessingError(_) => {
                ImageErrorCode::InvalidData
            }
            ImageError::Correction(_) | ImageError::InvalidRotation(_) => {
                ImageErrorCode::Correction
            }
            ImageError::InvalidCoordinates { .. } => ImageErrorCode::InvalidCoordinates,
            ImageError::TagReinsertion(_) => ImageErrorCode::TagReinsertion,
            ImageError::EncodingUnavailable(_) => ImageErrorCode::EncodingUnavailable,
            ImageError::MissingTags => ImageErrorCode::MissingTags,
            ImageError::Font(_) => ImageErrorCode::Font,
            ImageError::IoError(_) => ImageErrorCode::Io,
        }
    }
}
