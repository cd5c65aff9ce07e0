//! Error types for the capture pipeline.

use crate::CaptureState;
use gdrcam_core::{Error as CoreError, ErrorCode};
use gdrcam_image::ImageError;
use thiserror::Error;

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors that can occur while driving a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Best fix is outside the valid coordinate range
    #[error("Invalid GPS coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Tag block could not be carried onto new pixels
    #[error("Tag block could not be reapplied: {0}")]
    TagReinsertion(String),

    /// Tag codec unavailable or broken
    #[error("Embedded metadata is unavailable: {0}")]
    EncodingUnavailable(String),

    /// Result belongs to an abandoned session
    #[error("Result belongs to an abandoned capture session")]
    StaleSession,

    /// Operation not allowed in the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        /// State at the time of the call
        state: CaptureState,
        /// Attempted operation
        action: &'static str,
    },

    /// Required form field left empty
    #[error("Required form field is empty: {0}")]
    MissingFormField(&'static str),

    /// Save collaborator failed
    #[error("Save failed: {0}")]
    Save(String),

    /// Background task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Worker(String),

    /// Other image failure
    #[error(transparent)]
    Image(ImageError),
}

impl From<ImageError> for CaptureError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidCoordinates { latitude, longitude } => {
                CaptureError::InvalidCoordinates { latitude, longitude }
            }
            ImageError::TagReinsertion(msg) => CaptureError::TagReinsertion(msg),
            ImageError::EncodingUnavailable(msg) => CaptureError::EncodingUnavailable(msg),
            other => CaptureError::Image(other),
        }
    }
}

impl From<tokio::task::JoinError> for CaptureError {
    fn from(err: tokio::task::JoinError) -> Self {
        CaptureError::Worker(err.to_string())
    }
}

/// Error code for integration with gdrcam-core error handling.
/// Range: 30xxx for capture errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureErrorCode {
    /// Out-of-range coordinates
    InvalidCoordinates = 30001,
    /// Tag reinsertion failure
    TagReinsertion = 30002,
    /// Tag codec failure
    EncodingUnavailable = 30003,
    /// Abandoned session
    StaleSession = 30004,
    /// Operation not allowed in state
    InvalidTransition = 30005,
    /// Empty required field
    MissingFormField = 30006,
    /// Save failure
    Save = 30007,
    /// Worker failure
    Worker = 30008,
    /// Image failure
    Image = 30009,
}

impl CaptureError {
    /// Returns the error code for this error.
    pub fn code(&self) -> CaptureErrorCode {
        match self {
            CaptureError::InvalidCoordinates { .. } => CaptureErrorCode::InvalidCoordinates,
            CaptureError::TagReinsertion(_) => CaptureErrorCode::TagReinsertion,
            CaptureError::EncodingUnavailable(_) => CaptureErrorCode::EncodingUnavailable,
            CaptureError::StaleSession => CaptureErrorCode::StaleSession,
            CaptureError::InvalidTransition { .. } => CaptureErrorCode::InvalidTransition,
            CaptureError::MissingFormField(_) => CaptureErrorCode::MissingFormField,
            CaptureError::Save(_) => CaptureErrorCode::Save,
            CaptureError::Worker(_) => CaptureErrorCode::Worker,
            CaptureError::Image(_) => CaptureErrorCode::Image,
        }
    }

    /// Text for the status line.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::InvalidCoordinates { .. } => {
                "Location is out of range; metadata was not added.".to_string()
            }
            CaptureError::TagReinsertion(_) => {
                "Could not keep the metadata on the rotated image.".to_string()
            }
            CaptureError::EncodingUnavailable(_) => "Metadata embedding is unavailable.".to_string(),
            CaptureError::MissingFormField(field) => format!("Please fill in {}.", field),
            CaptureError::Save(_) => "Error saving the image.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CaptureError> for CoreError {
    fn from(err: CaptureError) -> Self {
        let code = match &err {
            CaptureError::InvalidCoordinates { .. } => ErrorCode::InvalidCoordinates,
            CaptureError::TagReinsertion(_) => ErrorCode::TagReinsertion,
            CaptureError::EncodingUnavailable(_) => ErrorCode::EncodingUnavailable,
            CaptureError::StaleSession => ErrorCode::StaleSession,
            CaptureError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            CaptureError::MissingFormField(_) => ErrorCode::MissingFormField,
            CaptureError::Save(_) => ErrorCode::IoError,
            CaptureError::Worker(_) => ErrorCode::Internal,
            CaptureError::Image(ImageError::Correction(_)) => ErrorCode::CorrectionFailed,
            CaptureError::Image(ImageError::ProcessingError(_)) => ErrorCode::DecodeFailed,
            CaptureError::Image(_) => ErrorCode::PixelError,
        };
        let core = match &err {
            CaptureError::InvalidCoordinates { latitude, longitude } => {
                CoreError::invalid_coordinates(*latitude, *longitude)
            }
            CaptureError::TagReinsertion(msg) => CoreError::tag_reinsertion(msg.clone()),
            CaptureError::EncodingUnavailable(msg) => CoreError::encoding_unavailable(msg.clone()),
            _ => CoreError::new(code, err.to_string()),
        };
        core.with_source(err)
    }
}
