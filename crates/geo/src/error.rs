//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// A DMS triple that cannot be recombined
    #[error("Invalid DMS value: {0}")]
    InvalidDms(String),

    /// Hemisphere reference other than N/S/E/W
    #[error("Invalid hemisphere reference: {0:?}")]
    InvalidHemisphere(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with gdrcam-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Invalid DMS triple
    InvalidDms = 10002,
    /// Invalid hemisphere reference
    InvalidHemisphere = 10003,
    /// JSON parsing error
    JsonParsing = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate { .. } => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidDms(_) => GeoErrorCode::InvalidDms,
            GeoError::InvalidHemisphere(_) => GeoErrorCode::InvalidHemisphere,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
