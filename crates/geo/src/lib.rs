//! Geolocation utilities for GDR-CAM.
//!
//! This crate provides:
//! - Coordinate validation
//! - Location fixes and best-fix selection by reported accuracy
//! - Degree/minute/second rational conversion for embedded GPS tags
//! - Human-readable location labels
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use gdrcam_geo::{Coordinate, DmsTriple};
//!
//! let santiago = Coordinate::new(-33.4569, -70.6483);
//! assert!(santiago.is_valid());
//!
//! let dms = DmsTriple::from_decimal(santiago.latitude);
//! assert!((dms.to_decimal() - 33.4569).abs() < 1e-6);
//! ```

mod dms;
mod error;
mod fix;
mod format;

#[cfg(feature = "wasm")]
mod wasm;

pub use dms::{DmsTriple, GpsAxis, Hemisphere, URational, RATIONAL_DENOMINATOR};
pub use error::{GeoError, GeoErrorCode, Result};
pub use fix::{BestFix, LocationFix};
pub use format::{format_coordinate, format_location};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    ///
    /// Both bounds are inclusive; NaN is never valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns the coordinate unchanged if valid, otherwise an error.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(-33.4569, -70.6483);
        assert_eq!(coord.latitude, -33.4569);
        assert_eq!(coord.longitude, -70.6483);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.0001, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.0001).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_validated_reports_values() {
        let err = Coordinate::new(91.0, 10.0).validated().unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
        assert!(err.to_string().contains("91"));
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (-33.4569, -70.6483).into();
        assert_eq!(coord.latitude, -33.4569);
    }
}
