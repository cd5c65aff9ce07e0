//! Degree/minute/second encoding for embedded GPS coordinates.
//!
//! Coordinates are stored as three unsigned rationals plus a hemisphere
//! reference. Degrees and minutes are whole numbers over 1; seconds keep six
//! decimal places over [`RATIONAL_DENOMINATOR`].

use crate::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Denominator used for every fractional GPS rational.
pub const RATIONAL_DENOMINATOR: u32 = 1_000_000;

/// Unsigned rational as stored in a tag block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct URational {
    /// Numerator
    pub num: u32,
    /// Denominator
    pub denom: u32,
}

impl URational {
    /// Creates a rational from its parts.
    #[inline]
    pub const fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }

    /// Rounds a non-negative value onto `denom`, i.e. `round(value * denom) / denom`.
    ///
    /// Negative inputs clamp to zero; callers carry the sign in a reference tag.
    pub fn from_f64(value: f64, denom: u32) -> Self {
        let scaled = (value.max(0.0) * f64::from(denom)).round();
        let num = if scaled >= f64::from(u32::MAX) { u32::MAX } else { scaled as u32 };
        Self { num, denom }
    }

    /// Value as a float, `None` for a zero denominator.
    #[inline]
    pub fn to_f64(self) -> Option<f64> {
        (self.denom != 0).then(|| f64::from(self.num) / f64::from(self.denom))
    }
}

impl From<(u32, u32)> for URational {
    fn from((num, denom): (u32, u32)) -> Self {
        Self::new(num, denom)
    }
}

impl fmt::Display for URational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// Which coordinate a DMS triple encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsAxis {
    /// North/south
    Latitude,
    /// East/west
    Longitude,
}

/// Hemisphere reference stored next to a DMS triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    /// North
    N,
    /// South
    S,
    /// East
    E,
    /// West
    W,
}

impl Hemisphere {
    /// Reference for a signed decimal on the given axis. Zero is N or E.
    pub fn for_value(axis: GpsAxis, value: f64) -> Self {
        match (axis, value >= 0.0) {
            (GpsAxis::Latitude, true) => Hemisphere::N,
            (GpsAxis::Latitude, false) => Hemisphere::S,
            (GpsAxis::Longitude, true) => Hemisphere::E,
            (GpsAxis::Longitude, false) => Hemisphere::W,
        }
    }

    /// Parses a stored reference string.
    pub fn from_ref(reference: &str) -> Result<Self> {
        match reference.trim_end_matches('\0').trim() {
            "N" => Ok(Hemisphere::N),
            "S" => Ok(Hemisphere::S),
            "E" => Ok(Hemisphere::E),
            "W" => Ok(Hemisphere::W),
            other => Err(GeoError::InvalidHemisphere(other.to_string())),
        }
    }

    /// Single-letter reference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::N => "N",
            Hemisphere::S => "S",
            Hemisphere::E => "E",
            Hemisphere::W => "W",
        }
    }

    /// -1 for S and W, 1 otherwise.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Hemisphere::S | Hemisphere::W => -1.0,
            Hemisphere::N | Hemisphere::E => 1.0,
        }
    }

    /// Axis this reference belongs to.
    pub fn axis(&self) -> GpsAxis {
        match self {
            Hemisphere::N | Hemisphere::S => GpsAxis::Latitude,
            Hemisphere::E | Hemisphere::W => GpsAxis::Longitude,
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unsigned degrees, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmsTriple {
    /// Whole degrees over 1
    pub degrees: URational,
    /// Whole minutes over 1
    pub minutes: URational,
    /// Seconds over [`RATIONAL_DENOMINATOR`]
    pub seconds: URational,
}

impl DmsTriple {
    /// Splits the absolute value of a decimal coordinate.
    ///
    /// Recombining yields the input within 1e-6 degrees.
    pub fn from_decimal(value: f64) -> Self {
        let abs = value.abs();
        let degrees = abs.floor();
        let minutes_decimal = (abs - degrees) * 60.0;
        let minutes = minutes_decimal.floor();
        let seconds = (minutes_decimal - minutes) * 60.0;

        Self {
            degrees: URational::new(degrees as u32, 1),
            minutes: URational::new(minutes as u32, 1),
            seconds: URational::from_f64(seconds, RATIONAL_DENOMINATOR),
        }
    }

    /// Builds a triple from stored rationals; exactly three are required.
    pub fn from_rationals(values: &[URational]) -> Result<Self> {
        match values {
            [degrees, minutes, seconds] => Ok(Self {
                degrees: *degrees,
                minutes: *minutes,
                seconds: *seconds,
            }),
            other => Err(GeoError::InvalidDms(format!(
                "expected 3 rationals, found {}",
                other.len()
            ))),
        }
    }

    /// Unsigned decimal degrees: `deg + min/60 + sec/3600`.
    pub fn to_decimal(&self) -> f64 {
        self.try_to_decimal().unwrap_or(0.0)
    }

    /// Like [`to_decimal`](Self::to_decimal) but rejects zero denominators.
    pub fn try_to_decimal(&self) -> Result<f64> {
        let part = |r: URational, name: &str| {
            r.to_f64()
                .ok_or_else(|| GeoError::InvalidDms(format!("{} has a zero denominator", name)))
        };
        Ok(part(self.degrees, "degrees")?
            + part(self.minutes, "minutes")? / 60.0
            + part(self.seconds, "seconds")? / 3600.0)
    }

    /// Signed decimal degrees for the given reference.
    pub fn to_signed(&self, hemisphere: Hemisphere) -> Result<f64> {
        Ok(self.try_to_decimal()? * hemisphere.sign())
    }

    /// The three rationals in tag order.
    pub fn as_array(&self) -> [URational; 3] {
        [self.degrees, self.minutes, self.seconds]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_santiago_latitude() {
        let dms = DmsTriple::from_decimal(-33.4569);
        assert_eq!(dms.degrees, URational::new(33, 1));
        assert_eq!(dms.minutes, URational::new(27, 1));
        // 0.4569 * 60 = 27.414 -> 0.414 * 60 = 24.84 seconds
        assert_eq!(dms.seconds.denom, RATIONAL_DENOMINATOR);
        assert!((dms.seconds.to_f64().unwrap() - 24.84).abs() < 1e-6);

        let back = dms.to_signed(Hemisphere::S).unwrap();
        assert!((back - -33.4569).abs() < 1e-6);
    }

    #[test]
    fn test_hemisphere_for_value() {
        assert_eq!(Hemisphere::for_value(GpsAxis::Latitude, -0.5), Hemisphere::S);
        assert_eq!(Hemisphere::for_value(GpsAxis::Latitude, 0.0), Hemisphere::N);
        assert_eq!(Hemisphere::for_value(GpsAxis::Longitude, -70.0), Hemisphere::W);
        assert_eq!(Hemisphere::for_value(GpsAxis::Longitude, 12.0), Hemisphere::E);
    }

    #[test]
    fn test_hemisphere_from_ref() {
        assert_eq!(Hemisphere::from_ref("S\0").unwrap(), Hemisphere::S);
        assert_eq!(Hemisphere::from_ref("W").unwrap().axis(), GpsAxis::Longitude);
        assert!(Hemisphere::from_ref("X").is_err());
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let dms = DmsTriple {
            degrees: URational::new(10, 0),
            minutes: URational::new(0, 1),
            seconds: URational::new(0, 1),
        };
        assert!(dms.try_to_decimal().is_err());
    }

    #[test]
    fn test_from_rationals_requires_three() {
        let parts = [URational::new(1, 1), URational::new(2, 1)];
        assert!(DmsTriple::from_rationals(&parts).is_err());
    }

    #[test]
    fn test_rational_rounding() {
        assert_eq!(URational::from_f64(5.2, 100), URational::new(520, 100));
        assert_eq!(URational::from_f64(-3.0, 100), URational::new(0, 100));
    }

    proptest! {
        #[test]
        fn prop_latitude_round_trip(lat in -90.0f64..=90.0) {
            let dms = DmsTriple::from_decimal(lat);
            let hemi = Hemisphere::for_value(GpsAxis::Latitude, lat);
            let back = dms.to_signed(hemi).unwrap();
            prop_assert!((back - lat).abs() <= 1e-6, "{} -> {}", lat, back);
        }

        #[test]
        fn prop_longitude_round_trip(lon in -180.0f64..=180.0) {
            let dms = DmsTriple::from_decimal(lon);
            let hemi = Hemisphere::for_value(GpsAxis::Longitude, lon);
            let back = dms.to_signed(hemi).unwrap();
            prop_assert!((back - lon).abs() <= 1e-6, "{} -> {}", lon, back);
        }
    }
}
