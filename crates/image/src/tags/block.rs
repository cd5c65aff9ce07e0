//! Typed view of the embedded tag block.

use super::InspectionRecord;
use crate::{ImageError, Result};
use chrono::{Local, NaiveDateTime, TimeZone, Timelike};
use gdrcam_geo::{Coordinate, DmsTriple, GpsAxis, Hemisphere, LocationFix, URational, RATIONAL_DENOMINATOR};
use serde::{Deserialize, Serialize};

/// Format of DateTimeOriginal and DateTime.
pub const TAG_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// GPSVersionID written with every GPS block.
pub const GPS_VERSION: [u8; 4] = [2, 2, 0, 0];

/// Denominator for DOP, which keeps two decimals.
const DOP_DENOMINATOR: u32 = 100;

/// Every tag this crate writes, decoded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBlock {
    /// UserComment carrying the inspection record
    pub comment: Option<InspectionComment>,
    /// GPS IFD contents
    pub gps: Option<GpsBlock>,
    /// Authoritative "photo taken at" stamp
    pub date_time_original: Option<String>,
    /// IFD0 modification time
    pub date_time: Option<String>,
}

impl TagBlock {
    /// Builds the block for a record, stamping it with `now`.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidCoordinates`] when the record's location is
    /// out of range.
    pub fn from_record(record: &InspectionRecord, now: NaiveDateTime) -> Result<Self> {
        let gps = record.location.as_ref().map(GpsBlock::from_fix).transpose()?;

        let comment = if record.has_form_data() {
            Some(InspectionComment::from_record(record)?)
        } else {
            None
        };

        let stamp = now.format(TAG_DATETIME_FORMAT).to_string();
        Ok(Self {
            comment,
            gps,
            date_time_original: Some(stamp.clone()),
            date_time: Some(stamp),
        })
    }

    /// DateTimeOriginal, falling back to IFD0 DateTime.
    pub fn captured_at(&self) -> Option<&str> {
        self.date_time_original.as_deref().or(self.date_time.as_deref())
    }

    /// Parsed capture time, if the stored stamp is well formed.
    pub fn captured_at_parsed(&self) -> Option<NaiveDateTime> {
        self.captured_at()
            .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), TAG_DATETIME_FORMAT).ok())
    }
}

/// The UserComment text.
///
/// Holds raw text so that comments written by other tools survive a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionComment(String);

impl InspectionComment {
    /// JSON-serialises the record.
    pub fn from_record(record: &InspectionRecord) -> Result<Self> {
        serde_json::to_string(record)
            .map(Self)
            .map_err(|e| ImageError::EncodingUnavailable(format!("comment serialization: {}", e)))
    }

    /// Wraps comment text read from an image.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Raw comment text.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// The inspection record, when the comment is one of ours.
    pub fn record(&self) -> Option<InspectionRecord> {
        serde_json::from_str(&self.0).ok()
    }
}

/// GPS IFD values in their stored rational form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsBlock {
    /// GPSVersionID
    pub version: Option<[u8; 4]>,
    /// GPSLatitudeRef
    pub latitude_ref: Hemisphere,
    /// GPSLatitude
    pub latitude: DmsTriple,
    /// GPSLongitudeRef
    pub longitude_ref: Hemisphere,
    /// GPSLongitude
    pub longitude: DmsTriple,
    /// GPSAltitudeRef: 0 above sea level, 1 below
    pub altitude_ref: Option<u8>,
    /// GPSAltitude in meters
    pub altitude: Option<URational>,
    /// GPSDOP slot, holding horizontal accuracy in meters
    pub dop: Option<URational>,
    /// GPSDateStamp "YYYY:MM:DD"
    pub date_stamp: Option<String>,
    /// GPSTimeStamp hour, minute, second
    pub time_stamp: Option<[URational; 3]>,
    /// GPSHPositioningError, holding altitude accuracy in meters
    pub h_positioning_error: Option<URational>,
    /// GPSImgDirection in degrees from true north
    pub img_direction: Option<URational>,
    /// GPSSpeed in km/h
    pub speed: Option<URational>,
}

impl GpsBlock {
    /// Converts a fix to its stored form.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidCoordinates`] for out-of-range fixes.
    pub fn from_fix(fix: &LocationFix) -> Result<Self> {
        let coordinate = fix.coordinate();
        if !coordinate.is_valid() {
            return Err(ImageError::InvalidCoordinates {
                latitude: fix.latitude,
                longitude: fix.longitude,
            });
        }

        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        let micro = |v: f64| URational::from_f64(v, RATIONAL_DENOMINATOR);

        let (date_stamp, time_stamp) = match Local.timestamp_millis_opt(fix.timestamp).single() {
            Some(t) => (
                Some(t.format("%Y:%m:%d").to_string()),
                Some([
                    URational::new(t.hour(), 1),
                    URational::new(t.minute(), 1),
                    URational::new(t.second(), 1),
                ]),
            ),
            None => (None, None),
        };

        let altitude = finite(fix.altitude);

        Ok(Self {
            version: Some(GPS_VERSION),
            latitude_ref: Hemisphere::for_value(GpsAxis::Latitude, fix.latitude),
            latitude: DmsTriple::from_decimal(fix.latitude),
            longitude_ref: Hemisphere::for_value(GpsAxis::Longitude, fix.longitude),
            longitude: DmsTriple::from_decimal(fix.longitude),
            altitude_ref: altitude.map(|a| u8::from(a < 0.0)),
            altitude: altitude.map(|a| micro(a.abs())),
            dop: finite(fix.accuracy).map(|a| URational::from_f64(a, DOP_DENOMINATOR)),
            date_stamp,
            time_stamp,
            h_positioning_error: finite(fix.altitude_accuracy).map(micro),
            img_direction: finite(fix.heading).filter(|h| (0.0..=360.0).contains(h)).map(micro),
            speed: finite(fix.speed).filter(|s| *s >= 0.0).map(|s| micro(s * 3.6)),
        })
    }

    /// Signed decimal latitude.
    pub fn latitude(&self) -> Option<f64> {
        self.latitude.to_signed(self.latitude_ref).ok()
    }

    /// Signed decimal longitude.
    pub fn longitude(&self) -> Option<f64> {
        self.longitude.to_signed(self.longitude_ref).ok()
    }

    /// Recombined coordinate.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude()?, self.longitude()?))
    }

    /// Signed altitude in meters.
    pub fn altitude(&self) -> Option<f64> {
        let value = self.altitude?.to_f64()?;
        Some(if self.altitude_ref == Some(1) { -value } else { value })
    }

    /// Horizontal accuracy in meters.
    pub fn accuracy(&self) -> Option<f64> {
        self.dop?.to_f64()
    }

    /// Altitude accuracy in meters.
    pub fn altitude_accuracy(&self) -> Option<f64> {
        self.h_positioning_error?.to_f64()
    }

    /// Heading in degrees from true north.
    pub fn heading(&self) -> Option<f64> {
        self.img_direction?.to_f64()
    }

    /// Ground speed in km/h.
    pub fn speed_kmh(&self) -> Option<f64> {
        self.speed?.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap()
    }

    fn santiago() -> LocationFix {
        LocationFix::new(-33.4569, -70.6483, 1_760_000_000_000).with_accuracy(5.2)
    }

    #[test]
    fn test_gps_block_from_fix() {
        let gps = GpsBlock::from_fix(&santiago()).unwrap();
        assert_eq!(gps.latitude_ref, Hemisphere::S);
        assert_eq!(gps.longitude_ref, Hemisphere::W);
        assert_eq!(gps.dop, Some(URational::new(520, 100)));
        assert!((gps.latitude().unwrap() + 33.4569).abs() < 1e-6);
        assert!((gps.longitude().unwrap() + 70.6483).abs() < 1e-6);
        assert_eq!(gps.accuracy(), Some(5.2));
        assert!(gps.altitude.is_none());
        assert!(gps.date_stamp.is_some());
    }

    #[test]
    fn test_optional_fields() {
        let fix = santiago()
            .with_altitude(-12.5, Some(3.0))
            .with_motion(Some(400.0), Some(10.0));
        let gps = GpsBlock::from_fix(&fix).unwrap();
        assert_eq!(gps.altitude_ref, Some(1));
        assert_eq!(gps.altitude(), Some(-12.5));
        assert_eq!(gps.altitude_accuracy(), Some(3.0));
        // heading outside 0..=360 is dropped
        assert!(gps.img_direction.is_none());
        assert_eq!(gps.speed_kmh(), Some(36.0));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let fix = LocationFix::new(95.0, 0.0, 0);
        assert!(matches!(
            GpsBlock::from_fix(&fix),
            Err(ImageError::InvalidCoordinates { latitude, .. }) if latitude == 95.0
        ));
    }

    #[test]
    fn test_comment_omitted_without_form_data() {
        let record = InspectionRecord::location_only(Some(santiago()), "14/10/2026 09:05:03");
        let block = TagBlock::from_record(&record, now()).unwrap();
        assert!(block.comment.is_none());
        assert!(block.gps.is_some());
        assert_eq!(block.date_time_original.as_deref(), Some("2026:10:14 09:05:03"));
    }

    #[test]
    fn test_comment_carries_record() {
        let record = InspectionRecord {
            work_front: "Frente Norte".into(),
            coronation: "C-12".into(),
            observation_category: "Seguridad".into(),
            location: Some(santiago()),
            timestamp: "14/10/2026 09:05:03".into(),
            ..Default::default()
        };
        let block = TagBlock::from_record(&record, now()).unwrap();
        assert_eq!(block.comment.as_ref().unwrap().record().unwrap(), record);
        assert_eq!(block.captured_at_parsed(), Some(now()));
    }
}
