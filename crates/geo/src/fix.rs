//! Location fixes and best-fix selection.

use crate::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One reading from a geolocation source.
///
/// Serialises with the camelCase field names used in the embedded comment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Horizontal accuracy radius in meters
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Altitude in meters above sea level
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Altitude accuracy in meters
    #[serde(default)]
    pub altitude_accuracy: Option<f64>,
    /// Direction of travel in degrees clockwise from true north
    #[serde(default)]
    pub heading: Option<f64>,
    /// Ground speed in meters per second
    #[serde(default)]
    pub speed: Option<f64>,
    /// Fix time in epoch milliseconds
    pub timestamp: i64,
}

impl LocationFix {
    /// Fix with only the required fields set.
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
            timestamp,
        }
    }

    /// Builder-style accuracy setter.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Builder-style altitude setter.
    pub fn with_altitude(mut self, altitude: f64, altitude_accuracy: Option<f64>) -> Self {
        self.altitude = Some(altitude);
        self.altitude_accuracy = altitude_accuracy;
        self
    }

    /// Builder-style motion setter.
    pub fn with_motion(mut self, heading: Option<f64>, speed: Option<f64>) -> Self {
        self.heading = heading;
        self.speed = speed;
        self
    }

    /// Latitude/longitude pair.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// The most accurate fix observed so far.
///
/// The first fix is always taken; after that a fix replaces the current one
/// only when its accuracy is known and strictly smaller.
#[derive(Debug, Clone, Default)]
pub struct BestFix {
    best: Option<LocationFix>,
    observed: usize,
}

impl BestFix {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a fix; returns true when it became the best one.
    pub fn offer(&mut self, fix: LocationFix) -> bool {
        self.observed += 1;

        let improves = match (&self.best, fix.accuracy) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(current), Some(candidate)) => match current.accuracy {
                Some(existing) => candidate < existing,
                None => true,
            },
        };

        if improves {
            debug!(
                previous = ?self.best.and_then(|b| b.accuracy),
                accuracy = ?fix.accuracy,
                "Better location fix"
            );
            self.best = Some(fix);
        }
        improves
    }

    /// Current best fix.
    #[inline]
    pub fn get(&self) -> Option<&LocationFix> {
        self.best.as_ref()
    }

    /// Number of fixes offered so far.
    #[inline]
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Consumes the tracker, returning the best fix.
    pub fn into_inner(self) -> Option<LocationFix> {
        self.best
    }
}

impl FromIterator<LocationFix> for BestFix {
    fn from_iter<I: IntoIterator<Item = LocationFix>>(iter: I) -> Self {
        let mut best = BestFix::new();
        for fix in iter {
            best.offer(fix);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fix(accuracy: f64, ts: i64) -> LocationFix {
        LocationFix::new(-33.4569, -70.6483, ts).with_accuracy(accuracy)
    }

    #[test]
    fn test_smallest_accuracy_wins() {
        let best: BestFix = [12.0, 8.5, 20.0, 3.1]
            .iter()
            .enumerate()
            .map(|(i, a)| fix(*a, i as i64))
            .collect();

        assert_eq!(best.get().unwrap().accuracy, Some(3.1));
        assert_eq!(best.get().unwrap().timestamp, 3);
        assert_eq!(best.observed(), 4);
    }

    #[test]
    fn test_first_fix_always_taken() {
        let mut best = BestFix::new();
        assert!(best.offer(fix(500.0, 0)));
        assert!(!best.offer(fix(600.0, 1)));
        assert_eq!(best.get().unwrap().accuracy, Some(500.0));
    }

    #[test]
    fn test_first_fix_without_accuracy() {
        let mut best = BestFix::new();
        assert!(best.offer(LocationFix::new(1.0, 2.0, 0)));
        assert!(best.offer(fix(50.0, 1)));
        assert!(!best.offer(LocationFix::new(3.0, 4.0, 2)));
        assert_eq!(best.get().unwrap().accuracy, Some(50.0));
    }

    #[test]
    fn test_equal_accuracy_keeps_earlier() {
        let mut best = BestFix::new();
        best.offer(fix(5.0, 0));
        assert!(!best.offer(fix(5.0, 1)));
        assert_eq!(best.into_inner().unwrap().timestamp, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(
            LocationFix::new(1.0, 2.0, 3).with_altitude(10.0, Some(2.0)),
        )
        .unwrap();
        assert_eq!(json["altitudeAccuracy"], 2.0);
        assert!(json["heading"].is_null());
    }

    proptest! {
        #[test]
        fn prop_best_is_minimum(accuracies in proptest::collection::vec(0.1f64..1000.0, 1..40)) {
            let best: BestFix = accuracies
                .iter()
                .enumerate()
                .map(|(i, a)| fix(*a, i as i64))
                .collect();
            let min = accuracies.iter().cloned().fold(f64::INFINITY, f64::min);
            prop_assert_eq!(best.get().unwrap().accuracy, Some(min));
        }
    }
}
