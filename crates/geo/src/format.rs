//! Human-readable location labels for the visible overlay.

use crate::{GpsAxis, Hemisphere};

/// Formats one axis as `"33.456900° S"`.
pub fn format_coordinate(axis: GpsAxis, value: f64) -> String {
    let hemisphere = Hemisphere::for_value(axis, value);
    format!("{:.6}° {}", value.abs(), hemisphere)
}

/// Formats `"33.456900° S, 70.648300° W (±5 m)"`.
///
/// Accuracy is rounded to whole meters and omitted when unknown.
pub fn format_location(latitude: f64, longitude: f64, accuracy: Option<f64>) -> String {
    let mut label = format!(
        "{}, {}",
        format_coordinate(GpsAxis::Latitude, latitude),
        format_coordinate(GpsAxis::Longitude, longitude)
    );
    if let Some(acc) = accuracy.filter(|a| a.is_finite()) {
        label.push_str(&format!(" (±{} m)", acc.round() as i64));
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location_southern_western() {
        assert_eq!(
            format_location(-33.4569, -70.6483, Some(5.2)),
            "33.456900° S, 70.648300° W (±5 m)"
        );
    }

    #[test]
    fn test_format_location_without_accuracy() {
        assert_eq!(format_location(48.8566, 2.3522, None), "48.856600° N, 2.352200° E");
    }
}
