//! The inspection record written into the comment tag.

use gdrcam_geo::LocationFix;
use serde::{Deserialize, Serialize};

/// Form data plus the frozen best fix, built once at tag-write time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    /// Work front the photo belongs to
    #[serde(default)]
    pub work_front: String,
    /// Coronation identifier
    #[serde(default)]
    pub coronation: String,
    /// Free-text activity description
    #[serde(default)]
    pub activity_performed: String,
    /// Observation category
    #[serde(default)]
    pub observation_category: String,
    /// Best fix at commit time
    #[serde(default)]
    pub location: Option<LocationFix>,
    /// Localized capture time
    #[serde(default)]
    pub timestamp: String,
}

impl InspectionRecord {
    /// Record carrying only location and time, as used by "save without form".
    pub fn location_only(location: Option<LocationFix>, timestamp: impl Into<String>) -> Self {
        Self {
            location,
            timestamp: timestamp.into(),
            ..Self::default()
        }
    }

    /// True when any of the four form fields is non-empty.
    ///
    /// Records without form data are written without a comment tag.
    pub fn has_form_data(&self) -> bool {
        [
            &self.work_front,
            &self.coronation,
            &self.activity_performed,
            &self.observation_category,
        ]
        .iter()
        .any(|field| !field.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_only_has_no_form_data() {
        let record = InspectionRecord::location_only(None, "14/10/2026, 09:05:03");
        assert!(!record.has_form_data());
    }

    #[test]
    fn test_any_field_counts() {
        let record = InspectionRecord {
            activity_performed: "Excavación".into(),
            ..Default::default()
        };
        assert!(record.has_form_data());
    }

    #[test]
    fn test_camel_case_json() {
        let record = InspectionRecord {
            work_front: "Frente 1".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["workFront"], "Frente 1");
        assert!(json["location"].is_null());
    }
}
