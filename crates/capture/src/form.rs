//! Inspection form input.

use crate::{CaptureError, Result};
use gdrcam_geo::LocationFix;
use gdrcam_image::InspectionRecord;
use serde::{Deserialize, Serialize};

/// Work-front choice that switches to the free-text field.
pub const OTHER_WORK_FRONT: &str = "other";

/// Raw values from the inspection form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    /// Selected work front, or [`OTHER_WORK_FRONT`]
    pub work_front: String,
    /// Free text used when the selection is [`OTHER_WORK_FRONT`]
    #[serde(default)]
    pub work_front_other: String,
    /// Coronation
    pub coronation: String,
    /// Activity performed; optional
    #[serde(default)]
    pub activity_performed: String,
    /// Observation category
    pub observation_category: String,
}

impl FormFields {
    /// Work front after resolving the "other" choice.
    pub fn resolved_work_front(&self) -> &str {
        if self.work_front.trim().eq_ignore_ascii_case(OTHER_WORK_FRONT) {
            self.work_front_other.trim()
        } else {
            self.work_front.trim()
        }
    }

    /// Checks the required fields.
    ///
    /// # Errors
    /// [`CaptureError::MissingFormField`] naming the first empty one.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("work front", self.resolved_work_front()),
            ("coronation", self.coronation.trim()),
            ("observation category", self.observation_category.trim()),
        ];
        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(CaptureError::MissingFormField(*name)),
            None => Ok(()),
        }
    }

    /// Validated record for tag writing.
    pub fn into_record(self, location: Option<LocationFix>, timestamp: String) -> Result<InspectionRecord> {
        self.validate()?;
        Ok(InspectionRecord {
            work_front: self.resolved_work_front().to_string(),
            coronation: self.coronation.trim().to_string(),
            activity_performed: self.activity_performed.trim().to_string(),
            observation_category: self.observation_category.trim().to_string(),
            location,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormFields {
        FormFields {
            work_front: "Frente Norte".into(),
            coronation: "C-12".into(),
            observation_category: "Seguridad".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_into_record() {
        let record = form().into_record(None, "14/10/2026, 09:05:03".into()).unwrap();
        assert_eq!(record.work_front, "Frente Norte");
        assert!(record.activity_performed.is_empty());
        assert!(record.has_form_data());
    }

    #[test]
    fn test_missing_required_field() {
        let mut f = form();
        f.coronation = "   ".into();
        assert!(matches!(f.validate(), Err(CaptureError::MissingFormField("coronation"))));
    }

    #[test]
    fn test_other_work_front_uses_free_text() {
        let mut f = form();
        f.work_front = OTHER_WORK_FRONT.into();
        assert!(matches!(f.validate(), Err(CaptureError::MissingFormField("work front"))));

        f.work_front_other = " Acceso Poniente ".into();
        assert_eq!(f.resolved_work_front(), "Acceso Poniente");
        assert!(f.validate().is_ok());
    }
}
