//! Capture session states.

use std::fmt;

/// Where a capture session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// Waiting for the shutter
    #[default]
    Idle,
    /// Upright, cropped working image available
    FrameCaptured,
    /// Inspection form is open; the location watch keeps running
    FormPending,
    /// Tagged image available
    Tagged,
    /// A rotation is in flight
    Rotating,
    /// Overlay and save in flight
    Saving,
}

impl CaptureState {
    /// States the pipeline may be left in between operations.
    pub fn is_stable(&self) -> bool {
        !matches!(self, CaptureState::Rotating | CaptureState::Saving)
    }

    /// True while a working or tagged image is held.
    pub fn holds_image(&self) -> bool {
        !matches!(self, CaptureState::Idle)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureState::Idle => "idle",
            CaptureState::FrameCaptured => "frame_captured",
            CaptureState::FormPending => "form_pending",
            CaptureState::Tagged => "tagged",
            CaptureState::Rotating => "rotating",
            CaptureState::Saving => "saving",
        };
        f.write_str(name)
    }
}
