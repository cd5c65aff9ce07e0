//! Capture session orchestration for GDR-CAM.
//!
//! A [`CapturePipeline`] walks one photo through
//! `Idle → FrameCaptured → FormPending → Tagged ⇄ Rotating → Saving → Idle`:
//!
//! 1. the raw frame is made upright and cropped (falling back to the
//!    uncropped frame if cropping fails)
//! 2. the location watch is stopped and its best fix frozen
//! 3. the tag block is written
//! 4. quarter turns are applied from the unrotated base
//! 5. the overlay is burned in and the bytes handed to a [`SaveSink`]
//!
//! Pixel work runs on the blocking pool. Each invocation carries the
//! session id it started under; results that come back after the session
//! was abandoned are discarded.

#![warn(missing_docs)]

mod error;
mod form;
mod location;
mod pipeline;
mod session;
mod settings;
mod sink;
mod state;
mod status;

pub use error::{CaptureError, CaptureErrorCode, Result};
pub use form::{FormFields, OTHER_WORK_FRONT};
pub use location::{FixTimeouts, LocationWatch};
pub use pipeline::{CapturePipeline, PendingCapture, PendingRotation};
pub use session::SessionId;
pub use settings::PipelineSettings;
pub use sink::{output_filename, DirectorySink, SaveOutcome, SaveSink};
pub use state::CaptureState;
pub use status::{StatusKind, StatusMessage, STATUS_TTL};

pub use gdrcam_image::{InspectionRecord, TaggedImage};
