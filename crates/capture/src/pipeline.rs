//! The capture session state machine.

use crate::{
    output_filename, CaptureError, CaptureState, FormFields, LocationWatch, PipelineSettings,
    Result, SaveOutcome, SaveSink, SessionId, StatusMessage,
};
use chrono::{Local, Utc};
use gdrcam_geo::LocationFix;
use gdrcam_image::{
    annotate, crop_window, encode_jpeg, rotate_tagged, write_tags, InspectionRecord, RawFrame,
    RotationAngle, TaggedImage,
};
use gdrcam_telemetry::{metrics, Timer};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const RECORD_TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Upright working image produced from a raw frame.
#[derive(Debug)]
struct ProcessedFrame {
    jpeg: Vec<u8>,
    cropped: bool,
    crop_error: Option<String>,
}

/// A frame being processed on the blocking pool.
#[derive(Debug)]
pub struct PendingCapture {
    session: SessionId,
    handle: JoinHandle<Result<ProcessedFrame>>,
}

impl PendingCapture {
    /// Session the capture was started under.
    pub fn session(&self) -> SessionId {
        self.session
    }
}

/// A rotation being rendered on the blocking pool.
///
/// Dropping it abandons the rotation and the pipeline falls back to `Tagged`.
#[derive(Debug)]
pub struct PendingRotation {
    session: SessionId,
    angle: RotationAngle,
    handle: JoinHandle<Result<TaggedImage>>,
    _in_flight: Arc<()>,
}

impl PendingRotation {
    /// Session the rotation was started under.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Cumulative angle being rendered.
    pub fn angle(&self) -> RotationAngle {
        self.angle
    }
}

/// Transient state that lasts only while its token is alive.
#[derive(Debug)]
struct InFlight {
    token: Weak<()>,
    fallback: CaptureState,
}

impl InFlight {
    fn abandoned(&self) -> bool {
        self.token.strong_count() == 0
    }
}

/// Drives one capture at a time from shutter to save.
///
/// Failures push an error [`StatusMessage`] and leave the pipeline in the
/// last stable state with its last good image.
#[derive(Debug)]
pub struct CapturePipeline {
    settings: Arc<PipelineSettings>,
    state: CaptureState,
    session: SessionId,
    working: Option<Vec<u8>>,
    base: Option<TaggedImage>,
    current: Option<TaggedImage>,
    angle: RotationAngle,
    location: Option<LocationWatch>,
    frozen_fix: Option<Option<LocationFix>>,
    in_flight: Option<InFlight>,
    statuses: Vec<StatusMessage>,
}

impl CapturePipeline {
    /// Idle pipeline.
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            state: CaptureState::Idle,
            session: SessionId::new(),
            working: None,
            base: None,
            current: None,
            angle: RotationAngle::ZERO,
            location: None,
            frozen_fix: None,
            in_flight: None,
            statuses: Vec::new(),
        }
    }

    /// Current state.
    ///
    /// `Rotating` and `Saving` report the stable state they started from
    /// once their work has been dropped.
    pub fn state(&self) -> CaptureState {
        match &self.in_flight {
            Some(work) if work.abandoned() => work.fallback,
            _ => self.state,
        }
    }

    /// Current session.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Settings in use.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Cumulative user rotation of the current image.
    pub fn rotation(&self) -> RotationAngle {
        self.angle
    }

    /// Untagged working image, between capture and commit.
    pub fn working_image(&self) -> Option<&[u8]> {
        self.working.as_deref()
    }

    /// Latest tagged image, rotated as requested.
    pub fn tagged_image(&self) -> Option<&TaggedImage> {
        self.current.as_ref()
    }

    /// Best fix: live while the watch runs, frozen after commit.
    pub fn best_fix(&self) -> Option<LocationFix> {
        match &self.frozen_fix {
            Some(frozen) => *frozen,
            None => self.location.as_ref().and_then(LocationWatch::current),
        }
    }

    /// Takes the queued status messages.
    pub fn drain_status(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.statuses)
    }

    /// Attaches the location watch whose best fix will be frozen at commit.
    ///
    /// Replaces, and thereby ends, any previous watch.
    pub fn attach_location(&mut self, watch: LocationWatch) {
        self.location = Some(watch);
        self.frozen_fix = None;
    }

    fn status(&mut self, message: StatusMessage) {
        debug!(kind = ?message.kind, text = %message.text, "Status");
        self.statuses.push(message);
    }

    fn fail<T>(&mut self, err: CaptureError) -> Result<T> {
        if !matches!(err, CaptureError::StaleSession) {
            error!(session = %self.session, state = %self.state, error = %err, "Operation failed");
            self.status(StatusMessage::error(err.user_message()));
        }
        Err(err)
    }

    /// Returns to the fallback state of dropped in-flight work.
    fn settle(&mut self) {
        if let Some(work) = self.in_flight.take_if(|w| w.abandoned()) {
            warn!(
                session = %self.session,
                abandoned = %self.state,
                to = %work.fallback,
                "In-flight work dropped"
            );
            self.state = work.fallback;
        }
    }

    fn require(&mut self, allowed: &[CaptureState], action: &'static str) -> Result<()> {
        self.settle();
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(CaptureError::InvalidTransition { state: self.state, action })
        }
    }

    fn transition(&mut self, to: CaptureState) {
        info!(session = %self.session, from = %self.state, to = %to, "State transition");
        self.state = to;
    }

    /// Enters a transient state held for as long as the returned token lives.
    fn enter(&mut self, to: CaptureState) -> Arc<()> {
        let token = Arc::new(());
        self.in_flight = Some(InFlight { token: Arc::downgrade(&token), fallback: self.state });
        self.transition(to);
        token
    }

    /// Leaves a transient state for a stable one.
    fn leave(&mut self, to: CaptureState) {
        self.in_flight = None;
        self.transition(to);
    }

    /// Starts correcting and cropping a raw frame on the blocking pool.
    ///
    /// # Errors
    /// [`CaptureError::InvalidTransition`] unless idle.
    pub fn begin_capture(&mut self, frame: RawFrame) -> Result<PendingCapture> {
        if let Err(e) = self.require(&[CaptureState::Idle], "capture") {
            return self.fail(e);
        }

        let settings = Arc::clone(&self.settings);
        debug!(
            session = %self.session,
            width = frame.width(),
            height = frame.height(),
            orientation = frame.orientation().value(),
            "Processing frame"
        );
        let handle = tokio::task::spawn_blocking(move || process_frame(frame, &settings));
        Ok(PendingCapture { session: self.session, handle })
    }

    /// Applies a finished capture, moving to `FrameCaptured`.
    ///
    /// # Errors
    /// [`CaptureError::StaleSession`] when the session was abandoned meanwhile;
    /// nothing is changed and no status is queued.
    pub async fn complete_capture(&mut self, pending: PendingCapture) -> Result<()> {
        let result = pending.handle.await.map_err(CaptureError::from).and_then(|r| r);

        if pending.session != self.session {
            debug!(stale = %pending.session, current = %self.session, "Discarding stale capture");
            return Err(CaptureError::StaleSession);
        }
        if let Err(e) = self.require(&[CaptureState::Idle], "complete capture") {
            return self.fail(e);
        }

        let processed = match result {
            Ok(p) => p,
            Err(e) => return self.fail(e),
        };

        if let Some(reason) = &processed.crop_error {
            warn!(reason = %reason, "Crop skipped; keeping uncropped frame");
            self.status(StatusMessage::info("Photo captured without cropping"));
        } else {
            self.status(StatusMessage::success("Photo captured"));
        }
        debug!(cropped = processed.cropped, bytes = processed.jpeg.len(), "Working image ready");

        self.working = Some(processed.jpeg);
        metrics().increment("frames.captured");
        self.transition(CaptureState::FrameCaptured);
        Ok(())
    }

    /// Captures a frame: correction and crop, then `FrameCaptured`.
    pub async fn capture(&mut self, frame: RawFrame) -> Result<()> {
        let pending = self.begin_capture(frame)?;
        self.complete_capture(pending).await
    }

    /// Opens the inspection form.
    pub fn open_form(&mut self) -> Result<()> {
        if let Err(e) = self.require(&[CaptureState::FrameCaptured], "open the form") {
            return self.fail(e);
        }
        self.transition(CaptureState::FormPending);
        Ok(())
    }

    /// Stops the watch once and returns the frozen best fix.
    async fn freeze_location(&mut self) -> Option<LocationFix> {
        if let Some(frozen) = self.frozen_fix {
            return frozen;
        }
        let fix = match self.location.take() {
            Some(watch) => watch.stop().await.into_inner(),
            None => None,
        };
        info!(accuracy = ?fix.and_then(|f| f.accuracy), "Best fix frozen");
        self.frozen_fix = Some(fix);
        fix
    }

    /// Submits the inspection form and writes the tag block.
    ///
    /// # Errors
    /// - [`CaptureError::MissingFormField`] if a required field is empty
    /// - [`CaptureError::InvalidCoordinates`] if the frozen fix is out of range
    /// - [`CaptureError::EncodingUnavailable`] if the tag codec fails
    pub async fn commit(&mut self, form: FormFields) -> Result<&TaggedImage> {
        let allowed = [CaptureState::FrameCaptured, CaptureState::FormPending];
        if let Err(e) = self.require(&allowed, "submit the form") {
            return self.fail(e);
        }
        if let Err(e) = form.validate() {
            return self.fail(e);
        }

        let location = self.freeze_location().await;
        match form.into_record(location, local_timestamp()) {
            Ok(record) => self.write_record(record).await,
            Err(e) => self.fail(e),
        }
    }

    /// Writes a tag block with only location and time, skipping the form.
    pub async fn save_without_form(&mut self) -> Result<&TaggedImage> {
        let allowed = [CaptureState::FrameCaptured, CaptureState::FormPending];
        if let Err(e) = self.require(&allowed, "save without form") {
            return self.fail(e);
        }

        let location = self.freeze_location().await;
        let record = InspectionRecord::location_only(location, local_timestamp());
        self.write_record(record).await
    }

    async fn write_record(&mut self, record: InspectionRecord) -> Result<&TaggedImage> {
        let Some(working) = self.working.clone() else {
            return self.fail(CaptureError::InvalidTransition { state: self.state, action: "tag" });
        };

        let result = tokio::task::spawn_blocking(move || {
            let _timer = Timer::stage("tag_write");
            write_tags(&working, &record)
        })
        .await
        .map_err(CaptureError::from)
        .and_then(|r| r.map_err(CaptureError::from));

        match result {
            Ok(tagged) => {
                self.base = Some(tagged.clone());
                self.current = Some(tagged);
                self.angle = RotationAngle::ZERO;
                self.working = None;
                self.transition(CaptureState::Tagged);
                self.status(StatusMessage::success("Photo saved with metadata"));
                self.current
                    .as_ref()
                    .ok_or(CaptureError::InvalidTransition { state: self.state, action: "tag" })
            }
            // the state and working image are those the call started from
            Err(e) => self.fail(e),
        }
    }

    /// Starts rendering a quarter-turn rotation; the state becomes `Rotating`.
    ///
    /// The new image is always rendered from the unrotated base at the
    /// cumulative angle.
    pub fn begin_rotation(&mut self, delta_degrees: i32) -> Result<PendingRotation> {
        let quality = self.settings.jpeg_quality;
        self.begin_render(delta_degrees, move |base, angle| {
            let _timer = Timer::stage("rotate");
            rotate_tagged(&base, angle, quality).map_err(CaptureError::from)
        })
    }

    fn begin_render<F>(&mut self, delta_degrees: i32, render: F) -> Result<PendingRotation>
    where
        F: FnOnce(TaggedImage, RotationAngle) -> Result<TaggedImage> + Send + 'static,
    {
        if let Err(e) = self.require(&[CaptureState::Tagged], "rotate") {
            return self.fail(e);
        }
        let angle = match self.angle.turned(delta_degrees) {
            Ok(a) => a,
            Err(e) => return self.fail(e.into()),
        };
        let Some(base) = self.base.clone() else {
            return self.fail(CaptureError::InvalidTransition { state: self.state, action: "rotate" });
        };

        let handle = tokio::task::spawn_blocking(move || render(base, angle));
        let token = self.enter(CaptureState::Rotating);
        Ok(PendingRotation { session: self.session, angle, handle, _in_flight: token })
    }

    /// Applies a finished rotation and returns to `Tagged`.
    ///
    /// On failure the previous image and angle are kept.
    pub async fn complete_rotation(&mut self, pending: PendingRotation) -> Result<RotationAngle> {
        let result = pending.handle.await.map_err(CaptureError::from).and_then(|r| r);

        if pending.session != self.session {
            debug!(stale = %pending.session, "Discarding stale rotation");
            return Err(CaptureError::StaleSession);
        }
        if let Err(e) = self.require(&[CaptureState::Rotating], "complete rotation") {
            return self.fail(e);
        }

        self.leave(CaptureState::Tagged);
        match result {
            Ok(rotated) => {
                self.current = Some(rotated);
                self.angle = pending.angle;
                Ok(self.angle)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Rotates the tagged image by a multiple of 90 degrees.
    pub async fn rotate(&mut self, delta_degrees: i32) -> Result<RotationAngle> {
        let pending = self.begin_rotation(delta_degrees)?;
        self.complete_rotation(pending).await
    }

    /// Burns in the overlay and hands the result to `sink`.
    ///
    /// A completed or cancelled save returns to `Idle`; a failed one
    /// returns to `Tagged` with the image kept for retry, as does dropping
    /// the future before it finishes.
    pub async fn save(&mut self, sink: &dyn SaveSink) -> Result<SaveOutcome> {
        if let Err(e) = self.require(&[CaptureState::Tagged], "save") {
            return self.fail(e);
        }
        let Some(current) = self.current.clone() else {
            return self.fail(CaptureError::InvalidTransition { state: self.state, action: "save" });
        };

        let _in_flight = self.enter(CaptureState::Saving);
        let settings = Arc::clone(&self.settings);
        let rendered = tokio::task::spawn_blocking(move || {
            let _timer = Timer::stage("overlay");
            annotate(&current, &settings.overlay, settings.jpeg_quality)
        })
        .await
        .map_err(CaptureError::from)
        .and_then(|r| r.map_err(CaptureError::from));

        let annotated = match rendered {
            Ok(a) => a,
            Err(e) => {
                self.leave(CaptureState::Tagged);
                return self.fail(e);
            }
        };

        let filename = output_filename(&self.settings.filename_prefix, Utc::now());
        let outcome = {
            let _timer = Timer::stage("save");
            sink.save(&filename, annotated.bytes())
        };

        match outcome {
            Ok(SaveOutcome::Saved(path)) => {
                metrics().increment("captures.saved");
                self.status(StatusMessage::success(format!("Image saved: {}", path.display())));
                self.reset();
                Ok(SaveOutcome::Saved(path))
            }
            Ok(SaveOutcome::Cancelled) => {
                self.status(StatusMessage::info("Save cancelled"));
                self.reset();
                Ok(SaveOutcome::Cancelled)
            }
            Err(e) => {
                self.leave(CaptureState::Tagged);
                self.fail(e)
            }
        }
    }

    /// Abandons the current session from any state.
    ///
    /// Results of work still in flight for the old session are discarded.
    pub fn new_capture(&mut self) {
        self.settle();
        if self.state.holds_image() {
            self.status(StatusMessage::info("Ready for a new photo"));
        }
        self.reset();
    }

    fn reset(&mut self) {
        let previous = self.session;
        self.session = SessionId::new();
        self.working = None;
        self.base = None;
        self.current = None;
        self.angle = RotationAngle::ZERO;
        self.location = None;
        self.frozen_fix = None;
        self.in_flight = None;
        info!(previous = %previous, session = %self.session, "Session reset");
        self.transition(CaptureState::Idle);
    }
}

fn local_timestamp() -> String {
    Local::now().format(RECORD_TIME_FORMAT).to_string()
}

/// Orientation correction, crop and encode.
///
/// A crop failure keeps the upright uncropped frame.
fn process_frame(frame: RawFrame, settings: &PipelineSettings) -> Result<ProcessedFrame> {
    let upright = {
        let _timer = Timer::stage("orient");
        frame.into_upright()
    };

    let crop_timer = Timer::stage("crop");
    let (image, cropped, crop_error) =
        match crop_window(upright.width(), upright.height(), &settings.aspect) {
            Ok(Some(w)) => (upright.crop_imm(w.x, w.y, w.width, w.height), true, None),
            Ok(None) => (upright, false, None),
            Err(e) => (upright, false, Some(e.to_string())),
        };
    crop_timer.stop();

    gdrcam_telemetry::timed_stage!("encode");
    let jpeg = encode_jpeg(&image, settings.jpeg_quality)?;
    Ok(ProcessedFrame { jpeg, cropped, crop_error })
}
