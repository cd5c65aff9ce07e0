//! The `capture` subcommand: one full pipeline session over a file.

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use gdrcam_capture::{
    CaptureError, CapturePipeline, DirectorySink, FormFields, LocationWatch, PipelineSettings,
    SaveOutcome, StatusKind, StatusMessage,
};
use gdrcam_cli::output::Status;
use gdrcam_core::config::Config;
use gdrcam_core::error::exit_codes;
use gdrcam_core::Error as CoreError;
use gdrcam_geo::LocationFix;
use gdrcam_image::RawFrame;
use gdrcam_telemetry::metrics;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Raw frame to process
    pub path: PathBuf,

    /// Work front ("other" uses --work-front-other)
    #[arg(long, default_value = "")]
    pub work_front: String,

    /// Free-text work front
    #[arg(long, default_value = "")]
    pub work_front_other: String,

    /// Coronation
    #[arg(long, default_value = "")]
    pub coronation: String,

    /// Activity performed
    #[arg(long, default_value = "")]
    pub activity: String,

    /// Observation category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Fix latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Fix longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Horizontal accuracy in meters
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Altitude in meters
    #[arg(long, allow_negative_numbers = true)]
    pub altitude: Option<f64>,

    /// Heading in degrees from true north
    #[arg(long)]
    pub heading: Option<f64>,

    /// Ground speed in m/s
    #[arg(long)]
    pub speed: Option<f64>,

    /// Quarter turn applied after tagging; repeat to accumulate
    #[arg(long, allow_negative_numbers = true)]
    pub rotate: Vec<i32>,

    /// Tag location and time only, skipping the form
    #[arg(long)]
    pub no_form: bool,

    /// Output directory (overrides [output] output_dir)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl CaptureArgs {
    fn fix(&self) -> Option<LocationFix> {
        let (latitude, longitude) = (self.lat?, self.lon?);
        let mut fix = LocationFix::new(latitude, longitude, Utc::now().timestamp_millis());
        if let Some(accuracy) = self.accuracy {
            fix = fix.with_accuracy(accuracy);
        }
        if let Some(altitude) = self.altitude {
            fix = fix.with_altitude(altitude, None);
        }
        Some(fix.with_motion(self.heading, self.speed))
    }

    fn form(&self) -> FormFields {
        FormFields {
            work_front: self.work_front.clone(),
            work_front_other: self.work_front_other.clone(),
            coronation: self.coronation.clone(),
            activity_performed: self.activity.clone(),
            observation_category: self.category.clone(),
        }
    }
}

pub fn run(args: CaptureArgs, config: &Config) -> i32 {
    let settings = match PipelineSettings::from_config(&config.schema) {
        Ok(settings) => settings,
        Err(e) => {
            Status::error(&e.user_message());
            return exit_codes::CONFIG_ERROR;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            Status::error(&format!("Failed to start runtime: {}", e));
            return exit_codes::FAILURE;
        }
    };

    let mut pipeline = CapturePipeline::new(settings);
    let result = runtime.block_on(drive(&mut pipeline, &args, config));

    for status in pipeline.drain_status() {
        print_status(&status);
    }
    debug!(metrics = %metrics().export_json(), "Capture metrics");

    match result {
        Ok(_) => exit_codes::SUCCESS,
        // pipeline failures were already reported as status lines
        Err(e) => match e.downcast::<CaptureError>() {
            Ok(err) => {
                let code = exit_code(&err);
                if let Some(suggestion) = CoreError::from(err).suggestion {
                    Status::hint(&suggestion);
                }
                code
            }
            Err(other) => {
                Status::error(&format!("{:#}", other));
                exit_codes::FAILURE
            }
        },
    }
}

async fn drive(
    pipeline: &mut CapturePipeline,
    args: &CaptureArgs,
    config: &Config,
) -> anyhow::Result<SaveOutcome> {
    let data = std::fs::read(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let frame = RawFrame::decode(&data)
        .with_context(|| format!("Failed to decode {}", args.path.display()))?;

    if let Some(fix) = args.fix() {
        let (tx, watch) = LocationWatch::channel(1, pipeline.settings().fix_timeouts);
        let mut updates = watch.subscribe();
        tx.send(fix).await.context("Location watch closed")?;
        updates
            .wait_for(|best| best.get().is_some())
            .await
            .context("Location watch closed")?;
        pipeline.attach_location(watch);
    }

    pipeline.capture(frame).await?;

    if args.no_form {
        pipeline.save_without_form().await?;
    } else {
        pipeline.open_form()?;
        pipeline.commit(args.form()).await?;
    }

    for delta in &args.rotate {
        pipeline.rotate(*delta).await?;
    }

    let dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.schema.output.output_dir));
    let outcome = pipeline.save(&DirectorySink::new(dir)).await?;
    info!(outcome = ?outcome, "Capture finished");
    Ok(outcome)
}

fn print_status(status: &StatusMessage) {
    match status.kind {
        StatusKind::Success => Status::success(&status.text),
        StatusKind::Error => Status::error(&status.text),
        StatusKind::Info => Status::info(&status.text),
    }
}

fn exit_code(err: &CaptureError) -> i32 {
    match err {
        CaptureError::MissingFormField(_) => exit_codes::VALIDATION_ERROR,
        CaptureError::InvalidCoordinates { .. }
        | CaptureError::TagReinsertion(_)
        | CaptureError::EncodingUnavailable(_) => exit_codes::TAG_ERROR,
        _ => exit_codes::FAILURE,
    }
}
