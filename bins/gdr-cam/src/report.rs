//! The `metadata` subcommand.

use gdrcam_cli::output::{format_decimal, Status};
use gdrcam_core::error::exit_codes;
use gdrcam_core::Error as CoreError;
use gdrcam_geo::{format_location, DmsTriple};
use gdrcam_image::read_tags;
use gdrcam_image::tags::{GpsBlock, InspectionComment, TagBlock};
use std::path::Path;

pub fn run(path: &Path, json: bool) -> i32 {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Status::report(&CoreError::file_not_found(path));
            return exit_codes::FAILURE;
        }
        Err(e) => {
            Status::report(&CoreError::from(e).with_context(path.display().to_string()));
            return exit_codes::FAILURE;
        }
    };

    let Some(tags) = read_tags(&data) else {
        Status::warning("No embedded metadata found");
        return exit_codes::NO_METADATA;
    };

    if json {
        match serde_json::to_string_pretty(&to_json(&tags)) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                Status::error(&format!("JSON serialize error: {}", e));
                return exit_codes::FAILURE;
            }
        }
    } else {
        print_text(&tags);
    }
    exit_codes::SUCCESS
}

fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

fn to_json(tags: &TagBlock) -> serde_json::Value {
    let gps = tags.gps.as_ref();
    serde_json::json!({
        "form": tags.comment.as_ref().and_then(InspectionComment::record),
        "comment": tags.comment.as_ref().map(InspectionComment::text),
        "gps": gps,
        "latitude": gps.and_then(GpsBlock::latitude).map(round8),
        "longitude": gps.and_then(GpsBlock::longitude).map(round8),
        "capturedAt": tags.captured_at(),
    })
}

fn dms(triple: &DmsTriple) -> String {
    triple
        .as_array()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_text(tags: &TagBlock) {
    Status::header("Inspection");
    match tags.comment.as_ref() {
        Some(comment) => match comment.record() {
            Some(record) => {
                Status::field("Work front", &record.work_front);
                Status::field("Coronation", &record.coronation);
                Status::field("Activity performed", &record.activity_performed);
                Status::field("Observation category", &record.observation_category);
                Status::field("Recorded at", &record.timestamp);
            }
            None => Status::field("Comment", comment.text()),
        },
        None => Status::info("No inspection data"),
    }

    Status::header("Location");
    match tags.gps.as_ref() {
        Some(gps) => {
            Status::field("GPSLatitudeRef", gps.latitude_ref);
            Status::field("GPSLatitude", dms(&gps.latitude));
            Status::field("GPSLongitudeRef", gps.longitude_ref);
            Status::field("GPSLongitude", dms(&gps.longitude));
            Status::field("Latitude", format_decimal(gps.latitude()));
            Status::field("Longitude", format_decimal(gps.longitude()));
            if let Some(altitude) = gps.altitude() {
                Status::field("Altitude", format!("{:.1} m", altitude));
            }
            if let Some(heading) = gps.heading() {
                Status::field("Heading", format!("{:.1}°", heading));
            }
            if let Some(speed) = gps.speed_kmh() {
                Status::field("Speed", format!("{:.1} km/h", speed));
            }
            if let Some(coordinate) = gps.coordinate() {
                Status::field(
                    "Label",
                    format_location(coordinate.latitude, coordinate.longitude, gps.accuracy()),
                );
            }
        }
        None => Status::info("No GPS data"),
    }

    Status::header("Date");
    Status::field("Captured at", tags.captured_at().unwrap_or("-"));
}
