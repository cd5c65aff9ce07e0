//! End-to-end checks across the image stages.

use chrono::NaiveDate;
use gdrcam_geo::LocationFix;
use gdrcam_image::overlay::annotate_at;
use gdrcam_image::{
    crop_to_aspect, encode_jpeg, read_tags, rotate_tagged, write_tags_at, AspectPolicy,
    ImageError, InspectionRecord, OrientationCode, OverlayStyle, RawFrame, RotationAngle,
    TaggedImage,
};
use image::{DynamicImage, Rgb, RgbImage};
use proptest::prelude::*;

fn frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

fn record() -> InspectionRecord {
    InspectionRecord {
        work_front: "Frente Norte".into(),
        coronation: "C-12".into(),
        activity_performed: String::new(),
        observation_category: "Seguridad".into(),
        location: Some(LocationFix::new(-33.4569, -70.6483, 1_760_000_000_000).with_accuracy(5.2)),
        timestamp: "14/10/2026, 09:05:03".into(),
    }
}

fn tagged(record: &InspectionRecord) -> TaggedImage {
    let now = NaiveDate::from_ymd_opt(2026, 10, 14)
        .unwrap()
        .and_hms_opt(9, 5, 3)
        .unwrap();
    let jpeg = encode_jpeg(&frame(320, 180), 90).unwrap();
    write_tags_at(&jpeg, record, now).unwrap()
}

#[test]
fn rotated_sensor_frame_becomes_upright_portrait() {
    let raw = RawFrame::new(frame(400, 300), OrientationCode::new(6));
    let upright = raw.into_upright();
    assert_eq!((upright.width(), upright.height()), (300, 400));

    let cropped = crop_to_aspect(upright, &AspectPolicy::default()).unwrap();
    assert_eq!((cropped.width(), cropped.height()), (225, 400));
}

#[test]
fn tag_round_trip_recovers_record() {
    let written = tagged(&record());
    let block = read_tags(written.bytes()).unwrap();

    let gps = block.gps.as_ref().unwrap();
    assert!((gps.latitude().unwrap() + 33.4569).abs() <= 1e-6);
    assert!((gps.longitude().unwrap() + 70.6483).abs() <= 1e-6);

    let comment = block.comment.unwrap().record().unwrap();
    assert_eq!(comment.work_front, "Frente Norte");
    assert_eq!(comment.coronation, "C-12");
    assert_eq!(comment.observation_category, "Seguridad");
    assert_eq!(comment.timestamp, "14/10/2026, 09:05:03");
    assert_eq!(block.date_time_original.as_deref(), Some("2026:10:14 09:05:03"));
}

#[test]
fn location_only_record_has_no_comment() {
    let rec = InspectionRecord::location_only(record().location, "14/10/2026, 09:05:03");
    let block = read_tags(tagged(&rec).bytes()).unwrap();
    assert!(block.comment.is_none());
    assert!(block.gps.is_some());
}

#[test]
fn four_quarter_turns_restore_dimensions_and_tags() {
    let base = tagged(&record());
    let mut angle = RotationAngle::ZERO;
    let mut current = base.clone();
    for _ in 0..4 {
        angle = angle.turned(90).unwrap();
        current = rotate_tagged(&base, angle, 98).unwrap();
    }
    assert_eq!((current.width(), current.height()), (base.width(), base.height()));
    assert_eq!(current.tags(), base.tags());
}

#[test]
fn overlay_keeps_tags() {
    let base = tagged(&record());
    let rotated = rotate_tagged(&base, RotationAngle::new(90).unwrap(), 98).unwrap();
    let now = NaiveDate::from_ymd_opt(2026, 10, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let annotated = annotate_at(&rotated, &OverlayStyle::default(), 98, now).unwrap();

    assert_eq!(annotated.tags(), base.tags());
    assert_eq!((annotated.width(), annotated.height()), (180, 320));
    assert_ne!(annotated.bytes(), rotated.bytes());
}

#[test]
fn coordinate_range_endpoints_are_accepted() {
    for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (90.0, -180.0), (-90.0, 180.0)] {
        let mut rec = record();
        rec.location = Some(LocationFix::new(lat, lon, 0).with_accuracy(3.0));
        let tagged = tagged(&rec);
        let gps = tagged.tags().gps.clone().unwrap();
        assert!((gps.latitude().unwrap() - lat).abs() <= 1e-6, "latitude {}", lat);
        assert!((gps.longitude().unwrap() - lon).abs() <= 1e-6, "longitude {}", lon);
    }
}

#[test]
fn coordinates_past_the_range_are_rejected() {
    let now = NaiveDate::from_ymd_opt(2026, 10, 14)
        .unwrap()
        .and_hms_opt(9, 5, 3)
        .unwrap();
    let jpeg = encode_jpeg(&frame(32, 18), 90).unwrap();
    for (lat, lon) in [(90.0001, 0.0), (-90.0001, 0.0), (0.0, 180.0001), (0.0, -180.0001), (f64::NAN, 0.0)] {
        let mut rec = record();
        rec.location = Some(LocationFix::new(lat, lon, 0));
        let err = write_tags_at(&jpeg, &rec, now).unwrap_err();
        assert!(matches!(err, ImageError::InvalidCoordinates { .. }), "({}, {})", lat, lon);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn coordinates_survive_tagging(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
        let mut rec = record();
        rec.location = Some(LocationFix::new(lat, lon, 0));
        let block = read_tags(tagged(&rec).bytes()).unwrap();
        let gps = block.gps.unwrap();
        prop_assert!((gps.latitude().unwrap() - lat).abs() <= 1e-6);
        prop_assert!((gps.longitude().unwrap() - lon).abs() <= 1e-6);
    }
}
