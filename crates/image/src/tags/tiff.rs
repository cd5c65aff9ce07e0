//! TagBlock <-> TIFF-structured EXIF payload.
//!
//! The payload is the APP1 body without the `Exif\0\0` marker. It is written
//! big-endian.

use super::comment::{decode_user_comment, encode_user_comment};
use super::{GpsBlock, InspectionComment, TagBlock};
use crate::{ImageError, Result};
use exif::experimental::Writer;
use exif::{Context, Exif, Field, In, Rational, Tag, Value};
use gdrcam_geo::{DmsTriple, Hemisphere, URational};
use std::io::Cursor;
use tracing::{debug, warn};

/// GPSHPositioningError (Exif 2.31).
const GPS_H_POSITIONING_ERROR: Tag = Tag(Context::Gps, 0x1f);

fn rational(r: URational) -> Rational {
    Rational { num: r.num, denom: r.denom }
}

fn rationals(values: &[URational]) -> Value {
    Value::Rational(values.iter().copied().map(rational).collect())
}

fn ascii(text: &str) -> Value {
    Value::Ascii(vec![text.as_bytes().to_vec()])
}

fn field(tag: Tag, value: Value) -> Field {
    Field { tag, ifd_num: In::PRIMARY, value }
}

fn gps_fields(gps: &GpsBlock, out: &mut Vec<Field>) {
    if let Some(version) = gps.version {
        out.push(field(Tag::GPSVersionID, Value::Byte(version.to_vec())));
    }
    out.push(field(Tag::GPSLatitudeRef, ascii(gps.latitude_ref.as_str())));
    out.push(field(Tag::GPSLatitude, rationals(&gps.latitude.as_array())));
    out.push(field(Tag::GPSLongitudeRef, ascii(gps.longitude_ref.as_str())));
    out.push(field(Tag::GPSLongitude, rationals(&gps.longitude.as_array())));

    if let Some(alt_ref) = gps.altitude_ref {
        out.push(field(Tag::GPSAltitudeRef, Value::Byte(vec![alt_ref])));
    }
    if let Some(alt) = gps.altitude {
        out.push(field(Tag::GPSAltitude, rationals(&[alt])));
    }
    if let Some(time) = gps.time_stamp {
        out.push(field(Tag::GPSTimeStamp, rationals(&time)));
    }
    if let Some(dop) = gps.dop {
        out.push(field(Tag::GPSDOP, rationals(&[dop])));
    }
    if let Some(direction) = gps.img_direction {
        out.push(field(Tag::GPSImgDirectionRef, ascii("T")));
        out.push(field(Tag::GPSImgDirection, rationals(&[direction])));
    }
    if let Some(speed) = gps.speed {
        out.push(field(Tag::GPSSpeedRef, ascii("K")));
        out.push(field(Tag::GPSSpeed, rationals(&[speed])));
    }
    if let Some(date) = &gps.date_stamp {
        out.push(field(Tag::GPSDateStamp, ascii(date)));
    }
    if let Some(err) = gps.h_positioning_error {
        out.push(field(GPS_H_POSITIONING_ERROR, rationals(&[err])));
    }
}

/// Serialises a block into a TIFF payload.
pub(crate) fn encode_block(block: &TagBlock) -> Result<Vec<u8>> {
    let mut fields = Vec::new();

    if let Some(dt) = &block.date_time {
        fields.push(field(Tag::DateTime, ascii(dt)));
    }
    if let Some(dto) = &block.date_time_original {
        fields.push(field(Tag::DateTimeOriginal, ascii(dto)));
    }
    if let Some(comment) = &block.comment {
        fields.push(field(Tag::UserComment, Value::Undefined(encode_user_comment(comment.text()), 0)));
    }
    if let Some(gps) = &block.gps {
        gps_fields(gps, &mut fields);
    }

    if fields.is_empty() {
        return Err(ImageError::EncodingUnavailable("tag block has no fields".into()));
    }

    let mut writer = Writer::new();
    for f in &fields {
        writer.push_field(f);
    }

    let mut buffer = Cursor::new(Vec::new());
    writer
        .write(&mut buffer, false)
        .map_err(|e| ImageError::EncodingUnavailable(e.to_string()))?;

    let payload = buffer.into_inner();
    debug!(fields = fields.len(), bytes = payload.len(), "Encoded tag block");
    Ok(payload)
}

fn get<'a>(exif: &'a Exif, tag: Tag) -> Option<&'a Value> {
    exif.get_field(tag, In::PRIMARY).map(|f| &f.value)
}

fn get_ascii(exif: &Exif, tag: Tag) -> Option<String> {
    match get(exif, tag)? {
        Value::Ascii(parts) => parts
            .first()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string()),
        _ => None,
    }
}

fn get_rationals(exif: &Exif, tag: Tag) -> Option<Vec<URational>> {
    match get(exif, tag)? {
        Value::Rational(values) => Some(values.iter().map(|r| URational::new(r.num, r.denom)).collect()),
        _ => None,
    }
}

fn get_rational(exif: &Exif, tag: Tag) -> Option<URational> {
    get_rationals(exif, tag)?.first().copied()
}

fn get_byte(exif: &Exif, tag: Tag) -> Option<u8> {
    match get(exif, tag)? {
        Value::Byte(values) => values.first().copied(),
        other => other.get_uint(0).and_then(|v| u8::try_from(v).ok()),
    }
}

fn get_axis(exif: &Exif, ref_tag: Tag, value_tag: Tag) -> Option<(Hemisphere, DmsTriple)> {
    let reference = Hemisphere::from_ref(&get_ascii(exif, ref_tag)?).ok()?;
    let dms = DmsTriple::from_rationals(&get_rationals(exif, value_tag)?).ok()?;
    Some((reference, dms))
}

fn decode_gps(exif: &Exif) -> Option<GpsBlock> {
    let (latitude_ref, latitude) = get_axis(exif, Tag::GPSLatitudeRef, Tag::GPSLatitude)?;
    let (longitude_ref, longitude) = get_axis(exif, Tag::GPSLongitudeRef, Tag::GPSLongitude)?;

    let version = match get(exif, Tag::GPSVersionID) {
        Some(Value::Byte(v)) if v.len() == 4 => Some([v[0], v[1], v[2], v[3]]),
        _ => None,
    };

    let time_stamp = get_rationals(exif, Tag::GPSTimeStamp).and_then(|v| match v.as_slice() {
        [h, m, s] => Some([*h, *m, *s]),
        _ => None,
    });

    Some(GpsBlock {
        version,
        latitude_ref,
        latitude,
        longitude_ref,
        longitude,
        altitude_ref: get_byte(exif, Tag::GPSAltitudeRef),
        altitude: get_rational(exif, Tag::GPSAltitude),
        dop: get_rational(exif, Tag::GPSDOP),
        date_stamp: get_ascii(exif, Tag::GPSDateStamp),
        time_stamp,
        h_positioning_error: get_rational(exif, GPS_H_POSITIONING_ERROR),
        img_direction: get_rational(exif, Tag::GPSImgDirection),
        speed: get_rational(exif, Tag::GPSSpeed),
    })
}

/// Parses a TIFF payload. Unreadable payloads yield `None`.
pub(crate) fn decode_block(payload: &[u8]) -> Option<TagBlock> {
    let exif = match exif::Reader::new().read_raw(payload.to_vec()) {
        Ok(exif) => exif,
        Err(e) => {
            warn!(error = %e, "Unreadable tag block");
            return None;
        }
    };

    let comment = match get(&exif, Tag::UserComment) {
        Some(Value::Undefined(bytes, _)) => {
            decode_user_comment(bytes, exif.little_endian()).map(InspectionComment::from_text)
        }
        _ => None,
    };

    Some(TagBlock {
        comment,
        gps: decode_gps(&exif),
        date_time_original: get_ascii(&exif, Tag::DateTimeOriginal),
        date_time: get_ascii(&exif, Tag::DateTime),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::InspectionRecord;
    use chrono::NaiveDate;
    use gdrcam_geo::LocationFix;

    fn block() -> TagBlock {
        let record = InspectionRecord {
            work_front: "Frente Sur".into(),
            coronation: "C-7".into(),
            activity_performed: "Hormigonado".into(),
            observation_category: "Calidad".into(),
            location: Some(
                LocationFix::new(-33.4569, -70.6483, 1_760_000_000_000)
                    .with_accuracy(5.2)
                    .with_altitude(540.0, Some(4.0))
                    .with_motion(Some(90.0), Some(1.5)),
            ),
            timestamp: "14/10/2026 09:05:03".into(),
        };
        let now = NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap();
        TagBlock::from_record(&record, now).unwrap()
    }

    #[test]
    fn test_payload_round_trip() {
        let original = block();
        let payload = encode_block(&original).unwrap();
        // big-endian TIFF header
        assert_eq!(&payload[..4], &[0x4D, 0x4D, 0x00, 0x2A]);

        let decoded = decode_block(&payload).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_empty_block_rejected() {
        assert!(matches!(
            encode_block(&TagBlock::default()),
            Err(ImageError::EncodingUnavailable(_))
        ));
    }

    #[test]
    fn test_garbage_payload() {
        assert!(decode_block(b"not a tiff payload").is_none());
    }
}
