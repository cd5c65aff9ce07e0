//! Burns the visible location/timestamp annotation into a tagged image.
//!
//! Everything drawn is derived from the stored tags, so an image reopened
//! later renders the same overlay without its inspection record.

mod compass;
mod font;

pub use font::OverlayFont;
pub use image::Rgba;

use crate::tags::TagBlock;
use crate::{codec, Result, TaggedImage};
use chrono::{Local, NaiveDateTime};
use gdrcam_geo::format_location;
use image::DynamicImage;
use imageproc::drawing::{Blend, Canvas};
use tracing::debug;

/// Format of the burned-in timestamp.
pub const OVERLAY_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Visual parameters for the annotation.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Text and glyph colour
    pub text_color: Rgba<u8>,
    /// Drop-shadow colour
    pub shadow_color: Rgba<u8>,
    /// Text line height as a fraction of image height
    pub text_height_ratio: f32,
    /// Edge margin as a fraction of image height
    pub margin_ratio: f32,
    /// Draw the north indicator
    pub show_compass: bool,
    /// Face used for all text
    pub font: OverlayFont,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text_color: Rgba([255, 255, 255, 255]),
            shadow_color: Rgba([0, 0, 0, 200]),
            text_height_ratio: 0.03,
            margin_ratio: 0.02,
            show_compass: true,
            font: OverlayFont::Bitmap,
        }
    }
}

/// Text content of the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    /// Location label, absent when the image has no GPS block
    pub location: Option<String>,
    /// Stored heading for the compass
    pub heading: Option<f64>,
    /// Formatted capture time
    pub timestamp: String,
}

impl OverlayText {
    /// Derives the overlay text from tags; `now` stands in for a missing capture time.
    pub fn from_tags(tags: &TagBlock, now: NaiveDateTime) -> Self {
        let location = tags.gps.as_ref().and_then(|gps| {
            let coordinate = gps.coordinate()?;
            Some(format_location(coordinate.latitude, coordinate.longitude, gps.accuracy()))
        });

        let timestamp = match (tags.captured_at_parsed(), tags.captured_at()) {
            (Some(parsed), _) => parsed.format(OVERLAY_TIME_FORMAT).to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => now.format(OVERLAY_TIME_FORMAT).to_string(),
        };

        Self {
            location,
            heading: tags.gps.as_ref().and_then(|g| g.heading()),
            timestamp,
        }
    }
}

/// Pixel placement of each overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    line_height: u32,
    shadow_offset: i32,
    timestamp: (i32, i32),
    location: Option<(i32, i32)>,
    compass: Option<(i32, i32, u32)>,
}

fn layout(width: u32, height: u32, text: &OverlayText, style: &OverlayStyle) -> Layout {
    let line_height = ((height as f32 * style.text_height_ratio).round() as u32).max(7);
    let margin = (height as f32 * style.margin_ratio).round() as i32;
    let shadow_offset = (line_height as i32 / 14).max(1);

    let (ts_width, _) = style.font.measure(&text.timestamp, line_height);
    let ts_y = height as i32 - margin - line_height as i32;
    let timestamp = (width as i32 - margin - ts_width as i32, ts_y);

    let mut location = None;
    let mut compass = None;
    if let Some(label) = &text.location {
        let (label_width, _) = style.font.measure(label, line_height);
        let compass_size = if style.show_compass { line_height * 2 } else { 0 };
        let gap = if style.show_compass { line_height / 2 } else { 0 };
        let total = (compass_size + gap + label_width) as i32;

        let x0 = (width as i32 - total) / 2;
        let label_y = ts_y - (line_height as i32 * 3) / 2;
        if style.show_compass {
            compass = Some((x0, label_y + line_height as i32 - compass_size as i32, compass_size));
        }
        location = Some((x0 + (compass_size + gap) as i32, label_y));
    }

    Layout { line_height, shadow_offset, timestamp, location, compass }
}

fn draw_overlay<C>(canvas: &mut C, text: &OverlayText, style: &OverlayStyle)
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    let (width, height) = canvas.dimensions();
    let l = layout(width, height, text, style);
    let font = &style.font;

    for (color, offset) in [(style.shadow_color, l.shadow_offset), (style.text_color, 0)] {
        let (tx, ty) = l.timestamp;
        font.draw(canvas, tx + offset, ty + offset, l.line_height, color, &text.timestamp);

        if let (Some((lx, ly)), Some(label)) = (l.location, &text.location) {
            font.draw(canvas, lx + offset, ly + offset, l.line_height, color, label);
        }
        if let Some((cx, cy, size)) = l.compass {
            compass::draw_compass(canvas, cx + offset, cy + offset, size, text.heading, font, color);
        }
    }
}

/// Renders the overlay onto a tagged image and carries its tags over.
///
/// # Errors
/// [`crate::ImageError::TagReinsertion`] when the tag block cannot be reapplied.
pub fn annotate(tagged: &TaggedImage, style: &OverlayStyle, quality: u8) -> Result<TaggedImage> {
    annotate_at(tagged, style, quality, Local::now().naive_local())
}

/// Like [`annotate`] with an explicit fallback time.
pub fn annotate_at(
    tagged: &TaggedImage,
    style: &OverlayStyle,
    quality: u8,
    now: NaiveDateTime,
) -> Result<TaggedImage> {
    let text = OverlayText::from_tags(tagged.tags(), now);
    debug!(location = ?text.location, timestamp = %text.timestamp, "Drawing overlay");

    let pixels = codec::decode(tagged.bytes())?;
    let mut canvas = Blend(pixels.to_rgba8());
    draw_overlay(&mut canvas, &text, style);

    let encoded = codec::encode_jpeg(&DynamicImage::ImageRgba8(canvas.0), quality)?;
    tagged.reattach(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::GpsBlock;
    use chrono::NaiveDate;
    use gdrcam_geo::LocationFix;
    use image::RgbaImage;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap()
    }

    fn gps_tags() -> TagBlock {
        let fix = LocationFix::new(-33.4569, -70.6483, 0).with_accuracy(5.2);
        TagBlock {
            gps: Some(GpsBlock::from_fix(&fix).unwrap()),
            date_time_original: Some("2026:10:13 18:30:00".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_from_tags() {
        let text = OverlayText::from_tags(&gps_tags(), now());
        assert_eq!(text.location.as_deref(), Some("33.456900° S, 70.648300° W (±5 m)"));
        assert_eq!(text.timestamp, "13/10/2026 18:30:00");
        assert_eq!(text.heading, None);
    }

    #[test]
    fn test_text_without_gps_or_time() {
        let text = OverlayText::from_tags(&TagBlock::default(), now());
        assert!(text.location.is_none());
        assert_eq!(text.timestamp, "14/10/2026 09:05:03");
    }

    #[test]
    fn test_text_falls_back_to_datetime() {
        let tags = TagBlock { date_time: Some("2026:01:02 03:04:05".into()), ..Default::default() };
        assert_eq!(OverlayText::from_tags(&tags, now()).timestamp, "02/01/2026 03:04:05");
    }

    #[test]
    fn test_layout_stays_in_frame() {
        let text = OverlayText::from_tags(&gps_tags(), now());
        let l = layout(1920, 1080, &text, &OverlayStyle::default());

        assert_eq!(l.line_height, 32);
        let (tx, ty) = l.timestamp;
        let (ts_width, _) = OverlayFont::Bitmap.measure(&text.timestamp, l.line_height);
        assert_eq!(tx + ts_width as i32, 1920 - 22);
        assert!(ty + l.line_height as i32 <= 1080);

        let (lx, ly) = l.location.unwrap();
        assert!(lx > 0 && ly < ty);
        let (cx, _, size) = l.compass.unwrap();
        assert!(cx < lx && size == 64);
    }

    #[test]
    fn test_timestamp_only_without_gps() {
        let text = OverlayText::from_tags(&TagBlock::default(), now());
        let l = layout(1920, 1080, &text, &OverlayStyle::default());
        assert!(l.location.is_none() && l.compass.is_none());
    }

    #[test]
    fn test_draw_changes_bottom_band_only() {
        let text = OverlayText::from_tags(&gps_tags(), now());
        let mut canvas = Blend(RgbaImage::from_pixel(640, 360, Rgba([40, 80, 120, 255])));
        draw_overlay(&mut canvas, &text, &OverlayStyle::default());

        let img = canvas.0;
        let top_untouched = (0..640).all(|x| img.get_pixel(x, 10).0 == [40, 80, 120, 255]);
        assert!(top_untouched);
        let bottom_touched = img.pixels().any(|p| p.0 == [255, 255, 255, 255]);
        assert!(bottom_touched);
    }
}
