//! Header-level facts about an encoded image.

use crate::{crop_window, detect_format, read_tags, AspectPolicy, ImageFormat, OrientationCode, Result};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Image facts gathered without decoding pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Image width in pixels, as stored
    pub width: u32,
    /// Image height in pixels, as stored
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// File size in bytes
    pub size_bytes: usize,
    /// Camera orientation code
    pub orientation: OrientationCode,
    /// Carries a tag block this crate can read
    pub has_tags: bool,
    /// Carries a GPS block
    pub has_gps: bool,
}

impl ImageMetadata {
    /// Calculate aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Check if image is portrait orientation.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Width and height once the orientation code is applied.
    pub fn upright_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// True when the cropper would change the upright frame.
    pub fn needs_crop(&self, policy: &AspectPolicy) -> bool {
        let (w, h) = self.upright_dimensions();
        matches!(crop_window(w, h, policy), Ok(Some(_)))
    }
}

/// Pixel dimensions from the image header.
pub fn dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = image::io::Reader::new(Cursor::new(data)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Extract metadata from image data.
///
/// # Returns
/// `None` when the format is unknown or the header is unreadable
pub fn extract_metadata(data: &[u8]) -> Option<ImageMetadata> {
    let format = detect_format(data).ok()?;
    let (width, height) = dimensions(data).ok()?;
    let tags = if format.supports_tags() { read_tags(data) } else { None };

    Some(ImageMetadata {
        width,
        height,
        format,
        size_bytes: data.len(),
        orientation: OrientationCode::from_encoded(data),
        has_gps: tags.as_ref().is_some_and(|t| t.gps.is_some()),
        has_tags: tags.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode_jpeg;
    use image::DynamicImage;

    fn meta(width: u32, height: u32, orientation: u16) -> ImageMetadata {
        ImageMetadata {
            width,
            height,
            format: ImageFormat::Jpeg,
            size_bytes: 0,
            orientation: OrientationCode::new(orientation),
            has_tags: false,
            has_gps: false,
        }
    }

    #[test]
    fn test_aspect_ratio() {
        assert!((meta(1920, 1080, 1).aspect_ratio() - 16.0 / 9.0).abs() < 0.01);
        assert!(meta(1080, 1920, 1).is_portrait());
    }

    #[test]
    fn test_upright_dimensions() {
        assert_eq!(meta(4000, 3000, 6).upright_dimensions(), (3000, 4000));
        assert_eq!(meta(4000, 3000, 3).upright_dimensions(), (4000, 3000));
    }

    #[test]
    fn test_needs_crop() {
        let policy = AspectPolicy::default();
        assert!(!meta(1920, 1080, 1).needs_crop(&policy));
        assert!(!meta(1920, 1080, 8).needs_crop(&policy));
        assert!(meta(4000, 3000, 1).needs_crop(&policy));
    }

    #[test]
    fn test_extract_from_encoded() {
        let jpeg = encode_jpeg(&DynamicImage::new_rgb8(40, 30), 80).unwrap();
        let m = extract_metadata(&jpeg).unwrap();
        assert_eq!((m.width, m.height), (40, 30));
        assert_eq!(m.orientation, OrientationCode::NORMAL);
        assert!(!m.has_tags);
        assert!(extract_metadata(b"garbage!").is_none());
    }
}
