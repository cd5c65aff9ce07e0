//! Orientation-code correction for raw camera frames.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Camera orientation code as stored in the EXIF `Orientation` tag.
///
/// Codes outside `1..=8` are kept but treated as identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OrientationCode(u16);

impl OrientationCode {
    /// Upright frame, no transform.
    pub const NORMAL: Self = Self(1);

    /// Wraps a raw code, valid or not.
    #[inline]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Reads the orientation code from an encoded image.
    ///
    /// Returns [`OrientationCode::NORMAL`] when the image carries no tag
    /// block or no orientation tag.
    pub fn from_encoded(data: &[u8]) -> Self {
        let mut cursor = Cursor::new(data);
        let Ok(exif) = exif::Reader::new().read_from_container(&mut cursor) else {
            return Self::NORMAL;
        };

        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .and_then(|v| u16::try_from(v).ok())
            .map(Self)
            .unwrap_or(Self::NORMAL)
    }

    /// Raw numeric code.
    #[inline]
    pub fn value(&self) -> u16 {
        self.0
    }

    /// True for the codes that have a defined transform.
    pub fn is_known(&self) -> bool {
        (1..=8).contains(&self.0)
    }

    /// True when correcting swaps width and height (codes 5-8).
    pub fn swaps_dimensions(&self) -> bool {
        (5..=8).contains(&self.0)
    }
}

impl Default for OrientationCode {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<u16> for OrientationCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Produces an upright image from a frame and its orientation code.
///
/// Codes 1 and unknown codes return the image unchanged.
pub fn correct_orientation(image: DynamicImage, orientation: OrientationCode) -> DynamicImage {
    debug!(orientation = orientation.value(), "Correcting orientation");
    match orientation.value() {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// 3x2 frame with a red marker at the top-left pixel.
    fn marked_frame() -> DynamicImage {
        let mut img = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    fn marker_position(img: &DynamicImage) -> (u32, u32) {
        let rgb = img.to_rgb8();
        let (x, y, _) = rgb
            .enumerate_pixels()
            .find(|(_, _, p)| p.0 == [255, 0, 0])
            .unwrap();
        (x, y)
    }

    #[test]
    fn test_identity_codes() {
        for code in [1, 0, 9, 42] {
            let out = correct_orientation(marked_frame(), OrientationCode::new(code));
            assert_eq!((out.width(), out.height()), (3, 2));
            assert_eq!(marker_position(&out), (0, 0));
        }
    }

    #[test]
    fn test_code_6_rotates_clockwise() {
        let out = correct_orientation(marked_frame(), OrientationCode::new(6));
        assert_eq!((out.width(), out.height()), (2, 3));
        assert_eq!(marker_position(&out), (1, 0));
    }

    #[test]
    fn test_code_8_rotates_counter_clockwise() {
        let out = correct_orientation(marked_frame(), OrientationCode::new(8));
        assert_eq!((out.width(), out.height()), (2, 3));
        assert_eq!(marker_position(&out), (0, 2));
    }

    #[test]
    fn test_mirrored_codes() {
        assert_eq!(marker_position(&correct_orientation(marked_frame(), 2.into())), (2, 0));
        assert_eq!(marker_position(&correct_orientation(marked_frame(), 3.into())), (2, 1));
        assert_eq!(marker_position(&correct_orientation(marked_frame(), 4.into())), (0, 1));
        // transpose
        assert_eq!(marker_position(&correct_orientation(marked_frame(), 5.into())), (0, 0));
        // transverse
        assert_eq!(marker_position(&correct_orientation(marked_frame(), 7.into())), (1, 2));
    }

    #[test]
    fn test_swaps_dimensions() {
        assert!(!OrientationCode::new(3).swaps_dimensions());
        assert!(OrientationCode::new(6).swaps_dimensions());
        assert!(!OrientationCode::new(12).is_known());
    }

    #[test]
    fn test_untagged_bytes_read_as_normal() {
        assert_eq!(OrientationCode::from_encoded(b"not an image"), OrientationCode::NORMAL);
    }
}
