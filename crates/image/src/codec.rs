//! JPEG encode/decode for working images.

use crate::{ImageError, Result};
use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;

/// Quality used for every saved image.
pub const DEFAULT_JPEG_QUALITY: u8 = 98;

/// Decode an encoded image into pixels.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(data)?)
}

/// Encode pixels as baseline JPEG.
///
/// Alpha is flattened away first since JPEG cannot carry it.
///
/// # Arguments
/// * `img` - Pixels to encode
/// * `quality` - JPEG quality (1-100)
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ImageError::InvalidData(format!("JPEG quality out of range: {}", quality)));
    }

    let rgb = match img {
        DynamicImage::ImageRgb8(_) => img.clone(),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{detect_format, ImageFormat};
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_encode_flattens_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 128])));
        let bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(detect_format(&bytes).unwrap(), ImageFormat::Jpeg);

        let back = decode(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (8, 6));
    }

    #[test]
    fn test_quality_bounds() {
        let img = DynamicImage::new_rgb8(2, 2);
        assert!(encode_jpeg(&img, 0).is_err());
        assert!(encode_jpeg(&img, 101).is_err());
        assert!(encode_jpeg(&img, 1).is_ok());
    }
}
