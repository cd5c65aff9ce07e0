//! Moving TIFF payloads in and out of JPEG APP1 segments.

use crate::detect::require_jpeg;
use crate::{ImageError, Result};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};

fn parse(data: &[u8]) -> Result<Jpeg> {
    require_jpeg(data)?;
    Jpeg::from_bytes(Bytes::copy_from_slice(data))
        .map_err(|e| ImageError::InvalidData(format!("Failed to parse JPEG: {}", e)))
}

/// Raw TIFF payload of the image's tag block, if any.
pub(crate) fn extract_payload(data: &[u8]) -> Result<Option<Vec<u8>>> {
    let jpeg = parse(data)?;
    Ok(jpeg.exif().map(|b| b.to_vec()))
}

/// Replaces the image's tag block with `payload`.
pub(crate) fn insert_payload(data: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let mut jpeg = parse(data)?;
    jpeg.set_exif(Some(Bytes::copy_from_slice(payload)));

    let mut output = Vec::with_capacity(data.len() + payload.len());
    jpeg.encoder()
        .write_to(&mut output)
        .map_err(|e| ImageError::TagReinsertion(format!("Failed to write JPEG: {}", e)))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode_jpeg;
    use image::DynamicImage;

    #[test]
    fn test_insert_then_extract() {
        let jpeg = encode_jpeg(&DynamicImage::new_rgb8(16, 9), 90).unwrap();
        assert_eq!(extract_payload(&jpeg).unwrap(), None);

        let payload = vec![0x4D, 0x4D, 0x00, 0x2A, 0, 0, 0, 8];
        let tagged = insert_payload(&jpeg, &payload).unwrap();
        assert_eq!(extract_payload(&tagged).unwrap(), Some(payload.clone()));

        // second insert replaces the first
        let other = vec![0x4D, 0x4D, 0x00, 0x2A, 0, 0, 0, 9];
        let retagged = insert_payload(&tagged, &other).unwrap();
        assert_eq!(extract_payload(&retagged).unwrap(), Some(other));
    }

    #[test]
    fn test_non_jpeg_rejected() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert!(matches!(insert_payload(&png, &[]), Err(ImageError::UnsupportedFormat(_))));
    }
}
