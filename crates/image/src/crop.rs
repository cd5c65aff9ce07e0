//! Center-crop to the capture aspect ratio.
//!
//! Landscape and square frames are cropped to 16:9, portrait frames to 9:16.
//! Crop sizes truncate toward zero, so the result can be off by a pixel.

use crate::{ImageError, Result};
use image::DynamicImage;
use tracing::debug;

/// Aspect-ratio policy for the cropper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectPolicy {
    /// Landscape ratio as width:height; portrait uses the inverse
    pub landscape: (u32, u32),
    /// Frames whose ratio is within this distance of the target are left alone
    pub tolerance: f64,
}

impl Default for AspectPolicy {
    fn default() -> Self {
        Self {
            landscape: (16, 9),
            tolerance: 0.01,
        }
    }
}

impl AspectPolicy {
    /// Target ratio as an integer width:height pair for a frame of the given size.
    ///
    /// Strictly taller frames get the portrait ratio; square counts as landscape.
    pub fn target(&self, width: u32, height: u32) -> (u32, u32) {
        let (w, h) = self.landscape;
        if height > width { (h, w) } else { (w, h) }
    }

    /// Target width/height ratio for a frame of the given size.
    pub fn target_ratio(&self, width: u32, height: u32) -> f64 {
        let (w, h) = self.target(width, height);
        w as f64 / h as f64
    }
}

/// Pixel rectangle kept by a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Kept width
    pub width: u32,
    /// Kept height
    pub height: u32,
}

/// Computes the centered crop for a frame, or `None` if it already matches.
///
/// The cut dimension is truncated to whole pixels, so the window is within
/// one pixel of the exact ratio. The ratio tolerance itself is only met once
/// the cut side is about 180 px or more; smaller frames such as 204x200
/// (cropped to 204x114) miss it.
///
/// # Errors
/// Returns [`ImageError::Correction`] if the frame is too small to yield a
/// non-empty crop.
pub fn crop_window(width: u32, height: u32, policy: &AspectPolicy) -> Result<Option<CropWindow>> {
    if width == 0 || height == 0 {
        return Err(ImageError::Correction(format!("empty frame {}x{}", width, height)));
    }

    let (target_w, target_h) = policy.target(width, height);
    let target = target_w as f64 / target_h as f64;
    let actual = width as f64 / height as f64;

    if (actual - target).abs() < policy.tolerance {
        return Ok(None);
    }

    let window = if actual > target {
        // too wide: keep full height
        let crop_width = (height as u64 * target_w as u64 / target_h as u64) as u32;
        CropWindow {
            x: (width - crop_width.min(width)) / 2,
            y: 0,
            width: crop_width,
            height,
        }
    } else {
        // too tall: keep full width
        let crop_height = (width as u64 * target_h as u64 / target_w as u64) as u32;
        CropWindow {
            x: 0,
            y: (height - crop_height.min(height)) / 2,
            width,
            height: crop_height,
        }
    };

    if window.width == 0 || window.height == 0 {
        return Err(ImageError::Correction(format!(
            "frame {}x{} too small to crop",
            width, height
        )));
    }

    Ok(Some(window))
}

/// Center-crops an upright image to the policy's aspect ratio.
pub fn crop_to_aspect(image: DynamicImage, policy: &AspectPolicy) -> Result<DynamicImage> {
    match crop_window(image.width(), image.height(), policy)? {
        None => Ok(image),
        Some(w) => {
            debug!(
                from_width = image.width(),
                from_height = image.height(),
                width = w.width,
                height = w.height,
                "Cropping to aspect"
            );
            Ok(image.crop_imm(w.x, w.y, w.width, w.height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_landscape_4_3_crops_height() {
        let w = crop_window(4000, 3000, &AspectPolicy::default()).unwrap().unwrap();
        assert_eq!(w, CropWindow { x: 0, y: 375, width: 4000, height: 2250 });
    }

    #[test]
    fn test_portrait_3_4_crops_width() {
        let w = crop_window(3000, 4000, &AspectPolicy::default()).unwrap().unwrap();
        assert_eq!(w, CropWindow { x: 375, y: 0, width: 2250, height: 4000 });
    }

    #[test]
    fn test_already_16_9_untouched() {
        assert_eq!(crop_window(1920, 1080, &AspectPolicy::default()).unwrap(), None);
        assert_eq!(crop_window(1080, 1920, &AspectPolicy::default()).unwrap(), None);
    }

    #[test]
    fn test_square_is_landscape() {
        let w = crop_window(1000, 1000, &AspectPolicy::default()).unwrap().unwrap();
        assert_eq!((w.width, w.height), (1000, 562));
        assert_eq!(w.y, 219);
    }

    #[test]
    fn test_ultrawide_crops_width() {
        let w = crop_window(3000, 1000, &AspectPolicy::default()).unwrap().unwrap();
        assert_eq!((w.width, w.height), (1777, 1000));
        assert_eq!(w.x, 611);
    }

    #[test]
    fn test_tiny_frame_fails() {
        assert!(crop_window(1, 1, &AspectPolicy::default()).is_err());
        assert!(crop_window(0, 10, &AspectPolicy::default()).is_err());
    }

    #[test]
    fn test_crop_to_aspect_pixels() {
        let img = DynamicImage::new_rgb8(400, 300);
        let out = crop_to_aspect(img, &AspectPolicy::default()).unwrap();
        assert_eq!((out.width(), out.height()), (400, 225));
    }

    #[test]
    fn test_small_frame_truncation_misses_tolerance() {
        let policy = AspectPolicy::default();
        let w = crop_window(204, 200, &policy).unwrap().unwrap();
        assert_eq!((w.width, w.height), (204, 114));
        let ratio = w.width as f64 / w.height as f64;
        assert!((ratio - 16.0 / 9.0).abs() > policy.tolerance);
    }

    proptest! {
        #[test]
        fn prop_crop_fits_and_matches(width in 2u32..6000, height in 2u32..6000) {
            let policy = AspectPolicy::default();
            let (target_w, target_h) = policy.target(width, height);
            let target = policy.target_ratio(width, height);
            match crop_window(width, height, &policy).unwrap() {
                None => {
                    let ratio = width as f64 / height as f64;
                    prop_assert!((ratio - target).abs() < policy.tolerance);
                }
                Some(w) => {
                    prop_assert!(w.x + w.width <= width);
                    prop_assert!(w.y + w.height <= height);
                    if w.height == height {
                        let exact = height as f64 * target_w as f64 / target_h as f64;
                        prop_assert!(exact - (w.width as f64) > -1e-9 && exact - (w.width as f64) < 1.0);
                    } else {
                        prop_assert_eq!(w.width, width);
                        let exact = width as f64 * target_h as f64 / target_w as f64;
                        prop_assert!(exact - (w.height as f64) > -1e-9 && exact - (w.height as f64) < 1.0);
                    }
                    if w.width.min(w.height) >= 180 {
                        let ratio = w.width as f64 / w.height as f64;
                        prop_assert!((ratio - target).abs() < policy.tolerance);
                    }
                }
            }
        }
    }
}
