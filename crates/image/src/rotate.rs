//! User-requested quarter-turn rotation of tagged images.

use crate::{codec, ImageError, Result, TaggedImage};
use image::DynamicImage;
use tracing::debug;

/// Cumulative user rotation, normalised to `0..360` in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationAngle(u16);

impl RotationAngle {
    /// No rotation.
    pub const ZERO: Self = Self(0);

    /// Normalises any multiple of 90 degrees, negative values included.
    ///
    /// # Errors
    /// [`ImageError::InvalidRotation`] for angles that are not quarter turns.
    pub fn new(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(ImageError::InvalidRotation(degrees));
        }
        Ok(Self(degrees.rem_euclid(360) as u16))
    }

    /// Degrees clockwise, one of 0, 90, 180, 270.
    pub fn degrees(&self) -> u16 {
        self.0
    }

    /// Adds a delta, wrapping around.
    pub fn turned(self, delta: i32) -> Result<Self> {
        Self::new(i32::from(self.0) + RotationAngle::new(delta)?.0 as i32)
    }

    /// True for 90 and 270.
    pub fn swaps_dimensions(&self) -> bool {
        self.0 % 180 == 90
    }
}

/// Rotates pixels clockwise by the given angle.
pub fn rotate_pixels(image: &DynamicImage, angle: RotationAngle) -> DynamicImage {
    match angle.degrees() {
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        _ => image.clone(),
    }
}

/// Rotates a tagged image and carries its tag block over unchanged.
///
/// Callers keep the unrotated base and pass the cumulative angle so repeated
/// rotations never compound JPEG loss.
///
/// # Errors
/// [`ImageError::TagReinsertion`] when the block cannot be carried over.
pub fn rotate_tagged(base: &TaggedImage, angle: RotationAngle, quality: u8) -> Result<TaggedImage> {
    if angle == RotationAngle::ZERO {
        return Ok(base.clone());
    }

    let pixels = codec::decode(base.bytes())?;
    let rotated = rotate_pixels(&pixels, angle);
    debug!(angle = angle.degrees(), width = rotated.width(), height = rotated.height(), "Rotated");

    let encoded = codec::encode_jpeg(&rotated, quality)?;
    base.reattach(&encoded)
}
