//! Raw camera frames.

use crate::{correct_orientation, OrientationCode, Result};
use image::DynamicImage;

/// A frame as delivered by the camera: pixels plus the sensor orientation code.
#[derive(Debug, Clone)]
pub struct RawFrame {
    image: DynamicImage,
    orientation: OrientationCode,
}

impl RawFrame {
    /// Wraps already-decoded pixels.
    pub fn new(image: DynamicImage, orientation: OrientationCode) -> Self {
        Self { image, orientation }
    }

    /// Decodes an encoded still, taking the orientation from its tag block.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)?;
        let orientation = OrientationCode::from_encoded(data);
        Ok(Self { image, orientation })
    }

    /// Sensor orientation code.
    pub fn orientation(&self) -> OrientationCode {
        self.orientation
    }

    /// Width as stored, before correction.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height as stored, before correction.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Applies the orientation code, yielding upright pixels.
    pub fn into_upright(self) -> DynamicImage {
        correct_orientation(self.image, self.orientation)
    }

    /// Returns the pixels untouched.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}
