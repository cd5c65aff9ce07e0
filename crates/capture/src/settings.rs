//! Pipeline settings derived from configuration.

use crate::{FixTimeouts, Result};
use gdrcam_core::config::ConfigSchema;
use gdrcam_image::overlay::Rgba;
use gdrcam_image::{AspectPolicy, OverlayFont, OverlayStyle, DEFAULT_JPEG_QUALITY};
use std::path::Path;
use std::time::Duration;

/// Everything the pipeline needs from configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// JPEG quality for every re-encode
    pub jpeg_quality: u8,
    /// Crop target
    pub aspect: AspectPolicy,
    /// Overlay appearance
    pub overlay: OverlayStyle,
    /// Saved filename prefix
    pub filename_prefix: String,
    /// Bounds on the waits for location fixes
    pub fix_timeouts: FixTimeouts,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            aspect: AspectPolicy::default(),
            overlay: OverlayStyle::default(),
            filename_prefix: "gdr-cam".to_string(),
            fix_timeouts: FixTimeouts::default(),
        }
    }
}

impl PipelineSettings {
    /// Builds settings from a validated schema, loading the overlay font if one is configured.
    pub fn from_config(schema: &ConfigSchema) -> Result<Self> {
        let [ratio_w, ratio_h] = schema.pipeline.landscape_ratio;
        let font = match &schema.overlay.font_path {
            Some(path) => OverlayFont::from_file(Path::new(path))?,
            None => OverlayFont::Bitmap,
        };

        Ok(Self {
            jpeg_quality: schema.pipeline.jpeg_quality,
            aspect: AspectPolicy {
                landscape: (ratio_w, ratio_h),
                tolerance: schema.pipeline.crop_tolerance,
            },
            overlay: OverlayStyle {
                text_color: Rgba(schema.overlay.text_color),
                shadow_color: Rgba(schema.overlay.shadow_color),
                text_height_ratio: schema.overlay.text_height_ratio,
                margin_ratio: schema.overlay.margin_ratio,
                show_compass: schema.overlay.show_compass,
                font,
            },
            filename_prefix: schema.output.filename_prefix.clone(),
            fix_timeouts: FixTimeouts {
                initial: Duration::from_secs(schema.location.initial_timeout_secs),
                subsequent: Duration::from_secs(schema.location.fix_timeout_secs),
            },
        })
    }
}
