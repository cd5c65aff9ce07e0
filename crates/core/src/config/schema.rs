//! Configuration schema definitions
//!
//! Every section deserialises with defaults, so a partial file is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Pixel pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Burned-in annotation settings
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Location watch settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Saved files settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let quality = self.pipeline.jpeg_quality;
        if !(1..=100).contains(&quality) {
            return Err(Error::config_invalid(format!(
                "pipeline.jpeg_quality must be within 1..=100, got {}",
                quality
            )));
        }
        if !(self.pipeline.crop_tolerance > 0.0) {
            return Err(Error::config_invalid("pipeline.crop_tolerance must be positive"));
        }
        let [w, h] = self.pipeline.landscape_ratio;
        if w == 0 || h == 0 || w <= h {
            return Err(Error::config_invalid(
                "pipeline.landscape_ratio must be [wide, narrow] with both sides non-zero",
            ));
        }
        if !(self.overlay.text_height_ratio > 0.0 && self.overlay.text_height_ratio < 0.5) {
            return Err(Error::config_invalid("overlay.text_height_ratio must be in (0, 0.5)"));
        }
        if !(self.overlay.margin_ratio >= 0.0 && self.overlay.margin_ratio < 0.5) {
            return Err(Error::config_invalid("overlay.margin_ratio must be in [0, 0.5)"));
        }
        if self.location.fix_timeout_secs == 0 || self.location.initial_timeout_secs == 0 {
            return Err(Error::config_invalid("location timeouts must be at least one second"));
        }
        if self.output.filename_prefix.trim().is_empty() {
            return Err(Error::config_invalid("output.filename_prefix must not be empty"));
        }
        Ok(())
    }
}

/// Pixel pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// JPEG quality for every re-encode (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Aspect-ratio difference under which a frame is left uncropped
    #[serde(default = "default_crop_tolerance")]
    pub crop_tolerance: f64,

    /// Landscape target ratio; portrait frames use the inverse
    #[serde(default = "default_landscape_ratio")]
    pub landscape_ratio: [u32; 2],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            crop_tolerance: default_crop_tolerance(),
            landscape_ratio: default_landscape_ratio(),
        }
    }
}

fn default_jpeg_quality() -> u8 {
    98
}

fn default_crop_tolerance() -> f64 {
    0.01
}

fn default_landscape_ratio() -> [u32; 2] {
    [16, 9]
}

/// Visible annotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// RGBA text color
    #[serde(default = "default_text_color")]
    pub text_color: [u8; 4],

    /// RGBA shadow color drawn behind text
    #[serde(default = "default_shadow_color")]
    pub shadow_color: [u8; 4],

    /// Text line height as a fraction of image height
    #[serde(default = "default_text_height_ratio")]
    pub text_height_ratio: f32,

    /// Edge margin as a fraction of image height
    #[serde(default = "default_margin_ratio")]
    pub margin_ratio: f32,

    /// TrueType font; the built-in bitmap font is used when unset
    #[serde(default)]
    pub font_path: Option<String>,

    /// Draw the north indicator next to the location line
    #[serde(default = "default_true")]
    pub show_compass: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            text_color: default_text_color(),
            shadow_color: default_shadow_color(),
            text_height_ratio: default_text_height_ratio(),
            margin_ratio: default_margin_ratio(),
            font_path: None,
            show_compass: true,
        }
    }
}

fn default_text_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

fn default_shadow_color() -> [u8; 4] {
    [0, 0, 0, 200]
}

fn default_text_height_ratio() -> f32 {
    0.03
}

fn default_margin_ratio() -> f32 {
    0.02
}

fn default_true() -> bool {
    true
}

/// Location watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Timeout for the first fix
    #[serde(default = "default_initial_timeout")]
    pub initial_timeout_secs: u64,

    /// Timeout for each subsequent fix while watching
    #[serde(default = "default_fix_timeout")]
    pub fix_timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            initial_timeout_secs: default_initial_timeout(),
            fix_timeout_secs: default_fix_timeout(),
        }
    }
}

fn default_initial_timeout() -> u64 {
    20
}

fn default_fix_timeout() -> u64 {
    30
}

/// Save step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix of saved file names
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// Directory the default sink writes into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_filename_prefix() -> String {
    "gdr-cam".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigSchema::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let schema: ConfigSchema = toml::from_str("[pipeline]\njpeg_quality = 90\n").unwrap();
        assert_eq!(schema.pipeline.jpeg_quality, 90);
        assert_eq!(schema.pipeline.landscape_ratio, [16, 9]);
        assert_eq!(schema.output.filename_prefix, "gdr-cam");
        assert!(schema.overlay.show_compass);
    }

    #[test]
    fn test_rejects_zero_quality() {
        let mut schema = ConfigSchema::default();
        schema.pipeline.jpeg_quality = 0;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_rejects_portrait_landscape_ratio() {
        let mut schema = ConfigSchema::default();
        schema.pipeline.landscape_ratio = [9, 16];
        assert!(schema.validate().is_err());
    }
}
