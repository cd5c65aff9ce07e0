//! Core utilities for GDR-CAM
//!
//! This crate provides shared functionality used by the capture pipeline and its hosts:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use gdrcam_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! assert_eq!(config.schema.pipeline.jpeg_quality, 98);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
}
