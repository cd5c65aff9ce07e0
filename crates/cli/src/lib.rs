//! Terminal helpers shared by the GDR-CAM binaries
//!
//! Provides:
//! - Status lines and key/value reports
//! - Rendering of structured errors with their suggestion
//! - Progress bars for directory scans

#![warn(missing_docs)]

pub mod output;
pub mod progress;
