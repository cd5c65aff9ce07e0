//! Persisting finished images.

use crate::{CaptureError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// What became of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to this location
    Saved(PathBuf),
    /// The user dismissed the save
    Cancelled,
}

/// Destination for finished images.
pub trait SaveSink: Send + Sync {
    /// Persists `bytes` under `filename`.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<SaveOutcome>;
}

/// Filename `"{prefix}-{YYYY-MM-DDTHH-MM-SS}.jpg"` for a UTC instant.
pub fn output_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.jpg", prefix, at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Writes images into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free path for `filename`, adding `-1`, `-2`, ... before the extension.
    fn free_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = filename.rsplit_once('.').unwrap_or((filename, "jpg"));
        (1..)
            .map(|n| self.dir.join(format!("{}-{}.{}", stem, n, ext)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<SaveOutcome> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| CaptureError::Save(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.free_path(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| CaptureError::Save(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), bytes = bytes.len(), "Saved image");
        Ok(SaveOutcome::Saved(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_output_filename() {
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 12, 5, 9).unwrap();
        assert_eq!(output_filename("gdr-cam", at), "gdr-cam-2026-10-14T12-05-09.jpg");
    }

    #[test]
    fn test_directory_sink_never_overwrites() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let first = sink.save("a.jpg", b"one").unwrap();
        let second = sink.save("a.jpg", b"two").unwrap();

        assert_eq!(first, SaveOutcome::Saved(dir.path().join("out/a.jpg")));
        assert_eq!(second, SaveOutcome::Saved(dir.path().join("out/a-1.jpg")));
        assert_eq!(std::fs::read(dir.path().join("out/a.jpg")).unwrap(), b"one");
    }
}
