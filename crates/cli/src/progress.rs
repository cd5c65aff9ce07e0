//! Progress indicators for directory scans.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar counting processed files.
pub fn file_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_progress_counts() {
        let pb = file_progress(10);
        pb.inc(4);
        assert_eq!(pb.position(), 4);
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }
}
