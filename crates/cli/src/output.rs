//! Terminal output utilities
//!
//! Consistent formatting for status lines and metadata reports.

use gdrcam_core::Error;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print one `label: value` line of a report.
    pub fn field(label: &str, value: impl std::fmt::Display) {
        println!("  {:<22} {}", format!("{}:", label).dimmed(), value);
    }

    /// Print a recovery hint
    pub fn hint(message: &str) {
        eprintln!("  {} {}", "→".cyan(), message);
    }

    /// Print a structured error with its context and suggestion.
    pub fn report(err: &Error) {
        let tag = format!("[{} {}]", err.code, err.code.category());
        eprintln!("{} {} {}", "✗".red(), tag.dimmed(), err.message);
        if let Some(ctx) = &err.context {
            eprintln!("  {}", ctx.dimmed());
        }
        if let Some(suggestion) = &err.suggestion {
            Status::hint(suggestion);
        }
    }
}

/// Format a coordinate rendered with 8 decimals, or `"-"`.
pub fn format_decimal(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.8}", v),
        None => "-".to_string(),
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
