//! Transient user-facing status messages.

use std::time::Duration;

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Operation completed
    Success,
    /// Operation failed
    Error,
    /// Neutral notice
    Info,
}

/// A non-blocking notice for the user, auto-dismissed after `ttl`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StatusMessage {
    /// Severity
    pub kind: StatusKind,
    /// Text shown to the user
    pub text: String,
    /// Display duration
    #[serde(with = "ttl_millis")]
    pub ttl: Duration,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into(), ttl: STATUS_TTL }
    }

    /// Success notice.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, text)
    }

    /// Failure notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, text)
    }

    /// Neutral notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Info, text)
    }
}

mod ttl_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(ttl.as_millis() as u64)
    }
}
