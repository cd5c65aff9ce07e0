//! Session identifiers for discarding results of abandoned captures.

use std::fmt;
use uuid::Uuid;

/// Identifies one capture session, from shutter to save or abandonment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // first group is enough to correlate log lines
        let id = self.0.simple().to_string();
        f.write_str(&id[..8])
    }
}
