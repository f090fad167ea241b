//! SessionId - typed handle for an ingestion session
//!
//! Replaces an untyped opaque pointer with a copyable id into the session
//! table. Ids are never reused, so a stale handle can only miss the table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a session id from its raw value.
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value (for logging/diagnostics).
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}
