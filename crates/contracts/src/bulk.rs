//! BulkRecord - a completed, rendered batch of commands

use serde::{Deserialize, Serialize};

/// One completed bulk, ready for persistence.
///
/// Produced by the batcher when a bulk closes (threshold reached, brace
/// group closed, or forced flush). Ownership moves to the dispatch layer on
/// submit; the worker that pops it owns it until written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRecord {
    /// Rendered payload, exactly as persisted: `bulk: cmd1, cmd2`
    pub rendered: String,
    /// Unix seconds of the first command accepted into this bulk
    pub first_cmd_unix: i64,
    /// Number of commands in the bulk (always >= 1)
    pub command_count: usize,
}

impl BulkRecord {
    /// Render a bulk from its commands.
    ///
    /// Format is the wire contract for both sinks: the literal `bulk:`
    /// prefix, then each command prefixed with a single space, separated by
    /// commas.
    pub fn render(commands: &[String], first_cmd_unix: i64) -> Self {
        Self {
            rendered: format!("bulk: {}", commands.join(", ")),
            first_cmd_unix,
            command_count: commands.len(),
        }
    }
}
