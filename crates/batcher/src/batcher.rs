//! Bulk state machine implementation.

use contracts::BulkRecord;
use tracing::{debug, warn};

/// Control token opening a brace group.
const GROUP_OPEN: &str = "{";
/// Control token closing a brace group.
const GROUP_CLOSE: &str = "}";

/// Accumulates commands into bulks.
///
/// A bulk closes when the command count reaches the configured threshold,
/// or when a brace group closes (its own close is authoritative and ignores
/// the threshold). Completed bulks are returned to the caller; the batcher
/// never touches the dispatch layer itself.
///
/// Not thread-safe by design: one producer per session drives it through
/// `&mut self`.
#[derive(Debug)]
pub struct Batcher {
    /// Commands accumulated since the last flush
    commands: Vec<String>,
    /// Count threshold for normal (depth 0) mode
    threshold: usize,
    /// Currently open brace groups
    depth: u32,
    /// Unix seconds when the first command of this bulk was accepted
    first_cmd_unix: Option<i64>,
}

impl Batcher {
    /// Create a batcher with the given count threshold.
    ///
    /// The threshold must be >= 1; the session layer validates this before
    /// constructing a batcher.
    pub fn new(threshold: usize) -> Self {
        Self {
            commands: Vec::with_capacity(threshold),
            threshold,
            depth: 0,
            first_cmd_unix: None,
        }
    }

    /// Feed one command into the batcher.
    ///
    /// Returns the completed bulk if this command closed one:
    /// - `{` at depth 0 first flushes any accumulated partial bulk, so the
    ///   group starts clean, then opens the group
    /// - `}` closes a group; when depth returns to 0 the whole group
    ///   flushes as a unit, whatever its size
    /// - any other line is an ordinary command; at depth 0 reaching the
    ///   threshold flushes immediately
    ///
    /// A `}` with no open group is rejected: depth is clamped at 0 and the
    /// token is dropped with a warning.
    pub fn process(&mut self, cmd: &str) -> Option<BulkRecord> {
        match cmd {
            GROUP_OPEN => {
                let flushed = if self.depth == 0 { self.flush() } else { None };
                self.depth += 1;
                flushed
            }
            GROUP_CLOSE => {
                if self.depth == 0 {
                    warn!("unmatched '}}' with no open group, token ignored");
                    return None;
                }
                self.depth -= 1;
                if self.depth == 0 {
                    self.flush()
                } else {
                    None
                }
            }
            _ => {
                if self.commands.is_empty() {
                    self.first_cmd_unix = Some(now_unix());
                }
                self.commands.push(cmd.to_string());

                if self.commands.len() >= self.threshold && self.depth == 0 {
                    self.flush()
                } else {
                    None
                }
            }
        }
    }

    /// Force completion of the current bulk.
    ///
    /// No-op while a brace group is open (the group's own close is
    /// authoritative) or when nothing has accumulated. On completion the
    /// bulk is rendered and all state resets for a fresh bulk.
    pub fn flush(&mut self) -> Option<BulkRecord> {
        if self.depth > 0 {
            debug!(depth = self.depth, "flush ignored inside open group");
            return None;
        }
        if self.commands.is_empty() {
            return None;
        }

        let first_cmd_unix = self.first_cmd_unix.take().unwrap_or_else(now_unix);
        let record = BulkRecord::render(&self.commands, first_cmd_unix);

        self.commands.clear();
        self.depth = 0;

        Some(record)
    }

    /// Number of commands pending in the current bulk.
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Currently open brace groups (0 = threshold-driven mode).
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
