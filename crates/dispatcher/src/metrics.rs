//! Per-sink bulk accounting

use contracts::BulkRecord;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals for one sink pool.
///
/// Updated lock-free from the pool's workers and producers. Queue depth is
/// not tracked here; it lives on the channel and is read through
/// `SinkPool::queue_len`.
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Bulks persisted successfully
    bulks_written: AtomicU64,
    /// Commands contained in those bulks
    commands_written: AtomicU64,
    /// Bulks whose write failed (lost, per the no-retry contract)
    write_failures: AtomicU64,
    /// Bulks dropped before the queue (full or closed)
    bulks_dropped: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully persisted bulk
    pub fn record_write(&self, record: &BulkRecord) {
        self.bulks_written.fetch_add(1, Ordering::Relaxed);
        self.commands_written
            .fetch_add(record.command_count as u64, Ordering::Relaxed);
    }

    /// Count one failed write
    pub fn record_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one bulk dropped before reaching a worker
    pub fn record_drop(&self) {
        self.bulks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Bulks persisted so far
    pub fn bulks_written(&self) -> u64 {
        self.bulks_written.load(Ordering::Relaxed)
    }

    /// Commands persisted so far
    pub fn commands_written(&self) -> u64 {
        self.commands_written.load(Ordering::Relaxed)
    }

    /// Failed writes so far
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Dropped bulks so far
    pub fn bulks_dropped(&self) -> u64 {
        self.bulks_dropped.load(Ordering::Relaxed)
    }

    /// Get snapshot of all totals
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bulks_written: self.bulks_written(),
            commands_written: self.commands_written(),
            write_failures: self.write_failures(),
            bulks_dropped: self.bulks_dropped(),
        }
    }
}

/// Point-in-time totals for reporting
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSnapshot {
    pub bulks_written: u64,
    pub commands_written: u64,
    pub write_failures: u64,
    pub bulks_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_accumulates_commands() {
        let metrics = SinkMetrics::new();

        let cmds: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        metrics.record_write(&BulkRecord::render(&cmds, 1));
        metrics.record_write(&BulkRecord::render(&cmds[..1], 2));

        assert_eq!(metrics.bulks_written(), 2);
        assert_eq!(metrics.commands_written(), 4);
    }

    #[test]
    fn test_snapshot_reflects_all_counters() {
        let metrics = SinkMetrics::new();

        metrics.record_write(&BulkRecord::render(&["x".to_string()], 1));
        metrics.record_failure();
        metrics.record_drop();
        metrics.record_drop();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.bulks_written, 1);
        assert_eq!(snapshot.commands_written, 1);
        assert_eq!(snapshot.write_failures, 1);
        assert_eq!(snapshot.bulks_dropped, 2);
    }
}
