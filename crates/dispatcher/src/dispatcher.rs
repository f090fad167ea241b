//! Dispatcher - owns the sink pools and fans completed bulks out to them

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use contracts::BulkRecord;

use crate::error::DispatcherError;
use crate::metrics::MetricsSnapshot;
use crate::pool::{SinkPool, SinkSender};
use crate::sinks::{ConsoleSink, FileSink};

/// Dispatcher configuration
///
/// Pool sizing is explicit configuration rather than a hard-coded constant,
/// so tests can run with a single worker.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Directory for bulk log files
    pub output_dir: PathBuf,
    /// Workers draining the file queue
    pub file_workers: usize,
    /// Capacity of each sink queue
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_workers: 2,
            queue_capacity: 1024,
        }
    }
}

/// Producer-side handle to a running dispatcher.
///
/// Cheap to clone and hand to every session. Submitting never blocks and
/// never reports sink failures back to the producer.
#[derive(Clone)]
pub struct DispatcherHandle {
    console: SinkSender,
    file: SinkSender,
}

impl DispatcherHandle {
    /// Enqueue a completed bulk to both sinks (fire-and-forget).
    ///
    /// The file copy and the console copy travel through independent
    /// queues; no ordering is guaranteed between them.
    pub fn submit(&self, record: BulkRecord) {
        self.file.try_send(record.clone());
        self.console.try_send(record);
    }
}

/// The dispatch layer: one console pool (single worker) and one file pool.
pub struct Dispatcher {
    console: SinkPool,
    file: SinkPool,
}

impl Dispatcher {
    /// Start the dispatcher: create both sinks and spawn their pools.
    #[instrument(name = "dispatcher_start", skip(config), fields(file_workers = config.file_workers))]
    pub fn start(config: DispatcherConfig) -> Result<Self, DispatcherError> {
        if config.file_workers == 0 {
            return Err(DispatcherError::config(
                "file_workers",
                "must be at least 1",
            ));
        }
        if config.queue_capacity == 0 {
            return Err(DispatcherError::config(
                "queue_capacity",
                "must be at least 1",
            ));
        }

        let console_sink = ConsoleSink::new("console");
        let file_sink = FileSink::new("file", &config.output_dir)
            .map_err(|e| DispatcherError::sink_creation("file", e.to_string()))?;

        // Exactly one worker keeps console output line-ordered with the queue
        let console = SinkPool::spawn(console_sink, 1, config.queue_capacity);
        let file = SinkPool::spawn(file_sink, config.file_workers, config.queue_capacity);

        info!(
            output_dir = %config.output_dir.display(),
            file_workers = config.file_workers,
            "Dispatcher started"
        );

        Ok(Self { console, file })
    }

    /// Create a dispatcher over custom pools (for testing)
    pub fn with_pools(console: SinkPool, file: SinkPool) -> Self {
        Self { console, file }
    }

    /// Get a producer handle
    pub fn handle(&self) -> DispatcherHandle {
        DispatcherHandle {
            console: self.console.sender(),
            file: self.file.sender(),
        }
    }

    /// Get metrics for both pools
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        vec![
            (self.console.name().to_string(), self.console.metrics().snapshot()),
            (self.file.name().to_string(), self.file.metrics().snapshot()),
        ]
    }

    /// Shutdown gracefully: close both queues, drain, join every worker.
    ///
    /// Returns the final per-sink metrics, taken after the drain.
    #[instrument(name = "dispatcher_shutdown", skip(self))]
    pub async fn shutdown(self) -> Vec<(String, MetricsSnapshot)> {
        let console_name = self.console.name().to_string();
        let file_name = self.file.name().to_string();

        let console_totals = self.console.shutdown().await;
        let file_totals = self.file.shutdown().await;

        debug!("Dispatcher shutdown complete");
        vec![(console_name, console_totals), (file_name, file_totals)]
    }
}
