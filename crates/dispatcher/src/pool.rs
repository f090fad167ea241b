//! SinkPool - fixed set of persistent workers draining one FIFO queue
//!
//! One pool per sink kind. Workers share a single multi-consumer channel,
//! so a pool of N drains the same FIFO from N tasks; relative completion
//! order between workers is not guaranteed.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{BulkRecord, BulkSink};

use crate::metrics::SinkMetrics;

/// Producer-side handle to a pool's queue.
///
/// Cheap to clone; enqueue is non-blocking and O(1). Closing the pool
/// closes the channel for every sender clone at once.
#[derive(Clone)]
pub struct SinkSender {
    name: String,
    tx: Sender<BulkRecord>,
    metrics: Arc<SinkMetrics>,
}

impl SinkSender {
    /// Pool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a bulk for this pool (non-blocking)
    ///
    /// Returns true if enqueued, false if the queue was full or closed
    /// (bulk dropped for this sink).
    pub fn try_send(&self, record: BulkRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(async_channel::TrySendError::Full(r)) => {
                self.metrics.record_drop();
                warn!(
                    sink = %self.name,
                    commands = r.command_count,
                    "Queue full, bulk dropped"
                );
                false
            }
            Err(async_channel::TrySendError::Closed(_)) => {
                self.metrics.record_drop();
                error!(sink = %self.name, "Sink pool closed, bulk dropped");
                false
            }
        }
    }

    /// Current queue depth
    pub fn queue_len(&self) -> usize {
        self.tx.len()
    }
}

/// A running pool of workers bound to one sink kind
pub struct SinkPool {
    /// Pool name (sink name)
    name: String,
    /// Producer side of the queue
    sender: SinkSender,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
    /// Worker task handles
    workers: Vec<JoinHandle<()>>,
}

impl SinkPool {
    /// Spawn `worker_count` workers over one shared FIFO queue.
    ///
    /// Each worker gets its own clone of the sink; sinks that must share
    /// state across workers (like the file sequence counter) do so through
    /// their own shared internals.
    pub fn spawn<S>(sink: S, worker_count: usize, queue_capacity: usize) -> Self
    where
        S: BulkSink + Clone + Send + 'static,
    {
        let name = sink.name().to_string();
        let (tx, rx) = async_channel::bounded(queue_capacity);
        let metrics = Arc::new(SinkMetrics::new());

        let workers = (0..worker_count)
            .map(|idx| {
                let worker_sink = sink.clone();
                let worker_rx = rx.clone();
                let worker_metrics = Arc::clone(&metrics);
                let worker_name = format!("{name}-{idx}");

                tokio::spawn(async move {
                    sink_worker(worker_sink, worker_rx, worker_metrics, worker_name).await;
                })
            })
            .collect();

        let sender = SinkSender {
            name: name.clone(),
            tx,
            metrics: Arc::clone(&metrics),
        };

        Self {
            name,
            sender,
            metrics,
            workers,
        }
    }

    /// Pool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a cloneable producer handle
    pub fn sender(&self) -> SinkSender {
        self.sender.clone()
    }

    /// Current queue depth
    pub fn queue_len(&self) -> usize {
        self.sender.queue_len()
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Shutdown the pool gracefully.
    ///
    /// Closes the queue exactly once, which wakes every worker; each worker
    /// drains the remaining items before exiting. Returns the final metrics
    /// once all workers have finished.
    #[instrument(name = "sink_pool_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) -> crate::metrics::MetricsSnapshot {
        self.sender.tx.close();
        for worker in self.workers {
            if let Err(e) = worker.await {
                error!(sink = %self.name, error = ?e, "Worker task panicked");
            }
        }
        debug!(sink = %self.name, "SinkPool shutdown complete");
        self.metrics.snapshot()
    }
}

/// Worker task that pops bulks and writes them to its sink
#[instrument(name = "sink_worker_loop", skip(sink, rx, metrics), fields(worker = %name))]
async fn sink_worker<S: BulkSink>(
    mut sink: S,
    rx: Receiver<BulkRecord>,
    metrics: Arc<SinkMetrics>,
    name: String,
) {
    debug!(worker = %name, "Sink worker started");

    // recv yields remaining items after close, then errors: drain semantics
    while let Ok(record) = rx.recv().await {
        match sink.write(&record).await {
            Ok(()) => {
                metrics.record_write(&record);
            }
            Err(e) => {
                metrics.record_failure();
                error!(
                    worker = %name,
                    commands = record.command_count,
                    error = %e,
                    "Write failed"
                );
                // Continue processing - don't crash on single failure
            }
        }
    }

    // Cleanup
    if let Err(e) = sink.flush().await {
        error!(worker = %name, error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = sink.close().await {
        error!(worker = %name, error = %e, "Close failed on shutdown");
    }

    debug!(worker = %name, "Sink worker stopped");
}
