//! # Dispatcher
//!
//! Asynchronous sink layer.
//!
//! Responsible for:
//! - Consuming completed `BulkRecord`s from producers
//! - Fan-out to the console and file sinks through per-kind FIFO queues
//! - Isolating slow sinks so producers never block on I/O
//! - Graceful drain on shutdown

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod sinks;

pub use contracts::{BulkRecord, BulkSink};
pub use dispatcher::{Dispatcher, DispatcherConfig, DispatcherHandle};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use pool::{SinkPool, SinkSender};
pub use sinks::{ConsoleSink, FileSink};
