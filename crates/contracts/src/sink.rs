//! BulkSink trait - dispatch layer output interface
//!
//! Defines the abstract interface for sinks.

use crate::{BulkRecord, ContractError};

/// Bulk persistence trait
///
/// All sink implementations must implement this trait. Writes are
/// fire-and-forget from the producer's point of view: failures are reported
/// to the worker loop, never back to the session that produced the bulk.
#[trait_variant::make(BulkSink: Send)]
pub trait LocalBulkSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one completed bulk
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, record: &BulkRecord) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
