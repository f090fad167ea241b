//! FileSink - writes one uniquely-named file per bulk

use contracts::{BulkRecord, BulkSink, ContractError};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Sink that persists each bulk to `bulk<unix-seconds>_<seq>.log`.
///
/// The sequence counter is shared across clones, so a pool of file workers
/// never produces colliding names even for bulks stamped in the same second.
#[derive(Clone)]
pub struct FileSink {
    name: String,
    output_dir: PathBuf,
    seq: Arc<AtomicU64>,
}

impl FileSink {
    /// Create a new FileSink writing into `output_dir`.
    ///
    /// Creates the directory if it does not exist.
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;

        Ok(Self {
            name: name.into(),
            output_dir,
            seq: Arc::new(AtomicU64::new(0)),
        })
    }

    fn next_path(&self, record: &BulkRecord) -> PathBuf {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.output_dir
            .join(format!("bulk{}_{}.log", record.first_cmd_unix, seq))
    }

    fn write_bulk_to_disk(&self, record: &BulkRecord) -> std::io::Result<()> {
        let path = self.next_path(record);
        let mut file = File::create(path)?;
        writeln!(file, "{}", record.rendered)
    }

    fn persist_bulk(&self, record: &BulkRecord) -> Result<(), ContractError> {
        self.write_bulk_to_disk(record).map_err(|e| {
            error!(sink = %self.name, commands = record.command_count, error = %e, "Write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }
}

impl BulkSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, record),
        fields(sink = %self.name, commands = record.command_count)
    )]
    async fn write(&mut self, record: &BulkRecord) -> Result<(), ContractError> {
        self.persist_bulk(record)?;
        Ok(())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "FileSink closed");
        Ok(())
    }
}
