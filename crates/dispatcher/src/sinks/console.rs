//! ConsoleSink - writes rendered bulks to a shared output stream

use contracts::{BulkRecord, BulkSink, ContractError};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Sink that prints each bulk as one line, stdout by default.
///
/// The payload goes to the real stream, not to a tracing event: the rendered
/// line is part of the external contract. The writer sits behind a shared
/// lock so sink clones in one pool interleave whole lines, never bytes.
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    name: String,
    out: Arc<Mutex<W>>,
}

impl ConsoleSink {
    /// Create a ConsoleSink writing to stdout
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_writer(name, Arc::new(Mutex::new(io::stdout())))
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Create a ConsoleSink over an arbitrary shared writer
    pub fn with_writer(name: impl Into<String>, out: Arc<Mutex<W>>) -> Self {
        Self {
            name: name.into(),
            out,
        }
    }

    fn print_bulk(&self, record: &BulkRecord) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("console writer poisoned"))?;
        writeln!(out, "{}", record.rendered)
    }

    fn flush_out(&self) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("console writer poisoned"))?;
        out.flush()
    }
}

impl<W: Write + Send> Clone for ConsoleSink<W> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            out: Arc::clone(&self.out),
        }
    }
}

impl<W: Write + Send> BulkSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "console_sink_write",
        skip(self, record),
        fields(sink = %self.name, commands = record.command_count)
    )]
    async fn write(&mut self, record: &BulkRecord) -> Result<(), ContractError> {
        self.print_bulk(record)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "console_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.flush_out()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    #[instrument(name = "console_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "ConsoleSink closed");
        Ok(())
    }
}
