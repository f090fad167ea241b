//! Bulk pipeline metric recorders
//!
//! Thin wrappers over the `metrics` facade; safe to call whether or not an
//! exporter is installed.

use contracts::BulkRecord;
use metrics::{counter, gauge, histogram};

/// Record one completed bulk.
///
/// Called on the producer side every time a bulk closes, before it is
/// submitted to the dispatch layer.
pub fn record_bulk_flushed(record: &BulkRecord) {
    counter!("bulk_pipeline_bulks_total").increment(1);
    counter!("bulk_pipeline_commands_total").increment(record.command_count as u64);
    histogram!("bulk_pipeline_bulk_size").record(record.command_count as f64);
    gauge!("bulk_pipeline_last_bulk_unix").set(record.first_cmd_unix as f64);
}

/// Record final per-sink totals (written / failed / dropped).
///
/// Usually called once at teardown from the sink metrics snapshots.
pub fn record_sink_totals(sink: &str, written: u64, failed: u64, dropped: u64) {
    counter!("bulk_pipeline_sink_written_total", "sink" => sink.to_string()).increment(written);

    if failed > 0 {
        counter!("bulk_pipeline_sink_failed_total", "sink" => sink.to_string()).increment(failed);
    }
    if dropped > 0 {
        counter!("bulk_pipeline_sink_dropped_total", "sink" => sink.to_string()).increment(dropped);
    }
}
