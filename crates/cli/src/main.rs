//! # Bulk CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Argument parsing and observability setup
//! - Input feeding (stdin or file) into one session
//! - Graceful drain on end of input

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use cli::Cli;
use contracts::SessionId;
use dispatcher::{Dispatcher, DispatcherConfig};
use observability::ObservabilityConfig;
use session::SessionFacade;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.clone().into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        default_log_level: cli.log_level().to_string(),
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bulk_size = cli.bulk_size,
        "Bulk pipeline starting"
    );

    let dispatcher = Dispatcher::start(DispatcherConfig {
        output_dir: cli.output_dir.clone(),
        file_workers: cli.file_workers,
        queue_capacity: cli.queue_capacity,
    })?;

    let mut facade = SessionFacade::new(dispatcher.handle());
    let id = facade.connect(cli.bulk_size)?;

    let lines = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("cannot open input file {}", path.display()))?;
            feed(BufReader::new(file), &mut facade, id).await?
        }
        None => feed(BufReader::new(tokio::io::stdin()), &mut facade, id).await?,
    };

    facade.disconnect(id);
    drop(facade);

    let totals = dispatcher.shutdown().await;
    for (sink, snapshot) in &totals {
        observability::record_sink_totals(
            sink,
            snapshot.bulks_written,
            snapshot.write_failures,
            snapshot.bulks_dropped,
        );
        info!(
            sink = %sink,
            totals = %serde_json::to_string(snapshot)?,
            "Sink totals"
        );
    }

    info!(lines, "Bulk pipeline finished");
    Ok(())
}

/// Feed input lines into the session until EOF; returns the line count.
async fn feed<R>(reader: R, facade: &mut SessionFacade, id: SessionId) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0u64;

    while let Some(line) = lines.next_line().await? {
        facade.receive(id, &line);
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_feed_counts_lines_and_flushes() {
        let dir = tempdir().unwrap();
        let dispatcher = Dispatcher::start(DispatcherConfig {
            output_dir: dir.path().to_path_buf(),
            file_workers: 1,
            queue_capacity: 16,
        })
        .unwrap();

        let mut facade = SessionFacade::new(dispatcher.handle());
        let id = facade.connect(2).unwrap();

        let input: &[u8] = b"a\nb\nc\n";
        let lines = feed(BufReader::new(input), &mut facade, id).await.unwrap();
        assert_eq!(lines, 3);

        facade.disconnect(id);
        dispatcher.shutdown().await;

        let mut contents: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["bulk: a, b\n", "bulk: c\n"]);
    }
}
