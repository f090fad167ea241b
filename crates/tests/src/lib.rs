//! # Integration Tests
//!
//! End-to-end tests over the whole pipeline:
//! session facade -> batcher -> dispatcher -> sinks.
//!
//! Each test constructs its own dispatcher instance, so the dispatch state
//! is never hidden process-wide state and tests stay isolated.

#[cfg(test)]
mod contract_tests {
    use batcher::Batcher;
    use contracts::BulkRecord;

    /// The rendered format is the wire contract for both sinks.
    #[test]
    fn test_render_contract() {
        let mut batcher = Batcher::new(2);
        assert!(batcher.process("a").is_none());

        let record: BulkRecord = batcher.process("b").unwrap();
        assert_eq!(record.rendered, "bulk: a, b");
        assert_eq!(record.command_count, 2);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use dispatcher::{Dispatcher, DispatcherConfig};
    use session::SessionFacade;
    use tempfile::tempdir;

    fn start_dispatcher(dir: &Path, file_workers: usize) -> Dispatcher {
        Dispatcher::start(DispatcherConfig {
            output_dir: dir.to_path_buf(),
            file_workers,
            queue_capacity: 256,
        })
        .unwrap()
    }

    /// Read back every bulk file, sorted by content for stable assertions.
    fn bulk_contents(dir: &Path) -> Vec<String> {
        let mut contents: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
            .collect();
        contents.sort();
        contents
    }

    fn bulk_filenames(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Threshold batching: every T-th command flushes, the final partial
    /// bulk pends until disconnect.
    #[tokio::test]
    async fn test_e2e_threshold_batching() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 2);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(3).unwrap();
        facade.receive(id, "c1\nc2\nc3\nc4\nc5\nc6\nc7\n");

        facade.disconnect(id);
        dispatcher.shutdown().await;

        assert_eq!(
            bulk_contents(dir.path()),
            vec!["bulk: c1, c2, c3\n", "bulk: c4, c5, c6\n", "bulk: c7\n"]
        );
    }

    /// A brace group flushes as one unit regardless of the threshold.
    #[tokio::test]
    async fn test_e2e_brace_group_overrides_threshold() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 1);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(2).unwrap();
        facade.receive(id, "{\na\nb\nc\n}\n");

        facade.disconnect(id);
        dispatcher.shutdown().await;

        assert_eq!(bulk_contents(dir.path()), vec!["bulk: a, b, c\n"]);
    }

    /// Nested groups flush once, at the outer close.
    #[tokio::test]
    async fn test_e2e_nested_groups_single_flush() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 1);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(2).unwrap();
        facade.receive(id, "{\n{\na\n}\nb\n}\n");

        facade.disconnect(id);
        dispatcher.shutdown().await;

        assert_eq!(bulk_contents(dir.path()), vec!["bulk: a, b\n"]);
    }

    /// connect + disconnect with no commands produces no output at all.
    #[tokio::test]
    async fn test_e2e_empty_session() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 2);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(5).unwrap();
        facade.disconnect(id);

        let totals = dispatcher.shutdown().await;

        assert!(bulk_contents(dir.path()).is_empty());
        for (_, snapshot) in totals {
            assert_eq!(snapshot.bulks_written, 0);
        }
    }

    /// An unterminated brace group is dropped at disconnect, not persisted.
    #[tokio::test]
    async fn test_e2e_unterminated_group_dropped() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 2);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(2).unwrap();
        facade.receive(id, "kept1\nkept2\n{\ndropped\n");

        facade.disconnect(id);
        dispatcher.shutdown().await;

        // The threshold bulk before the group survives, the group does not
        assert_eq!(bulk_contents(dir.path()), vec!["bulk: kept1, kept2\n"]);
    }

    /// Two sessions driven from concurrent tasks never interleave commands
    /// inside one rendered bulk.
    #[tokio::test]
    async fn test_e2e_concurrent_sessions_isolated() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 2);

        let handle_a = dispatcher.handle();
        let handle_b = dispatcher.handle();

        let task_a = tokio::spawn(async move {
            let mut facade = SessionFacade::new(handle_a);
            let id = facade.connect(2).unwrap();
            for i in 0..10 {
                facade.receive(id, &format!("a{i}\n"));
                tokio::task::yield_now().await;
            }
            facade.disconnect(id);
        });

        let task_b = tokio::spawn(async move {
            let mut facade = SessionFacade::new(handle_b);
            let id = facade.connect(2).unwrap();
            for i in 0..10 {
                facade.receive(id, &format!("b{i}\n"));
                tokio::task::yield_now().await;
            }
            facade.disconnect(id);
        });

        task_a.await.unwrap();
        task_b.await.unwrap();
        dispatcher.shutdown().await;

        let contents = bulk_contents(dir.path());
        assert_eq!(contents.len(), 10);
        for bulk in contents {
            let all_a = bulk.starts_with("bulk: a");
            let all_b = bulk.starts_with("bulk: b");
            assert!(all_a || all_b, "mixed bulk: {bulk}");
            // Every command in the bulk belongs to the same session
            let marker = if all_a { "a" } else { "b" };
            for cmd in bulk.trim_start_matches("bulk: ").trim_end().split(", ") {
                assert!(cmd.starts_with(marker), "foreign command in {bulk}");
            }
        }
    }

    /// Filenames never collide, even for bulks completed in the same second
    /// and written by two racing file workers.
    #[tokio::test]
    async fn test_e2e_filenames_unique_same_second() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 2);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(1).unwrap();
        for i in 0..50 {
            facade.receive(id, &format!("cmd{i}\n"));
        }

        facade.disconnect(id);
        let totals = dispatcher.shutdown().await;

        let names = bulk_filenames(dir.path());
        assert_eq!(names.len(), 50);

        let file_totals = totals.iter().find(|(name, _)| name == "file").unwrap();
        assert_eq!(file_totals.1.bulks_written, 50);
        assert_eq!(file_totals.1.write_failures, 0);
        assert_eq!(file_totals.1.bulks_dropped, 0);
    }

    /// The console pool drains everything the file pool does.
    #[tokio::test]
    async fn test_e2e_console_and_file_counts_match() {
        let dir = tempdir().unwrap();
        let dispatcher = start_dispatcher(dir.path(), 2);
        let mut facade = SessionFacade::new(dispatcher.handle());

        let id = facade.connect(2).unwrap();
        facade.receive(id, "a\nb\nc\nd\ne\n");

        facade.disconnect(id);
        let totals = dispatcher.shutdown().await;

        for (sink, snapshot) in totals {
            assert_eq!(snapshot.bulks_written, 3, "sink {sink}");
        }
    }
}
