//! SessionFacade - per-client handles over batchers, feeding the dispatcher

use std::collections::HashMap;

use batcher::Batcher;
use contracts::{ContractError, SessionId};
use dispatcher::DispatcherHandle;
use tracing::{debug, instrument, warn};

/// One connected client: its batcher and nothing else shared.
struct Session {
    batcher: Batcher,
}

/// Facade exposed to the ingestion front end.
///
/// Owns the session table; sessions are identified by typed, never-reused
/// ids. All mutation goes through `&mut self`, so a single batcher is never
/// driven concurrently. Unknown ids are silent no-ops on `receive` and
/// `disconnect`, matching the fire-and-forget contract of the layer below.
pub struct SessionFacade {
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
    dispatcher: DispatcherHandle,
}

impl SessionFacade {
    /// Create a facade submitting bulks to the given dispatcher
    pub fn new(dispatcher: DispatcherHandle) -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 0,
            dispatcher,
        }
    }

    /// Open a new session with the given bulk-size threshold.
    ///
    /// # Errors
    /// `bulk_size` of 0 is rejected as invalid configuration.
    #[instrument(name = "session_connect", skip(self))]
    pub fn connect(&mut self, bulk_size: usize) -> Result<SessionId, ContractError> {
        if bulk_size == 0 {
            return Err(ContractError::config_validation(
                "bulk_size",
                "must be at least 1",
            ));
        }

        let id = SessionId::new(self.next_id);
        self.next_id += 1;

        self.sessions.insert(
            id,
            Session {
                batcher: Batcher::new(bulk_size),
            },
        );

        debug!(session = %id, bulk_size, "session connected");
        Ok(id)
    }

    /// Feed raw input into a session.
    ///
    /// The data is split on newlines; empty lines are skipped, every other
    /// line is one command fed to the batcher in order. Completed bulks are
    /// submitted to the dispatcher immediately.
    #[instrument(name = "session_receive", skip(self, data), fields(session = %id, bytes = data.len()))]
    pub fn receive(&mut self, id: SessionId, data: &str) {
        let Some(session) = self.sessions.get_mut(&id) else {
            warn!(session = %id, "receive on unknown session, ignored");
            return;
        };

        for line in data.split('\n') {
            if line.is_empty() {
                continue;
            }
            if let Some(record) = session.batcher.process(line) {
                observability::record_bulk_flushed(&record);
                self.dispatcher.submit(record);
            }
        }
    }

    /// Close a session, flushing any pending bulk first.
    ///
    /// The flush only takes effect outside a brace group; an unterminated
    /// group is deliberately dropped, never auto-closed.
    #[instrument(name = "session_disconnect", skip(self), fields(session = %id))]
    pub fn disconnect(&mut self, id: SessionId) {
        let Some(mut session) = self.sessions.remove(&id) else {
            debug!(session = %id, "disconnect on unknown session, ignored");
            return;
        };

        if session.batcher.depth() > 0 {
            warn!(
                session = %id,
                pending = session.batcher.pending(),
                "disconnect inside open group, pending commands dropped"
            );
        }

        if let Some(record) = session.batcher.flush() {
            observability::record_bulk_flushed(&record);
            self.dispatcher.submit(record);
        }

        debug!(session = %id, "session disconnected");
    }

    /// Number of currently connected sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
