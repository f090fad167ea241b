//! # Session
//!
//! Ingestion front-end facade.
//!
//! Responsible for:
//! - Session lifecycle (connect / receive / disconnect)
//! - Line splitting of raw input into commands
//! - Forwarding completed bulks to the dispatch layer

mod facade;

pub use contracts::SessionId;
pub use facade::SessionFacade;
