//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - A bulk is stamped with the unix-seconds time of its first accepted command
//! - File names embed that stamp plus a per-dispatcher sequence number

mod bulk;
mod error;
mod session_id;
mod sink;

pub use bulk::BulkRecord;
pub use error::ContractError;
pub use session_id::SessionId;
pub use sink::*;
