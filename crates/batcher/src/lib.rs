//! # Batcher
//!
//! Bulk accumulation state machine.
//!
//! Responsible for:
//! - Grouping commands into bulks by count threshold
//! - Brace-group handling (`{` / `}`) overriding the threshold
//! - Rendering completed bulks as `BulkRecord`s

mod batcher;

pub use batcher::Batcher;
pub use contracts::BulkRecord;
