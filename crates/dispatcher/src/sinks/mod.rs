//! Sink implementations

mod console;
mod file;

pub use console::ConsoleSink;
pub use file::FileSink;
