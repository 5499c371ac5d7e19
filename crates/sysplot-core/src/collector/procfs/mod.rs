//! Collectors for the Linux `/proc` filesystem.
//!
//! `parser` holds pure record parsers; `process` and `system` walk the
//! process table through the [`FileSystem`](crate::collector::FileSystem)
//! seam and turn records into model values.

pub mod parser;
pub mod process;
pub mod system;

pub use parser::ParseError;
pub use process::ProcessCollector;
pub use system::SystemCollector;

use std::io;

/// Error reading a system-wide source. Always recovered by the caller: the
/// affected fields degrade to zero or empty, the tick continues.
#[derive(Debug)]
pub enum CollectError {
    /// The source file could not be opened or read.
    Io(io::Error),
    /// The source content did not match the expected record format.
    Parse(ParseError),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e)
    }
}
