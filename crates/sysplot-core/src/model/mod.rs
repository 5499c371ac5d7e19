//! Data model for one sampling tick.
//!
//! All of these are plain immutable values: built once per tick by the
//! collector, handed to the wire encoder, then discarded. Nothing here is
//! retained or merged across ticks.

mod process;
mod snapshot;
mod system;

pub use process::{ProcessSample, ThreadSample};
pub use snapshot::Snapshot;
pub use system::CoreUsage;
