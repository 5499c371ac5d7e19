//! The per-tick snapshot value.

use super::process::ProcessSample;
use super::system::CoreUsage;

/// Complete result of one sampling tick.
///
/// A snapshot carries no timestamp: the wire encoder stamps encode time
/// when it renders the document. Every field reflects only what was
/// successfully read during the tick — unreadable or malformed sources
/// degrade to zero or empty fields, never to an error.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Total system memory in kilobytes.
    /// Source: memory-info record `MemTotal`
    pub total_memory_kb: u64,

    /// Free system memory in kilobytes.
    /// Source: memory-info record `MemFree`
    pub free_memory_kb: u64,

    /// Per-core processor frequency in whole megahertz.
    /// Source: `cpu MHz` lines of the cpuinfo record; empty when absent
    pub processor_frequency: Vec<u64>,

    /// CPU usage counters, aggregate line first, then per-core, in record
    /// order.
    pub cpus: Vec<CoreUsage>,

    /// Processes that passed the name filter, in pid order.
    pub processes: Vec<ProcessSample>,
}
