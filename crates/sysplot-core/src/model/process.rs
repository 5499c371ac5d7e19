//! Per-process and per-thread samples from the process table.

/// CPU accounting for a single thread.
///
/// Source: `/proc/[pid]/task/[tid]/stat`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadSample {
    /// Thread ID.
    /// Source: directory name under `/proc/[pid]/task/`
    pub tid: u32,

    /// Scheduling priority. Negative for real-time threads.
    /// Source: stat field 18 (priority)
    pub priority: i64,

    /// Time spent in user mode (clock ticks).
    /// Source: stat field 14 (utime)
    pub cpu_user: u64,

    /// Time spent in kernel mode (clock ticks).
    /// Source: stat field 15 (stime)
    pub cpu_system: u64,
}

/// One process in a snapshot, with its threads in enumeration order.
///
/// Only processes whose status and memory records both parsed, and whose
/// name passed the configured filter, appear in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSample {
    /// Process ID.
    /// Source: directory name under the process table root
    pub pid: u32,

    /// Command name, as reported between the parentheses of the status
    /// record. May contain spaces and parentheses.
    pub name: String,

    /// Resident memory in kilobytes (resident pages * page size / 1024).
    /// Source: `/proc/[pid]/statm` field 2 (resident)
    pub memory_kb: u64,

    /// Time spent in user mode (clock ticks).
    /// Source: `/proc/[pid]/stat` field 14 (utime)
    pub cpu_user: u64,

    /// Time spent in kernel mode (clock ticks).
    /// Source: `/proc/[pid]/stat` field 15 (stime)
    pub cpu_system: u64,

    /// Threads of this process. Threads whose records failed to parse are
    /// simply absent.
    pub threads: Vec<ThreadSample>,
}
