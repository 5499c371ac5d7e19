//! System-wide CPU accounting.

/// Cumulative CPU time counters for one `cpu…` usage line, in clock ticks.
///
/// Source: `/proc/stat`
///
/// The first line of the source is the aggregate across all cores,
/// subsequent lines are individual cores; both parse into this struct.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CoreUsage {
    /// Time spent in user mode.
    pub user: u64,

    /// Time spent in user mode at low priority (nice).
    pub nice: u64,

    /// Time spent in kernel mode.
    pub system: u64,

    /// Time spent idle.
    pub idle: u64,

    /// Time waiting for I/O completion.
    pub iowait: u64,

    /// Time servicing hardware interrupts.
    pub irq: u64,

    /// Time servicing software interrupts.
    pub softirq: u64,

    /// Time stolen by the hypervisor. Zero on short-format records.
    pub steal: u64,

    /// Time running a guest OS. Zero on short-format records.
    pub guest: u64,

    /// Time running a niced guest OS. Zero on short-format records.
    pub guest_nice: u64,
}
