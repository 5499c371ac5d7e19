//! Snapshot assembly: one call per tick over all collectors.

use crate::collector::filter::NameFilter;
use crate::collector::procfs::{ProcessCollector, SystemCollector};
use crate::collector::traits::FileSystem;
use crate::model::Snapshot;

use tracing::{debug, warn};

/// Assembles complete snapshots from the process and system collectors.
pub struct Collector<F: FileSystem> {
    processes: ProcessCollector<F>,
    system: SystemCollector<F>,
}

impl<F: FileSystem + Clone> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    /// * `filter` - Compiled process-name filter
    pub fn new(fs: F, proc_path: impl Into<String>, filter: NameFilter) -> Self {
        let proc_path = proc_path.into();
        Self {
            processes: ProcessCollector::new(fs.clone(), &proc_path, filter),
            system: SystemCollector::new(fs, &proc_path),
        }
    }

    /// Assembles one snapshot.
    ///
    /// A tick never fails as a whole: sources that cannot be read degrade to
    /// zero or empty fields, and the snapshot reflects whatever was
    /// successfully read.
    pub fn collect_snapshot(&self) -> Snapshot {
        let (total_memory_kb, free_memory_kb) = match self.system.collect_memory() {
            Ok(mem) => (mem.total_kb, mem.free_kb),
            Err(e) => {
                warn!("memory info unavailable: {}", e);
                (0, 0)
            }
        };

        let cpus = self.system.collect_cpu_usage().unwrap_or_else(|e| {
            warn!("cpu usage unavailable: {}", e);
            Vec::new()
        });

        let processor_frequency = self.system.collect_frequencies().unwrap_or_else(|e| {
            debug!("cpu frequencies unavailable: {}", e);
            Vec::new()
        });

        Snapshot {
            total_memory_kb,
            free_memory_kb,
            processor_frequency,
            cpus,
            processes: self.processes.collect_processes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn assembles_a_full_snapshot() {
        let c = Collector::new(MockFs::typical_system(), "/proc", NameFilter::match_all());
        let snapshot = c.collect_snapshot();

        assert_eq!(snapshot.total_memory_kb, 16384000);
        assert_eq!(snapshot.free_memory_kb, 8192000);
        assert_eq!(snapshot.cpus.len(), 3);
        assert_eq!(snapshot.processor_frequency, vec![1800, 2112]);
        assert_eq!(snapshot.processes.len(), 3);
    }

    #[test]
    fn filter_applies_to_the_snapshot() {
        let filter = NameFilter::new(&["bash".to_string()]).unwrap();
        let c = Collector::new(MockFs::typical_system(), "/proc", filter);
        let snapshot = c.collect_snapshot();

        assert_eq!(snapshot.processes.len(), 1);
        assert_eq!(snapshot.processes[0].name, "bash");
    }

    #[test]
    fn empty_tree_degrades_to_an_empty_snapshot() {
        let c = Collector::new(MockFs::new(), "/proc", NameFilter::match_all());
        let snapshot = c.collect_snapshot();

        assert_eq!(snapshot.total_memory_kb, 0);
        assert_eq!(snapshot.free_memory_kb, 0);
        assert!(snapshot.cpus.is_empty());
        assert!(snapshot.processor_frequency.is_empty());
        assert!(snapshot.processes.is_empty());
    }

    #[test]
    fn snapshots_are_rebuilt_each_tick() {
        let mut fs = MockFs::typical_system();
        let c = Collector::new(fs.clone(), "/proc", NameFilter::match_all());
        let first = c.collect_snapshot();

        // A second tick over the same tree observes the same state…
        assert_eq!(first, c.collect_snapshot());

        // …and a changed tree is reflected in a fresh collector's tick.
        fs.add_file("/proc/meminfo", "MemTotal: 1 kB\nMemFree: 1 kB\n");
        let c = Collector::new(fs, "/proc", NameFilter::match_all());
        assert_eq!(c.collect_snapshot().total_memory_kb, 1);
    }
}
