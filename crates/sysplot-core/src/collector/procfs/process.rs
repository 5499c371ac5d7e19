//! Per-process collection from `/proc/[pid]/`.

use std::path::Path;

use tracing::debug;

use crate::collector::filter::NameFilter;
use crate::collector::procfs::parser::{parse_proc_stat, parse_statm};
use crate::collector::traits::FileSystem;
use crate::model::{ProcessSample, ThreadSample};

/// Fallback when the page size cannot be queried at runtime.
const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Queries the kernel page size, used to normalize resident pages to kB.
fn detect_page_size() -> u64 {
    // SAFETY: sysconf with a valid name constant has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 { size as u64 } else { DEFAULT_PAGE_SIZE }
}

/// Collects process samples from `/proc/[pid]/` files.
pub struct ProcessCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
    filter: NameFilter,
    page_size: u64,
}

impl<F: FileSystem> ProcessCollector<F> {
    /// Creates a new process collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    /// * `filter` - Compiled process-name filter
    pub fn new(fs: F, proc_path: impl Into<String>, filter: NameFilter) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
            filter,
            page_size: detect_page_size(),
        }
    }

    /// The page size used for resident-memory normalization.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Collects every process that passes the name filter, in pid order.
    ///
    /// Processes that vanish or expose malformed records between enumeration
    /// and reading are skipped; partial visibility is the normal case, so an
    /// unreadable process table degrades to an empty list.
    pub fn collect_processes(&self) -> Vec<ProcessSample> {
        let mut pids = self.numeric_entries(Path::new(&self.proc_path));
        pids.sort_unstable();

        let mut samples = Vec::new();
        for pid in pids {
            if let Some(sample) = self.collect_process(pid) {
                samples.push(sample);
            }
        }
        samples
    }

    /// Reads one process. Returns `None` when a required record is missing
    /// or malformed, or the name does not pass the filter.
    fn collect_process(&self, pid: u32) -> Option<ProcessSample> {
        let stat_path = format!("{}/{}/stat", self.proc_path, pid);
        let stat_content = self.fs.read_to_string(Path::new(&stat_path)).ok()?;
        let stat = match parse_proc_stat(&stat_content) {
            Ok(stat) => stat,
            Err(e) => {
                debug!("skipping pid {}: {}", pid, e);
                return None;
            }
        };

        let statm_path = format!("{}/{}/statm", self.proc_path, pid);
        let statm_content = self.fs.read_to_string(Path::new(&statm_path)).ok()?;
        let statm = match parse_statm(&statm_content) {
            Ok(statm) => statm,
            Err(e) => {
                debug!("skipping pid {}: {}", pid, e);
                return None;
            }
        };

        if !self.filter.matches(&stat.comm) {
            return None;
        }

        Some(ProcessSample {
            pid,
            name: stat.comm,
            memory_kb: statm.resident * self.page_size / 1024,
            cpu_user: stat.utime,
            cpu_system: stat.stime,
            threads: self.collect_threads(pid),
        })
    }

    /// Collects the thread table of one process, skipping threads whose
    /// records cannot be read or parsed.
    fn collect_threads(&self, pid: u32) -> Vec<ThreadSample> {
        let task_path = format!("{}/{}/task", self.proc_path, pid);
        let mut tids = self.numeric_entries(Path::new(&task_path));
        tids.sort_unstable();

        let mut threads = Vec::new();
        for tid in tids {
            let stat_path = format!("{}/{}/task/{}/stat", self.proc_path, pid, tid);
            let Ok(content) = self.fs.read_to_string(Path::new(&stat_path)) else {
                continue;
            };
            let stat = match parse_proc_stat(&content) {
                Ok(stat) => stat,
                Err(e) => {
                    debug!("skipping tid {} of pid {}: {}", tid, pid, e);
                    continue;
                }
            };
            threads.push(ThreadSample {
                tid,
                priority: stat.priority,
                cpu_user: stat.utime,
                cpu_system: stat.stime,
            });
        }
        threads
    }

    /// Numeric directory entries (pids or tids) under `dir`.
    fn numeric_entries(&self, dir: &Path) -> Vec<u32> {
        match self.fs.read_dir(dir) {
            Ok(entries) => entries
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
                .filter_map(|name| name.parse::<u32>().ok())
                .collect(),
            Err(e) => {
                debug!("failed to list {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }
}
