//! System-wide collection from `/proc/`.

use std::path::Path;

use tracing::debug;

use crate::collector::procfs::CollectError;
use crate::collector::procfs::parser::{MemInfo, parse_cpu_frequencies, parse_cpu_line, parse_meminfo};
use crate::collector::traits::FileSystem;
use crate::model::CoreUsage;

/// Collects system-wide metrics from `/proc/`.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Collects memory totals from the memory-info source.
    pub fn collect_memory(&self) -> Result<MemInfo, CollectError> {
        let path = format!("{}/meminfo", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        Ok(parse_meminfo(&content)?)
    }

    /// Collects every `cpu…` usage line, aggregate line first, then
    /// per-core, in record order. Malformed lines are skipped.
    pub fn collect_cpu_usage(&self) -> Result<Vec<CoreUsage>, CollectError> {
        let path = format!("{}/stat", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;

        Ok(content
            .lines()
            .filter(|line| line.starts_with("cpu"))
            .filter_map(|line| match parse_cpu_line(line) {
                Ok(usage) => Some(usage),
                Err(e) => {
                    debug!("skipping usage line: {}", e);
                    None
                }
            })
            .collect())
    }

    /// Collects per-core processor frequencies in whole megahertz.
    pub fn collect_frequencies(&self) -> Result<Vec<u64>, CollectError> {
        let path = format!("{}/cpuinfo", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        Ok(parse_cpu_frequencies(&content))
    }
}
