//! In-memory mock process table for testing the collectors without a live
//! kernel.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for tests.
///
/// Stores files and directories in memory so tests can simulate process
/// tables in any state, including half-vanished processes and malformed
/// records.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content. Parent directories are created
    /// automatically.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Adds a process entry with its status and memory records and an empty
    /// thread table.
    pub fn add_process(&mut self, pid: u32, stat: &str, statm: &str) {
        let base = PathBuf::from(format!("/proc/{}", pid));
        self.add_file(base.join("stat"), stat);
        self.add_file(base.join("statm"), statm);
        self.add_dir(base.join("task"));
    }

    /// Adds a thread entry under an existing process.
    pub fn add_thread(&mut self, pid: u32, tid: u32, stat: &str) {
        let path = PathBuf::from(format!("/proc/{}/task/{}/stat", pid, tid));
        self.add_file(path, stat);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();
        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }
        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}

impl MockFs {
    /// A small but realistic system: init, a shell with two threads, and a
    /// browser worker whose name contains a space.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
",
        );

        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 50 0 0
cpu0 5000 250 1500 40000 500 100 50 25 0 0
cpu1 5000 250 1500 40000 500 100 50 25 0 0
intr 1000000 50 0 0 0
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );

        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
cpu MHz\t\t: 1800.000
cache size\t: 8192 KB
processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
cpu MHz\t\t: 2112.421
cache size\t: 8192 KB
",
        );

        // PID 1 - init, single thread
        fs.add_process(
            1,
            "1 (systemd) S 0 1 1 0 -1 4194560 50000 1000000 100 500 1000 500 2000 1000 20 0 1 0 1 170000000 3000 18446744073709551615 0 0 0 0 0 0 0 0 1073745152 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "42500 3000 1500 200 0 5000 0",
        );
        fs.add_thread(
            1,
            1,
            "1 (systemd) S 0 1 1 0 -1 4194560 50000 1000000 100 500 600 400 2000 1000 20 0 1 0 1 170000000 3000 18446744073709551615 0 0 0 0 0 0 0 0 1073745152 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );

        // PID 1203 - bash, two threads
        fs.add_process(
            1203,
            "1203 (bash) S 1200 1203 1203 34816 1203 4194304 5000 50000 0 0 120 80 200 100 20 0 2 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "6250 2000 800 150 0 900 0",
        );
        fs.add_thread(
            1203,
            1203,
            "1203 (bash) S 1200 1203 1203 34816 1203 4194304 5000 50000 0 0 70 50 200 100 20 0 2 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );
        fs.add_thread(
            1203,
            1210,
            "1210 (bash) S 1200 1203 1203 34816 1203 4194304 0 0 0 0 50 30 0 0 20 0 2 0 100200 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );

        // PID 740 - browser worker with a space in its name
        fs.add_process(
            740,
            "740 (Web Content) S 700 740 740 0 -1 4194304 100 0 0 0 900 250 0 0 20 0 4 0 5000 2500000000 51200 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 3 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "610000 51200 9000 300 0 120000 0",
        );
        fs.add_thread(
            740,
            740,
            "740 (Web Content) S 700 740 740 0 -1 4194304 100 0 0 0 400 100 0 0 20 0 4 0 5000 2500000000 51200 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 3 0 0 0 0 0 0 0 0 0 0 0 0 0",
        );

        fs
    }

    /// Like [`typical_system`](Self::typical_system), plus a process whose
    /// command name itself contains parentheses.
    pub fn with_special_names() -> Self {
        let mut fs = Self::typical_system();
        fs.add_process(
            741,
            "741 ((sd-pam)) S 1 741 741 0 -1 1077936448 30 0 0 0 3 1 0 0 20 0 1 0 180 175104000 1100 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "42750 1100 900 1 0 700 0",
        );
        fs
    }
}
