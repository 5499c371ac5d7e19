//! Parsers for the fixed-format accounting records under `/proc`.
//!
//! These are pure functions over string content so they can be tested
//! without a live process table. A record whose field count or field types
//! do not match expectations yields a [`ParseError`]; callers treat that as
//! "skip this entity", never as a fatal condition.

use crate::model::CoreUsage;

/// Error type for record parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Fields consumed from a process or thread status record
/// (`/proc/[pid]/stat`, `/proc/[pid]/task/[tid]/stat`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    pub state: char,
    pub utime: u64,
    pub stime: u64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: i64,
}

/// Minimum field count after the comm field. Kernels append trailing fields
/// over time, so longer records are accepted; shorter ones are malformed.
const STAT_MIN_FIELDS: usize = 42;

/// Parses a status record line.
///
/// The comm field can contain spaces and parentheses, so it is delimited by
/// the first `'('` and the *last* `')'`; only the remainder is
/// whitespace-split.
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let content = content.trim();

    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in status record"))?;
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in status record"))?;
    if close_paren <= open_paren {
        return Err(ParseError::new("invalid parentheses in status record"));
    }

    let pid: u32 = content[..open_paren]
        .trim()
        .parse()
        .map_err(|_| ParseError::new("invalid pid"))?;
    let comm = content[open_paren + 1..close_paren].to_string();

    let fields: Vec<&str> = content[close_paren + 1..].split_whitespace().collect();
    if fields.len() < STAT_MIN_FIELDS {
        return Err(ParseError::new(format!(
            "short status record: expected {}+ fields, got {}",
            STAT_MIN_FIELDS,
            fields.len()
        )));
    }

    let field_u64 = |idx: usize, name: &str| -> Result<u64, ParseError> {
        fields[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };
    let field_i64 = |idx: usize, name: &str| -> Result<i64, ParseError> {
        fields[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };

    Ok(ProcStat {
        pid,
        comm,
        state: fields[0].chars().next().unwrap_or('?'),
        utime: field_u64(11, "utime")?,
        stime: field_u64(12, "stime")?,
        priority: field_i64(15, "priority")?,
        nice: field_i64(16, "nice")?,
        num_threads: field_i64(17, "num_threads")?,
    })
}

/// Fields of the per-process memory record (`/proc/[pid]/statm`), in pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatM {
    pub size: u64,
    pub resident: u64,
    pub shared: u64,
    pub text: u64,
    pub lib: u64,
    pub data: u64,
    pub dt: u64,
}

/// The memory record has had exactly seven fields since kernel 2.6.
const STATM_FIELDS: usize = 7;

/// Parses the per-process memory record.
pub fn parse_statm(content: &str) -> Result<StatM, ParseError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() != STATM_FIELDS {
        return Err(ParseError::new(format!(
            "memory record: expected {} fields, got {}",
            STATM_FIELDS,
            fields.len()
        )));
    }

    let field = |idx: usize, name: &str| -> Result<u64, ParseError> {
        fields[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };

    Ok(StatM {
        size: field(0, "size")?,
        resident: field(1, "resident")?,
        shared: field(2, "shared")?,
        text: field(3, "text")?,
        lib: field(4, "lib")?,
        data: field(5, "data")?,
        dt: field(6, "dt")?,
    })
}

/// Parses one `cpu…` line of the usage source into [`CoreUsage`].
///
/// The first seven counters are required; steal/guest/guest_nice exist only
/// on extended formats and default to zero.
pub fn parse_cpu_line(line: &str) -> Result<CoreUsage, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.first().is_none_or(|name| !name.starts_with("cpu")) {
        return Err(ParseError::new("not a cpu usage line"));
    }
    if parts.len() < 8 {
        return Err(ParseError::new(format!(
            "cpu usage line: expected 7+ counters, got {}",
            parts.len() - 1
        )));
    }

    let required = |idx: usize, name: &str| -> Result<u64, ParseError> {
        parts[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };
    let optional = |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

    Ok(CoreUsage {
        user: required(1, "user")?,
        nice: required(2, "nice")?,
        system: required(3, "system")?,
        idle: required(4, "idle")?,
        iowait: required(5, "iowait")?,
        irq: required(6, "irq")?,
        softirq: required(7, "softirq")?,
        steal: optional(8),
        guest: optional(9),
        guest_nice: optional(10),
    })
}

/// System memory totals from the memory-info source, in kilobytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub free_kb: u64,
}

/// Extracts `MemTotal`/`MemFree` from the memory-info source.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let value_kb = |line: &str| {
        line.split_whitespace()
            .nth(1)
            .and_then(|s| s.parse::<u64>().ok())
    };

    let mut total = None;
    let mut free = None;
    for line in content.lines() {
        if line.starts_with("MemTotal:") {
            total = value_kb(line);
        } else if line.starts_with("MemFree:") {
            free = value_kb(line);
        }
        if total.is_some() && free.is_some() {
            break;
        }
    }

    match (total, free) {
        (Some(total_kb), Some(free_kb)) => Ok(MemInfo { total_kb, free_kb }),
        _ => Err(ParseError::new("missing MemTotal/MemFree in memory info")),
    }
}

/// Extracts per-core frequencies from the cpuinfo source, truncated to whole
/// megahertz. Lines that fail to parse are skipped.
pub fn parse_cpu_frequencies(content: &str) -> Vec<u64> {
    content
        .lines()
        .filter(|line| line.starts_with("cpu MHz"))
        .filter_map(|line| line.split(':').nth(1))
        .filter_map(|value| value.trim().parse::<f64>().ok())
        .map(|mhz| mhz as u64)
        .collect()
}
