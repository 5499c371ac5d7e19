//! Renders a snapshot into one framed wire document.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{ProcessSample, Snapshot, ThreadSample};
use crate::wire::value::Value;

/// Two-byte frame delimiter terminating every document. Receivers split the
/// byte stream on it; string scalars can never contain it unescaped.
const FRAME_DELIMITER: &str = "\r\n";

/// Renders the document, stamping the current time. One call per tick.
pub fn encode_snapshot(snapshot: &Snapshot) -> String {
    encode_snapshot_at(snapshot, unix_millis())
}

/// Renders the document with an explicit encode-time timestamp
/// (milliseconds since epoch).
///
/// The trailing `json_length` diagnostic approximates the document size in
/// kilobytes and is derived from everything rendered before it.
pub fn encode_snapshot_at(snapshot: &Snapshot, timestamp_ms: i64) -> String {
    let mut out = String::with_capacity(1024);
    out.push('{');
    for (key, value) in document_fields(snapshot, timestamp_ms) {
        out.push('"');
        out.push_str(key);
        out.push_str("\":");
        value.render(&mut out);
        out.push(',');
    }

    let approx_kb = out.len().div_ceil(1024);
    out.push_str("\"json_length\":");
    out.push_str(&approx_kb.to_string());
    out.push('}');
    out.push_str(FRAME_DELIMITER);
    out
}

/// Document fields in wire order. `json_length` is appended separately since
/// it is derived from the rendered size of everything listed here.
fn document_fields(snapshot: &Snapshot, timestamp_ms: i64) -> Vec<(&'static str, Value)> {
    vec![
        ("timestamp", Value::from(timestamp_ms)),
        (
            "processor_frequency",
            Value::list(snapshot.processor_frequency.iter().copied()),
        ),
        ("cpu_user", Value::list(snapshot.cpus.iter().map(|c| c.user))),
        (
            "cpu_system",
            Value::list(snapshot.cpus.iter().map(|c| c.system)),
        ),
        ("cpu_idle", Value::list(snapshot.cpus.iter().map(|c| c.idle))),
        (
            "cpu_iowait",
            Value::list(snapshot.cpus.iter().map(|c| c.iowait)),
        ),
        ("cpu_irq", Value::list(snapshot.cpus.iter().map(|c| c.irq))),
        (
            "cpu_softirq",
            Value::list(snapshot.cpus.iter().map(|c| c.softirq)),
        ),
        ("total_memory", Value::from(snapshot.total_memory_kb)),
        ("free_memory", Value::from(snapshot.free_memory_kb)),
        (
            "processes",
            Value::list(snapshot.processes.iter().map(process_value)),
        ),
    ]
}

fn process_value(process: &ProcessSample) -> Value {
    Value::Object(vec![
        ("pid".to_string(), Value::from(process.pid)),
        ("name".to_string(), Value::from(process.name.as_str())),
        ("memory".to_string(), Value::from(process.memory_kb)),
        ("cpu_user".to_string(), Value::from(process.cpu_user)),
        ("cpu_system".to_string(), Value::from(process.cpu_system)),
        (
            "threads".to_string(),
            Value::list(process.threads.iter().map(thread_value)),
        ),
    ])
}

fn thread_value(thread: &ThreadSample) -> Value {
    Value::Object(vec![
        ("tid".to_string(), Value::from(thread.tid)),
        ("priority".to_string(), Value::from(thread.priority)),
        ("cpu_user".to_string(), Value::from(thread.cpu_user)),
        ("cpu_system".to_string(), Value::from(thread.cpu_system)),
    ])
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoreUsage;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            total_memory_kb: 16384000,
            free_memory_kb: 8192000,
            processor_frequency: vec![1800, 2112],
            cpus: vec![
                CoreUsage {
                    user: 10,
                    nice: 20,
                    system: 30,
                    idle: 40,
                    iowait: 5,
                    irq: 6,
                    softirq: 7,
                    steal: 8,
                    ..Default::default()
                },
                CoreUsage {
                    user: 11,
                    nice: 21,
                    system: 31,
                    idle: 41,
                    iowait: 51,
                    irq: 61,
                    softirq: 71,
                    ..Default::default()
                },
            ],
            processes: vec![ProcessSample {
                pid: 1203,
                name: "bash".to_string(),
                memory_kb: 8000,
                cpu_user: 120,
                cpu_system: 80,
                threads: vec![ThreadSample {
                    tid: 1203,
                    priority: 20,
                    cpu_user: 70,
                    cpu_system: 50,
                }],
            }],
        }
    }

    const DOCUMENT_KEYS: [&str; 12] = [
        "timestamp",
        "processor_frequency",
        "cpu_user",
        "cpu_system",
        "cpu_idle",
        "cpu_iowait",
        "cpu_irq",
        "cpu_softirq",
        "total_memory",
        "free_memory",
        "processes",
        "json_length",
    ];

    #[test]
    fn document_is_framed_with_crlf() {
        let doc = encode_snapshot_at(&sample_snapshot(), 1700000000123);
        assert!(doc.ends_with("}\r\n"));
        // The delimiter appears exactly once, at the end.
        assert_eq!(doc.matches("\r\n").count(), 1);
    }

    #[test]
    fn every_field_appears_once_in_wire_order() {
        // No processes here: process and thread objects reuse the cpu_*
        // key names, so the exactly-once property holds at the top level.
        let doc = encode_snapshot_at(&Snapshot::default(), 1700000000123);

        let mut last = 0;
        for key in DOCUMENT_KEYS {
            let needle = format!("\"{}\":", key);
            assert_eq!(doc.matches(&needle).count(), 1, "field {}", key);
            let pos = doc.find(&needle).unwrap();
            assert!(pos >= last, "field {} out of order", key);
            last = pos;
        }
    }

    #[test]
    fn document_is_valid_json() {
        let doc = encode_snapshot_at(&sample_snapshot(), 1700000000123);
        let parsed: serde_json::Value = serde_json::from_str(doc.trim_end()).unwrap();

        assert_eq!(parsed["timestamp"], 1700000000123i64);
        assert_eq!(parsed["processor_frequency"][1], 2112);
        assert_eq!(parsed["cpu_user"][0], 10);
        assert_eq!(parsed["cpu_softirq"][1], 71);
        assert_eq!(parsed["total_memory"], 16384000);
        assert_eq!(parsed["free_memory"], 8192000);

        let process = &parsed["processes"][0];
        assert_eq!(process["pid"], 1203);
        assert_eq!(process["name"], "bash");
        assert_eq!(process["memory"], 8000);
        assert_eq!(process["threads"][0]["tid"], 1203);
        assert_eq!(process["threads"][0]["priority"], 20);
    }

    #[test]
    fn cpu_lists_have_one_entry_per_usage_line() {
        let doc = encode_snapshot_at(&sample_snapshot(), 0);
        let parsed: serde_json::Value = serde_json::from_str(doc.trim_end()).unwrap();
        for key in ["cpu_user", "cpu_system", "cpu_idle", "cpu_iowait", "cpu_irq", "cpu_softirq"] {
            assert_eq!(parsed[key].as_array().unwrap().len(), 2, "list {}", key);
        }
    }

    #[test]
    fn empty_snapshot_renders_empty_lists() {
        let doc = encode_snapshot_at(&Snapshot::default(), 0);
        let parsed: serde_json::Value = serde_json::from_str(doc.trim_end()).unwrap();

        assert!(doc.contains("\"processes\":[]"));
        assert!(doc.contains("\"processor_frequency\":[]"));
        assert_eq!(parsed["total_memory"], 0);
    }

    #[test]
    fn json_length_rounds_bytes_up_to_kilobytes() {
        // A small document: everything before json_length is under 1 KiB.
        let doc = encode_snapshot_at(&Snapshot::default(), 0);
        let parsed: serde_json::Value = serde_json::from_str(doc.trim_end()).unwrap();
        assert_eq!(parsed["json_length"], 1);

        // Pad past one kilobyte through a long process name.
        let mut snapshot = sample_snapshot();
        snapshot.processes[0].name = "x".repeat(2048);
        let doc = encode_snapshot_at(&snapshot, 0);
        let parsed: serde_json::Value = serde_json::from_str(doc.trim_end()).unwrap();
        assert_eq!(parsed["json_length"], 3);
    }

    #[test]
    fn hostile_process_name_stays_inside_its_quotes() {
        let mut snapshot = sample_snapshot();
        snapshot.processes[0].name = "evil\r\nname with \"quotes\"".to_string();
        let doc = encode_snapshot_at(&snapshot, 0);

        // Still exactly one frame delimiter, and the document still parses.
        assert_eq!(doc.matches("\r\n").count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(doc.trim_end()).unwrap();
        assert_eq!(parsed["processes"][0]["name"], "evil  name with \"quotes\"");
    }

    #[test]
    fn json_length_is_the_last_field() {
        let doc = encode_snapshot_at(&sample_snapshot(), 0);
        let tail_pos = doc.rfind("\"json_length\":").unwrap();
        assert!(!doc[tail_pos..].contains(','));
    }
}
