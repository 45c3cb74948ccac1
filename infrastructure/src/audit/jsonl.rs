//! JSONL file writer for audit entries.
//!
//! Each [`AuditEntry`] is serialized as a single JSON line with a
//! `recorded_at` RFC3339 timestamp, appended via a buffered writer.

use super::AuditAppend;
use plenary_domain::AuditEntry;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL audit log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every entry
/// (the log is the durable record of retroactive mutations) and on `Drop`.
pub struct JsonlAuditLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Open the log at the given path, appending to an existing file.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create audit log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditAppend for JsonlAuditLog {
    fn append(&self, entry: &AuditEntry) {
        let recorded_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = match serde_json::to_value(entry) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "recorded_at".to_string(),
                    serde_json::Value::String(recorded_at),
                );
                serde_json::Value::Object(map)
            }
            _ => return,
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlAuditLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plenary_domain::AuditAction;
    use std::io::Read;

    fn entry(justification: &str) -> AuditEntry {
        AuditEntry::new(
            "pres.rocha",
            "s-1",
            AuditAction::RetroactiveBallots {
                proposal: "plc-12".into(),
                round: 1,
                ballots: 3,
            },
            justification,
        )
    }

    #[test]
    fn test_audit_log_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = JsonlAuditLog::open(&path).unwrap();

        log.append(&entry("minutes contested"));
        log.append(&entry("recount ordered"));
        drop(log);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("recorded_at").is_some());
            assert_eq!(value["action"]["kind"], "retroactive_ballots");
        }

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["justification"], "minutes contested");
        assert_eq!(first["actor"], "pres.rocha");
    }

    #[test]
    fn test_audit_log_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        {
            let log = JsonlAuditLog::open(&path).unwrap();
            log.append(&entry("first"));
        }
        {
            let log = JsonlAuditLog::open(&path).unwrap();
            log.append(&entry("second"));
        }

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }
}
