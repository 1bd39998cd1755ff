//! JSONL audit trail for pipeline decisions.
//!
//! Each [`AuditEvent`] is serialized as a single JSON line with `stage`,
//! `trace_id` and `timestamp` fields, appended via a buffered writer.
//! Thread-safe via `Mutex<BufWriter<File>>`; flushed after every line so
//! the trail survives a crash.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use herald_application::ports::audit::{AuditEvent, AuditSink};

/// Audit sink writing one JSON object per line.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Open (or create) the audit file in append mode.
    ///
    /// Creates parent directories if needed. Returns `None` when the file
    /// cannot be opened; auditing is optional and must not fail startup.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
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

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditLogger {
    fn record(&self, event: AuditEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = match event.payload {
            serde_json::Value::Object(mut map) => {
                map.insert("stage".to_string(), event.stage.into());
                map.insert(
                    "trace_id".to_string(),
                    event.trace_id.map(Into::into).unwrap_or(serde_json::Value::Null),
                );
                map.insert("timestamp".to_string(), timestamp.into());
                serde_json::Value::Object(map)
            }
            other => serde_json::json!({
                "stage": event.stage,
                "trace_id": event.trace_id,
                "timestamp": timestamp,
                "payload": other,
            }),
        };

        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(_) => return,
        };
        if let Err(e) = serde_json::to_writer(&mut *writer, &record)
            .map_err(std::io::Error::other)
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush())
        {
            warn!("Could not write audit record: {}", e);
        }
    }
}
