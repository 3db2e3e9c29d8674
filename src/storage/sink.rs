//! Best-effort persistence of diagnostic records
//!
//! Persistence is diagnostic logging, not a durability guarantee: any
//! storage failure is logged and swallowed so it can never escalate into a
//! second fault while the first one is being handled.

use std::fs;
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::config::HandlerConfig;
use crate::fault::record::DiagnosticRecord;
use crate::util::paths::crash_logs_dir;

static CRASH_LOG_NAME: OnceLock<Regex> = OnceLock::new();

/// Write the full (untruncated) record to the configured or default crash
/// directory, creating it if absent. Returns the written file name, or
/// `None` on any storage error.
pub fn persist(record: &DiagnosticRecord, config: &HandlerConfig) -> Option<String> {
    let dir = config
        .storage_target_folder
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(crash_logs_dir);

    if let Err(e) = fs::create_dir_all(&dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "Failed to create crash log directory");
        return None;
    }

    let file_name = crash_file_name(&Local::now());
    let path = dir.join(&file_name);
    match fs::write(&path, record.text().as_bytes()) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Persisted crash log");
            Some(file_name)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to persist crash log");
            None
        }
    }
}

/// Deterministic crash log name: `crash-YYYY-MM-DD-HH-mm-ss-<epochMillis>.log`.
///
/// The epoch-millis component makes names unique within a process run; the
/// human-readable prefix keeps a directory listing sorted by creation time.
pub fn crash_file_name(at: &DateTime<Local>) -> String {
    format!(
        "crash-{}-{}.log",
        at.format("%Y-%m-%d-%H-%M-%S"),
        at.timestamp_millis()
    )
}

/// Whether a file name matches the fixed crash log pattern
pub fn is_crash_log_name(name: &str) -> bool {
    let pattern = CRASH_LOG_NAME.get_or_init(|| {
        Regex::new(r"^crash-\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}-\d+\.log$")
            .expect("crash log name pattern is valid")
    });
    pattern.is_match(name)
}
