use super::types::ViolationKind;
use crate::error::AuditError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub const DEFAULT_QUERY_LIMIT: usize = 40;
pub const MAX_QUERY_LIMIT: usize = 200;

/// Bytes read from the end of the log per query. Holds `MAX_QUERY_LIMIT`
/// events at the default stored-text caps with room to spare.
pub const TAIL_WINDOW_BYTES: u64 = 1024 * 1024;

/// One blocked reply. Written once, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailEvent {
    pub at: String,
    pub violations: Vec<ViolationKind>,
    pub likely_local_intent: bool,
    pub user_message: String,
    pub assistant_message: String,
}

impl GuardrailEvent {
    pub fn now(
        violations: Vec<ViolationKind>,
        likely_local_intent: bool,
        user_message: impl Into<String>,
        assistant_message: impl Into<String>,
    ) -> Self {
        Self {
            at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            violations,
            likely_local_intent,
            user_message: user_message.into(),
            assistant_message: assistant_message.into(),
        }
    }
}

/// Append-only JSON-lines log of guardrail blocks.
#[derive(Debug)]
pub struct GuardrailAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl GuardrailAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event. The file and its parent directory are created on
    /// first use. The line is written with a single call while holding the
    /// lock so concurrent appends never interleave.
    pub fn record(&self, event: &GuardrailEvent) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let append_err = |err: std::io::Error| AuditError::Append {
            path: self.path.display().to_string(),
            message: err.to_string(),
        };

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(append_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(append_err)?;
        file.write_all(line.as_bytes()).map_err(append_err)?;
        Ok(())
    }

    /// Last `TAIL_WINDOW_BYTES` of the log, starting at a line boundary.
    fn read_tail(&self) -> std::io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len <= TAIL_WINDOW_BYTES {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            return Ok(bytes);
        }

        // One byte before the window, so a line starting exactly at the
        // window edge is kept whole.
        let start = len - TAIL_WINDOW_BYTES - 1;
        file.seek(SeekFrom::Start(start))?;
        let mut bytes = Vec::new();
        file.take(TAIL_WINDOW_BYTES + 1).read_to_end(&mut bytes)?;
        match bytes.iter().position(|&b| b == b'\n') {
            Some(first_newline) => {
                bytes.drain(..=first_newline);
            }
            None => bytes.clear(),
        }
        Ok(bytes)
    }

    /// Up to `limit` events, newest first. `limit` is clamped to
    /// `1..=MAX_QUERY_LIMIT`. Only the tail of the log is read. A missing or
    /// unreadable log is empty, and lines that fail to decode are skipped
    /// one by one.
    pub fn query(&self, limit: usize) -> Vec<GuardrailEvent> {
        let limit = limit.clamp(1, MAX_QUERY_LIMIT);
        let bytes = match self.read_tail() {
            Ok(bytes) => bytes,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), "guardrail log unreadable: {err}");
                }
                return Vec::new();
            }
        };
        let text = String::from_utf8_lossy(&bytes);

        let mut events: Vec<GuardrailEvent> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::debug!("skipping malformed guardrail line: {err}");
                    None
                }
            })
            .collect();

        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
        events.reverse();
        events
    }

    /// Number of recent blocks, capped at `MAX_QUERY_LIMIT`.
    pub fn recent_block_count(&self) -> usize {
        self.query(MAX_QUERY_LIMIT).len()
    }
}
