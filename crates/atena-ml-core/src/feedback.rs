//! Feedback capture.
//!
//! Completed sessions are recorded for a later manual retrain. Nothing here
//! touches the live predictor.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::SessionRecord;

/// Destination for completed-session feedback.
pub trait FeedbackSink: Send + Sync {
    /// Record one session. Field validation happens before this is called.
    fn record(&self, session: &SessionRecord) -> Result<()>;

    /// Record a payload exactly as the caller sent it, with no field checks.
    fn record_raw(&self, payload: &Value) -> Result<()>;

    /// Entries recorded so far.
    fn recorded_count(&self) -> usize;
}

/// Logs each session and counts it. Nothing is persisted.
#[derive(Debug, Default)]
pub struct LoggingFeedbackSink {
    count: AtomicUsize,
}

impl LoggingFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackSink for LoggingFeedbackSink {
    fn record(&self, session: &SessionRecord) -> Result<()> {
        let payload = serde_json::to_string(session)?;
        info!(session = %payload, "Received feedback for session");
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn record_raw(&self, payload: &Value) -> Result<()> {
        info!(session = %payload, "Received feedback for session");
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn recorded_count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

/// Appends each entry as one JSON line to a log file.
///
/// The entry count is read from the file once, when the sink is created.
#[derive(Debug)]
pub struct JsonlFeedbackSink {
    path: PathBuf,
    write_lock: Mutex<()>,
    count: AtomicUsize,
}

impl JsonlFeedbackSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let count = AtomicUsize::new(line_count(&path));
        Self {
            path,
            write_lock: Mutex::new(()),
            count,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every logged entry that is a complete session record.
    ///
    /// A missing file is an empty log. Partial entries are skipped.
    pub fn read_all(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)?;
        let mut records = Vec::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = lineno + 1, error = %e, "Skipping partial feedback entry"),
            }
        }
        Ok(records)
    }

    fn append(&self, line: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{line}\n").as_bytes())?;
        file.flush()?;

        self.count.fetch_add(1, Ordering::Relaxed);
        debug!(path = %self.path.display(), "Appended feedback line");
        Ok(())
    }
}

fn line_count(path: &Path) -> usize {
    let Ok(file) = fs::File::open(path) else {
        return 0;
    };
    BufReader::new(file)
        .lines()
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .count()
}

impl FeedbackSink for JsonlFeedbackSink {
    fn record(&self, session: &SessionRecord) -> Result<()> {
        self.append(&serde_json::to_string(session)?)?;
        info!(subject = %session.subject, "Feedback received");
        Ok(())
    }

    fn record_raw(&self, payload: &Value) -> Result<()> {
        self.append(&payload.to_string())?;
        info!("Feedback received");
        Ok(())
    }

    fn recorded_count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}
