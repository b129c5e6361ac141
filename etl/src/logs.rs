//! Run log: one timestamped line per lifecycle event.
//!
//! A [`ProgressLog`] is created at startup, passed by reference to every
//! stage, and closed at the end of the run. Where the lines go is decided by
//! the [`LogSink`] it owns: an append-only file in production, memory or
//! nowhere in tests. Every entry is also emitted as a `tracing` event.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format of the timestamp between the brackets.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log level, mapped onto `tracing` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// `[YYYY-MM-DD HH:MM:SS] message`
    pub fn line(&self) -> String {
        format!("[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.message)
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "log sink lock poisoned")
}

/// Appends lines to a file, creating it if needed.
pub struct FileLogSink {
    file: Mutex<File>,
}

impl FileLogSink {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileLogSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self.file.lock().map_err(|_| poisoned())?;
        writeln!(file, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        let mut file = self.file.lock().map_err(|_| poisoned())?;
        file.flush()
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryLogSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LogSink for MemoryLogSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().map_err(|_| poisoned())?.push(line.to_string());
        Ok(())
    }
}

/// Discards everything.
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// ProgressLog
// =============================================================================

/// Run log handed to every pipeline stage.
pub struct ProgressLog {
    sink: Box<dyn LogSink>,
    write_failed: AtomicBool,
}

impl ProgressLog {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            write_failed: AtomicBool::new(false),
        }
    }

    /// Open (or create) an append-only log file.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        Ok(Self::new(FileLogSink::open(path)?))
    }

    /// Log into memory; the returned handle reads the lines back.
    pub fn in_memory() -> (Self, MemoryLogSink) {
        let sink = MemoryLogSink::new();
        (Self::new(sink.clone()), sink)
    }

    pub fn null() -> Self {
        Self::new(NullLogSink)
    }

    /// Write an entry. A failing sink never interrupts the run.
    pub fn log(&self, entry: LogEntry) {
        match entry.level {
            LogLevel::Info | LogLevel::Success => tracing::info!("{}", entry.message),
            LogLevel::Warning => tracing::warn!("{}", entry.message),
            LogLevel::Error => tracing::error!("{}", entry.message),
        }

        if let Err(e) = self.sink.write_line(&entry.line()) {
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                tracing::warn!("run log write failed, further failures are silent: {}", e);
            }
        }
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.log(LogEntry::success(msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(LogEntry::error(msg));
    }

    /// Flush and release the sink.
    pub fn close(self) -> io::Result<()> {
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regex::Regex;
    use std::fs;

    struct FailingSink;

    impl LogSink for FailingSink {
        fn write_line(&self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_line_format() {
        let ts = Local.with_ymd_and_hms(2023, 9, 2, 18, 53, 26).unwrap();
        let entry = LogEntry::info("ETL process started").with_timestamp(ts);
        assert_eq!(entry.line(), "[2023-09-02 18:53:26] ETL process started");
    }

    #[test]
    fn test_memory_sink_collects_lines() {
        let (log, sink) = ProgressLog::in_memory();
        log.info("first");
        log.warning("second");
        log.error("third");

        let pattern = Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] (first|second|third)$").unwrap();
        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| pattern.is_match(l)), "{:?}", lines);
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn test_file_sink_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl_project_log.txt");

        let log = ProgressLog::to_file(&path).unwrap();
        log.info("run one");
        log.close().unwrap();

        let log = ProgressLog::to_file(&path).unwrap();
        log.success("run two");
        log.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] run one"));
        assert!(lines[1].ends_with("] run two"));
    }

    #[test]
    fn test_failing_sink_does_not_panic() {
        let log = ProgressLog::new(FailingSink);
        log.info("lost");
        log.info("also lost");
        assert!(log.write_failed.load(Ordering::Relaxed));
        log.close().unwrap();
    }

    #[test]
    fn test_null_sink() {
        let log = ProgressLog::null();
        log.info("nothing");
        log.close().unwrap();
    }
}
