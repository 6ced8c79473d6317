//! Progress reporting for pipeline stages.
//!
//! Stages never print. They receive a `&dyn LogSink` and push [`LogEntry`]
//! values into it; the binary installs a [`TracingSink`], tests use a
//! [`MemorySink`] to assert on what was reported.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Log level of a progress entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
}

/// Pipeline stage emitting the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Load,
    Transform,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Transform => "transform",
            Stage::Write => "write",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub stage: Stage,
    pub message: String,
}

impl LogEntry {
    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, stage, message: message.into() }
    }

    pub fn success(stage: Stage, message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, stage, message: message.into() }
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, stage, message: message.into() }
    }
}

/// Receiver of progress entries.
pub trait LogSink {
    fn log(&self, entry: LogEntry);
}

/// Convenient logging functions over any sink
pub fn log_info(sink: &dyn LogSink, stage: Stage, msg: impl Into<String>) {
    sink.log(LogEntry::info(stage, msg));
}

pub fn log_success(sink: &dyn LogSink, stage: Stage, msg: impl Into<String>) {
    sink.log(LogEntry::success(stage, msg));
}

pub fn log_warning(sink: &dyn LogSink, stage: Stage, msg: impl Into<String>) {
    sink.log(LogEntry::warning(stage, msg));
}

/// Forwards entries to `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, entry: LogEntry) {
        let stage = entry.stage.as_str();
        match entry.level {
            LogLevel::Info => tracing::info!(stage = stage, "{}", entry.message),
            LogLevel::Success => tracing::info!(stage = stage, success = true, "{}", entry.message),
            LogLevel::Warning => tracing::warn!(stage = stage, "{}", entry.message),
        }
    }
}

/// Collects entries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Entries logged by one stage
    pub fn stage_entries(&self, stage: Stage) -> Vec<LogEntry> {
        self.entries().into_iter().filter(|e| e.stage == stage).collect()
    }
}

impl LogSink for MemorySink {
    fn log(&self, entry: LogEntry) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry);
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _entry: LogEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        log_info(&sink, Stage::Load, "reading");
        log_success(&sink, Stage::Load, "done");
        log_warning(&sink, Stage::Write, "slow disk");

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "reading");
        assert_eq!(entries[1].level, LogLevel::Success);
        assert_eq!(sink.stage_entries(Stage::Write).len(), 1);
    }

    #[test]
    fn test_null_sink_accepts_entries() {
        let sink = NullSink;
        log_info(&sink, Stage::Transform, "joined");
    }
}
