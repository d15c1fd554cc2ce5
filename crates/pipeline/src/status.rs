// Append-only status output: the human-readable log the user watches.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Sink for human-readable status lines.
pub trait StatusLog: Send + Sync {
    fn append(&self, line: &str);
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl StatusLog for MemoryLog {
    fn append(&self, line: &str) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).push(line.to_string());
    }
}

/// Writes each line to stderr, keeping stdout free for results.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLog;

impl StatusLog for StderrLog {
    fn append(&self, line: &str) {
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}
