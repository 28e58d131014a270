//! Step-by-step algorithm trace.
//!
//! When the `trace` feature is enabled, key events of a run are written to a
//! [`TraceWriter`] attached to the engine. Two runs with the same
//! configuration produce identical traces, which makes the output suitable
//! for line-by-line regression comparison.
//!
//! The trace output format is a series of tagged lines:
//! ```text
//! TRACE INIT nfev=<n> fbest=<val> nboxes=<n> ranking=[d1,d2,...]
//! TRACE SWEEP n=<n> level=<s> fbest=<val> nfev=<n>
//! TRACE SELECT box=<id> level=<s> f=<val> n0min=<k>
//! TRACE SPLIT box=<id> kind=<rank|gain|none> dim=<d> at=<val|list>
//! TRACE BASKET x=[..] f=<val> action=<skip|merged|search>
//! TRACE LOCAL start_f=<val> f=<val> nfev=<n>
//! ```

use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

/// A thread-safe buffer that collects trace lines.
pub struct TraceWriter {
    buffer: Mutex<String>,
}

impl TraceWriter {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(String::with_capacity(64 * 1024)),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write a trace line.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.buffer();
        buf.push_str(line);
        buf.push('\n');
    }

    /// Write a formatted trace line using format args.
    pub fn write_fmt(&self, args: std::fmt::Arguments<'_>) {
        let mut buf = self.buffer();
        let _ = buf.write_fmt(args);
        buf.push('\n');
    }

    /// Get all collected trace output.
    pub fn get_output(&self) -> String {
        self.buffer().clone()
    }

    /// Get trace output as a vector of lines.
    pub fn get_lines(&self) -> Vec<String> {
        self.buffer().lines().map(|s| s.to_string()).collect()
    }

    /// Lines starting with `TRACE <tag>`.
    pub fn lines_tagged(&self, tag: &str) -> Vec<String> {
        let prefix = format!("TRACE {} ", tag);
        self.buffer()
            .lines()
            .filter(|s| s.starts_with(&prefix))
            .map(|s| s.to_string())
            .collect()
    }

    /// Discard everything collected so far.
    pub fn clear(&self) {
        self.buffer().clear();
    }

    /// Also write trace output to stderr for debugging.
    pub fn dump_to_stderr(&self) {
        let buf = self.buffer();
        let _ = std::io::stderr().write_all(buf.as_bytes());
    }
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro for conditional trace output (only active with `trace` feature).
#[cfg(feature = "trace")]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if let Some(ref tw) = $tracer {
            tw.write_fmt(format_args!($($arg)*));
        }
    };
}

/// No-op when trace feature is disabled.
#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {};
}
