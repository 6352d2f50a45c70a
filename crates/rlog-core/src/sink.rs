//! Output sinks: where emitted records end up.
//!
//! A sink receives a fully assembled [`Record`]. [`StderrSink`] is the default;
//! [`TracingSink`] forwards into whatever `tracing` subscriber the host has
//! installed. Any `Fn(&Record)` closure is also a sink.

use std::io::{IsTerminal, Write};

use crate::types::{Record, Severity};

const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// Timestamp layout of the default sink, e.g. `2024/01/15 10:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Consumer of emitted records.
pub trait Sink: Send + Sync {
    fn write(&self, record: &Record);
}

impl<F> Sink for F
where
    F: Fn(&Record) + Send + Sync,
{
    fn write(&self, record: &Record) {
        self(record)
    }
}

// ---------------------------------------------------------------------------
// StderrSink
// ---------------------------------------------------------------------------

/// Writes one timestamped line per record to standard error.
#[derive(Debug, Clone, Copy)]
pub struct StderrSink {
    ansi: bool,
}

impl StderrSink {
    /// Colour error tags when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            ansi: std::io::stderr().is_terminal(),
        }
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Render a record as the line this sink writes, without the timestamp.
    pub fn render(&self, record: &Record) -> String {
        let mut fields = record.fields.iter();
        let mut line = String::new();
        if let Some(tag) = fields.next() {
            if self.ansi && record.severity == Severity::Error {
                line.push_str(RED);
                line.push_str(tag);
                line.push_str(RESET);
            } else {
                line.push_str(tag);
            }
        }
        for field in fields {
            line.push(' ');
            line.push_str(field);
        }
        line
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StderrSink {
    fn write(&self, record: &Record) {
        let ts = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let line = format!("{ts} {}\n", self.render(record));
        // Best effort: nothing sensible to do if stderr is gone.
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// Forwards records as `tracing` events under the `rlog` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, record: &Record) {
        let message = record.args().join(" ");
        match record.severity {
            Severity::Error => tracing::error!(
                target: "rlog",
                tag = record.tag(),
                location = record.location(),
                "{message}"
            ),
            Severity::Info => tracing::info!(
                target: "rlog",
                tag = record.tag(),
                location = record.location(),
                "{message}"
            ),
        }
    }
}
