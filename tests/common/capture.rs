//! In-memory sink that records everything written to it.

use rlog::{Record, Severity, Sink};
use std::sync::{Arc, Mutex};

/// Sink that keeps every record it receives. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct CaptureSink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.records().iter().map(|r| r.tag().to_string()).collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(Record::line).collect()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records().iter().filter(|r| r.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

impl Sink for CaptureSink {
    fn write(&self, record: &Record) {
        self.records.lock().unwrap().push(record.clone());
    }
}
