//! Core types for rlog-core.
//!
//! This module defines the data shared across the filter, the emitter and the
//! sinks: the [`RuleSet`] alias, the [`Severity`] of an emission, the
//! [`CallSite`] it came from, and the [`Record`] handed to a sink.

use std::panic::Location;

/// An ordered list of enabled scope prefixes.
///
/// Order does not affect matching and duplicates are harmless; the file-backed
/// source deduplicates anyway.
pub type RuleSet = Vec<String>;

/// The wildcard rule. A ruleset containing it enables every scope.
pub const WILDCARD: &str = "*";

/// Scope consulted by the global (handle-less) `info` form.
pub const DEFAULT_SCOPE: &str = "default";

/// Whether a record came from the unconditional or the filtered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Source location of a logging call, trimmed to the last two path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

impl CallSite {
    /// Resolve the location of the caller.
    ///
    /// Every function between the user's call and this one must carry
    /// `#[track_caller]` for the user's location to come through.
    #[track_caller]
    pub fn capture() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: trim_path(location.file()),
            line: location.line(),
        }
    }

    /// Placeholder used when no location is available.
    pub fn unknown() -> Self {
        Self {
            file: "???".to_string(),
            line: 0,
        }
    }
}

impl std::fmt::Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Keep the last two segments of a path, accepting either separator.
fn trim_path(file: &str) -> String {
    let segments: Vec<&str> = file.split(['/', '\\']).collect();
    let start = segments.len().saturating_sub(2);
    segments[start..].join("/")
}

/// A single emission as handed to a [`Sink`](crate::sink::Sink).
///
/// `fields` is the ordered list of display strings: the tag, the caller
/// location, then one entry per caller-supplied argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub severity: Severity,
    pub fields: Vec<String>,
}

impl Record {
    pub fn new<I, T>(severity: Severity, tag: String, site: &CallSite, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        let mut fields = vec![tag, site.to_string()];
        fields.extend(args.into_iter().map(|arg| arg.to_string()));
        Self { severity, fields }
    }

    pub fn tag(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    pub fn location(&self) -> &str {
        self.fields.get(1).map(String::as_str).unwrap_or_default()
    }

    /// Caller-supplied arguments, rendered.
    pub fn args(&self) -> &[String] {
        self.fields.get(2..).unwrap_or(&[])
    }

    /// The fields joined by single spaces, without timestamp or colour.
    pub fn line(&self) -> String {
        self.fields.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
