//! Errors produced while loading rules.

use std::path::PathBuf;

/// Errors that can occur while a [`RuleSource`](crate::source::RuleSource)
/// loads rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule file does not exist.
    #[error("rule file {} not found", .0.display())]
    Missing(PathBuf),

    /// The rule path exists but is not a regular file.
    #[error("rule path {} is not a file", .0.display())]
    NotAFile(PathBuf),

    /// The rule file exceeds the size ceiling.
    #[error("rule file {} is {size} bytes, limit is {limit}", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Stat or read failed.
    #[error("reading rule file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RuleError {
    /// The file is absent or unusable, as opposed to a failed read.
    ///
    /// Callers fall back to the default ruleset for these; a failed read keeps
    /// whatever ruleset is already active.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, RuleError::Io { .. })
    }

    /// Whether the error deserves a line on the error path.
    ///
    /// A missing rule file is the normal state of an unconfigured process.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, RuleError::Missing(_))
    }
}

/// Result alias for rule loading.
pub type Result<T> = std::result::Result<T, RuleError>;
