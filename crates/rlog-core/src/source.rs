//! Rule sources: where the enabled scope prefixes come from.
//!
//! [`FileRuleSource`] is the default: a small newline-delimited file, one
//! prefix per line. Any `Fn() -> RuleSet` closure is also a source, which is
//! how callers replace the loading strategy entirely.

use std::path::{Path, PathBuf};

use crate::error::{Result, RuleError};
use crate::types::RuleSet;

/// Rule files larger than this are ignored rather than loaded.
pub const MAX_RULE_FILE_BYTES: u64 = 1_000;

/// Default location of the rule file, relative to the working directory.
pub const DEFAULT_RULE_FILE: &str = "./rlog";

/// Produces the current ruleset on demand.
///
/// Called once synchronously during initialization and then once per poll
/// interval from the background poller.
pub trait RuleSource: Send + Sync {
    fn load(&self) -> Result<RuleSet>;

    /// The file backing this source, if any. Used for filesystem watching.
    fn watch_path(&self) -> Option<&Path> {
        None
    }
}

impl<F> RuleSource for F
where
    F: Fn() -> RuleSet + Send + Sync,
{
    fn load(&self) -> Result<RuleSet> {
        Ok(self())
    }
}

// ---------------------------------------------------------------------------
// File-backed source
// ---------------------------------------------------------------------------

/// Reads rules from a file, one prefix per line.
#[derive(Debug, Clone)]
pub struct FileRuleSource {
    path: PathBuf,
    max_bytes: u64,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: MAX_RULE_FILE_BYTES,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileRuleSource {
    fn default() -> Self {
        Self::new(DEFAULT_RULE_FILE)
    }
}

impl RuleSource for FileRuleSource {
    fn load(&self) -> Result<RuleSet> {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RuleError::Missing(self.path.clone()))
            }
            Err(source) => {
                return Err(RuleError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if !meta.is_file() {
            return Err(RuleError::NotAFile(self.path.clone()));
        }
        if meta.len() > self.max_bytes {
            return Err(RuleError::TooLarge {
                path: self.path.clone(),
                size: meta.len(),
                limit: self.max_bytes,
            });
        }

        let bytes = std::fs::read(&self.path).map_err(|source| RuleError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(parse_rules(&String::from_utf8_lossy(&bytes)))
    }

    fn watch_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Split rule-file text into distinct non-empty lines.
///
/// CRLF and LF endings are both accepted. Lines are not trimmed; a rule with
/// trailing spaces only matches scopes that contain those spaces. The first
/// occurrence of a duplicate keeps its position.
pub fn parse_rules(text: &str) -> RuleSet {
    let normalized = text.replace("\r\n", "\n");
    let mut rules = RuleSet::new();
    for line in normalized.split('\n') {
        if !line.is_empty() && !rules.iter().any(|r| r == line) {
            rules.push(line.to_string());
        }
    }
    rules
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
