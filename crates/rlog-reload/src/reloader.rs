//! Reloader: applies a rule source's result to the store.
//!
//! The first load and the periodic refresh differ only in what happens when a
//! read fails:
//!
//! | Source result            | First load      | Refresh         |
//! |--------------------------|-----------------|-----------------|
//! | `Ok(rules)` (even empty) | publish `rules` | publish `rules` |
//! | unavailable file         | default rules   | default rules   |
//! | I/O failure              | default rules   | keep previous   |

use std::sync::Arc;

use rlog_core::{RuleError, RuleSet, RuleSource, RuleStore};
use tracing::{debug, warn};

/// Callback for errors worth surfacing on the unconditional error path.
pub type ErrorReporter = Arc<dyn Fn(&RuleError) + Send + Sync>;

/// What a load did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The source's rules were published; carries the rule count.
    Loaded(usize),
    /// The default ruleset was published.
    Defaulted,
    /// The store was left unchanged.
    Kept,
}

#[derive(Clone)]
pub struct Reloader {
    source: Arc<dyn RuleSource>,
    default_rules: RuleSet,
    store: RuleStore,
    report: ErrorReporter,
}

impl Reloader {
    pub fn new(source: Arc<dyn RuleSource>, default_rules: RuleSet, store: RuleStore) -> Self {
        Self {
            source,
            default_rules,
            store,
            report: Arc::new(|_: &RuleError| {}),
        }
    }

    pub fn with_reporter(mut self, report: ErrorReporter) -> Self {
        self.report = report;
        self
    }

    pub fn source(&self) -> &Arc<dyn RuleSource> {
        &self.source
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Populate the store before the first emission. Never leaves it stale.
    pub fn initial_load(&self) -> Outcome {
        match self.source.load() {
            Ok(rules) => self.publish(rules),
            Err(e) => {
                self.surface(&e);
                self.store.publish(self.default_rules.clone());
                Outcome::Defaulted
            }
        }
    }

    /// Periodic refresh. A failed read keeps the active ruleset.
    pub fn refresh(&self) -> Outcome {
        match self.source.load() {
            Ok(rules) => self.publish(rules),
            Err(e) if e.is_unavailable() => {
                self.surface(&e);
                self.store.publish(self.default_rules.clone());
                Outcome::Defaulted
            }
            Err(e) => {
                self.surface(&e);
                warn!(error = %e, "rule refresh failed, keeping previous rules");
                Outcome::Kept
            }
        }
    }

    fn publish(&self, rules: RuleSet) -> Outcome {
        let count = rules.len();
        debug!(count, "rules loaded");
        self.store.publish(rules);
        Outcome::Loaded(count)
    }

    fn surface(&self, e: &RuleError) {
        if e.is_reportable() {
            (self.report)(e);
        } else {
            debug!(error = %e, "rule source unavailable, using default rules");
        }
    }
}

impl std::fmt::Debug for Reloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reloader")
            .field("default_rules", &self.default_rules)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
