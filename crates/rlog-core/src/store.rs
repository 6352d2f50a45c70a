//! Store: the active ruleset, shared between the poller and every emitter.
//!
//! The ruleset is never mutated in place. [`RuleStore::publish`] swaps in a new
//! `Arc<RuleSet>`; readers load the current `Arc` without taking a lock and
//! filter against that immutable snapshot, so they see either the whole old
//! set or the whole new one.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::filter;
use crate::types::RuleSet;

/// Shared handle to the active ruleset. Clones refer to the same store.
#[derive(Clone)]
pub struct RuleStore {
    current: Arc<ArcSwap<RuleSet>>,
}

impl RuleStore {
    pub fn new(initial: RuleSet) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// The active ruleset.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.current.load_full()
    }

    /// Replace the active ruleset wholesale.
    pub fn publish(&self, rules: RuleSet) {
        self.current.store(Arc::new(rules));
    }

    pub fn enabled(&self, scope: &str) -> bool {
        let rules = self.current.load();
        filter::enabled(rules.as_slice(), scope)
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new(RuleSet::new())
    }
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RuleStore").field(&self.snapshot()).finish()
    }
}
