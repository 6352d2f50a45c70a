//! rlog-reload: keeps an rlog rule store in step with its rule source.
//!
//! [`Reloader`] decides what a load does to the store, [`Poller`] repeats it on
//! an interval in the background, and [`RuleWatcher`] optionally adds an
//! immediate refresh when the rule file changes.

pub mod poller;
pub mod reloader;
pub mod watch;

pub use poller::{Poller, PollerHandle};
pub use reloader::{ErrorReporter, Outcome, Reloader};
pub use watch::RuleWatcher;
