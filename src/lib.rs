//! rlog: scoped logging with live-reloadable filter rules.
//!
//! Informational output is enabled per scope by a small rule file, one prefix
//! per line, that is re-read in the background. Edit the file and verbosity
//! changes without a restart. Errors are never filtered.
//!
//! # Architecture
//!
//! ```text
//! caller ──► Logger ──► filter ──► Sink
//!                         ▲
//! rule file ──► Poller ──► RuleStore
//! ```
//!
//! Each [`Context`] owns its store, its configuration and its poller. The free
//! functions ([`init`], [`new`], [`info`], [`error`], [`rules`]) use one
//! process-wide context built on first use.
//!
//! ```ignore
//! let db = rlog::new("db");
//! db.info(["connected to", addr]);   // only if a rule prefixes "db"
//! rlog::error!("disk full:", path);  // always
//! ```

mod context;
mod global;
mod logger;
mod macros;

pub use context::Context;
pub use global::{error, global, info, init, new, rules, shutdown};
pub use logger::Logger;

pub use rlog_core::{
    enabled, CallSite, Config, FileRuleSource, Record, RuleError, RuleSet, RuleSource, Settings,
    Severity, Sink, StderrSink, TracingSink,
};
