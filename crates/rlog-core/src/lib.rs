//! rlog-core: rule model, sources, filter and sinks for rlog.
//!
//! This crate holds everything that does not need a runtime: the prefix
//! [`filter`], the [`RuleStore`] the filter reads from, the [`RuleSource`]
//! implementations that produce rulesets, and the [`Sink`] implementations
//! that records are written to.
//!
//! # Architecture
//!
//! ```text
//! RuleSource ──► RuleStore ──► filter ──► Sink
//!     ▲
//!     └── poller (rlog-reload)
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod sink;
pub mod source;
pub mod store;
pub mod types;

pub use config::{Config, Resolved, Settings};
pub use error::RuleError;
pub use filter::enabled;
pub use sink::{Sink, StderrSink, TracingSink};
pub use source::{FileRuleSource, RuleSource};
pub use store::RuleStore;
pub use types::{CallSite, Record, RuleSet, Severity};
