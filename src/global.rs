//! Process-wide default context.
//!
//! The free functions here operate on a single [`Context`] built on first use,
//! so a host can log without any setup and configure once at startup if it
//! wants to.

use std::fmt::Display;
use std::sync::{Arc, OnceLock};

use rlog_core::{Config, RuleSet};

use crate::context::Context;
use crate::logger::Logger;

static GLOBAL: OnceLock<Context> = OnceLock::new();

/// The process-wide context.
pub fn global() -> &'static Context {
    GLOBAL.get_or_init(Context::new)
}

/// Initialize the process-wide context. See [`Context::init`].
pub fn init(config: Option<Config>) {
    global().init(config);
}

/// A named handle on the process-wide context.
pub fn new(name: impl Into<String>) -> Logger {
    global().logger(name)
}

#[track_caller]
pub fn error<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    global().error(args);
}

#[track_caller]
pub fn info<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    global().info(args);
}

/// Snapshot of the process-wide active rules.
pub fn rules() -> Arc<RuleSet> {
    global().rules()
}

/// Stop the process-wide poller.
pub fn shutdown() {
    global().shutdown();
}
