//! Named logger handles.

use std::fmt::Display;
use std::panic::Location;
use std::sync::Arc;

use rlog_core::Severity;

use crate::context::{Context, ERROR_TAG, INFO_TAG};

/// A scope name bound to a [`Context`]. Cheap to clone; no cleanup needed.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    ctx: Context,
}

impl Logger {
    pub(crate) fn new(name: String, ctx: Context) -> Self {
        Self {
            name: name.into(),
            ctx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `info` on this handle would currently emit.
    pub fn enabled(&self) -> bool {
        self.ctx.enabled(&self.name)
    }

    /// Unconditional error, tagged `[ERROR] <name>`.
    #[track_caller]
    pub fn error<I, T>(&self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let tag = if self.name.is_empty() {
            ERROR_TAG.to_string()
        } else {
            format!("{ERROR_TAG} {}", self.name)
        };
        self.ctx.emit(Severity::Error, tag, Location::caller(), args);
    }

    /// Emits `[<name>] ...` if a rule enables this handle's scope.
    #[track_caller]
    pub fn info<I, T>(&self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let location = Location::caller();
        self.ctx.init(None);
        if !self.enabled() {
            return;
        }
        let tag = if self.name.is_empty() {
            INFO_TAG.to_string()
        } else {
            format!("[{}]", self.name)
        };
        self.ctx.emit(Severity::Info, tag, location, args);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}
