//! Context: owns one rule store, its configuration and its poller.
//!
//! Initialization follows a first-explicit-configuration-wins protocol:
//!
//! - `init(None)` bootstraps with defaults the first time and is a cheap no-op
//!   afterwards. Every `info` call issues it.
//! - `init(Some(config))` applies `config` unless a configuration was already
//!   applied, in which case it is ignored. It may follow a lazy bootstrap; the
//!   poller started by that bootstrap is replaced.
//!
//! Both guards are checked lock-free first and then again under the lifecycle
//! mutex. The mutex is released while a configuration is applied, so the rule
//! source and the sink may themselves log or query the context. Other threads
//! that arrive meanwhile wait until the configuration is in place; a nested
//! call from the applying thread returns at once.

use std::cell::RefCell;
use std::fmt::Display;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use arc_swap::ArcSwap;
use rlog_core::types::DEFAULT_SCOPE;
use rlog_core::{
    CallSite, Config, Record, Resolved, RuleError, RuleSet, RuleStore, Severity, Sink, StderrSink,
};
use rlog_reload::{ErrorReporter, Poller, PollerHandle, Reloader};
use tracing::{debug, info};

use crate::logger::Logger;

pub(crate) const ERROR_TAG: &str = "[ERROR]";
pub(crate) const INFO_TAG: &str = "[INFO]";

thread_local! {
    /// Contexts whose configuration is being applied on this thread.
    static APPLYING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Handle to an independent logging context. Clones share state.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    inited: AtomicBool,
    configured: AtomicBool,
    store: RuleStore,
    sink: ArcSwap<Arc<dyn Sink>>,
    lifecycle: Mutex<Lifecycle>,
    applied: Condvar,
}

#[derive(Default)]
struct Lifecycle {
    settings: Option<Resolved>,
    poller: Option<PollerHandle>,
    applying: bool,
}

impl Context {
    /// A context that has not been initialized: no rules, default sink.
    pub fn new() -> Self {
        let sink: Arc<dyn Sink> = Arc::new(StderrSink::new());
        Self {
            inner: Arc::new(Inner {
                inited: AtomicBool::new(false),
                configured: AtomicBool::new(false),
                store: RuleStore::default(),
                sink: ArcSwap::from_pointee(sink),
                lifecycle: Mutex::new(Lifecycle::default()),
                applied: Condvar::new(),
            }),
        }
    }

    /// Shorthand for `Context::new()` followed by `init(Some(config))`.
    pub fn with_config(config: Config) -> Self {
        let ctx = Self::new();
        ctx.init(Some(config));
        ctx
    }

    pub fn init(&self, config: Option<Config>) {
        let explicit = config.is_some();
        if self.skip_init(explicit) || self.applying_here() {
            return;
        }

        let mut life = self.settled();
        if self.skip_init(explicit) {
            return;
        }
        life.applying = true;
        let previous = life.poller.take();
        drop(life);

        let _applying = Applying::enter(self);
        if let Some(previous) = previous {
            debug!("replacing poller started by lazy bootstrap");
            previous.shutdown();
        }

        let resolved = Resolved::from_config(config);
        self.inner.sink.store(Arc::new(Arc::clone(&resolved.sink)));

        let reloader = Reloader::new(
            Arc::clone(&resolved.source),
            resolved.default_rules.clone(),
            self.inner.store.clone(),
        )
        .with_reporter(self.reporter());
        let outcome = reloader.initial_load();

        let mut poller = Poller::new(reloader, resolved.interval);
        if resolved.watch {
            if let Some(path) = resolved.source.watch_path() {
                poller = poller.with_watch(path.to_path_buf());
            }
        }
        let handle = match poller.spawn() {
            Ok(handle) => Some(handle),
            Err(e) => {
                self.error([format!("starting rule poller: {e}")]);
                None
            }
        };

        info!(
            explicit,
            file = %resolved.file.display(),
            interval_ms = resolved.interval.as_millis() as u64,
            ?outcome,
            "rlog initialized"
        );

        let mut life = lock(&self.inner.lifecycle);
        life.poller = handle;
        life.settings = Some(resolved);
        self.inner.inited.store(true, Ordering::Release);
        if explicit {
            self.inner.configured.store(true, Ordering::Release);
        }
        drop(life);
    }

    fn skip_init(&self, explicit: bool) -> bool {
        self.inner.configured.load(Ordering::Acquire)
            || (!explicit && self.inner.inited.load(Ordering::Acquire))
    }

    fn key(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    fn applying_here(&self) -> bool {
        let key = self.key();
        APPLYING.with(|applying| applying.borrow().contains(&key))
    }

    /// Lock the lifecycle once no other thread is applying a configuration.
    fn settled(&self) -> MutexGuard<'_, Lifecycle> {
        let mut life = lock(&self.inner.lifecycle);
        if self.applying_here() {
            return life;
        }
        while life.applying {
            life = self
                .inner
                .applied
                .wait(life)
                .unwrap_or_else(PoisonError::into_inner);
        }
        life
    }

    /// A named handle emitting through this context.
    pub fn logger(&self, name: impl Into<String>) -> Logger {
        Logger::new(name.into(), self.clone())
    }

    /// Unconditional error emission, never filtered.
    #[track_caller]
    pub fn error<I, T>(&self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.emit(Severity::Error, ERROR_TAG.to_string(), Location::caller(), args);
    }

    /// Informational emission under the `default` scope.
    #[track_caller]
    pub fn info<I, T>(&self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let location = Location::caller();
        self.init(None);
        if self.enabled(DEFAULT_SCOPE) {
            self.emit(Severity::Info, INFO_TAG.to_string(), location, args);
        }
    }

    pub(crate) fn emit<I, T>(
        &self,
        severity: Severity,
        tag: String,
        location: &Location<'_>,
        args: I,
    ) where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let record = Record::new(severity, tag, &CallSite::from_location(location), args);
        self.sink().write(&record);
    }

    /// Whether `scope` is enabled by the active rules.
    pub fn enabled(&self, scope: &str) -> bool {
        self.inner.store.enabled(scope)
    }

    /// Snapshot of the active rules.
    pub fn rules(&self) -> Arc<RuleSet> {
        self.inner.store.snapshot()
    }

    pub fn is_inited(&self) -> bool {
        self.inner.inited.load(Ordering::Acquire)
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Acquire)
    }

    /// Refresh interval in effect, once initialized.
    pub fn interval(&self) -> Option<Duration> {
        lock(&self.inner.lifecycle).settings.as_ref().map(|s| s.interval)
    }

    /// Rule file path in effect, once initialized.
    pub fn rule_file(&self) -> Option<PathBuf> {
        lock(&self.inner.lifecycle).settings.as_ref().map(|s| s.file.clone())
    }

    /// Default rules in effect, once initialized.
    pub fn default_rules(&self) -> Option<RuleSet> {
        lock(&self.inner.lifecycle)
            .settings
            .as_ref()
            .map(|s| s.default_rules.clone())
    }

    pub fn is_polling(&self) -> bool {
        lock(&self.inner.lifecycle)
            .poller
            .as_ref()
            .is_some_and(PollerHandle::is_running)
    }

    /// Stop the poller and wait for it. The active rules stay as they are and
    /// the poller is not restarted by later `init` calls.
    pub fn shutdown(&self) {
        let poller = self.settled().poller.take();
        if let Some(poller) = poller {
            poller.shutdown();
        }
    }

    fn sink(&self) -> Arc<dyn Sink> {
        Arc::clone(&*self.inner.sink.load_full())
    }

    /// Route rule-loading errors to this context's error path.
    ///
    /// Holds a weak reference: the poller thread must not keep the context
    /// alive, or dropping the last handle would never cancel it.
    fn reporter(&self) -> ErrorReporter {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        Arc::new(move |e: &RuleError| {
            if let Some(inner) = weak.upgrade() {
                Context { inner }.error([e]);
            }
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("inited", &self.is_inited())
            .field("configured", &self.is_configured())
            .field("rules", &self.rules())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a configuration as being applied by the current thread. On drop,
/// including an unwind out of a panicking rule source, clears the mark and
/// wakes any thread waiting in `init`.
struct Applying<'a> {
    ctx: &'a Context,
}

impl<'a> Applying<'a> {
    fn enter(ctx: &'a Context) -> Self {
        let key = ctx.key();
        APPLYING.with(|applying| applying.borrow_mut().push(key));
        Self { ctx }
    }
}

impl Drop for Applying<'_> {
    fn drop(&mut self) {
        let key = self.ctx.key();
        APPLYING.with(|applying| applying.borrow_mut().retain(|k| *k != key));
        lock(&self.ctx.inner.lifecycle).applying = false;
        self.ctx.inner.applied.notify_all();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
