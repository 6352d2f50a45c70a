//! Rule files, switchable read functions and timing helpers.

use rlog::RuleSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A rule file in its own temporary directory, removed on drop.
pub struct RuleFile {
    _dir: TempDir,
    pub path: PathBuf,
}

impl RuleFile {
    pub fn new(contents: &str) -> Self {
        let file = Self::absent();
        file.write(contents);
        file
    }

    /// A path in a fresh directory where no file exists yet.
    pub fn absent() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rlog");
        Self { _dir: dir, path }
    }

    pub fn write(&self, contents: &str) {
        std::fs::write(&self.path, contents).unwrap();
    }

    pub fn remove(&self) {
        std::fs::remove_file(&self.path).unwrap();
    }
}

/// A read function whose result can be changed while it is installed. Counts
/// its calls.
#[derive(Clone, Default)]
pub struct SwitchableRules {
    rules: Arc<Mutex<RuleSet>>,
    calls: Arc<AtomicUsize>,
}

impl SwitchableRules {
    pub fn new(items: &[&str]) -> Self {
        let this = Self::default();
        this.set(items);
        this
    }

    pub fn set(&self, items: &[&str]) {
        *self.rules.lock().unwrap() = rules(items);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The closure to hand to `Config::read`.
    pub fn reader(&self) -> impl Fn() -> RuleSet + Send + Sync + 'static {
        let this = self.clone();
        move || {
            this.calls.fetch_add(1, Ordering::SeqCst);
            this.rules.lock().unwrap().clone()
        }
    }
}

/// Poll `condition` every 20ms until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    condition()
}

/// Route the library's own `tracing` diagnostics to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("rlog=debug,rlog_reload=debug")
            }),
        )
        .try_init();
}

pub fn rules(items: &[&str]) -> RuleSet {
    items.iter().map(|s| s.to_string()).collect()
}
