//! Background poller that keeps the rule store fresh.
//!
//! # Architecture
//!
//! The poller runs in its own named OS thread driving a current-thread tokio
//! runtime, so hosts do not need to be async (or to share their runtime) for
//! rules to reload. Each cycle:
//! 1. Waits one interval (the first refresh happens one interval after start)
//! 2. Refreshes the store through the [`Reloader`]
//! 3. Optionally also refreshes whenever the rule file changes on disk
//! 4. Stops when its cancellation token fires
//!
//! # Example
//!
//! ```ignore
//! let handle = Poller::new(reloader, Duration::from_secs(1)).spawn()?;
//! // ...
//! handle.shutdown();
//! ```

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::reloader::Reloader;
use crate::watch::RuleWatcher;

/// Name of the poller's OS thread.
pub const THREAD_NAME: &str = "rlog-poller";

pub struct Poller {
    reloader: Reloader,
    interval: Duration,
    watch: Option<PathBuf>,
}

impl Poller {
    pub fn new(reloader: Reloader, interval: Duration) -> Self {
        Self {
            reloader,
            interval,
            watch: None,
        }
    }

    /// Also refresh when `path` changes on disk.
    pub fn with_watch(mut self, path: PathBuf) -> Self {
        self.watch = Some(path);
        self
    }

    /// Runs the refresh loop until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            watch = ?self.watch,
            "rule poller starting"
        );

        let mut watcher = self
            .watch
            .as_deref()
            .and_then(|path| match RuleWatcher::new(path) {
                Ok(w) => Some(w),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "rule file watch unavailable, polling only"
                    );
                    None
                }
            });

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("rule poller shutting down");
                    break;
                }

                _ = interval.tick() => {
                    let outcome = self.reloader.refresh();
                    debug!(?outcome, "scheduled rule refresh");
                }

                Some(()) = changed(&mut watcher) => {
                    let outcome = self.reloader.refresh();
                    debug!(?outcome, "rule file changed");
                    interval.reset();
                }
            }
        }
    }

    /// Start the loop on a dedicated thread.
    pub fn spawn(self) -> std::io::Result<PollerHandle> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let thread = std::thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(self.run(token)))?;

        Ok(PollerHandle {
            shutdown,
            thread: Some(thread),
        })
    }
}

async fn changed(watcher: &mut Option<RuleWatcher>) -> Option<()> {
    match watcher {
        Some(w) => w.changed().await,
        None => std::future::pending().await,
    }
}

/// Owner of a running poller. Dropping it cancels the poller without waiting.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the poller and wait for its thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("rule poller thread panicked");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
