//! Filesystem trigger for the rule file.
//!
//! Watches the directory containing the rule file, non-recursively, and sends
//! a unit signal whenever an event touches a path with the rule file's name.
//! The directory is watched rather than the file so that a rule file created
//! after startup, or replaced by an editor's rename-on-save, is still seen.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::debug;

/// Live watcher plus the channel its events arrive on. Dropping it stops the
/// watch.
pub struct RuleWatcher {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<()>,
}

impl RuleWatcher {
    pub fn new(rule_file: &Path) -> notify::Result<Self> {
        let dir = watch_dir(rule_file);
        let name = rule_file.file_name().map(OsString::from);
        let (tx, events) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            if touches(&event, name.as_deref()) {
                // Receiver gone means the poller stopped.
                let _ = tx.send(());
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        debug!(dir = %dir.display(), "watching rule file directory");

        Ok(Self {
            _watcher: watcher,
            events,
        })
    }

    /// Wait for the next change. Bursts of events collapse into one signal.
    pub async fn changed(&mut self) -> Option<()> {
        self.events.recv().await?;
        while self.events.try_recv().is_ok() {}
        Some(())
    }
}

fn watch_dir(rule_file: &Path) -> PathBuf {
    match rule_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn touches(event: &Event, name: Option<&std::ffi::OsStr>) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant
        && event
            .paths
            .iter()
            .any(|p| name.is_none() || p.file_name() == name)
}
