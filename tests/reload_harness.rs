//! Live reload integration harness.
//!
//! # What this covers
//!
//! - **End to end**: a read function swapped in by configuration is polled on
//!   the interval and its rules take effect without re-initializing.
//! - **Rule file edits**: editing, deleting and breaking the rule file on disk.
//! - **Failed reads**: an I/O failure keeps the previous rules; an unavailable
//!   file reverts to the defaults.
//! - **Shutdown**: a stopped poller no longer refreshes.
//! - **Watch**: with `watch` on, a file edit is picked up well before the
//!   interval elapses.
//!
//! These tests use real time with the minimum one-second interval, so each
//! takes a second or two.
//!
//! # Running
//!
//! ```sh
//! cargo test --test reload_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use rlog::{Config, Context, RuleError, RuleSet, RuleSource, Severity};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const SETTLE: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

/// Interval 1s, read returns `{"x"}`: after more than one interval a handle
/// named `xyz` emits.
#[test]
fn poller_refreshes_from_read_function() {
    init_tracing();
    let sink = CaptureSink::new();
    let source = SwitchableRules::new(&[]);
    let ctx = Context::with_config(
        Config::new()
            .read(source.reader())
            .sink(sink.clone())
            .interval(Duration::from_secs(1)),
    );
    let xyz = ctx.logger("xyz");

    xyz.info(["before"]);
    assert!(sink.is_empty());

    source.set(&["x"]);
    std::thread::sleep(Duration::from_millis(1_500));
    xyz.info(["after"]);

    assert_eq!(sink.tags(), vec!["[xyz]"]);
    assert!(source.calls() >= 2);
    ctx.shutdown();
}

/// A refresh that returns the empty set disables everything.
#[test]
fn empty_refresh_is_honoured() {
    let source = SwitchableRules::new(&["*"]);
    let ctx = Context::with_config(Config::new().read(source.reader()));
    assert!(ctx.enabled("anything"));

    source.set(&[]);
    assert!(wait_until(SETTLE, || ctx.rules().is_empty()));
    assert!(!ctx.enabled("anything"));
    ctx.shutdown();
}

// ---------------------------------------------------------------------------
// Rule file edits
// ---------------------------------------------------------------------------

#[test]
fn editing_rule_file_changes_enabled_scopes() {
    let file = RuleFile::new("net\n");
    let ctx = Context::with_config(Config::new().file(&file.path));
    assert!(ctx.enabled("net.http"));
    assert!(!ctx.enabled("db"));

    file.write("db\r\n");
    assert!(wait_until(SETTLE, || ctx.enabled("db")));
    assert!(!ctx.enabled("net.http"));
    ctx.shutdown();
}

#[test]
fn deleting_rule_file_reverts_to_defaults() {
    let file = RuleFile::new("net\n");
    let ctx = Context::with_config(
        Config::new()
            .file(&file.path)
            .default_rules(["fallback"]),
    );
    assert_eq!(*ctx.rules(), vec!["net"]);

    file.remove();
    assert!(wait_until(SETTLE, || *ctx.rules() == rules(&["fallback"])));
    ctx.shutdown();
}

/// Replacing the rule file with a directory falls back and is reported.
#[test]
fn rule_path_becoming_a_directory_is_reported() {
    let file = RuleFile::new("net\n");
    let sink = CaptureSink::new();
    let ctx = Context::with_config(Config::new().file(&file.path).sink(sink.clone()));

    file.remove();
    std::fs::create_dir(&file.path).unwrap();
    assert!(wait_until(SETTLE, || sink.count(Severity::Error) > 0));
    assert_eq!(*ctx.rules(), vec!["default"]);
    assert!(sink.records()[0].args()[0].contains("is not a file"));
    ctx.shutdown();
}

// ---------------------------------------------------------------------------
// Failed reads
// ---------------------------------------------------------------------------

/// Succeeds until told to fail, then reports an I/O error.
struct FlakySource {
    failing: Arc<AtomicBool>,
}

impl RuleSource for FlakySource {
    fn load(&self) -> Result<RuleSet, RuleError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RuleError::Io {
                path: PathBuf::from("flaky"),
                source: std::io::Error::other("disk on fire"),
            })
        } else {
            Ok(rules(&["net"]))
        }
    }
}

#[test]
fn failed_read_keeps_previous_rules() {
    let failing = Arc::new(AtomicBool::new(false));
    let sink = CaptureSink::new();
    let ctx = Context::with_config(
        Config::new()
            .source(FlakySource {
                failing: Arc::clone(&failing),
            })
            .sink(sink.clone()),
    );
    assert_eq!(*ctx.rules(), vec!["net"]);

    failing.store(true, Ordering::SeqCst);
    assert!(wait_until(SETTLE, || sink.count(Severity::Error) > 0));
    assert_eq!(*ctx.rules(), vec!["net"]);
    assert!(sink.records()[0].args()[0].contains("disk on fire"));
    ctx.shutdown();
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

#[test]
fn shutdown_stops_refreshing() {
    let source = SwitchableRules::new(&["a"]);
    let ctx = Context::with_config(Config::new().read(source.reader()));
    ctx.shutdown();
    let calls = source.calls();

    source.set(&["b"]);
    std::thread::sleep(Duration::from_millis(2_200));
    assert_eq!(source.calls(), calls);
    assert_eq!(*ctx.rules(), vec!["a"]);

    // The store stays readable and a later lazy init does not restart polling.
    ctx.init(None);
    assert!(!ctx.is_polling());
}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

#[test]
fn watched_file_reloads_before_interval() {
    let file = RuleFile::new("net\n");
    let ctx = Context::with_config(
        Config::new()
            .file(&file.path)
            .interval(Duration::from_secs(3600))
            .watch(true),
    );
    // Let the watcher register.
    std::thread::sleep(Duration::from_millis(200));

    file.write("db\n");
    assert!(wait_until(SETTLE, || ctx.enabled("db")));
    ctx.shutdown();
}
