//! Process-wide context harness.
//!
//! # What this covers
//!
//! The free functions (`rlog::init`, `rlog::new`, `rlog::info`, `rlog::error`,
//! `rlog::rules`, `rlog::shutdown`) and the macros without a target, all
//! against the single global context.
//!
//! The global context lives for the whole test binary, so everything runs in
//! one test to keep the ordering deterministic.
//!
//! # Running
//!
//! ```sh
//! cargo test --test global_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use rlog::{Config, Severity};
use std::time::Duration;

#[test]
fn global_context_lifecycle() {
    init_tracing();
    let sink = CaptureSink::new();
    let source = SwitchableRules::new(&["scope b", "default"]);

    rlog::init(Some(
        Config::new()
            .read(source.reader())
            .sink(sink.clone())
            .interval(Duration::from_secs(1)),
    ));
    assert!(rlog::global().is_configured());
    assert_eq!(*rlog::rules(), vec!["scope b", "default"]);

    // A later configuration is ignored.
    rlog::init(Some(Config::new().read(|| vec!["*".to_string()])));
    assert_eq!(*rlog::rules(), vec!["scope b", "default"]);

    let a = rlog::new("scope a");
    let b = rlog::new("scope b");
    a.info(["info a"]);
    a.error(["error a"]);
    b.info(["info b"]);
    rlog::info(["info default"]);
    rlog::error(["error default"]);
    rlog::error!("macro", 1);

    assert_eq!(
        sink.tags(),
        vec!["[ERROR] scope a", "[scope b]", "[INFO]", "[ERROR]", "[ERROR]"]
    );
    assert_eq!(sink.count(Severity::Error), 3);
    assert!(sink.lines()[4].ends_with("macro 1"));

    // Live reload through the global poller.
    sink.clear();
    source.set(&["scope a"]);
    assert!(wait_until(Duration::from_secs(5), || a.enabled()));
    a.info(["now on"]);
    b.info(["now off"]);
    assert_eq!(sink.tags(), vec!["[scope a]"]);

    rlog::shutdown();
    assert!(!rlog::global().is_polling());
}
