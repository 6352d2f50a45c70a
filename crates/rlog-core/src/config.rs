//! Configuration types for rlog.
//!
//! [`Config`] is the one-shot override record handed to initialization. Every
//! field is optional; [`Resolved::from_config`] layers whatever is present on
//! top of the built-in defaults. [`Settings`] is the same information as it
//! appears in a TOML settings file, loaded through the `config` crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::sink::{Sink, StderrSink};
use crate::source::{FileRuleSource, RuleSource, DEFAULT_RULE_FILE};
use crate::types::{RuleSet, DEFAULT_SCOPE};

/// Shortest allowed refresh interval. Shorter explicit intervals are raised.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Ruleset used until a source produces one.
pub fn default_ruleset() -> RuleSet {
    vec![DEFAULT_SCOPE.to_string()]
}

// ---------------------------------------------------------------------------
// Programmatic overrides
// ---------------------------------------------------------------------------

/// Overrides applied by the first explicit initialization.
#[derive(Clone, Default)]
pub struct Config {
    /// Rule file location. Ignored when `source` is set.
    pub file: Option<PathBuf>,
    /// Replaces the rule-loading strategy entirely.
    pub source: Option<Arc<dyn RuleSource>>,
    /// Refresh interval, floored at [`MIN_INTERVAL`].
    pub interval: Option<Duration>,
    /// Replaces the output sink.
    pub sink: Option<Arc<dyn Sink>>,
    /// Ruleset used whenever the rule file is unavailable.
    pub default_rules: Option<RuleSet>,
    /// Also refresh on filesystem events for a file-backed source.
    pub watch: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Load rules with a closure instead of the rule file.
    pub fn read<F>(self, read: F) -> Self
    where
        F: Fn() -> RuleSet + Send + Sync + 'static,
    {
        self.source(read)
    }

    pub fn source(mut self, source: impl RuleSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Send records to a closure instead of the default sink.
    pub fn output<F>(self, output: F) -> Self
    where
        F: Fn(&crate::Record) + Send + Sync + 'static,
    {
        self.sink(output)
    }

    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn default_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("file", &self.file)
            .field("source", &self.source.as_ref().map(|_| "<custom>"))
            .field("interval", &self.interval)
            .field("sink", &self.sink.as_ref().map(|_| "<custom>"))
            .field("default_rules", &self.default_rules)
            .field("watch", &self.watch)
            .finish()
    }
}

impl From<Settings> for Config {
    fn from(settings: Settings) -> Self {
        Config::new()
            .file(settings.file)
            .interval(Duration::from_secs(settings.interval_secs))
            .default_rules(settings.default_rules)
            .watch(settings.watch)
    }
}

// ---------------------------------------------------------------------------
// Resolved settings
// ---------------------------------------------------------------------------

/// Defaults with a [`Config`] applied on top. Immutable once built.
#[derive(Clone)]
pub struct Resolved {
    pub file: PathBuf,
    pub source: Arc<dyn RuleSource>,
    pub interval: Duration,
    pub sink: Arc<dyn Sink>,
    pub default_rules: RuleSet,
    pub watch: bool,
}

impl Resolved {
    pub fn from_config(config: Option<Config>) -> Self {
        let config = config.unwrap_or_default();

        let file = config
            .file
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RULE_FILE));
        let source = config
            .source
            .unwrap_or_else(|| Arc::new(FileRuleSource::new(&file)));

        Self {
            file,
            source,
            interval: config.interval.unwrap_or(MIN_INTERVAL).max(MIN_INTERVAL),
            sink: config.sink.unwrap_or_else(|| Arc::new(StderrSink::new())),
            default_rules: config.default_rules.unwrap_or_else(default_ruleset),
            watch: config.watch,
        }
    }
}

impl Default for Resolved {
    fn default() -> Self {
        Self::from_config(None)
    }
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("file", &self.file)
            .field("interval", &self.interval)
            .field("default_rules", &self.default_rules)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

const DEFAULT_SETTINGS: &str = r#"
file          = "./rlog"
interval_secs = 1
default_rules = ["default"]
watch         = false
"#;

/// Settings as written in a TOML file, e.g. `rlog.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_file")]
    pub file: PathBuf,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_ruleset")]
    pub default_rules: Vec<String>,
    #[serde(default)]
    pub watch: bool,
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_RULE_FILE)
}

fn default_interval_secs() -> u64 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Settings {
    /// Load `path` layered on the built-in defaults, then `RLOG_*` environment
    /// variables on top (`RLOG_FILE`, `RLOG_INTERVAL_SECS`,
    /// `RLOG_DEFAULT_RULES` as a comma list, `RLOG_WATCH`). A missing file is
    /// not an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let env = config::Environment::with_prefix("RLOG")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("default_rules");
        Self::builder(path)
            .add_source(env)
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Load `path` layered on the built-in defaults, ignoring the environment.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        Self::builder(path)
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_SETTINGS, config::FileFormat::Toml))
            .build()
            .expect("built-in default settings must be valid TOML")
            .try_deserialize()
            .expect("built-in default settings must deserialize correctly")
    }

    fn builder(path: &Path) -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_SETTINGS, config::FileFormat::Toml))
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
