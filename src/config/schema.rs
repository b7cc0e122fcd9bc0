//! Configuration schema definitions.
//!
//! Settings that shape how the entrypoint runs, as opposed to the
//! environment variables that select what it does. All types derive Serde
//! traits so they can be read from an optional TOML file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings for the entrypoint.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EntrypointConfig {
    /// How external tasks are invoked.
    pub invoke: InvokeConfig,

    /// Filesystem locations read during startup.
    pub paths: PathsConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Task runner settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InvokeConfig {
    /// Task runner binary.
    pub program: PathBuf,

    /// Arguments placed before the task name (e.g. `["-m", "invoke"]`).
    pub args: Vec<String>,

    /// Working directory for tasks; inherits the current one when unset.
    /// Defaults to the GeoNode checkout.
    pub workdir: Option<PathBuf>,

    /// File receiving task output unless `INVOKE_LOG_STDOUT` is set.
    pub log_file: PathBuf,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("/usr/local/bin/invoke"),
            args: Vec::new(),
            workdir: Some(PathBuf::from("/usr/src/geonode")),
            log_file: PathBuf::from("/usr/src/geonode/invoke.log"),
        }
    }
}

/// Paths the orchestrator reads.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Sentinel written by the `initialized` task.
    pub lock_file: PathBuf,

    /// Primary shell profile, read first.
    pub profile: PathBuf,

    /// Override file, read second; wins on key collision.
    pub override_env: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home = home_dir();
        Self {
            lock_file: PathBuf::from("/mnt/volumes/statics/geonode_init.lock"),
            profile: home.join(".bashrc"),
            override_env: home.join(".override_env"),
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/root"))
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error or a full
    /// `EnvFilter` expression). `RUST_LOG` takes precedence.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
        }
    }
}
