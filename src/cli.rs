//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{self, ConfigError};
use crate::config::{EntrypointConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "geonode-entrypoint", version)]
#[command(about = "Prepare a GeoNode container and exec into its server or worker", long_about = None)]
pub struct Cli {
    /// Settings file (TOML).
    #[arg(short, long, env = "ENTRYPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Task runner binary.
    #[arg(long, env = "ENTRYPOINT_INVOKE_BIN")]
    pub invoke_bin: Option<PathBuf>,

    /// Argument placed before the task name; repeatable.
    #[arg(long = "invoke-arg", allow_hyphen_values = true)]
    pub invoke_args: Vec<String>,

    /// Working directory for tasks.
    #[arg(long, env = "ENTRYPOINT_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// File receiving task output unless INVOKE_LOG_STDOUT is true.
    #[arg(long, env = "ENTRYPOINT_INVOKE_LOG")]
    pub invoke_log: Option<PathBuf>,

    /// Initialization sentinel checked in production mode.
    #[arg(long, env = "ENTRYPOINT_LOCK_FILE")]
    pub lock_file: Option<PathBuf>,

    /// Shell profile read for environment overrides.
    #[arg(long, env = "ENTRYPOINT_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Override file read after the profile.
    #[arg(long, env = "ENTRYPOINT_OVERRIDE_ENV")]
    pub override_env: Option<PathBuf>,

    #[arg(long, value_enum, env = "ENTRYPOINT_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[arg(long, env = "ENTRYPOINT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Command run in development mode.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Merge the settings file (if any) with flag overrides and validate.
    pub fn settings(&self) -> Result<EntrypointConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => loader::read_config(path)?,
            None => EntrypointConfig::default(),
        };
        self.apply(&mut config);
        loader::finalize(config)
    }

    fn apply(&self, config: &mut EntrypointConfig) {
        if let Some(program) = &self.invoke_bin {
            config.invoke.program = program.clone();
        }
        if !self.invoke_args.is_empty() {
            config.invoke.args = self.invoke_args.clone();
        }
        if let Some(dir) = &self.workdir {
            config.invoke.workdir = Some(dir.clone());
        }
        if let Some(log) = &self.invoke_log {
            config.invoke.log_file = log.clone();
        }
        if let Some(lock) = &self.lock_file {
            config.paths.lock_file = lock.clone();
        }
        if let Some(profile) = &self.profile {
            config.paths.profile = profile.clone();
        }
        if let Some(file) = &self.override_env {
            config.paths.override_env = file.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
