//! Crate-level error taxonomy.
//!
//! Every failure is fatal for the entrypoint. The only thing callers do with
//! an error is log it and turn it into a process exit code.

use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::launch::LaunchError;
use crate::tasks::TaskFailure;

/// Top-level error returned by the startup sequence.
#[derive(Debug, Error)]
pub enum EntrypointError {
    /// Settings or environment files could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An external task returned a failure status.
    #[error(transparent)]
    Task(#[from] TaskFailure),

    /// The terminal command could not replace the process image.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl EntrypointError {
    /// Exit code the entrypoint process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            EntrypointError::Config(_) => 1,
            EntrypointError::Task(failure) => failure.status.exit_code(),
            EntrypointError::Launch(err) => err.exit_code(),
        }
    }
}

/// Result type for the startup sequence.
pub type EntrypointResult<T> = Result<T, EntrypointError>;
