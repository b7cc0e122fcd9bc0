//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject empty paths that would only fail later, mid-startup
//! - Check the log filter parses before the subscriber is installed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EntrypointConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::schema::EntrypointConfig;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn require_path(errors: &mut Vec<ValidationError>, field: &'static str, path: &Path) {
    if path.as_os_str().is_empty() {
        errors.push(ValidationError {
            field,
            message: "must not be empty".to_string(),
        });
    }
}

/// Validate settings after file and CLI overrides are merged.
pub fn validate_config(config: &EntrypointConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    require_path(&mut errors, "invoke.program", &config.invoke.program);
    require_path(&mut errors, "invoke.log_file", &config.invoke.log_file);
    require_path(&mut errors, "paths.lock_file", &config.paths.lock_file);
    require_path(&mut errors, "paths.profile", &config.paths.profile);
    require_path(&mut errors, "paths.override_env", &config.paths.override_env);

    if let Some(dir) = &config.invoke.workdir {
        require_path(&mut errors, "invoke.workdir", dir);
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        errors.push(ValidationError {
            field: "logging.level",
            message: e.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
