//! Mode selection and the first-start predicate.

use std::fmt;
use std::path::Path;

use crate::config::Environment;

pub const DOCKER_ENV: &str = "DOCKER_ENV";
pub const IS_CELERY: &str = "IS_CELERY";
pub const IS_FIRST_START: &str = "IS_FIRST_START";
pub const FORCE_REINIT: &str = "FORCE_REINIT";
pub const CELERY_CMD: &str = "CELERY_CMD";
pub const UWSGI_CMD: &str = "UWSGI_CMD";

/// Which terminal command the entrypoint hands over to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the entrypoint's own arguments.
    Development,
    /// Run `CELERY_CMD`.
    Worker,
    /// Prepare the site, then run `UWSGI_CMD`.
    Production,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Development => "development",
            Mode::Worker => "worker",
            Mode::Production => "production",
        })
    }
}

/// Pick the mode from `DOCKER_ENV` and `IS_CELERY`.
///
/// An unset or empty `DOCKER_ENV` counts as development.
pub fn select_mode(env: &Environment) -> Mode {
    match env.value(DOCKER_ENV) {
        "" | "development" => Mode::Development,
        _ if env.flag(IS_CELERY) => Mode::Worker,
        _ => Mode::Production,
    }
}

/// Whether the one-time initialization tasks must run on this start.
pub fn first_start(env: &Environment, lock_file: &Path) -> bool {
    env.flag(IS_FIRST_START) || env.flag(FORCE_REINIT) || !lock_file.exists()
}
