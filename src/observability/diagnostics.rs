//! Startup configuration echo.
//!
//! Operators read these lines in container logs to see which deployment
//! settings a start actually ran with.

use crate::config::Environment;

/// Keys echoed on every start, in this order.
pub const DIAGNOSTIC_KEYS: [&str; 10] = [
    "DOCKER_ENV",
    "DATABASE_URL",
    "GEODATABASE_URL",
    "SITEURL",
    "ALLOWED_HOSTS",
    "GEOSERVER_PUBLIC_LOCATION",
    "MONITORING_ENABLED",
    "MONITORING_HOST_NAME",
    "MONITORING_SERVICE_NAME",
    "MONITORING_DATA_TTL",
];

/// `KEY=value` lines for the diagnostic keys; unset keys render empty.
pub fn configuration_lines(env: &Environment) -> Vec<String> {
    DIAGNOSTIC_KEYS
        .iter()
        .map(|key| format!("{}={}", key, env.value(key)))
        .collect()
}

/// Log the diagnostic keys, one line each.
pub fn log_configuration(env: &Environment) {
    for (key, line) in DIAGNOSTIC_KEYS.iter().zip(configuration_lines(env)) {
        tracing::info!(key, "{}", line);
    }
}
