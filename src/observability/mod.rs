//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (task start, "<task> tasks done", failures)
//!
//! logging.rs installs the subscriber (stderr, EnvFilter, chosen format)
//! diagnostics.rs echoes the deployment configuration once per start
//! ```
//!
//! # Design Decisions
//! - Structured events so the failing task is a field, not just text
//! - Logs go to stderr; stdout belongs to the tasks and the final command
//! - `RUST_LOG` overrides the configured level

pub mod diagnostics;
pub mod logging;
