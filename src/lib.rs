//! GeoNode container entrypoint.
//!
//! Runs the site's lifecycle tasks in a fixed order, then replaces itself
//! with the development server, the production application server or the
//! background worker.
//!
//! # Architecture Overview
//!
//! ```text
//!   process env ──▶ config::Environment ──┐
//!   entrypoint.toml / flags ──▶ config ───┤
//!                                         ▼
//!                             lifecycle::Orchestrator
//!                               │   update
//!                               │   (profile, override file)
//!                               │   waitfordbs, migrations
//!                               │   mode::select_mode
//!                               │   production: prepare, first-start block,
//!                               │               statics .. updateadmin
//!                               ▼
//!                   tasks::TaskRunner ──▶ invoke <task>
//!                               │
//!                               ▼
//!                   lifecycle::Launcher ──▶ exec terminal command
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod tasks;

pub use config::{EntrypointConfig, Environment};
pub use error::{EntrypointError, EntrypointResult};
pub use lifecycle::{ExecLauncher, Launcher, Mode, Orchestrator, TerminalCommand};
pub use tasks::{InvokeRunner, Task, TaskFailure, TaskRunner, TaskStatus};
