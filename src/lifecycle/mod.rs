//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     update → load env files → echo config → waitfordbs → migrations
//!     → mode.rs (Development | Worker | Production)
//!     → Production only: prepare → [first-start block] → statics ... updateadmin
//!
//! Launch (launch.rs):
//!     TerminalCommand → exec, replacing the entrypoint process
//! ```
//!
//! # Design Decisions
//! - Fail fast: the first failing task aborts startup with its status
//! - Tasks run strictly in order, never concurrently
//! - Launch is the last step and does not return on success

pub mod launch;
pub mod mode;
pub mod startup;

pub use launch::{ExecLauncher, LaunchError, Launcher, TerminalCommand};
pub use mode::{first_start, select_mode, Mode};
pub use startup::{Orchestrator, Phase, Startup};
