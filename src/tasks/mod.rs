//! External task subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator step
//!     → catalogue.rs (fixed task name)
//!     → runner.rs (TaskRunner capability, success or TaskFailure)
//!     → invoke.rs (child process: <invoke-bin> <task>)
//! ```
//!
//! # Design Decisions
//! - Tasks are opaque: a name in, success or failure out
//! - The runner never retries and never applies a timeout
//! - The runner is injected so tests can record call order

pub mod catalogue;
pub mod invoke;
pub mod runner;

pub use catalogue::Task;
pub use invoke::InvokeRunner;
pub use runner::{TaskFailure, TaskRunner, TaskStatus};
