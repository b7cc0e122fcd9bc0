//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! entrypoint.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI / ENTRYPOINT_* overrides
//!     → validation.rs (semantic checks)
//!     → EntrypointConfig (validated, immutable)
//!
//! process environment
//!     → env.rs (Environment snapshot)
//!     → overlay shell profile, then override file
//!     → Environment passed by reference to the orchestrator
//! ```
//!
//! # Design Decisions
//! - Settings and environment are immutable once loaded
//! - All settings have defaults so no file is required
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::Environment;
pub use loader::ConfigError;
pub use schema::{EntrypointConfig, InvokeConfig, LogFormat, LoggingConfig, PathsConfig};
pub use validation::ValidationError;
