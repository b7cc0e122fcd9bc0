//! Terminal command launch.
//!
//! The real launcher replaces the entrypoint's process image, so a
//! successful launch never returns to the caller.

use std::fmt;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

use thiserror::Error;

use crate::config::Environment;
use crate::lifecycle::Mode;

/// Errors raised while handing over to the terminal command.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The selected command has no words to execute.
    #[error("no command to run in {0} mode")]
    EmptyCommand(Mode),

    /// `exec` itself failed.
    #[error("cannot exec '{program}': {source}")]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Exec { source, .. } if source.kind() == io::ErrorKind::NotFound => 127,
            _ => 126,
        }
    }
}

/// The command the entrypoint hands control to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalCommand {
    pub mode: Mode,
    pub argv: Vec<String>,
}

impl TerminalCommand {
    /// Build from an argument vector, rejecting an empty one.
    pub fn new(mode: Mode, argv: Vec<String>) -> Result<Self, LaunchError> {
        if argv.is_empty() {
            return Err(LaunchError::EmptyCommand(mode));
        }
        Ok(Self { mode, argv })
    }

    /// Build from a command string such as `UWSGI_CMD`.
    ///
    /// Splits on whitespace only, the way an unquoted shell expansion does.
    pub fn from_command_line(mode: Mode, line: &str) -> Result<Self, LaunchError> {
        Self::new(mode, line.split_whitespace().map(str::to_owned).collect())
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }
}

impl fmt::Display for TerminalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

/// Hands control to the terminal command.
pub trait Launcher {
    /// Run `command` with `env` as its whole environment.
    ///
    /// Process-replacing implementations only return on failure.
    fn launch(&mut self, command: &TerminalCommand, env: &Environment) -> Result<(), LaunchError>;
}

/// Replaces the current process via `execvp`.
///
/// Standard input, output and error are inherited unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecLauncher;

impl Launcher for ExecLauncher {
    fn launch(&mut self, command: &TerminalCommand, env: &Environment) -> Result<(), LaunchError> {
        if command.argv.is_empty() {
            return Err(LaunchError::EmptyCommand(command.mode));
        }

        let source = Command::new(command.program())
            .args(command.args())
            .env_clear()
            .envs(env.iter())
            .exec();

        Err(LaunchError::Exec {
            program: command.program().to_string(),
            source,
        })
    }
}
