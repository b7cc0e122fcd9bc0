//! Startup orchestration.
//!
//! # Responsibilities
//! - Run the fixed task prefix (update, waitfordbs, migrations)
//! - Load the environment override files between `update` and the rest
//! - Select the mode and, for production, run the site preparation tasks
//! - Hand over to the terminal command
//!
//! # Design Decisions
//! - Fail fast: any task failure is fatal
//! - Tasks run in order, not concurrently
//! - Launch happens last, after every task succeeded
//! - A failure is logged once, as "Startup aborted", naming the phase it hit
//!
//! # Phases
//! ```text
//! Init -> TasksRunning -> ModeSelected -> Exec
//!                              |
//!                              +-> ProductionPrep -> Exec
//! any phase -> Failed
//! ```

use std::fmt;
use std::time::Instant;

use crate::config::{Environment, PathsConfig};
use crate::error::EntrypointResult;
use crate::lifecycle::launch::{Launcher, TerminalCommand};
use crate::lifecycle::mode::{self, Mode, CELERY_CMD, UWSGI_CMD};
use crate::observability::diagnostics;
use crate::tasks::{Task, TaskFailure, TaskRunner};

/// Where the startup sequence currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    TasksRunning,
    ModeSelected(Mode),
    /// Production site preparation and one-time initialization.
    ProductionPrep,
    Exec,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Init => f.write_str("init"),
            Phase::TasksRunning => f.write_str("tasks-running"),
            Phase::ModeSelected(mode) => write!(f, "mode-selected({})", mode),
            Phase::ProductionPrep => f.write_str("production-prep"),
            Phase::Exec => f.write_str("exec"),
            Phase::Failed => f.write_str("failed"),
        }
    }
}

/// Result of a completed startup sequence, ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    pub command: TerminalCommand,
    /// Environment after the override files were applied.
    pub env: Environment,
}

/// Sequences the lifecycle tasks and selects the terminal command.
pub struct Orchestrator<R> {
    runner: R,
    paths: PathsConfig,
}

impl<R: TaskRunner> Orchestrator<R> {
    pub fn new(runner: R, paths: PathsConfig) -> Self {
        Self { runner, paths }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run every startup task, then launch the terminal command.
    ///
    /// With a process-replacing launcher this only returns on failure.
    pub async fn run<L: Launcher>(
        &self,
        base_env: Environment,
        passthrough: Vec<String>,
        launcher: &mut L,
    ) -> EntrypointResult<()> {
        let mut phase = Phase::Init;
        let result = self.start(&mut phase, base_env, passthrough, launcher).await;
        if let Err(e) = &result {
            let failed_in = std::mem::replace(&mut phase, Phase::Failed);
            tracing::error!(
                phase = %phase,
                failed_in = %failed_in,
                exit_code = e.exit_code(),
                error = %e,
                "Startup aborted"
            );
        }
        result
    }

    /// Run every startup task and select the terminal command, without
    /// launching it.
    pub async fn prepare(
        &self,
        base_env: Environment,
        passthrough: Vec<String>,
    ) -> EntrypointResult<Startup> {
        let mut phase = Phase::Init;
        self.sequence(&mut phase, base_env, passthrough).await
    }

    async fn start<L: Launcher>(
        &self,
        phase: &mut Phase,
        base_env: Environment,
        passthrough: Vec<String>,
        launcher: &mut L,
    ) -> EntrypointResult<()> {
        let startup = self.sequence(phase, base_env, passthrough).await?;

        *phase = Phase::Exec;
        tracing::info!(
            phase = %phase,
            mode = %startup.command.mode,
            command = %startup.command,
            "Launching terminal command"
        );
        launcher.launch(&startup.command, &startup.env)?;
        Ok(())
    }

    async fn sequence(
        &self,
        phase: &mut Phase,
        base_env: Environment,
        passthrough: Vec<String>,
    ) -> EntrypointResult<Startup> {
        *phase = Phase::TasksRunning;
        self.run_all(&Task::PREFIX_BEFORE_ENV, &base_env).await?;

        // `update` may rewrite the override file, so it is read only now.
        let env = base_env
            .overlay_file(&self.paths.profile)?
            .overlay_file(&self.paths.override_env)?;
        diagnostics::log_configuration(&env);

        self.run_all(&Task::PREFIX_AFTER_ENV, &env).await?;

        let mode = mode::select_mode(&env);
        *phase = Phase::ModeSelected(mode);
        tracing::info!(phase = %phase, "Startup mode selected");

        let command = match mode {
            Mode::Development => TerminalCommand::new(mode, passthrough)?,
            Mode::Worker => TerminalCommand::from_command_line(mode, env.value(CELERY_CMD))?,
            Mode::Production => {
                *phase = Phase::ProductionPrep;
                self.prepare_production(&env).await?;
                TerminalCommand::from_command_line(mode, env.value(UWSGI_CMD))?
            }
        };

        Ok(Startup { command, env })
    }

    async fn prepare_production(&self, env: &Environment) -> Result<(), TaskFailure> {
        self.run_task(Task::Prepare, env).await?;

        if mode::first_start(env, &self.paths.lock_file) {
            tracing::info!(
                lock_file = %self.paths.lock_file.display(),
                "First start, running one-time initialization"
            );
            self.run_all(&Task::FIRST_START, env).await?;
        } else {
            tracing::info!(
                lock_file = %self.paths.lock_file.display(),
                "Already initialized, skipping one-time initialization"
            );
        }

        self.run_all(&Task::PRODUCTION_SUFFIX, env).await
    }

    async fn run_all(&self, tasks: &[Task], env: &Environment) -> Result<(), TaskFailure> {
        for &task in tasks {
            self.run_task(task, env).await?;
        }
        Ok(())
    }

    async fn run_task(&self, task: Task, env: &Environment) -> Result<(), TaskFailure> {
        tracing::info!(task = %task, "Running task");
        let started = Instant::now();

        self.runner.run(task, env).await?;

        tracing::info!(
            task = %task,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{} tasks done",
            task
        );
        Ok(())
    }
}

impl<R> fmt::Debug for Orchestrator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::ModeSelected(Mode::Worker).to_string(), "mode-selected(worker)");
        assert_eq!(Phase::ProductionPrep.to_string(), "production-prep");
        assert_eq!(Phase::Failed.to_string(), "failed");
    }
}
