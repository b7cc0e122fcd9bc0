//! Task runner backed by the `invoke` command line tool.
//!
//! Each task becomes one child process: `<program> [args...] <task-name>`.
//! The child receives the orchestrator's current `Environment` as its whole
//! environment, never the raw process environment.

use std::fs::OpenOptions;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::schema::InvokeConfig;
use crate::config::Environment;
use crate::tasks::{Task, TaskFailure, TaskRunner, TaskStatus};

/// Flag selecting whether task output goes to stdout or to the invoke log.
pub const LOG_STDOUT_FLAG: &str = "INVOKE_LOG_STDOUT";

/// Runs tasks through the `invoke` binary.
#[derive(Debug, Clone)]
pub struct InvokeRunner {
    program: PathBuf,
    args: Vec<String>,
    workdir: Option<PathBuf>,
    log_file: PathBuf,
}

impl InvokeRunner {
    pub fn new(config: &InvokeConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            workdir: config.workdir.clone(),
            log_file: config.log_file.clone(),
        }
    }

    fn build_command(&self, task: Task, env: &Environment) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(task.name())
            .env_clear()
            .envs(env.iter());

        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        if !env.flag(LOG_STDOUT_FLAG) {
            match self.open_log() {
                Ok((out, err)) => {
                    command.stdout(out).stderr(err);
                }
                Err(e) => {
                    tracing::warn!(
                        log_file = %self.log_file.display(),
                        error = %e,
                        "Cannot open invoke log, task output goes to stdout"
                    );
                }
            }
        }

        command
    }

    fn open_log(&self) -> std::io::Result<(Stdio, Stdio)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        let err = file.try_clone()?;
        Ok((Stdio::from(file), Stdio::from(err)))
    }
}

/// Map a finished child's status onto the task outcome.
pub(crate) fn classify(task: Task, status: ExitStatus) -> Result<(), TaskFailure> {
    if status.success() {
        return Ok(());
    }
    let status = match (status.code(), status.signal()) {
        (Some(code), _) => TaskStatus::Exited(code),
        (None, Some(signal)) => TaskStatus::Signaled(signal),
        (None, None) => TaskStatus::Exited(1),
    };
    Err(TaskFailure::new(task, status))
}

#[async_trait]
impl TaskRunner for InvokeRunner {
    async fn run(&self, task: Task, env: &Environment) -> Result<(), TaskFailure> {
        let mut command = self.build_command(task, env);

        let status = command.status().await.map_err(|e| {
            let reason = format!("{}: {}", self.program.display(), e);
            TaskFailure::new(task, TaskStatus::SpawnFailed(reason))
        })?;

        classify(task, status).inspect_err(|failure| {
            if !env.flag(LOG_STDOUT_FLAG) {
                tracing::error!(
                    task = %task,
                    log_file = %self.log_file.display(),
                    "Task failed ({}), see the invoke log for its output",
                    failure.status
                );
            }
        })
    }
}
