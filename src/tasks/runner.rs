//! Task runner capability and its failure type.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Environment;
use crate::tasks::Task;

/// How a failed task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// The task exited with a non-zero code.
    Exited(i32),
    /// The task was killed by a signal.
    Signaled(i32),
    /// The task runner could not be started at all.
    SpawnFailed(String),
}

impl TaskStatus {
    /// Exit code the entrypoint terminates with, following shell conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskStatus::Exited(code) => *code,
            TaskStatus::Signaled(signal) => 128 + signal,
            TaskStatus::SpawnFailed(_) => 127,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Exited(code) => write!(f, "exit status {}", code),
            TaskStatus::Signaled(signal) => write!(f, "killed by signal {}", signal),
            TaskStatus::SpawnFailed(reason) => write!(f, "could not be started: {}", reason),
        }
    }
}

/// A task returned a failure status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task '{task}' failed ({status})")]
pub struct TaskFailure {
    pub task: Task,
    pub status: TaskStatus,
}

impl TaskFailure {
    pub fn new(task: Task, status: TaskStatus) -> Self {
        Self { task, status }
    }
}

/// Runs a named external task to completion.
///
/// Implementations block (asynchronously) until the task finishes and apply
/// no timeout or retry of their own.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Run `task` with `env` as its complete environment.
    async fn run(&self, task: Task, env: &Environment) -> Result<(), TaskFailure>;
}

#[async_trait]
impl<T: TaskRunner + ?Sized> TaskRunner for Arc<T> {
    async fn run(&self, task: Task, env: &Environment) -> Result<(), TaskFailure> {
        (**self).run(task, env).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = TaskFailure::new(Task::Fixtures, TaskStatus::Exited(2));
        assert_eq!(failure.to_string(), "task 'fixtures' failed (exit status 2)");

        let failure = TaskFailure::new(Task::Update, TaskStatus::SpawnFailed("No such file".into()));
        assert!(failure.to_string().contains("could not be started"));
        assert_eq!(failure.status.exit_code(), 127);
    }
}
