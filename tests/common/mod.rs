//! Shared fakes for orchestrator tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use geonode_entrypoint::config::PathsConfig;
use geonode_entrypoint::lifecycle::launch::LaunchError;
use geonode_entrypoint::{Environment, Launcher, Task, TaskFailure, TaskRunner, TaskStatus, TerminalCommand};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

type Hook = Box<dyn Fn(Task) + Send + Sync>;

/// Task runner that records every call and fails on demand.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(Task, Environment)>>,
    failures: HashMap<Task, TaskStatus>,
    hook: Option<Hook>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `task` fail with `status`.
    pub fn failing(mut self, task: Task, status: TaskStatus) -> Self {
        self.failures.insert(task, status);
        self
    }

    /// Run `hook` whenever a task is invoked, before it reports its outcome.
    #[allow(dead_code)]
    pub fn on_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(Task) + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.calls.lock().unwrap().iter().map(|(task, _)| *task).collect()
    }

    /// Environment the given task was run with (first invocation).
    #[allow(dead_code)]
    pub fn env_for(&self, task: Task) -> Option<Environment> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| *t == task)
            .map(|(_, env)| env.clone())
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl TaskRunner for RecordingRunner {
    async fn run(&self, task: Task, env: &Environment) -> Result<(), TaskFailure> {
        self.calls.lock().unwrap().push((task, env.clone()));
        if let Some(hook) = &self.hook {
            hook(task);
        }
        match self.failures.get(&task) {
            Some(status) => Err(TaskFailure::new(task, status.clone())),
            None => Ok(()),
        }
    }
}

/// Launcher that records the command instead of replacing the process.
#[derive(Debug, Default)]
pub struct CapturingLauncher {
    pub launched: Vec<(TerminalCommand, Environment)>,
}

impl Launcher for CapturingLauncher {
    fn launch(&mut self, command: &TerminalCommand, env: &Environment) -> Result<(), LaunchError> {
        self.launched.push((command.clone(), env.clone()));
        Ok(())
    }
}

/// Buffer behind a thread-local subscriber, for asserting on log output.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogCapture {
    /// Route INFO and above on this thread into the buffer until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Scratch directory with profile, override and lock paths inside it.
///
/// None of the files exist until a test writes them.
pub struct Sandbox {
    pub dir: TempDir,
    pub paths: PathsConfig,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let paths = PathsConfig {
            lock_file: dir.path().join("geonode_init.lock"),
            profile: dir.path().join(".bashrc"),
            override_env: dir.path().join(".override_env"),
        };
        Self { dir, paths }
    }

    #[allow(dead_code)]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    #[allow(dead_code)]
    pub fn create_lock(&self) {
        touch(&self.paths.lock_file);
    }
}

#[allow(dead_code)]
pub fn touch(path: &Path) {
    std::fs::write(path, "").expect("write file");
}

pub fn env(pairs: &[(&str, &str)]) -> Environment {
    pairs.iter().copied().collect()
}

pub fn args(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
