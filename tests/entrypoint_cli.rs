//! End-to-end runs of the entrypoint binary with a fake task runner.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

const FAKE_INVOKE: &str = r#"printf '%s\n' "$1" >> "$TASK_LOG"
if [ "$1" = "$FAIL_TASK" ]; then
    exit "${FAIL_CODE:-1}"
fi
"#;

const MODE_VARS: [&str; 7] = [
    "DOCKER_ENV",
    "IS_CELERY",
    "IS_FIRST_START",
    "FORCE_REINIT",
    "CELERY_CMD",
    "UWSGI_CMD",
    "INVOKE_LOG_STDOUT",
];

struct Fixture {
    dir: TempDir,
    task_log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("invoke.sh"), FAKE_INVOKE).expect("write fake invoke");
        let task_log = dir.path().join("tasks.txt");
        Self { dir, task_log }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_geonode-entrypoint"));
        for var in MODE_VARS {
            cmd.env_remove(var);
        }
        cmd.env("TASK_LOG", &self.task_log)
            .env("RUST_LOG", "info")
            .arg("--invoke-bin")
            .arg("/bin/sh")
            .arg("--invoke-arg")
            .arg(self.path("invoke.sh"))
            .arg("--workdir")
            .arg(self.dir.path())
            .arg("--invoke-log")
            .arg(self.path("invoke.log"))
            .arg("--lock-file")
            .arg(self.path("geonode_init.lock"))
            .arg("--profile")
            .arg(self.path(".bashrc"))
            .arg("--override-env")
            .arg(self.path(".override_env"));
        cmd
    }

    fn tasks(&self) -> Vec<String> {
        read_lines(&self.task_log)
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn development_execs_own_arguments() {
    let fixture = Fixture::new();

    let output = fixture
        .command()
        .arg("--")
        .arg("/bin/echo")
        .arg("hello from runserver")
        .assert()
        .success()
        .get_output()
        .clone();

    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello from runserver\n");
    assert_eq!(fixture.tasks(), ["update", "waitfordbs", "migrations"]);
}

#[test]
fn worker_execs_celery_command_from_override_file() {
    let fixture = Fixture::new();
    fs::write(
        fixture.path(".override_env"),
        "export DOCKER_ENV=production\nexport IS_CELERY=true\nexport CELERY_CMD='/bin/echo celery ready'\n",
    )
    .unwrap();

    let output = fixture.command().assert().success().get_output().clone();

    assert_eq!(String::from_utf8_lossy(&output.stdout), "celery ready\n");
    assert_eq!(fixture.tasks(), ["update", "waitfordbs", "migrations"]);
}

#[test]
fn production_first_start_then_uwsgi() {
    let fixture = Fixture::new();

    let output = fixture
        .command()
        .env("DOCKER_ENV", "production")
        .env("UWSGI_CMD", "/bin/echo uwsgi up")
        .assert()
        .success()
        .get_output()
        .clone();

    assert_eq!(String::from_utf8_lossy(&output.stdout), "uwsgi up\n");
    assert_eq!(
        fixture.tasks(),
        [
            "update",
            "waitfordbs",
            "migrations",
            "prepare",
            "updategeoip",
            "fixtures",
            "monitoringfixture",
            "initialized",
            "statics",
            "waitforgeoserver",
            "geoserverfixture",
            "updateadmin",
        ]
    );
}

#[test]
fn production_with_lock_skips_initialization() {
    let fixture = Fixture::new();
    fs::write(fixture.path("geonode_init.lock"), "").unwrap();

    fixture
        .command()
        .env("DOCKER_ENV", "production")
        .env("UWSGI_CMD", "/bin/true")
        .assert()
        .success();

    assert_eq!(
        fixture.tasks(),
        [
            "update",
            "waitfordbs",
            "migrations",
            "prepare",
            "statics",
            "waitforgeoserver",
            "geoserverfixture",
            "updateadmin",
        ]
    );
}

#[test]
fn failing_task_exit_status_is_propagated() {
    let fixture = Fixture::new();

    let assert = fixture
        .command()
        .env("DOCKER_ENV", "production")
        .env("UWSGI_CMD", "/bin/echo never")
        .env("FAIL_TASK", "statics")
        .env("FAIL_CODE", "5")
        .assert()
        .code(5);

    assert!(assert.get_output().stdout.is_empty());
    assert_eq!(fixture.tasks().last().map(String::as_str), Some("statics"));
    assert!(!fixture.tasks().iter().any(|t| t == "waitforgeoserver"));

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("statics"), "stderr: {}", stderr);
}

#[test]
fn invalid_settings_fail_before_any_task() {
    let fixture = Fixture::new();
    let config = fixture.path("entrypoint.toml");
    fs::write(&config, "[logging]\nformat = \"xml\"\n").unwrap();

    fixture
        .command()
        .arg("--config")
        .arg(&config)
        .arg("--")
        .arg("/bin/true")
        .assert()
        .code(1);

    assert!(fixture.tasks().is_empty());
}
