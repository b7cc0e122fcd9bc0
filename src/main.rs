use std::process::ExitCode;

use clap::Parser;

use geonode_entrypoint::cli::Cli;
use geonode_entrypoint::observability::logging;
use geonode_entrypoint::{Environment, ExecLauncher, InvokeRunner, Orchestrator};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.settings() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("geonode-entrypoint: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.logging);

    tracing::info!("geonode-entrypoint v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        invoke = %config.invoke.program.display(),
        lock_file = %config.paths.lock_file.display(),
        profile = %config.paths.profile.display(),
        override_env = %config.paths.override_env.display(),
        "Configuration loaded"
    );

    let orchestrator = Orchestrator::new(InvokeRunner::new(&config.invoke), config.paths.clone());

    match orchestrator
        .run(Environment::from_process(), cli.command, &mut ExecLauncher)
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        // Already logged by the orchestrator.
        Err(e) => ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1)),
    }
}
