/*!
 * SimpleShell - Main Entry Point
 *
 * Usage: rr-scheduler <NCPU> <TSLICE in milliseconds>
 */

use std::process::ExitCode;

use rr_scheduler::{init_tracing, usage, SchedulerConfig};
use tracing::{error, info};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rr-scheduler");

    let config = match SchedulerConfig::from_args(&args)
        .and_then(SchedulerConfig::with_env_overrides)
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", usage(program));
            eprintln!("{:?}", miette::Report::new(e));
            return ExitCode::FAILURE;
        }
    };

    info!(
        ncpu = config.ncpu.get(),
        quantum_ms = config.quantum_ms(),
        capacity = config.queue_capacity.get(),
        "Starting shell"
    );

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Shell terminated");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(unix)]
fn run(config: SchedulerConfig) -> anyhow::Result<()> {
    use rr_scheduler::{OsLauncher, Session, Shell};

    let mut shell = Shell::new(Session::new(config, OsLauncher));
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    shell.run(stdin.lock(), stdout.lock())
}

#[cfg(not(unix))]
fn run(_config: SchedulerConfig) -> anyhow::Result<()> {
    anyhow::bail!("job control requires a unix platform")
}
