use clap::Parser;
use hubnet_cli::{Cli, Commands, HubnetConfig};
use std::process::ExitCode;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Solve {
            instance,
            solver,
            format,
            out,
        } => {
            let config = HubnetConfig::resolve(cli.config.as_deref())?;
            commands::solve::handle(
                &config,
                instance,
                solver.as_deref(),
                *format,
                out.as_deref(),
            )
        }
        Commands::Validate { instance } => commands::validate::handle(instance),
        Commands::Solvers => {
            commands::solvers::handle();
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so that JSON reports on stdout stay parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
