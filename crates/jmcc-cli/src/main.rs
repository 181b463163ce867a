//! JMCC alerting binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jmcc_cli::cli::{Cli, Commands};
use jmcc_cli::commands::{DispatchCommand, EvaluateCommand, MetricsCommand};
use jmcc_cli::output::OutputFormat;
use jmcc_cli::snapshot::load_config;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), jmcc_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let config = load_config(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Evaluate(args) => {
            EvaluateCommand::new(&config).execute(&mut stdout, &format, &args)?;
        }
        Commands::Metrics(args) => {
            MetricsCommand::new(&config).execute(&mut stdout, &format, &args)?;
        }
        Commands::Dispatch { snapshot, email } => {
            DispatchCommand::new(&config).execute(&mut stdout, &format, &snapshot, email)?;
        }
    }

    Ok(())
}
