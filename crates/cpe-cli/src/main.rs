use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cpe_cli::commands::{polls, report};
use cpe_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Report {
            attendance,
            polls: poll_files,
            registrants,
            session_start,
            session_end,
            increment,
            json,
            output,
        }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let session = report::parse_session_window(
                session_start.as_deref().or(config.session_start.as_deref()),
                session_end.as_deref().or(config.session_end.as_deref()),
            );

            let options = report::ReportOptions {
                attendance: attendance.clone(),
                polls: poll_files.clone(),
                registrants: registrants.clone(),
                session,
                increment: increment.unwrap_or(config.increment),
                json: *json,
                output: output.clone(),
            };
            report::run(&options)?;
        }
        Some(Commands::Polls { file }) => {
            polls::run(file)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
