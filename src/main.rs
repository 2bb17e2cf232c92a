//! PlayWise command-line entry point.

use clap::{CommandFactory, Parser};
use playwise::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("playwise=info".parse()?))
        .init();

    if cli::run_command(&args)? {
        return Ok(());
    }

    cli::Cli::command().print_help()?;
    println!();
    Ok(())
}
