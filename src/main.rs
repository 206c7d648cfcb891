//! Binary entry point for ragtime-rs.
//!
//! Installs the process-wide `tracing` subscriber — library code only ever
//! emits events, never configures one itself — then dispatches to the CLI.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use ragtime_rs::cli::output::format_error;
use ragtime_rs::cli::{Cli, OutputFormat, execute};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    match execute(&cli).await {
        Ok(output) => {
            if !output.is_empty() {
                if let Err(e) = write!(io::stdout(), "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let error_output = format_error(&err, format);
            match format {
                OutputFormat::Json => println!("{error_output}"),
                OutputFormat::Text => eprintln!("Error: {error_output}"),
            }
            ExitCode::FAILURE
        }
    }
}
