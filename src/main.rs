//! org-relevance binary entry point.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use org_relevance::cli::{Cli, execute};

/// Printed when the user interrupts the program.
const FAREWELL: &str = "пока!";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let code = runtime.block_on(async {
        tokio::select! {
            result = execute(&cli) => match result {
                Ok(output) => {
                    println!("{output}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            },
            Ok(()) = tokio::signal::ctrl_c() => {
                println!("\n{FAREWELL}");
                ExitCode::SUCCESS
            }
        }
    });

    // Stdin reads run on a blocking thread that would otherwise keep the
    // runtime alive after an interrupt.
    runtime.shutdown_background();
    Ok(code)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "org_relevance=debug"
    } else {
        "org_relevance=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
