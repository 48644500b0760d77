//! `simpl`: run and inspect SIMPL pipeline files.
//!
//! Exit status is 0 on success, 1 when a filter fails or the input cannot
//! be loaded, and 2 when `run --time-limit-ms` cancelled the run.

use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cmd;

#[derive(Parser)]
#[command(name = "simpl", version, about = "SIMPL pipeline runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preflight and execute a pipeline file
    Run(cmd::run::RunArgs),
    /// Preflight a pipeline file and print the resulting structure
    Preflight(cmd::preflight::PreflightArgs),
    /// List the available filters
    Filters(cmd::filters::FiltersArgs),
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => cmd::run::run(args),
        Commands::Preflight(args) => cmd::preflight::run(args),
        Commands::Filters(args) => cmd::filters::run(args),
    };
    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(cmd::EXIT_FAILURE);
        }
    }
}
