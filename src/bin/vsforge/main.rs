//! vsforge CLI - Visual Studio project generation

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vsforge::util::diagnostic;
use vsforge::ExportError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ExportError>() {
            Some(export_error) => diagnostic::emit(&export_error.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("vsforge=debug")
    } else {
        EnvFilter::new("vsforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Export(args) => commands::export::execute(args),
        Commands::Targets(args) => commands::targets::execute(args),
        Commands::Configs(args) => commands::configs::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
