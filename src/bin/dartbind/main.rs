//! dartbind CLI - Generate Dart FFI bindings from Zig exports

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dartbind::ops::generate::{GenerateError, EXIT_IO};
use dartbind::util::diagnostic;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        std::process::exit(report(&e, color));
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging; stdout is reserved for generated code
    let filter = if cli.verbose {
        EnvFilter::new("dartbind=debug")
    } else {
        EnvFilter::new("dartbind=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error and pick the process exit code.
fn report(err: &anyhow::Error, color: bool) -> i32 {
    if let Some(e) = err.downcast_ref::<GenerateError>() {
        eprint!("{}", diagnostic::render(e, color));
        return e.exit_code();
    }

    eprintln!("error: {:#}", err);
    EXIT_IO
}
