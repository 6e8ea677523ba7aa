//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// dartbind - Generate Dart FFI bindings from Zig exports
#[derive(Parser)]
#[command(name = "dartbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Dart bindings for a Zig source file
    Generate(GenerateArgs),

    /// List the exports found in a Zig source file
    Inspect(InspectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that scan a Zig source file.
#[derive(Args)]
pub struct SourceArgs {
    /// Zig source file to scan (default: src/main.zig)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Namespace prefix of exported symbols (default: rr)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Configuration file (default: .dartbind/config.toml and ~/.dartbind/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write bindings to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the generated state class (default: ActiveAppState)
    #[arg(long = "class")]
    pub class_name: Option<String>,

    /// Name of the configuration string field (default: dataPath)
    #[arg(long)]
    pub config_field: Option<String>,

    /// Bootstrap export suffix (default: start)
    #[arg(long)]
    pub bootstrap: Option<String>,

    /// Skip `dart format`
    #[arg(long)]
    pub no_format: bool,

    /// Formatter executable (default: dart)
    #[arg(long)]
    pub formatter: Option<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
