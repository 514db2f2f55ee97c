//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// vsforge - Generate Visual Studio solutions from a Forge.toml manifest
#[derive(Parser)]
#[command(name = "vsforge")]
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
    /// Write the solution, projects and resources for a manifest
    Export(ExportArgs),

    /// Display the target graph
    Targets(TargetsArgs),

    /// List the canonical configuration names
    Configs(ConfigsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ManifestArg {
    /// Path to Forge.toml (defaults to searching upwards from the current directory)
    #[arg(long, env = "VSFORGE_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,

    /// Visual Studio generation (vs2013, vs2015, vs2017)
    #[arg(long)]
    pub variant: Option<String>,

    /// Folder to write into, relative to the project root
    #[arg(long)]
    pub target_folder: Option<PathBuf>,

    /// Show what would be written without touching the disk
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct TargetsArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,

    /// Visual Studio generation used for file names
    #[arg(long)]
    pub variant: Option<String>,

    /// Print the graph as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ConfigsArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
