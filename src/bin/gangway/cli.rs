//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Gangway - generate C FFI adapters from C headers
#[derive(Parser)]
#[command(name = "gangway")]
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
    /// Generate adapter sources from header files
    Generate(GenerateArgs),

    /// Parse and type-check headers without writing output
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Header files or glob patterns to process
    #[arg(required = true)]
    pub headers: Vec<String>,

    /// Output directory for generated sources (default: generated/)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Adapter symbol prefix (default: gw_<header stem>)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Library name used to derive the default prefix
    #[arg(long)]
    pub lib_name: Option<String>,

    /// Also dump the parsed declarations as JSON
    #[arg(long)]
    pub emit_decls: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Header files or glob patterns to check
    #[arg(required = true)]
    pub headers: Vec<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
