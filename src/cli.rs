use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::InfoLevel;

/// Convert ASP.NET Web Forms pages into Blazor components.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// `.aspx` files, or directories to search for them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Config file to use instead of ./aspx2blazor.json
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the generated documents instead of writing them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Disable output timing
    #[arg(long, default_value_t = false)]
    pub no_timing: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert pages to .razor files next to them. This is the default command.
    Convert(ConvertArgs),
    /// List the supported server controls and how they are rewritten
    Mappings,
}
