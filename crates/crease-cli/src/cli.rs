use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "crease",
    about = "Crease: ball-by-ball cricket scorer with exact undo",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score a match from a TOML script
    Play(PlayArgs),
    /// Print the scorecards in a saved scorebook
    Show(ShowArgs),
    /// Validate every innings log in a saved scorebook
    Verify(VerifyArgs),
    /// Print the effective match configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct PlayArgs {
    pub script: PathBuf,
    /// Write the resulting scorebook to this file
    #[arg(long)]
    pub save: Option<PathBuf>,
    /// Also print the last N commentary lines per innings
    #[arg(short = 'n', long, default_value_t = 0)]
    pub commentary: usize,
}

#[derive(Args)]
pub struct ShowArgs {
    pub blob: PathBuf,
    #[arg(short = 'n', long, default_value_t = 0)]
    pub commentary: usize,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub blob: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML file to read instead of the defaults
    #[arg(long)]
    pub file: Option<PathBuf>,
}
