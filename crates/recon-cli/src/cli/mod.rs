use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{ArtifactArgs, Commands, ResolveArgs, SubmitArgs};

/// Top-level CLI parser for the `recon` binary.
#[derive(Debug, Parser)]
#[command(
    name = "recon",
    version,
    about = "recon - resolve records the backend created without telling you"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token (overrides api.token)
    #[arg(long, global = true)]
    pub token: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            token: self.token.clone(),
        }
    }
}
