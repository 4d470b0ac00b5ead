//! CLI argument parsing for the publish workflow.
//!
//! The CLI only resolves paths and output mode; normalization and validation
//! policy live in the library modules.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "livery-publish",
    version,
    about = "Validate livery metadata and publish the FS20/FS24 manifest",
    after_help = "Examples:\n  livery-publish publish --root .\n  livery-publish check --root . --json\n  livery-publish publish --liveries-dir meta --out dist/manifest.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Publish(PublishArgs),
    Check(CheckArgs),
}

/// Inputs shared by every command.
#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Repository root containing liveries/ and manifest.json
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Config file (defaults to <root>/publish.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding *.meta.json files (overrides config)
    #[arg(long, value_name = "DIR")]
    pub liveries_dir: Option<PathBuf>,

    /// Emit a machine-readable JSON report on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

/// Validate all metadata and write the manifest when everything passes.
#[derive(Parser, Debug)]
#[command(about = "Validate metadata and write manifest.json")]
pub struct PublishArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Manifest output path (overrides config)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Validate all metadata without writing anything.
#[derive(Parser, Debug)]
#[command(about = "Validate metadata without writing the manifest")]
pub struct CheckArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}
