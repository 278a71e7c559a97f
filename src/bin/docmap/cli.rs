//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// docmap - Namespace to documentation URL maps for GObject doc builds
#[derive(Parser)]
#[command(name = "docmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate url maps and report every problem found
    Check(CheckArgs),

    /// Print the base URL of a namespace
    Lookup(LookupArgs),

    /// Print the link to a page of a namespace's documentation
    Link(LinkArgs),

    /// List mapped namespaces, or the manifest's targets
    List(ListArgs),

    /// Generate url map files for the manifest's targets
    Emit(EmitArgs),

    /// Compare two url maps (files or target names)
    Diff(DiffArgs),

    /// Create Docmap.toml in an existing directory
    Init(InitArgs),

    /// Add a namespace to Docmap.toml
    Add(AddArgs),

    /// Remove a namespace from Docmap.toml
    Remove(RemoveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Check this url map file instead of the manifest
    #[arg(long, conflicts_with = "target")]
    pub file: Option<PathBuf>,

    /// Only check this target
    #[arg(long)]
    pub target: Option<String>,

    /// Also check that generated files are up to date
    #[arg(long)]
    pub emitted: bool,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Namespace to look up (e.g. GLib)
    pub namespace: String,

    /// Read this url map file instead of the manifest
    #[arg(long, conflicts_with = "target")]
    pub file: Option<PathBuf>,

    /// Target to read (defaults to `default-target` or the only target)
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct LinkArgs {
    /// Namespace the page belongs to
    pub namespace: String,

    /// Page path below the namespace root (e.g. struct.MainContext.html)
    pub page: String,

    /// Read this url map file instead of the manifest
    #[arg(long, conflicts_with = "target")]
    pub file: Option<PathBuf>,

    /// Target to read
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Read this url map file instead of the manifest
    #[arg(long, conflicts_with_all = ["target", "targets"])]
    pub file: Option<PathBuf>,

    /// Target to list
    #[arg(long)]
    pub target: Option<String>,

    /// List the manifest's targets instead of namespaces
    #[arg(long, conflicts_with = "target")]
    pub targets: bool,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct EmitArgs {
    /// Only emit this target
    #[arg(long)]
    pub target: Option<String>,

    /// Report stale or missing files without writing (exit 1 if any)
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// First url map: a file path or a target name
    pub left: String,

    /// Second url map: a file path or a target name
    pub right: String,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Import entries, header and comment from an existing url map file
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Name of the target that receives the imported file
    #[arg(long, requires = "from")]
    pub target: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Namespace name (e.g. Gtk)
    pub namespace: String,

    /// Base URL of its documentation, ending in `/`
    pub url: String,

    /// Add to this target only instead of every target
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Namespace name to remove
    pub namespace: String,

    /// Remove from this target's own entries
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
