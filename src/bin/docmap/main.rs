//! docmap CLI - namespace to documentation URL maps

use anyhow::Result;
use clap::Parser;
use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use docmap::core::{ManifestError, TableError};
use docmap::sources::ParseError;
use docmap::util::diagnostic::suggestions;
use docmap::util::{GlobalContext, Shell};

/// Options every command sees.
pub struct GlobalOptions {
    pub shell: Shell,
}

impl GlobalOptions {
    /// Context rooted at the current directory.
    pub fn context(&self) -> Result<GlobalContext> {
        GlobalContext::new()
    }
}

fn main() {
    let cli = Cli::parse();
    let opts = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.no_color),
    };

    if let Err(e) = run(cli, &opts) {
        report_error(&e, opts.shell.use_color());
        std::process::exit(1);
    }
}

fn run(cli: Cli, opts: &GlobalOptions) -> Result<()> {
    // Set up logging
    let filter = if opts.shell.is_quiet() {
        EnvFilter::new("docmap=error")
    } else if opts.shell.is_verbose() {
        EnvFilter::new("docmap=debug")
    } else {
        EnvFilter::new("docmap=info")
    };

    // stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(opts.shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Check(args) => commands::check::execute(args, opts),
        Commands::Lookup(args) => commands::lookup::execute(args, opts),
        Commands::Link(args) => commands::link::execute(args, opts),
        Commands::List(args) => commands::list::execute(args, opts),
        Commands::Emit(args) => commands::emit::execute(args, opts),
        Commands::Diff(args) => commands::diff::execute(args, opts),
        Commands::Init(args) => commands::init::execute(args, opts),
        Commands::Add(args) => commands::add::execute(args, opts),
        Commands::Remove(args) => commands::remove::execute(args, opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, with a source snippet when the error points into a file.
fn report_error(err: &anyhow::Error, color: bool) {
    let diagnostic = err
        .downcast_ref::<ParseError>()
        .map(|e| e as &dyn MietteDiagnostic)
        .or_else(|| {
            err.downcast_ref::<TableError>()
                .map(|e| e as &dyn MietteDiagnostic)
        });

    if let Some(diagnostic) = diagnostic {
        let theme = if color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut out = String::new();
        if GraphicalReportHandler::new_themed(theme)
            .render_report(&mut out, diagnostic)
            .is_ok()
        {
            // Context added on the way up, e.g. which target failed
            if err.to_string() != diagnostic.to_string() {
                eprintln!("error: {}", err);
            }
            eprint!("{}", out);
            return;
        }
    }

    eprintln!("error: {:#}", err);
    match err.downcast_ref::<ManifestError>() {
        Some(ManifestError::NotFound { .. }) => eprintln!("{}", suggestions::NO_MANIFEST),
        Some(ManifestError::UnknownTarget { .. }) => {
            eprintln!("{}", suggestions::TARGET_NOT_FOUND)
        }
        _ => {}
    }
}
