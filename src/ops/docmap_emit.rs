//! Implementation of `docmap emit`.
//!
//! Every target with an `output` gets its url map file generated from the
//! manifest. Files are only rewritten when their contents change, and in
//! check mode nothing is written at all.

use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::manifest::Target;
use crate::sources;
use crate::util::fs;

use super::project::Project;

/// Options for emitting url map files.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Only this target (all targets with an output otherwise)
    pub target: Option<String>,

    /// Report stale or missing files without writing
    pub check: bool,
}

/// State of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    /// Already matches the manifest
    UpToDate,
    /// Exists with different contents
    Stale,
    /// Does not exist
    Missing,
    /// Written by this run
    Written,
}

impl OutputStatus {
    /// Whether the file on disk disagrees with the manifest.
    pub fn is_out_of_date(self) -> bool {
        matches!(self, OutputStatus::Stale | OutputStatus::Missing)
    }
}

impl fmt::Display for OutputStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStatus::UpToDate => write!(f, "up to date"),
            OutputStatus::Stale => write!(f, "stale"),
            OutputStatus::Missing => write!(f, "missing"),
            OutputStatus::Written => write!(f, "written"),
        }
    }
}

/// Result for one target.
#[derive(Debug, Clone)]
pub struct EmitOutcome {
    pub target: String,
    /// Output path relative to the project root
    pub path: PathBuf,
    pub status: OutputStatus,
}

/// Render the file a target should have on disk.
///
/// The table is built first, so an invalid map never reaches a file.
pub fn render_target(project: &Project, target: &Target) -> Result<String> {
    let (table, report) = project.build_target(target)?;
    for issue in report.warnings() {
        tracing::warn!("target `{}`: {}", target.name, issue.message);
    }

    let mut map = table.to_raw();
    map.header = target.header.clone();
    map.comment = target.comment.clone();

    sources::render(&map, target.format(), &project.js_style())
}

/// Generate (or check) the url map files of the selected targets.
pub fn emit(project: &Project, opts: &EmitOptions) -> Result<Vec<EmitOutcome>> {
    let targets = project.manifest.select_targets(opts.target.as_deref())?;

    let mut outcomes = Vec::new();
    for target in targets {
        let Some(ref output) = target.output else {
            if opts.target.is_some() {
                bail!("target `{}` has no `output` file", target.name);
            }
            tracing::debug!("skipping target `{}` without output", target.name);
            continue;
        };

        let contents = render_target(project, target)?;
        let status = if opts.check {
            match fs::read_if_exists(output)? {
                None => OutputStatus::Missing,
                Some(existing) if existing == contents => OutputStatus::UpToDate,
                Some(_) => OutputStatus::Stale,
            }
        } else if fs::write_if_changed(output, &contents)? {
            tracing::info!("wrote {}", output.display());
            OutputStatus::Written
        } else {
            OutputStatus::UpToDate
        };

        outcomes.push(EmitOutcome {
            target: target.name.clone(),
            path: fs::display_relative(project.root(), output),
            status,
        });
    }

    if outcomes.is_empty() {
        bail!("no target in {} has an `output` file", project.manifest.path.display());
    }

    Ok(outcomes)
}
