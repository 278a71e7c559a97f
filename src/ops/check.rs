//! Implementation of `docmap check`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::url_map::RawUrlMap;
use crate::core::validate::{validate, ValidationReport};
use crate::sources;
use crate::util::context::GlobalContext;

use super::docmap_emit::{emit, EmitOptions, EmitOutcome};
use super::project::Project;

/// Options for checking url maps.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Check a single url map file instead of the manifest
    pub file: Option<PathBuf>,

    /// Only this target
    pub target: Option<String>,

    /// Also verify generated files are up to date
    pub emitted: bool,
}

/// Validation result for one map.
#[derive(Debug, Clone)]
pub struct CheckedMap {
    /// Target name or file path
    pub name: String,
    pub map: RawUrlMap,
    pub report: ValidationReport,
}

/// Result of a check run.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub maps: Vec<CheckedMap>,
    /// Generated files, when `emitted` was requested
    pub outputs: Vec<EmitOutcome>,
}

impl CheckResult {
    pub fn error_count(&self) -> usize {
        self.maps.iter().map(|m| m.report.error_count()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.maps.iter().map(|m| m.report.warning_count()).sum()
    }

    /// Generated files that disagree with the manifest.
    pub fn out_of_date(&self) -> impl Iterator<Item = &EmitOutcome> {
        self.outputs.iter().filter(|o| o.status.is_out_of_date())
    }

    /// No errors and no out-of-date files. Warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0 && self.out_of_date().next().is_none()
    }
}

/// Validate url maps, collecting every issue instead of stopping at the
/// first one.
pub fn check(ctx: &GlobalContext, opts: &CheckOptions) -> Result<CheckResult> {
    if let Some(ref file) = opts.file {
        let path = ctx.cwd().join(file);
        let map = sources::load_file(&path)?;
        let root = ctx.find_project_root().ok();
        let config = ctx.config(root.as_deref());
        let report = validate(&map, &config.validation_options(None));
        return Ok(CheckResult {
            maps: vec![CheckedMap {
                name: file.display().to_string(),
                map,
                report,
            }],
            outputs: Vec::new(),
        });
    }

    let project = Project::load(ctx)?;
    let mut result = CheckResult::default();

    for target in project.manifest.select_targets(opts.target.as_deref())? {
        let (map, report) = project.check_target(target);
        tracing::debug!(
            "target `{}`: {} errors, {} warnings",
            target.name,
            report.error_count(),
            report.warning_count()
        );
        result.maps.push(CheckedMap {
            name: target.name.clone(),
            map,
            report,
        });
    }

    // Rendering needs valid tables, so stale outputs are only looked for
    // once every map checks out.
    if opts.emitted && result.error_count() == 0 {
        let emit_opts = EmitOptions {
            target: opts.target.clone(),
            check: true,
        };
        let any_output = project
            .manifest
            .select_targets(opts.target.as_deref())?
            .iter()
            .any(|t| t.output.is_some());
        if any_output {
            result.outputs = emit(&project, &emit_opts)?;
        }
    }

    Ok(result)
}
