//! Loading the project and the url maps operations work on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{Manifest, Target};
use crate::core::table::{build_table, NamespaceUrlTable};
use crate::core::url_map::RawUrlMap;
use crate::core::validate::{validate, ValidationOptions, ValidationReport};
use crate::sources::{self, JsStyle};
use crate::util::config::Config;
use crate::util::context::GlobalContext;
use crate::util::fs::display_relative;

/// A loaded Docmap.toml with its merged configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub manifest: Manifest,
    pub config: Config,
}

impl Project {
    /// Find and load the manifest above the working directory.
    pub fn load(ctx: &GlobalContext) -> Result<Self> {
        let manifest_path = ctx.find_manifest()?;
        Self::load_from(ctx, &manifest_path)
    }

    /// Load a specific manifest file.
    pub fn load_from(ctx: &GlobalContext, manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let config = ctx.config(Some(&manifest.manifest_dir));
        Ok(Project { manifest, config })
    }

    /// Project root (directory containing Docmap.toml).
    pub fn root(&self) -> &Path {
        &self.manifest.manifest_dir
    }

    /// Validation options for a target.
    pub fn options_for(&self, target: &Target) -> ValidationOptions {
        self.config.validation_options(target.duplicates)
    }

    pub fn js_style(&self) -> JsStyle {
        self.config.js_style()
    }

    /// Validate a target's map without building it.
    pub fn check_target(&self, target: &Target) -> (RawUrlMap, ValidationReport) {
        let map = self.manifest.target_map(target);
        let report = validate(&map, &self.options_for(target));
        (map, report)
    }

    /// Build the table for a target.
    pub fn build_target(&self, target: &Target) -> Result<(NamespaceUrlTable, ValidationReport)> {
        let map = self.manifest.target_map(target);
        let built = build_table(&map, &self.options_for(target))
            .with_context(|| format!("target `{}` has an invalid url map", target.name))?;
        Ok(built)
    }

    /// Path of a target's output relative to the project root, for display.
    pub fn display_output(&self, target: &Target) -> Option<PathBuf> {
        target
            .output
            .as_deref()
            .map(|path| display_relative(self.root(), path))
    }
}

/// Where an operation reads its url map from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// A url map file in any supported format.
    File(PathBuf),
    /// A manifest target; `None` selects the default target.
    Target(Option<String>),
}

impl MapSource {
    /// `--file` wins over `--target`.
    pub fn from_args(file: Option<PathBuf>, target: Option<String>) -> Self {
        match file {
            Some(path) => MapSource::File(path),
            None => MapSource::Target(target),
        }
    }
}

/// A built table and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Target name or file path
    pub name: String,
    pub table: NamespaceUrlTable,
    pub report: ValidationReport,
}

/// Load a url map from `source` and build its table.
///
/// File maps use the configuration of the enclosing project when there is
/// one, otherwise the working directory's.
pub fn load_table(ctx: &GlobalContext, source: &MapSource) -> Result<LoadedTable> {
    match source {
        MapSource::File(path) => {
            let path = ctx.cwd().join(path);
            let map = sources::load_file(&path)?;
            let root = ctx.find_project_root().ok();
            let config = ctx.config(root.as_deref());
            let (table, report) = build_table(&map, &config.validation_options(None))?;
            Ok(LoadedTable {
                name: path.display().to_string(),
                table,
                report,
            })
        }
        MapSource::Target(name) => {
            let project = Project::load(ctx)?;
            let target = project.manifest.select_target(name.as_deref())?;
            let (table, report) = project.build_target(target)?;
            Ok(LoadedTable {
                name: target.name.clone(),
                table,
                report,
            })
        }
    }
}
