//! Implementation of `docmap init`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::{default_entries, generate_manifest, is_valid_target_name, MANIFEST_NAME};
use crate::core::table::build_table;
use crate::core::validate::ValidationOptions;
use crate::core::url_map::RawUrlMap;
use crate::sources::{self, Format, JsStyle};
use crate::util::fs;

/// Options for creating a Docmap.toml.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Project name (defaults to the directory name)
    pub name: Option<String>,

    /// Import entries from an existing url map file
    pub from: Option<PathBuf>,

    /// Target receiving the imported file as its output
    pub target: Option<String>,
}

/// Target name used for an imported url map when none is given.
pub const IMPORT_TARGET: &str = "docs";

/// Create Docmap.toml in `dir`. Returns the manifest path.
pub fn init_project(dir: &Path, opts: &InitOptions) -> Result<PathBuf> {
    let manifest_path = dir.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, dir.display());
    }

    let name = match opts.name {
        Some(ref name) => name.clone(),
        None => dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("cannot derive a project name from {}", dir.display()))?,
    };

    let content = match opts.from {
        Some(ref from) => {
            let path = dir.join(from);
            let map = sources::load_file(&path)?;
            // Importing a broken file would only move the problem
            build_table(&map, &ValidationOptions::default())
                .with_context(|| format!("cannot import {}", path.display()))?;

            let output = fs::display_relative(dir, &path);
            let output = output.to_string_lossy().replace('\\', "/");
            let target = opts.target.as_deref().unwrap_or(IMPORT_TARGET);
            if !is_valid_target_name(target) {
                bail!("invalid target name `{}`: use letters, digits, `-` and `_`", target);
            }
            tracing::info!("importing {} entries from {}", map.len(), path.display());
            warn_if_relayout(&path, &map);
            generate_manifest(&name, &map, Some((target, output.as_str())))
        }
        None => generate_manifest(&name, &default_entries(), None),
    };

    fs::write_string(&manifest_path, &content)?;
    tracing::info!("created {}", manifest_path.display());

    Ok(manifest_path)
}

/// Warn when `emit` would not reproduce the imported file as it is.
fn warn_if_relayout(path: &Path, map: &RawUrlMap) {
    let Some(format) = Format::from_path(path) else {
        return;
    };
    let (Ok(original), Ok(rendered)) = (
        fs::read_to_string(path),
        sources::render(map, format, &JsStyle::default()),
    ) else {
        return;
    };
    if original != rendered {
        tracing::warn!(
            "{} is not in docmap's layout; `docmap emit` will rewrite it",
            path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::Manifest;
    use crate::test_support::URLMAP_COMMENTED;
    use tempfile::TempDir;

    #[test]
    fn test_init_defaults() {
        let tmp = TempDir::new().unwrap();
        let opts = InitOptions {
            name: Some("libical-glib".to_string()),
            ..InitOptions::default()
        };

        let path = init_project(tmp.path(), &opts).unwrap();
        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.project.name.as_deref(), Some("libical-glib"));
        assert_eq!(manifest.namespaces.len(), 3);
        assert_eq!(manifest.targets[0].name, "default");
    }

    #[test]
    fn test_init_refuses_existing_manifest() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), &InitOptions::default()).unwrap();

        let err = init_project(tmp.path(), &InitOptions::default()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_init_from_existing_file() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("urlmap.js"), URLMAP_COMMENTED).unwrap();

        let opts = InitOptions {
            name: Some("libical-glib".to_string()),
            from: Some(PathBuf::from("docs/urlmap.js")),
            target: None,
        };
        let path = init_project(tmp.path(), &opts).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        let target = manifest.target(IMPORT_TARGET).unwrap();
        assert_eq!(target.output.as_deref(), Some(docs.join("urlmap.js").as_path()));
        assert_eq!(target.header.len(), 2);
        assert!(target.comment.is_some());

        let map = manifest.target_map(target);
        let rendered = sources::render(&map, target.format(), &Default::default()).unwrap();
        assert_eq!(rendered, URLMAP_COMMENTED);
    }

    #[test]
    fn test_init_from_file_with_copyright_header() {
        let tmp = TempDir::new().unwrap();
        let text = "\
// Copyright 2024 The libical-glib authors
// SPDX-License-Identifier: LGPL-2.1-only OR MPL-2.0

// Documentation roots for cross-references
//
// Keep in sync with the GIR dependencies.
baseURLs = [
    [ 'GLib', 'https://docs.gtk.org/glib/' ],
    [ 'GObject', 'https://docs.gtk.org/gobject/' ],
]
";
        std::fs::write(tmp.path().join("urlmap.js"), text).unwrap();

        let opts = InitOptions {
            from: Some(PathBuf::from("urlmap.js")),
            ..InitOptions::default()
        };
        let path = init_project(tmp.path(), &opts).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        let target = manifest.target(IMPORT_TARGET).unwrap();
        let map = manifest.target_map(target);
        let rendered = sources::render(&map, target.format(), &Default::default()).unwrap();
        assert_eq!(rendered, text);
    }

    #[test]
    fn test_init_from_invalid_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("urlmap.js"),
            "baseURLs = [ [ 'GLib', 'docs.gtk.org/glib/' ] ]\n",
        )
        .unwrap();

        let opts = InitOptions {
            from: Some(PathBuf::from("urlmap.js")),
            ..InitOptions::default()
        };
        assert!(init_project(tmp.path(), &opts).is_err());
        assert!(!tmp.path().join(MANIFEST_NAME).exists());
    }
}
