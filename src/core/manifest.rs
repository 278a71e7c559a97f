//! Docmap.toml manifest parsing and schema.
//!
//! The manifest holds the url map entries once and describes every
//! documentation build (target) that receives a generated url map file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::table::DuplicatePolicy;
use crate::core::url_map::{RawEntry, RawUrlMap};
use crate::sources::toml_map::EntrySpec;
use crate::sources::Format;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Docmap.toml";

/// Name of the target used when the manifest declares none.
pub const DEFAULT_TARGET: &str = "default";

static TARGET_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Whether `name` can be used as a target name.
pub fn is_valid_target_name(name: &str) -> bool {
    TARGET_NAME_RE.is_match(name)
}

/// Errors locating a manifest or a target in it.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Docmap.toml` in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("no target named `{name}` (available: {})", .available.join(", "))]
    UnknownTarget { name: String, available: Vec<String> },

    #[error("manifest has several targets, pick one with --target (available: {})", .available.join(", "))]
    AmbiguousTarget { available: Vec<String> },
}

/// Project metadata from the [project] section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMetadata {
    /// Project name, informational
    #[serde(default)]
    pub name: Option<String>,

    /// Target used by lookups when none is given
    #[serde(default, rename = "default-target")]
    pub default_target: Option<String>,
}

/// One documentation build receiving its own url map file.
#[derive(Debug, Clone)]
pub struct Target {
    /// Target name
    pub name: String,

    /// Generated file, absolute (resolved against the manifest directory)
    pub output: Option<PathBuf>,

    /// Header lines written at the top of the generated file
    pub header: Vec<String>,

    /// Descriptive comment written above the list
    pub comment: Option<String>,

    /// Per-target duplicate policy, overriding the configured one
    pub duplicates: Option<DuplicatePolicy>,

    /// Entries only this target carries, appended after the shared ones
    pub namespaces: Vec<RawEntry>,
}

impl Target {
    fn implicit() -> Self {
        Target {
            name: DEFAULT_TARGET.to_string(),
            output: None,
            header: Vec::new(),
            comment: None,
            duplicates: None,
            namespaces: Vec::new(),
        }
    }

    /// Format of the generated file, from its extension (JS when unknown).
    pub fn format(&self) -> Format {
        self.output
            .as_deref()
            .and_then(Format::from_path)
            .unwrap_or(Format::Js)
    }
}

/// The parsed Docmap.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectMetadata,

    /// Entries shared by every target, in authored order
    pub namespaces: Vec<RawEntry>,

    /// Targets, sorted by name
    pub targets: Vec<Target>,

    /// Path of the manifest file
    pub path: PathBuf,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    project: Option<ProjectMetadata>,

    #[serde(default)]
    namespace: Vec<EntrySpec>,

    #[serde(default)]
    target: BTreeMap<String, RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    #[serde(default)]
    output: Option<PathBuf>,

    #[serde(default)]
    header: Vec<String>,

    #[serde(default)]
    comment: Option<String>,

    #[serde(default)]
    duplicates: Option<DuplicatePolicy>,

    #[serde(default)]
    namespace: Vec<EntrySpec>,
}

fn to_entries(entries: Vec<EntrySpec>) -> Vec<RawEntry> {
    entries.iter().map(EntrySpec::to_raw).collect()
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        if raw.namespace.is_empty() && raw.target.is_empty() {
            anyhow::bail!(
                "manifest at {} must have [[namespace]] entries or a [target.<name>] section",
                path.display()
            );
        }

        let mut targets = Vec::new();
        for (name, raw_target) in raw.target {
            if !is_valid_target_name(&name) {
                anyhow::bail!(
                    "invalid target name `{}` in {}: use letters, digits, `-` and `_`",
                    name,
                    path.display()
                );
            }
            targets.push(Target {
                name,
                output: raw_target.output.map(|p| manifest_dir.join(p)),
                header: raw_target.header,
                comment: raw_target.comment,
                duplicates: raw_target.duplicates,
                namespaces: to_entries(raw_target.namespace),
            });
        }

        if targets.is_empty() {
            targets.push(Target::implicit());
        }

        let project = raw.project.unwrap_or_default();
        if let Some(ref default) = project.default_target {
            if !targets.iter().any(|t| &t.name == default) {
                anyhow::bail!(
                    "`default-target = \"{}\"` in {} names no target",
                    default,
                    path.display()
                );
            }
        }

        let outputs: Vec<_> = targets.iter().filter_map(|t| t.output.as_ref()).collect();
        for (i, output) in outputs.iter().enumerate() {
            if outputs[..i].contains(output) {
                anyhow::bail!(
                    "two targets in {} write the same file {}",
                    path.display(),
                    output.display()
                );
            }
        }

        tracing::debug!(
            "loaded {} with {} shared entries and {} targets",
            path.display(),
            raw.namespace.len(),
            targets.len()
        );

        Ok(Manifest {
            project,
            namespaces: to_entries(raw.namespace),
            targets,
            path: path.to_path_buf(),
            manifest_dir,
        })
    }

    /// Names of all targets, sorted.
    pub fn target_names(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    /// Find a target by name.
    pub fn target(&self, name: &str) -> Result<&Target, ManifestError> {
        self.targets
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ManifestError::UnknownTarget {
                name: name.to_string(),
                available: self.target_names(),
            })
    }

    /// The target to use when none was named.
    ///
    /// That is `default-target` when set, otherwise the only target.
    pub fn default_target(&self) -> Result<&Target, ManifestError> {
        if let Some(ref name) = self.project.default_target {
            return self.target(name);
        }
        match self.targets.as_slice() {
            [only] => Ok(only),
            _ => Err(ManifestError::AmbiguousTarget {
                available: self.target_names(),
            }),
        }
    }

    /// Resolve an optional `--target` into a single target.
    pub fn select_target(&self, name: Option<&str>) -> Result<&Target, ManifestError> {
        match name {
            Some(name) => self.target(name),
            None => self.default_target(),
        }
    }

    /// Resolve an optional `--target` into the targets to operate on: the
    /// named one, or all of them.
    pub fn select_targets(&self, name: Option<&str>) -> Result<Vec<&Target>, ManifestError> {
        match name {
            Some(name) => Ok(vec![self.target(name)?]),
            None => Ok(self.targets.iter().collect()),
        }
    }

    /// The url map a target receives: shared entries, then its own.
    pub fn target_map(&self, target: &Target) -> RawUrlMap {
        let mut entries = self.namespaces.clone();
        entries.extend(target.namespaces.iter().cloned());

        RawUrlMap {
            header: target.header.clone(),
            comment: target.comment.clone(),
            entries,
            source: None,
        }
    }
}

fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

/// Generate a Docmap.toml holding `map`'s entries.
///
/// When `target` is given as `(name, output)`, the map's header and comment
/// go into that target's section.
pub fn generate_manifest(project: &str, map: &RawUrlMap, target: Option<(&str, &str)>) -> String {
    let mut out = format!("[project]\nname = {}\n", quoted(project));

    for (name, url) in map.pairs() {
        out.push_str(&format!(
            "\n[[namespace]]\nname = {}\nurl = {}\n",
            quoted(name),
            quoted(url)
        ));
    }

    if let Some((name, output)) = target {
        out.push_str(&format!("\n[target.{}]\noutput = {}\n", name, quoted(output)));
        if !map.header.is_empty() {
            out.push_str("header = [\n");
            for line in &map.header {
                out.push_str(&format!("    {},\n", quoted(line)));
            }
            out.push_str("]\n");
        }
        if let Some(ref comment) = map.comment {
            out.push_str(&format!("comment = {}\n", quoted(comment)));
        }
    }

    out
}

/// The GLib / GObject / Gio entries every GObject library links against.
pub fn default_entries() -> RawUrlMap {
    let mut map = RawUrlMap::new();
    map.push("GLib", "https://docs.gtk.org/glib/");
    map.push("GObject", "https://docs.gtk.org/gobject/");
    map.push("Gio", "https://docs.gtk.org/gio/");
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gnome_map, MANIFEST_TWO_TARGETS};
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Manifest> {
        Manifest::parse(content, Path::new("/project/Docmap.toml"))
    }

    #[test]
    fn test_parse_two_targets() {
        let manifest = parse(MANIFEST_TWO_TARGETS).unwrap();
        assert_eq!(manifest.project.name.as_deref(), Some("libical-glib"));
        assert_eq!(manifest.namespaces.len(), 3);
        assert_eq!(manifest.target_names(), vec!["docs", "v3"]);

        let v3 = manifest.target("v3").unwrap();
        assert_eq!(
            v3.output.as_deref(),
            Some(Path::new("/project/v3/libical-glib/urlmap.js"))
        );
        assert_eq!(v3.format(), Format::Js);
        assert!(v3.comment.is_some());
    }

    #[test]
    fn test_target_map_merges_entries() {
        let content = format!(
            "{}\n[[target.v3.namespace]]\nname = \"Gtk\"\nurl = \"https://docs.gtk.org/gtk4/\"\n",
            MANIFEST_TWO_TARGETS
        );
        let manifest = parse(&content).unwrap();

        let docs = manifest.target_map(manifest.target("docs").unwrap());
        assert_eq!(
            docs.pairs().collect::<Vec<_>>(),
            gnome_map().pairs().collect::<Vec<_>>()
        );

        let v3 = manifest.target_map(manifest.target("v3").unwrap());
        assert_eq!(v3.len(), 4);
        assert_eq!(v3.entries[3].namespace, "Gtk");
        assert_eq!(v3.header.len(), 2);
    }

    #[test]
    fn test_implicit_default_target() {
        let manifest = parse(
            "[[namespace]]\nname = \"GLib\"\nurl = \"https://docs.gtk.org/glib/\"\n",
        )
        .unwrap();
        assert_eq!(manifest.target_names(), vec![DEFAULT_TARGET]);
        assert_eq!(manifest.default_target().unwrap().name, DEFAULT_TARGET);
        assert!(manifest.targets[0].output.is_none());
    }

    #[test]
    fn test_default_target_selection() {
        let manifest = parse(MANIFEST_TWO_TARGETS).unwrap();
        assert!(matches!(
            manifest.default_target(),
            Err(ManifestError::AmbiguousTarget { .. })
        ));
        assert_eq!(manifest.select_target(Some("docs")).unwrap().name, "docs");
        assert_eq!(manifest.select_targets(None).unwrap().len(), 2);

        let content = MANIFEST_TWO_TARGETS.replace(
            "name = \"libical-glib\"",
            "name = \"libical-glib\"\ndefault-target = \"v3\"",
        );
        let manifest = parse(&content).unwrap();
        assert_eq!(manifest.default_target().unwrap().name, "v3");
    }

    #[test]
    fn test_unknown_target() {
        let manifest = parse(MANIFEST_TWO_TARGETS).unwrap();
        let err = manifest.target("v4").unwrap_err();
        assert_eq!(err.to_string(), "no target named `v4` (available: docs, v3)");
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let err = parse("[project]\nname = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("must have [[namespace]] entries"));
    }

    #[test]
    fn test_bad_target_name_rejected() {
        let err = parse("[target.\"v 3\"]\noutput = \"a.js\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid target name"));
    }

    #[test]
    fn test_duplicate_outputs_rejected() {
        let content = "[target.a]\noutput = \"urlmap.js\"\n\n[target.b]\noutput = \"urlmap.js\"\n";
        let err = parse(content).unwrap_err();
        assert!(err.to_string().contains("write the same file"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let content = "[target.a]\noutput = \"urlmap.js\"\nkind = \"js\"\n";
        assert!(parse(content).is_err());
    }

    #[test]
    fn test_per_target_policy() {
        let content = "[target.a]\noutput = \"urlmap.js\"\nduplicates = \"last-wins\"\n";
        let manifest = parse(content).unwrap();
        assert_eq!(manifest.targets[0].duplicates, Some(DuplicatePolicy::LastWins));
    }

    #[test]
    fn test_generate_manifest_roundtrip() {
        let mut map = default_entries();
        map.header = vec!["SPDX-License-Identifier: LGPL-2.1-or-later".to_string()];
        map.comment = Some("A map between namespaces and base URLs".to_string());

        let text = generate_manifest("libical-glib", &map, Some(("docs", "docs/urlmap.js")));

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&path, &text).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        let target = manifest.target("docs").unwrap();
        let target_map = manifest.target_map(target);
        assert_eq!(target_map.header, map.header);
        assert_eq!(target_map.comment, map.comment);
        assert_eq!(
            target_map.pairs().collect::<Vec<_>>(),
            map.pairs().collect::<Vec<_>>()
        );
    }
}
