//! Implementation of `docmap diff`.
//!
//! Compares two url maps and reports drift. Nothing is reconciled: whether
//! a difference is intentional is for a person to decide.

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::namespace::{BaseUrl, Namespace};
use crate::core::table::{NamespaceUrlEntry, NamespaceUrlTable};
use crate::util::context::GlobalContext;

use super::project::{load_table, LoadedTable, MapSource};

/// A namespace mapped to different URLs on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedEntry {
    pub namespace: Namespace,
    pub left: BaseUrl,
    pub right: BaseUrl,
}

/// Differences between two tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapDiff {
    pub only_left: Vec<NamespaceUrlEntry>,
    pub only_right: Vec<NamespaceUrlEntry>,
    pub changed: Vec<ChangedEntry>,
    /// Shared namespaces appear in a different order
    pub reordered: bool,
}

impl MapDiff {
    /// Both sides map the same namespaces to the same URLs.
    pub fn same_mapping(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty() && self.changed.is_empty()
    }

    /// Nothing differs, order included.
    pub fn is_empty(&self) -> bool {
        self.same_mapping() && !self.reordered
    }
}

/// Compare two tables.
pub fn diff_tables(left: &NamespaceUrlTable, right: &NamespaceUrlTable) -> MapDiff {
    let mut diff = MapDiff::default();

    for entry in left {
        match right.lookup(entry.namespace.as_str()) {
            None => diff.only_left.push(entry.clone()),
            Some(url) if url != &entry.base_url => diff.changed.push(ChangedEntry {
                namespace: entry.namespace.clone(),
                left: entry.base_url.clone(),
                right: url.clone(),
            }),
            Some(_) => {}
        }
    }

    diff.only_right = right
        .iter()
        .filter(|e| !left.contains(e.namespace.as_str()))
        .cloned()
        .collect();

    let shared_left = left.namespaces().filter(|n| right.contains(n.as_str()));
    let shared_right = right.namespaces().filter(|n| left.contains(n.as_str()));
    diff.reordered = !shared_left.eq(shared_right);

    diff
}

/// Resolve a diff operand: an existing file, otherwise a target name.
pub fn resolve_operand(ctx: &GlobalContext, operand: &str) -> Result<LoadedTable> {
    let path = Path::new(operand);
    if ctx.cwd().join(path).is_file() {
        return load_table(ctx, &MapSource::File(path.to_path_buf()));
    }
    if ctx.find_manifest().is_err() {
        bail!("`{}` is neither a url map file nor a target (no Docmap.toml found)", operand);
    }
    load_table(ctx, &MapSource::Target(Some(operand.to_string())))
}

/// Compare two operands (file paths or target names).
pub fn diff(ctx: &GlobalContext, left: &str, right: &str) -> Result<MapDiff> {
    let left = resolve_operand(ctx, left)?;
    let right = resolve_operand(ctx, right)?;
    tracing::debug!("comparing {} with {}", left.name, right.name);
    Ok(diff_tables(&left.table, &right.table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::DuplicatePolicy;
    use crate::test_support::{entry, write_two_target_project, URLMAP_COMMENTED, URLMAP_PLAIN};
    use tempfile::TempDir;

    fn table(entries: &[(&str, &str)]) -> NamespaceUrlTable {
        NamespaceUrlTable::from_entries(
            entries.iter().map(|(n, u)| entry(n, u)),
            DuplicatePolicy::Reject,
        )
        .unwrap()
    }

    #[test]
    fn test_identical_tables() {
        let a = table(&[("GLib", "https://docs.gtk.org/glib/")]);
        assert!(diff_tables(&a, &a).is_empty());
    }

    #[test]
    fn test_reports_each_kind_of_drift() {
        let a = table(&[
            ("GLib", "https://docs.gtk.org/glib/"),
            ("GObject", "https://docs.gtk.org/gobject/"),
            ("Gio", "https://docs.gtk.org/gio/"),
        ]);
        let b = table(&[
            ("Gio", "https://docs.gtk.org/gio/"),
            ("GLib", "https://developer.gnome.org/glib/"),
            ("Gtk", "https://docs.gtk.org/gtk4/"),
        ]);

        let diff = diff_tables(&a, &b);
        assert_eq!(diff.only_left.len(), 1);
        assert_eq!(diff.only_left[0].namespace.as_str(), "GObject");
        assert_eq!(diff.only_right[0].namespace.as_str(), "Gtk");
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].right.as_str(), "https://developer.gnome.org/glib/");
        assert!(diff.reordered);
        assert!(!diff.same_mapping());
    }

    #[test]
    fn test_order_only() {
        let a = table(&[
            ("GLib", "https://docs.gtk.org/glib/"),
            ("Gio", "https://docs.gtk.org/gio/"),
        ]);
        let b = table(&[
            ("Gio", "https://docs.gtk.org/gio/"),
            ("GLib", "https://docs.gtk.org/glib/"),
        ]);

        let diff = diff_tables(&a, &b);
        assert!(diff.same_mapping());
        assert!(diff.reordered);
    }

    #[test]
    fn test_two_observed_files_agree() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("plain.js"), URLMAP_PLAIN).unwrap();
        std::fs::write(tmp.path().join("commented.js"), URLMAP_COMMENTED).unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_config_dir(None);

        let diff = diff(&ctx, "plain.js", "commented.js").unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_target_against_file() {
        let tmp = TempDir::new().unwrap();
        write_two_target_project(tmp.path());
        std::fs::write(
            tmp.path().join("old.js"),
            "baseURLs = [ [ 'GLib', 'https://docs.gtk.org/glib/' ] ]\n",
        )
        .unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_config_dir(None);

        let diff = diff(&ctx, "v3", "old.js").unwrap();
        assert_eq!(diff.only_left.len(), 2);
        assert!(diff.only_right.is_empty());
    }

    #[test]
    fn test_unknown_operand() {
        let tmp = TempDir::new().unwrap();
        write_two_target_project(tmp.path());
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_config_dir(None);

        let err = diff(&ctx, "v3", "v4").unwrap_err();
        assert!(err.to_string().contains("no target named `v4`"));
    }
}
