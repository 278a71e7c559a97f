//! Implementation of `docmap add` and `docmap remove`.
//!
//! Docmap.toml is edited in place with `toml_edit`, so comments and layout
//! outside the touched entry survive.

use std::path::Path;

use anyhow::{bail, Context, Result};
use toml_edit::{value, ArrayOfTables, DocumentMut, Item, Table};

use crate::core::manifest::{Manifest, DEFAULT_TARGET};
use crate::core::namespace::{BaseUrl, Namespace};
use crate::util::fs;

/// Options for adding a namespace.
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Namespace name
    pub namespace: String,

    /// Base URL of its documentation
    pub url: String,

    /// Add to this target only (shared by every target otherwise)
    pub target: Option<String>,
}

/// Options for removing a namespace.
#[derive(Debug, Clone)]
pub struct RemoveOptions {
    /// Namespace name
    pub namespace: String,

    /// Remove from this target's entries (the shared ones otherwise)
    pub target: Option<String>,
}

fn parse_document(manifest_path: &Path) -> Result<DocumentMut> {
    let content = fs::read_to_string(manifest_path)?;
    content
        .parse()
        .with_context(|| format!("failed to parse {}", manifest_path.display()))
}

/// The table holding the `namespace` array: the document root, or a
/// `[target.<name>]` section.
fn section_mut<'a>(doc: &'a mut DocumentMut, target: Option<&str>) -> Result<&'a mut Table> {
    match target {
        None => Ok(doc.as_table_mut()),
        Some(name) => doc
            .get_mut("target")
            .and_then(Item::as_table_mut)
            .and_then(|targets| targets.get_mut(name))
            .and_then(Item::as_table_mut)
            .with_context(|| format!("no `[target.{}]` section in Docmap.toml", name)),
    }
}

/// Section name to edit for `target`. The implicit `default` target of a
/// manifest without `[target.*]` sections is the shared entries.
fn section_name<'a>(doc: &DocumentMut, target: Option<&'a str>) -> Option<&'a str> {
    match target {
        Some(DEFAULT_TARGET) if !doc.contains_key("target") => None,
        other => other,
    }
}

/// Write the edited document after making sure it is still a valid manifest.
fn write_document(manifest_path: &Path, doc: &DocumentMut) -> Result<()> {
    let updated = doc.to_string();
    Manifest::parse(&updated, manifest_path)
        .context("refusing to write an invalid Docmap.toml")?;
    fs::write_string(manifest_path, &updated)
}

/// Add a namespace to Docmap.toml.
pub fn add_namespace(manifest_path: &Path, opts: &AddOptions) -> Result<()> {
    let namespace = Namespace::new(opts.namespace.as_str())?;
    let url = BaseUrl::parse(&opts.url)?;

    let manifest = Manifest::load(manifest_path)?;
    let in_shared = manifest.namespaces.iter().any(|e| e.namespace == opts.namespace);
    match opts.target.as_deref() {
        None => {
            if in_shared {
                bail!("namespace `{}` is already mapped", namespace);
            }
            if let Some(target) = manifest
                .targets
                .iter()
                .find(|t| t.namespaces.iter().any(|e| e.namespace == opts.namespace))
            {
                bail!(
                    "namespace `{}` is already mapped by target `{}`",
                    namespace,
                    target.name
                );
            }
        }
        Some(name) => {
            let target = manifest.target(name)?;
            if in_shared || target.namespaces.iter().any(|e| e.namespace == opts.namespace) {
                bail!("namespace `{}` is already mapped for target `{}`", namespace, name);
            }
        }
    }

    let mut doc = parse_document(manifest_path)?;
    let name = section_name(&doc, opts.target.as_deref());
    let section = section_mut(&mut doc, name)?;
    let entries = section
        .entry("namespace")
        .or_insert(Item::ArrayOfTables(ArrayOfTables::new()))
        .as_array_of_tables_mut()
        .context("`namespace` in Docmap.toml must be written as [[namespace]] tables")?;

    let mut entry = Table::new();
    entry["name"] = value(namespace.as_str());
    entry["url"] = value(url.as_str());
    entries.push(entry);

    write_document(manifest_path, &doc)?;
    tracing::debug!("added {} -> {}", namespace, url);

    Ok(())
}

/// Remove a namespace from Docmap.toml. Returns the URL it was mapped to.
pub fn remove_namespace(manifest_path: &Path, opts: &RemoveOptions) -> Result<String> {
    let mut doc = parse_document(manifest_path)?;
    let name = section_name(&doc, opts.target.as_deref());
    let section = section_mut(&mut doc, name)?;

    let scope = match opts.target {
        Some(ref name) => format!("target `{}`", name),
        None => "the shared entries".to_string(),
    };

    let Some(entries) = section
        .get_mut("namespace")
        .and_then(Item::as_array_of_tables_mut)
    else {
        bail!("namespace `{}` not found in {}", opts.namespace, scope);
    };

    let Some(pos) = entries
        .iter()
        .position(|t| t.get("name").and_then(Item::as_str) == Some(opts.namespace.as_str()))
    else {
        bail!("namespace `{}` not found in {}", opts.namespace, scope);
    };

    let url = entries
        .get(pos)
        .and_then(|t| t.get("url"))
        .and_then(Item::as_str)
        .unwrap_or_default()
        .to_string();
    entries.remove(pos);

    if entries.is_empty() {
        section.remove("namespace");
    }

    write_document(manifest_path, &doc)?;
    tracing::debug!("removed {} from {}", opts.namespace, scope);

    Ok(url)
}
