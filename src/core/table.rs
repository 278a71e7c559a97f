//! The namespace to base URL table.
//!
//! A [`NamespaceUrlTable`] is built once from a url map and never changes
//! afterward. It is `Send + Sync`, so a build may share it across threads by
//! reference or `Arc` without locking.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::namespace::{BaseUrl, Namespace};
use crate::core::url_map::RawUrlMap;
use crate::core::validate::{validate, Issue, ValidationOptions, ValidationReport};

/// How repeated namespace names with different URLs are handled.
///
/// Repeats with an identical URL are always collapsed into the first entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Refuse to build the table.
    #[default]
    Reject,
    /// Keep the first URL.
    FirstWins,
    /// Keep the last URL, at the position of the first occurrence.
    LastWins,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => write!(f, "reject"),
            DuplicatePolicy::FirstWins => write!(f, "first-wins"),
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(DuplicatePolicy::Reject),
            "first-wins" => Ok(DuplicatePolicy::FirstWins),
            "last-wins" => Ok(DuplicatePolicy::LastWins),
            other => Err(format!(
                "unknown duplicate policy `{}` (expected reject, first-wins or last-wins)",
                other
            )),
        }
    }
}

/// One namespace and the root of its hosted documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceUrlEntry {
    pub namespace: Namespace,
    #[serde(rename = "url")]
    pub base_url: BaseUrl,
}

impl NamespaceUrlEntry {
    pub fn new(namespace: Namespace, base_url: BaseUrl) -> Self {
        NamespaceUrlEntry {
            namespace,
            base_url,
        }
    }
}

/// Error building a table.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum TableError {
    #[error("{}", describe_invalid(.issues))]
    #[diagnostic(
        code(docmap::table::invalid),
        help("run `docmap check` for the full report")
    )]
    Invalid {
        issues: Vec<Issue>,
        #[source_code]
        src: Option<NamedSource<String>>,
        #[label(collection)]
        labels: Vec<LabeledSpan>,
    },

    #[error("namespace `{namespace}` is mapped to both `{first}` and `{second}`")]
    #[diagnostic(
        code(docmap::table::conflict),
        help("remove one entry or choose the first-wins / last-wins duplicate policy")
    )]
    Conflict {
        namespace: String,
        first: String,
        second: String,
    },
}

fn describe_invalid(issues: &[Issue]) -> String {
    match issues {
        [only] => format!("invalid url map: {}", only.message),
        _ => format!("invalid url map: {} errors", issues.len()),
    }
}

/// Ordered namespace to base URL mapping with keyed lookup.
#[derive(Debug, Clone, Default)]
pub struct NamespaceUrlTable {
    entries: Vec<NamespaceUrlEntry>,
    index: HashMap<Namespace, usize>,
}

impl NamespaceUrlTable {
    /// Build a table from already-validated entries.
    ///
    /// Repeated namespaces are resolved with `policy`; under
    /// [`DuplicatePolicy::Reject`] a repeat with a different URL is an error.
    pub fn from_entries(
        entries: impl IntoIterator<Item = NamespaceUrlEntry>,
        policy: DuplicatePolicy,
    ) -> Result<Self, TableError> {
        let mut table = NamespaceUrlTable::default();

        for entry in entries {
            let existing = table.index.get(&entry.namespace).copied();
            match existing {
                None => {
                    table
                        .index
                        .insert(entry.namespace.clone(), table.entries.len());
                    table.entries.push(entry);
                }
                Some(pos) => {
                    let existing = &mut table.entries[pos];
                    if existing.base_url == entry.base_url {
                        tracing::debug!("collapsing repeated entry for `{}`", entry.namespace);
                        continue;
                    }
                    match policy {
                        DuplicatePolicy::Reject => {
                            return Err(TableError::Conflict {
                                namespace: entry.namespace.to_string(),
                                first: existing.base_url.to_string(),
                                second: entry.base_url.to_string(),
                            });
                        }
                        DuplicatePolicy::FirstWins => {
                            tracing::debug!(
                                "ignoring `{}` -> {} (first entry wins)",
                                entry.namespace,
                                entry.base_url
                            );
                        }
                        DuplicatePolicy::LastWins => {
                            tracing::debug!(
                                "replacing `{}` -> {} with {} (last entry wins)",
                                entry.namespace,
                                existing.base_url,
                                entry.base_url
                            );
                            existing.base_url = entry.base_url;
                        }
                    }
                }
            }
        }

        Ok(table)
    }

    /// Validate a url map and build a table from it.
    ///
    /// Warnings are logged; use [`build_table`] to get them back.
    pub fn from_raw(map: &RawUrlMap, opts: &ValidationOptions) -> Result<Self, TableError> {
        let (table, report) = build_table(map, opts)?;
        for issue in report.warnings() {
            tracing::warn!("{}", issue.message);
        }
        Ok(table)
    }

    /// Base URL for `namespace`, or `None` when it is not mapped.
    pub fn lookup(&self, namespace: &str) -> Option<&BaseUrl> {
        self.entry(namespace).map(|e| &e.base_url)
    }

    /// Full entry for `namespace`.
    pub fn entry(&self, namespace: &str) -> Option<&NamespaceUrlEntry> {
        self.index.get(namespace).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.index.contains_key(namespace)
    }

    /// Link to a page of `namespace`'s documentation.
    ///
    /// `suffix` is the page path relative to the namespace root, e.g.
    /// `struct.MainContext.html`.
    pub fn link(&self, namespace: &str, suffix: &str) -> Option<String> {
        self.lookup(namespace).map(|url| url.join(suffix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in authored order.
    pub fn iter(&self) -> std::slice::Iter<'_, NamespaceUrlEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[NamespaceUrlEntry] {
        &self.entries
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.entries.iter().map(|e| &e.namespace)
    }

    /// Whether both tables map the same namespaces to the same URLs,
    /// ignoring order.
    pub fn same_mapping(&self, other: &NamespaceUrlTable) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|e| other.lookup(e.namespace.as_str()) == Some(&e.base_url))
    }

    /// Convert back to an unvalidated map (no header, no spans).
    pub fn to_raw(&self) -> RawUrlMap {
        let mut map = RawUrlMap::new();
        for entry in &self.entries {
            map.push(entry.namespace.as_str(), entry.base_url.as_str());
        }
        map
    }
}

impl PartialEq for NamespaceUrlTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for NamespaceUrlTable {}

impl<'a> IntoIterator for &'a NamespaceUrlTable {
    type Item = &'a NamespaceUrlEntry;
    type IntoIter = std::slice::Iter<'a, NamespaceUrlEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Validate `map` and build its table, returning the validation report
/// alongside so callers can show warnings.
pub fn build_table(
    map: &RawUrlMap,
    opts: &ValidationOptions,
) -> Result<(NamespaceUrlTable, ValidationReport), TableError> {
    let report = validate(map, opts);

    if report.has_errors() {
        let issues: Vec<Issue> = report.errors().cloned().collect();
        let labels = issues.iter().filter_map(Issue::label).collect();
        return Err(TableError::Invalid {
            issues,
            src: map.source.as_ref().map(|s| s.named_source()),
            labels,
        });
    }

    let mut entries = Vec::with_capacity(map.entries.len());
    for raw in &map.entries {
        let namespace = Namespace::new(raw.namespace.as_str()).map_err(|e| invalid_entry(map, e))?;
        let base_url = BaseUrl::parse(&raw.url).map_err(|e| invalid_entry(map, e))?;
        entries.push(NamespaceUrlEntry::new(namespace, base_url));
    }

    let table = NamespaceUrlTable::from_entries(entries, opts.duplicates)?;
    tracing::debug!("built url table with {} entries", table.len());

    Ok((table, report))
}

fn invalid_entry(map: &RawUrlMap, err: impl fmt::Display) -> TableError {
    TableError::Invalid {
        issues: Vec::new(),
        src: map.source.as_ref().map(|s| s.named_source()),
        labels: vec![LabeledSpan::new(Some(err.to_string()), 0, 0)],
    }
}
