//! Shared validation for url maps.
//!
//! Every url map, whatever format it was loaded from, goes through
//! [`validate`] before a table is built from it. All issues are collected so
//! a single `docmap check` run reports everything at once.

use std::collections::HashMap;
use std::fmt;

use miette::{LabeledSpan, SourceSpan};

use crate::core::namespace::{BaseUrl, BaseUrlError, Namespace, NamespaceError};
use crate::core::table::DuplicatePolicy;
use crate::core::url_map::RawUrlMap;
use crate::util::diagnostic::{suggestions, Diagnostic, Severity};

/// Options controlling how strict validation is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub duplicates: DuplicatePolicy,
    /// Treat plain `http` base URLs as errors instead of warnings.
    pub require_https: bool,
}

/// What is wrong with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    EmptyNamespace,
    InvalidNamespace,
    InvalidUrl(String),
    RelativeUrl,
    UnsupportedScheme(String),
    MissingHost,
    MissingTrailingSlash,
    QueryOrFragment,
    /// Parses, but only after the URL parser rewrote it.
    NonCanonicalUrl { canonical: String },
    InsecureScheme,
    /// Same namespace and same URL as an earlier entry.
    DuplicateNamespace { first: usize },
    /// Same namespace as an earlier entry, different URL.
    ConflictingNamespace { first: usize, first_url: String },
    EmptyTable,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Index of the offending entry, `None` for table-level issues.
    pub index: Option<usize>,
    pub namespace: Option<String>,
    pub span: Option<SourceSpan>,
    pub message: String,
    pub help: Option<String>,
}

impl Issue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert to a terminal diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(self.severity, self.message.clone());
        if let Some(index) = self.index {
            diag = diag.with_context(format!("entry {}", index + 1));
        }
        if let Some(ref help) = self.help {
            diag = diag.with_suggestion(help.clone());
        }
        diag
    }

    /// Label for source-annotated rendering, when the issue has a span.
    pub fn label(&self) -> Option<LabeledSpan> {
        self.span
            .map(|span| LabeledSpan::new_with_span(Some(self.message.clone()), span))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// All issues found in one url map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

/// Check a url map against the table invariants.
///
/// Namespaces must be well-formed and unique, base URLs absolute
/// `http(s)` URLs ending in `/`.
pub fn validate(map: &RawUrlMap, opts: &ValidationOptions) -> ValidationReport {
    let mut issues = Vec::new();

    if map.entries.is_empty() {
        issues.push(Issue {
            kind: IssueKind::EmptyTable,
            severity: Severity::Warning,
            index: None,
            namespace: None,
            span: None,
            message: "url map has no entries".to_string(),
            help: Some("cross-references to other namespaces will render as plain text".into()),
        });
    }

    // namespace -> (first index, first url)
    let mut seen: HashMap<&str, (usize, &str)> = HashMap::new();

    for (index, entry) in map.entries.iter().enumerate() {
        let mut push = |kind: IssueKind, severity: Severity, message: String, help: Option<String>| {
            issues.push(Issue {
                kind,
                severity,
                index: Some(index),
                namespace: Some(entry.namespace.clone()),
                span: entry.span,
                message,
                help,
            });
        };

        match Namespace::new(entry.namespace.as_str()) {
            Ok(_) => {}
            Err(NamespaceError::Empty) => push(
                IssueKind::EmptyNamespace,
                Severity::Error,
                "namespace name is empty".to_string(),
                None,
            ),
            Err(NamespaceError::Invalid(name)) => push(
                IssueKind::InvalidNamespace,
                Severity::Error,
                format!("invalid namespace name `{}`", name),
                Some("namespace names start with a letter and contain only letters, digits and `_`".into()),
            ),
        }

        match BaseUrl::parse(&entry.url) {
            Ok(url) => {
                if url.is_insecure() {
                    let severity = if opts.require_https {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    push(
                        IssueKind::InsecureScheme,
                        severity,
                        format!("base URL `{}` for `{}` uses http", entry.url, entry.namespace),
                        Some("use an https URL".into()),
                    );
                }
            }
            Err(e) => {
                let (kind, help) = match &e {
                    BaseUrlError::Invalid { reason, .. } => {
                        (IssueKind::InvalidUrl(reason.clone()), None)
                    }
                    BaseUrlError::Relative(_) => (
                        IssueKind::RelativeUrl,
                        Some("base URLs must be absolute, e.g. `https://docs.gtk.org/glib/`".into()),
                    ),
                    BaseUrlError::UnsupportedScheme { scheme, .. } => (
                        IssueKind::UnsupportedScheme(scheme.clone()),
                        Some("use an http or https URL".into()),
                    ),
                    BaseUrlError::MissingHost(_) => (IssueKind::MissingHost, None),
                    BaseUrlError::MissingTrailingSlash(_) => (
                        IssueKind::MissingTrailingSlash,
                        Some(suggestions::TRAILING_SLASH.to_string()),
                    ),
                    BaseUrlError::QueryOrFragment(_) => (
                        IssueKind::QueryOrFragment,
                        Some("remove the `?...` or `#...` part".into()),
                    ),
                    BaseUrlError::NonCanonical { canonical, .. } => (
                        IssueKind::NonCanonicalUrl {
                            canonical: canonical.clone(),
                        },
                        Some(format!("write it as `{}`", canonical)),
                    ),
                };
                push(
                    kind,
                    Severity::Error,
                    format!("bad base URL for `{}`: {}", entry.namespace, e),
                    help,
                );
            }
        }

        if entry.namespace.is_empty() {
            continue;
        }

        match seen.get(entry.namespace.as_str()) {
            None => {
                seen.insert(entry.namespace.as_str(), (index, entry.url.as_str()));
            }
            Some(&(first, first_url)) if first_url == entry.url => push(
                IssueKind::DuplicateNamespace { first },
                Severity::Warning,
                format!(
                    "namespace `{}` is listed again (first at entry {})",
                    entry.namespace,
                    first + 1
                ),
                Some("remove the repeated entry".into()),
            ),
            Some(&(first, first_url)) => {
                let (severity, help) = match opts.duplicates {
                    DuplicatePolicy::Reject => (
                        Severity::Error,
                        "remove one of the entries, or set `duplicates = \"first-wins\"` or `\"last-wins\"`",
                    ),
                    DuplicatePolicy::FirstWins => (Severity::Warning, "this entry is ignored"),
                    DuplicatePolicy::LastWins => {
                        (Severity::Warning, "this entry replaces the earlier one")
                    }
                };
                push(
                    IssueKind::ConflictingNamespace {
                        first,
                        first_url: first_url.to_string(),
                    },
                    severity,
                    format!(
                        "namespace `{}` maps to `{}` but entry {} maps it to `{}`",
                        entry.namespace,
                        entry.url,
                        first + 1,
                        first_url
                    ),
                    Some(help.to_string()),
                );
            }
        }
    }

    ValidationReport { issues }
}
