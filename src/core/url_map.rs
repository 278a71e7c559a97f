//! Unvalidated url map contents, as read from a source file or manifest.

use miette::{NamedSource, SourceSpan};

/// One `[namespace, url]` pair exactly as authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub namespace: String,
    pub url: String,
    /// Location of the entry in its source text, when parsed from one.
    pub span: Option<SourceSpan>,
}

impl RawEntry {
    pub fn new(namespace: impl Into<String>, url: impl Into<String>) -> Self {
        RawEntry {
            namespace: namespace.into(),
            url: url.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// Source text a url map was parsed from, kept for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub name: String,
    pub text: String,
}

impl SourceText {
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.text.clone())
    }
}

/// A parsed url map: header metadata plus the ordered entries.
///
/// Nothing here is checked yet; see [`crate::core::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawUrlMap {
    /// Header lines without comment markers (usually SPDX tags).
    pub header: Vec<String>,

    /// Descriptive comment placed just above the list.
    pub comment: Option<String>,

    pub entries: Vec<RawEntry>,

    pub source: Option<SourceText>,
}

impl RawUrlMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RawEntry>) -> Self {
        RawUrlMap {
            entries,
            ..Self::default()
        }
    }

    pub fn push(&mut self, namespace: impl Into<String>, url: impl Into<String>) {
        self.entries.push(RawEntry::new(namespace, url));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as plain `(namespace, url)` string pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.namespace.as_str(), e.url.as_str()))
    }
}
