//! Core data structures for docmap.
//!
//! This module contains the foundational types used throughout docmap:
//! - Validated names and URLs (Namespace, BaseUrl)
//! - Unvalidated url maps as read from files (RawUrlMap)
//! - The immutable lookup table and its validation
//! - The Docmap.toml project manifest

pub mod manifest;
pub mod namespace;
pub mod table;
pub mod url_map;
pub mod validate;

pub use manifest::{Manifest, ManifestError, Target, MANIFEST_NAME};
pub use namespace::{BaseUrl, BaseUrlError, Namespace, NamespaceError};
pub use table::{build_table, DuplicatePolicy, NamespaceUrlEntry, NamespaceUrlTable, TableError};
pub use url_map::{RawEntry, RawUrlMap};
pub use validate::{validate, Issue, IssueKind, ValidationOptions, ValidationReport};
