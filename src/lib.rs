//! docmap - namespace to documentation URL maps
//!
//! This crate provides the library behind the `docmap` tool: an immutable
//! table mapping GObject introspection namespaces to the base URLs of their
//! hosted documentation, the `urlmap.js` / TOML / JSON file formats it is
//! read from and written to, and the Docmap.toml manifest that keeps one
//! list of entries for several documentation builds.

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test fixtures shared by unit tests.
///
/// This module is only available when compiling with `--cfg test`.
#[cfg(test)]
pub mod test_support;

pub use core::{
    manifest::Manifest, namespace::BaseUrl, namespace::Namespace, table::DuplicatePolicy,
    table::NamespaceUrlEntry, table::NamespaceUrlTable, url_map::RawUrlMap,
};

pub use util::context::GlobalContext;
