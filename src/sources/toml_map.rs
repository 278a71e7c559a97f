//! TOML url maps.
//!
//! ```toml
//! header = ["SPDX-License-Identifier: LGPL-2.1-or-later"]
//!
//! [[namespace]]
//! name = "GLib"
//! url = "https://docs.gtk.org/glib/"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ParseError;
use crate::core::url_map::{RawEntry, RawUrlMap, SourceText};

/// A `[[namespace]]` table. Also used by `Docmap.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySpec {
    pub name: String,
    pub url: String,
}

impl EntrySpec {
    pub fn to_raw(&self) -> RawEntry {
        RawEntry::new(self.name.as_str(), self.url.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlUrlMap {
    #[serde(default)]
    header: Vec<String>,

    #[serde(default)]
    comment: Option<String>,

    #[serde(default)]
    namespace: Vec<EntrySpec>,
}

#[derive(Debug, Serialize)]
struct TomlUrlMapOut {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    header: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,

    namespace: Vec<EntrySpec>,
}

/// Parse TOML url map text.
pub fn parse(text: &str, name: &str) -> Result<RawUrlMap, ParseError> {
    let raw: TomlUrlMap = toml::from_str(text).map_err(|e| {
        let range = e.span().unwrap_or(0..0);
        ParseError::new(e.message().to_string(), name, text, range)
            .with_help("entries are `[[namespace]]` tables with `name` and `url` strings")
    })?;

    let entries = raw.namespace.iter().map(EntrySpec::to_raw).collect();

    Ok(RawUrlMap {
        header: raw.header,
        comment: raw.comment,
        entries,
        source: Some(SourceText {
            name: name.to_string(),
            text: text.to_string(),
        }),
    })
}

/// Render a url map as TOML.
pub fn render(map: &RawUrlMap) -> Result<String> {
    let out = TomlUrlMapOut {
        header: map.header.clone(),
        comment: map.comment.clone(),
        namespace: map
            .pairs()
            .map(|(name, url)| EntrySpec {
                name: name.to_string(),
                url: url.to_string(),
            })
            .collect(),
    };
    toml::to_string_pretty(&out).context("failed to serialize url map as TOML")
}
