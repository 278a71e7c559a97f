//! JSON url maps.
//!
//! Either a bare list of pairs, `[["GLib", "https://docs.gtk.org/glib/"]]`,
//! or an object carrying the header as well:
//! `{"header": [...], "comment": "...", "baseURLs": [[...], ...]}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ParseError;
use crate::core::url_map::{RawEntry, RawUrlMap, SourceText};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonUrlMap {
    Bare(Vec<(String, String)>),
    Full(FullJsonUrlMap),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FullJsonUrlMap {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    header: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,

    #[serde(rename = "baseURLs")]
    base_urls: Vec<(String, String)>,
}

/// Byte offset of a 1-based line/column position.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

/// Parse JSON url map text.
pub fn parse(text: &str, name: &str) -> Result<RawUrlMap, ParseError> {
    let raw: JsonUrlMap = serde_json::from_str(text).map_err(|e| {
        let offset = offset_of(text, e.line(), e.column());
        let message = if e.is_data() {
            "expected a list of [namespace, url] pairs or an object with `baseURLs`".to_string()
        } else {
            e.to_string()
        };
        ParseError::new(message, name, text, offset..offset)
    })?;

    let (header, comment, pairs) = match raw {
        JsonUrlMap::Bare(pairs) => (Vec::new(), None, pairs),
        JsonUrlMap::Full(full) => (full.header, full.comment, full.base_urls),
    };

    Ok(RawUrlMap {
        header,
        comment,
        entries: pairs
            .into_iter()
            .map(|(namespace, url)| RawEntry::new(namespace, url))
            .collect(),
        source: Some(SourceText {
            name: name.to_string(),
            text: text.to_string(),
        }),
    })
}

/// Render a url map as JSON (always the object form, so headers survive).
pub fn render(map: &RawUrlMap) -> Result<String> {
    let out = FullJsonUrlMap {
        header: map.header.clone(),
        comment: map.comment.clone(),
        base_urls: map
            .pairs()
            .map(|(n, u)| (n.to_string(), u.to_string()))
            .collect(),
    };
    let mut text =
        serde_json::to_string_pretty(&out).context("failed to serialize url map as JSON")?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_pairs() {
        let map = parse(
            r#"[["GLib", "https://docs.gtk.org/glib/"], ["Gio", "https://docs.gtk.org/gio/"]]"#,
            "urlmap.json",
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.header.is_empty());
    }

    #[test]
    fn test_parse_object() {
        let map = parse(
            r#"{"header": ["SPDX-License-Identifier: MIT"], "baseURLs": [["GLib", "https://docs.gtk.org/glib/"]]}"#,
            "urlmap.json",
        )
        .unwrap();
        assert_eq!(map.header, vec!["SPDX-License-Identifier: MIT"]);
        assert_eq!(map.entries[0].url, "https://docs.gtk.org/glib/");
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let err = parse(r#"[["GLib"]]"#, "urlmap.json").unwrap_err();
        assert!(err.message.contains("pairs"), "{}", err.message);
    }

    #[test]
    fn test_syntax_error_offset() {
        let text = "[\n  [\"GLib\", \"https://docs.gtk.org/glib/\"\n";
        let err = parse(text, "urlmap.json").unwrap_err();
        assert!(err.offset() <= text.len());
    }

    #[test]
    fn test_offset_of() {
        let text = "ab\ncd\n";
        assert_eq!(offset_of(text, 1, 1), 0);
        assert_eq!(offset_of(text, 2, 2), 4);
        assert_eq!(offset_of(text, 9, 9), text.len());
    }
}
