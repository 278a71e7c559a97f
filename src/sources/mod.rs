//! Url map file formats.
//!
//! A url map can be stored as the `urlmap.js` literal the documentation
//! generator reads, or as TOML or JSON holding the same data. All formats
//! parse into a [`RawUrlMap`] and render back from one.

pub mod js;
pub mod json_map;
pub mod toml_map;

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::url_map::RawUrlMap;
use crate::util::fs;

pub use js::{JsStyle, QuoteStyle};

/// Error parsing a url map file, with the offending source location.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{message}")]
#[diagnostic(code(docmap::parse))]
pub struct ParseError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
    #[help]
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(
        message: impl Into<String>,
        name: &str,
        text: &str,
        range: Range<usize>,
    ) -> Self {
        ParseError {
            message: message.into(),
            src: NamedSource::new(name, text.to_string()),
            span: range.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Byte offset of the error in the source text.
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Url map file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Js,
    Toml,
    Json,
}

impl Format {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" => Some(Format::Js),
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Js => write!(f, "js"),
            Format::Toml => write!(f, "toml"),
            Format::Json => write!(f, "json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "js" => Ok(Format::Js),
            "toml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format `{}` (expected js, toml or json)", other)),
        }
    }
}

/// Parse url map text in the given format.
pub fn parse_str(text: &str, format: Format, name: &str) -> Result<RawUrlMap, ParseError> {
    match format {
        Format::Js => js::parse(text, name),
        Format::Toml => toml_map::parse(text, name),
        Format::Json => json_map::parse(text, name),
    }
}

/// Render a url map in the given format.
pub fn render(map: &RawUrlMap, format: Format, style: &JsStyle) -> Result<String> {
    match format {
        Format::Js => Ok(js::render(map, style)),
        Format::Toml => toml_map::render(map),
        Format::Json => json_map::render(map),
    }
}

/// Load a url map file, detecting its format from the extension.
///
/// Parse errors keep their [`ParseError`] so callers can render the source
/// location.
pub fn load_file(path: &Path) -> Result<RawUrlMap> {
    let format = Format::from_path(path).with_context(|| {
        format!(
            "cannot tell the format of {} (expected a .js, .toml or .json file)",
            path.display()
        )
    })?;

    let text = fs::read_to_string(path)?;
    tracing::debug!("parsing {} as {}", path.display(), format);

    let map = parse_str(&text, format, &path.display().to_string())?;
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gnome_map, URLMAP_COMMENTED};
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("docs/urlmap.js")), Some(Format::Js));
        assert_eq!(Format::from_path(Path::new("urlmap.TOML")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("urlmap.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("urlmap")), None);
        assert_eq!(Format::from_path(Path::new("urlmap.yaml")), None);
    }

    #[test]
    fn test_load_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("urlmap.js");
        std::fs::write(&path, URLMAP_COMMENTED).unwrap();

        let map = load_file(&path).unwrap();
        assert_eq!(
            map.pairs().collect::<Vec<_>>(),
            gnome_map().pairs().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_load_file_keeps_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("urlmap.js");
        std::fs::write(&path, "baseURLs = [ [ 'GLib' ] ]").unwrap();

        let err = load_file(&path).unwrap_err();
        let parse = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(parse.message, "entry is missing its base URL");
    }

    #[test]
    fn test_load_unknown_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("urlmap.txt");
        std::fs::write(&path, "").unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("cannot tell the format"));
    }

    #[test]
    fn test_same_data_in_every_format() {
        let mut map = gnome_map();
        map.header = vec!["SPDX-License-Identifier: LGPL-2.1-or-later".to_string()];
        map.comment = Some("Namespace documentation roots".to_string());

        for format in [Format::Js, Format::Toml, Format::Json] {
            let text = render(&map, format, &JsStyle::default()).unwrap();
            let back = parse_str(&text, format, "map").unwrap();
            assert_eq!(back.header, map.header, "{}", format);
            assert_eq!(back.comment, map.comment, "{}", format);
            assert_eq!(
                back.pairs().collect::<Vec<_>>(),
                map.pairs().collect::<Vec<_>>(),
                "{}",
                format
            );
        }
    }
}
