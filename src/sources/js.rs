//! The `urlmap.js` literal format read by the documentation generator.
//!
//! ```text
//! // SPDX-FileCopyrightText: 2021 GNOME Foundation
//! // SPDX-License-Identifier: LGPL-2.1-or-later
//!
//! // A map between namespaces and base URLs for their online documentation
//! baseURLs = [
//!     [ 'GLib', 'https://docs.gtk.org/glib/' ],
//! ]
//! ```
//!
//! Only this one statement is accepted: an optional `var`/`let`/`const`, the
//! `baseURLs` binding, and a list of two-string lists. Leading comments are
//! kept in order: the block before the first blank line becomes the header,
//! the rest the descriptive comment. A single block is the header when it
//! holds only `SPDX-` tags and the comment otherwise.

use serde::{Deserialize, Serialize};

use super::ParseError;
use crate::core::url_map::{RawEntry, RawUrlMap, SourceText};

/// Name of the binding the generator reads.
pub const BINDING: &str = "baseURLs";

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str(String),
    LBracket,
    RBracket,
    Comma,
    Equals,
    Semicolon,
    Other(char),
    Eof,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("`{}`", s),
            TokenKind::Str(s) => format!("string '{}'", s),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Equals => "`=`".to_string(),
            TokenKind::Semicolon => "`;`".to_string(),
            TokenKind::Other(c) => format!("`{}`", c),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// One comment line with its marker removed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CommentLine {
    text: String,
    /// A blank line separates this line from the previous one.
    after_blank: bool,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

struct Lexer<'a> {
    src: &'a str,
    name: &'a str,
    pos: usize,
    /// Comment lines seen so far.
    comments: Vec<CommentLine>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, name: &'a str) -> Self {
        Lexer {
            src,
            name,
            pos: 0,
            comments: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error(&self, message: impl Into<String>, start: usize, end: usize) -> ParseError {
        ParseError::new(message, self.name, self.src, start..end)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            let skipped = &rest[..rest.len() - trimmed.len()];
            let after_blank = skipped.matches('\n').count() > 1;
            self.pos += skipped.len();

            if let Some(body) = trimmed.strip_prefix("//") {
                let line = body.split('\n').next().unwrap_or("");
                self.pos += 2 + line.len();
                self.comments.push(CommentLine {
                    text: clean_comment(line),
                    after_blank,
                });
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                let Some(close) = body.find("*/") else {
                    return Err(self
                        .error("unterminated block comment", self.pos, self.pos + 2)
                        .with_help("close the comment with `*/`"));
                };
                for (i, line) in body[..close].lines().enumerate() {
                    let line = line.trim_start();
                    let line = line.strip_prefix('*').unwrap_or(line);
                    self.comments.push(CommentLine {
                        text: clean_comment(line),
                        after_blank: after_blank && i == 0,
                    });
                }
                self.pos += 2 + close + 2;
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            });
        };

        let simple = match c {
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            ',' => Some(TokenKind::Comma),
            '=' => Some(TokenKind::Equals),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        };
        if let Some(kind) = simple {
            self.pos += 1;
            return Ok(Token {
                kind,
                start,
                end: self.pos,
            });
        }

        if c == '\'' || c == '"' {
            let value = self.string(c)?;
            return Ok(Token {
                kind: TokenKind::Str(value),
                start,
                end: self.pos,
            });
        }

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let len = self
                .rest()
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'))
                .unwrap_or(self.rest().len());
            let ident = self.rest()[..len].to_string();
            self.pos += len;
            return Ok(Token {
                kind: TokenKind::Ident(ident),
                start,
                end: self.pos,
            });
        }

        self.pos += c.len_utf8();
        Ok(Token {
            kind: TokenKind::Other(c),
            start,
            end: self.pos,
        })
    }

    /// Read a quoted string starting at the opening quote.
    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        loop {
            let Some(c) = self.peek() else {
                return Err(self
                    .error("unterminated string", start, self.pos)
                    .with_help(format!("close the string with {}", quote)));
            };
            if c == '\n' {
                return Err(self
                    .error("unterminated string", start, self.pos)
                    .with_help(format!("close the string with {} on the same line", quote)));
            }
            self.pos += c.len_utf8();

            if c == quote {
                return Ok(value);
            }
            if c != '\\' {
                value.push(c);
                continue;
            }

            let escape_start = self.pos - 1;
            let Some(e) = self.peek() else {
                continue;
            };
            self.pos += e.len_utf8();
            match e {
                '\\' | '\'' | '"' | '/' => value.push(e),
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'u' => {
                    let hex = self.rest().get(..4).unwrap_or("");
                    let ch = u32::from_str_radix(hex, 16)
                        .ok()
                        .filter(|_| hex.len() == 4)
                        .and_then(char::from_u32);
                    match ch {
                        Some(ch) => {
                            value.push(ch);
                            self.pos += 4;
                        }
                        None => {
                            return Err(self.error(
                                "invalid unicode escape",
                                escape_start,
                                self.pos,
                            ))
                        }
                    }
                }
                other => {
                    return Err(self.error(
                        format!("unsupported escape `\\{}`", other),
                        escape_start,
                        self.pos,
                    ))
                }
            }
        }
    }
}

/// Strip the space after a comment marker and trailing whitespace.
fn clean_comment(line: &str) -> String {
    let line = line.strip_prefix(' ').unwrap_or(line);
    line.trim_end().to_string()
}

/// Split leading comment lines into header lines and the comment.
///
/// Line order and bare `//` lines are kept. Blank lines after the first
/// separator cannot be represented and become bare `//` lines.
fn split_leading_comments(lines: Vec<CommentLine>) -> (Vec<String>, Option<String>) {
    let Some(split) = lines.iter().skip(1).position(|l| l.after_blank) else {
        if lines.is_empty() {
            return (Vec::new(), None);
        }
        let all_spdx = lines.iter().all(|l| l.text.starts_with("SPDX-"));
        let texts: Vec<String> = lines.into_iter().map(|l| l.text).collect();
        return if all_spdx {
            (texts, None)
        } else {
            (Vec::new(), Some(texts.join("\n")))
        };
    };

    let mut lines = lines.into_iter();
    let header = lines.by_ref().take(split + 1).map(|l| l.text).collect();
    let mut comment = Vec::new();
    for (i, line) in lines.enumerate() {
        if line.after_blank && i > 0 {
            comment.push(String::new());
        }
        comment.push(line.text);
    }
    (header, Some(comment.join("\n")))
}

struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    fn bump(&mut self) -> Result<Token, ParseError> {
        self.lexer.next_token()
    }

    fn unexpected(&self, tok: &Token, expected: &str) -> ParseError {
        self.lexer.error(
            format!("expected {}, found {}", expected, tok.kind.describe()),
            tok.start,
            tok.end,
        )
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        let tok = self.bump()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(self.unexpected(&tok, expected))
        }
    }

    fn expect_string(&mut self, open: &Token, what: &str) -> Result<String, ParseError> {
        let tok = self.bump()?;
        match &tok.kind {
            TokenKind::Str(value) => Ok(value.clone()),
            TokenKind::RBracket => Err(self
                .lexer
                .error(format!("entry is missing its {}", what), open.start, tok.end)
                .with_help("each entry is `[ 'Namespace', 'https://base/url/' ]`")),
            _ => Err(self
                .unexpected(&tok, &format!("{} string", what))
                .with_help("namespace and base URL must both be quoted strings")),
        }
    }

    fn entry(&mut self, open: Token) -> Result<RawEntry, ParseError> {
        let namespace = self.expect_string(&open, "namespace")?;

        let sep = self.bump()?;
        match sep.kind {
            TokenKind::Comma => {}
            TokenKind::RBracket => {
                return Err(self
                    .lexer
                    .error("entry is missing its base URL", open.start, sep.end)
                    .with_help("each entry is `[ 'Namespace', 'https://base/url/' ]`"))
            }
            _ => return Err(self.unexpected(&sep, "`,`")),
        }

        let url = self.expect_string(&open, "base URL")?;

        let mut close = self.bump()?;
        if close.kind == TokenKind::Comma {
            close = self.bump()?;
        }
        match close.kind {
            TokenKind::RBracket => {}
            TokenKind::Eof => return Err(self.unexpected(&close, "`]`")),
            _ => {
                return Err(self
                    .lexer
                    .error("entry has more than two elements", open.start, close.end)
                    .with_help("each entry is exactly `[ namespace, base URL ]`"))
            }
        }

        Ok(RawEntry::new(namespace, url).with_span((open.start..close.end).into()))
    }

    fn parse(&mut self) -> Result<Vec<RawEntry>, ParseError> {
        let mut tok = self.bump()?;
        if let TokenKind::Ident(kw) = &tok.kind {
            if matches!(kw.as_str(), "var" | "let" | "const") {
                tok = self.bump()?;
            }
        }
        match &tok.kind {
            TokenKind::Ident(name) if name == BINDING => {}
            TokenKind::Ident(name) => {
                return Err(self
                    .lexer
                    .error(
                        format!("expected `{}`, found `{}`", BINDING, name),
                        tok.start,
                        tok.end,
                    )
                    .with_help(format!("the generator only reads `{}`", BINDING)))
            }
            _ => return Err(self.unexpected(&tok, &format!("`{} = [...]`", BINDING))),
        }

        self.expect(TokenKind::Equals, "`=`")?;
        self.expect(TokenKind::LBracket, "`[`")?;

        let mut entries = Vec::new();
        loop {
            let tok = self.bump()?;
            match tok.kind {
                TokenKind::RBracket => break,
                TokenKind::LBracket => {
                    entries.push(self.entry(tok)?);
                    let sep = self.bump()?;
                    match sep.kind {
                        TokenKind::Comma => continue,
                        TokenKind::RBracket => break,
                        _ => return Err(self.unexpected(&sep, "`,` or `]`")),
                    }
                }
                _ => {
                    return Err(self
                        .unexpected(&tok, "`[` or `]`")
                        .with_help("entries are written as `[ 'Namespace', 'https://base/url/' ]`"))
                }
            }
        }

        let mut tok = self.bump()?;
        if tok.kind == TokenKind::Semicolon {
            tok = self.bump()?;
        }
        if tok.kind != TokenKind::Eof {
            return Err(self
                .lexer
                .error(
                    "unexpected content after the list",
                    tok.start,
                    self.lexer.src.len(),
                )
                .with_help(format!("the file must contain only the `{}` list", BINDING)));
        }

        Ok(entries)
    }
}

/// Parse `urlmap.js` text. `name` is used in error reports.
pub fn parse(text: &str, name: &str) -> Result<RawUrlMap, ParseError> {
    let mut parser = Parser {
        lexer: Lexer::new(text, name),
    };

    // Leading comments are collected by the first skip_trivia call.
    parser.lexer.skip_trivia()?;
    let leading = std::mem::take(&mut parser.lexer.comments);
    let (header, comment) = split_leading_comments(leading);

    let entries = parser.parse()?;

    Ok(RawUrlMap {
        header,
        comment,
        entries,
        source: Some(SourceText {
            name: name.to_string(),
            text: text.to_string(),
        }),
    })
}

/// Quote character used when rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    fn char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Layout of rendered `urlmap.js` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsStyle {
    pub quote: QuoteStyle,
    pub indent: usize,
}

impl Default for JsStyle {
    fn default() -> Self {
        JsStyle {
            quote: QuoteStyle::Single,
            indent: 4,
        }
    }
}

fn quote(value: &str, style: QuoteStyle) -> String {
    let q = style.char();
    let mut out = String::with_capacity(value.len() + 2);
    out.push(q);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

/// Render a url map as `urlmap.js`.
pub fn render(map: &RawUrlMap, style: &JsStyle) -> String {
    let mut out = String::new();

    let comment_line = |out: &mut String, line: &str| {
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str(&format!("// {}\n", line));
        }
    };

    for line in &map.header {
        comment_line(&mut out, line);
    }
    if let Some(ref comment) = map.comment {
        if !map.header.is_empty() {
            out.push('\n');
        }
        for line in comment.split('\n') {
            comment_line(&mut out, line);
        }
    }

    let indent = " ".repeat(style.indent);
    out.push_str(&format!("{} = [\n", BINDING));
    for (namespace, url) in map.pairs() {
        out.push_str(&format!(
            "{}[ {}, {} ],\n",
            indent,
            quote(namespace, style.quote),
            quote(url, style.quote)
        ));
    }
    out.push_str("]\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gnome_map, URLMAP_COMMENTED, URLMAP_PLAIN};

    fn parse_ok(text: &str) -> RawUrlMap {
        parse(text, "urlmap.js").unwrap()
    }

    fn parse_err(text: &str) -> ParseError {
        parse(text, "urlmap.js").unwrap_err()
    }

    #[test]
    fn test_parse_plain() {
        let map = parse_ok(URLMAP_PLAIN);
        assert_eq!(
            map.header,
            vec![
                "SPDX-FileCopyrightText: 2024 Corentin Noël",
                "SPDX-License-Identifier: LGPL-2.1-only OR MPL-2.0",
            ]
        );
        assert_eq!(map.comment, None);
        assert_eq!(
            map.pairs().collect::<Vec<_>>(),
            gnome_map().pairs().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_parse_commented() {
        let map = parse_ok(URLMAP_COMMENTED);
        assert_eq!(map.header.len(), 2);
        assert_eq!(
            map.comment.as_deref(),
            Some("A map between namespaces and base URLs for their online documentation")
        );
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_render_is_byte_identical() {
        for text in [URLMAP_PLAIN, URLMAP_COMMENTED] {
            let map = parse_ok(text);
            assert_eq!(render(&map, &JsStyle::default()), text);
        }
    }

    #[test]
    fn test_leading_comment_order_is_kept() {
        let text = "\
// Copyright 2024 The libical-glib authors
// SPDX-License-Identifier: LGPL-2.1-only OR MPL-2.0
baseURLs = [
    [ 'GLib', 'https://docs.gtk.org/glib/' ],
]
";
        let map = parse_ok(text);
        assert!(map.header.is_empty());
        assert_eq!(
            map.comment.as_deref(),
            Some("Copyright 2024 The libical-glib authors\nSPDX-License-Identifier: LGPL-2.1-only OR MPL-2.0")
        );
        assert_eq!(render(&map, &JsStyle::default()), text);
    }

    #[test]
    fn test_comment_paragraphs_render_back() {
        let text = "\
// SPDX-FileCopyrightText: 2021 GNOME Foundation
//
// SPDX-License-Identifier: LGPL-2.1-or-later

// A map between namespaces and base URLs for their online documentation
//
// Loaded by fzy.js before the search index.
baseURLs = [
    [ 'GLib', 'https://docs.gtk.org/glib/' ],
    [ 'Gio', 'https://docs.gtk.org/gio/' ],
]
";
        let map = parse_ok(text);
        assert_eq!(map.header.len(), 3);
        assert_eq!(map.header[1], "");
        assert_eq!(
            map.comment.as_deref(),
            Some("A map between namespaces and base URLs for their online documentation\n\nLoaded by fzy.js before the search index.")
        );
        assert_eq!(render(&map, &JsStyle::default()), text);
    }

    #[test]
    fn test_single_spdx_block_is_header() {
        let map = parse_ok("// SPDX-License-Identifier: MIT\nbaseURLs = []\n");
        assert_eq!(map.header, vec!["SPDX-License-Identifier: MIT"]);
        assert_eq!(map.comment, None);
    }

    #[test]
    fn test_extra_blank_lines_fold_into_comment() {
        let map = parse_ok("// SPDX-License-Identifier: MIT\n\n// One\n\n// Two\nbaseURLs = []\n");
        assert_eq!(map.header, vec!["SPDX-License-Identifier: MIT"]);
        assert_eq!(map.comment.as_deref(), Some("One\n\nTwo"));
    }

    #[test]
    fn test_entry_spans() {
        let map = parse_ok(URLMAP_PLAIN);
        let span = map.entries[1].span.unwrap();
        let text = &URLMAP_PLAIN[span.offset()..span.offset() + span.len()];
        assert_eq!(text, "[ 'GObject', 'https://docs.gtk.org/gobject/' ]");
    }

    #[test]
    fn test_parse_variants() {
        let map = parse_ok(
            "const baseURLs = [[\"GLib\", \"https://docs.gtk.org/glib/\"], /* gio */ ['Gio','https://docs.gtk.org/gio/',]];",
        );
        assert_eq!(map.len(), 2);
        assert!(map.header.is_empty());
        assert_eq!(map.entries[1].namespace, "Gio");

        let empty = parse_ok("baseURLs = []\n");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_escapes() {
        let map = parse_ok(r#"baseURLs = [ [ 'It\'s', "https://x.org/A/" ] ]"#);
        assert_eq!(map.entries[0].namespace, "It's");
        assert_eq!(map.entries[0].url, "https://x.org/A/");
    }

    #[test]
    fn test_missing_url() {
        let err = parse_err("baseURLs = [\n    [ 'GLib' ],\n]\n");
        assert_eq!(err.message, "entry is missing its base URL");
    }

    #[test]
    fn test_too_many_elements() {
        let err = parse_err("baseURLs = [ [ 'GLib', 'https://docs.gtk.org/glib/', 'extra' ] ]");
        assert_eq!(err.message, "entry has more than two elements");
    }

    #[test]
    fn test_non_string_value() {
        let err = parse_err("baseURLs = [ [ 'GLib', null ] ]");
        assert_eq!(err.message, "expected base URL string, found `null`");
    }

    #[test]
    fn test_wrong_binding() {
        let err = parse_err("urls = []");
        assert_eq!(err.message, "expected `baseURLs`, found `urls`");
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_err("baseURLs = [ [ 'GLib, 'x' ] ]\n");
        // The first string swallows up to the next quote, then `x` is unexpected
        assert!(err.message.starts_with("expected `,`"), "{}", err.message);

        let err = parse_err("baseURLs = [ [ 'GLib', 'https://docs.gtk.org/glib/ ] ]\n");
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn test_trailing_garbage() {
        let err = parse_err("baseURLs = [];\nconsole.log(baseURLs)\n");
        assert_eq!(err.message, "unexpected content after the list");
    }

    #[test]
    fn test_render_double_quotes_and_escaping() {
        let mut map = RawUrlMap::new();
        map.push("GLib", "https://docs.gtk.org/glib/");
        let style = JsStyle {
            quote: QuoteStyle::Double,
            indent: 2,
        };
        assert_eq!(
            render(&map, &style),
            "baseURLs = [\n  [ \"GLib\", \"https://docs.gtk.org/glib/\" ],\n]\n"
        );
        assert_eq!(quote("it's", QuoteStyle::Single), "'it\\'s'");
    }

    #[test]
    fn test_render_comment_without_header() {
        let mut map = gnome_map();
        map.comment = Some("Namespace URLs".to_string());
        let text = render(&map, &JsStyle::default());
        assert!(text.starts_with("// Namespace URLs\nbaseURLs = [\n"));
        assert_eq!(parse_ok(&text).comment.as_deref(), Some("Namespace URLs"));
    }
}
