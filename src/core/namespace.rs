//! Namespace names and documentation base URLs.
//!
//! Both types are validated on construction, so a `NamespaceUrlEntry` built
//! from them always satisfies the table invariants.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

/// GIR namespace names: an ASCII letter followed by letters, digits or `_`.
static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Error returned when a namespace name is not well formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    #[error("namespace name is empty")]
    Empty,

    #[error("invalid namespace name `{0}`")]
    Invalid(String),
}

/// A documented namespace, e.g. `GLib`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Create a namespace, checking the name.
    pub fn new(name: impl Into<String>) -> Result<Self, NamespaceError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NamespaceError::Empty);
        }
        if !NAMESPACE_RE.is_match(&name) {
            return Err(NamespaceError::Invalid(name));
        }
        Ok(Namespace(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::new(s)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Namespace {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Namespace::new(s).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a base URL is not usable as a documentation root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaseUrlError {
    #[error("`{url}` is not a valid URL: {reason}")]
    Invalid { url: String, reason: String },

    #[error("`{0}` is not an absolute URL")]
    Relative(String),

    #[error("`{url}` uses unsupported scheme `{scheme}`")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("`{0}` has no host")]
    MissingHost(String),

    #[error("`{0}` must end with `/`")]
    MissingTrailingSlash(String),

    #[error("`{0}` must not carry a query or fragment")]
    QueryOrFragment(String),

    #[error("{url:?} is not written in canonical form; it reads as `{canonical}`")]
    NonCanonical { url: String, canonical: String },
}

/// The root URL a namespace's documentation is published under.
///
/// Always an absolute `http`/`https` URL with a host, ending in `/`, with no
/// query or fragment, so joining a page suffix onto it is plain
/// concatenation. The authored text must already be the URL's canonical
/// serialization, so `as_str` returns exactly what was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse and check a base URL.
    pub fn parse(input: &str) -> Result<Self, BaseUrlError> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Err(BaseUrlError::Relative(input.to_string()))
            }
            Err(e) => {
                return Err(BaseUrlError::Invalid {
                    url: input.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(BaseUrlError::UnsupportedScheme {
                    url: input.to_string(),
                    scheme: other.to_string(),
                })
            }
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(BaseUrlError::MissingHost(input.to_string()));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(BaseUrlError::QueryOrFragment(input.to_string()));
        }

        // Check the authored text, not the normalized form: `https://host`
        // normalizes to `https://host/` but was not written that way.
        if !input.ends_with('/') {
            return Err(BaseUrlError::MissingTrailingSlash(input.to_string()));
        }

        // The parser drops whitespace, rewrites `\` and `..`, lowercases
        // the host and fills in a missing `//`.
        if url.as_str() != input {
            return Err(BaseUrlError::NonCanonical {
                url: input.to_string(),
                canonical: url.as_str().to_string(),
            });
        }

        Ok(BaseUrl(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Whether this URL uses plain `http`.
    pub fn is_insecure(&self) -> bool {
        self.0.scheme() == "http"
    }

    /// Append a page path to this base URL.
    ///
    /// A leading `/` on the suffix is dropped so the base path is kept.
    pub fn join(&self, suffix: &str) -> String {
        let suffix = suffix.trim_start_matches('/');
        format!("{}{}", self.0.as_str(), suffix)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for BaseUrl {
    type Err = BaseUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseUrl::parse(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BaseUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}
