//! Configuration file support for docmap.
//!
//! docmap supports two configuration file locations:
//! - Global: `config.toml` in the platform config directory - User-wide defaults
//! - Project: `.docmap/config.toml` next to Docmap.toml - Project-specific overrides
//!
//! Project config takes precedence over global config. A target's own
//! `duplicates` setting in Docmap.toml takes precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::table::DuplicatePolicy;
use crate::core::validate::ValidationOptions;
use crate::sources::{JsStyle, QuoteStyle};

/// docmap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Validation settings
    pub check: CheckConfig,

    /// Output settings
    pub emit: EmitConfig,
}

/// Validation-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// How repeated namespaces with different URLs are handled
    pub duplicates: Option<DuplicatePolicy>,

    /// Treat `http://` base URLs as errors instead of warnings
    pub require_https: Option<bool>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Quote character for generated `urlmap.js` files (single, double)
    pub quote: Option<QuoteStyle>,

    /// Spaces before each entry in generated `urlmap.js` files
    pub indent: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.check.duplicates.is_some() {
            self.check.duplicates = other.check.duplicates;
        }
        if other.check.require_https.is_some() {
            self.check.require_https = other.check.require_https;
        }

        if other.emit.quote.is_some() {
            self.emit.quote = other.emit.quote;
        }
        if other.emit.indent.is_some() {
            self.emit.indent = other.emit.indent;
        }
    }

    /// Validation options, with an optional per-target duplicate policy.
    pub fn validation_options(&self, target_policy: Option<DuplicatePolicy>) -> ValidationOptions {
        ValidationOptions {
            duplicates: target_policy
                .or(self.check.duplicates)
                .unwrap_or_default(),
            require_https: self.check.require_https.unwrap_or(false),
        }
    }

    /// Layout for rendered `urlmap.js` files.
    pub fn js_style(&self) -> JsStyle {
        let default = JsStyle::default();
        JsStyle {
            quote: self.emit.quote.unwrap_or(default.quote),
            indent: self.emit.indent.unwrap_or(default.indent),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.docmap/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            let global = Config::load_or_default(global_path);
            config.merge(global);
        }
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the project config path (.docmap/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".docmap").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.check.duplicates.is_none());
        assert!(config.emit.quote.is_none());

        let opts = config.validation_options(None);
        assert_eq!(opts.duplicates, DuplicatePolicy::Reject);
        assert!(!opts.require_https);
        assert_eq!(config.js_style(), JsStyle::default());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[check]
duplicates = "first-wins"
require_https = true

[emit]
quote = "double"
indent = 2
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.check.duplicates, Some(DuplicatePolicy::FirstWins));
        assert_eq!(config.check.require_https, Some(true));

        let style = config.js_style();
        assert_eq!(style.quote, QuoteStyle::Double);
        assert_eq!(style.indent, 2);
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[check]\nduplicates = \"newest\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
        // A broken file falls back to defaults
        let config = Config::load_or_default(&config_path);
        assert!(config.check.duplicates.is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.check.duplicates = Some(DuplicatePolicy::FirstWins);
        base.emit.indent = Some(2);

        let mut override_cfg = Config::default();
        override_cfg.check.duplicates = Some(DuplicatePolicy::LastWins);

        base.merge(override_cfg);

        assert_eq!(base.check.duplicates, Some(DuplicatePolicy::LastWins));
        assert_eq!(base.emit.indent, Some(2)); // Not overridden
    }

    #[test]
    fn test_target_policy_overrides_config() {
        let mut config = Config::default();
        config.check.duplicates = Some(DuplicatePolicy::FirstWins);

        assert_eq!(
            config.validation_options(None).duplicates,
            DuplicatePolicy::FirstWins
        );
        assert_eq!(
            config
                .validation_options(Some(DuplicatePolicy::Reject))
                .duplicates,
            DuplicatePolicy::Reject
        );
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_root = tmp.path().join("project");
        let project_path = project_config_path(&project_root);

        std::fs::write(
            &global_path,
            "[check]\nduplicates = \"first-wins\"\n\n[emit]\nquote = \"double\"\n",
        )
        .unwrap();
        std::fs::create_dir_all(project_path.parent().unwrap()).unwrap();
        std::fs::write(&project_path, "[check]\nduplicates = \"reject\"\n").unwrap();

        let config = load_config(Some(&global_path), &project_path);

        // Project config should override duplicates
        assert_eq!(config.check.duplicates, Some(DuplicatePolicy::Reject));
        // Global quote should be preserved
        assert_eq!(config.emit.quote, Some(QuoteStyle::Double));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("missing.toml"));
        assert!(config.check.duplicates.is_none());
    }
}
