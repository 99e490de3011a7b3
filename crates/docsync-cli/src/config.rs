//! Site configuration.
//!
//! The reader site keeps a JSON configuration next to its assets
//! (`<root>/reader/config.json`). Sync only consumes the source directory,
//! exclusion lists and render options; the remaining fields belong to the
//! reader front end and are carried through unchanged.

use std::path::{Path, PathBuf};

use docsync_core::RenderOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Source directory name, relative to the site root.
    pub source_dir: String,
    /// Glob patterns matched against source-relative paths.
    pub exclude_patterns: Vec<String>,
    /// Exact file names to leave out.
    pub exclude_files: Vec<String>,
    pub site_title: String,
    pub sidebar_title: String,
    pub enable_search: bool,
    pub home_page: String,
    /// HTML output options.
    pub render: RenderOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: "txt".to_string(),
            exclude_patterns: Vec::new(),
            exclude_files: Vec::new(),
            site_title: "文档阅读器".to_string(),
            sidebar_title: "文档目录".to_string(),
            enable_search: true,
            home_page: String::new(),
            render: RenderOptions::default(),
        }
    }
}

impl SiteConfig {
    /// Load the configuration at `config_path`; `Ok(None)` if there is no file.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: SiteConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref();
        match Self::load_from_path(config_path) {
            Ok(Some(config)) => {
                log::info!("Config: {}", config_path.display());
                config
            }
            Ok(None) => {
                log::debug!("No config at {}, using defaults", config_path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Default configuration location for a site root.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join("reader").join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = SiteConfig::load_from_path(dir.path().join("config.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"source_dir": "docs", "exclude_files": ["secret.md"], "render": {"link_target": null}}"#,
        )
        .unwrap();

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.source_dir, "docs");
        assert_eq!(config.exclude_files, vec!["secret.md".to_string()]);
        assert!(config.exclude_patterns.is_empty());
        assert!(config.enable_search);
        assert_eq!(config.render.link_target, None);
        assert_eq!(config.render.table_class.as_deref(), Some("md-table"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"theme": "dark", "max_content_width": 900}"#).unwrap();

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SiteConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert_eq!(SiteConfig::load_or_default(&path), SiteConfig::default());
    }

    #[test]
    fn test_default_path() {
        let path = SiteConfig::default_path(Path::new("/site"));
        assert_eq!(path, PathBuf::from("/site/reader/config.json"));
    }
}
