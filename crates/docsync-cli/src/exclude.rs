//! Exclusion rules for source files.

use std::collections::HashSet;
use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::config::{ConfigError, SiteConfig};

/// Name prefixes that are never scanned, at any depth.
pub const SKIP_NAMES: [&str; 6] = [
    ".git",
    "__pycache__",
    "node_modules",
    ".github",
    "reader",
    "scripts",
];

/// Extensions that are published.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["txt", "md", "docx"];

/// `*` is allowed to cross `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Check whether a directory entry is skipped by name.
pub fn is_skipped(name: &str) -> bool {
    SKIP_NAMES.iter().any(|prefix| name.starts_with(prefix))
}

/// Render a relative path with forward slashes.
pub fn slash_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Why a file is left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Matched an `exclude_patterns` glob.
    Pattern,
    /// Named in `exclude_files`.
    FileName,
    /// Extension is not published.
    Unsupported,
}

#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    patterns: Vec<Pattern>,
    files: HashSet<String>,
}

impl ExcludeRules {
    /// Compile exclusion rules. Fails on the first invalid pattern.
    pub fn new(patterns: &[String], files: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            files: files.iter().cloned().collect(),
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Self::new(&config.exclude_patterns, &config.exclude_files)
    }

    /// Check a source-relative file path.
    pub fn check(&self, rel: &Path) -> Option<Exclusion> {
        let rel_str = slash_path(rel);
        if self
            .patterns
            .iter()
            .any(|p| p.matches_with(&rel_str, MATCH_OPTIONS))
        {
            return Some(Exclusion::Pattern);
        }

        let name = rel.file_name().map(|n| n.to_string_lossy());
        if name.is_some_and(|name| self.files.contains(&*name)) {
            return Some(Exclusion::FileName);
        }

        let ext = rel.extension().and_then(|e| e.to_str());
        if !ext.is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext)) {
            return Some(Exclusion::Unsupported);
        }

        None
    }

    /// Check a source-relative path and log why it is excluded.
    pub fn admits(&self, rel: &Path) -> bool {
        match self.check(rel) {
            None => true,
            Some(Exclusion::Unsupported) => {
                log::info!("Skipped (unsupported type): {}", slash_path(rel));
                false
            }
            Some(_) => {
                log::info!("Excluded: {}", slash_path(rel));
                false
            }
        }
    }
}
