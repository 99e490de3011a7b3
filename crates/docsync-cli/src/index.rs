//! Navigation index for the reader front end.
//!
//! The index mirrors the source tree: folders first, then files, each group
//! sorted by name. Folders with nothing publishable inside are omitted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::exclude::{self, ExcludeRules};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndexEntry {
    Folder {
        name: String,
        children: Vec<IndexEntry>,
    },
    File {
        name: String,
        /// Published path relative to the docs directory.
        path: String,
        title: String,
    },
}

/// A directory child that survived the skip-name filter.
#[derive(Debug)]
pub struct DirChild {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// List a directory, folders first, each group sorted by name.
pub fn children(dir: &Path) -> io::Result<Vec<DirChild>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if exclude::is_skipped(&name) {
            continue;
        }
        let path = entry.path();
        let is_dir = path.is_dir();
        if !is_dir && !path.is_file() {
            continue;
        }
        out.push(DirChild { path, name, is_dir });
    }

    out.sort_by(|a, b| (!a.is_dir, &a.name).cmp(&(!b.is_dir, &b.name)));
    Ok(out)
}

/// Published path for a source-relative path: `md`/`docx` become `html`.
pub fn output_path(rel: &Path) -> PathBuf {
    match rel.extension().and_then(|e| e.to_str()) {
        Some("md") | Some("docx") => rel.with_extension("html"),
        _ => rel.to_path_buf(),
    }
}

/// Display title for a file: its stem with `-` and `_` turned into spaces.
pub fn title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_default()
}

/// Scan `dir` (inside `source_dir`) into index entries.
pub fn scan(dir: &Path, source_dir: &Path, rules: &ExcludeRules) -> io::Result<Vec<IndexEntry>> {
    let mut items = Vec::new();

    for child in children(dir)? {
        if child.is_dir {
            let nested = scan(&child.path, source_dir, rules)?;
            if !nested.is_empty() {
                items.push(IndexEntry::Folder {
                    name: child.name,
                    children: nested,
                });
            }
            continue;
        }

        let rel = child.path.strip_prefix(source_dir).unwrap_or(&child.path);
        if !rules.admits(rel) {
            continue;
        }
        items.push(IndexEntry::File {
            path: exclude::slash_path(&output_path(rel)),
            title: title(rel),
            name: child.name,
        });
    }

    Ok(items)
}

/// Build the full index: one root folder named after the source directory.
pub fn build(source_dir: &Path, source_name: &str, rules: &ExcludeRules) -> io::Result<Vec<IndexEntry>> {
    let children = if source_dir.is_dir() {
        scan(source_dir, source_dir, rules)?
    } else {
        Vec::new()
    };

    Ok(vec![IndexEntry::Folder {
        name: source_name.to_string(),
        children,
    }])
}

/// Write the index as pretty-printed JSON.
pub fn write(entries: &[IndexEntry], output_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(output_file, json)
        .with_context(|| format!("failed to write index {}", output_file.display()))?;
    log::info!("Index: {}", output_file.display());
    Ok(())
}
