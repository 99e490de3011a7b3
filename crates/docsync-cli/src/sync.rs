//! Batch sync: source tree to published docs tree.
//!
//! A run plans every eligible source file, removes published files that no
//! longer have a source, converts what changed in parallel and rewrites the
//! navigation index. A document that fails to convert is reported and never
//! leaves a stale output behind; the rest of the batch is unaffected.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use docsync_core::{convert, DocumentKind, RenderOptions};
use rayon::prelude::*;

use crate::config::SiteConfig;
use crate::exclude::{slash_path, ExcludeRules};
use crate::index;

/// Where a sync run reads and writes.
#[derive(Debug, Clone)]
pub struct SyncPaths {
    pub source_name: String,
    pub source_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub index_file: PathBuf,
}

impl SyncPaths {
    pub fn new(root: &Path, config: &SiteConfig) -> Self {
        let reader = root.join("reader");
        Self {
            source_name: config.source_dir.clone(),
            source_dir: root.join(&config.source_dir),
            docs_dir: reader.join("docs"),
            index_file: reader.join("index.json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Published verbatim.
    Copy,
    /// Rendered to HTML.
    Convert(DocumentKind),
}

/// One source file and where it is published.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Source-relative path, forward slashes.
    pub rel: String,
    /// Docs-relative destination path, forward slashes.
    pub dest_rel: String,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Copied,
    Converted,
    Skipped,
}

#[derive(Debug)]
pub struct SyncFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub copied: usize,
    pub converted: usize,
    pub skipped: usize,
    pub deleted: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Plan every eligible file below the source directory.
pub fn plan(paths: &SyncPaths, rules: &ExcludeRules) -> io::Result<Vec<PlannedFile>> {
    let mut planned = Vec::new();
    collect(&paths.source_dir, paths, rules, &mut planned)?;
    Ok(planned)
}

fn collect(
    dir: &Path,
    paths: &SyncPaths,
    rules: &ExcludeRules,
    planned: &mut Vec<PlannedFile>,
) -> io::Result<()> {
    for child in index::children(dir)? {
        if child.is_dir {
            collect(&child.path, paths, rules, planned)?;
            continue;
        }

        let rel = child
            .path
            .strip_prefix(&paths.source_dir)
            .unwrap_or(&child.path)
            .to_path_buf();
        if rules.check(&rel).is_some() {
            continue;
        }

        let Some(kind) = DocumentKind::from_path(&rel) else {
            continue;
        };
        let action = match kind {
            DocumentKind::PlainText => Action::Copy,
            kind => Action::Convert(kind),
        };
        let dest_rel = index::output_path(&rel);

        planned.push(PlannedFile {
            source: child.path.clone(),
            dest: paths.docs_dir.join(&dest_rel),
            rel: slash_path(&rel),
            dest_rel: slash_path(&dest_rel),
            action,
        });
    }
    Ok(())
}

/// Publishing rank when two sources claim the same destination. Rich text
/// is published after markup, so it wins.
fn precedence(action: Action) -> u8 {
    match action {
        Action::Copy => 0,
        Action::Convert(DocumentKind::RichText) => 2,
        Action::Convert(_) => 1,
    }
}

/// Give every destination a single owner.
///
/// Sources that map to the same output (`a.md` and `a.docx`) are resolved by
/// [`precedence`]; each losing source is returned as a failure and never
/// published, so no two planned files write or delete the same path.
pub fn resolve_collisions(planned: Vec<PlannedFile>) -> (Vec<PlannedFile>, Vec<SyncFailure>) {
    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (i, file) in planned.iter().enumerate() {
        let slot = owner.entry(file.dest_rel.as_str()).or_insert(i);
        if precedence(file.action) > precedence(planned[*slot].action) {
            *slot = i;
        }
    }

    let mut kept = Vec::with_capacity(planned.len());
    let mut failures = Vec::new();
    for (i, file) in planned.iter().enumerate() {
        let winner = owner[file.dest_rel.as_str()];
        if winner == i {
            kept.push(file.clone());
            continue;
        }
        log::warn!(
            "Conflict: {} and {} both publish to {}",
            file.rel,
            planned[winner].rel,
            file.dest_rel
        );
        failures.push(SyncFailure {
            path: file.rel.clone(),
            error: format!(
                "output {} is already published from {}",
                file.dest_rel, planned[winner].rel
            ),
        });
    }
    (kept, failures)
}

/// Check whether `dest` is at least as new as `source`.
pub fn is_up_to_date(source: &Path, dest: &Path) -> bool {
    let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified());
    match (modified(source), modified(dest)) {
        (Ok(src), Ok(dst)) => dst >= src,
        _ => false,
    }
}

/// Delete published `.html`/`.txt` files that no planned destination maps
/// to, then prune empty directories. Returns the number of deleted files.
pub fn cleanup_orphans(docs_dir: &Path, planned: &[PlannedFile]) -> io::Result<usize> {
    if !docs_dir.is_dir() {
        return Ok(0);
    }

    let valid: HashSet<&str> = planned.iter().map(|f| f.dest_rel.as_str()).collect();
    let mut deleted = 0;
    remove_orphans(docs_dir, docs_dir, &valid, &mut deleted)?;
    remove_empty_dirs(docs_dir, docs_dir)?;

    if deleted > 0 {
        log::info!("Cleanup removed {} file(s)", deleted);
    }
    Ok(deleted)
}

fn remove_orphans(
    dir: &Path,
    docs_dir: &Path,
    valid: &HashSet<&str>,
    deleted: &mut usize,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            remove_orphans(&path, docs_dir, valid, deleted)?;
            continue;
        }

        let published = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("html") | Some("txt")
        );
        if !published {
            continue;
        }

        let rel = slash_path(path.strip_prefix(docs_dir).unwrap_or(&path));
        if !valid.contains(rel.as_str()) {
            fs::remove_file(&path)?;
            log::info!("Deleted: {}", rel);
            *deleted += 1;
        }
    }
    Ok(())
}

fn remove_empty_dirs(dir: &Path, docs_dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        remove_empty_dirs(&path, docs_dir)?;
        if fs::read_dir(&path)?.next().is_none() {
            fs::remove_dir(&path)?;
            log::info!(
                "Deleted empty directory: {}",
                slash_path(path.strip_prefix(docs_dir).unwrap_or(&path))
            );
        }
    }
    Ok(())
}

/// Publish one planned file.
fn publish(file: &PlannedFile, options: &RenderOptions, force: bool) -> anyhow::Result<Outcome> {
    if !force && is_up_to_date(&file.source, &file.dest) {
        log::info!("Skipped (unmodified): {}", file.rel);
        return Ok(Outcome::Skipped);
    }

    if let Some(parent) = file.dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    match file.action {
        Action::Copy => {
            fs::copy(&file.source, &file.dest)
                .with_context(|| format!("failed to copy to {}", file.dest.display()))?;
            log::info!("Copied: {}", file.rel);
            Ok(Outcome::Copied)
        }
        Action::Convert(kind) => {
            let bytes = fs::read(&file.source)
                .with_context(|| format!("failed to read {}", file.source.display()))?;
            let html = convert(kind, &bytes, options)?;
            fs::write(&file.dest, html)
                .with_context(|| format!("failed to write {}", file.dest.display()))?;
            log::info!("Converted: {} -> {}", file.rel, file.dest_rel);
            Ok(Outcome::Converted)
        }
    }
}

/// Run a full sync.
pub fn run(
    paths: &SyncPaths,
    options: &RenderOptions,
    rules: &ExcludeRules,
    force: bool,
) -> anyhow::Result<SyncReport> {
    if !paths.source_dir.is_dir() {
        bail!(
            "source directory does not exist: {}",
            paths.source_dir.display()
        );
    }
    log::info!("Source: {}", paths.source_dir.display());

    let planned = plan(paths, rules)
        .with_context(|| format!("failed to scan {}", paths.source_dir.display()))?;
    let (planned, conflicts) = resolve_collisions(planned);

    let mut report = SyncReport {
        deleted: cleanup_orphans(&paths.docs_dir, &planned)
            .with_context(|| format!("failed to clean {}", paths.docs_dir.display()))?,
        failures: conflicts,
        ..SyncReport::default()
    };

    fs::create_dir_all(&paths.docs_dir)
        .with_context(|| format!("failed to create {}", paths.docs_dir.display()))?;

    let results: Vec<anyhow::Result<Outcome>> = planned
        .par_iter()
        .map(|file| publish(file, options, force))
        .collect();

    for (file, result) in planned.iter().zip(results) {
        match result {
            Ok(Outcome::Copied) => report.copied += 1,
            Ok(Outcome::Converted) => report.converted += 1,
            Ok(Outcome::Skipped) => report.skipped += 1,
            Err(e) => {
                // Destinations are unique after collision resolution.
                if file.dest.exists() {
                    if let Err(remove) = fs::remove_file(&file.dest) {
                        log::warn!("Could not remove stale {}: {}", file.dest_rel, remove);
                    }
                }
                log::warn!("Failed: {} - {:#}", file.rel, e);
                report.failures.push(SyncFailure {
                    path: file.rel.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    let entries = index::build(&paths.source_dir, &paths.source_name, rules)
        .with_context(|| format!("failed to index {}", paths.source_dir.display()))?;
    index::write(&entries, &paths.index_file)?;

    log::info!(
        "Done: {} converted, {} copied, {} skipped, {} deleted, {} failed",
        report.converted,
        report.copied,
        report.skipped,
        report.deleted,
        report.failed()
    );
    Ok(report)
}
