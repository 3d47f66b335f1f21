//! Site builder: one pass from the source tree to the mirrored target tree.
//!
//! ```text
//! validate config → check source → prepare target → load templates
//!     → walk source → classify + write each file → collected errors
//! ```
//!
//! ## Failure Model
//!
//! Problems that make the whole build meaningless stop it before any file is
//! processed and are returned as a single message:
//!
//! - invalid configuration (all of its messages are returned)
//! - the source directory is missing or not a directory
//! - something other than a directory sits where the target should be
//! - a template fails to parse
//!
//! Everything else is per file. A failed file contributes exactly one message
//! and the build moves on, so one broken page never hides the rest of the
//! site. The build succeeded iff the returned list is empty.
//!
//! ## Parallelism
//!
//! Files are written on the rayon pool. Sources that map to the same output
//! path (`a.md` and `a.html`) are each reported and none of them is written,
//! so the remaining output paths are disjoint. `create_dir_all` treats a
//! directory created concurrently by another worker as success. Messages are
//! returned in source path order.

use crate::config::SiteConfig;
use crate::entry::{FileEntry, WriteContext, WriteError, classify};
use crate::render::Renderer;
use crate::walk::walk_files;
use log::{debug, info};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Progress notifications, one per processed file.
///
/// Paths are relative to the source and target roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Copied { source: PathBuf, target: PathBuf },
    Rendered { source: PathBuf, target: PathBuf },
    Failed { source: PathBuf, message: String },
}

/// Build the project rooted at the current directory.
pub fn build_site(config: &SiteConfig) -> Vec<String> {
    match std::env::current_dir() {
        Ok(root) => build_site_at(&root, config, None),
        Err(e) => vec![format!("could not determine the current directory: {e}")],
    }
}

/// Build the project rooted at `root`, optionally reporting progress.
pub fn build_site_at(
    root: &Path,
    config: &SiteConfig,
    events: Option<Sender<BuildEvent>>,
) -> Vec<String> {
    if !config.is_valid() {
        return config.errors.clone();
    }

    let source_root = root.join(&config.source);
    if !source_root.is_dir() {
        return vec![format!("./{} is not a directory", config.source)];
    }

    let target_root = root.join(&config.target);
    if let Err(message) = prepare_target(&target_root, &config.target) {
        return vec![message];
    }

    let renderer = match Renderer::load(&root.join(&config.templates), &config.markdown) {
        Ok(renderer) => renderer,
        Err(e) => return vec![e.to_string()],
    };

    info!(
        "building {} -> {}",
        source_root.display(),
        target_root.display()
    );

    let mut paths: Vec<PathBuf> = walk_files(&source_root)
        .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    paths.sort();

    let collisions = find_collisions(&paths, config);

    let ctx = WriteContext {
        root,
        config,
        renderer: &renderer,
    };

    let errors: Vec<String> = paths
        .par_iter()
        .filter_map(|path| {
            let entry = classify(path, config);
            let result = match collisions.get(path.as_path()) {
                Some((target, other)) => Err(WriteError::OutputCollision {
                    path: path.clone(),
                    target: target.clone(),
                    other: other.to_path_buf(),
                }),
                None => entry.write(&ctx),
            };
            let event = match result {
                Ok(target) => success_event(&entry, &target, config),
                Err(e) => {
                    debug!("{e}");
                    BuildEvent::Failed {
                        source: strip_root(path, &config.source),
                        message: e.to_string(),
                    }
                }
            };
            let message = match &event {
                BuildEvent::Failed { message, .. } => Some(message.clone()),
                _ => None,
            };
            if let Some(tx) = &events {
                // A hung-up receiver only loses progress output.
                let _ = tx.send(event);
            }
            message
        })
        .collect();

    info!(
        "processed {} files, {} failed",
        paths.len(),
        errors.len()
    );
    errors
}

/// Sources whose output path is shared with another source, each mapped to
/// that output path and the first other source producing it.
fn find_collisions<'p>(
    paths: &'p [PathBuf],
    config: &SiteConfig,
) -> HashMap<&'p Path, (PathBuf, &'p Path)> {
    let mut by_target: BTreeMap<PathBuf, Vec<&'p Path>> = BTreeMap::new();
    for path in paths {
        if let Some(target) = classify(path, config).target_path(config) {
            by_target.entry(target).or_default().push(path.as_path());
        }
    }

    let mut collisions = HashMap::new();
    for (target, sources) in by_target {
        if sources.len() < 2 {
            continue;
        }
        for &source in &sources {
            let other = sources
                .iter()
                .copied()
                .find(|s| *s != source)
                .unwrap_or(source);
            collisions.insert(source, (target.clone(), other));
        }
    }
    collisions
}

/// Create the target root unless a directory is already there.
fn prepare_target(target_root: &Path, name: &str) -> Result<(), String> {
    match fs::create_dir(target_root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if target_root.is_dir() {
                Ok(())
            } else {
                Err(format!("./{name} exists and is not a directory"))
            }
        }
        Err(e) => Err(format!("./{name}: could not create directory: {e}")),
    }
}

fn success_event(entry: &FileEntry, target: &Path, config: &SiteConfig) -> BuildEvent {
    let source = strip_root(entry.path(), &config.source);
    let target = strip_root(target, &config.target);
    match entry {
        FileEntry::Generic { .. } => BuildEvent::Copied { source, target },
        FileEntry::Markdown { .. } => BuildEvent::Rendered { source, target },
    }
}

fn strip_root(path: &Path, root: &str) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
