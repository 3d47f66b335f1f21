//! Source tree traversal.
//!
//! [`walk_files`] lazily yields every regular file below a root directory.
//! Directories are descended into but never yielded; anything else the
//! filesystem can hold (sockets, FIFOs, device nodes, dangling symlinks,
//! symlink loops) is skipped without an error.
//!
//! Symlinks are followed, but a symlinked directory that resolves outside
//! the root is not descended into. A link such as `site/up -> ..` would
//! otherwise pull the output and template directories into the walk.
//!
//! Traversal order is unspecified. Callers that need a stable order sort.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lazily walk `root`, yielding the path of every regular file beneath it.
///
/// `root` is expected to be an existing directory. Symlinks are followed, so
/// a link to a file yields that file under the link's path; walkdir's loop
/// detection keeps a directory from being visited twice through a cycle.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    let canonical_root = fs::canonicalize(root).ok();
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(move |entry| stays_inside(entry, canonical_root.as_deref()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter_map(|entry| {
            let file_type = entry.file_type();
            if file_type.is_file() {
                Some(entry.into_path())
            } else {
                if !file_type.is_dir() {
                    debug!("skipping non-regular file {}", entry.path().display());
                }
                None
            }
        })
}

/// False for a symlinked directory whose real path is outside `root`.
fn stays_inside(entry: &DirEntry, root: Option<&Path>) -> bool {
    let Some(root) = root else {
        return true;
    };
    if !entry.path_is_symlink() || !entry.file_type().is_dir() {
        return true;
    }
    match fs::canonicalize(entry.path()) {
        Ok(real) if real.starts_with(root) => true,
        _ => {
            debug!(
                "skipping symlinked directory outside the walk root {}",
                entry.path().display()
            );
            false
        }
    }
}
