//! File classification and the per-file handlers.
//!
//! Every file in the source tree becomes a [`FileEntry`], chosen purely by
//! extension:
//!
//! | Extension | Entry | Output |
//! |-----------|-------|--------|
//! | `.md` (exact, case-sensitive) | [`FileEntry::Markdown`] | `.html` rendered through a template |
//! | anything else, or none | [`FileEntry::Generic`] | byte-for-byte copy |
//!
//! Entry paths are relative to the project root and start with the source
//! directory (`site/blog/post.md`). The output path swaps that first segment
//! for the target directory (`_site/blog/post.html`), so the trees under the
//! two roots stay isomorphic.

use crate::config::SiteConfig;
use crate::front_matter::{self, FrontMatterError};
use crate::render::{PageLocation, RenderError, Renderer};
use log::debug;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Front matter key naming the template a page is rendered with.
pub const TEMPLATE_KEY: &str = "template";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{}: is not inside the source directory", .path.display())]
    NotUnderSource { path: PathBuf },
    #[error("{}: {context}: {source}", .path.display())]
    Io {
        path: PathBuf,
        context: String,
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },
    #[error("{}: missing front matter key `{key}`", .path.display())]
    MissingKey { path: PathBuf, key: &'static str },
    #[error("{}: template `{name}` not found", .path.display())]
    TemplateNotFound { path: PathBuf, name: String },
    #[error("{}: {message}", .path.display())]
    Render { path: PathBuf, message: String },
    #[error(
        "{}: output {} also produced by {}",
        .path.display(),
        .target.display(),
        .other.display()
    )]
    OutputCollision {
        path: PathBuf,
        target: PathBuf,
        other: PathBuf,
    },
}

/// Everything a handler needs besides its own path.
#[derive(Clone, Copy)]
pub struct WriteContext<'a> {
    /// Project root that entry paths are relative to.
    pub root: &'a Path,
    pub config: &'a SiteConfig,
    pub renderer: &'a Renderer,
}

/// A classified source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Copied verbatim.
    Generic { path: PathBuf },
    /// Front matter + Markdown body, rendered to HTML.
    Markdown { path: PathBuf },
}

/// Classify `path` by its extension. Performs no I/O.
pub fn classify(path: &Path, _config: &SiteConfig) -> FileEntry {
    let path = path.to_path_buf();
    if path.extension() == Some(OsStr::new("md")) {
        FileEntry::Markdown { path }
    } else {
        FileEntry::Generic { path }
    }
}

/// Swap the leading source segment of `path` for the target segment.
///
/// Leading `.` components are kept. Returns `None` when the first real
/// segment is not the source directory.
pub fn mirror_path(path: &Path, config: &SiteConfig) -> Option<PathBuf> {
    let mut components = path.components();
    let mut out = PathBuf::new();
    loop {
        match components.next() {
            Some(Component::CurDir) => out.push("."),
            Some(Component::Normal(first)) if first == OsStr::new(&config.source) => {
                out.push(&config.target);
                break;
            }
            _ => return None,
        }
    }
    let rest = components.as_path();
    if !rest.as_os_str().is_empty() {
        out.push(rest);
    }
    Some(out)
}

/// The part of `path` below the source (or target) segment.
fn below_root(path: &Path) -> &Path {
    let mut components = path.components();
    for component in components.by_ref() {
        if let Component::Normal(_) = component {
            break;
        }
    }
    components.as_path()
}

impl FileEntry {
    pub fn path(&self) -> &Path {
        match self {
            FileEntry::Generic { path } | FileEntry::Markdown { path } => path,
        }
    }

    /// Where this entry is written, relative to the project root.
    pub fn target_path(&self, config: &SiteConfig) -> Option<PathBuf> {
        let mut target = mirror_path(self.path(), config)?;
        if let FileEntry::Markdown { .. } = self {
            target.set_extension("html");
        }
        Some(target)
    }

    /// Produce this entry's output file, returning its path relative to the
    /// project root.
    pub fn write(&self, ctx: &WriteContext<'_>) -> Result<PathBuf, WriteError> {
        let target = self
            .target_path(ctx.config)
            .ok_or_else(|| WriteError::NotUnderSource {
                path: self.path().to_path_buf(),
            })?;
        match self {
            FileEntry::Generic { path } => write_generic(path, &target, ctx)?,
            FileEntry::Markdown { path } => write_markdown(path, &target, ctx)?,
        }
        Ok(target)
    }
}

fn io_error(path: &Path, context: String) -> impl FnOnce(io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        context,
        source,
    }
}

/// Create the parent of `target`. An existing directory is fine; an
/// existing file in its place is not.
fn ensure_parent(path: &Path, target: &Path, root: &Path) -> Result<(), WriteError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(root.join(parent)).map_err(io_error(
            path,
            format!("could not create directory {}", parent.display()),
        ))?;
    }
    Ok(())
}

fn write_generic(path: &Path, target: &Path, ctx: &WriteContext<'_>) -> Result<(), WriteError> {
    ensure_parent(path, target, ctx.root)?;
    fs::copy(ctx.root.join(path), ctx.root.join(target))
        .map_err(io_error(path, format!("could not copy to {}", target.display())))?;
    debug!("copied {} -> {}", path.display(), target.display());
    Ok(())
}

fn write_markdown(path: &Path, target: &Path, ctx: &WriteContext<'_>) -> Result<(), WriteError> {
    ensure_parent(path, target, ctx.root)?;

    let text = fs::read_to_string(ctx.root.join(path))
        .map_err(io_error(path, "could not read file".to_string()))?;

    let (front_matter, body) =
        front_matter::parse(&text).map_err(|source| WriteError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let template = front_matter
        .get(TEMPLATE_KEY)
        .ok_or_else(|| WriteError::MissingKey {
            path: path.to_path_buf(),
            key: TEMPLATE_KEY,
        })?;

    let location = PageLocation {
        source: below_root(path),
        target: below_root(target),
    };
    let html = ctx
        .renderer
        .render_page(template, &front_matter, body, location)
        .map_err(|e| match e {
            RenderError::TemplateNotFound(name) => WriteError::TemplateNotFound {
                path: path.to_path_buf(),
                name,
            },
            other => WriteError::Render {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;

    fs::write(ctx.root.join(target), html)
        .map_err(io_error(path, format!("could not write {}", target.display())))?;
    debug!(
        "rendered {} -> {} with {template}",
        path.display(),
        target.display()
    );
    Ok(())
}
