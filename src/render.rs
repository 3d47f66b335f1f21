//! Page rendering: Markdown to HTML, then through a Tera template.
//!
//! Templates are loaded once per build from the template directory. A
//! template's name is its path relative to that directory with `/`
//! separators, so `templates/layouts/post.html` is `layouts/post.html` in
//! front matter.
//!
//! ## Template Context
//!
//! | Variable | Value |
//! |----------|-------|
//! | every front matter key | its string value |
//! | `content` | the page body rendered to HTML |
//! | `source_path` | the page path relative to the source root (`x/y.md`) |
//! | `target_path` | the output path relative to the target root (`x/y.html`) |
//!
//! The built-in variables win over front matter keys of the same name.
//!
//! Tera autoescapes `.html` templates, so the body is inserted with
//! `{{ content | safe }}`.

use crate::config::MarkdownConfig;
use crate::front_matter::FrontMatter;
use crate::walk::walk_files;
use log::debug;
use pulldown_cmark::{Options, Parser, html};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to load templates from {dir}: {message}")]
    Load { dir: PathBuf, message: String },
    #[error("template `{0}` not found")]
    TemplateNotFound(String),
    #[error("template rendering failed: {0}")]
    Tera(String),
}

/// Where a page comes from and goes to, relative to the source and target
/// roots.
#[derive(Debug, Clone, Copy)]
pub struct PageLocation<'a> {
    pub source: &'a Path,
    pub target: &'a Path,
}

/// Template engine plus Markdown settings shared by every page of a build.
pub struct Renderer {
    tera: Tera,
    options: Options,
}

impl Renderer {
    /// Load every file under `dir` as a template.
    ///
    /// A missing directory yields a renderer with no templates; every page
    /// then fails with [`RenderError::TemplateNotFound`].
    pub fn load(dir: &Path, markdown: &MarkdownConfig) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        if dir.is_dir() {
            let files: Vec<(PathBuf, Option<String>)> = walk_files(dir)
                .filter_map(|path| {
                    let name = template_name(dir, &path)?;
                    debug!("loading template {name}");
                    Some((path, Some(name)))
                })
                .collect();
            tera.add_template_files(files)
                .map_err(|e| RenderError::Load {
                    dir: dir.to_path_buf(),
                    message: error_chain(&e),
                })?;
        } else {
            debug!("no template directory at {}", dir.display());
        }
        Ok(Self::from_tera(tera, markdown))
    }

    pub fn from_tera(tera: Tera, markdown: &MarkdownConfig) -> Self {
        Self {
            tera,
            options: markdown_options(markdown),
        }
    }

    /// Convert a Markdown body to an HTML fragment.
    pub fn markdown_to_html(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);
        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }

    /// Render `body` through `template` with the page's front matter in
    /// context.
    pub fn render_page(
        &self,
        template: &str,
        front_matter: &FrontMatter,
        body: &str,
        location: PageLocation<'_>,
    ) -> Result<String, RenderError> {
        let mut context = Context::new();
        for (key, value) in front_matter.iter() {
            context.insert(key, value);
        }
        context.insert("content", &self.markdown_to_html(body));
        context.insert("source_path", &slash_path(location.source));
        context.insert("target_path", &slash_path(location.target));

        self.tera
            .render(template, &context)
            .map_err(|e| match &e.kind {
                tera::ErrorKind::TemplateNotFound(name) => {
                    RenderError::TemplateNotFound(name.clone())
                }
                _ => RenderError::Tera(error_chain(&e)),
            })
    }
}

fn markdown_options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    options.set(Options::ENABLE_TABLES, config.tables);
    options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
    options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
    options.set(Options::ENABLE_TASKLISTS, config.tasklists);
    options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
    options
}

/// Template name for a file under the template directory.
///
/// Hidden files (editor swap files, `.DS_Store`) are not templates.
fn template_name(dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(dir).ok()?;
    let hidden = rel
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
    (!hidden).then(|| slash_path(rel))
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Tera reports the useful part of an error (line, column, offending
/// variable) in its source chain, not in the top-level message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}
