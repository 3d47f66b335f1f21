//! CLI output formatting for builds.
//!
//! Each build event becomes one line, paths shown relative to the source and
//! target roots so the output reads as an inventory of the site rather than
//! of the filesystem:
//!
//! ```text
//! ==> Building site → _site
//!     rendered  blog/first.md → blog/first.html
//!     copied    css/style.css
//!     failed    drafts/wip.md
//!
//! error: site/drafts/wip.md: missing front matter key `template`
//! ==> Build failed: 1 of 3 files had errors
//! ```
//!
//! Every `format_*` function is pure and returns strings for testability;
//! `print_*` wrappers do the writing.

use crate::site::BuildEvent;
use std::path::{Path, PathBuf};

/// Running counts of build events, kept by the CLI's progress printer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildTally {
    pub rendered: usize,
    pub copied: usize,
    pub failed: usize,
}

impl BuildTally {
    pub fn record(&mut self, event: &BuildEvent) {
        match event {
            BuildEvent::Rendered { .. } => self.rendered += 1,
            BuildEvent::Copied { .. } => self.copied += 1,
            BuildEvent::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.rendered + self.copied + self.failed
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format a single progress event.
///
/// Copies keep their name, so only the source is shown; renders show both
/// sides since the extension changes.
pub fn format_build_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::Rendered { source, target } => format!(
            "    rendered  {} → {}",
            source.display(),
            target.display()
        ),
        BuildEvent::Copied { source, .. } => format!("    copied    {}", source.display()),
        BuildEvent::Failed { source, .. } => format!("    failed    {}", source.display()),
    }
}

pub fn format_build_header(source: &str, target: &str) -> String {
    format!("==> Building {source} → {target}")
}

/// Format the closing line of a build.
pub fn format_summary(tally: &BuildTally, target: &Path) -> String {
    if tally.failed > 0 {
        format!(
            "==> Build failed: {} of {} had errors",
            tally.failed,
            plural(tally.total(), "file", "files")
        )
    } else {
        format!(
            "==> Build complete: {}, {} → {}",
            plural(tally.rendered, "page rendered", "pages rendered"),
            plural(tally.copied, "file copied", "files copied"),
            target.display()
        )
    }
}

/// Prefix every message for stderr.
pub fn format_errors(errors: &[String]) -> Vec<String> {
    errors.iter().map(|e| format!("error: {e}")).collect()
}

pub fn print_errors(errors: &[String]) {
    for line in format_errors(errors) {
        eprintln!("{line}");
    }
}

/// Format the file list printed by `init`.
pub fn format_init_output(dir: &Path, created: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![format!("==> Initialized folio project in {}", dir.display())];
    lines.extend(created.iter().map(|p| format!("    {}", p.display())));
    lines
}

pub fn print_init_output(dir: &Path, created: &[PathBuf]) {
    for line in format_init_output(dir, created) {
        println!("{line}");
    }
}
