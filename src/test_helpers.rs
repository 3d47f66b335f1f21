//! Shared test utilities for the folio test suite.
//!
//! [`Project`] is a throwaway project root in a temp directory with an empty
//! `site/` source tree. Helpers write source files and templates, run a
//! handler or a whole build, and read back what landed in `_site/`.
//!
//! ```rust
//! let project = Project::new();
//! project.template("root.html", "{{ content | safe }}");
//! project.source_text("index.md", "+++\ntemplate = \"root.html\"\n+++\n# Hi\n");
//!
//! assert!(project.build().is_empty());
//! assert_eq!(project.read_output("index.html"), "<h1>Hi</h1>\n");
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::entry::{FileEntry, WriteContext, WriteError};
use crate::render::Renderer;
use crate::site::build_site_at;

pub struct Project {
    tmp: TempDir,
    pub config: SiteConfig,
}

impl Project {
    /// A project root with an empty source directory and default config.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig::default();
        fs::create_dir(tmp.path().join(&config.source)).unwrap();
        Self { tmp, config }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn source_root(&self) -> PathBuf {
        self.root().join(&self.config.source)
    }

    pub fn target_root(&self) -> PathBuf {
        self.root().join(&self.config.target)
    }

    // =========================================================================
    // Writing inputs
    // =========================================================================

    /// Write raw bytes at `rel` below the source root.
    pub fn source_file(&self, rel: &str, contents: &[u8]) {
        write_creating_parents(&self.source_root().join(rel), contents);
    }

    pub fn source_text(&self, rel: &str, contents: &str) {
        self.source_file(rel, contents.as_bytes());
    }

    /// Write a template below the template directory.
    pub fn template(&self, name: &str, contents: &str) {
        let dir = self.root().join(&self.config.templates);
        write_creating_parents(&dir.join(name), contents.as_bytes());
    }

    /// Write a file below the target root, e.g. to block a directory.
    pub fn output_file(&self, rel: &str, contents: &[u8]) {
        write_creating_parents(&self.target_root().join(rel), contents);
    }

    // =========================================================================
    // Running
    // =========================================================================

    pub fn renderer(&self) -> Renderer {
        Renderer::load(
            &self.root().join(&self.config.templates),
            &self.config.markdown,
        )
        .unwrap()
    }

    /// Run a single handler against this project.
    pub fn write(&self, entry: &FileEntry) -> Result<PathBuf, WriteError> {
        let renderer = self.renderer();
        let ctx = WriteContext {
            root: self.root(),
            config: &self.config,
            renderer: &renderer,
        };
        entry.write(&ctx)
    }

    /// Run a full build without progress events.
    pub fn build(&self) -> Vec<String> {
        build_site_at(self.root(), &self.config, None)
    }

    // =========================================================================
    // Reading outputs
    // =========================================================================

    pub fn read_output(&self, rel: &str) -> String {
        let path = self.target_root().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("could not read output {}: {e}", path.display()))
    }

    pub fn read_output_bytes(&self, rel: &str) -> Vec<u8> {
        let path = self.target_root().join(rel);
        fs::read(&path).unwrap_or_else(|e| panic!("could not read output {}: {e}", path.display()))
    }

    pub fn output_exists(&self, rel: &str) -> bool {
        self.target_root().join(rel).exists()
    }

    /// Every regular file below the target root, as `/`-joined relative paths.
    pub fn output_files(&self) -> BTreeSet<String> {
        let root = self.target_root();
        crate::walk::walk_files(&root)
            .map(|p| {
                p.strip_prefix(&root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }
}

fn write_creating_parents(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Front matter header naming `template`, followed by `body`.
pub fn page(template: &str, body: &str) -> String {
    format!("+++\ntemplate = \"{template}\"\n+++\n{body}")
}
