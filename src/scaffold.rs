//! Starter project generation for `folio init`.
//!
//! The starter files are embedded in the binary at compile time, so `init`
//! works without network access or an installed template directory:
//!
//! ```text
//! folio.toml
//! site/index.md
//! site/css/style.css
//! templates/root.html
//! ```
//!
//! The destination must be an existing directory with no visible entries.
//! Dotfiles are ignored so an `init` right after `git init` still works.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} is not empty", .0.display())]
    NotEmpty(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const STARTER_FILES: &[(&str, &str)] = &[
    ("folio.toml", include_str!("../starter/folio.toml")),
    ("site/index.md", include_str!("../starter/site/index.md")),
    ("site/css/style.css", include_str!("../starter/site/css/style.css")),
    ("templates/root.html", include_str!("../starter/templates/root.html")),
];

/// Write the starter project into `dir`, returning the created paths
/// relative to it.
pub fn init_project(dir: &Path) -> Result<Vec<PathBuf>, InitError> {
    if !dir.is_dir() {
        return Err(InitError::NotADirectory(dir.to_path_buf()));
    }
    if has_visible_entries(dir)? {
        return Err(InitError::NotEmpty(dir.to_path_buf()));
    }

    let mut created = Vec::with_capacity(STARTER_FILES.len());
    for (rel, contents) in STARTER_FILES {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        created.push(PathBuf::from(rel));
    }
    Ok(created)
}

fn has_visible_entries(dir: &Path) -> Result<bool, InitError> {
    for entry in fs::read_dir(dir)? {
        if !entry?.file_name().to_string_lossy().starts_with('.') {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::site::build_site_at;
    use tempfile::TempDir;

    #[test]
    fn creates_starter_layout() {
        let tmp = TempDir::new().unwrap();
        let created = init_project(tmp.path()).unwrap();

        assert_eq!(created.len(), STARTER_FILES.len());
        assert!(tmp.path().join("site").is_dir());
        assert!(tmp.path().join("site/index.md").is_file());
        assert!(tmp.path().join("templates/root.html").is_file());
    }

    #[test]
    fn starter_project_builds_cleanly() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path()).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert!(config.is_valid());
        let errors = build_site_at(tmp.path(), &config, None);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");

        let index = fs::read_to_string(tmp.path().join("_site/index.html")).unwrap();
        assert!(index.contains("<title>Welcome</title>"));
        assert!(index.contains("<h1>Welcome</h1>"));
        assert!(tmp.path().join("_site/css/style.css").is_file());
    }

    #[test]
    fn refuses_non_empty_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), "hello").unwrap();

        let err = init_project(tmp.path()).unwrap_err();
        assert!(matches!(err, InitError::NotEmpty(_)));
        assert!(err.to_string().contains("is not empty"));
        assert!(!tmp.path().join("site").exists());
    }

    #[test]
    fn ignores_hidden_entries() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();

        assert!(init_project(tmp.path()).is_ok());
    }

    #[test]
    fn refuses_non_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, "x").unwrap();

        let err = init_project(&file).unwrap_err();
        assert!(matches!(err, InitError::NotADirectory(_)));
        assert!(err.to_string().contains("is not a directory"));

        let err = init_project(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, InitError::NotADirectory(_)));
    }
}
