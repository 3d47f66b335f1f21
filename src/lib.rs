//! # folio
//!
//! A minimal static site generator. A project is three directories and an
//! optional config file:
//!
//! ```text
//! my-site/
//! ├── folio.toml          # Optional project config
//! ├── site/               # Source tree
//! │   ├── index.md        # → _site/index.html, rendered through a template
//! │   └── css/style.css   # → _site/css/style.css, copied byte for byte
//! ├── templates/          # Tera templates, named from front matter
//! │   └── root.html
//! └── _site/              # Output, mirrors site/
//! ```
//!
//! # Pipeline
//!
//! ```text
//! walk site/  →  classify by extension  →  write (copy | render)  →  errors
//! ```
//!
//! A build never stops at the first broken file. Each file that fails adds
//! one message to the returned list and the rest of the site is still
//! written; an empty list means the whole site was built.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Build orchestration: precondition checks, parallel dispatch, error collection |
//! | [`walk`] | Lazy traversal yielding the regular files of the source tree |
//! | [`entry`] | Extension-based classification and the copy/render handlers |
//! | [`front_matter`] | `+++`-fenced TOML header parsing |
//! | [`render`] | Markdown → HTML (pulldown-cmark) and Tera template rendering |
//! | [`config`] | `folio.toml` loading, merging with defaults, and validation |
//! | [`scaffold`] | Starter project written by `folio init` |
//! | [`output`] | CLI output formatting for build progress and results |
//!
//! # Pages
//!
//! A Markdown page opens with front matter naming its template:
//!
//! ```text
//! +++
//! template = "root.html"
//! title = "Tiny Dogs"
//! +++
//! # Tiny Dogs
//! ```
//!
//! The template sees every front matter key plus `content`, the body
//! rendered to HTML. A page without a `template` key is reported as an
//! error rather than silently copied.

pub mod config;
pub mod entry;
pub mod front_matter;
pub mod output;
pub mod render;
pub mod scaffold;
pub mod site;
pub mod walk;

pub use config::{SiteConfig, load_config};
pub use entry::{FileEntry, classify};
pub use site::{BuildEvent, build_site, build_site_at};

#[cfg(test)]
pub(crate) mod test_helpers;
