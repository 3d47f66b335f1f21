//! Front matter extraction.
//!
//! A page may open with a block of TOML fenced by `+++` lines:
//!
//! ```text
//! +++
//! template = "root.html"
//! title = "Tiny Dogs"
//! +++
//! # Tiny Dogs
//!
//! The body starts here.
//! ```
//!
//! The fence must be the first line of the file (a UTF-8 BOM before it is
//! tolerated). The header is a flat mapping: strings are kept verbatim,
//! numbers, booleans and datetimes are converted to their TOML text, and
//! arrays or tables are rejected.
//!
//! A file without an opening fence has empty front matter and its whole text
//! is the body. Whether a particular key is required is the caller's
//! business, not the parser's.

use std::collections::BTreeMap;
use thiserror::Error;

const FENCE: &str = "+++";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter is not closed by a `+++` line")]
    Unterminated,
    #[error("malformed front matter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("front matter key `{key}` must be a string, number, boolean or date")]
    NotFlat { key: String },
}

/// Flat key → string mapping parsed from a page header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter(BTreeMap<String, String>);

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Split `text` into its front matter and the remaining body.
///
/// The returned body borrows from `text` and starts right after the closing
/// fence line.
pub fn parse(text: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(after_open) = strip_fence_line(text) else {
        return Ok((FrontMatter::default(), text));
    };

    let mut offset = 0;
    while offset < after_open.len() {
        let rest = &after_open[offset..];
        let line_len = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        let line = &rest[..line_len];
        if is_fence(line) {
            let header = &after_open[..offset];
            let body = &after_open[offset + line_len..];
            return Ok((decode(header)?, body));
        }
        offset += line_len;
    }

    Err(FrontMatterError::Unterminated)
}

/// If `text` starts with a fence line, return what follows it.
fn strip_fence_line(text: &str) -> Option<&str> {
    let line_len = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
    is_fence(&text[..line_len]).then(|| &text[line_len..])
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).trim_end() == FENCE
}

fn decode(header: &str) -> Result<FrontMatter, FrontMatterError> {
    let table: toml::Table = toml::from_str(header)?;
    table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(FrontMatterError::NotFlat { key });
                }
            };
            Ok((key, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_returns_body() {
        let text = "+++\ntemplate = \"root.html\"\ntitle = \"Tiny Dogs\"\n+++\n# Hello\n\nBody.\n";
        let (fm, body) = parse(text).unwrap();
        assert_eq!(fm.get("template"), Some("root.html"));
        assert_eq!(fm.get("title"), Some("Tiny Dogs"));
        assert_eq!(body, "# Hello\n\nBody.\n");
    }

    #[test]
    fn no_header_means_empty_front_matter() {
        let text = "# Just markdown\n\n+++ not a fence at the top\n";
        let (fm, body) = parse(text).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn empty_header_is_allowed() {
        let (fm, body) = parse("+++\n+++\nbody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn header_at_end_of_file_has_empty_body() {
        let (fm, body) = parse("+++\ntemplate = \"a.html\"\n+++").unwrap();
        assert_eq!(fm.get("template"), Some("a.html"));
        assert_eq!(body, "");
    }

    #[test]
    fn tolerates_crlf_and_bom() {
        let text = "\u{feff}+++\r\ntemplate = \"root.html\"\r\n+++\r\nbody\r\n";
        let (fm, body) = parse(text).unwrap();
        assert_eq!(fm.get("template"), Some("root.html"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn body_keeps_later_fences() {
        let text = "+++\ntemplate = \"t.html\"\n+++\nabove\n+++\nbelow\n";
        let (_, body) = parse(text).unwrap();
        assert_eq!(body, "above\n+++\nbelow\n");
    }

    #[test]
    fn scalar_values_become_strings() {
        let text = "+++\ndraft = true\nweight = 3\nratio = 1.5\ndate = 2024-05-01\n+++\n";
        let (fm, _) = parse(text).unwrap();
        assert_eq!(fm.get("draft"), Some("true"));
        assert_eq!(fm.get("weight"), Some("3"));
        assert_eq!(fm.get("ratio"), Some("1.5"));
        assert_eq!(fm.get("date"), Some("2024-05-01"));
    }

    #[test]
    fn unterminated_header_is_error() {
        let result = parse("+++\ntemplate = \"root.html\"\n# body\n");
        assert!(matches!(result, Err(FrontMatterError::Unterminated)));
    }

    #[test]
    fn malformed_toml_is_error() {
        let result = parse("+++\ntemplate = root.html\n+++\n");
        assert!(matches!(result, Err(FrontMatterError::Toml(_))));
    }

    #[test]
    fn nested_values_are_rejected() {
        let result = parse("+++\ntags = [\"a\", \"b\"]\n+++\n");
        match result {
            Err(FrontMatterError::NotFlat { key }) => assert_eq!(key, "tags"),
            other => panic!("expected NotFlat, got {other:?}"),
        }
    }
}
