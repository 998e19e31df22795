//! Processed document model shared by every emitter.
//!
//! The scanner produces one [`ProcessedContent`] per source file: the parsed
//! body ([`Tree`]) paired with its metadata record ([`FileData`]). After
//! scanning the list is read-only; emitters that need a document which does
//! not exist on disk (a folder page with no `index.md`) build a synthetic one
//! with [`default_processed_content`].

use crate::path::{FilePath, FullSlug};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Parsed document body, lowered to an HTML fragment by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub html: String,
}

impl Tree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

/// Frontmatter with typed known fields.
///
/// Anything not recognized lands in [`extra`](Self::extra) so custom keys
/// survive a round trip without losing type checks on the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,
    /// Explorer ordering hint. Lower sorts first; absent sorts last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<f64>,
    /// Explorer display-label override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// `tags: foo` and `tags: [foo, bar]` are both accepted.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}

/// Metadata record for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    /// Page address. `None` when the source path could not be slugified;
    /// such documents are skipped by grouping and page emission.
    pub slug: Option<FullSlug>,
    /// Source path relative to the content root. `None` for synthetic documents.
    pub file_path: Option<FilePath>,
    pub frontmatter: Frontmatter,
    /// Plain-text rendering of the body, used for reading-time estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// First paragraph of plain text, used for page descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FileData {
    /// Frontmatter title, falling back to the last slug segment.
    pub fn title(&self) -> &str {
        self.frontmatter
            .title
            .as_deref()
            .or_else(|| self.slug.as_ref().map(FullSlug::file_name))
            .unwrap_or("")
    }
}

/// A parsed document: body tree plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedContent {
    pub tree: Tree,
    pub data: FileData,
}

impl ProcessedContent {
    pub fn new(tree: Tree, data: FileData) -> Self {
        Self { tree, data }
    }
}

/// Build a synthetic document with an empty body.
///
/// Downstream rendering cannot tell it apart from a scanned document except
/// that its tree is empty and it has no source path.
pub fn default_processed_content(slug: FullSlug, frontmatter: Frontmatter) -> ProcessedContent {
    ProcessedContent {
        tree: Tree::empty(),
        data: FileData {
            slug: Some(slug),
            file_path: None,
            frontmatter,
            text: None,
            description: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_known_and_extra_fields() {
        let fm: Frontmatter = serde_yaml::from_str(
            "title: Hello\ntoc: 2\nsidebar: Hi\ncolor: blue\ntags: [a, b]\n",
        )
        .unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.toc, Some(2.0));
        assert_eq!(fm.sidebar.as_deref(), Some("Hi"));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert_eq!(fm.extra.get("color"), Some(&serde_json::json!("blue")));
    }

    #[test]
    fn frontmatter_tags_accept_single_string() {
        let fm: Frontmatter = toml::from_str("tags = \"one, two\"").unwrap();
        assert_eq!(fm.tags, vec!["one", "two"]);
    }

    #[test]
    fn frontmatter_defaults_when_empty() {
        let fm: Frontmatter = toml::from_str("").unwrap();
        assert_eq!(fm, Frontmatter::default());
    }

    #[test]
    fn synthetic_content_is_empty() {
        let c = default_processed_content(FullSlug::new("a/index").unwrap(), Frontmatter::default());
        assert!(c.tree.is_empty());
        assert!(c.data.file_path.is_none());
        assert_eq!(c.data.slug.unwrap().as_str(), "a/index");
    }

    #[test]
    fn title_falls_back_to_slug() {
        let data = FileData {
            slug: Some(FullSlug::new("a/my-note").unwrap()),
            ..Default::default()
        };
        assert_eq!(data.title(), "my-note");
    }
}
