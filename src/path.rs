//! Path and slug value types.
//!
//! Every document is addressed three ways:
//!
//! | Type | Example | Meaning |
//! |------|---------|---------|
//! | [`FilePath`] | `notes/a b.md` | where the source lives, relative to the content root |
//! | [`FullSlug`] | `notes/a-b`, `notes/index` | extension-stripped address of the output page |
//! | [`SimpleSlug`] | `notes` | normalized grouping key, never ends in `index` |
//! | [`RelativeSlug`] | `../notes/` | a link from one page to another |
//!
//! Output paths produced by emitters are also [`FilePath`]s, relative to the
//! output directory (`notes/index.html`). That lets the dependency graph use a
//! single key type for both sides of an edge.
//!
//! The types are thin wrappers around `String`. Construction validates,
//! after which the value is opaque: equality, ordering and hashing are plain
//! string comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("path escapes its root: {0}")]
    Escapes(String),
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
}

/// Root sentinel returned by [`simplify_slug`] for `index` and empty slugs.
///
/// Contains only a separator, so it can never collide with a folder key
/// (folder keys are slash-stripped and non-empty).
pub const ROOT_SLUG: &str = "/";

/// A normalized, `/`-separated path relative to some root directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilePath(String);

impl FilePath {
    /// Normalize and validate a path string.
    ///
    /// Backslashes become `/`, `.` segments and repeated separators are
    /// dropped, leading separators are stripped. `..` segments are rejected.
    pub fn new(raw: &str) -> Result<Self, PathError> {
        let unified = raw.replace('\\', "/");
        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(PathError::Escapes(raw.to_string())),
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    /// Build from a filesystem path relative to its root.
    pub fn from_path(path: &Path) -> Result<Self, PathError> {
        Self::new(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension including the dot (`.md`), if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        name.rfind('.').filter(|&i| i > 0).map(|i| &name[i..])
    }
}

impl TryFrom<String> for FilePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Extension-stripped page address. May end in `/index`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullSlug(String);

impl FullSlug {
    pub fn new(raw: &str) -> Result<Self, PathError> {
        let invalid = raw.is_empty()
            || raw.starts_with('/')
            || raw.ends_with('/')
            || raw.ends_with(".md")
            || raw.split('/').any(|s| s.is_empty() || s == "." || s == "..");
        if invalid {
            return Err(PathError::InvalidSlug(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// The root page slug, `index`.
    pub fn index() -> Self {
        Self("index".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this slug addresses a folder's landing page (`index` or `*/index`).
    pub fn is_index(&self) -> bool {
        self.0 == "index" || self.0.ends_with("/index")
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for FullSlug {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Normalized grouping key: no trailing `index`, no leading/trailing separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SimpleSlug(String);

impl SimpleSlug {
    pub fn root() -> Self {
        Self(ROOT_SLUG.to_string())
    }

    /// Wrap a folder key taken from a slug's parent directory.
    ///
    /// Parent directories of a valid [`FullSlug`] are already slash-free at
    /// both ends, so no further normalization is needed.
    pub(crate) fn from_folder(folder: &str) -> Self {
        Self(folder.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_SLUG
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A link from one page to another (`.`, `..`, `../a/b`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelativeSlug(String);

impl RelativeSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_string_like {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> String {
                    value.0
                }
            }
        )*
    };
}

impl_string_like!(FilePath, FullSlug, SimpleSlug, RelativeSlug);

/// Remove leading and trailing separators. Idempotent.
pub fn strip_slashes(s: &str) -> &str {
    s.trim_matches('/')
}

/// Join path segments with single separators.
///
/// Empty parts and repeated separators collapse; the result never starts or
/// ends with `/`.
pub fn join_segments(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|p| p.split('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn simplify_str(s: &str) -> String {
    let mut current = strip_slashes(s);
    loop {
        let next = if current == "index" {
            ""
        } else if let Some(prefix) = current.strip_suffix("/index") {
            prefix
        } else {
            break;
        };
        current = strip_slashes(next);
    }
    if current.is_empty() {
        ROOT_SLUG.to_string()
    } else {
        current.to_string()
    }
}

/// Map a page slug to its grouping key.
///
/// `a/b/index` → `a/b`, `a/note` → `a/note`, `index` → [`ROOT_SLUG`].
pub fn simplify_slug(slug: &FullSlug) -> SimpleSlug {
    SimpleSlug(simplify_str(slug.as_str()))
}

/// Parent directory of a slug; `None` for root-level documents.
pub fn folder_of(slug: &FullSlug) -> Option<&str> {
    slug.as_str().rsplit_once('/').map(|(parent, _)| parent)
}

/// Relative prefix from a page back to the site root.
///
/// One `..` per separator in the slug: `a/b/note` → `../..`, `note` → `.`.
pub fn path_to_root(slug: &FullSlug) -> RelativeSlug {
    let depth = slug.as_str().matches('/').count();
    if depth == 0 {
        RelativeSlug(".".to_string())
    } else {
        RelativeSlug(vec![".."; depth].join("/"))
    }
}

/// Link from `current` to `target`, extensionless.
///
/// Folder landing pages get a trailing `/` so browsers resolve their
/// relative links against the folder.
pub fn resolve_relative(current: &FullSlug, target: &FullSlug) -> RelativeSlug {
    let root = path_to_root(current);
    let simple = simplify_slug(target);
    let mut href = if simple.is_root() {
        root.0
    } else {
        join_segments(&[root.as_str(), simple.as_str()])
    };
    if target.is_index() {
        href.push('/');
    }
    RelativeSlug(href)
}

/// Derive a page slug from a source path.
///
/// `.md` and `.html` extensions are dropped, other extensions are kept.
/// Within each segment whitespace becomes `-`, `&` becomes `-and-`, `%`
/// becomes `-percent`, and `?`/`#` are removed. A trailing `_index` is
/// treated as `index`.
pub fn slugify_file_path(fp: &FilePath) -> Result<FullSlug, PathError> {
    let raw = fp.as_str();
    let (stem, keep_ext) = match fp.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(".md") || ext.eq_ignore_ascii_case(".html") => {
            (&raw[..raw.len() - ext.len()], "")
        }
        Some(ext) => (&raw[..raw.len() - ext.len()], ext),
        None => (raw, ""),
    };

    let mut slug = stem
        .split('/')
        .map(|segment| {
            segment
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .replace('&', "-and-")
                .replace('%', "-percent")
                .replace(['?', '#'], "")
        })
        .collect::<Vec<_>>()
        .join("/");

    if slug == "_index" {
        slug = "index".to_string();
    } else if let Some(prefix) = slug.strip_suffix("/_index") {
        slug = format!("{prefix}/index");
    }

    slug.push_str(keep_ext);
    FullSlug::new(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> FullSlug {
        FullSlug::new(s).unwrap()
    }

    #[test]
    fn file_path_normalizes_separators() {
        let fp = FilePath::new("./notes//a\\b.md").unwrap();
        assert_eq!(fp.as_str(), "notes/a/b.md");
    }

    #[test]
    fn file_path_rejects_parent_segments() {
        assert!(matches!(
            FilePath::new("notes/../../etc"),
            Err(PathError::Escapes(_))
        ));
        assert_eq!(FilePath::new("./"), Err(PathError::Empty));
    }

    #[test]
    fn file_path_extension() {
        assert_eq!(FilePath::new("a/b.md").unwrap().extension(), Some(".md"));
        assert_eq!(FilePath::new("a.d/b").unwrap().extension(), None);
        assert_eq!(FilePath::new("a/.hidden").unwrap().extension(), None);
    }

    #[test]
    fn full_slug_validation() {
        assert!(FullSlug::new("a/b").is_ok());
        assert!(FullSlug::new("").is_err());
        assert!(FullSlug::new("/a").is_err());
        assert!(FullSlug::new("a/").is_err());
        assert!(FullSlug::new("a//b").is_err());
        assert!(FullSlug::new("a/../b").is_err());
        assert!(FullSlug::new("a/b.md").is_err());
    }

    #[test]
    fn full_slug_deserialize_validates() {
        let ok: FullSlug = serde_json::from_str("\"a/index\"").unwrap();
        assert!(ok.is_index());
        assert!(serde_json::from_str::<FullSlug>("\"/bad/\"").is_err());
    }

    #[test]
    fn simplify_strips_index() {
        assert_eq!(simplify_slug(&slug("a/b/index")).as_str(), "a/b");
        assert_eq!(simplify_slug(&slug("a/note")).as_str(), "a/note");
        assert_eq!(simplify_slug(&slug("a/myindex")).as_str(), "a/myindex");
    }

    #[test]
    fn simplify_root_is_sentinel() {
        assert!(simplify_slug(&FullSlug::index()).is_root());
        assert_eq!(simplify_str(""), ROOT_SLUG);
        assert_eq!(simplify_str("/"), ROOT_SLUG);
    }

    #[test]
    fn simplify_is_idempotent() {
        for s in ["a/index/index", "index", "a/b", "a/b/index", "", "/", "x/index/"] {
            let once = simplify_str(s);
            assert_eq!(simplify_str(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn strip_slashes_is_idempotent() {
        assert_eq!(strip_slashes("//a/b//"), "a/b");
        assert_eq!(strip_slashes(strip_slashes("/a/")), "a");
        assert_eq!(strip_slashes("/"), "");
    }

    #[test]
    fn join_collapses_separators() {
        assert_eq!(join_segments(&["a/", "/b", "index.html"]), "a/b/index.html");
        assert_eq!(join_segments(&["", "a", ""]), "a");
        assert_eq!(join_segments(&["/a//b/"]), "a/b");
    }

    #[test]
    fn path_to_root_counts_separators() {
        assert_eq!(path_to_root(&slug("index")).as_str(), ".");
        assert_eq!(path_to_root(&slug("a/index")).as_str(), "..");
        assert_eq!(path_to_root(&slug("a/b/note")).as_str(), "../..");
    }

    #[test]
    fn folder_of_parent() {
        assert_eq!(folder_of(&slug("a/b/note")), Some("a/b"));
        assert_eq!(folder_of(&slug("note")), None);
    }

    #[test]
    fn resolve_relative_links() {
        assert_eq!(
            resolve_relative(&slug("a/note"), &slug("b/other")).as_str(),
            "../b/other"
        );
        assert_eq!(
            resolve_relative(&slug("index"), &slug("a/index")).as_str(),
            "./a/"
        );
        assert_eq!(resolve_relative(&slug("a/b/c"), &slug("index")).as_str(), "../../");
        assert_eq!(resolve_relative(&slug("note"), &slug("other")).as_str(), "./other");
    }

    #[test]
    fn slugify_strips_markdown_extension() {
        let fp = FilePath::new("a/note1.md").unwrap();
        assert_eq!(slugify_file_path(&fp).unwrap().as_str(), "a/note1");
    }

    #[test]
    fn slugify_rewrites_special_characters() {
        let fp = FilePath::new("Q&A/100% done? #1.md").unwrap();
        assert_eq!(
            slugify_file_path(&fp).unwrap().as_str(),
            "Q-and-A/100-percent-done-1"
        );
    }

    #[test]
    fn slugify_treats_underscore_index_as_index() {
        let fp = FilePath::new("a/_index.md").unwrap();
        assert_eq!(slugify_file_path(&fp).unwrap().as_str(), "a/index");
    }

    #[test]
    fn slugify_keeps_other_extensions() {
        let fp = FilePath::new("img/photo.png").unwrap();
        assert_eq!(slugify_file_path(&fp).unwrap().as_str(), "img/photo.png");
    }
}
