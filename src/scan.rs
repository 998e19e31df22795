//! Content scanning.
//!
//! Stage 1 of the build. Walks the content directory, parses every markdown
//! file into a [`ProcessedContent`] and returns the list sorted by source
//! path. Nothing downstream touches the content directory again except the
//! build cache, which hashes the same files.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml            # Site configuration (optional, not content)
//! ├── index.md               # Root page → index.html
//! ├── notes/
//! │   ├── index.md           # Describes the notes/ folder page (optional)
//! │   ├── first note.md      # → notes/first-note.html
//! │   └── drafts/
//! │       └── idea.md        # draft: true → skipped
//! └── private/               # Listed in ignore_patterns → skipped
//! ```
//!
//! ## Frontmatter
//!
//! A file may open with YAML between `---` fences or TOML between `+++`
//! fences. Frontmatter that fails to parse is reported as a warning and the
//! file is kept with empty frontmatter, so one typo never fails a build.
//!
//! Files marked `draft: true` are dropped here and counted in
//! [`ScanOutput::drafts`].

use crate::config::SiteConfig;
use crate::content::{FileData, Frontmatter, ProcessedContent, Tree};
use crate::path::{FilePath, PathError, slugify_file_path};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid source path: {0}")]
    Path(#[from] PathError),
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),
}

/// A recoverable problem with one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Parsed documents, sorted by source path.
    pub content: Vec<ProcessedContent>,
    pub drafts: usize,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontmatterFormat {
    Yaml,
    Toml,
}

/// Split a leading frontmatter block from the body.
///
/// The opening fence must be the first line and the closing fence must sit
/// on a line of its own. Without both, the whole text is body.
fn split_frontmatter(raw: &str) -> (Option<(FrontmatterFormat, &str)>, &str) {
    let (format, fence) = if raw.starts_with("---") {
        (FrontmatterFormat::Yaml, "---")
    } else if raw.starts_with("+++") {
        (FrontmatterFormat::Toml, "+++")
    } else {
        return (None, raw);
    };

    let Some(first_newline) = raw.find('\n') else {
        return (None, raw);
    };
    if raw[..first_newline].trim_end() != fence {
        return (None, raw);
    }

    let rest = &raw[first_newline + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some((format, block)), body);
        }
        offset += line.len();
    }
    (None, raw)
}

fn parse_frontmatter(format: FrontmatterFormat, block: &str) -> Result<Frontmatter, String> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    match format {
        FrontmatterFormat::Yaml => serde_yaml::from_str(block).map_err(|e| e.to_string()),
        FrontmatterFormat::Toml => toml::from_str(block).map_err(|e| e.to_string()),
    }
}

/// Rendered markdown plus the plain-text views derived from it.
struct Lowered {
    html: String,
    text: String,
    description: Option<String>,
}

fn lower_markdown(body: &str) -> Lowered {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let events: Vec<Event<'_>> = Parser::new_ext(body, options).collect();

    let mut text = String::new();
    let mut first_paragraph: Option<String> = None;
    let mut in_paragraph = false;
    let mut paragraph = String::new();

    for event in &events {
        match event {
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
                paragraph.clear();
            }
            Event::End(TagEnd::Paragraph) => {
                in_paragraph = false;
                if first_paragraph.is_none() && !paragraph.trim().is_empty() {
                    first_paragraph = Some(paragraph.trim().to_string());
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
                text.push_str(t);
                if in_paragraph {
                    paragraph.push_str(t);
                }
            }
            Event::SoftBreak | Event::HardBreak if in_paragraph => paragraph.push(' '),
            _ => {}
        }
    }

    let mut html = String::new();
    md_html::push_html(&mut html, events.into_iter());
    Lowered {
        html,
        text,
        description: first_paragraph,
    }
}

/// Parse one markdown source. `file_path` is relative to the content root.
pub fn parse_document(file_path: FilePath, raw: &str) -> (ProcessedContent, Vec<ScanWarning>) {
    let mut warnings = Vec::new();
    let normalized = raw.replace("\r\n", "\n");

    let (block, body) = split_frontmatter(&normalized);
    let frontmatter = match block {
        Some((format, block)) => parse_frontmatter(format, block).unwrap_or_else(|message| {
            warnings.push(ScanWarning {
                path: file_path.to_string(),
                message: format!("invalid frontmatter: {message}"),
            });
            Frontmatter::default()
        }),
        None => Frontmatter::default(),
    };

    let slug = match slugify_file_path(&file_path) {
        Ok(slug) => Some(slug),
        Err(e) => {
            warnings.push(ScanWarning {
                path: file_path.to_string(),
                message: e.to_string(),
            });
            None
        }
    };

    let lowered = lower_markdown(body);
    let doc = ProcessedContent::new(
        Tree { html: lowered.html },
        FileData {
            slug,
            file_path: Some(file_path),
            frontmatter,
            text: Some(lowered.text),
            description: lowered.description,
        },
    );
    (doc, warnings)
}

fn is_ignored(entry: &DirEntry, cfg: &SiteConfig) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    cfg.ignore_patterns.iter().any(|p| *p == name)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Scan a content directory.
pub fn scan(root: &Path, cfg: &SiteConfig) -> Result<ScanOutput, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let mut output = ScanOutput::default();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e, cfg));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| ScanError::MissingRoot(entry.path().to_path_buf()))?;
        let file_path = FilePath::from_path(rel)?;
        let raw = fs::read_to_string(entry.path())?;

        let (doc, warnings) = parse_document(file_path, &raw);
        output.warnings.extend(warnings);
        if doc.data.frontmatter.draft {
            output.drafts += 1;
            continue;
        }
        output.content.push(doc);
    }

    output
        .content
        .sort_by(|a, b| a.data.file_path.cmp(&b.data.file_path));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn fp(s: &str) -> FilePath {
        FilePath::new(s).unwrap()
    }

    #[test]
    fn yaml_frontmatter_is_split_and_parsed() {
        let (doc, warnings) = parse_document(
            fp("a/note.md"),
            "---\ntitle: Hello\ntags: [x, y]\n---\n# Heading\n\nFirst para.\n",
        );
        assert!(warnings.is_empty());
        assert_eq!(doc.data.frontmatter.title.as_deref(), Some("Hello"));
        assert_eq!(doc.data.frontmatter.tags, vec!["x", "y"]);
        assert!(doc.tree.html.contains("<h1>Heading</h1>"));
        assert_eq!(doc.data.description.as_deref(), Some("First para."));
        assert_eq!(doc.data.slug.unwrap().as_str(), "a/note");
    }

    #[test]
    fn toml_frontmatter_is_parsed() {
        let (doc, _) = parse_document(fp("n.md"), "+++\ntitle = \"T\"\ntoc = 2\n+++\nbody\n");
        assert_eq!(doc.data.frontmatter.title.as_deref(), Some("T"));
        assert_eq!(doc.data.frontmatter.toc, Some(2.0));
    }

    #[test]
    fn crlf_sources_are_normalized() {
        let (doc, _) = parse_document(fp("n.md"), "---\r\ntitle: Win\r\n---\r\nbody\r\n");
        assert_eq!(doc.data.frontmatter.title.as_deref(), Some("Win"));
    }

    #[test]
    fn unclosed_fence_is_body() {
        let (doc, _) = parse_document(fp("n.md"), "---\ntitle: x\nno closing fence\n");
        assert_eq!(doc.data.frontmatter, Frontmatter::default());
        assert!(doc.data.text.unwrap().contains("no closing fence"));
    }

    #[test]
    fn bad_frontmatter_warns_and_keeps_document() {
        let (doc, warnings) = parse_document(fp("bad.md"), "---\ntitle: [unclosed\n---\nbody\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "bad.md");
        assert_eq!(doc.data.frontmatter, Frontmatter::default());
        assert!(doc.data.slug.is_some());
    }

    #[test]
    fn plain_text_collects_words() {
        let (doc, _) = parse_document(fp("n.md"), "Some *emphasis* and `code`.\n\n- item\n");
        let text = doc.data.text.unwrap();
        assert!(text.contains("emphasis"));
        assert!(text.contains("code"));
        assert!(text.contains("item"));
    }

    #[test]
    fn scan_walks_sorted_and_skips_ignored_and_drafts() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.md", "# Home");
        write(tmp.path(), "b/two.md", "two");
        write(tmp.path(), "a/one.md", "one");
        write(tmp.path(), "a/wip.md", "---\ndraft: true\n---\nwip");
        write(tmp.path(), "private/secret.md", "secret");
        write(tmp.path(), "a/image.png", "not markdown");
        write(tmp.path(), "config.toml", "page_title = \"x\"");

        let out = scan(tmp.path(), &SiteConfig::default()).unwrap();
        let paths: Vec<_> = out
            .content
            .iter()
            .map(|c| c.data.file_path.as_ref().unwrap().as_str())
            .collect();
        assert_eq!(paths, vec!["a/one.md", "b/two.md", "index.md"]);
        assert_eq!(out.drafts, 1);
    }

    #[test]
    fn scan_slugifies_names() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "My Notes/first note.md", "x");
        let out = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(
            out.content[0].data.slug.as_ref().unwrap().as_str(),
            "My-Notes/first-note"
        );
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &SiteConfig::default());
        assert!(matches!(result, Err(ScanError::MissingRoot(_))));
    }
}
