//! Shared test utilities for the sitefold test suite.
//!
//! Provides document constructors and a fixture that owns everything a
//! [`ComponentProps`] borrows, so component tests stay one-liners.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fixture = PropsFixture::new(vec![
//!     doc("a/index", "a/index.md", "All About A"),
//!     doc("a/note", "a/note.md", "Note"),
//! ]);
//! let html = PageTitle.render(&fixture.props("a/note"), &[]).into_string();
//! ```

use crate::components::ComponentProps;
use crate::config::SiteConfig;
use crate::content::{
    FileData, Frontmatter, ProcessedContent, Tree, default_processed_content,
};
use crate::emitters::BuildCtx;
use crate::path::{FilePath, FullSlug, path_to_root};
use crate::resources::{PageResources, StaticResources, page_resources};
use std::collections::BTreeMap;

// =========================================================================
// Documents
// =========================================================================

/// A scanned document with a frontmatter title and an empty body.
pub fn doc(slug: &str, file_path: &str, title: &str) -> ProcessedContent {
    ProcessedContent::new(
        Tree::empty(),
        FileData {
            slug: Some(FullSlug::new(slug).unwrap()),
            file_path: Some(FilePath::new(file_path).unwrap()),
            frontmatter: Frontmatter {
                title: Some(title.to_string()),
                ..Default::default()
            },
            text: None,
            description: None,
        },
    )
}

/// A synthetic document, as a folder placeholder would be.
pub fn synthetic(slug: &str, title: &str) -> ProcessedContent {
    default_processed_content(
        FullSlug::new(slug).unwrap(),
        Frontmatter {
            title: Some(title.to_string()),
            ..Default::default()
        },
    )
}

/// A root-level document named `name` with an explorer ordering hint.
pub fn doc_with_toc(name: &str, toc: Option<f64>) -> ProcessedContent {
    let mut d = doc(name, &format!("{name}.md"), name);
    d.data.frontmatter.toc = toc;
    d
}

// =========================================================================
// Component props
// =========================================================================

/// Owns a content list plus build context and resolves props per page.
pub struct PropsFixture {
    pub ctx: BuildCtx,
    pub content: Vec<ProcessedContent>,
    resources: BTreeMap<FullSlug, PageResources>,
}

impl PropsFixture {
    /// Fixture over `content` with the default config ("Notes", en-US).
    pub fn new(content: Vec<ProcessedContent>) -> Self {
        let bundled = StaticResources::bundled();
        let resources = content
            .iter()
            .filter_map(|c| c.data.slug.clone())
            .map(|slug| {
                let res = page_resources(&path_to_root(&slug), &bundled);
                (slug, res)
            })
            .collect();
        Self {
            ctx: BuildCtx::new(SiteConfig::default()),
            content,
            resources,
        }
    }

    /// Props for rendering the document at `slug`.
    ///
    /// Panics when no document in the fixture has that slug.
    pub fn props(&self, slug: &str) -> ComponentProps<'_> {
        let doc = self
            .content
            .iter()
            .find(|c| c.data.slug.as_ref().is_some_and(|s| s.as_str() == slug))
            .unwrap_or_else(|| panic!("no document with slug {slug}"));
        let slug = doc.data.slug.as_ref().unwrap();
        ComponentProps {
            ctx: &self.ctx,
            slug,
            file_data: &doc.data,
            tree: &doc.tree,
            all_files: &self.content,
            resources: &self.resources[slug],
            display_class: None,
        }
    }
}
