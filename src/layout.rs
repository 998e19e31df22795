//! Page layouts: which components go in which slot.
//!
//! A page is assembled from a [`SharedLayout`] (slots every page has), a
//! per-kind [`PageLayout`] (content pages, list pages) and the page body
//! component the emitter supplies. Callers may override any slot with a
//! [`PartialLayout`]. Composition is a pure merge; nothing renders here.
//!
//! Slot order on the page, and therefore in [`FullPageLayout::components`]:
//!
//! ```text
//! head, header frame, body frame, header.., before_body.., page_body, left.., right.., footer
//! ```

use crate::components::{self, ComponentRef, flatten_components};
use std::sync::Arc;

#[derive(Clone)]
pub struct SharedLayout {
    pub head: ComponentRef,
    pub header: Vec<ComponentRef>,
    pub footer: ComponentRef,
}

#[derive(Clone, Default)]
pub struct PageLayout {
    pub before_body: Vec<ComponentRef>,
    pub left: Vec<ComponentRef>,
    pub right: Vec<ComponentRef>,
}

/// Slot overrides. `None` keeps the composed value.
#[derive(Clone, Default)]
pub struct PartialLayout {
    pub head: Option<ComponentRef>,
    pub header: Option<Vec<ComponentRef>>,
    pub before_body: Option<Vec<ComponentRef>>,
    pub page_body: Option<ComponentRef>,
    pub left: Option<Vec<ComponentRef>>,
    pub right: Option<Vec<ComponentRef>>,
    pub footer: Option<ComponentRef>,
}

#[derive(Clone)]
pub struct FullPageLayout {
    pub head: ComponentRef,
    pub header: Vec<ComponentRef>,
    pub before_body: Vec<ComponentRef>,
    pub page_body: ComponentRef,
    pub left: Vec<ComponentRef>,
    pub right: Vec<ComponentRef>,
    pub footer: ComponentRef,
}

impl FullPageLayout {
    /// Merge shared slots, per-kind slots and the page body; `overrides` wins per slot.
    pub fn compose(
        shared: &SharedLayout,
        kind: &PageLayout,
        page_body: ComponentRef,
        overrides: &PartialLayout,
    ) -> Self {
        let PartialLayout {
            head,
            header,
            before_body,
            page_body: body_override,
            left,
            right,
            footer,
        } = overrides.clone();

        Self {
            head: head.unwrap_or_else(|| Arc::clone(&shared.head)),
            header: header.unwrap_or_else(|| shared.header.clone()),
            before_body: before_body.unwrap_or_else(|| kind.before_body.clone()),
            page_body: body_override.unwrap_or(page_body),
            left: left.unwrap_or_else(|| kind.left.clone()),
            right: right.unwrap_or_else(|| kind.right.clone()),
            footer: footer.unwrap_or_else(|| Arc::clone(&shared.footer)),
        }
    }

    /// Every component a page built from this layout uses, in page order.
    ///
    /// `header_frame` and `body_frame` are the structural wrappers the
    /// renderer places the slots into. Wrapped components follow their
    /// wrapper; an instance used twice keeps its first position.
    pub fn components(
        &self,
        header_frame: &ComponentRef,
        body_frame: &ComponentRef,
    ) -> Vec<ComponentRef> {
        let mut ordered = vec![
            Arc::clone(&self.head),
            Arc::clone(header_frame),
            Arc::clone(body_frame),
        ];
        ordered.extend(self.header.iter().cloned());
        ordered.extend(self.before_body.iter().cloned());
        ordered.push(Arc::clone(&self.page_body));
        ordered.extend(self.left.iter().cloned());
        ordered.extend(self.right.iter().cloned());
        ordered.push(Arc::clone(&self.footer));
        flatten_components(&ordered)
    }
}

/// Structural frames shared by every page emitter.
#[derive(Clone)]
pub struct Frames {
    pub header: ComponentRef,
    pub body: ComponentRef,
}

impl Default for Frames {
    fn default() -> Self {
        Self {
            header: components::header(),
            body: components::body(),
        }
    }
}

/// Project default layouts and explorer hooks.
pub mod defaults {
    use super::{PageLayout, SharedLayout};
    use crate::components::{self, BreadcrumbOptions, ComponentRef, ExplorerOptions, FileNode};
    use crate::config::SiteConfig;
    use std::cmp::Ordering;

    /// Order by the `toc` frontmatter value, ascending; nodes without one sort last.
    pub fn toc_sort(a: &FileNode<'_>, b: &FileNode<'_>) -> Ordering {
        let key = |node: &FileNode<'_>| {
            node.file
                .and_then(|f| f.frontmatter.toc)
                .unwrap_or(f64::INFINITY)
        };
        key(a).total_cmp(&key(b))
    }

    /// Hide nodes whose name is one of the reserved folder names.
    pub fn hide_reserved(
        reserved: Vec<String>,
    ) -> impl Fn(&FileNode<'_>) -> bool + Send + Sync + 'static {
        move |node| !reserved.iter().any(|r| *r == node.name)
    }

    /// Use the `sidebar` frontmatter value as the node label when present.
    pub fn sidebar_label(node: &mut FileNode<'_>) {
        if let Some(label) = node.file.and_then(|f| f.frontmatter.sidebar.as_deref()) {
            node.display_name = label.to_string();
        }
    }

    pub fn explorer_options(cfg: &SiteConfig) -> ExplorerOptions {
        ExplorerOptions::default()
            .with_sort(toc_sort)
            .with_filter(hide_reserved(cfg.reserved_folders.clone()))
            .with_map(sidebar_label)
    }

    pub fn shared_page_components(cfg: &SiteConfig) -> SharedLayout {
        SharedLayout {
            head: components::head(),
            header: Vec::new(),
            footer: components::footer(cfg.footer.links.clone()),
        }
    }

    fn left_sidebar(cfg: &SiteConfig) -> Vec<ComponentRef> {
        vec![
            components::page_title(),
            components::mobile_only(components::spacer()),
            components::desktop_only(components::explorer(explorer_options(cfg))),
        ]
    }

    fn article_header() -> Vec<ComponentRef> {
        vec![
            components::breadcrumbs(BreadcrumbOptions::default()),
            components::article_title(),
            components::content_meta(),
        ]
    }

    /// Layout for a single document page.
    pub fn default_content_page_layout(cfg: &SiteConfig) -> PageLayout {
        PageLayout {
            before_body: article_header(),
            left: left_sidebar(cfg),
            right: Vec::new(),
        }
    }

    /// Layout for listing pages (folder pages).
    pub fn default_list_page_layout(cfg: &SiteConfig) -> PageLayout {
        PageLayout {
            before_body: article_header(),
            left: left_sidebar(cfg),
            right: Vec::new(),
        }
    }
}
