//! Page components.
//!
//! A component is a stateless rendering unit: it is constructed once with its
//! options (often closures, see [`explorer`]) and then asked to render once per
//! page with that page's [`ComponentProps`]. Components may also declare CSS and
//! scripts; the component-resources emitter bundles those for every component
//! the page emitters declare.
//!
//! Layouts hold components as [`ComponentRef`] (`Arc<dyn Component>`) so the
//! same instance can sit in several layouts and be rendered from several rayon
//! workers at once.

use crate::content::{FileData, ProcessedContent, Tree};
use crate::emitters::BuildCtx;
use crate::path::FullSlug;
use crate::resources::PageResources;
use maud::Markup;
use std::sync::Arc;

pub mod article;
pub mod breadcrumbs;
pub mod display;
pub mod explorer;
pub mod folder_content;
pub mod frame;
pub mod page_title;
pub mod spacer;

pub use article::{ArticleTitle, Content, ContentMeta};
pub use breadcrumbs::{Breadcrumbs, BreadcrumbOptions};
pub use display::{DesktopOnly, MobileOnly};
pub use explorer::{Explorer, ExplorerOptions, FileNode};
pub use folder_content::FolderContent;
pub use frame::{Body, Footer, Head, Header};
pub use page_title::PageTitle;
pub use spacer::Spacer;

pub type ComponentRef = Arc<dyn Component>;

/// Responsive visibility applied by the display wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayClass {
    MobileOnly,
    DesktopOnly,
}

impl DisplayClass {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayClass::MobileOnly => "mobile-only",
            DisplayClass::DesktopOnly => "desktop-only",
        }
    }
}

/// Join a component's own class with the display class it was wrapped in.
pub fn class_names(display: Option<DisplayClass>, class: &str) -> String {
    match display {
        Some(d) => format!("{} {}", d.as_str(), class),
        None => class.to_string(),
    }
}

/// Everything a component may read while rendering one page.
#[derive(Clone, Copy)]
pub struct ComponentProps<'a> {
    pub ctx: &'a BuildCtx,
    /// Slug of the page being rendered.
    pub slug: &'a FullSlug,
    pub file_data: &'a FileData,
    pub tree: &'a Tree,
    /// Every document in the build, for navigation and listings.
    pub all_files: &'a [ProcessedContent],
    pub resources: &'a PageResources,
    pub display_class: Option<DisplayClass>,
}

pub trait Component: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce markup. `children` is only meaningful for structural
    /// components (header, body) that wrap other components' output.
    fn render(&self, props: &ComponentProps<'_>, children: &[Markup]) -> Markup;

    fn css(&self) -> Option<&'static str> {
        None
    }

    fn before_dom_loaded(&self) -> Option<&'static str> {
        None
    }

    fn after_dom_loaded(&self) -> Option<&'static str> {
        None
    }

    /// Components wrapped by this one, so resource collection can see them.
    fn nested(&self) -> Vec<ComponentRef> {
        Vec::new()
    }
}

// Constructors used by layouts.

pub fn head() -> ComponentRef {
    Arc::new(Head)
}

pub fn header() -> ComponentRef {
    Arc::new(Header)
}

pub fn body() -> ComponentRef {
    Arc::new(Body)
}

pub fn footer(links: impl IntoIterator<Item = (String, String)>) -> ComponentRef {
    Arc::new(Footer::new(links))
}

pub fn page_title() -> ComponentRef {
    Arc::new(PageTitle)
}

pub fn spacer() -> ComponentRef {
    Arc::new(Spacer)
}

pub fn article_title() -> ComponentRef {
    Arc::new(ArticleTitle)
}

pub fn content_meta() -> ComponentRef {
    Arc::new(ContentMeta)
}

pub fn content() -> ComponentRef {
    Arc::new(Content)
}

pub fn folder_content() -> ComponentRef {
    Arc::new(FolderContent)
}

pub fn breadcrumbs(options: BreadcrumbOptions) -> ComponentRef {
    Arc::new(Breadcrumbs::new(options))
}

pub fn explorer(options: ExplorerOptions) -> ComponentRef {
    Arc::new(Explorer::new(options))
}

pub fn mobile_only(inner: ComponentRef) -> ComponentRef {
    Arc::new(MobileOnly::new(inner))
}

pub fn desktop_only(inner: ComponentRef) -> ComponentRef {
    Arc::new(DesktopOnly::new(inner))
}

/// Flatten components and everything they wrap, depth first, keeping the
/// first occurrence of each instance.
pub fn flatten_components(components: &[ComponentRef]) -> Vec<ComponentRef> {
    fn visit(component: &ComponentRef, out: &mut Vec<ComponentRef>) {
        if out.iter().any(|seen| Arc::ptr_eq(seen, component)) {
            return;
        }
        out.push(Arc::clone(component));
        for inner in component.nested() {
            visit(&inner, out);
        }
    }

    let mut out = Vec::new();
    for component in components {
        visit(component, &mut out);
    }
    out
}
