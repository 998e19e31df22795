use super::{Component, ComponentProps, class_names};
use crate::content::FileData;
use crate::i18n::translation;
use crate::path::{FullSlug, resolve_relative, simplify_slug};
use maud::{Markup, html};

const BREADCRUMBS_CSS: &str = include_str!("../../static/breadcrumbs.css");

#[derive(Debug, Clone)]
pub struct BreadcrumbOptions {
    /// Symbol placed between crumbs.
    pub spacer_symbol: String,
    /// Label of the first crumb. `None` uses the locale's "Home".
    pub root_name: Option<String>,
    /// Label folder crumbs with their index page title when one exists.
    pub resolve_frontmatter_title: bool,
    pub hide_on_root: bool,
    pub show_current_page: bool,
}

impl Default for BreadcrumbOptions {
    fn default() -> Self {
        Self {
            spacer_symbol: "❯".to_string(),
            root_name: None,
            resolve_frontmatter_title: true,
            hide_on_root: true,
            show_current_page: true,
        }
    }
}

struct Crumb {
    label: String,
    href: Option<String>,
}

pub struct Breadcrumbs {
    options: BreadcrumbOptions,
}

impl Breadcrumbs {
    pub fn new(options: BreadcrumbOptions) -> Self {
        Self { options }
    }

    fn folder_label(&self, folder: &str, segment: &str, all_files: &[&FileData]) -> String {
        if self.options.resolve_frontmatter_title {
            let titled = all_files.iter().find_map(|data| {
                let slug = data.slug.as_ref()?;
                (slug.is_index() && simplify_slug(slug).as_str() == folder)
                    .then(|| data.frontmatter.title.clone())
                    .flatten()
            });
            if let Some(title) = titled {
                return title;
            }
        }
        segment.to_string()
    }

    fn crumbs(&self, props: &ComponentProps<'_>) -> Vec<Crumb> {
        let current = props.slug;
        let t = translation(&props.ctx.cfg.locale);
        let all: Vec<&FileData> = props.all_files.iter().map(|c| &c.data).collect();

        let mut crumbs = vec![Crumb {
            label: self
                .options
                .root_name
                .clone()
                .unwrap_or_else(|| t.home.to_string()),
            href: Some(resolve_relative(current, &FullSlug::index()).into()),
        }];

        let segments: Vec<&str> = current.as_str().split('/').collect();
        let mut folder = String::new();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !folder.is_empty() {
                folder.push('/');
            }
            folder.push_str(segment);
            let href = FullSlug::new(&format!("{folder}/index"))
                .ok()
                .map(|target| resolve_relative(current, &target).into());
            crumbs.push(Crumb {
                label: self.folder_label(&folder, segment, &all),
                href,
            });
        }

        if self.options.show_current_page && !current.is_index() {
            crumbs.push(Crumb {
                label: props.file_data.title().to_string(),
                href: None,
            });
        }
        crumbs
    }
}

impl Component for Breadcrumbs {
    fn name(&self) -> &'static str {
        "Breadcrumbs"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        if self.options.hide_on_root && props.slug.as_str() == "index" {
            return html! {};
        }
        let crumbs = self.crumbs(props);
        let last = crumbs.len().saturating_sub(1);
        html! {
            nav class=(class_names(props.display_class, "breadcrumb-container")) aria-label="breadcrumbs" {
                @for (i, crumb) in crumbs.iter().enumerate() {
                    div.breadcrumb-element {
                        @match &crumb.href {
                            Some(href) => {
                                a href=(href) { (crumb.label) }
                            }
                            None => {
                                span { (crumb.label) }
                            }
                        }
                        @if i < last {
                            p { " " (self.options.spacer_symbol) " " }
                        }
                    }
                }
            }
        }
    }

    fn css(&self) -> Option<&'static str> {
        Some(BREADCRUMBS_CSS)
    }
}
