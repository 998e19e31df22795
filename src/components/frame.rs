//! Structural components every page carries: document head, header band,
//! page body wrapper and footer.

use super::{Component, ComponentProps};
use crate::i18n::translation;
use crate::path::simplify_slug;
use crate::resources::LoadTime;
use maud::{Markup, html};

const BASE_CSS: &str = include_str!("../../static/base.css");
const THEME_JS: &str = include_str!("../../static/theme.js");

pub struct Head;

impl Component for Head {
    fn name(&self) -> &'static str {
        "Head"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let cfg = &props.ctx.cfg;
        let title = props.file_data.title();
        let description = props.file_data.description.as_deref();
        let canonical = (!cfg.base_url.is_empty()).then(|| {
            let simple = simplify_slug(props.slug);
            if simple.is_root() {
                format!("https://{}/", cfg.base_url)
            } else {
                format!("https://{}/{}", cfg.base_url, simple)
            }
        });

        html! {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (cfg.page_title) }
                meta property="og:title" content=(title);
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                @if let Some(url) = canonical {
                    link rel="canonical" href=(url);
                }
                @for href in &props.resources.css {
                    link rel="stylesheet" href=(href);
                }
                @for js in props.resources.scripts(LoadTime::BeforeDomReady) {
                    script src=(js.src) {}
                }
            }
        }
    }

    fn css(&self) -> Option<&'static str> {
        Some(BASE_CSS)
    }

    fn before_dom_loaded(&self) -> Option<&'static str> {
        Some(THEME_JS)
    }
}

pub struct Header;

impl Component for Header {
    fn name(&self) -> &'static str {
        "Header"
    }

    fn render(&self, _props: &ComponentProps<'_>, children: &[Markup]) -> Markup {
        html! {
            @if !children.is_empty() {
                header {
                    @for child in children {
                        (child)
                    }
                }
            }
        }
    }
}

/// Wraps the three-column page grid.
pub struct Body;

impl Component for Body {
    fn name(&self) -> &'static str {
        "Body"
    }

    fn render(&self, _props: &ComponentProps<'_>, children: &[Markup]) -> Markup {
        html! {
            div #site-body {
                @for child in children {
                    (child)
                }
            }
        }
    }
}

pub struct Footer {
    links: Vec<(String, String)>,
}

impl Footer {
    pub fn new(links: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            links: links.into_iter().collect(),
        }
    }
}

impl Component for Footer {
    fn name(&self) -> &'static str {
        "Footer"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let t = translation(&props.ctx.cfg.locale);
        html! {
            footer {
                p { (t.created_with) " sitefold " (env!("CARGO_PKG_VERSION")) }
                @if !self.links.is_empty() {
                    ul {
                        @for (label, url) in &self.links {
                            li { a href=(url) { (label) } }
                        }
                    }
                }
            }
        }
    }
}
