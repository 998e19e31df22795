//! Page renderer: places a layout's rendered slots into the HTML document.
//!
//! ```text
//! <html>
//!   head
//!   <body>
//!     body frame
//!       left sidebar   | header frame(header..), before_body.., page_body, footer | right sidebar
//!     after-DOM scripts
//! ```

use crate::components::{ComponentProps, ComponentRef};
use crate::layout::{Frames, FullPageLayout};
use crate::resources::LoadTime;
use maud::{DOCTYPE, Markup, html};

fn render_all(components: &[ComponentRef], props: &ComponentProps<'_>) -> Vec<Markup> {
    components.iter().map(|c| c.render(props, &[])).collect()
}

/// Render one complete page.
pub fn render_page(props: &ComponentProps<'_>, layout: &FullPageLayout, frames: &Frames) -> Markup {
    let lang = props
        .ctx
        .cfg
        .locale
        .split(['-', '_'])
        .next()
        .unwrap_or("en");

    let header = frames.header.render(props, &render_all(&layout.header, props));
    let before_body = render_all(&layout.before_body, props);
    let page_body = layout.page_body.render(props, &[]);
    let left = render_all(&layout.left, props);
    let right = render_all(&layout.right, props);
    let footer = layout.footer.render(props, &[]);

    let columns = [
        html! {
            div.sidebar.left {
                @for part in &left { (part) }
            }
        },
        html! {
            div.center {
                (header)
                div.page-header {
                    @for part in &before_body { (part) }
                }
                (page_body)
                (footer)
            }
        },
        html! {
            div.sidebar.right {
                @for part in &right { (part) }
            }
        },
    ];

    html! {
        (DOCTYPE)
        html lang=(lang) {
            (layout.head.render(props, &[]))
            body data-slug=(props.slug.as_str()) {
                (frames.body.render(props, &columns))
                @for js in props.resources.scripts(LoadTime::AfterDomReady) {
                    script src=(js.src) {}
                }
            }
        }
    }
}
