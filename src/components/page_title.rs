use super::{Component, ComponentProps, class_names};
use crate::path::{FullSlug, resolve_relative};
use maud::{Markup, html};

/// Site name linking back to the root page.
pub struct PageTitle;

impl Component for PageTitle {
    fn name(&self) -> &'static str {
        "PageTitle"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let home = resolve_relative(props.slug, &FullSlug::index());
        html! {
            h2 class=(class_names(props.display_class, "page-title")) {
                a href=(home.as_str()) { (props.ctx.cfg.page_title) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{PropsFixture, doc};

    #[test]
    fn links_to_root_from_nested_page() {
        let fixture = PropsFixture::new(vec![doc("a/b/note", "a/b/note.md", "Note")]);
        let html = PageTitle.render(&fixture.props("a/b/note"), &[]).into_string();
        assert_eq!(
            html,
            r#"<h2 class="page-title"><a href="../../">Notes</a></h2>"#
        );
    }
}
