use super::{Component, ComponentProps, class_names};
use maud::{Markup, html};

/// Empty flexible block used to push neighbouring components apart.
pub struct Spacer;

impl Component for Spacer {
    fn name(&self) -> &'static str {
        "Spacer"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        html! {
            div class=(class_names(props.display_class, "spacer")) {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::DisplayClass;
    use crate::test_helpers::{PropsFixture, doc};

    #[test]
    fn carries_display_class() {
        let fixture = PropsFixture::new(vec![doc("note", "note.md", "Note")]);
        let mut props = fixture.props("note");
        assert_eq!(
            Spacer.render(&props, &[]).into_string(),
            r#"<div class="spacer"></div>"#
        );
        props.display_class = Some(DisplayClass::MobileOnly);
        assert_eq!(
            Spacer.render(&props, &[]).into_string(),
            r#"<div class="mobile-only spacer"></div>"#
        );
    }
}
