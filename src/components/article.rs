//! Article components: title, reading-time line and the document body.

use super::{Component, ComponentProps, class_names};
use crate::i18n::translation;
use maud::{Markup, PreEscaped, html};

const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time in whole minutes, rounded up. Empty text reads in 0.
pub fn reading_minutes(text: &str) -> usize {
    text.split_whitespace().count().div_ceil(WORDS_PER_MINUTE)
}

pub struct ArticleTitle;

impl Component for ArticleTitle {
    fn name(&self) -> &'static str {
        "ArticleTitle"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let title = props.file_data.title();
        html! {
            @if !title.is_empty() {
                h1 class=(class_names(props.display_class, "article-title")) { (title) }
            }
        }
    }
}

pub struct ContentMeta;

impl Component for ContentMeta {
    fn name(&self) -> &'static str {
        "ContentMeta"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let minutes = props
            .file_data
            .text
            .as_deref()
            .map(reading_minutes)
            .filter(|&m| m > 0);
        let t = translation(&props.ctx.cfg.locale);
        html! {
            @if let Some(minutes) = minutes {
                p class=(class_names(props.display_class, "content-meta")) {
                    (t.reading_time(minutes))
                }
            }
        }
    }
}

/// The document body as lowered by the scanner.
pub struct Content;

impl Component for Content {
    fn name(&self) -> &'static str {
        "Content"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        html! {
            article class=(class_names(props.display_class, "page-content")) {
                (PreEscaped(props.tree.html.as_str()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{PropsFixture, doc, synthetic};

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_minutes(""), 0);
        assert_eq!(reading_minutes("one"), 1);
        assert_eq!(reading_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_minutes(&"word ".repeat(201)), 2);
    }

    #[test]
    fn content_meta_hidden_for_synthetic_pages() {
        let fixture = PropsFixture::new(vec![synthetic("a/index", "Folder: a")]);
        let html = ContentMeta.render(&fixture.props("a/index"), &[]).into_string();
        assert_eq!(html, "");
    }

    #[test]
    fn content_meta_shows_minutes() {
        let mut note = doc("note", "note.md", "Note");
        note.data.text = Some("word ".repeat(450));
        let fixture = PropsFixture::new(vec![note]);
        let html = ContentMeta.render(&fixture.props("note"), &[]).into_string();
        assert!(html.contains("3 min read"));
    }

    #[test]
    fn content_renders_tree_unescaped() {
        let mut note = doc("note", "note.md", "Note");
        note.tree.html = "<p>hi</p>".to_string();
        let fixture = PropsFixture::new(vec![note]);
        let html = Content.render(&fixture.props("note"), &[]).into_string();
        assert_eq!(html, r#"<article class="page-content"><p>hi</p></article>"#);
    }

    #[test]
    fn article_title_uses_frontmatter() {
        let fixture = PropsFixture::new(vec![doc("note", "note.md", "Hello")]);
        let html = ArticleTitle.render(&fixture.props("note"), &[]).into_string();
        assert_eq!(html, r#"<h1 class="article-title">Hello</h1>"#);
    }
}
