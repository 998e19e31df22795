//! One listing page per content folder.
//!
//! Grouping (see [`folders`](crate::folders)) decides which folders exist and
//! which document describes each. This emitter renders each folder's page at
//! `<folder>/index.html`, one rayon task per folder.

use super::helpers::{PageJob, collect_outcome, render_and_write};
use super::{BuildCtx, EmitError, EmitOutcome, Emitter, OutputWriter};
use crate::components::{self, ComponentRef};
use crate::config::SiteConfig;
use crate::content::ProcessedContent;
use crate::depgraph::DepGraph;
use crate::folders::{collect_folders, described_folder, folder_descriptions, folder_key, folder_output_path};
use crate::layout::defaults::{default_list_page_layout, shared_page_components};
use crate::layout::{Frames, FullPageLayout, PageLayout, PartialLayout, SharedLayout};
use crate::path::{FilePath, FullSlug, join_segments};
use crate::resources::StaticResources;
use rayon::prelude::*;

pub struct FolderPage {
    layout: FullPageLayout,
    frames: Frames,
}

impl FolderPage {
    /// Folder pages with the project's default layouts.
    pub fn new(cfg: &SiteConfig) -> Self {
        Self::with_layout(
            &shared_page_components(cfg),
            &default_list_page_layout(cfg),
            &PartialLayout::default(),
        )
    }

    pub fn with_layout(shared: &SharedLayout, list: &PageLayout, overrides: &PartialLayout) -> Self {
        Self {
            layout: FullPageLayout::compose(shared, list, components::folder_content(), overrides),
            frames: Frames::default(),
        }
    }
}

impl Emitter for FolderPage {
    fn name(&self) -> &'static str {
        "FolderPage"
    }

    fn components(&self) -> Vec<ComponentRef> {
        self.layout.components(&self.frames.header, &self.frames.body)
    }

    fn dependency_graph(
        &self,
        ctx: &BuildCtx,
        content: &[ProcessedContent],
        _resources: &StaticResources,
    ) -> DepGraph<FilePath> {
        let folders = collect_folders(content, &ctx.cfg);
        let mut graph = DepGraph::new();

        for doc in content.iter().filter(|d| !d.data.frontmatter.draft) {
            let (Some(slug), Some(source)) = (&doc.data.slug, &doc.data.file_path) else {
                continue;
            };
            let targets = [
                folder_key(slug, &ctx.cfg),
                described_folder(&doc.data, &folders).cloned(),
            ];
            for key in targets.iter().flatten() {
                if let Some(output) = folder_output_path(key) {
                    graph.add_edge(source.clone(), output);
                }
            }
        }
        graph
    }

    fn emit(
        &self,
        ctx: &BuildCtx,
        content: &[ProcessedContent],
        resources: &StaticResources,
        writer: &dyn OutputWriter,
    ) -> EmitOutcome {
        let groups = folder_descriptions(content, &ctx.cfg);
        let warnings = groups
            .conflicts
            .iter()
            .map(|c| {
                format!(
                    "folder {}: {} ignored, using {}",
                    c.folder, c.dropped, c.kept
                )
            })
            .collect();

        let results: Vec<_> = groups
            .descriptions
            .par_iter()
            .map(|(key, doc)| {
                let target = join_segments(&[key.as_str(), "index"]);
                let result = FullSlug::new(&target)
                    .map_err(|_| EmitError::InvalidSlug(key.to_string()))
                    .and_then(|slug| {
                        let job = PageJob {
                            slug,
                            file_data: &doc.data,
                            tree: &doc.tree,
                        };
                        render_and_write(
                            ctx,
                            &job,
                            content,
                            resources,
                            &self.layout,
                            &self.frames,
                            writer,
                        )
                    });
                (target, result)
            })
            .collect();

        collect_outcome(results, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::helpers::tests::MockWriter;
    use crate::test_helpers::doc;

    fn ctx() -> BuildCtx {
        BuildCtx::new(SiteConfig::default())
    }

    fn emit(content: &[ProcessedContent], writer: &MockWriter) -> EmitOutcome {
        let ctx = ctx();
        FolderPage::new(&ctx.cfg).emit(&ctx, content, &StaticResources::bundled(), writer)
    }

    fn edges(content: &[ProcessedContent]) -> Vec<(String, String)> {
        let ctx = ctx();
        FolderPage::new(&ctx.cfg)
            .dependency_graph(&ctx, content, &StaticResources::bundled())
            .edges()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn scenario() -> Vec<ProcessedContent> {
        vec![
            doc("a/note1", "a/note1.md", "Note 1"),
            doc("a/note2", "a/note2.md", "Note 2"),
            doc("b/index", "b/index.md", "About B"),
        ]
    }

    #[test]
    fn scenario_outputs_and_edges() {
        let writer = MockWriter::new();
        let outcome = emit(&scenario(), &writer);
        let written: Vec<_> = outcome.written.iter().map(FilePath::as_str).collect();
        assert_eq!(written, vec!["a/index.html", "b/index.html"]);
        assert!(outcome.is_ok());

        assert_eq!(
            edges(&scenario()),
            vec![
                ("a/note1.md".to_string(), "a/index.html".to_string()),
                ("a/note2.md".to_string(), "a/index.html".to_string()),
                ("b/index.md".to_string(), "b/index.html".to_string()),
            ]
        );

        let a = writer.content_of("a/index.html").unwrap();
        assert!(a.contains("Folder: a"));
        let b = writer.content_of("b/index.html").unwrap();
        assert!(b.contains("About B"));
    }

    #[test]
    fn output_count_matches_folder_count() {
        let content = vec![
            doc("x/one", "x/one.md", "1"),
            doc("x/y/two", "x/y/two.md", "2"),
            doc("root", "root.md", "R"),
            doc("tags/t", "tags/t.md", "T"),
        ];
        let writer = MockWriter::new();
        let outcome = emit(&content, &writer);
        assert_eq!(writer.paths(), vec!["x/index.html", "x/y/index.html"]);
        assert_eq!(outcome.written.len(), 2);
    }

    #[test]
    fn emission_is_idempotent_and_order_independent() {
        let content = scenario();
        let mut reversed = content.clone();
        reversed.reverse();

        let first = emit(&content, &MockWriter::new());
        let second = emit(&reversed, &MockWriter::new());
        assert_eq!(first.written, second.written);

        let mut e1 = edges(&content);
        let mut e2 = edges(&reversed);
        e1.sort();
        e2.sort();
        assert_eq!(e1, e2);
    }

    #[test]
    fn write_failures_do_not_stop_other_folders() {
        let writer = MockWriter::failing(&["a/index.html"]);
        let outcome = emit(&scenario(), &writer);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].target, "a/index");
        assert_eq!(writer.paths(), vec!["b/index.html"]);
    }

    struct PanicsOn(&'static str);

    impl crate::components::Component for PanicsOn {
        fn name(&self) -> &'static str {
            "PanicsOn"
        }

        fn render(
            &self,
            props: &crate::components::ComponentProps<'_>,
            _children: &[maud::Markup],
        ) -> maud::Markup {
            assert_ne!(props.slug.as_str(), self.0, "hook failed");
            maud::html! {}
        }
    }

    #[test]
    fn panicking_component_fails_only_its_page() {
        let cfg = SiteConfig::default();
        let overrides = PartialLayout {
            right: Some(vec![std::sync::Arc::new(PanicsOn("a/index"))]),
            ..Default::default()
        };
        let page = FolderPage::with_layout(
            &shared_page_components(&cfg),
            &default_list_page_layout(&cfg),
            &overrides,
        );
        let ctx = BuildCtx::new(cfg);
        let writer = MockWriter::new();
        let outcome = page.emit(&ctx, &scenario(), &StaticResources::bundled(), &writer);

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].target, "a/index");
        assert!(matches!(outcome.failures[0].error, EmitError::Render(ref m) if m.contains("hook failed")));
        assert_eq!(writer.paths(), vec!["b/index.html"]);
    }

    #[test]
    fn conflicts_become_warnings() {
        let content = vec![
            doc("a/index", "a/index.md", "Plain"),
            doc("a/index", "a/_index.md", "Underscore"),
        ];
        let writer = MockWriter::new();
        let outcome = emit(&content, &writer);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("a/index.md ignored"));
        assert!(writer.content_of("a/index.html").unwrap().contains("Underscore"));
    }

    #[test]
    fn reserved_documents_add_no_edges() {
        let ctx = ctx();
        let content = vec![doc("tags/t", "tags/t.md", "T"), doc("x/one", "x/one.md", "1")];
        let graph =
            FolderPage::new(&ctx.cfg).dependency_graph(&ctx, &content, &StaticResources::bundled());

        let tags_source = FilePath::new("tags/t.md").unwrap();
        assert_eq!(graph.out_neighbors(&tags_source).count(), 0);
        assert!(!graph.has_node(&FilePath::new("tags/index.html").unwrap()));
        assert_eq!(
            edges(&content),
            vec![("x/one.md".to_string(), "x/index.html".to_string())]
        );
    }

    #[test]
    fn folder_named_index_gets_a_single_page() {
        let content = vec![
            doc("x/index/index", "x/index/index.md", "Nested"),
            doc("ok", "ok.md", "Ok"),
        ];
        assert_eq!(
            edges(&content),
            vec![(
                "x/index/index.md".to_string(),
                "x/index/index.html".to_string()
            )]
        );
        let writer = MockWriter::new();
        let outcome = emit(&content, &writer);
        assert!(outcome.is_ok());
        assert_eq!(writer.paths(), vec!["x/index/index.html"]);
        assert!(writer.content_of("x/index/index.html").unwrap().contains("Nested"));
    }

    #[test]
    fn drafts_add_no_edges() {
        let mut wip = doc("d/wip", "d/wip.md", "WIP");
        wip.data.frontmatter.draft = true;
        let content = vec![wip, doc("a/n", "a/n.md", "N")];
        assert_eq!(
            edges(&content),
            vec![("a/n.md".to_string(), "a/index.html".to_string())]
        );
    }

    #[test]
    fn describing_document_gets_extra_edge() {
        let content = vec![
            doc("a/topic", "a/topic.md", "Topic"),
            doc("a/topic/detail", "a/topic/detail.md", "Detail"),
        ];
        let e = edges(&content);
        assert!(e.contains(&("a/topic.md".to_string(), "a/index.html".to_string())));
        assert!(e.contains(&("a/topic.md".to_string(), "a/topic/index.html".to_string())));
    }

    #[test]
    fn components_are_ordered_and_unique() {
        let page = FolderPage::new(&SiteConfig::default());
        let comps = page.components();
        for (i, a) in comps.iter().enumerate() {
            for b in &comps[i + 1..] {
                assert!(!std::sync::Arc::ptr_eq(a, b));
            }
        }
        assert_eq!(comps.first().unwrap().name(), "Head");
        assert_eq!(comps.last().unwrap().name(), "Footer");
    }
}
