//! One page per document at `<slug>.html`.
//!
//! Folder index documents are skipped; the folder page emitter renders them
//! as the head of their folder's listing.

use super::helpers::{PageJob, collect_outcome, output_path, render_and_write};
use super::{BuildCtx, EmitOutcome, Emitter, OutputWriter};
use crate::components::{self, ComponentRef};
use crate::config::SiteConfig;
use crate::content::ProcessedContent;
use crate::depgraph::DepGraph;
use crate::folders::{collect_folders, is_folder_index};
use crate::layout::defaults::{default_content_page_layout, shared_page_components};
use crate::layout::{Frames, FullPageLayout, PageLayout, PartialLayout, SharedLayout};
use crate::path::FilePath;
use crate::resources::StaticResources;
use rayon::prelude::*;

pub struct ContentPage {
    layout: FullPageLayout,
    frames: Frames,
}

impl ContentPage {
    pub fn new(cfg: &SiteConfig) -> Self {
        Self::with_layout(
            &shared_page_components(cfg),
            &default_content_page_layout(cfg),
            &PartialLayout::default(),
        )
    }

    pub fn with_layout(
        shared: &SharedLayout,
        kind: &PageLayout,
        overrides: &PartialLayout,
    ) -> Self {
        Self {
            layout: FullPageLayout::compose(shared, kind, components::content(), overrides),
            frames: Frames::default(),
        }
    }

    /// Documents that get their own page.
    fn pages<'a>(
        ctx: &BuildCtx,
        content: &'a [ProcessedContent],
    ) -> impl Iterator<Item = &'a ProcessedContent> {
        let folders = collect_folders(content, &ctx.cfg);
        content.iter().filter(move |doc| {
            doc.data.slug.is_some()
                && !doc.data.frontmatter.draft
                && !is_folder_index(&doc.data, &folders)
        })
    }
}

impl Emitter for ContentPage {
    fn name(&self) -> &'static str {
        "ContentPage"
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
        let mut graph = DepGraph::new();
        for doc in Self::pages(ctx, content) {
            let (Some(slug), Some(source)) = (&doc.data.slug, &doc.data.file_path) else {
                continue;
            };
            if let Ok(output) = output_path(slug, ".html") {
                graph.add_edge(source.clone(), output);
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
        let docs: Vec<&ProcessedContent> = Self::pages(ctx, content).collect();
        let results: Vec<_> = docs
            .par_iter()
            .filter_map(|doc| {
                let slug = doc.data.slug.clone()?;
                let target = slug.to_string();
                let job = PageJob {
                    slug,
                    file_data: &doc.data,
                    tree: &doc.tree,
                };
                let result = render_and_write(
                    ctx,
                    &job,
                    content,
                    resources,
                    &self.layout,
                    &self.frames,
                    writer,
                );
                Some((target, result))
            })
            .collect();

        collect_outcome(results, Vec::new())
    }
}
