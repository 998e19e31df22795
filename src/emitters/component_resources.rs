//! Bundles the stylesheets and scripts of every component the page emitters
//! use into `index.css`, `prescript.js` and `postscript.js`.

use super::helpers::collect_outcome;
use super::{BuildCtx, EmitError, EmitOutcome, Emitter, OutputWriter};
use crate::components::{ComponentRef, flatten_components};
use crate::config::generate_color_css;
use crate::content::ProcessedContent;
use crate::depgraph::DepGraph;
use crate::path::{FilePath, FullSlug};
use crate::resources::{INDEX_CSS, POSTSCRIPT_JS, PRESCRIPT_JS, StaticResources};

pub struct ComponentResources {
    components: Vec<ComponentRef>,
}

/// Keep the first occurrence of each snippet. Instances of one component
/// type share their `&'static str`, so equal text means the same source.
fn unique_snippets(snippets: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for snippet in snippets {
        if !out.contains(&snippet) {
            out.push(snippet);
        }
    }
    out
}

impl ComponentResources {
    /// Collect components from the emitters whose pages load the bundles.
    pub fn new(emitters: &[&dyn Emitter]) -> Self {
        let declared: Vec<ComponentRef> = emitters.iter().flat_map(|e| e.components()).collect();
        Self {
            components: flatten_components(&declared),
        }
    }

    pub fn stylesheet(&self, ctx: &BuildCtx) -> String {
        let mut parts = vec![generate_color_css(&ctx.cfg.colors)];
        parts.extend(
            unique_snippets(self.components.iter().filter_map(|c| c.css()))
                .into_iter()
                .map(String::from),
        );
        parts.join("\n\n")
    }

    pub fn prescript(&self) -> String {
        unique_snippets(self.components.iter().filter_map(|c| c.before_dom_loaded())).join("\n")
    }

    pub fn postscript(&self) -> String {
        unique_snippets(self.components.iter().filter_map(|c| c.after_dom_loaded())).join("\n")
    }

    fn bundle_slug(name: &str) -> Option<FullSlug> {
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        FullSlug::new(stem).ok()
    }
}

impl Emitter for ComponentResources {
    fn name(&self) -> &'static str {
        "ComponentResources"
    }

    fn components(&self) -> Vec<ComponentRef> {
        Vec::new()
    }

    /// Bundles depend on code, not content.
    fn dependency_graph(
        &self,
        _ctx: &BuildCtx,
        _content: &[ProcessedContent],
        _resources: &StaticResources,
    ) -> DepGraph<FilePath> {
        DepGraph::new()
    }

    fn emit(
        &self,
        ctx: &BuildCtx,
        _content: &[ProcessedContent],
        _resources: &StaticResources,
        writer: &dyn OutputWriter,
    ) -> EmitOutcome {
        let bundles = [
            (INDEX_CSS, ".css", self.stylesheet(ctx)),
            (PRESCRIPT_JS, ".js", self.prescript()),
            (POSTSCRIPT_JS, ".js", self.postscript()),
        ];

        let results = bundles
            .into_iter()
            .map(|(name, ext, body)| {
                let result = Self::bundle_slug(name)
                    .ok_or_else(|| EmitError::InvalidSlug(name.to_string()))
                    .and_then(|slug| Ok(writer.write(&slug, ext, &body)?));
                (name.to_string(), result)
            })
            .collect();

        collect_outcome(results, Vec::new())
    }
}
