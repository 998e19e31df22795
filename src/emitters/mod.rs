//! Emitters turn the processed document list into output files.
//!
//! Every emitter answers three questions:
//!
//! | Method | Question |
//! |--------|----------|
//! | [`Emitter::components`] | Which page components do my pages use? (resource bundling) |
//! | [`Emitter::dependency_graph`] | Which source file does each of my outputs depend on? (incremental builds) |
//! | [`Emitter::emit`] | Render and write my outputs. |
//!
//! The dependency graph is computed from the same immutable input as
//! emission, before anything is written. Edges run from a source path
//! (`a/note1.md`) to an output path relative to the output directory
//! (`a/index.html`).
//!
//! Emission is fail-soft: a page that cannot be written becomes an
//! [`EmitFailure`] in the outcome and the remaining pages still go out.

use crate::components::ComponentRef;
use crate::config::SiteConfig;
use crate::content::ProcessedContent;
use crate::depgraph::DepGraph;
use crate::path::FilePath;
use crate::resources::StaticResources;
use thiserror::Error;

pub mod component_resources;
pub mod content_page;
pub mod folder_page;
pub mod helpers;

pub use component_resources::ComponentResources;
pub use content_page::ContentPage;
pub use folder_page::FolderPage;
pub use helpers::{FsWriter, OutputWriter, WriteError};

/// Build-wide context handed to every emitter.
#[derive(Debug, Clone, Default)]
pub struct BuildCtx {
    pub cfg: SiteConfig,
}

impl BuildCtx {
    pub fn new(cfg: SiteConfig) -> Self {
        Self { cfg }
    }
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("write failed: {0}")]
    Write(#[from] WriteError),
    #[error("no valid page address for {0}")]
    InvalidSlug(String),
    #[error("render failed: {0}")]
    Render(String),
}

/// One output that could not be produced.
#[derive(Debug)]
pub struct EmitFailure {
    /// Page slug or output name the failure belongs to.
    pub target: String,
    pub error: EmitError,
}

/// What an emitter produced.
#[derive(Debug, Default)]
pub struct EmitOutcome {
    /// Output paths written, sorted.
    pub written: Vec<FilePath>,
    pub failures: Vec<EmitFailure>,
    /// Non-fatal notes, e.g. two documents describing one folder.
    pub warnings: Vec<String>,
}

impl EmitOutcome {
    /// Sort written paths and failures so results do not depend on scheduling.
    pub fn sorted(mut self) -> Self {
        self.written.sort();
        self.failures.sort_by(|a, b| a.target.cmp(&b.target));
        self
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

pub trait Emitter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Components used by this emitter's pages, wrapped ones included, each once.
    fn components(&self) -> Vec<ComponentRef>;

    /// Source → output edges for every output this emitter would write.
    fn dependency_graph(
        &self,
        ctx: &BuildCtx,
        content: &[ProcessedContent],
        resources: &StaticResources,
    ) -> DepGraph<FilePath>;

    fn emit(
        &self,
        ctx: &BuildCtx,
        content: &[ProcessedContent],
        resources: &StaticResources,
        writer: &dyn OutputWriter,
    ) -> EmitOutcome;
}
