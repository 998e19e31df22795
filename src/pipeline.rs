//! The full build: scan → plan → emit → clean up → save manifest.
//!
//! Every emitter's dependency graph is computed from the scanned content
//! before anything is written. The merged graph is used twice: to reject two
//! emitters claiming the same output, and (through [`cache`](crate::cache))
//! to find the outputs a source edit can reach.
//!
//! Emission goes through an [`IncrementalWriter`], which tells the page
//! emitters which outputs are still current so they skip rendering them.
//! Outputs written by the previous build that nothing produces anymore are
//! deleted. The manifest is only saved when every output was produced, so a
//! failed page is retried on the next run.
//!
//! Progress is reported as [`BuildEvent`]s over an optional channel, the
//! same way the CLI's printer thread consumes them.

use crate::cache::{
    self, BuildManifest, CacheError, CacheStats, FullReason, Invalidation, hash_config,
    hash_sources,
};
use crate::config::{ConfigError, SiteConfig};
use crate::content::ProcessedContent;
use crate::depgraph::DepGraph;
use crate::emitters::{
    BuildCtx, ComponentResources, ContentPage, EmitFailure, EmitOutcome, Emitter, FolderPage,
    FsWriter, OutputWriter, WriteError,
};
use crate::path::{FilePath, FullSlug};
use crate::resources::StaticResources;
use crate::scan::{self, ScanError, ScanOutput, ScanWarning};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("outputs claimed by more than one emitter: {}", .0.join(", "))]
    DuplicateOutputs(Vec<String>),
}

/// Progress events streamed while a build runs.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    Scanned {
        documents: usize,
        drafts: usize,
    },
    Planned(Invalidation),
    EmitterFinished {
        name: &'static str,
        written: usize,
        failures: usize,
    },
    Removed(FilePath),
}

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Plan against the previous build's manifest. When off, every output is
    /// rebuilt.
    pub use_cache: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

#[derive(Debug)]
pub struct EmitterReport {
    pub name: &'static str,
    pub outcome: EmitOutcome,
}

#[derive(Debug)]
pub struct BuildReport {
    pub documents: usize,
    pub drafts: usize,
    pub scan_warnings: Vec<ScanWarning>,
    pub invalidation: Invalidation,
    pub emitters: Vec<EmitterReport>,
    /// Outputs of the previous build that were deleted.
    pub removed: Vec<FilePath>,
    pub stats: CacheStats,
    pub manifest_saved: bool,
}

impl BuildReport {
    pub fn failures(&self) -> impl Iterator<Item = &EmitFailure> {
        self.emitters.iter().flat_map(|e| e.outcome.failures.iter())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &String> {
        self.emitters.iter().flat_map(|e| e.outcome.warnings.iter())
    }

    pub fn written(&self) -> BTreeSet<FilePath> {
        self.emitters
            .iter()
            .flat_map(|e| e.outcome.written.iter().cloned())
            .collect()
    }

    pub fn is_ok(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// The emitters a build runs, in order.
///
/// The resource bundler goes last and collects the components of the two
/// page emitters.
pub fn default_emitters(cfg: &SiteConfig) -> Vec<Box<dyn Emitter>> {
    let folder = FolderPage::new(cfg);
    let content = ContentPage::new(cfg);
    let resources = ComponentResources::new(&[&folder, &content]);
    vec![Box::new(folder), Box::new(content), Box::new(resources)]
}

/// Merge every emitter's graph, rejecting outputs claimed twice.
pub fn combined_graph(
    emitters: &[Box<dyn Emitter>],
    ctx: &BuildCtx,
    content: &[ProcessedContent],
    resources: &StaticResources,
) -> Result<DepGraph<FilePath>, BuildError> {
    let mut merged = DepGraph::new();
    let mut owner: BTreeMap<FilePath, &'static str> = BTreeMap::new();
    let mut duplicates = BTreeSet::new();

    for emitter in emitters {
        let graph = emitter.dependency_graph(ctx, content, resources);
        let outputs: BTreeSet<&FilePath> = graph.edges().map(|(_, to)| to).collect();
        for output in outputs {
            match owner.get(output) {
                Some(other) if *other != emitter.name() => {
                    duplicates.insert(output.to_string());
                }
                _ => {
                    owner.insert(output.clone(), emitter.name());
                }
            }
        }
        merged.merge(&graph);
    }

    if duplicates.is_empty() {
        Ok(merged)
    } else {
        Err(BuildError::DuplicateOutputs(duplicates.into_iter().collect()))
    }
}

/// Scan and compute the merged dependency graph without writing anything.
pub fn analyze(
    source: &Path,
    cfg: &SiteConfig,
) -> Result<(ScanOutput, DepGraph<FilePath>), BuildError> {
    let scanned = scan::scan(source, cfg)?;
    let ctx = BuildCtx::new(cfg.clone());
    let emitters = default_emitters(cfg);
    let graph = combined_graph(
        &emitters,
        &ctx,
        &scanned.content,
        &StaticResources::bundled(),
    )?;
    Ok((scanned, graph))
}

/// Filesystem writer that leaves current outputs alone.
///
/// An output is fresh when the previous build tracked it, the invalidation
/// does not reach it, and the file is still on disk.
pub struct IncrementalWriter<'a> {
    inner: FsWriter,
    invalidation: &'a Invalidation,
    tracked: &'a BTreeSet<FilePath>,
    hits: AtomicU32,
    misses: AtomicU32,
}

impl<'a> IncrementalWriter<'a> {
    pub fn new(
        output_dir: &Path,
        invalidation: &'a Invalidation,
        tracked: &'a BTreeSet<FilePath>,
    ) -> Self {
        Self {
            inner: FsWriter::new(output_dir),
            invalidation,
            tracked,
            hits: AtomicU32::new(0),
            misses: AtomicU32::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl OutputWriter for IncrementalWriter<'_> {
    fn write(&self, slug: &FullSlug, ext: &str, content: &str) -> Result<FilePath, WriteError> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.inner.write(slug, ext, content)
    }

    fn is_fresh(&self, path: &FilePath) -> bool {
        let fresh = !self.invalidation.affects(path)
            && self.tracked.contains(path)
            && self.inner.output_dir.join(path.as_str()).is_file();
        if fresh {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        fresh
    }
}

fn send(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Paths that appear in more than one emitter's written list.
fn duplicate_writes(reports: &[EmitterReport]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for path in reports.iter().flat_map(|r| r.outcome.written.iter()) {
        if !seen.insert(path) {
            duplicates.insert(path.to_string());
        }
    }
    duplicates.into_iter().collect()
}

/// Delete outputs of the previous build that this build did not produce.
fn remove_stale(
    output_dir: &Path,
    previous: &BTreeSet<FilePath>,
    written: &BTreeSet<FilePath>,
    events: Option<&Sender<BuildEvent>>,
) -> Result<Vec<FilePath>, BuildError> {
    let mut removed = Vec::new();
    for stale in previous.difference(written) {
        match std::fs::remove_file(output_dir.join(stale.as_str())) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        }
        send(events, BuildEvent::Removed(stale.clone()));
        removed.push(stale.clone());
    }
    Ok(removed)
}

/// Run a build of `source` into `output`.
pub fn build(
    source: &Path,
    output: &Path,
    cfg: &SiteConfig,
    options: BuildOptions,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let events = events.as_ref();

    let scanned = scan::scan(source, cfg)?;
    send(
        events,
        BuildEvent::Scanned {
            documents: scanned.content.len(),
            drafts: scanned.drafts,
        },
    );

    let ctx = BuildCtx::new(cfg.clone());
    let resources = StaticResources::bundled();
    let emitters = default_emitters(cfg);
    let graph = combined_graph(&emitters, &ctx, &scanned.content, &resources)?;

    let mut current = BuildManifest {
        config_hash: hash_config(cfg)?,
        sources: hash_sources(source, &scanned.content)?,
        graph: graph.export(),
        ..BuildManifest::empty()
    };
    let previous = BuildManifest::load(output);
    let invalidation = if options.use_cache {
        cache::plan(&previous, &current)
    } else {
        Invalidation::Full(FullReason::NoManifest)
    };
    send(events, BuildEvent::Planned(invalidation.clone()));

    std::fs::create_dir_all(output)?;
    let writer = IncrementalWriter::new(output, &invalidation, &previous.outputs);
    let mut reports = Vec::with_capacity(emitters.len());
    for emitter in &emitters {
        let outcome = emitter.emit(&ctx, &scanned.content, &resources, &writer);
        send(
            events,
            BuildEvent::EmitterFinished {
                name: emitter.name(),
                written: outcome.written.len(),
                failures: outcome.failures.len(),
            },
        );
        reports.push(EmitterReport {
            name: emitter.name(),
            outcome,
        });
    }

    let duplicates = duplicate_writes(&reports);
    if !duplicates.is_empty() {
        return Err(BuildError::DuplicateOutputs(duplicates));
    }

    let stats = writer.stats();
    let mut report = BuildReport {
        documents: scanned.content.len(),
        drafts: scanned.drafts,
        scan_warnings: scanned.warnings,
        invalidation,
        emitters: reports,
        removed: Vec::new(),
        stats,
        manifest_saved: false,
    };

    let written = report.written();
    if report.is_ok() {
        report.removed = remove_stale(output, &previous.outputs, &written, events)?;
        current.outputs = written;
        current.save(output)?;
        report.manifest_saved = true;
    }
    Ok(report)
}
