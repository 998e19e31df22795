//! Build manifest for incremental rebuilds.
//!
//! Rendering a page is cheap, but a notes vault has thousands of them and
//! most edits touch one file. This module decides which outputs a change can
//! reach so the pipeline rewrites only those.
//!
//! # Design
//!
//! After every successful build the pipeline saves a [`BuildManifest`]
//! holding, per source file, two hashes, plus the merged dependency graph of
//! all emitters and the list of outputs written.
//!
//! - **`content_hash`**: SHA-256 of the raw source bytes. Content-based
//!   rather than mtime-based so it survives `git checkout`.
//! - **`meta_hash`**: SHA-256 of the slug and parsed frontmatter. Titles,
//!   tags and ordering hints show up on other pages (explorer, breadcrumbs,
//!   folder listings), so a metadata change anywhere forces a full rebuild.
//!
//! The next build compares against it and produces an [`Invalidation`]:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | no manifest, version mismatch, corrupt file | full |
//! | config or binary version changed | full |
//! | a source was added or removed | full |
//! | a source's metadata changed | full |
//! | only bodies changed | partial: dependents of the changed sources |
//!
//! Dependents are taken from both the previous and the current graph, so an
//! output that a source stopped feeding is still refreshed.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<output_dir>/.sitefold-manifest.json`, so
//! it travels with the output directory when cached in CI.
//!
//! ## Bypassing the cache
//!
//! `build --no-cache` plans against an empty manifest, which always yields a
//! full rebuild.

use crate::config::SiteConfig;
use crate::content::{FileData, ProcessedContent};
use crate::depgraph::{DepGraph, GraphExport};
use crate::path::FilePath;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the manifest file within the output directory.
pub const MANIFEST_FILENAME: &str = ".sitefold-manifest.json";

/// Bump to invalidate every existing manifest when the format or the hash
/// inputs change.
const MANIFEST_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub content_hash: String,
    pub meta_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    pub version: u32,
    /// Hash of the resolved config and the binary version.
    pub config_hash: String,
    pub sources: BTreeMap<FilePath, SourceEntry>,
    pub graph: GraphExport<FilePath>,
    /// Every output path the build produced, bundles included.
    pub outputs: BTreeSet<FilePath>,
}

impl BuildManifest {
    /// The manifest of "no previous build".
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            config_hash: String::new(),
            sources: BTreeMap::new(),
            graph: GraphExport {
                nodes: Vec::new(),
                edges: Vec::new(),
            },
            outputs: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.config_hash.is_empty() && self.sources.is_empty() && self.outputs.is_empty()
    }

    /// Load from the output directory. A missing, unparseable or
    /// version-mismatched file loads as [`empty`](Self::empty).
    pub fn load(output_dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(manifest_path(output_dir)) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(manifest) if manifest.version == MANIFEST_VERSION => manifest,
            _ => Self::empty(),
        }
    }

    pub fn save(&self, output_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(output_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(output_dir), json)?;
        Ok(())
    }

    pub fn dependency_graph(&self) -> DepGraph<FilePath> {
        DepGraph::from(self.graph.clone())
    }
}

/// Resolve the manifest path for an output directory.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILENAME)
}

fn hex_digest(hasher: Sha256) -> String {
    format!("{:x}", hasher.finalize())
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hash_bytes(&bytes))
}

/// Hash of everything global that shapes every page.
pub fn hash_config(cfg: &SiteConfig) -> Result<String, CacheError> {
    let mut hasher = Sha256::new();
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    hasher.update(b"\0");
    hasher.update(serde_json::to_vec(cfg)?);
    Ok(hex_digest(hasher))
}

pub fn hash_meta(data: &FileData) -> Result<String, CacheError> {
    let mut hasher = Sha256::new();
    hasher.update(data.slug.as_ref().map_or("", |s| s.as_str()).as_bytes());
    hasher.update(b"\0");
    hasher.update(serde_json::to_vec(&data.frontmatter)?);
    Ok(hex_digest(hasher))
}

/// Hash every scanned source under `content_root`.
pub fn hash_sources(
    content_root: &Path,
    content: &[ProcessedContent],
) -> Result<BTreeMap<FilePath, SourceEntry>, CacheError> {
    let mut sources = BTreeMap::new();
    for doc in content {
        let Some(fp) = &doc.data.file_path else {
            continue;
        };
        let entry = SourceEntry {
            content_hash: hash_file(&content_root.join(fp.as_str()))?,
            meta_hash: hash_meta(&doc.data)?,
        };
        sources.insert(fp.clone(), entry);
    }
    Ok(sources)
}

/// Why every output is being rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullReason {
    NoManifest,
    ConfigChanged,
    SourcesAddedOrRemoved,
    MetadataChanged(FilePath),
}

impl fmt::Display for FullReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullReason::NoManifest => write!(f, "no previous build"),
            FullReason::ConfigChanged => write!(f, "configuration changed"),
            FullReason::SourcesAddedOrRemoved => write!(f, "sources added or removed"),
            FullReason::MetadataChanged(fp) => write!(f, "metadata changed in {fp}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    Full(FullReason),
    Partial {
        changed: BTreeSet<FilePath>,
        affected: BTreeSet<FilePath>,
    },
}

impl Invalidation {
    /// Whether `output` must be regenerated.
    pub fn affects(&self, output: &FilePath) -> bool {
        match self {
            Invalidation::Full(_) => true,
            Invalidation::Partial { affected, .. } => affected.contains(output),
        }
    }
}

/// Compare the previous build with the current one.
pub fn plan(previous: &BuildManifest, current: &BuildManifest) -> Invalidation {
    if previous.is_empty() {
        return Invalidation::Full(FullReason::NoManifest);
    }
    if previous.config_hash != current.config_hash {
        return Invalidation::Full(FullReason::ConfigChanged);
    }
    if !previous.sources.keys().eq(current.sources.keys()) {
        return Invalidation::Full(FullReason::SourcesAddedOrRemoved);
    }

    let mut changed = BTreeSet::new();
    for (fp, now) in &current.sources {
        let Some(before) = previous.sources.get(fp) else {
            continue;
        };
        if before.meta_hash != now.meta_hash {
            return Invalidation::Full(FullReason::MetadataChanged(fp.clone()));
        }
        if before.content_hash != now.content_hash {
            changed.insert(fp.clone());
        }
    }

    let mut affected = previous.dependency_graph().dependents_of(&changed);
    affected.extend(current.dependency_graph().dependents_of(&changed));
    Invalidation::Partial { changed, affected }
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} unchanged, {} written ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} written", self.misses)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fp(s: &str) -> FilePath {
        FilePath::new(s).unwrap()
    }

    fn entry(content: &str, meta: &str) -> SourceEntry {
        SourceEntry {
            content_hash: content.to_string(),
            meta_hash: meta.to_string(),
        }
    }

    fn manifest(sources: &[(&str, SourceEntry)], edges: &[(&str, &str)]) -> BuildManifest {
        let mut graph = DepGraph::new();
        for (a, b) in edges {
            graph.add_edge(fp(a), fp(b));
        }
        BuildManifest {
            version: MANIFEST_VERSION,
            config_hash: "cfg".to_string(),
            sources: sources
                .iter()
                .map(|(p, e)| (fp(p), e.clone()))
                .collect(),
            graph: graph.export(),
            outputs: graph.nodes().filter(|n| n.as_str().ends_with(".html")).cloned().collect(),
        }
    }

    fn two_notes(note1: SourceEntry) -> BuildManifest {
        manifest(
            &[("a/note1.md", note1), ("a/note2.md", entry("c2", "m2"))],
            &[
                ("a/note1.md", "a/note1.html"),
                ("a/note1.md", "a/index.html"),
                ("a/note2.md", "a/note2.html"),
                ("a/note2.md", "a/index.html"),
            ],
        )
    }

    // =========================================================================
    // Manifest persistence
    // =========================================================================

    #[test]
    fn empty_manifest_is_empty() {
        let m = BuildManifest::empty();
        assert_eq!(m.version, MANIFEST_VERSION);
        assert!(m.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let m = two_notes(entry("c1", "m1"));
        m.save(tmp.path()).unwrap();

        let loaded = BuildManifest::load(tmp.path());
        assert_eq!(loaded.sources, m.sources);
        assert_eq!(loaded.graph, m.graph);
        assert_eq!(loaded.outputs, m.outputs);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(BuildManifest::load(tmp.path()).is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(manifest_path(tmp.path()), "{ not json").unwrap();
        assert!(BuildManifest::load(tmp.path()).is_empty());
    }

    #[test]
    fn load_version_mismatch_is_empty() {
        let tmp = TempDir::new().unwrap();
        let mut m = two_notes(entry("c1", "m1"));
        m.version = MANIFEST_VERSION + 1;
        m.save(tmp.path()).unwrap();
        assert!(BuildManifest::load(tmp.path()).is_empty());
    }

    // =========================================================================
    // Hashing
    // =========================================================================

    #[test]
    fn hash_file_matches_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x.md");
        fs::write(&path, "hello").unwrap();
        assert_eq!(hash_file(&path).unwrap(), hash_bytes(b"hello"));
        assert_eq!(hash_bytes(b"hello").len(), 64);
    }

    #[test]
    fn config_hash_tracks_values() {
        let a = SiteConfig::default();
        let mut b = SiteConfig::default();
        assert_eq!(hash_config(&a).unwrap(), hash_config(&b).unwrap());
        b.page_title = "Other".to_string();
        assert_ne!(hash_config(&a).unwrap(), hash_config(&b).unwrap());
    }

    #[test]
    fn meta_hash_ignores_body() {
        let mut a = crate::test_helpers::doc("a/n", "a/n.md", "N");
        let before = hash_meta(&a.data).unwrap();
        a.tree.html = "<p>changed</p>".to_string();
        a.data.text = Some("changed".to_string());
        assert_eq!(hash_meta(&a.data).unwrap(), before);
        a.data.frontmatter.title = Some("Renamed".to_string());
        assert_ne!(hash_meta(&a.data).unwrap(), before);
    }

    // =========================================================================
    // Planning
    // =========================================================================

    #[test]
    fn no_previous_build_is_full() {
        let current = two_notes(entry("c1", "m1"));
        assert_eq!(
            plan(&BuildManifest::empty(), &current),
            Invalidation::Full(FullReason::NoManifest)
        );
    }

    #[test]
    fn config_change_is_full() {
        let previous = two_notes(entry("c1", "m1"));
        let mut current = previous.clone();
        current.config_hash = "other".to_string();
        assert_eq!(
            plan(&previous, &current),
            Invalidation::Full(FullReason::ConfigChanged)
        );
    }

    #[test]
    fn added_source_is_full() {
        let previous = two_notes(entry("c1", "m1"));
        let mut current = previous.clone();
        current.sources.insert(fp("b.md"), entry("c3", "m3"));
        assert_eq!(
            plan(&previous, &current),
            Invalidation::Full(FullReason::SourcesAddedOrRemoved)
        );
    }

    #[test]
    fn metadata_change_is_full() {
        let previous = two_notes(entry("c1", "m1"));
        let current = two_notes(entry("c1", "m1-renamed"));
        assert_eq!(
            plan(&previous, &current),
            Invalidation::Full(FullReason::MetadataChanged(fp("a/note1.md")))
        );
    }

    #[test]
    fn body_change_affects_only_dependents() {
        let previous = two_notes(entry("c1", "m1"));
        let current = two_notes(entry("c1-edited", "m1"));
        let Invalidation::Partial { changed, affected } = plan(&previous, &current) else {
            panic!("expected partial rebuild");
        };
        assert_eq!(changed, BTreeSet::from([fp("a/note1.md")]));
        assert_eq!(affected, BTreeSet::from([fp("a/index.html"), fp("a/note1.html")]));
    }

    #[test]
    fn unchanged_build_affects_nothing() {
        let previous = two_notes(entry("c1", "m1"));
        let invalidation = plan(&previous, &previous.clone());
        assert!(!invalidation.affects(&fp("a/index.html")));
        assert!(matches!(invalidation, Invalidation::Partial { ref changed, .. } if changed.is_empty()));
    }

    #[test]
    fn edges_from_both_graphs_count() {
        let previous = manifest(
            &[("a.md", entry("c", "m"))],
            &[("a.md", "old.html")],
        );
        let current = manifest(
            &[("a.md", entry("c2", "m"))],
            &[("a.md", "new.html")],
        );
        let Invalidation::Partial { affected, .. } = plan(&previous, &current) else {
            panic!("expected partial rebuild");
        };
        assert_eq!(affected, BTreeSet::from([fp("new.html"), fp("old.html")]));
    }

    #[test]
    fn cache_stats_display() {
        let stats = CacheStats { hits: 3, misses: 2 };
        assert_eq!(stats.to_string(), "3 unchanged, 2 written (5 total)");
        let cold = CacheStats { hits: 0, misses: 4 };
        assert_eq!(cold.to_string(), "4 written");
    }
}
