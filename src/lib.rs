//! # sitefold
//!
//! An incremental static site builder for markdown notes. Every document
//! becomes a page, and every folder that contains documents gets a
//! synthesized listing page, described by the folder's own index document
//! when one exists.
//!
//! # Architecture: Emitters Over a Shared Content List
//!
//! ```text
//! 1. Scan    content/  →  Vec<ProcessedContent>   (markdown + frontmatter → documents)
//! 2. Plan    documents →  DepGraph<FilePath>      (source → output edges, per emitter)
//! 3. Emit    documents →  public/                 (rendered pages, bundled assets)
//! ```
//!
//! Scanning happens once. Every emitter then reads the same immutable list
//! and answers three questions: which components its pages use (so their
//! CSS and scripts get bundled), which outputs depend on which sources (so a
//! rebuild can skip untouched pages), and finally the pages themselves.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`path`] | Validated path and slug types, slug simplification and relative links |
//! | [`depgraph`] | Directed dependency graph with reachability queries |
//! | [`content`] | Document model: tree, metadata record, typed frontmatter |
//! | [`config`] | `config.toml` loading, defaults merging, validation, theme CSS |
//! | [`i18n`] | Locale tables for generated strings |
//! | [`resources`] | Bundled stylesheet and script names, per-page relative resolution |
//! | [`components`] | Page components rendered with Maud |
//! | [`layout`] | Slot-based page layouts and the project defaults |
//! | [`folders`] | Folder discovery and placeholder/explicit folder descriptions |
//! | [`render`] | Full-page assembly from a layout |
//! | [`emitters`] | Folder pages, content pages and resource bundles |
//! | [`scan`] | Stage 1: content directory walk and markdown parsing |
//! | [`cache`] | Build manifest and incremental invalidation |
//! | [`pipeline`] | The full build, with stale-output cleanup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Folder Pages Are Synthesized
//!
//! A folder page exists because documents live in the folder, not because
//! someone wrote an index file. Grouping first creates a placeholder for every
//! folder, then lets explicit index documents replace placeholders. When two
//! documents claim one folder the smallest source path wins and the build
//! reports a warning, so the result never depends on scan order.
//!
//! ## Invalidation by Graph, Not by Timestamp
//!
//! Sources are hashed by content, and the previous build's graph tells which
//! outputs a changed source reaches. Metadata shows up on other pages through
//! navigation, so a metadata change rebuilds everything; a body edit only
//! rebuilds the pages that show that body.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error, interpolation is escaped by default, and there is no
//! template directory to ship.

pub mod cache;
pub mod components;
pub mod config;
pub mod content;
pub mod depgraph;
pub mod emitters;
pub mod folders;
pub mod i18n;
pub mod layout;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod resources;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
