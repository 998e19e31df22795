//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every document is its title with a positional index; source paths and
//! page addresses are secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Scan (`check` and the first build stage)
//!
//! ```text
//! Documents
//! 001 Note One
//!     Source: a/note1.md
//!     Slug: a/note1
//! 002 About B
//!     Source: b/index.md
//!     Slug: b/index
//!
//! Folders
//!     a (2 items)
//!     b (1 item)
//!
//! 1 draft skipped
//! ```
//!
//! ## Build
//!
//! ```text
//! Rebuilding 2 outputs affected by 1 changed source
//! FolderPage: 2 written
//! ContentPage: 3 written, 1 failed
//! Removed old/page.html
//! ```
//!
//! ## Graph
//!
//! ```text
//! a/note1.md
//!     → a/index.html
//!     → a/note1.html
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::cache::Invalidation;
use crate::config::SiteConfig;
use crate::depgraph::DepGraph;
use crate::folders::{collect_folders, folder_key};
use crate::path::{FilePath, SimpleSlug};
use crate::pipeline::{BuildEvent, BuildReport};
use crate::scan::ScanOutput;
use std::collections::BTreeMap;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the scanned documents, their folders, drafts and warnings.
pub fn format_scan_output(scanned: &ScanOutput, cfg: &SiteConfig) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];

    for (i, doc) in scanned.content.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), doc.data.title()));
        if let Some(fp) = &doc.data.file_path {
            lines.push(format!("{}Source: {}", indent(1), fp));
        }
        match &doc.data.slug {
            Some(slug) => lines.push(format!("{}Slug: {}", indent(1), slug)),
            None => lines.push(format!("{}Slug: (none, skipped)", indent(1))),
        }
        if let Some(desc) = &doc.data.description {
            lines.push(format!("{}Description: {}", indent(1), truncate_desc(desc, 40)));
        }
    }

    let folders = collect_folders(&scanned.content, cfg);
    if !folders.is_empty() {
        let mut counts: BTreeMap<SimpleSlug, usize> = BTreeMap::new();
        for slug in scanned.content.iter().filter_map(|d| d.data.slug.as_ref()) {
            if let Some(key) = folder_key(slug, cfg) {
                *counts.entry(key).or_default() += 1;
            }
        }

        lines.push(String::new());
        lines.push("Folders".to_string());
        for folder in &folders {
            let n = counts.get(folder).copied().unwrap_or(0);
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                folder,
                plural(n, "item", "items")
            ));
        }
    }

    if scanned.drafts > 0 {
        lines.push(String::new());
        lines.push(format!("{} skipped", plural(scanned.drafts, "draft", "drafts")));
    }

    if !scanned.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for w in &scanned.warnings {
            lines.push(format!("{}{}: {}", indent(1), w.path, w.message));
        }
    }

    lines
}

pub fn print_scan_output(scanned: &ScanOutput, cfg: &SiteConfig) {
    for line in format_scan_output(scanned, cfg) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Build output
// ============================================================================

fn format_invalidation(invalidation: &Invalidation) -> String {
    match invalidation {
        Invalidation::Full(reason) => format!("Full rebuild: {reason}"),
        Invalidation::Partial { changed, .. } if changed.is_empty() => {
            "No source changes".to_string()
        }
        Invalidation::Partial { changed, affected } => format!(
            "Rebuilding {} affected by {}",
            plural(affected.len(), "output", "outputs"),
            plural(changed.len(), "changed source", "changed sources"),
        ),
    }
}

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::Scanned { documents, drafts } => {
            let mut line = format!("Scanned {}", plural(*documents, "document", "documents"));
            if *drafts > 0 {
                line.push_str(&format!(" ({} skipped)", plural(*drafts, "draft", "drafts")));
            }
            vec![line]
        }
        BuildEvent::Planned(invalidation) => vec![format_invalidation(invalidation)],
        BuildEvent::EmitterFinished {
            name,
            written,
            failures,
        } => {
            if *failures > 0 {
                vec![format!("{name}: {written} written, {failures} failed")]
            } else {
                vec![format!("{name}: {written} written")]
            }
        }
        BuildEvent::Removed(path) => vec![format!("Removed {path}")],
    }
}

/// Format the end-of-build summary: cache stats, warnings, failures.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!("Pages: {}", report.stats)];

    let warnings: Vec<String> = report
        .scan_warnings
        .iter()
        .map(|w| format!("{}: {}", w.path, w.message))
        .chain(report.warnings().cloned())
        .collect();
    if !warnings.is_empty() {
        lines.push("Warnings".to_string());
        lines.extend(warnings.iter().map(|w| format!("{}{}", indent(1), w)));
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        lines.push("Failures".to_string());
        for f in &failures {
            lines.push(format!("{}{}: {}", indent(1), f.target, f.error));
        }
        lines.push("Manifest not saved; failed pages are retried on the next build".to_string());
    }

    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Dependency graph
// ============================================================================

/// Format the graph as each source followed by the outputs it feeds.
pub fn format_graph(graph: &DepGraph<FilePath>) -> Vec<String> {
    let mut lines = Vec::new();
    for node in graph.nodes() {
        let mut outs = graph.out_neighbors(node).peekable();
        if outs.peek().is_none() {
            continue;
        }
        lines.push(node.to_string());
        for out in outs {
            lines.push(format!("{}\u{2192} {}", indent(1), out));
        }
    }
    lines.push(format!(
        "{}, {}",
        plural(graph.node_count(), "node", "nodes"),
        plural(graph.edge_count(), "edge", "edges")
    ));
    lines
}

pub fn print_graph(graph: &DepGraph<FilePath>) {
    for line in format_graph(graph) {
        println!("{}", line);
    }
}
