//! Site navigation tree.
//!
//! The tree is rebuilt from `all_files` on every render and then shaped by
//! three caller-supplied hooks, applied level by level:
//!
//! 1. `filter` drops nodes (and their whole subtree).
//! 2. `sort` orders the survivors. The sort is stable, so equal nodes keep
//!    their insertion order.
//! 3. `map` adjusts each surviving node, typically its display label.
//!
//! The hooks are plain closures fixed when the component is built; the
//! component itself keeps no state between renders.

use super::{Component, ComponentProps, class_names};
use crate::content::FileData;
use crate::i18n::translation;
use crate::path::{FullSlug, resolve_relative};
use maud::{Markup, html};
use std::cmp::Ordering;
use std::sync::Arc;

const EXPLORER_CSS: &str = include_str!("../../static/explorer.css");
const EXPLORER_JS: &str = include_str!("../../static/explorer.js");

/// One entry in the navigation tree.
#[derive(Debug, Clone)]
pub struct FileNode<'a> {
    /// Last path segment (`notes`, `my-note`).
    pub name: String,
    /// Label shown in the tree.
    pub display_name: String,
    /// Slash-joined path from the root (`a/b`), without `index`.
    pub path: String,
    /// The document behind this node. For folders, their index document.
    pub file: Option<&'a FileData>,
    pub is_folder: bool,
    pub children: Vec<FileNode<'a>>,
}

impl<'a> FileNode<'a> {
    fn folder(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            display_name: name.to_string(),
            path,
            file: None,
            is_folder: true,
            children: Vec::new(),
        }
    }

    fn child_folder(&mut self, name: &str) -> &mut FileNode<'a> {
        let pos = match self
            .children
            .iter()
            .position(|c| c.is_folder && c.name == name)
        {
            Some(pos) => pos,
            None => {
                let path = if self.path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", self.path, name)
                };
                self.children.push(FileNode::folder(name, path));
                self.children.len() - 1
            }
        };
        &mut self.children[pos]
    }

    fn insert(&mut self, slug: &FullSlug, data: &'a FileData) {
        let segments: Vec<&str> = slug.as_str().split('/').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut node = self;
        for segment in parents {
            node = node.child_folder(segment);
        }

        if *last == "index" {
            // Root index has no node of its own.
            if !node.path.is_empty() {
                node.file = Some(data);
                if let Some(title) = &data.frontmatter.title {
                    node.display_name = title.clone();
                }
            }
            return;
        }

        node.children.push(FileNode {
            name: last.to_string(),
            display_name: data.title().to_string(),
            path: slug.as_str().to_string(),
            file: Some(data),
            is_folder: false,
            children: Vec::new(),
        });
    }

    /// Page this node links to.
    fn target(&self) -> Option<FullSlug> {
        if self.is_folder {
            FullSlug::new(&format!("{}/index", self.path)).ok()
        } else {
            self.file.and_then(|f| f.slug.clone())
        }
    }
}

pub type SortFn = Arc<dyn Fn(&FileNode<'_>, &FileNode<'_>) -> Ordering + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(&FileNode<'_>) -> bool + Send + Sync>;
pub type MapFn = Arc<dyn Fn(&mut FileNode<'_>) + Send + Sync>;

/// Folders before files, then case-insensitive label order.
pub fn folders_first(a: &FileNode<'_>, b: &FileNode<'_>) -> Ordering {
    b.is_folder.cmp(&a.is_folder).then_with(|| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
    })
}

fn hide_tags(node: &FileNode<'_>) -> bool {
    node.name != "tags"
}

fn keep_label(_node: &mut FileNode<'_>) {}

#[derive(Clone)]
pub struct ExplorerOptions {
    /// Heading above the tree. `None` uses the locale's label.
    pub title: Option<String>,
    pub sort: SortFn,
    pub filter: FilterFn,
    pub map: MapFn,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            title: None,
            sort: Arc::new(folders_first),
            filter: Arc::new(hide_tags),
            map: Arc::new(keep_label),
        }
    }
}

impl ExplorerOptions {
    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(&FileNode<'_>, &FileNode<'_>) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Arc::new(sort);
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&FileNode<'_>) -> bool + Send + Sync + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    pub fn with_map<F>(mut self, map: F) -> Self
    where
        F: Fn(&mut FileNode<'_>) + Send + Sync + 'static,
    {
        self.map = Arc::new(map);
        self
    }
}

/// Build the raw tree rooted at the site root. Documents without a slug are skipped.
pub fn build_tree<'a>(all_files: &[&'a FileData]) -> FileNode<'a> {
    let mut root = FileNode::folder("", String::new());
    for &data in all_files {
        if let Some(slug) = &data.slug {
            root.insert(slug, data);
        }
    }
    root
}

/// Filter, sort and map `nodes` and then every surviving subtree.
pub fn apply_hooks(nodes: &mut Vec<FileNode<'_>>, options: &ExplorerOptions) {
    nodes.retain(|node| (options.filter)(node));
    nodes.sort_by(|a, b| (options.sort)(a, b));
    for node in nodes.iter_mut() {
        (options.map)(node);
        apply_hooks(&mut node.children, options);
    }
}

pub struct Explorer {
    options: ExplorerOptions,
}

impl Explorer {
    pub fn new(options: ExplorerOptions) -> Self {
        Self { options }
    }

    /// The shaped tree for a set of documents.
    pub fn tree<'a>(&self, all_files: &[&'a FileData]) -> FileNode<'a> {
        let mut root = build_tree(all_files);
        apply_hooks(&mut root.children, &self.options);
        root
    }
}

fn render_node(node: &FileNode<'_>, current: &FullSlug) -> Markup {
    let target = node.target();
    let href = target.as_ref().map(|t| String::from(resolve_relative(current, t)));
    let active = target.as_ref() == Some(current);

    html! {
        @if node.is_folder {
            li.folder {
                details open {
                    summary {
                        @if let Some(href) = &href {
                            a href=(href) class=[active.then_some("active")] { (node.display_name) }
                        }
                    }
                    ul {
                        @for child in &node.children {
                            (render_node(child, current))
                        }
                    }
                }
            }
        } @else {
            li {
                @if let Some(href) = &href {
                    a href=(href) class=[active.then_some("active")] { (node.display_name) }
                } @else {
                    span { (node.display_name) }
                }
            }
        }
    }
}

impl Component for Explorer {
    fn name(&self) -> &'static str {
        "Explorer"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let files: Vec<&FileData> = props.all_files.iter().map(|c| &c.data).collect();
        let root = self.tree(&files);
        let title = self
            .options
            .title
            .clone()
            .unwrap_or_else(|| translation(&props.ctx.cfg.locale).explorer.to_string());

        html! {
            div class=(class_names(props.display_class, "explorer")) {
                button.explorer-toggle type="button" aria-expanded="true" { (title) }
                ul.explorer-ul {
                    @for node in &root.children {
                        (render_node(node, props.slug))
                    }
                }
            }
        }
    }

    fn css(&self) -> Option<&'static str> {
        Some(EXPLORER_CSS)
    }

    fn after_dom_loaded(&self) -> Option<&'static str> {
        Some(EXPLORER_JS)
    }
}
