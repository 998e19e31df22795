use super::{Component, ComponentProps, class_names};
use crate::content::FileData;
use crate::i18n::translation;
use crate::path::{FullSlug, folder_of, resolve_relative, simplify_slug};
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeMap;

const LISTING_CSS: &str = include_str!("../../static/listing.css");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub target: FullSlug,
    pub is_folder: bool,
}

/// Direct children of `folder` (`""` for the root): its documents and its
/// immediate subfolders, folders first, then case-insensitive title order.
pub fn folder_listing(folder: &str, all_files: &[&FileData]) -> Vec<ListingEntry> {
    let mut pages = Vec::new();
    let mut subfolders: BTreeMap<String, Option<String>> = BTreeMap::new();

    for data in all_files {
        let Some(slug) = &data.slug else { continue };
        let parent = folder_of(slug).unwrap_or("");

        if parent == folder {
            if !slug.is_index() {
                pages.push(ListingEntry {
                    title: data.title().to_string(),
                    target: slug.clone(),
                    is_folder: false,
                });
            }
            continue;
        }

        let rest = if folder.is_empty() {
            Some(parent)
        } else {
            parent
                .strip_prefix(folder)
                .and_then(|r| r.strip_prefix('/'))
        };
        let Some(rest) = rest else { continue };
        let child = rest.split('/').next().unwrap_or(rest);
        let child_path = if folder.is_empty() {
            child.to_string()
        } else {
            format!("{folder}/{child}")
        };

        let entry = subfolders.entry(child_path.clone()).or_default();
        let describes_child = slug.is_index() && simplify_slug(slug).as_str() == child_path;
        if describes_child && let Some(title) = &data.frontmatter.title {
            *entry = Some(title.clone());
        }
    }

    let mut entries: Vec<ListingEntry> = subfolders
        .into_iter()
        .filter_map(|(path, title)| {
            let target = FullSlug::new(&format!("{path}/index")).ok()?;
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            Some(ListingEntry {
                title: title.unwrap_or(name),
                target,
                is_folder: true,
            })
        })
        .collect();
    entries.extend(pages);
    entries.sort_by(|a, b| {
        b.is_folder
            .cmp(&a.is_folder)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    entries
}

/// Body of a folder page: the folder's own text followed by a listing.
pub struct FolderContent;

impl Component for FolderContent {
    fn name(&self) -> &'static str {
        "FolderContent"
    }

    fn render(&self, props: &ComponentProps<'_>, _children: &[Markup]) -> Markup {
        let simple = simplify_slug(props.slug);
        let folder = if simple.is_root() { "" } else { simple.as_str() };
        let files: Vec<&FileData> = props.all_files.iter().map(|c| &c.data).collect();
        let entries = folder_listing(folder, &files);
        let t = translation(&props.ctx.cfg.locale);

        html! {
            div class=(class_names(props.display_class, "folder-content")) {
                @if !props.tree.is_empty() {
                    article { (PreEscaped(props.tree.html.as_str())) }
                }
                p.item-count { (t.items_under_folder(entries.len())) }
                ul.section-ul {
                    @for entry in &entries {
                        li class=[entry.is_folder.then_some("folder")] {
                            a href=(resolve_relative(props.slug, &entry.target).as_str()) {
                                (entry.title)
                            }
                        }
                    }
                }
            }
        }
    }

    fn css(&self) -> Option<&'static str> {
        Some(LISTING_CSS)
    }
}
