//! Folder grouping and folder page synthesis.
//!
//! Every document sits in a folder: the parent directory of its slug. Each
//! distinct folder (other than the root and reserved names) gets one folder
//! page. The page's document is the folder's explicit index document when
//! one exists (`notes/index.md`), otherwise a synthesized placeholder.
//!
//! Grouping runs in two phases so the result never depends on input order:
//!
//! 1. Collect the set of folder keys and create a placeholder for each.
//! 2. Overlay explicit documents. When two documents describe the same
//!    folder, the one with the smallest source path wins and the other is
//!    reported as a [`GroupConflict`].

use crate::config::SiteConfig;
use crate::content::{FileData, Frontmatter, ProcessedContent, default_processed_content};
use crate::i18n::translation;
use crate::path::{
    FilePath, FullSlug, SimpleSlug, folder_of, join_segments, simplify_slug, strip_slashes,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Folder key of a document, if it belongs to a folder that gets a page.
///
/// The root folder and folders whose name matches a reserved name are
/// excluded. Reserved names match the whole key (`tags`), not nested
/// occurrences (`notes/tags`).
pub fn folder_key(slug: &FullSlug, cfg: &SiteConfig) -> Option<SimpleSlug> {
    let folder = folder_of(slug)?;
    if folder.is_empty() || folder == "." || cfg.is_reserved(folder) {
        return None;
    }
    Some(SimpleSlug::from_folder(folder))
}

/// Distinct folder keys across all published documents. Drafts never create
/// a folder.
pub fn collect_folders<'a>(
    content: impl IntoIterator<Item = &'a ProcessedContent>,
    cfg: &SiteConfig,
) -> BTreeSet<SimpleSlug> {
    content
        .into_iter()
        .filter(|c| !c.data.frontmatter.draft)
        .filter_map(|c| c.data.slug.as_ref())
        .filter_map(|slug| folder_key(slug, cfg))
        .collect()
}

/// The folder a document describes, if it is an explicit folder document.
///
/// A slug equal to `<key>/index` describes `key` as written, so
/// `x/index/index` describes the folder `x/index`. Otherwise the simplified
/// slug must equal one of `folders`: `a/topic` describes `a/topic`. The root
/// index never matches because the root sentinel is never a folder key.
/// Drafts describe nothing.
pub fn described_folder<'a>(
    data: &FileData,
    folders: &'a BTreeSet<SimpleSlug>,
) -> Option<&'a SimpleSlug> {
    if data.frontmatter.draft {
        return None;
    }
    let slug = data.slug.as_ref()?;
    let literal = slug
        .as_str()
        .strip_suffix("/index")
        .and_then(|parent| folders.iter().find(|f| f.as_str() == parent));
    if literal.is_some() {
        return literal;
    }
    let simple = simplify_slug(slug);
    let key = strip_slashes(simple.as_str());
    folders.iter().find(|f| f.as_str() == key)
}

/// Whether `data` is the index document of a folder that gets a folder page.
pub fn is_folder_index(data: &FileData, folders: &BTreeSet<SimpleSlug>) -> bool {
    data.slug.as_ref().is_some_and(FullSlug::is_index) && described_folder(data, folders).is_some()
}

/// Output path of a folder's page.
pub fn folder_output_path(key: &SimpleSlug) -> Option<FilePath> {
    FilePath::new(&join_segments(&[key.as_str(), "index.html"])).ok()
}

/// Two documents claiming the same folder. The winner is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConflict {
    pub folder: SimpleSlug,
    pub kept: String,
    pub dropped: String,
}

#[derive(Debug, Default)]
pub struct FolderGroups {
    pub descriptions: BTreeMap<SimpleSlug, ProcessedContent>,
    pub conflicts: Vec<GroupConflict>,
}

fn source_label(data: &FileData) -> String {
    match (&data.file_path, &data.slug) {
        (Some(fp), _) => fp.to_string(),
        (None, Some(slug)) => slug.to_string(),
        (None, None) => String::new(),
    }
}

/// Which of two explicit documents for one folder wins.
///
/// Documents with a source path beat synthetic ones; among those the smaller
/// path wins; remaining ties go to the smaller slug.
fn precedence(a: &FileData, b: &FileData) -> Ordering {
    match (&a.file_path, &b.file_path) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.slug.cmp(&b.slug))
}

/// Placeholder document for a folder without an explicit one.
fn placeholder(key: &SimpleSlug, cfg: &SiteConfig) -> Option<ProcessedContent> {
    let slug = FullSlug::new(&join_segments(&[key.as_str(), "index"])).ok()?;
    let frontmatter = Frontmatter {
        title: Some(translation(&cfg.locale).folder_title(key.as_str())),
        tags: Vec::new(),
        ..Default::default()
    };
    Some(default_processed_content(slug, frontmatter))
}

/// Group documents into one description per folder.
pub fn folder_descriptions(content: &[ProcessedContent], cfg: &SiteConfig) -> FolderGroups {
    let folders = collect_folders(content, cfg);

    let mut descriptions: BTreeMap<SimpleSlug, ProcessedContent> = folders
        .iter()
        .filter_map(|key| placeholder(key, cfg).map(|p| (key.clone(), p)))
        .collect();

    let mut explicit: BTreeMap<SimpleSlug, &ProcessedContent> = BTreeMap::new();
    let mut conflicts = Vec::new();
    for doc in content {
        let Some(key) = described_folder(&doc.data, &folders) else {
            continue;
        };
        match explicit.get(key).copied() {
            None => {
                explicit.insert(key.clone(), doc);
            }
            Some(current) => {
                let (kept, dropped) = if precedence(&doc.data, &current.data) == Ordering::Less {
                    (doc, current)
                } else {
                    (current, doc)
                };
                conflicts.push(GroupConflict {
                    folder: key.clone(),
                    kept: source_label(&kept.data),
                    dropped: source_label(&dropped.data),
                });
                explicit.insert(key.clone(), kept);
            }
        }
    }

    for (key, doc) in explicit {
        descriptions.insert(key, doc.clone());
    }

    // Input order decides which losers are compared against which winner;
    // sort so the reported set is stable.
    conflicts.sort_by(|a, b| (&a.folder, &a.dropped).cmp(&(&b.folder, &b.dropped)));
    for conflict in &mut conflicts {
        if let Some(winner) = descriptions.get(&conflict.folder) {
            conflict.kept = source_label(&winner.data);
        }
    }

    FolderGroups {
        descriptions,
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{doc, synthetic};

    fn cfg() -> SiteConfig {
        SiteConfig::default()
    }

    fn keys(groups: &FolderGroups) -> Vec<&str> {
        groups.descriptions.keys().map(SimpleSlug::as_str).collect()
    }

    #[test]
    fn folder_key_excludes_root_and_reserved() {
        let c = cfg();
        assert_eq!(folder_key(&FullSlug::new("note").unwrap(), &c), None);
        assert_eq!(folder_key(&FullSlug::new("tags/rust").unwrap(), &c), None);
        assert_eq!(
            folder_key(&FullSlug::new("notes/tags/x").unwrap(), &c).unwrap().as_str(),
            "notes/tags"
        );
        assert_eq!(
            folder_key(&FullSlug::new("a/b/c").unwrap(), &c).unwrap().as_str(),
            "a/b"
        );
    }

    #[test]
    fn placeholders_for_folders_without_index() {
        let content = vec![
            doc("a/note1", "a/note1.md", "One"),
            doc("a/note2", "a/note2.md", "Two"),
        ];
        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(keys(&groups), vec!["a"]);
        let a = &groups.descriptions[&SimpleSlug::from_folder("a")];
        assert_eq!(a.data.frontmatter.title.as_deref(), Some("Folder: a"));
        assert!(a.data.frontmatter.tags.is_empty());
        assert!(a.tree.is_empty());
        assert_eq!(a.data.slug.as_ref().unwrap().as_str(), "a/index");
    }

    #[test]
    fn explicit_index_replaces_placeholder() {
        let mut index = doc("b/index", "b/index.md", "About B");
        index.tree.html = "<p>B</p>".to_string();
        let content = vec![index.clone(), doc("b/x", "b/x.md", "X")];
        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(groups.descriptions[&SimpleSlug::from_folder("b")], index);
        assert!(groups.conflicts.is_empty());
    }

    #[test]
    fn explicit_index_creates_its_own_folder() {
        let content = vec![doc("b/index", "b/index.md", "B")];
        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(keys(&groups), vec!["b"]);
        assert_eq!(
            groups.descriptions[&SimpleSlug::from_folder("b")].data.title(),
            "B"
        );
    }

    #[test]
    fn grouping_is_order_independent() {
        let content = vec![
            doc("a/note1", "a/note1.md", "One"),
            doc("b/index", "b/index.md", "B"),
            doc("a/c/deep", "a/c/deep.md", "Deep"),
            doc("top", "top.md", "Top"),
            doc("tags/t", "tags/t.md", "T"),
        ];
        let forward = folder_descriptions(&content, &cfg());
        let mut reversed = content.clone();
        reversed.reverse();
        let backward = folder_descriptions(&reversed, &cfg());
        assert_eq!(forward.descriptions, backward.descriptions);
        assert_eq!(keys(&forward), vec!["a", "a/c", "b"]);
    }

    #[test]
    fn conflicting_descriptions_pick_smallest_path() {
        let md = doc("a/index", "a/index.md", "Markdown");
        let underscore = doc("a/index", "a/_index.md", "Underscore");
        let orders = [
            vec![md.clone(), underscore.clone(), doc("a/n", "a/n.md", "N")],
            vec![underscore.clone(), doc("a/n", "a/n.md", "N"), md.clone()],
        ];
        for content in orders {
            let groups = folder_descriptions(&content, &cfg());
            let a = &groups.descriptions[&SimpleSlug::from_folder("a")];
            assert_eq!(a.data.title(), "Underscore");
            assert_eq!(
                groups.conflicts,
                vec![GroupConflict {
                    folder: SimpleSlug::from_folder("a"),
                    kept: "a/_index.md".to_string(),
                    dropped: "a/index.md".to_string(),
                }]
            );
        }
    }

    #[test]
    fn synthetic_documents_lose_to_sourced_ones() {
        let content = vec![synthetic("a/index", "Synthetic"), doc("a/index", "a/index.md", "Real")];
        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(
            groups.descriptions[&SimpleSlug::from_folder("a")].data.title(),
            "Real"
        );
    }

    #[test]
    fn slugless_documents_are_skipped() {
        let mut broken = doc("a/x", "a/x.md", "X");
        broken.data.slug = None;
        let groups = folder_descriptions(&[broken], &cfg());
        assert!(groups.descriptions.is_empty());
    }

    #[test]
    fn folder_index_detection() {
        let content = vec![
            doc("index", "index.md", "Home"),
            doc("a/index", "a/index.md", "A"),
            doc("a/note", "a/note.md", "N"),
        ];
        let folders = collect_folders(&content, &cfg());
        assert!(!is_folder_index(&content[0].data, &folders));
        assert!(is_folder_index(&content[1].data, &folders));
        assert!(!is_folder_index(&content[2].data, &folders));
    }

    #[test]
    fn folder_named_index_is_described_by_its_own_index() {
        let content = vec![
            doc("x/index/index", "x/index/index.md", "Nested"),
            doc("ok", "ok.md", "Ok"),
        ];
        let folders = collect_folders(&content, &cfg());
        let key = described_folder(&content[0].data, &folders).unwrap();
        assert_eq!(key.as_str(), "x/index");
        assert!(is_folder_index(&content[0].data, &folders));

        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(keys(&groups), vec!["x/index"]);
        assert_eq!(
            groups.descriptions[&SimpleSlug::from_folder("x/index")].data.title(),
            "Nested"
        );
    }

    #[test]
    fn literal_index_match_beats_simplified_match() {
        let content = vec![
            doc("x/index/index", "x/index/index.md", "Nested"),
            doc("x/note", "x/note.md", "Note"),
        ];
        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(keys(&groups), vec!["x", "x/index"]);
        assert_eq!(
            groups.descriptions[&SimpleSlug::from_folder("x")].data.title(),
            "Folder: x"
        );
        assert!(groups.conflicts.is_empty());
    }

    #[test]
    fn drafts_neither_create_nor_describe_folders() {
        let mut wip = doc("d/note", "d/note.md", "WIP");
        wip.data.frontmatter.draft = true;
        let mut draft_index = doc("a/index", "a/index.md", "Draft A");
        draft_index.data.frontmatter.draft = true;
        let content = vec![wip, draft_index, doc("a/n", "a/n.md", "N")];

        let groups = folder_descriptions(&content, &cfg());
        assert_eq!(keys(&groups), vec!["a"]);
        assert_eq!(
            groups.descriptions[&SimpleSlug::from_folder("a")].data.title(),
            "Folder: a"
        );
        assert!(groups.conflicts.is_empty());
    }

    #[test]
    fn output_path_for_folder() {
        let key = SimpleSlug::from_folder("a/b");
        assert_eq!(folder_output_path(&key).unwrap().as_str(), "a/b/index.html");
    }
}
