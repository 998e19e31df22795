//! Stylesheets and scripts referenced by rendered pages.
//!
//! A build has one set of [`StaticResources`] (root-relative). Each page gets
//! its own [`PageResources`], with every root-relative path rewritten through
//! [`path_to_root`](crate::path::path_to_root) so a page at any nesting depth
//! can load the same files.

use crate::path::{RelativeSlug, join_segments};

/// Bundled stylesheet written by the component-resources emitter.
pub const INDEX_CSS: &str = "index.css";
/// Scripts that must run before the DOM is parsed.
pub const PRESCRIPT_JS: &str = "prescript.js";
/// Scripts that run once the DOM has loaded.
pub const POSTSCRIPT_JS: &str = "postscript.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTime {
    BeforeDomReady,
    AfterDomReady,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsResource {
    pub src: String,
    pub load_time: LoadTime,
}

/// Root-relative resources shared by every page of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticResources {
    pub css: Vec<String>,
    pub js: Vec<JsResource>,
}

impl StaticResources {
    /// Resources every page loads: the bundled stylesheet and both script bundles.
    pub fn bundled() -> Self {
        Self {
            css: vec![INDEX_CSS.to_string()],
            js: vec![
                JsResource {
                    src: PRESCRIPT_JS.to_string(),
                    load_time: LoadTime::BeforeDomReady,
                },
                JsResource {
                    src: POSTSCRIPT_JS.to_string(),
                    load_time: LoadTime::AfterDomReady,
                },
            ],
        }
    }
}

/// Resources as seen from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResources {
    pub css: Vec<String>,
    pub js: Vec<JsResource>,
}

impl PageResources {
    pub fn scripts(&self, load_time: LoadTime) -> impl Iterator<Item = &JsResource> {
        self.js.iter().filter(move |js| js.load_time == load_time)
    }
}

fn is_absolute_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("//")
}

/// Rewrite root-relative resources for a page whose root is `base_dir`.
///
/// Absolute URLs pass through untouched.
pub fn page_resources(base_dir: &RelativeSlug, resources: &StaticResources) -> PageResources {
    let relocate = |src: &str| {
        if is_absolute_url(src) {
            src.to_string()
        } else {
            join_segments(&[base_dir.as_str(), src])
        }
    };

    PageResources {
        css: resources.css.iter().map(|c| relocate(c)).collect(),
        js: resources
            .js
            .iter()
            .map(|js| JsResource {
                src: relocate(&js.src),
                load_time: js.load_time,
            })
            .collect(),
    }
}
