//! Output writing shared by the page emitters.
//!
//! [`OutputWriter`] is the seam between rendering and the filesystem. The
//! production writer is [`FsWriter`]; the pipeline wraps it in an
//! incremental writer, and tests use a recording mock.

use super::{BuildCtx, EmitError, EmitFailure, EmitOutcome};
use crate::components::ComponentProps;
use crate::content::{FileData, ProcessedContent, Tree};
use crate::layout::{Frames, FullPageLayout};
use crate::path::{FilePath, FullSlug, PathError, path_to_root};
use crate::render::render_page;
use crate::resources::{StaticResources, page_resources};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid output path: {0}")]
    Path(#[from] PathError),
}

pub trait OutputWriter: Sync {
    /// Write `content` to `<slug><ext>` under the output root and return
    /// that path relative to the root.
    fn write(&self, slug: &FullSlug, ext: &str, content: &str) -> Result<FilePath, WriteError>;

    /// Whether the output at `path` is already current and can be left as is.
    /// Pages that are fresh are neither rendered nor written.
    fn is_fresh(&self, _path: &FilePath) -> bool {
        false
    }
}

/// Output path a slug and extension map to.
pub fn output_path(slug: &FullSlug, ext: &str) -> Result<FilePath, PathError> {
    FilePath::new(&format!("{slug}{ext}"))
}

/// Writes straight to disk, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FsWriter {
    pub output_dir: PathBuf,
}

impl FsWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl OutputWriter for FsWriter {
    fn write(&self, slug: &FullSlug, ext: &str, content: &str) -> Result<FilePath, WriteError> {
        let rel = output_path(slug, ext)?;
        let dest = self.output_dir.join(rel.as_str());
        let io_err = |source| WriteError::Io {
            path: rel.to_string(),
            source,
        };
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&dest, content).map_err(io_err)?;
        Ok(rel)
    }
}

/// One page to render: the address it is written to and the document shown.
pub struct PageJob<'a> {
    pub slug: FullSlug,
    pub file_data: &'a FileData,
    pub tree: &'a Tree,
}

/// Render a page with `layout` and write it as `<slug>.html`.
pub fn render_and_write(
    ctx: &BuildCtx,
    job: &PageJob<'_>,
    content: &[ProcessedContent],
    resources: &StaticResources,
    layout: &FullPageLayout,
    frames: &Frames,
    writer: &dyn OutputWriter,
) -> Result<FilePath, EmitError> {
    let target = output_path(&job.slug, ".html").map_err(WriteError::from)?;
    if writer.is_fresh(&target) {
        return Ok(target);
    }
    let page_res = page_resources(&path_to_root(&job.slug), resources);
    let props = ComponentProps {
        ctx,
        slug: &job.slug,
        file_data: job.file_data,
        tree: job.tree,
        all_files: content,
        resources: &page_res,
        display_class: None,
    };
    // A panicking component (e.g. an explorer hook) fails this page only.
    let html = panic::catch_unwind(AssertUnwindSafe(|| {
        render_page(&props, layout, frames).into_string()
    }))
    .map_err(|payload| EmitError::Render(panic_message(payload.as_ref())))?;
    Ok(writer.write(&job.slug, ".html", &html)?)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "component panicked".to_string()
    }
}

/// Fold per-page results into an outcome.
pub fn collect_outcome(
    results: Vec<(String, Result<FilePath, EmitError>)>,
    warnings: Vec<String>,
) -> EmitOutcome {
    let mut outcome = EmitOutcome {
        warnings,
        ..Default::default()
    };
    for (target, result) in results {
        match result {
            Ok(path) => outcome.written.push(path),
            Err(error) => outcome.failures.push(EmitFailure { target, error }),
        }
    }
    outcome.sorted()
}
