//! Assembling the highlighted fragments into one document and composing the PDF.
//!
//! Each selected file (and the directory tree, which always comes first) becomes a
//! self-contained HTML fragment tagged with a sequence index. Fragments are merged in
//! index order into a single shell document, which is written to a scratch directory
//! and handed to the compositor. The scratch directory is removed on every exit path.

use crate::compositor::{Compositor, PageOptions};
use crate::config::Style;
use crate::highlight::Highlighter;
use crate::repository::Repository;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

const SHELL_OPEN: &str = "<html><head></head><body>";
const SHELL_CLOSE: &str = "</body></html>";

/// Name of the pseudo-file the directory tree is rendered as.
const TREE_FRAGMENT_NAME: &str = "tree.txt";
const MERGED_FILE_NAME: &str = "merged.html";

/// One rendered, self-contained HTML document.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Fragment {
    /// Position in the final document; the tree is 0, files count up from 1
    pub index: usize,
    pub name: String,
    pub html: String,
}

/// Merge fragments into the shell document, ordered by their index.
pub fn merge(mut fragments: Vec<Fragment>) -> String {
    fragments.sort_by_key(|f| f.index);

    let capacity = fragments.iter().map(|f| f.html.len()).sum::<usize>()
        + SHELL_OPEN.len()
        + SHELL_CLOSE.len();
    let mut document = String::with_capacity(capacity);
    document.push_str(SHELL_OPEN);
    for fragment in fragments.iter() {
        log::trace!("Merging fragment {} ({})", fragment.index, fragment.name);
        document.push_str(&fragment.html);
    }
    document.push_str(SHELL_CLOSE);
    document
}

/// The text printed for a source file: a header line naming it, then its contents.
///
/// Empty files get a marker instead so that they still show up in the document.
pub fn file_body(header: &str, full_path: &Path, contents: &str) -> String {
    if contents.is_empty() {
        format!("{}\nEmpty File", full_path.display())
    } else {
        format!("{header}\n{contents}")
    }
}

/// Statistics from rendering a PDF, used for user feedback.
#[derive(Debug)]
pub struct RenderStats {
    pub outfile: PathBuf,
    /// Number of fragments merged, including the tree
    pub fragment_count: usize,
    /// Size of the produced PDF
    pub bytes: u64,
}

impl RenderStats {
    pub fn summary(&self) -> String {
        let size = byte_unit::Byte::from_u64(self.bytes)
            .get_appropriate_unit(byte_unit::UnitType::Binary);
        format!(
            "File {} generated with success! ({size:.1}, {} files)",
            self.outfile.display(),
            self.fragment_count - 1
        )
    }
}

pub struct Assembler<'a> {
    highlighter: &'a Highlighter,
    compositor: &'a dyn Compositor,
    style: Style,
    page: PageOptions,
}

impl<'a> Assembler<'a> {
    pub fn new(
        highlighter: &'a Highlighter,
        compositor: &'a dyn Compositor,
        style: Style,
        page: PageOptions,
    ) -> Assembler<'a> {
        Assembler {
            highlighter,
            compositor,
            style,
            page,
        }
    }

    /// Highlight the tree and every selected file of `repo`, in document order.
    pub fn fragments(&self, repo: &Repository, progress: &ProgressBar) -> Result<Vec<Fragment>> {
        let mut fragments = Vec::with_capacity(repo.source_files().len() + 1);

        progress.set_message("Rendering tree...");
        fragments.push(Fragment {
            index: 0,
            name: TREE_FRAGMENT_NAME.to_string(),
            html: self
                .highlighter
                .render(repo.tree(), TREE_FRAGMENT_NAME, self.style)
                .with_context(|| "Failed to render the directory tree")?,
        });
        progress.inc(1);

        for (i, path) in repo.source_files().iter().enumerate() {
            let header = repo.display_path(path);
            progress.set_message(header.clone());

            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {} as UTF-8 text", path.display()))?;
            let body = file_body(&header, path, &contents);

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| header.clone());
            let html = self
                .highlighter
                .render(&body, &name, self.style)
                .with_context(|| format!("Failed to render {}", path.display()))?;
            log::debug!("Rendered {header} ({} bytes of HTML)", html.len());

            fragments.push(Fragment {
                index: i + 1,
                name,
                html,
            });
            progress.inc(1);
        }

        Ok(fragments)
    }

    /// Render `repo` to `<root>/<name>.pdf`, replacing any previous PDF.
    pub fn render(&self, repo: &Repository, progress: &ProgressBar) -> Result<RenderStats> {
        progress.set_length(repo.source_files().len() as u64 + 1);

        let scratch = tempfile::Builder::new()
            .prefix("repo-to-pdf-")
            .tempdir()
            .with_context(|| "Failed to create a temporary directory")?;

        let fragments = self.fragments(repo, progress)?;
        let fragment_count = fragments.len();
        let document = merge(fragments);

        let merged = scratch.path().join(MERGED_FILE_NAME);
        std::fs::write(&merged, &document)
            .with_context(|| format!("Failed to write {}", merged.display()))?;
        log::debug!(
            "Merged {fragment_count} fragments into {} ({} bytes)",
            merged.display(),
            document.len()
        );

        progress.set_message("Composing PDF...");
        let outfile = repo.outfile();
        self.compositor
            .compose(&merged, &outfile, &self.page)
            .with_context(|| format!("Failed to compose {}", outfile.display()))?;

        let bytes = std::fs::metadata(&outfile)
            .with_context(|| format!("Failed to inspect {}", outfile.display()))?
            .len();

        Ok(RenderStats {
            outfile,
            fragment_count,
            bytes,
        })
    }
}
