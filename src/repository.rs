use crate::ignore_rules::IgnoreSet;
use crate::listing::{DirectoryListing, EntryKind};
use crate::selection::select_files;
use crate::tree::render_tree;
use anyhow::{anyhow, Result};
use derive_builder::Builder;
use std::path::{Path, PathBuf};

/// A snapshot of everything needed to print a repository.
///
/// The ignore rules, the selected files and the directory tree are all computed once
/// when the repository is built; rendering it again reuses the same snapshot.
#[derive(Builder, Debug)]
#[builder(setter(into), build_fn(skip))]
pub struct Repository {
    root: PathBuf,
    /// Defaults to the name of the root folder
    name: String,
    #[builder(setter(skip))]
    ignore_set: IgnoreSet,
    #[builder(setter(skip))]
    source_files: Vec<PathBuf>,
    #[builder(setter(skip))]
    tree: String,
}

impl RepositoryBuilder {
    /// Build the repository snapshot, walking the root through `listing`.
    ///
    /// The root should already be canonical, so that its last component is the real
    /// folder name rather than `.` or `..`.
    pub fn build(&mut self, listing: &dyn DirectoryListing) -> Result<Repository> {
        let root = self
            .root
            .take()
            .ok_or_else(|| anyhow!("Repository root not provided!"))?;

        if listing.kind(&root) != EntryKind::Directory {
            return Err(anyhow!("Invalid folder: {}", root.display()));
        }

        let name = match self.name.take() {
            Some(name) => name,
            None => match root.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => {
                    return Err(anyhow!(
                        "Repository {} doesn't have a name?",
                        root.display()
                    ))
                }
            },
        };

        let ignore_set = IgnoreSet::load(&root)?;
        let source_files = select_files(&root, &ignore_set, listing)?;
        let tree = render_tree(&root, listing)?;
        log::info!(
            "Selected {} files from {}",
            source_files.len(),
            root.display()
        );

        Ok(Repository {
            root,
            name,
            ignore_set,
            source_files,
            tree,
        })
    }
}

impl Repository {
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore_set
    }

    /// The files to print, in document order.
    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    pub fn tree(&self) -> &str {
        self.tree.as_str()
    }

    /// Where the PDF ends up: `<root>/<name>.pdf`.
    pub fn outfile(&self) -> PathBuf {
        self.root.join(format!("{}.pdf", self.name))
    }

    /// `path` relative to the folder containing the repository, so that it starts
    /// with the repository's own name (`myrepo/src/main.py`).
    pub fn display_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        std::iter::once(self.name.clone())
            .chain(
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string()),
            )
            .collect::<Vec<String>>()
            .join("/")
    }
}
