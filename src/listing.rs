//! Directory listing abstraction shared by the file selector and the tree renderer.
//!
//! Both walkers only ever need the direct children of a directory and whether each
//! child is a directory or a regular file. Keeping that behind a trait means the
//! matching and ordering rules can be exercised against an in-memory tree in tests,
//! while production code reads the real filesystem.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What kind of filesystem object an entry is, following symlinks.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EntryKind {
    Directory,
    File,
    /// Sockets, fifos, broken links and anything else that is neither
    Other,
}

/// One direct child of a listed directory.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    /// The final component of the path, lossily converted to UTF-8.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

pub trait DirectoryListing {
    /// List the direct children of `dir`, in no particular order.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;

    /// The kind of a single path.
    fn kind(&self, path: &Path) -> EntryKind;
}

/// Lists directories on the local filesystem.
#[derive(Debug, Default, Copy, Clone)]
pub struct FsListing;

impl DirectoryListing for FsListing {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let read_dir = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory {}", dir.display()))?;

        let mut entries = Vec::default();
        for entry in read_dir {
            let entry = entry
                .with_context(|| format!("Failed to read an entry of {}", dir.display()))?;
            let path = entry.path();
            let kind = self.kind(&path);
            entries.push(Entry { path, kind });
        }
        Ok(entries)
    }

    fn kind(&self, path: &Path) -> EntryKind {
        match std::fs::metadata(path) {
            Ok(m) if m.is_dir() => EntryKind::Directory,
            Ok(m) if m.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        }
    }
}

/// An in-memory directory tree, used to test walkers without touching the disk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryListing {
    kinds: std::collections::BTreeMap<PathBuf, EntryKind>,
}

#[cfg(test)]
impl MemoryListing {
    /// Create a listing rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> MemoryListing {
        let mut listing = MemoryListing::default();
        listing.kinds.insert(root.into(), EntryKind::Directory);
        listing
    }

    /// Add a file, creating any missing parent directories.
    pub fn file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.kinds.insert(path, EntryKind::File);
        self
    }

    /// Add an (empty) directory, creating any missing parent directories.
    pub fn dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.kinds.insert(path, EntryKind::Directory);
        self
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.kinds
                .entry(ancestor.to_path_buf())
                .or_insert(EntryKind::Directory);
        }
    }
}

#[cfg(test)]
impl DirectoryListing for MemoryListing {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        if self.kind(dir) != EntryKind::Directory {
            anyhow::bail!("{} isn't a directory", dir.display());
        }
        // deliberately reversed so callers can't lean on the listing order
        Ok(self
            .kinds
            .iter()
            .rev()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, kind)| Entry {
                path: path.clone(),
                kind: *kind,
            })
            .collect())
    }

    fn kind(&self, path: &Path) -> EntryKind {
        self.kinds.get(path).copied().unwrap_or(EntryKind::Other)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fs_listing_reports_kinds() {
        let tmp = TempDir::new().expect("can create temp dir");
        std::fs::create_dir(tmp.path().join("src")).expect("can create dir");
        std::fs::write(tmp.path().join("main.py"), "print(1)").expect("can write file");

        let mut entries = FsListing.list(tmp.path()).expect("can list temp dir");
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), "main.py");
        assert!(entries[0].is_file());
        assert_eq!(entries[1].name(), "src");
        assert!(entries[1].is_dir());
    }

    #[test]
    fn fs_listing_fails_on_missing_directory() {
        let tmp = TempDir::new().expect("can create temp dir");
        assert!(FsListing.list(&tmp.path().join("nope")).is_err());
        assert_eq!(FsListing.kind(&tmp.path().join("nope")), EntryKind::Other);
    }

    #[test]
    fn memory_listing_creates_parents() {
        let listing = MemoryListing::new("/repo").file("/repo/src/pkg/mod.py");
        assert_eq!(listing.kind(Path::new("/repo/src")), EntryKind::Directory);
        assert_eq!(listing.kind(Path::new("/repo/src/pkg")), EntryKind::Directory);

        let children = listing.list(Path::new("/repo/src")).expect("can list");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), "pkg");
    }
}
