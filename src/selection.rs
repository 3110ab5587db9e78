//! Choosing which files of a repository get printed, and in what order.

use crate::ignore_rules::IgnoreSet;
use crate::listing::DirectoryListing;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Walk `root` depth-first, siblings sorted by name, and return every regular file
/// the ignore rules don't exclude, in pre-order.
pub fn select_files(
    root: &Path,
    rules: &IgnoreSet,
    listing: &dyn DirectoryListing,
) -> Result<Vec<PathBuf>> {
    let mut selected = Vec::default();
    collect(root, rules, listing, &mut selected)
        .with_context(|| format!("Failed to select files in {}", root.display()))?;
    Ok(selected)
}

fn collect(
    dir: &Path,
    rules: &IgnoreSet,
    listing: &dyn DirectoryListing,
    selected: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut entries = listing.list(dir)?;
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    for entry in entries {
        let name = entry.name();
        if rules.must_ignore(&name, entry.kind) {
            log::trace!("Ignoring {}", entry.path.display());
            continue;
        }

        if entry.is_dir() {
            collect(&entry.path, rules, listing, selected)?;
        } else if entry.is_file() {
            selected.push(entry.path);
        }
    }

    Ok(())
}
