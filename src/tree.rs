//! ASCII directory tree printed at the start of the document.
//!
//! The tree deliberately uses its own, looser filter than the ignore rules: it only
//! hides dotfiles and dunder entries, so it can show files the PDF body leaves out.

use crate::listing::DirectoryListing;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::rc::Rc;

const CONNECTOR_MIDDLE: &str = "├──";
const CONNECTOR_LAST: &str = "└──";
const INDENT_AFTER_LAST: &str = "    ";
const INDENT_AFTER_MIDDLE: &str = "│   ";

/// Names hidden from the tree on top of the dot/dunder prefixes.
const HIDDEN_NAMES: &[&str] = &["__pycache__/", "__init__.py"];

/// Whether an entry called `name` shows up in the tree.
pub fn is_visible(name: &str) -> bool {
    !(name.starts_with('.') || name.starts_with("__") || HIDDEN_NAMES.contains(&name))
}

/// A node of the tree, knowing enough about its ancestry to render its own line.
#[derive(Debug)]
pub struct DisplayablePath {
    pub path: PathBuf,
    pub is_dir: bool,
    pub parent: Option<Rc<DisplayablePath>>,
    pub is_last: bool,
    pub depth: usize,
}

impl DisplayablePath {
    fn new(path: PathBuf, is_dir: bool, parent: Option<Rc<DisplayablePath>>, is_last: bool) -> Self {
        let depth = parent.as_ref().map(|p| p.depth + 1).unwrap_or(0);
        DisplayablePath {
            path,
            is_dir,
            parent,
            is_last,
            depth,
        }
    }

    /// The file name, with a trailing `/` for directories.
    pub fn display_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string());
        if self.is_dir {
            format!("{name}/")
        } else {
            name
        }
    }

    /// Render this node as a single line of the tree, without a line break.
    pub fn displayable(&self) -> String {
        let Some(parent) = &self.parent else {
            return self.display_name();
        };

        let connector = if self.is_last {
            CONNECTOR_LAST
        } else {
            CONNECTOR_MIDDLE
        };
        let mut parts = vec![format!("{connector} {}", self.display_name())];

        // every ancestor below the root contributes one indent segment
        let mut ancestor = Some(parent);
        while let Some(node) = ancestor {
            if node.parent.is_none() {
                break;
            }
            parts.push(
                if node.is_last {
                    INDENT_AFTER_LAST
                } else {
                    INDENT_AFTER_MIDDLE
                }
                .to_string(),
            );
            ancestor = node.parent.as_ref();
        }

        parts.into_iter().rev().collect()
    }
}

/// Walk `root` in pre-order, producing one node per visible entry.
pub fn make_tree(root: &Path, listing: &dyn DirectoryListing) -> Result<Vec<Rc<DisplayablePath>>> {
    let mut nodes = Vec::default();
    walk(root, None, false, listing, &mut nodes)
        .with_context(|| format!("Failed to build directory tree for {}", root.display()))?;
    Ok(nodes)
}

fn walk(
    dir: &Path,
    parent: Option<Rc<DisplayablePath>>,
    is_last: bool,
    listing: &dyn DirectoryListing,
    nodes: &mut Vec<Rc<DisplayablePath>>,
) -> Result<()> {
    let node = Rc::new(DisplayablePath::new(dir.to_path_buf(), true, parent, is_last));
    nodes.push(Rc::clone(&node));

    let mut children: Vec<_> = listing
        .list(dir)?
        .into_iter()
        .filter(|entry| is_visible(&entry.name()))
        .collect();
    children.sort_by_cached_key(|entry| entry.path.to_string_lossy().to_lowercase());

    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let is_last = i + 1 == count;
        if child.is_dir() {
            walk(&child.path, Some(Rc::clone(&node)), is_last, listing, nodes)?;
        } else {
            nodes.push(Rc::new(DisplayablePath::new(
                child.path,
                false,
                Some(Rc::clone(&node)),
                is_last,
            )));
        }
    }

    Ok(())
}

/// Render the whole tree of `root`, one line per visible entry.
pub fn render_tree(root: &Path, listing: &dyn DirectoryListing) -> Result<String> {
    let mut tree = String::new();
    for node in make_tree(root, listing)? {
        tree.push_str(&node.displayable());
        tree.push('\n');
    }
    Ok(tree)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::listing::MemoryListing;

    #[test]
    fn hides_dot_and_dunder_entries() {
        assert!(!is_visible(".git"));
        assert!(!is_visible(".env"));
        assert!(!is_visible("__pycache__"));
        assert!(!is_visible("__init__.py"));
        assert!(!is_visible("__main__.py"));
        assert!(is_visible("README.md"));
        assert!(is_visible("main_.py"));
    }

    #[test]
    fn renders_flat_tree() {
        let listing = MemoryListing::new("/root")
            .file("/root/b.py")
            .file("/root/a.py");

        let nodes = make_tree(Path::new("/root"), &listing).expect("can make tree");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].depth, 0);
        assert!(!nodes[1].is_last);
        assert!(nodes[2].is_last);
        assert_eq!(nodes[2].depth, 1);

        let tree = render_tree(Path::new("/root"), &listing).expect("can render tree");
        assert_eq!(tree, "root/\n├── a.py\n└── b.py\n");
    }

    #[test]
    fn renders_nested_tree() {
        let listing = MemoryListing::new("/proj")
            .file("/proj/app/models.py")
            .file("/proj/app/views/list.py")
            .file("/proj/app/views/detail.py")
            .file("/proj/setup.py")
            .file("/proj/.gitignore")
            .file("/proj/app/__init__.py");

        let tree = render_tree(Path::new("/proj"), &listing).expect("can render tree");
        let expected = "\
proj/
├── app/
│   ├── models.py
│   └── views/
│       ├── detail.py
│       └── list.py
└── setup.py
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn indents_after_last_directory_with_spaces() {
        let listing = MemoryListing::new("/r")
            .file("/r/a.py")
            .file("/r/z/inner/leaf.py");

        let tree = render_tree(Path::new("/r"), &listing).expect("can render tree");
        assert_eq!(tree, "r/\n├── a.py\n└── z/\n    └── inner/\n        └── leaf.py\n");
    }

    #[test]
    fn sorts_case_insensitively() {
        let listing = MemoryListing::new("/r")
            .file("/r/b.py")
            .file("/r/A.py")
            .file("/r/C.py");

        let tree = render_tree(Path::new("/r"), &listing).expect("can render tree");
        assert_eq!(tree, "r/\n├── A.py\n├── b.py\n└── C.py\n");
    }

    #[test]
    fn shows_files_the_ignore_rules_drop() {
        let listing = MemoryListing::new("/r")
            .file("/r/README.md")
            .file("/r/requirements.txt");

        let tree = render_tree(Path::new("/r"), &listing).expect("can render tree");
        assert_eq!(tree, "r/\n├── README.md\n└── requirements.txt\n");
    }

    #[test]
    fn empty_root_renders_only_itself() {
        let listing = MemoryListing::new("/r");
        let tree = render_tree(Path::new("/r"), &listing).expect("can render tree");
        assert_eq!(tree, "r/\n");
    }
}
