//! The rules deciding which repository entries never make it into the PDF body.
//!
//! The effective rule set is a fixed built-in list merged with the lines of the
//! repository's `.gitignore`. Rules are plain strings rather than globs: a rule is
//! either an extension (`.log`), an exact name (`Makefile`) or a directory marker
//! with a trailing slash (`build/`).

use crate::listing::EntryKind;
use anyhow::{Context, Result};
use std::path::Path;

/// Names and extensions that are never worth printing.
const BUILTIN_RULES: &[&str] = &[
    ".pdf",
    "__init__.py",
    "__pycache__",
    ".gitignore",
    ".git",
    "LICENSE",
    ".github",
    "README.md",
    "requirements.txt",
    "pyproject.toml",
    "poetry.lock",
    ".idea",
    "env-sample",
    "merged.html",
];

/// Common web framework artifacts, applied whether or not the framework is in use.
const BUILTIN_FRAMEWORK_RULES: &[&str] = &[
    "manage.py",
    "migrations/",
    "static/",
    "test_files/",
    "test/",
    "testes/",
    "test.py",
    "tests.py",
    "wsgi.py",
    "asgi.py",
    "settings.py",
];

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct IgnoreSet {
    rules: Vec<String>,
}

impl IgnoreSet {
    /// Only the built-in rules.
    pub fn builtin() -> IgnoreSet {
        IgnoreSet {
            rules: BUILTIN_RULES
                .iter()
                .chain(BUILTIN_FRAMEWORK_RULES.iter())
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// The built-in rules plus whatever `<root>/.gitignore` adds.
    pub fn load(root: &Path) -> Result<IgnoreSet> {
        let gitignore = root.join(".gitignore");
        if !gitignore.is_file() {
            log::info!(
                "No .gitignore found in {}, only the built-in ignore rules apply",
                root.display()
            );
            return Ok(IgnoreSet::builtin());
        }

        let contents = std::fs::read_to_string(&gitignore)
            .with_context(|| format!("Failed to read {}", gitignore.display()))?;
        let set = IgnoreSet::from_gitignore(&contents);
        log::debug!(
            "Loaded {} ignore rules from {}",
            set.rules.len() - BUILTIN_RULES.len() - BUILTIN_FRAMEWORK_RULES.len(),
            gitignore.display()
        );
        Ok(set)
    }

    /// The built-in rules plus the rules parsed out of `.gitignore` contents.
    pub fn from_gitignore(contents: &str) -> IgnoreSet {
        let mut rules: Vec<String> = parse_gitignore(contents).collect();
        rules.extend(IgnoreSet::builtin().rules);
        IgnoreSet { rules }
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.rules.iter().any(|r| r == rule)
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Whether an entry called `name` of the given kind must be left out.
    ///
    /// Directories match either their bare name or their name with a trailing `/`.
    /// Files match their exact name or their extension (with the leading dot).
    /// Anything that is neither a directory nor a regular file is never ignored
    /// here; walkers skip those on their own.
    pub fn must_ignore(&self, name: &str, kind: EntryKind) -> bool {
        match kind {
            EntryKind::Directory => self.contains(&format!("{name}/")) || self.contains(name),
            EntryKind::File => {
                let extension = Path::new(name)
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()));
                self.contains(name)
                    || extension
                        .as_deref()
                        .map(|e| self.contains(e))
                        .unwrap_or(false)
            }
            EntryKind::Other => false,
        }
    }
}

/// Turn `.gitignore` contents into plain rules.
///
/// Comment lines (any line containing `#`) and blank lines are dropped, and leading
/// or trailing `*` are stripped so that `*.log` becomes the extension rule `.log`.
fn parse_gitignore(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains('#'))
        .map(|line| line.trim_matches('*'))
        .filter(|rule| !rule.is_empty())
        .map(ToString::to_string)
}
